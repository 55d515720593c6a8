//! TUI rendering for ShieldGuard using ratatui.

mod input;
pub mod markdown;
mod theme;

pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Padding, Paragraph, Tabs, Wrap};
use unicode_width::UnicodeWidthStr;

use shieldguard_engine::content::{
    ADVISOR_NOTICE, AUDIT_SCOPE, LEARN_CARDS, ONE_METER_BODY, ONE_METER_TAGS, ONE_METER_TITLE,
    PRIVACY_SCORE, RECENT_EVENTS, STANDBY_TEXT, STATUS_CARDS, WHY_IT_MATTERS, with_kind,
};
use shieldguard_engine::shieldguard_types::sanitize_terminal_text;
use shieldguard_engine::{
    AdvisoryService, App, AuditPhase, ChatRole, IdentifierType, LineInput, Tab, Ticker,
    scan_steps,
};

pub use self::markdown::clear_render_cache;
use self::markdown::render_markdown;

/// Everything one frame needs besides the app itself.
struct Ctx {
    palette: Palette,
    glyphs: Glyphs,
}

/// Main draw function.
pub fn draw<T: Ticker, S: AdvisoryService>(frame: &mut Frame, app: &App<T, S>) {
    let options = app.ui_options();
    let ctx = Ctx {
        palette: palette(options),
        glyphs: glyphs(options),
    };
    let bg = Block::default().style(Style::default().bg(ctx.palette.bg_dark));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Brand + tabs
            Constraint::Min(1),    // Active view
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    draw_tab_bar(frame, app, chunks[0], &ctx);
    match app.tab() {
        Tab::Overview => draw_overview(frame, chunks[1], &ctx),
        Tab::IdentityAudit => draw_audit(frame, app, chunks[1], &ctx),
        Tab::Advisor => draw_advisor(frame, app, chunks[1], &ctx),
        Tab::Learn => draw_learn(frame, chunks[1], &ctx),
    }
    draw_status_bar(frame, app, chunks[2], &ctx);
}

fn panel(title: &str, ctx: &Ctx) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ctx.palette.bg_border))
        .title(Span::styled(format!(" {title} "), styles::heading(&ctx.palette)))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(ctx.palette.bg_panel))
}

fn draw_tab_bar<T: Ticker, S: AdvisoryService>(
    frame: &mut Frame,
    app: &App<T, S>,
    area: Rect,
    ctx: &Ctx,
) {
    let p = &ctx.palette;
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(p.bg_border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let brand_width = 16;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(brand_width), Constraint::Min(1)])
        .split(inner);

    let brand = Line::from(vec![
        Span::styled(
            format!(" {} ", ctx.glyphs.shield),
            Style::default().fg(p.primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled("ShieldGuard", styles::heading(p)),
    ]);
    frame.render_widget(Paragraph::new(brand), cols[0]);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" F{} {} ", tab.index() + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab().index())
        .style(Style::default().fg(p.text_muted))
        .highlight_style(styles::tab_active(p))
        .divider(" ");
    frame.render_widget(tabs, cols[1]);
}

// ============================================================================
// Overview
// ============================================================================

fn draw_overview(frame: &mut Frame, area: Rect, ctx: &Ctx) {
    let p = &ctx.palette;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2 + 2 * u16::try_from(STATUS_CARDS.len()).unwrap_or(4)),
            Constraint::Min(3),
        ])
        .split(area);

    let score = Gauge::default()
        .block(panel("Privacy Score", ctx))
        .gauge_style(Style::default().fg(p.primary).bg(p.bg_highlight))
        .ratio(f64::from(PRIVACY_SCORE) / 100.0)
        .label(format!("{PRIVACY_SCORE}/100  Protected"));
    frame.render_widget(score, rows[0]);

    let mut cards = Vec::new();
    for card in STATUS_CARDS {
        let (icon, color) = if card.alert {
            (ctx.glyphs.warning, p.error)
        } else {
            (ctx.glyphs.check, p.success)
        };
        cards.push(Line::from(vec![
            Span::styled(format!("{icon} "), Style::default().fg(color)),
            Span::styled(card.title, styles::heading(p)),
            Span::styled(format!("  {}", card.status), Style::default().fg(color)),
        ]));
        cards.push(Line::from(Span::styled(
            format!("  {}", card.detail),
            Style::default().fg(p.text_muted),
        )));
    }
    frame.render_widget(
        Paragraph::new(cards).block(panel("Device Status", ctx)),
        rows[1],
    );

    let mut events = Vec::new();
    for event in RECENT_EVENTS {
        let color = p.risk(event.severity);
        events.push(Line::from(vec![
            Span::styled(format!("{} ", ctx.glyphs.dot), Style::default().fg(color)),
            Span::styled(event.event, Style::default().fg(p.text_primary)),
            Span::styled(
                format!("  [{}]", event.severity.as_str()),
                Style::default().fg(color),
            ),
        ]));
        events.push(Line::from(Span::styled(
            format!("  {} · {}", event.when, event.location),
            Style::default().fg(p.text_muted),
        )));
    }
    events.push(Line::default());
    events.push(Line::from(vec![
        Span::styled("Enter", styles::key_highlight(p)),
        Span::styled(" run an identity audit", styles::key_hint(p)),
    ]));
    frame.render_widget(
        Paragraph::new(events)
            .block(panel("Recent Security Events", ctx))
            .wrap(Wrap { trim: false }),
        rows[2],
    );
}

// ============================================================================
// Identity audit
// ============================================================================

fn draw_audit<T: Ticker, S: AdvisoryService>(
    frame: &mut Frame,
    app: &App<T, S>,
    area: Rect,
    ctx: &Ctx,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    draw_identifier_selector(frame, app.identifier_type(), rows[0], ctx);

    let kind = app.identifier_type();
    let scanning = app.audit().phase() == AuditPhase::Scanning;
    draw_line_input(
        frame,
        app.audit_input(),
        kind.placeholder(),
        &format!("Target {}", kind.display_name()),
        !scanning,
        rows[1],
        ctx,
    );

    match app.audit().phase() {
        AuditPhase::Idle => draw_standby(frame, kind, rows[2], ctx),
        AuditPhase::Scanning => draw_scanning(frame, app, rows[2], ctx),
        AuditPhase::Results => draw_report(frame, app, rows[2], ctx),
    }
}

fn draw_identifier_selector(frame: &mut Frame, selected: IdentifierType, area: Rect, ctx: &Ctx) {
    let p = &ctx.palette;
    let mut spans = vec![Span::raw(" ")];
    for (kind, key) in [(IdentifierType::Email, "Ctrl-E"), (IdentifierType::Phone, "Ctrl-P")] {
        let style = if kind == selected {
            styles::tab_active(p)
        } else {
            Style::default().fg(p.text_muted)
        };
        spans.push(Span::styled(format!(" {} ", kind.display_name()), style));
        spans.push(Span::styled(format!(" {key}   "), styles::key_hint(p)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_standby(frame: &mut Frame, kind: IdentifierType, area: Rect, ctx: &Ctx) {
    let p = &ctx.palette;
    let mut lines = vec![
        Line::from(Span::styled(
            with_kind(STANDBY_TEXT, kind.as_str()),
            Style::default().fg(p.text_secondary),
        )),
        Line::default(),
        Line::from(Span::styled("Audit scope", styles::heading(p))),
    ];
    for item in AUDIT_SCOPE {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", ctx.glyphs.check), Style::default().fg(p.success)),
            Span::styled(*item, Style::default().fg(p.text_primary)),
        ]));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Audit Standby", ctx))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_scanning<T: Ticker, S: AdvisoryService>(
    frame: &mut Frame,
    app: &App<T, S>,
    area: Rect,
    ctx: &Ctx,
) {
    let p = &ctx.palette;
    let audit = app.audit();
    let steps = scan_steps(audit.identifier_type());
    let done = audit.steps_completed();

    let block = panel("Scanning", ctx);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let spinner = spinner_frame(app.frame(), app.ui_options());
    let step_text = audit.current_step_text().unwrap_or("Initializing scan...");
    let header = vec![
        Line::from(vec![
            Span::styled(format!("{spinner} "), Style::default().fg(p.primary)),
            Span::styled(step_text, styles::heading(p)),
        ]),
        Line::from(Span::styled(
            sanitize_terminal_text(audit.identifier()).into_owned(),
            Style::default().fg(p.text_muted),
        )),
    ];
    frame.render_widget(Paragraph::new(header), rows[0]);

    frame.render_widget(progress_bar(done, steps.len(), rows[1].width, ctx), rows[1]);

    let lines: Vec<Line> = steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            if index < done {
                Line::from(vec![
                    Span::styled(format!("{} ", ctx.glyphs.check), Style::default().fg(p.success)),
                    Span::styled(*step, Style::default().fg(p.text_secondary)),
                ])
            } else {
                Line::from(Span::styled(
                    format!("  {step}"),
                    Style::default().fg(p.text_disabled),
                ))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), rows[2]);
}

fn progress_bar(done: usize, total: usize, width: u16, ctx: &Ctx) -> Paragraph<'static> {
    let label = format!(" {done}/{total}");
    let bar_width = usize::from(width).saturating_sub(label.len()).max(1);
    let filled = if total == 0 {
        0
    } else {
        (bar_width * done.min(total)) / total
    };
    Paragraph::new(Line::from(vec![
        Span::styled(
            ctx.glyphs.bar_full.repeat(filled),
            Style::default().fg(ctx.palette.primary),
        ),
        Span::styled(
            ctx.glyphs.bar_empty.repeat(bar_width - filled),
            Style::default().fg(ctx.palette.bg_highlight),
        ),
        Span::styled(label, Style::default().fg(ctx.palette.text_muted)),
    ]))
}

fn draw_report<T: Ticker, S: AdvisoryService>(
    frame: &mut Frame,
    app: &App<T, S>,
    area: Rect,
    ctx: &Ctx,
) {
    let p = &ctx.palette;
    let audit = app.audit();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Target: ", Style::default().fg(p.text_muted)),
            Span::styled(
                sanitize_terminal_text(audit.identifier()).into_owned(),
                styles::heading(p),
            ),
        ]),
        Line::default(),
    ];

    for finding in audit.findings() {
        let color = p.risk(finding.risk);
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", finding.risk.badge()), styles::badge(color, p)),
            Span::raw(" "),
            Span::styled(finding.label, styles::heading(p)),
            Span::styled(
                format!("  {}", finding.category.as_str()),
                Style::default().fg(p.category(finding.category)),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", finding.description()),
            Style::default().fg(p.text_secondary),
        )));
        lines.push(Line::from(vec![
            Span::styled("  Fix: ", Style::default().fg(p.success)),
            Span::styled(finding.recommendation, Style::default().fg(p.text_primary)),
        ]));
        lines.push(Line::default());
    }

    lines.push(Line::from(Span::styled("Why this matters", styles::heading(p))));
    lines.push(Line::from(Span::styled(
        with_kind(WHY_IT_MATTERS, audit.identifier_type().as_str()),
        Style::default().fg(p.text_muted),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Audit Report", ctx))
            .wrap(Wrap { trim: false }),
        area,
    );
}

// ============================================================================
// Advisor
// ============================================================================

fn draw_advisor<T: Ticker, S: AdvisoryService>(
    frame: &mut Frame,
    app: &App<T, S>,
    area: Rect,
    ctx: &Ctx,
) {
    let p = &ctx.palette;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    for (index, message) in app.advisor().messages().iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        let (icon, style) = match message.role {
            ChatRole::User => (ctx.glyphs.user, styles::user_name(p)),
            ChatRole::Model => (ctx.glyphs.assistant, styles::assistant_name(p)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{icon} "), style),
            Span::styled(message.role.display_name(), style),
        ]));
        match message.role {
            ChatRole::User => {
                let text = sanitize_terminal_text(&message.text);
                for line in text.lines() {
                    lines.push(Line::from(Span::styled(
                        line.to_owned(),
                        Style::default().fg(p.text_primary),
                    )));
                }
            }
            ChatRole::Model => lines.extend(render_markdown(
                &message.text,
                Style::default().fg(p.text_secondary),
                p,
            )),
        }
    }
    if app.advisor().is_busy() {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", spinner_frame(app.frame(), app.ui_options())),
                Style::default().fg(p.primary),
            ),
            Span::styled("Thinking...", Style::default().fg(p.text_muted)),
        ]));
    }

    let block = panel("ShieldGuard AI", ctx);
    let inner = block.inner(rows[0]);
    let total = wrapped_line_count(&lines, inner.width);
    let scroll = total.saturating_sub(inner.height);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        rows[0],
    );

    draw_line_input(
        frame,
        app.chat_input(),
        "Ask about SIM swapping, NFC safety or 2FA...",
        "Message",
        !app.advisor().is_busy(),
        rows[1],
        ctx,
    );

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {ADVISOR_NOTICE}"),
            Style::default().fg(p.text_disabled),
        )),
        rows[2],
    );
}

fn wrapped_line_count(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().saturating_sub(1) / width + 1)
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

// ============================================================================
// Knowledge
// ============================================================================

fn draw_learn(frame: &mut Frame, area: Rect, ctx: &Ctx) {
    let p = &ctx.palette;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(7)])
        .split(area);

    let mut lines = Vec::new();
    for card in LEARN_CARDS {
        let level_color = if card.difficulty.is_advanced() {
            p.error
        } else {
            p.primary_dim
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", ctx.glyphs.bullet), Style::default().fg(p.primary)),
            Span::styled(card.title, styles::heading(p)),
            Span::styled(
                format!("  {}", card.difficulty.as_str()),
                Style::default().fg(level_color),
            ),
            Span::styled(
                format!("  {}", card.read_time),
                Style::default().fg(p.text_disabled),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", card.summary),
            Style::default().fg(p.text_muted),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Knowledge Base", ctx))
            .wrap(Wrap { trim: false }),
        rows[0],
    );

    let tip = vec![
        Line::from(Span::styled(
            ONE_METER_BODY,
            Style::default().fg(p.text_secondary),
        )),
        Line::default(),
        Line::from(Span::styled(
            ONE_METER_TAGS.join("  "),
            Style::default().fg(p.accent),
        )),
    ];
    frame.render_widget(
        Paragraph::new(tip)
            .block(panel(ONE_METER_TITLE, ctx))
            .wrap(Wrap { trim: false }),
        rows[1],
    );
}

// ============================================================================
// Shared widgets
// ============================================================================

fn draw_line_input(
    frame: &mut Frame,
    input: &LineInput,
    placeholder: &str,
    title: &str,
    enabled: bool,
    area: Rect,
    ctx: &Ctx,
) {
    let p = &ctx.palette;
    let border = if enabled { p.primary } else { p.bg_border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(format!(" {title} "), Style::default().fg(p.text_muted)));
    let inner = block.inner(area);

    let prompt = if ctx.glyphs.bullet.is_ascii() { "> " } else { "❯ " };
    let text = sanitize_terminal_text(input.text());
    let content = if text.is_empty() {
        Line::from(vec![
            Span::styled(prompt, Style::default().fg(p.primary)),
            Span::styled(placeholder.to_owned(), Style::default().fg(p.text_disabled)),
        ])
    } else {
        Line::from(vec![
            Span::styled(prompt, Style::default().fg(p.primary)),
            Span::styled(text.into_owned(), Style::default().fg(p.text_primary)),
        ])
    };

    // Keep the cursor visible when the text is wider than the box.
    let prompt_width = UnicodeWidthStr::width(prompt);
    let cursor_col = prompt_width + UnicodeWidthStr::width(input.before_cursor());
    let visible = usize::from(inner.width.max(1));
    let offset = cursor_col.saturating_sub(visible.saturating_sub(1));

    frame.render_widget(
        Paragraph::new(content)
            .block(block)
            .scroll((0, u16::try_from(offset).unwrap_or(0))),
        area,
    );

    if enabled && inner.width > 0 && inner.height > 0 {
        let x = inner.x + u16::try_from(cursor_col - offset).unwrap_or(0);
        frame.set_cursor_position(Position::new(x.min(inner.right() - 1), inner.y));
    }
}

fn draw_status_bar<T: Ticker, S: AdvisoryService>(
    frame: &mut Frame,
    app: &App<T, S>,
    area: Rect,
    ctx: &Ctx,
) {
    let p = &ctx.palette;
    let mut hints: Vec<(&str, &str)> = vec![("Tab", "switch view")];
    match app.tab() {
        Tab::Overview => hints.push(("Enter", "identity audit")),
        Tab::IdentityAudit => {
            if app.can_start_audit() {
                hints.push(("Enter", "start audit"));
            }
            hints.push(("Ctrl-E/P", "email/phone"));
            if app.audit().phase() != AuditPhase::Idle {
                hints.push(("Ctrl-R", "new scan"));
            }
        }
        Tab::Advisor => {
            if !app.advisor().is_busy() {
                hints.push(("Enter", "send"));
            }
        }
        Tab::Learn => {}
    }
    hints.push(("Esc", "quit"));

    let mut spans = vec![Span::raw(" ")];
    for (key, action) in hints {
        spans.push(Span::styled(key, styles::key_highlight(p)));
        spans.push(Span::styled(format!(" {action}  "), styles::key_hint(p)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
