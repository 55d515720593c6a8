//! Advisor answers arrive as Markdown; this turns them into ratatui lines.
//!
//! Rendered output is cached per thread so an unchanged transcript is not
//! re-parsed on every frame.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::mem;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use shieldguard_engine::shieldguard_types::sanitize_terminal_text;

use crate::theme::Palette;

const CACHE_MAX_ENTRIES: usize = 128;

thread_local! {
    static RENDER_CACHE: RefCell<HashMap<u64, Vec<Line<'static>>>> = RefCell::new(HashMap::new());
}

fn cache_key(content: &str, base: Style, palette: &Palette) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    // Style and Palette have no Hash impl.
    base.fg.hash(&mut hasher);
    base.bg.hash(&mut hasher);
    base.add_modifier.hash(&mut hasher);
    palette.primary.hash(&mut hasher);
    palette.peach.hash(&mut hasher);
    hasher.finish()
}

pub fn clear_render_cache() {
    RENDER_CACHE.with(|cache| cache.borrow_mut().clear());
}

/// Render `content` to lines styled on top of `base`.
///
/// Terminal control sequences in `content` are stripped before parsing.
#[must_use]
pub fn render_markdown(content: &str, base: Style, palette: &Palette) -> Vec<Line<'static>> {
    let key = cache_key(content, base, palette);
    if let Some(lines) = RENDER_CACHE.with(|cache| cache.borrow().get(&key).cloned()) {
        return lines;
    }

    let clean = sanitize_terminal_text(content);
    let lines = MarkdownRenderer::new(base, palette).render(&clean);

    RENDER_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if cache.len() >= CACHE_MAX_ENTRIES {
            let stale: Vec<u64> = cache.keys().take(CACHE_MAX_ENTRIES / 2).copied().collect();
            for k in stale {
                cache.remove(&k);
            }
        }
        cache.insert(key, lines.clone());
    });
    lines
}

struct ListState {
    next_number: Option<u64>,
}

struct MarkdownRenderer<'p> {
    base: Style,
    palette: &'p Palette,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    bold: usize,
    italic: usize,
    heading: bool,
    quote: usize,
    in_code_block: bool,
    lists: Vec<ListState>,
    table: Option<Vec<Vec<String>>>,
    cell: String,
    link_target: Option<String>,
}

impl<'p> MarkdownRenderer<'p> {
    fn new(base: Style, palette: &'p Palette) -> Self {
        Self {
            base,
            palette,
            lines: Vec::new(),
            spans: Vec::new(),
            bold: 0,
            italic: 0,
            heading: false,
            quote: 0,
            in_code_block: false,
            lists: Vec::new(),
            table: None,
            cell: String::new(),
            link_target: None,
        }
    }

    fn render(mut self, content: &str) -> Vec<Line<'static>> {
        let parser = Parser::new_ext(content, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
        for event in parser {
            self.handle(event);
        }
        self.flush();
        while self.lines.last().is_some_and(|l| l.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }

    fn text_style(&self) -> Style {
        let mut style = self.base;
        if self.bold > 0 || self.heading {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.heading {
            style = style.fg(self.palette.primary_dim);
        }
        if self.quote > 0 {
            style = style.fg(self.palette.text_muted);
        }
        style
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if self.table.is_some() {
                    self.cell.push_str(&code);
                } else {
                    let style = self.base.fg(self.palette.peach);
                    self.spans.push(Span::styled(code.into_string(), style));
                }
            }
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines.push(Line::styled(
                    "─".repeat(24),
                    Style::default().fg(self.palette.bg_border),
                ));
            }
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = true;
                if matches!(level, HeadingLevel::H1 | HeadingLevel::H2) && !self.lines.is_empty() {
                    self.lines.push(Line::default());
                }
            }
            Tag::Strong => self.bold += 1,
            Tag::Emphasis => self.italic += 1,
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote += 1;
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(ListState { next_number: start });
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(ListState {
                        next_number: Some(n),
                    }) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_owned(),
                };
                self.spans.push(Span::styled(
                    format!("{}{marker}", "  ".repeat(depth)),
                    self.base.fg(self.palette.primary_dim),
                ));
            }
            Tag::Table(_) => {
                self.flush();
                self.table = Some(Vec::new());
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(rows) = self.table.as_mut() {
                    rows.push(Vec::new());
                }
            }
            Tag::TableCell => self.cell.clear(),
            Tag::Link { dest_url, .. } => self.link_target = Some(dest_url.into_string()),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.flush();
                self.heading = false;
            }
            TagEnd::Strong => self.bold = self.bold.saturating_sub(1),
            TagEnd::Emphasis => self.italic = self.italic.saturating_sub(1),
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote = self.quote.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                self.flush();
                self.in_code_block = false;
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.lines.push(Line::default());
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.lines.push(Line::default());
                }
            }
            TagEnd::TableCell => {
                let cell = mem::take(&mut self.cell);
                if let Some(row) = self.table.as_mut().and_then(|rows| rows.last_mut()) {
                    row.push(cell.trim().to_owned());
                }
            }
            TagEnd::Table => {
                if let Some(rows) = self.table.take() {
                    self.push_table(&rows);
                }
            }
            TagEnd::Link => {
                if let Some(url) = self.link_target.take() {
                    self.spans.push(Span::styled(
                        format!(" ({url})"),
                        self.base.fg(self.palette.text_muted),
                    ));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.table.is_some() {
            self.cell.push_str(text);
            return;
        }
        if self.in_code_block {
            let style = self.base.fg(self.palette.peach);
            for line in text.lines() {
                self.lines
                    .push(Line::from(Span::styled(format!("  {line}"), style)));
            }
            return;
        }
        let style = self.text_style();
        self.spans.push(Span::styled(text.to_owned(), style));
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        if self.quote > 0 {
            spans.push(Span::styled(
                "│ ".repeat(self.quote),
                Style::default().fg(self.palette.bg_border),
            ));
        }
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    /// Columns padded to their widest cell; the header row is bold.
    fn push_table(&mut self, rows: &[Vec<String>]) {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = (0..columns)
            .map(|col| {
                rows.iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| UnicodeWidthStr::width(cell.as_str()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let border = Style::default().fg(self.palette.bg_border);

        for (index, row) in rows.iter().enumerate() {
            let cell_style = if index == 0 {
                self.base.add_modifier(Modifier::BOLD)
            } else {
                self.base
            };
            let mut spans = Vec::new();
            for (col, width) in widths.iter().enumerate() {
                if col > 0 {
                    spans.push(Span::styled(" │ ", border));
                }
                let cell = row.get(col).map_or("", String::as_str);
                let pad = width.saturating_sub(UnicodeWidthStr::width(cell));
                spans.push(Span::styled(format!("{cell}{}", " ".repeat(pad)), cell_style));
            }
            self.lines.push(Line::from(spans));
            if index == 0 {
                let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
                self.lines.push(Line::styled(rule.join("─┼─"), border));
            }
        }
        self.lines.push(Line::default());
    }
}
