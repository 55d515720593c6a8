//! Color theme and glyphs for the ShieldGuard TUI.
//!
//! Slate background with a blue brand color by default, plus a high-contrast
//! override for terminals with limited color support.

use ratatui::style::{Color, Modifier, Style};

use shieldguard_engine::{Category, Risk, UiOptions};

/// Slate/blue palette constants.
mod colors {
    use super::Color;

    // === Backgrounds ===
    pub const BG_DARK: Color = Color::Rgb(2, 6, 23); // slate-950
    pub const BG_PANEL: Color = Color::Rgb(15, 23, 42); // slate-900
    pub const BG_HIGHLIGHT: Color = Color::Rgb(30, 41, 59); // slate-800
    pub const BG_BORDER: Color = Color::Rgb(51, 65, 85); // slate-700

    // === Foregrounds ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(226, 232, 240); // slate-200
    pub const TEXT_SECONDARY: Color = Color::Rgb(203, 213, 225); // slate-300
    pub const TEXT_MUTED: Color = Color::Rgb(148, 163, 184); // slate-400
    pub const TEXT_DISABLED: Color = Color::Rgb(100, 116, 139); // slate-500

    // === Brand ===
    pub const PRIMARY: Color = Color::Rgb(59, 130, 246); // blue-500
    pub const PRIMARY_DIM: Color = Color::Rgb(96, 165, 250); // blue-400

    // === Accents ===
    pub const GREEN: Color = Color::Rgb(52, 211, 153); // emerald-400
    pub const YELLOW: Color = Color::Rgb(245, 158, 11); // amber-500
    pub const RED: Color = Color::Rgb(244, 63, 94); // rose-500
    pub const PURPLE: Color = Color::Rgb(192, 132, 252); // purple-400
    pub const PEACH: Color = Color::Rgb(251, 146, 60); // orange-400
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_disabled: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub accent: Color,
    pub peach: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_highlight: colors::BG_HIGHLIGHT,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            text_disabled: colors::TEXT_DISABLED,
            primary: colors::PRIMARY,
            primary_dim: colors::PRIMARY_DIM,
            success: colors::GREEN,
            warning: colors::YELLOW,
            error: colors::RED,
            accent: colors::PURPLE,
            peach: colors::PEACH,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::Gray,
            text_disabled: Color::DarkGray,
            primary: Color::Cyan,
            primary_dim: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            accent: Color::Magenta,
            peach: Color::Yellow,
        }
    }

    /// Badge color for a risk level.
    #[must_use]
    pub fn risk(&self, risk: Risk) -> Color {
        match risk {
            Risk::High => self.error,
            Risk::Medium => self.warning,
            Risk::Low => self.primary_dim,
        }
    }

    #[must_use]
    pub fn category(&self, category: Category) -> Color {
        match category {
            Category::Security => self.error,
            Category::Network => self.primary,
            Category::Privacy => self.success,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for icons and spinners.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub shield: &'static str,
    pub user: &'static str,
    pub assistant: &'static str,
    pub bullet: &'static str,
    pub check: &'static str,
    pub warning: &'static str,
    pub dot: &'static str,
    pub selected: &'static str,
    pub bar_full: &'static str,
    pub bar_empty: &'static str,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            shield: "#",
            user: "U",
            assistant: "A",
            bullet: "*",
            check: "+",
            warning: "!",
            dot: "o",
            selected: ">",
            bar_full: "#",
            bar_empty: ".",
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            shield: "⛨",
            user: "○",
            assistant: "◇",
            bullet: "•",
            check: "✓",
            warning: "⚠",
            dot: "●",
            selected: "▸",
            bar_full: "█",
            bar_empty: "░",
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

/// When `reduced_motion` is enabled, returns a static glyph instead of cycling.
#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    if options.reduced_motion {
        frames[0]
    } else {
        frames[(tick / 6) % frames.len()]
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Color, Modifier, Palette, Style};

    #[must_use]
    pub fn user_name(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.success)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn assistant_name(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn heading(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn tab_active(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn badge(color: Color, palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.peach)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(ascii_only: bool, high_contrast: bool, reduced_motion: bool) -> UiOptions {
        UiOptions {
            ascii_only,
            high_contrast,
            reduced_motion,
        }
    }

    #[test]
    fn spinner_frame_cycles_without_reduced_motion() {
        let opts = options(false, false, false);
        assert_ne!(spinner_frame(0, opts), spinner_frame(6, opts));
    }

    #[test]
    fn spinner_frame_static_with_reduced_motion() {
        let opts = options(false, false, true);
        assert_eq!(spinner_frame(0, opts), spinner_frame(60, opts));
    }

    #[test]
    fn ascii_glyphs_are_ascii() {
        let g = glyphs(options(true, false, false));
        for glyph in [g.shield, g.user, g.assistant, g.bullet, g.check, g.warning] {
            assert!(glyph.is_ascii(), "{glyph:?}");
        }
        assert!(g.spinner_frames.iter().all(|f| f.is_ascii()));
    }

    #[test]
    fn high_contrast_uses_named_colors() {
        let p = palette(options(false, true, false));
        assert_eq!(p.bg_dark, Color::Black);
        assert_eq!(p.risk(Risk::High), Color::Red);
    }

    #[test]
    fn risk_colors_are_distinct() {
        let p = Palette::standard();
        assert_ne!(p.risk(Risk::High), p.risk(Risk::Medium));
        assert_ne!(p.risk(Risk::Medium), p.risk(Risk::Low));
    }
}
