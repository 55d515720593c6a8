//! Terminal-safe rendering of untrusted text.
//!
//! Advice text comes back from a remote model and is drawn straight into the
//! terminal, so escape sequences (cursor movement, OSC 8 links, OSC 52
//! clipboard writes) and stray control characters must never reach the
//! backend.

use std::borrow::Cow;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{009b}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Text,
    /// Saw ESC, waiting for the introducer.
    Escape,
    /// Inside `ESC [` or C1 CSI: params until a final byte.
    Csi,
    /// Inside an OSC/DCS/PM/APC string: until BEL or `ESC \`.
    Str,
    /// Saw ESC inside a string sequence.
    StrEscape,
    /// Two-byte designator (`ESC (` etc.): drop exactly one more char.
    Designator,
}

fn is_blocked_control(c: char) -> bool {
    match c {
        '\n' | '\t' | '\r' => false,
        _ => c <= '\x1f' || c == '\x7f' || ('\u{0080}'..='\u{009f}').contains(&c),
    }
}

/// Strip ANSI escape sequences and control characters from `input`.
///
/// Newlines, tabs and carriage returns survive. Clean input is returned
/// borrowed.
///
/// ```
/// use shieldguard_types::sanitize_terminal_text;
///
/// assert_eq!(sanitize_terminal_text("plain"), "plain");
/// assert_eq!(sanitize_terminal_text("a\x1b[31mb"), "ab");
/// ```
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(|c| c == ESC || is_blocked_control(c)) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut scan = Scan::Text;

    for c in input.chars() {
        scan = match scan {
            Scan::Text => match c {
                ESC => Scan::Escape,
                C1_CSI => Scan::Csi,
                c if is_blocked_control(c) => Scan::Text,
                c => {
                    out.push(c);
                    Scan::Text
                }
            },
            Scan::Escape => match c {
                '[' => Scan::Csi,
                ']' | 'P' | '^' | '_' | 'X' => Scan::Str,
                '(' | ')' | '*' | '+' | '#' | ' ' | '%' => Scan::Designator,
                ESC => Scan::Escape,
                // Single-char commands (ESC 7, ESC c, ...) consume just this char.
                _ => Scan::Text,
            },
            Scan::Csi => match c {
                '\x40'..='\x7e' => Scan::Text,
                '\x20'..='\x3f' => Scan::Csi,
                ESC => Scan::Escape,
                // Malformed sequence: resume as text without this char.
                _ => Scan::Text,
            },
            Scan::Str => match c {
                BEL => Scan::Text,
                ESC => Scan::StrEscape,
                _ => Scan::Str,
            },
            Scan::StrEscape => match c {
                '\\' => Scan::Text,
                ESC => Scan::StrEscape,
                _ => Scan::Str,
            },
            Scan::Designator => Scan::Text,
        };
    }

    Cow::Owned(out)
}
