//! Helpers for logging raw terminal input on a single line.
//!
//! Shell input can carry tabs, stray newlines and escape sequences from
//! arrow keys pressed at the prompt (`ESC [ A`). Those are rewritten into
//! visible escapes before they reach the log.

use std::fmt::Write;

/// Default cap on how many input characters are echoed into a log line.
pub const DEFAULT_PREVIEW: usize = 120;

/// Escape `s` for a single log line, truncated to [`DEFAULT_PREVIEW`] characters.
pub fn escape_log(s: &str) -> String {
    escape_log_capped(s, DEFAULT_PREVIEW)
}

/// Escape `s` for a single log line, keeping at most `max_chars` input characters.
///
/// `ESC` becomes `\e`, common whitespace controls their C escapes, other
/// controls `\xNN`. Truncation is marked with `…`.
pub fn escape_log_capped(s: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(s.len().min(max_chars) + 4);
    for (seen, ch) in s.chars().enumerate() {
        if seen >= max_chars {
            out.push('…');
            break;
        }
        match ch {
            '\u{1b}' => out.push_str("\\e"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
