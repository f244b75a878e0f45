//! Small helpers shared by several modules.
//!
//! - String truncation for log previews
//! - Word wrapping for the terminal views
//! - Running external commands (speech, link opener) with logged outcome

use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (backing off to a char boundary) and
/// get a `"…(+N bytes)"` suffix.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Greedy word wrap to `width` terminal columns.
///
/// Widths are display columns, so CJK and other wide characters count as two.
/// Words wider than a line are broken on grapheme boundaries.
///
/// # Arguments
///
/// * `text` - Text to wrap; runs of whitespace collapse to one space
/// * `width` - Maximum display width of a line (treated as at least 1)
///
/// # Returns
///
/// The wrapped lines. Empty or all-whitespace input yields no lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0usize;

    for word in text.split_whitespace() {
        let mut rest = word;
        let mut rest_width = rest.width();
        while rest_width > width {
            if line_width > 0 {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            let head = match clip_to_width(rest, width) {
                "" => rest.graphemes(true).next().unwrap_or(rest),
                head => head,
            };
            lines.push(head.to_string());
            rest = &rest[head.len()..];
            rest_width = rest.width();
        }
        if rest.is_empty() {
            continue;
        }

        let needed = if line_width == 0 { rest_width } else { line_width + 1 + rest_width };
        if needed > width {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }
        if line_width > 0 {
            line.push(' ');
            line_width += 1;
        }
        line.push_str(rest);
        line_width += rest_width;
    }
    if line_width > 0 {
        lines.push(line);
    }
    lines
}

/// Longest prefix of `text` that fits in `width` display columns.
///
/// Cuts only on grapheme boundaries, so a wide character that would straddle
/// the edge is left out entirely.
pub fn clip_to_width(text: &str, width: usize) -> &str {
    let mut used = 0usize;
    let mut end = 0usize;
    for (index, grapheme) in text.grapheme_indices(true) {
        let w = grapheme.width();
        if used + w > width {
            break;
        }
        used += w;
        end = index + grapheme.len();
    }
    &text[..end]
}

/// Run `program args... extra` to completion with stdio detached.
///
/// Returns the exit code (`None` when killed by a signal) or the spawn error.
#[instrument(level = "debug", skip_all, fields(%program))]
pub async fn run_command(
    program: &str,
    args: &[String],
    extra: &str,
) -> std::io::Result<Option<i32>> {
    let status = Command::new(program)
        .args(args)
        .arg(extra)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;
    debug!(code = ?status.code(), "Command finished");
    Ok(status.code())
}
