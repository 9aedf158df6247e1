//! Whitespace normalisation for command scripts.

use crate::lexer::{tokenize_with_text, TokenKind};

/// Rewrite `input` so every line has its words separated by exactly one
/// space, with no leading or trailing blanks.
///
/// Blank lines in the middle are kept as empty lines, trailing blank lines
/// are dropped, and a non-empty result always ends with a newline. Words
/// are never altered, so the formatted script parses to the same commands.
#[must_use]
pub fn format_script(input: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (token, text) in tokenize_with_text(input) {
        match token.kind {
            TokenKind::Whitespace => {}
            TokenKind::Newline => {
                lines.push(current.join(" "));
                current.clear();
            }
            _ => current.push(text),
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    let mut out = lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// True when `input` is already in the form [`format_script`] produces.
#[must_use]
pub fn is_formatted(input: &str) -> bool {
    format_script(input) == input
}
