//! LaTeX syntax highlighting for terminal display.

use colored::*;
use regex::Regex;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\[A-Za-z@]+\*?|\\.|[{}\[\]]|\$\$?").expect("token pattern is valid")
});

/// Kind of a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `\section`, `\\`, `\%`
    Command,
    /// `{`, `}`, `[`, `]`
    Bracket,
    /// `$` or `$$`
    Math,
    /// From an unescaped `%` to the end of the line
    Comment,
    /// Anything else
    Text,
}

/// Split one line into classified spans. Concatenating the spans gives the
/// line back.
pub fn tokenize(line: &str) -> Vec<(TokenKind, &str)> {
    let (code, comment) = match comment_start(line) {
        Some(index) => line.split_at(index),
        None => (line, ""),
    };

    let mut spans = Vec::new();
    let mut last = 0;
    for found in TOKEN.find_iter(code) {
        if found.start() > last {
            spans.push((TokenKind::Text, &code[last..found.start()]));
        }
        let text = found.as_str();
        let kind = if text.starts_with('\\') {
            TokenKind::Command
        } else if text.starts_with('$') {
            TokenKind::Math
        } else {
            TokenKind::Bracket
        };
        spans.push((kind, text));
        last = found.end();
    }
    if last < code.len() {
        spans.push((TokenKind::Text, &code[last..]));
    }
    if !comment.is_empty() {
        spans.push((TokenKind::Comment, comment));
    }
    spans
}

/// Byte offset of the first `%` that is not escaped by a backslash.
fn comment_start(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '\\' => escaped = !escaped,
            '%' if !escaped => return Some(index),
            _ => escaped = false,
        }
    }
    None
}

/// Render a document with a line-number gutter, colored when enabled.
pub fn highlight(document: &str, color_enabled: bool) -> String {
    let width = document.lines().count().max(1).to_string().len();
    let mut out = String::with_capacity(document.len() * 2);

    for (number, line) in document.lines().enumerate() {
        let gutter = format!("{:>width$} │ ", number + 1, width = width);
        if color_enabled {
            out.push_str(&gutter.bright_black().to_string());
            for (kind, text) in tokenize(line) {
                out.push_str(&paint(kind, text));
            }
        } else {
            out.push_str(&gutter);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

fn paint(kind: TokenKind, text: &str) -> String {
    match kind {
        TokenKind::Command => text.blue().bold().to_string(),
        TokenKind::Bracket => text.yellow().to_string(),
        TokenKind::Math => text.magenta().to_string(),
        TokenKind::Comment => text.bright_black().italic().to_string(),
        TokenKind::Text => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<TokenKind> {
        tokenize(line).into_iter().map(|(kind, _)| kind).collect()
    }

    #[test]
    fn test_command_and_braces() {
        let spans = tokenize("\\section{Intro}");
        assert_eq!(
            spans,
            vec![
                (TokenKind::Command, "\\section"),
                (TokenKind::Bracket, "{"),
                (TokenKind::Text, "Intro"),
                (TokenKind::Bracket, "}"),
            ]
        );
    }

    #[test]
    fn test_comment_runs_to_end() {
        let spans = tokenize("text % note {not a brace}");
        assert_eq!(spans.last(), Some(&(TokenKind::Comment, "% note {not a brace}")));
        assert_eq!(kinds("text % x"), vec![TokenKind::Text, TokenKind::Comment]);
    }

    #[test]
    fn test_escaped_percent_is_not_comment() {
        let spans = tokenize("50\\% of cases");
        assert!(spans.iter().all(|(kind, _)| *kind != TokenKind::Comment));
        assert!(spans.contains(&(TokenKind::Command, "\\%")));
    }

    #[test]
    fn test_line_break_then_comment() {
        // `\\` is a line break, so the following `%` starts a comment
        let spans = tokenize("end\\\\% done");
        assert_eq!(spans.last(), Some(&(TokenKind::Comment, "% done")));
    }

    #[test]
    fn test_math_and_starred_command() {
        assert_eq!(
            kinds("$x$ \\section*"),
            vec![
                TokenKind::Math,
                TokenKind::Text,
                TokenKind::Math,
                TokenKind::Text,
                TokenKind::Command
            ]
        );
    }

    #[test]
    fn test_spans_reassemble_line() {
        let line = "\\begin{itemize}[noitemsep] $$a$$ % c \\item";
        let joined: String = tokenize(line).into_iter().map(|(_, text)| text).collect();
        assert_eq!(joined, line);
    }

    #[test]
    fn test_plain_rendering_has_gutter() {
        let doc = (1..=10).map(|i| format!("l{}", i)).collect::<Vec<_>>().join("\n");
        let rendered = highlight(&doc, false);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], " 1 │ l1");
        assert_eq!(lines[9], "10 │ l10");
    }
}
