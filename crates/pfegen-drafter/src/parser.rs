//! Recover the document body and the change summary from model output
//!
//! Models wrap the document in a markdown code block most of the time, but
//! not always. Extraction is best-effort and never fails: when nothing looks
//! like a document, the text is passed through untouched.

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Summary used when a reply contains nothing but code
pub const DEFAULT_EDIT_SUMMARY: &str = "Document updated successfully.";

/// Marker that opens every LaTeX document
pub const DOCUMENT_START: &str = "\\documentclass";

static LATEX_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```latex(.*?)```").expect("latex block pattern is valid")
});

static ANY_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(.*?)```").expect("code block pattern is valid")
});

/// Inner text of the first match of `pattern`, if that capture is non-empty
fn first_block<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|inner| inner.as_str())
        .filter(|inner| !inner.is_empty())
}

/// Extract the document body from a model reply.
///
/// In order of preference:
/// 1. the first block tagged `latex` (tag case-insensitive), trimmed;
/// 2. the first fenced block of any kind, trimmed;
/// 3. the whole reply, trimmed, when it starts with `\documentclass`;
/// 4. the reply unchanged.
///
/// # Examples
///
/// ```
/// use pfegen_drafter::extract_document;
///
/// let reply = "Here you go:\n```latex\n\\documentclass{article}\n```";
/// assert_eq!(extract_document(reply), "\\documentclass{article}");
///
/// assert_eq!(extract_document("no code here"), "no code here");
/// ```
pub fn extract_document(text: &str) -> String {
    if let Some(inner) = first_block(&LATEX_BLOCK, text) {
        return inner.trim().to_string();
    }

    if let Some(inner) = first_block(&ANY_BLOCK, text) {
        return inner.trim().to_string();
    }

    let trimmed = text.trim();
    if trimmed.starts_with(DOCUMENT_START) {
        return trimmed.to_string();
    }

    if !text.trim().is_empty() {
        warn!("Reply contains no code block, using it verbatim as the document");
    }
    text.to_string()
}

/// Split an edit reply into a human-readable summary and the document body.
///
/// The document is whatever [`extract_document`] finds (first block only),
/// while the summary is the reply with every fenced block removed. A reply
/// made only of code gets [`DEFAULT_EDIT_SUMMARY`].
pub fn split_summary_and_document(text: &str) -> (String, String) {
    let document = extract_document(text);

    let without_latex = LATEX_BLOCK.replace_all(text, "");
    let without_blocks = ANY_BLOCK.replace_all(&without_latex, "");
    let summary = without_blocks.trim();

    let summary = if summary.is_empty() {
        DEFAULT_EDIT_SUMMARY.to_string()
    } else {
        summary.to_string()
    };

    (summary, document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_latex_block_preferred_over_earlier_generic_block() {
        let reply = "```\nnot this\n```\nthen\n```latex\n\\documentclass{report}\n```";
        assert_eq!(extract_document(reply), "\\documentclass{report}");
    }

    #[test]
    fn test_first_latex_block_wins() {
        let reply = "```LaTeX\nfirst\n```\n```latex\nsecond\n```";
        assert_eq!(extract_document(reply), "first");
    }

    #[test]
    fn test_generic_block() {
        let reply = "Sure.\n```\n\\documentclass{article}\n\\begin{document}\n\\end{document}\n```\nBye";
        assert_eq!(
            extract_document(reply),
            "\\documentclass{article}\n\\begin{document}\n\\end{document}"
        );
    }

    #[test]
    fn test_generic_block_keeps_other_language_tag() {
        let reply = "```tex\n\\documentclass{article}\n```";
        assert_eq!(extract_document(reply), "tex\n\\documentclass{article}");
    }

    #[test]
    fn test_raw_document_is_trimmed() {
        let reply = "\n  \\documentclass{article}\n\\begin{document}\n\\end{document}\n\n";
        assert_eq!(
            extract_document(reply),
            "\\documentclass{article}\n\\begin{document}\n\\end{document}"
        );
    }

    #[test]
    fn test_fallback_returns_input_unchanged() {
        let reply = "  I cannot help with that.  \n";
        assert_eq!(extract_document(reply), reply);
    }

    #[test]
    fn test_unterminated_block_falls_through() {
        let reply = "```latex\n\\documentclass{article}";
        assert_eq!(extract_document(reply), reply);
    }

    #[test]
    fn test_empty_latex_block_falls_back_to_generic_match() {
        // The empty tagged capture is skipped; the generic pattern then captures the tag
        let reply = "Text ```latex``` more ```\nbody\n```";
        assert_eq!(extract_document(reply), "latex");
    }

    #[test]
    fn test_split_summary_and_document() {
        let reply = "I added a conclusion chapter.\n```latex\n\\documentclass{report}\n\\chapter{Conclusion}\n```\n";
        let (summary, document) = split_summary_and_document(reply);
        assert_eq!(summary, "I added a conclusion chapter.");
        assert_eq!(document, "\\documentclass{report}\n\\chapter{Conclusion}");
    }

    #[test]
    fn test_split_removes_every_block_but_uses_first() {
        let reply = "Intro\n```latex\nfirst\n```\nmiddle\n```\nsecond\n```\nend";
        let (summary, document) = split_summary_and_document(reply);
        assert_eq!(document, "first");
        assert_eq!(summary, "Intro\n\nmiddle\n\nend");
    }

    #[test]
    fn test_split_code_only_gets_default_summary() {
        let reply = "  ```latex\n\\documentclass{report}\n```  \n";
        let (summary, document) = split_summary_and_document(reply);
        assert_eq!(summary, DEFAULT_EDIT_SUMMARY);
        assert_eq!(document, "\\documentclass{report}");
    }

    #[test]
    fn test_split_empty_reply() {
        let (summary, document) = split_summary_and_document("");
        assert_eq!(summary, DEFAULT_EDIT_SUMMARY);
        assert_eq!(document, "");
    }

    fn plain_text() -> impl Strategy<Value = String> {
        // No backticks, so no fenced blocks can appear
        "[a-zA-Z0-9 .,;:!?\\n\\\\{}]{0,80}"
    }

    proptest! {
        #[test]
        fn prop_tagged_block_content_is_returned(
            before in plain_text(),
            body in "[a-zA-Z0-9 \\n\\\\{}]{1,80}",
            after in plain_text(),
        ) {
            let reply = format!("{}```latex\n{}\n```{}```\nother\n```", before, body, after);
            prop_assert_eq!(extract_document(&reply), body.trim().to_string());
        }

        #[test]
        fn prop_untagged_block_content_is_returned(
            before in plain_text(),
            body in "[a-zA-Z0-9 \\n\\\\{}]{1,80}",
        ) {
            let reply = format!("{}```\n{}\n```", before, body);
            prop_assert_eq!(extract_document(&reply), body.trim().to_string());
        }

        #[test]
        fn prop_no_block_document_is_trimmed(body in plain_text(), pad in "[ \\n]{0,5}") {
            let reply = format!("{}{}{}{}", pad, DOCUMENT_START, body, pad);
            prop_assert_eq!(extract_document(&reply), reply.trim().to_string());
        }

        #[test]
        fn prop_plain_text_is_identity(text in plain_text()) {
            prop_assume!(!text.trim().starts_with(DOCUMENT_START));
            prop_assert_eq!(extract_document(&text), text.clone());
            // Idempotent on its own output
            let once = extract_document(&text);
            prop_assert_eq!(extract_document(&once), once.clone());
        }

        #[test]
        fn prop_summary_never_empty(text in "[a-z `\\n]{0,60}") {
            let (summary, _) = split_summary_and_document(&text);
            prop_assert!(!summary.trim().is_empty());
        }
    }
}
