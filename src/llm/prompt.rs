//! Question-answering prompt construction.

use std::borrow::Cow;

/// Default prompt (uses {document} and {question} placeholders).
pub const DEFAULT_QA_PROMPT: &str = r#"Answer the question below using the following document.

DOCUMENT:
{document}

QUESTION: {question}

Be direct and base your answer only on the content of the document.
If the information is not in the document, say so clearly."#;

/// Marker placed between the kept head and tail of a cut-down document.
pub const ELISION: &str = " [...] ";

/// Fit document text into the prompt budget.
///
/// Text longer than `max_chars` characters keeps its first and last
/// `edge_chars` characters joined by [`ELISION`].
pub fn prepare_context(text: &str, max_chars: usize, edge_chars: usize) -> Cow<'_, str> {
    let total = text.chars().count();
    if total <= max_chars {
        return Cow::Borrowed(text);
    }

    let head_end = text
        .char_indices()
        .nth(edge_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let tail_start = text
        .char_indices()
        .nth(total.saturating_sub(edge_chars))
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    Cow::Owned(format!(
        "{}{}{}",
        &text[..head_end],
        ELISION,
        &text[tail_start..]
    ))
}

/// Fill a prompt template.
pub fn build_prompt(template: &str, document: &str, question: &str) -> String {
    template
        .replace("{document}", document)
        .replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_borrowed() {
        let context = prepare_context("short document", 4000, 2000);
        assert!(matches!(context, Cow::Borrowed("short document")));
    }

    #[test]
    fn test_long_text_keeps_head_and_tail() {
        let text = format!("{}{}{}", "a".repeat(2000), "b".repeat(1000), "c".repeat(2000));
        let context = prepare_context(&text, 4000, 2000);
        assert_eq!(context.chars().count(), 4000 + ELISION.chars().count());
        assert!(context.starts_with(&"a".repeat(2000)));
        assert!(context.ends_with(&"c".repeat(2000)));
        assert!(!context.contains('b'));
    }

    #[test]
    fn test_cut_respects_char_boundaries() {
        let text = "ç".repeat(4001);
        let context = prepare_context(&text, 4000, 2000);
        assert_eq!(context, format!("{}{}{}", "ç".repeat(2000), ELISION, "ç".repeat(2000)));
    }

    #[test]
    fn test_build_prompt() {
        let prompt = build_prompt(DEFAULT_QA_PROMPT, "O gato correu.", "Who ran?");
        assert!(prompt.contains("DOCUMENT:\nO gato correu."));
        assert!(prompt.contains("QUESTION: Who ran?"));
        assert!(!prompt.contains("{document}"));
    }
}
