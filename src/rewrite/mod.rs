//! Rewrite passes that route message text through the lookup macro
//!
//! - Translation files: symbols referenced from definition values
//! - Code files: bare symbols, literal substitutions and redundant nesting

mod source;
mod translation;

pub use source::SourceRewriter;
pub use translation::TranslationRewriter;

/// Result of rewriting one file's content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// The rewritten content
    pub content: String,
    /// Number of lines that differ from the input
    pub lines_changed: usize,
}

impl RewriteOutcome {
    /// Whether the rewrite changed anything
    pub fn is_changed(&self) -> bool {
        self.lines_changed > 0
    }
}

/// Whether `text[start..end]` is exactly the argument of a `macro_name(...)` call
pub(crate) fn is_wrapped(text: &str, start: usize, end: usize, macro_name: &str) -> bool {
    let Some(before) = text[..start].strip_suffix('(') else {
        return false;
    };
    let Some(head) = before.strip_suffix(macro_name) else {
        return false;
    };
    let boundary = head
        .chars()
        .next_back()
        .map_or(true, |c| !(c.is_alphanumeric() || c == '_'));
    boundary && text[end..].starts_with(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_wrapped() {
        let text = "GET_TEXT(MSG_A) MSG_B MY_GET_TEXT(MSG_C) GET_TEXT(MSG_D \"x\")";
        let span = |s: &str| {
            let start = text.find(s).unwrap();
            (start, start + s.len())
        };

        let (s, e) = span("MSG_A");
        assert!(is_wrapped(text, s, e, "GET_TEXT"));
        let (s, e) = span("MSG_B");
        assert!(!is_wrapped(text, s, e, "GET_TEXT"));
        let (s, e) = span("MSG_C");
        assert!(!is_wrapped(text, s, e, "GET_TEXT"));
        let (s, e) = span("MSG_D");
        assert!(!is_wrapped(text, s, e, "GET_TEXT"));
    }

    #[test]
    fn test_outcome_is_changed() {
        assert!(!RewriteOutcome::default().is_changed());
        let outcome = RewriteOutcome {
            content: String::new(),
            lines_changed: 2,
        };
        assert!(outcome.is_changed());
    }
}
