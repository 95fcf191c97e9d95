//! Fallback rewrite of translated language files
//!
//! Every definition whose value mentions a reference symbol gets that symbol
//! wrapped in the lookup macro, so a missing translation resolves to the
//! reference text. Adjacent `_UxGT("..")` literals are merged on the way.

use super::{is_wrapped, RewriteOutcome};
use crate::definition::{symbol_regex, Definition};
use crate::symbols::{SymbolTable, UsageSet};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

fn adjacent_literals() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"_UxGT\("((?:[^"\\]|\\.)*)"\)\s+_UxGT\("((?:[^"\\]|\\.)*)"\)"#)
            .expect("literal collapse pattern is valid")
    })
}

/// Rewrites definition lines of one language at a time
#[derive(Debug, Clone)]
pub struct TranslationRewriter<'a> {
    symbols: &'a SymbolTable,
    lookup_macro: &'a str,
}

impl<'a> TranslationRewriter<'a> {
    pub fn new(symbols: &'a SymbolTable, lookup_macro: &'a str) -> Self {
        Self {
            symbols,
            lookup_macro,
        }
    }

    /// Rewrite a whole language file
    pub fn rewrite_content(&self, content: &str, usage: &mut UsageSet) -> RewriteOutcome {
        let mut outcome = RewriteOutcome::default();
        for line in content.split_inclusive('\n') {
            match self.rewrite_line(line, usage) {
                Some(new_line) => {
                    if new_line != line {
                        outcome.lines_changed += 1;
                        log::trace!("- {}", line.trim_end());
                        log::trace!("+ {}", new_line.trim_end());
                    }
                    outcome.content.push_str(&new_line);
                }
                None => outcome.content.push_str(line),
            }
        }
        outcome
    }

    /// Rewrite one line; `None` when it is not a definition
    pub fn rewrite_line(&self, line: &str, usage: &mut UsageSet) -> Option<String> {
        let mut def = Definition::parse(line)?;
        if def.is_legacy() {
            log::trace!("Converting #define {}", def.identifier);
        }
        let value = self.wrap_symbols(&def.value, usage);
        def.value = collapse_literals(&value).into_owned();
        Some(def.render())
    }

    /// Wrap known symbols in `value` with the lookup macro
    ///
    /// A symbol that already sits directly inside the lookup macro is counted
    /// as used but not wrapped again.
    pub fn wrap_symbols(&self, value: &str, usage: &mut UsageSet) -> String {
        let mut out = String::with_capacity(value.len());
        let mut last = 0;

        for m in symbol_regex().find_iter(value) {
            out.push_str(&value[last..m.start()]);
            last = m.end();

            let symbol = m.as_str();
            let Some(reference) = self.symbols.get(symbol) else {
                out.push_str(symbol);
                continue;
            };

            usage.mark(symbol);
            log::trace!("{} falls back to {}", symbol, reference);
            if is_wrapped(value, m.start(), m.end(), self.lookup_macro) {
                out.push_str(symbol);
            } else {
                out.push_str(self.lookup_macro);
                out.push('(');
                out.push_str(symbol);
                out.push(')');
            }
        }

        out.push_str(&value[last..]);
        out
    }
}

/// Merge `_UxGT("A") _UxGT("B")` into `_UxGT("AB")` until no pair is left
pub fn collapse_literals(value: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(value);
    loop {
        let next = adjacent_literals().replace_all(&current, |caps: &Captures| {
            format!("_UxGT(\"{}{}\")", &caps[1], &caps[2])
        });
        let Cow::Owned(collapsed) = next else {
            break;
        };
        current = Cow::Owned(collapsed);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> SymbolTable {
        SymbolTable::learn(
            "#define MSG_BACKLASH _UxGT(\"Backlash\")\n\
             #define MSG_MOVE_E   _UxGT(\"Extruder\")\n\
             #define MSG_E1       _UxGT(\" E1\")\n",
        )
    }

    #[test]
    fn test_left_identifier_is_not_substituted() {
        let symbols = reference();
        let rewriter = TranslationRewriter::new(&symbols, "GET_TEXT");
        let mut usage = UsageSet::new();

        let line = "PROGMEM Language_Str MSG_BACKLASH = _UxGT(\"Ruckschlag\");\n";
        assert_eq!(rewriter.rewrite_line(line, &mut usage).unwrap(), line);
        assert!(usage.is_empty());
    }

    #[test]
    fn test_value_symbols_are_wrapped() {
        let symbols = reference();
        let rewriter = TranslationRewriter::new(&symbols, "GET_TEXT");
        let mut usage = UsageSet::new();

        let line = "  #define MSG_MOVE_E1   MSG_MOVE_E \" \" MSG_E1 // per extruder\n";
        let out = rewriter.rewrite_line(line, &mut usage).unwrap();
        assert_eq!(
            out,
            "  PROGMEM Language_Str MSG_MOVE_E1   = GET_TEXT(MSG_MOVE_E) \" \" GET_TEXT(MSG_E1); // per extruder\n"
        );
        assert!(usage.contains("MSG_MOVE_E"));
        assert!(usage.contains("MSG_E1"));
        assert!(!usage.contains("MSG_BACKLASH"));
    }

    #[test]
    fn test_unknown_symbols_are_left_alone() {
        let symbols = reference();
        let rewriter = TranslationRewriter::new(&symbols, "GET_TEXT");
        let mut usage = UsageSet::new();

        let value = rewriter.wrap_symbols("MSG_MOVE_##N MSG_UNKNOWN", &mut usage);
        assert_eq!(value, "MSG_MOVE_##N MSG_UNKNOWN");
        assert!(usage.is_empty());
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let symbols = reference();
        let rewriter = TranslationRewriter::new(&symbols, "GET_TEXT");
        let mut usage = UsageSet::new();

        let content = "namespace Language_de {\n  #define MSG_MOVE_E1 MSG_MOVE_E \" \" MSG_E1\n}\n";
        let once = rewriter.rewrite_content(content, &mut usage);
        let twice = rewriter.rewrite_content(&once.content, &mut usage);
        assert_eq!(once.lines_changed, 1);
        assert_eq!(twice.lines_changed, 0);
        assert_eq!(once.content, twice.content);
        assert_eq!(once.content.matches("GET_TEXT(GET_TEXT").count(), 0);
    }

    #[test]
    fn test_rewrite_preserves_identifier_and_comment() {
        let symbols = reference();
        let rewriter = TranslationRewriter::new(&symbols, "GET_TEXT");
        let mut usage = UsageSet::new();

        let line = "#define MSG_BACKLASH_A MSG_BACKLASH _UxGT(\" A\")   // axis A\n";
        let before = Definition::parse(line).unwrap();
        let out = rewriter.rewrite_line(line, &mut usage).unwrap();
        let after = Definition::parse(&out).unwrap();
        assert_eq!(after.identifier, before.identifier);
        assert_eq!(after.comment, before.comment);
    }

    #[test]
    fn test_non_definition_lines_pass_through() {
        let symbols = reference();
        let rewriter = TranslationRewriter::new(&symbols, "GET_TEXT");
        let mut usage = UsageSet::new();

        let content = "#pragma once\n\n// MSG_BACKLASH is documented here\n";
        let outcome = rewriter.rewrite_content(content, &mut usage);
        assert_eq!(outcome.content, content);
        assert_eq!(outcome.lines_changed, 0);
        assert!(usage.is_empty());
    }

    #[test]
    fn test_collapse_literals() {
        assert_eq!(collapse_literals("_UxGT(\"A\") _UxGT(\"B\")"), "_UxGT(\"AB\")");
        assert_eq!(
            collapse_literals("_UxGT(\"Ex\") _UxGT(\"tru\")  _UxGT(\"der\")"),
            "_UxGT(\"Extruder\")"
        );
        assert_eq!(
            collapse_literals("_UxGT(\"a\\\"b\") _UxGT(\"c\")"),
            "_UxGT(\"a\\\"bc\")"
        );
    }

    #[test]
    fn test_collapse_leaves_separated_literals() {
        let value = "_UxGT(\"Move\") \" \" _UxGT(\"E\")";
        assert!(matches!(collapse_literals(value), Cow::Borrowed(_)));
    }

    #[test]
    fn test_collapse_in_rewritten_line() {
        let symbols = SymbolTable::new();
        let rewriter = TranslationRewriter::new(&symbols, "GET_TEXT");
        let mut usage = UsageSet::new();

        let out = rewriter
            .rewrite_line("#define MSG_X _UxGT(\"Lin\") _UxGT(\"ear\")\n", &mut usage)
            .unwrap();
        assert_eq!(out, "PROGMEM Language_Str MSG_X = _UxGT(\"Linear\");\n");
    }
}
