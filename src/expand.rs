//! Suffix expansion of one message into per-context variants
//!
//! For a base message such as `MSG_FILAMENTCHANGE` and suffixes `E1..E6`,
//! each matching definition is followed by
//!
//! ```text
//! PROGMEM Language_Str MSG_FILAMENTCHANGE_E1 = <value> " " MSG_E1;
//! ```
//!
//! An empty suffix keeps the original definition; without one the original
//! line is replaced by its variants.

use crate::config::{ExpansionConfig, Substitution, SYMBOL_PREFIX};
use crate::definition::Definition;
use crate::rewrite::RewriteOutcome;

/// Expands the definition of one base identifier
#[derive(Debug, Clone)]
pub struct SuffixExpander<'a> {
    base: &'a str,
    suffixes: &'a [String],
    aliases: &'a [Substitution],
}

impl<'a> SuffixExpander<'a> {
    pub fn new(config: &'a ExpansionConfig) -> Self {
        Self {
            base: &config.base,
            suffixes: &config.suffixes,
            aliases: &config.aliases,
        }
    }

    fn keeps_original(&self) -> bool {
        self.suffixes.iter().any(|s| s.is_empty())
    }

    /// Expand every matching definition in a language file
    pub fn expand_content(&self, content: &str) -> RewriteOutcome {
        let mut outcome = RewriteOutcome::default();
        for line in content.split_inclusive('\n') {
            let expanded = self.expand_line(line);
            if expanded != line {
                outcome.lines_changed += 1;
            }
            outcome.content.push_str(&expanded);
        }
        outcome
    }

    /// Expand one line; lines defining anything else are returned as-is
    pub fn expand_line(&self, line: &str) -> String {
        let Some(def) = Definition::parse_language_str(line) else {
            return line.to_string();
        };
        if def.identifier != self.base {
            return line.to_string();
        }

        let mut out = if self.keeps_original() {
            line.to_string()
        } else {
            String::new()
        };

        for suffix in self.suffixes.iter().filter(|s| !s.is_empty()) {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.variant(&def, suffix).render());
        }

        log::debug!("Expanded {} into {} variant(s)", def.identifier, self.suffix_count());
        out
    }

    fn suffix_count(&self) -> usize {
        self.suffixes.iter().filter(|s| !s.is_empty()).count()
    }

    /// Build the definition for one suffix
    fn variant(&self, def: &Definition, suffix: &str) -> Definition {
        let identifier = self.apply_aliases(format!("{}_{}", def.identifier, suffix));
        let growth = identifier
            .chars()
            .count()
            .saturating_sub(def.identifier.chars().count());

        Definition {
            identifier,
            spacing: shrink_spacing(&def.spacing, growth),
            value: format!("{} \" \" {}{}", def.value, SYMBOL_PREFIX, suffix),
            ..def.clone()
        }
    }

    fn apply_aliases(&self, identifier: String) -> String {
        self.aliases
            .iter()
            .fold(identifier, |acc, alias| acc.replace(&alias.from, &alias.to))
    }
}

/// Drop `by` characters of alignment padding, keeping at least one space
/// when there was any
fn shrink_spacing(spacing: &str, by: usize) -> String {
    let len = spacing.chars().count();
    let keep = len.saturating_sub(by).max(len.min(1));
    spacing.chars().take(keep).collect()
}
