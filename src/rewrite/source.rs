//! Rewrite of message references in code files
//!
//! Not part of the default `fallback` run; enabled with `--rewrite-sources`
//! or `source.enabled` in the configuration.

use super::RewriteOutcome;
use crate::config::{Config, Substitution};
use crate::definition::symbol_regex;
use crate::error::{ConfigError, ConfigResult};
use crate::symbols::{SymbolTable, UsageSet};
use regex::Regex;

/// Replaces bare message symbols in code with lookup macro calls
#[derive(Debug, Clone)]
pub struct SourceRewriter<'a> {
    symbols: &'a SymbolTable,
    substitutions: &'a [Substitution],
    lookup_macro: &'a str,
    nested: Vec<(Regex, String)>,
}

impl<'a> SourceRewriter<'a> {
    pub fn new(config: &'a Config, symbols: &'a SymbolTable) -> ConfigResult<Self> {
        let lookup = regex::escape(&config.lookup_macro);
        let rules = [
            (format!(r"\b{0}\({0}\((.*?)\)\)", lookup), format!("{}(${{1}})", config.lookup_macro)),
            (format!(r"\bPSTR\({}\((.*?)\)\)", lookup), format!("{}(${{1}})", config.lookup_macro)),
            (format!(r"\b_UxGT\({}\((.*?)\)\)", lookup), format!("{}(${{1}})", config.lookup_macro)),
            (format!(r"\bF\({}\((.*?)\)\)", lookup), format!("{}_F(${{1}})", config.lookup_macro)),
        ];

        let nested = rules
            .into_iter()
            .map(|(pattern, replacement)| {
                Regex::new(&pattern)
                    .map(|re| (re, replacement))
                    .map_err(|e| ConfigError::InvalidValue {
                        key: "lookup_macro".to_string(),
                        reason: e.to_string(),
                    })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            symbols,
            substitutions: &config.source.substitutions,
            lookup_macro: &config.lookup_macro,
            nested,
        })
    }

    /// Rewrite a whole code file
    pub fn rewrite_content(&self, content: &str, usage: &mut UsageSet) -> RewriteOutcome {
        let mut outcome = RewriteOutcome::default();
        for line in content.split_inclusive('\n') {
            let new_line = self.rewrite_line(line, usage);
            if new_line != line {
                outcome.lines_changed += 1;
            }
            outcome.content.push_str(&new_line);
        }
        outcome
    }

    /// Rewrite one line of code
    ///
    /// The substitution table runs both before and after symbol wrapping so
    /// entries can target either form.
    pub fn rewrite_line(&self, line: &str, usage: &mut UsageSet) -> String {
        let line = self.apply_substitutions(line);
        let line = self.wrap_symbols(&line, usage);
        let line = self.apply_substitutions(&line);
        self.flatten_nested(&line)
    }

    /// Apply the literal substitution table in order
    pub fn apply_substitutions(&self, line: &str) -> String {
        self.substitutions
            .iter()
            .fold(line.to_string(), |acc, s| acc.replace(&s.from, &s.to))
    }

    fn wrap_symbols(&self, line: &str, usage: &mut UsageSet) -> String {
        symbol_regex()
            .replace_all(line, |caps: &regex::Captures| {
                let symbol = &caps[0];
                if self.symbols.contains(symbol) {
                    usage.mark(symbol);
                    format!("{}({})", self.lookup_macro, symbol)
                } else {
                    symbol.to_string()
                }
            })
            .into_owned()
    }

    /// Collapse redundant wrappers around lookup calls
    pub fn flatten_nested(&self, line: &str) -> String {
        self.nested
            .iter()
            .fold(line.to_string(), |acc, (re, replacement)| {
                re.replace_all(&acc, replacement.as_str()).into_owned()
            })
    }
}
