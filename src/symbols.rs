//! Symbol table learned from the reference language file, and the set of
//! symbols the rewrite passes actually looked up.

use crate::definition::Definition;
use std::collections::{HashMap, HashSet};

/// Message identifier to reference text, in first-definition order
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn every definition in the given text
    pub fn learn(content: &str) -> Self {
        let mut table = Self::new();
        for line in content.split_inclusive('\n') {
            if let Some(def) = Definition::parse(line) {
                table.insert(def.identifier, def.value);
            }
        }
        table
    }

    /// Record a definition. A redefinition replaces the value but keeps
    /// the position of the first one.
    pub fn insert(&mut self, symbol: String, value: String) {
        match self.index.get(&symbol) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(symbol.clone(), self.entries.len());
                self.entries.push((symbol, value));
            }
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Reference text of a symbol
    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.index.get(symbol).map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Symbols in definition order
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    /// Symbols never recorded in `usage`, in definition order
    pub fn unused<'a>(&'a self, usage: &'a UsageSet) -> impl Iterator<Item = &'a str> + 'a {
        self.symbols().filter(move |s| !usage.contains(s))
    }
}

/// Symbols looked up while rewriting
#[derive(Debug, Clone, Default)]
pub struct UsageSet {
    used: HashSet<String>,
}

impl UsageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, symbol: &str) {
        if !self.used.contains(symbol) {
            self.used.insert(symbol.to_string());
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.used.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Format of the advisory line printed for an unused reference symbol
pub fn unused_warning(symbol: &str) -> String {
    format!("Warning: {} does not appear to be used anywhere", symbol)
}
