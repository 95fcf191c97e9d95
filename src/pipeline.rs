//! File-level passes
//!
//! `run_fallback` learns the reference symbols, rewrites each translation
//! file and, when enabled, the code files. `run_expand` applies the suffix
//! expansion to each configured language file. Files are processed one at a
//! time and the first error aborts the run.

use crate::config::Config;
use crate::error::{AppResult, FileResult};
use crate::expand::SuffixExpander;
use crate::file_handler::{collect_source_files, read_text_file, ScanConfig, StagedRewrite};
use crate::rewrite::{RewriteOutcome, SourceRewriter, TranslationRewriter};
use crate::symbols::{SymbolTable, UsageSet};
use std::path::{Path, PathBuf};

/// Options shared by both passes
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Directory all configured paths are relative to
    pub root: PathBuf,
    /// Run the code rewrite even if the configuration leaves it off
    pub rewrite_sources: bool,
    /// Compute everything but leave files untouched
    pub dry_run: bool,
}

/// Totals of a fallback run
#[derive(Debug, Clone, Default)]
pub struct FallbackSummary {
    pub symbols_learned: usize,
    pub language_files: usize,
    pub source_files: usize,
    pub files_changed: usize,
    pub lines_changed: usize,
    /// Reference symbols never looked up, in reference-file order
    pub unused: Vec<String>,
}

/// Totals of an expansion run
#[derive(Debug, Clone, Default)]
pub struct ExpandSummary {
    pub language_files: usize,
    pub files_changed: usize,
    pub definitions_expanded: usize,
}

/// Learn the symbol table from the reference language file
pub fn load_reference(path: &Path) -> FileResult<SymbolTable> {
    let file = read_text_file(path)?;
    let symbols = SymbolTable::learn(&file.content);
    if symbols.is_empty() {
        log::warn!("{} defines no message symbols", path.display());
    } else {
        log::info!("Learned {} symbol(s) from {}", symbols.len(), path.display());
    }
    Ok(symbols)
}

/// Reference loader, translation rewrite, optional code rewrite
pub fn run_fallback(config: &Config, options: &RunOptions) -> AppResult<FallbackSummary> {
    let symbols = load_reference(&config.reference_file(&options.root))?;
    let mut usage = UsageSet::new();
    let mut summary = FallbackSummary {
        symbols_learned: symbols.len(),
        ..FallbackSummary::default()
    };

    let translator = TranslationRewriter::new(&symbols, &config.lookup_macro);
    for code in &config.languages {
        let path = config.language_file(&options.root, code);
        let outcome = rewrite_file(&path, options.dry_run, |content| {
            translator.rewrite_content(content, &mut usage)
        })?;
        summary.language_files += 1;
        summary.tally(&outcome);
    }

    if config.source.enabled || options.rewrite_sources {
        let rewriter = SourceRewriter::new(config, &symbols)?;
        let scan = ScanConfig::for_extensions(config.source.extensions.iter().cloned());
        let source_root = options.root.join(&config.source.root);

        for path in collect_source_files(&source_root, &scan)? {
            let outcome = rewrite_file(&path, options.dry_run, |content| {
                rewriter.rewrite_content(content, &mut usage)
            })?;
            summary.source_files += 1;
            summary.tally(&outcome);
        }
    } else {
        log::debug!("Source rewrite disabled");
    }

    log::debug!("{} distinct symbol(s) looked up", usage.len());
    summary.unused = symbols.unused(&usage).map(str::to_string).collect();
    Ok(summary)
}

/// Suffix expansion over every configured language
pub fn run_expand(config: &Config, options: &RunOptions) -> AppResult<ExpandSummary> {
    let expander = SuffixExpander::new(&config.expansion);
    let mut summary = ExpandSummary::default();

    for code in &config.expansion.languages {
        let path = config.language_file(&options.root, code);
        let outcome = rewrite_file(&path, options.dry_run, |content| {
            expander.expand_content(content)
        })?;
        summary.language_files += 1;
        if outcome.is_changed() {
            summary.files_changed += 1;
            summary.definitions_expanded += outcome.lines_changed;
        }
    }

    Ok(summary)
}

impl FallbackSummary {
    fn tally(&mut self, outcome: &RewriteOutcome) {
        if outcome.is_changed() {
            self.files_changed += 1;
            self.lines_changed += outcome.lines_changed;
        }
    }
}

/// Rewrite one file in place through a staged rewrite
///
/// Files whose content comes out unchanged are not touched.
fn rewrite_file<F>(path: &Path, dry_run: bool, transform: F) -> FileResult<RewriteOutcome>
where
    F: FnOnce(&str) -> RewriteOutcome,
{
    let file = read_text_file(path)?;
    let outcome = transform(&file.content);

    if !outcome.is_changed() {
        log::debug!("{}: no changes", path.display());
        return Ok(outcome);
    }

    if dry_run {
        log::info!(
            "{}: {} line(s) would change",
            path.display(),
            outcome.lines_changed
        );
        return Ok(outcome);
    }

    let staged = StagedRewrite::begin(path)?;
    staged.commit(&file.encode(&outcome.content))?;
    log::info!("{}: rewrote {} line(s)", path.display(), outcome.lines_changed);
    Ok(outcome)
}
