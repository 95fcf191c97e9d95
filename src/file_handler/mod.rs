//! File handler module for l10n-rewrite
//!
//! Handles all file system operations including:
//! - Reading language and source files as UTF-8 text
//! - Staged in-place rewrites with a `.saved` copy for recovery
//! - Source tree scanning for the code rewrite pass

pub mod io;
pub mod scanner;

pub use io::*;
pub use scanner::*;
