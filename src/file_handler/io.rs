//! File I/O for in-place rewrites
//!
//! Provides:
//! - UTF-8 reading with byte order mark detection
//! - Staged rewrites that keep the original as `<file>.saved` until the new
//!   content is fully on disk

use crate::error::{FileError, FileResult};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix appended to a file while it is being rewritten
pub const STAGING_SUFFIX: &str = ".saved";

const UTF8_BOM: &str = "\u{FEFF}";

/// Detected encoding of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileEncoding {
    /// UTF-8 without BOM
    #[default]
    Utf8,
    /// UTF-8 with BOM
    Utf8Bom,
}

/// Text content of a file
#[derive(Debug, Clone)]
pub struct TextFile {
    /// The file content, without any BOM
    pub content: String,
    /// Detected encoding
    pub encoding: FileEncoding,
}

impl TextFile {
    /// Produce file content for `text` in this file's encoding
    pub fn encode(&self, text: &str) -> String {
        match self.encoding {
            FileEncoding::Utf8 => text.to_string(),
            FileEncoding::Utf8Bom => format!("{}{}", UTF8_BOM, text),
        }
    }
}

/// Read a UTF-8 text file
pub fn read_text_file(path: impl AsRef<Path>) -> FileResult<TextFile> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(FileError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|e| FileError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let text = String::from_utf8(bytes).map_err(|_| FileError::EncodingError {
        path: path.to_path_buf(),
    })?;

    Ok(match text.strip_prefix(UTF8_BOM) {
        Some(rest) => TextFile {
            content: rest.to_string(),
            encoding: FileEncoding::Utf8Bom,
        },
        None => TextFile {
            content: text,
            encoding: FileEncoding::Utf8,
        },
    })
}

/// Path a file is moved to while it is being rewritten
pub fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_os_string();
    staged.push(STAGING_SUFFIX);
    PathBuf::from(staged)
}

/// An in-progress rewrite of one file
///
/// `begin` moves the original aside. `commit` writes the replacement and only
/// then deletes the staged original. A rewrite that is dropped without being
/// committed leaves the staged original on disk.
#[derive(Debug)]
pub struct StagedRewrite {
    path: PathBuf,
    staged: PathBuf,
    finished: bool,
}

impl StagedRewrite {
    /// Move `path` aside to its staging path
    pub fn begin(path: impl AsRef<Path>) -> FileResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(FileError::NotFound(path));
        }

        let staged = staging_path(&path);
        std::fs::rename(&path, &staged).map_err(|e| FileError::StagingError {
            path: path.clone(),
            staged: staged.clone(),
            source: e,
        })?;
        log::trace!("Staged {} as {}", path.display(), staged.display());

        Ok(Self {
            path,
            staged,
            finished: false,
        })
    }

    /// Where the original currently lives
    pub fn staged_path(&self) -> &Path {
        &self.staged
    }

    /// Write the new content, then drop the staged original
    pub fn commit(mut self, content: &str) -> FileResult<()> {
        let write_result = (|| {
            let mut file = std::fs::File::create(&self.path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;
            file.sync_all()?;
            Ok::<(), std::io::Error>(())
        })();

        if let Err(e) = write_result {
            return Err(FileError::WriteError {
                path: self.path.clone(),
                source: e,
            });
        }

        self.finished = true;
        std::fs::remove_file(&self.staged).map_err(|e| FileError::CleanupError {
            path: self.path.clone(),
            staged: self.staged.clone(),
            source: e,
        })
    }
}

impl Drop for StagedRewrite {
    fn drop(&mut self) {
        if !self.finished {
            log::warn!(
                "Rewrite of {} did not complete; original kept at {}",
                self.path.display(),
                self.staged.display()
            );
        }
    }
}
