//! Saving CSV documents.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::errors::AppError;

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";
pub const DEFAULT_FILENAME: &str = "export.csv";

/// An encoded CSV file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl CsvDocument {
    /// Wrap encoded text. A missing or blank filename becomes `export.csv`.
    pub fn new(text: String, filename: Option<&str>) -> Self {
        let filename = filename
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();

        Self {
            filename,
            mime: CSV_MIME_TYPE,
            bytes: text.into_bytes(),
        }
    }

    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// Where documents go when the user exports.
pub trait Downloader {
    /// Save the document and return where it landed.
    fn save(&self, document: &CsvDocument) -> Result<PathBuf, AppError>;
}

/// Saves into a directory.
///
/// Bytes go to a temp file in the target directory first, which is then renamed into
/// place. The temp file is removed if anything fails before the rename.
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Keep only the final path component and replace characters that are unsafe in filenames.
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned
    }
}

impl Downloader for DirectoryDownloader {
    fn save(&self, document: &CsvDocument) -> Result<PathBuf, AppError> {
        std::fs::create_dir_all(&self.dir)?;
        let target = self.dir.join(sanitize_filename(&document.filename));

        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(&document.bytes)?;
        temp.flush()?;
        temp.persist(&target).map_err(|e| AppError::from(e.error))?;

        tracing::info!(
            "Exported {} bytes ({}) to {:?}",
            document.bytes.len(),
            document.mime,
            target
        );
        Ok(target)
    }
}
