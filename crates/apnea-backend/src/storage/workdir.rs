//! Upload directory layout
//!
//! ```text
//! <upload_dir>/<name>                    uploaded recording
//! <upload_dir>/fixed/fixed_<name>        header-repaired copy
//! <upload_dir>/ascii/<name>.ascii        converted signal
//! ```
//!
//! Two uploads with the same name share these paths; the later one wins.

use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::error::{Error, Result};

/// Keep only the final path component of a client-supplied file name.
///
/// Both `/` and `\` count as separators so Windows-style names from browsers
/// cannot escape the upload directory either.
pub fn sanitize_filename(raw: &str) -> Result<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    if base.is_empty() || base == "." || base == ".." {
        return Err(Error::InvalidFilename(raw.to_string()));
    }

    Ok(base.to_string())
}

/// Resolves and creates the paths a job works with
#[derive(Debug, Clone)]
pub struct WorkDir {
    root: PathBuf,
    fixed_dir: PathBuf,
    fixed_prefix: String,
    ascii_dir: PathBuf,
    ascii_suffix: String,
}

impl WorkDir {
    pub fn new(config: &StorageConfig) -> Self {
        let root = config.upload_dir.clone();
        Self {
            fixed_dir: root.join(&config.fixed_subdir),
            ascii_dir: root.join(&config.ascii_subdir),
            fixed_prefix: config.fixed_prefix.clone(),
            ascii_suffix: config.ascii_suffix.clone(),
            root,
        }
    }

    /// Upload directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where an upload named `filename` is stored
    pub fn upload_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Output of the header-repair stage
    pub fn fixed_path(&self, filename: &str) -> PathBuf {
        self.fixed_dir
            .join(format!("{}{}", self.fixed_prefix, filename))
    }

    /// Output of the conversion stage
    pub fn ascii_path(&self, filename: &str) -> PathBuf {
        self.ascii_dir
            .join(format!("{}{}", filename, self.ascii_suffix))
    }

    /// Persist uploaded bytes, creating the upload directory if needed
    pub async fn save_upload(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| Error::storage("Unable to create uploads directory", e))?;

        let path = self.upload_path(filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| Error::storage("Unable to save file", e))?;

        Ok(path)
    }

    /// Make sure the repaired-file directory exists
    pub async fn ensure_fixed_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.fixed_dir).await
    }

    /// Make sure the ASCII directory exists
    pub async fn ensure_ascii_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.ascii_dir).await
    }
}
