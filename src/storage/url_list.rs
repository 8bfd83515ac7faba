//! Plain-text URL list
//!
//! One URL per line, newline terminated. The collector truncates the list at
//! the start of a run and appends every terminal batch; the fetcher reads it
//! back in order.

use crate::crawler::UrlSink;
use crate::storage::traits::{StorageError, StorageResult};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// The URL list file for one (site, project) pair
#[derive(Debug, Clone)]
pub struct UrlListStore {
    path: PathBuf,
}

impl UrlListStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Empties the list, creating it and its directories if needed
    pub fn reset(&mut self) -> StorageResult<()> {
        self.ensure_parent()?;
        File::create(&self.path)?;
        Ok(())
    }

    /// Appends `urls`, one per line
    pub fn write(&mut self, urls: &[String]) -> StorageResult<()> {
        self.ensure_parent()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        for url in urls {
            writeln!(writer, "{}", url)?;
        }
        writer.flush()?;

        tracing::debug!("Appended {} URLs to {}", urls.len(), self.path.display());
        Ok(())
    }

    /// Reads the list back in file order, skipping blank lines
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - The listed URLs
    /// * `Err(StorageError::UrlListNotFound)` - The file does not exist
    /// * `Err(StorageError::Io)` - Reading failed
    pub fn read(&self) -> StorageResult<Vec<String>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::UrlListNotFound(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut urls = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            let url = line.trim_end_matches(['\r', '\n']);
            if !url.trim().is_empty() {
                urls.push(url.to_string());
            }
        }

        Ok(urls)
    }

    fn ensure_parent(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl UrlSink for UrlListStore {
    fn append(&mut self, batch: &[String]) -> Result<(), StorageError> {
        self.write(batch)
    }
}
