//! Content-addressed page cache
//!
//! Every successfully fetched body is written to `<root>/<sha256(url)>.html`.
//! Re-fetching a URL replaces its file.

use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Hex SHA-256 digest of `url`
pub fn url_hash(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

/// Directory of cached page bodies
#[derive(Debug, Clone)]
pub struct PageCache {
    root: PathBuf,
}

impl PageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where the body for `url` is (or would be) cached
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.root.join(format!("{}.html", url_hash(url)))
    }

    /// Writes `body` for `url`, overwriting any previous copy
    pub fn store(&self, url: &str, body: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(url);
        fs::write(&path, body)?;
        tracing::trace!("Cached {} at {}", url, path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_url_hash_is_sha256_hex() {
        assert_eq!(
            url_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(url_hash("http://a/1").len(), 64);
        assert_ne!(url_hash("http://a/1"), url_hash("http://a/2"));
    }

    #[test]
    fn test_path_for_uses_hash() {
        let cache = PageCache::new("/tmp/cache");
        let path = cache.path_for("http://a/1");
        assert_eq!(path.parent().unwrap(), Path::new("/tmp/cache"));
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("{}.html", url_hash("http://a/1"))
        );
    }

    #[test]
    fn test_store_creates_dir_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let cache = PageCache::new(dir.path().join("cache"));

        let first = cache.store("http://a/1", b"<p>one</p>").unwrap();
        let second = cache.store("http://a/1", b"<p>two</p>").unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second).unwrap(), "<p>two</p>");
    }
}
