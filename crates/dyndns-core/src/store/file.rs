// # File Object Store
//
// Local-disk implementation of ObjectStore.
//
// ## Layout
//
// Objects are plain files under a root directory, one directory per bucket:
//
// ```text
// <root>/<bucket>/<key>
// ```
//
// This lets the daemon run against a config file on disk instead of S3.
// Keys containing `..` components are rejected so a bucket/key pair can
// never escape the root.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::Error;
use crate::traits::ObjectStore;

/// File-backed object store
///
/// # Example
///
/// ```rust,no_run
/// use dyndns_core::store::FileObjectStore;
/// use dyndns_core::traits::ObjectStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileObjectStore::new("/etc/dyndns");
///
///     // Reads /etc/dyndns/config/DynDNSConf.txt
///     let body = store.get_object("config", "DynDNSConf.txt").await?;
///     println!("{} bytes", body.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileObjectStore {
    root: PathBuf,
}

impl FileObjectStore {
    /// Create a store rooted at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an object would be read from
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, Error> {
        for part in [bucket, key] {
            let relative = Path::new(part);
            if part.is_empty()
                || relative
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_)))
            {
                return Err(Error::invalid_input(format!(
                    "Invalid object path component: '{}'",
                    part
                )));
            }
        }

        Ok(self.root.join(bucket).join(key))
    }
}

#[async_trait]
impl ObjectStore for FileObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, Error> {
        let path = self.object_path(bucket, key)?;
        tracing::debug!("Reading object from {}", path.display());

        Ok(fs::read(&path).await?)
    }

    fn store_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_object_under_bucket_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("cfg")).unwrap();
        std::fs::write(dir.path().join("cfg").join("DynDNSConf.txt"), b"{}").unwrap();

        let store = FileObjectStore::new(dir.path());
        let body = store.get_object("cfg", "DynDNSConf.txt").await.unwrap();
        assert_eq!(body, b"{}");
    }

    #[tokio::test]
    async fn test_missing_object_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = FileObjectStore::new(dir.path());

        let err = store.get_object("cfg", "missing.json").await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_rejects_path_escape() {
        let store = FileObjectStore::new("/srv/dyndns");

        assert!(store.object_path("cfg", "../../etc/passwd").is_err());
        assert!(store.object_path("..", "x").is_err());
        assert!(store.object_path("/abs", "x").is_err());
        assert!(store.object_path("", "x").is_err());
        assert_eq!(
            store.object_path("cfg", "nested/conf.json").unwrap(),
            PathBuf::from("/srv/dyndns/cfg/nested/conf.json")
        );
    }
}
