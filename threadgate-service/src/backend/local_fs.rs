use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};

use super::common::{Backend, BackendError, BackendResult};

/// Distinguishes temporary files of concurrent writes within this process.
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// A storage area persisted as one file per key in a directory.
///
/// Values survive process restarts, which makes this the backend for local storage.
#[derive(Debug)]
pub struct LocalFsBackend {
    path: PathBuf,
}

impl LocalFsBackend {
    /// Creates a backend rooted at `path`. The directory is created on first write.
    pub fn new(path: &Path) -> Self {
        Self { path: path.into() }
    }

    fn item_path(&self, key: &str) -> BackendResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(BackendError::InvalidKey(key.to_owned()));
        }

        Ok(self.path.join(format!("{key}.json")))
    }
}

#[async_trait::async_trait]
impl Backend for LocalFsBackend {
    fn name(&self) -> &'static str {
        "local-fs"
    }

    async fn get_item(&self, key: &str) -> BackendResult<Option<String>> {
        let path = self.item_path(key)?;
        match tokio::fs::read_to_string(path).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> BackendResult<()> {
        let path = self.item_path(key)?;
        tokio::fs::create_dir_all(&self.path).await?;

        // Every write gets its own temporary file next to the target. Concurrent writes of the
        // same key race on the final rename, and the last one wins.
        let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp_path = path.with_extension(format!("json.{}.{seq}.tmp", std::process::id()));

        let written = async {
            write_synced(&tmp_path, value).await?;
            tokio::fs::rename(&tmp_path, &path).await
        };

        if let Err(err) = written.await {
            tokio::fs::remove_file(&tmp_path).await.ok();
            return Err(err.into());
        }

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> BackendResult<()> {
        let path = self.item_path(key)?;
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

async fn write_synced(path: &Path, value: &str) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;

    let mut writer = BufWriter::new(file);
    writer.write_all(value.as_bytes()).await?;
    writer.flush().await?;
    writer.into_inner().sync_data().await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn persists_across_instances() {
        let tempdir = tempfile::tempdir().unwrap();

        let backend = LocalFsBackend::new(tempdir.path());
        backend.set_item("instagramAuth", "{}").await.unwrap();
        drop(backend);

        let backend = LocalFsBackend::new(tempdir.path());
        assert_eq!(
            backend.get_item("instagramAuth").await.unwrap().as_deref(),
            Some("{}")
        );
    }

    #[tokio::test]
    async fn remove_missing_is_ok() {
        let tempdir = tempfile::tempdir().unwrap();
        let backend = LocalFsBackend::new(&tempdir.path().join("nested"));

        backend.remove_item("nothing").await.unwrap();
        assert_eq!(backend.get_item("nothing").await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_of_one_key_all_succeed() {
        let tempdir = tempfile::tempdir().unwrap();
        let backend = Arc::new(LocalFsBackend::new(tempdir.path()));

        let writes: Vec<_> = (0..64)
            .map(|i| {
                let backend = Arc::clone(&backend);
                tokio::spawn(async move {
                    backend
                        .set_item("instagramAuth", &format!("{{\"n\":{i}}}"))
                        .await
                })
            })
            .collect();

        for write in writes {
            write.await.unwrap().unwrap();
        }

        let stored = backend.get_item("instagramAuth").await.unwrap().unwrap();
        assert!(stored.starts_with("{\"n\":"));

        let mut entries = std::fs::read_dir(tempdir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect::<Vec<_>>();
        entries.sort();
        assert_eq!(entries, [std::ffi::OsString::from("instagramAuth.json")]);
    }

    #[tokio::test]
    async fn failed_write_leaves_no_temporary_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let backend = LocalFsBackend::new(tempdir.path());

        // A directory in place of the target makes the final rename fail.
        std::fs::create_dir(tempdir.path().join("instagramAuth.json")).unwrap();
        std::fs::write(tempdir.path().join("instagramAuth.json").join("blocker"), "x").unwrap();

        let err = backend.set_item("instagramAuth", "{}").await.unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));

        let entries = std::fs::read_dir(tempdir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn rejects_path_like_keys() {
        let tempdir = tempfile::tempdir().unwrap();
        let backend = LocalFsBackend::new(tempdir.path());

        let err = backend.set_item("../escape", "x").await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidKey(_)));
    }
}
