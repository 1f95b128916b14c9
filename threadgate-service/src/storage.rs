//! Typed access to the two client storage areas.
//!
//! The client keeps exactly two records:
//!
//!  - [`CREDENTIAL_KEY`] in *local* storage, holding the JSON [`CredentialRecord`]. It survives
//!    restarts and is removed on logout.
//!  - [`SELECTION_KEY`] in *session* storage, holding the confirmed scopes as a JSON array. It only
//!    lives as long as the session.

use std::path::Path;

use threadgate_types::{CredentialRecord, PermissionSet};

use crate::backend::{BoxedBackend, InMemoryBackend, LocalFsBackend};
use crate::error::{Result, ServiceError};
use crate::selector::SelectionError;

/// Local storage key of the credential record.
pub const CREDENTIAL_KEY: &str = "instagramAuth";

/// Session storage key of the confirmed permission selection.
pub const SELECTION_KEY: &str = "selectedPermissions";

/// Configuration to initialize one storage area of [`ClientStorage`].
#[derive(Debug, Clone, Copy)]
pub enum StorageConfig<'a> {
    /// Persist values as files below the given directory.
    FileSystem {
        /// The directory where values will be stored.
        path: &'a Path,
    },
    /// Keep values in memory for the lifetime of the process.
    Memory,
}

impl StorageConfig<'_> {
    fn into_backend(self, name: &'static str) -> BoxedBackend {
        match self {
            StorageConfig::FileSystem { path } => Box::new(LocalFsBackend::new(path)),
            StorageConfig::Memory => Box::new(InMemoryBackend::new(name)),
        }
    }
}

/// The local and session storage areas of the client.
#[derive(Debug)]
pub struct ClientStorage {
    local: BoxedBackend,
    session: BoxedBackend,
}

impl ClientStorage {
    /// Creates storage from configuration.
    pub fn new(local: StorageConfig<'_>, session: StorageConfig<'_>) -> Self {
        Self::from_backends(local.into_backend("local"), session.into_backend("session"))
    }

    /// Creates storage from existing backends.
    pub fn from_backends(local: BoxedBackend, session: BoxedBackend) -> Self {
        Self { local, session }
    }

    /// Reads the stored credential.
    ///
    /// A record that cannot be parsed is logged and reported as absent, so the session gate routes
    /// the user through the login flow again instead of failing.
    pub async fn load_credential(&self) -> Result<Option<CredentialRecord>> {
        let Some(raw) = self.local.get_item(CREDENTIAL_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(error) => {
                tracing::warn!(
                    error = &error as &dyn std::error::Error,
                    backend = self.local.name(),
                    "discarding unreadable credential record"
                );
                Ok(None)
            }
        }
    }

    /// Writes the credential, replacing any previous one.
    pub async fn save_credential(&self, record: &CredentialRecord) -> Result<()> {
        let raw = serde_json::to_string(record)
            .map_err(|cause| ServiceError::serde("serializing credential record", cause))?;
        self.local.set_item(CREDENTIAL_KEY, &raw).await?;
        Ok(())
    }

    /// Deletes the credential, if present.
    pub async fn clear_credential(&self) -> Result<()> {
        self.local.remove_item(CREDENTIAL_KEY).await?;
        Ok(())
    }

    /// Reads the permission selection handed over from the selector.
    ///
    /// A missing selection is `None`. A selection that is present but cannot be parsed, including
    /// one listing only part of the required group, is rejected with
    /// [`SelectionError::Unreadable`] and stays in place until a new selection is confirmed.
    pub async fn load_selection(&self) -> Result<Option<PermissionSet>> {
        let Some(raw) = self.session.get_item(SELECTION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(selection) => Ok(Some(selection)),
            Err(error) => {
                tracing::warn!(
                    error = &error as &dyn std::error::Error,
                    backend = self.session.name(),
                    "rejecting unreadable permission selection"
                );
                Err(SelectionError::Unreadable.into())
            }
        }
    }

    /// Writes the permission selection.
    pub async fn save_selection(&self, selection: &PermissionSet) -> Result<()> {
        let raw = serde_json::to_string(selection)
            .map_err(|cause| ServiceError::serde("serializing permission selection", cause))?;
        self.session.set_item(SELECTION_KEY, &raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use threadgate_types::Scope;

    use super::*;

    fn memory_storage() -> (ClientStorage, InMemoryBackend, InMemoryBackend) {
        let local = InMemoryBackend::new("local");
        let session = InMemoryBackend::new("session");
        let storage =
            ClientStorage::from_backends(Box::new(local.clone()), Box::new(session.clone()));
        (storage, local, session)
    }

    #[tokio::test]
    async fn credential_round_trip_and_clear() {
        let (storage, local, _session) = memory_storage();
        let record = CredentialRecord::demo(PermissionSet::all(), SystemTime::now());

        storage.save_credential(&record).await.unwrap();
        assert!(local.contains(CREDENTIAL_KEY));
        assert_eq!(storage.load_credential().await.unwrap(), Some(record));

        storage.clear_credential().await.unwrap();
        assert_eq!(storage.load_credential().await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_credential_reads_as_absent() {
        let (storage, local, _session) = memory_storage();
        use crate::backend::Backend as _;
        local.set_item(CREDENTIAL_KEY, "{not json").await.unwrap();

        assert_eq!(storage.load_credential().await.unwrap(), None);
    }

    #[tokio::test]
    async fn unreadable_selection_is_rejected() {
        use crate::backend::Backend as _;

        for raw in ["[not json", r#"["threads_basic","user_profile"]"#] {
            let (storage, _local, session) = memory_storage();
            session.set_item(SELECTION_KEY, raw).await.unwrap();

            let err = storage.load_selection().await.unwrap_err();
            assert!(matches!(
                err,
                ServiceError::Selection(SelectionError::Unreadable)
            ));
            assert!(session.contains(SELECTION_KEY));
        }
    }

    #[tokio::test]
    async fn selection_is_stored_as_json_array() {
        let (storage, _local, session) = memory_storage();
        let mut selection = PermissionSet::all();
        selection.toggle(Scope::UserProfile);

        storage.save_selection(&selection).await.unwrap();
        assert_eq!(
            session.get_stored(SELECTION_KEY).as_deref(),
            Some(r#"["user_media","threads_basic","threads_read_replies","threads_keyword_search"]"#)
        );
        assert_eq!(storage.load_selection().await.unwrap(), Some(selection));
    }

    #[tokio::test]
    async fn filesystem_credential_survives_restart() {
        let tempdir = tempfile::tempdir().unwrap();
        let config = StorageConfig::FileSystem {
            path: tempdir.path(),
        };
        let record = CredentialRecord::demo(PermissionSet::required_only(), SystemTime::now());

        let storage = ClientStorage::new(config, StorageConfig::Memory);
        storage.save_credential(&record).await.unwrap();
        drop(storage);

        let storage = ClientStorage::new(config, StorageConfig::Memory);
        assert_eq!(storage.load_credential().await.unwrap(), Some(record));
        assert_eq!(storage.load_selection().await.unwrap(), None);
    }
}
