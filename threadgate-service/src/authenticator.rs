//! Mock login that fabricates credentials locally.

use std::time::{Duration, SystemTime};

use threadgate_types::{CredentialRecord, PermissionSet};

use crate::error::Result;
use crate::selector::SelectionError;
use crate::storage::ClientStorage;

/// Default artificial delay before a mock login completes.
pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(500);

/// Issues demo credentials without contacting an authorization server.
///
/// A production deployment replaces this with a redirect to the provider's authorization endpoint
/// and a backend token exchange, see [`OAuthClient`](crate::oauth::OAuthClient).
#[derive(Clone, Debug)]
pub struct MockAuthenticator {
    delay: Duration,
}

impl Default for MockAuthenticator {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_DELAY)
    }
}

impl MockAuthenticator {
    /// Creates an authenticator that pauses for `delay` after storing the credential.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Stores a fabricated credential granting exactly `permissions`.
    ///
    /// Permission sets without the required group are rejected.
    pub async fn login(
        &self,
        storage: &ClientStorage,
        permissions: PermissionSet,
    ) -> Result<CredentialRecord> {
        if !permissions.has_required() {
            return Err(SelectionError::MissingRequired.into());
        }

        let record = CredentialRecord::demo(permissions, SystemTime::now());
        storage.save_credential(&record).await?;
        tracing::info!(
            user = %record.user.username,
            scopes = record.granted_permissions.len(),
            "issued demo credential"
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use threadgate_types::Scope;

    use super::*;
    use crate::backend::InMemoryBackend;
    use crate::error::ServiceError;

    fn storage() -> ClientStorage {
        ClientStorage::from_backends(
            Box::new(InMemoryBackend::new("local")),
            Box::new(InMemoryBackend::new("session")),
        )
    }

    #[tokio::test]
    async fn stored_permissions_equal_input() {
        let storage = storage();
        let mut permissions = PermissionSet::all();
        permissions.toggle(Scope::UserMedia);

        let record = MockAuthenticator::new(Duration::ZERO)
            .login(&storage, permissions.clone())
            .await
            .unwrap();
        assert!(record.token.starts_with("demo_access_token_"));

        let stored = storage.load_credential().await.unwrap().unwrap();
        assert_eq!(stored.granted_permissions, permissions);
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn rejects_sets_without_required_group() {
        let storage = storage();
        let permissions = PermissionSet::try_from(vec![Scope::UserProfile]).unwrap();

        let err = MockAuthenticator::new(Duration::ZERO)
            .login(&storage, permissions)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Selection(SelectionError::MissingRequired)
        ));
        assert_eq!(storage.load_credential().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_artificial_delay() {
        let storage = storage();
        let start = tokio::time::Instant::now();

        MockAuthenticator::default()
            .login(&storage, PermissionSet::all())
            .await
            .unwrap();
        assert!(start.elapsed() >= DEFAULT_LOGIN_DELAY);
    }
}
