//! The client service tying storage, login and the session gate together.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use threadgate_types::{CredentialRecord, PermissionSet};

use crate::authenticator::MockAuthenticator;
use crate::error::Result;
use crate::gate::{GateOutcome, SessionGate};
use crate::oauth::OAuthClient;
use crate::route::Route;
use crate::selector::{PermissionSelector, SelectionError};
use crate::storage::ClientStorage;

/// Default cosmetic delay before a locally completed callback navigates on.
pub const DEFAULT_CALLBACK_DELAY: Duration = Duration::from_secs(1);

/// Query parameters of the OAuth redirect.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct CallbackParams {
    /// The authorization code.
    pub code: Option<String>,
    /// Opaque state echoed by the provider.
    pub state: Option<String>,
}

/// High-level entry point of the demo client.
///
/// Cloning is cheap; all clones share the same storage.
#[derive(Clone, Debug)]
pub struct ClientService(Arc<ClientServiceInner>);

#[derive(Debug)]
struct ClientServiceInner {
    storage: ClientStorage,
    authenticator: MockAuthenticator,
    oauth: OAuthClient,
    callback_delay: Duration,
}

impl ClientService {
    /// Creates the service.
    pub fn new(
        storage: ClientStorage,
        authenticator: MockAuthenticator,
        oauth: OAuthClient,
        callback_delay: Duration,
    ) -> Self {
        Self(Arc::new(ClientServiceInner {
            storage,
            authenticator,
            oauth,
            callback_delay,
        }))
    }

    /// Returns the storage areas.
    pub fn storage(&self) -> &ClientStorage {
        &self.0.storage
    }

    /// Returns the OAuth client.
    pub fn oauth(&self) -> &OAuthClient {
        &self.0.oauth
    }

    /// Confirms a selection and returns the next screen.
    pub async fn confirm_selection(&self, selector: &PermissionSelector) -> Result<Route> {
        selector.confirm(&self.0.storage).await?;
        Ok(Route::Login)
    }

    /// The selection handed over from the selector.
    ///
    /// Without a confirmed selection, for example when the user skipped the selector, the full
    /// catalog is requested. An unreadable selection is an error, never the full catalog.
    pub async fn pending_selection(&self) -> Result<PermissionSet> {
        let selection = self.0.storage.load_selection().await?;
        Ok(selection.unwrap_or_else(PermissionSet::all))
    }

    /// Performs a mock login with the pending selection.
    pub async fn login(&self) -> Result<CredentialRecord> {
        let permissions = self.pending_selection().await?;
        self.0.authenticator.login(&self.0.storage, permissions).await
    }

    /// Enters the main screen.
    pub async fn enter(&self, search: Option<&str>) -> Result<GateOutcome> {
        SessionGate.enter(&self.0.storage, search).await
    }

    /// Logs out and returns the next screen.
    pub async fn logout(&self) -> Result<Route> {
        SessionGate.logout(&self.0.storage).await
    }

    /// Handles the OAuth redirect and returns the next screen.
    ///
    /// Without a code, the user goes back to login. With a token-exchange backend configured, the
    /// code is exchanged and the resulting credential stored; any failure is logged and leads back
    /// to login. Without a backend, the callback completes after a cosmetic delay.
    pub async fn complete_callback(&self, params: CallbackParams) -> Route {
        let Some(code) = params.code.filter(|code| !code.is_empty()) else {
            tracing::error!("authorization code not found");
            return Route::Login;
        };

        if !self.0.oauth.has_token_backend() {
            tracing::debug!(state = ?params.state, "completing callback without token exchange");
            if !self.0.callback_delay.is_zero() {
                tokio::time::sleep(self.0.callback_delay).await;
            }
            return Route::Main;
        }

        match self.exchange_and_store(&code).await {
            Ok(record) => {
                tracing::info!(user = %record.user.username, "stored exchanged credential");
                Route::Main
            }
            Err(error) => {
                tracing::error!(
                    error = &error as &dyn std::error::Error,
                    "failed to get access token"
                );
                Route::Login
            }
        }
    }

    async fn exchange_and_store(&self, code: &str) -> Result<CredentialRecord> {
        let permissions = self.pending_selection().await?;
        if !permissions.has_required() {
            return Err(SelectionError::MissingRequired.into());
        }

        let response = self.0.oauth.exchange_code(code).await?;

        let record = CredentialRecord::issued(
            response.access_token,
            response.user,
            permissions,
            SystemTime::now(),
        );
        self.0.storage.save_credential(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use threadgate_types::Scope;

    use super::*;
    use crate::backend::{Backend as _, InMemoryBackend};
    use crate::error::ServiceError;
    use crate::oauth::OAuthSettings;
    use crate::storage::SELECTION_KEY;

    fn service(backend_api: Option<String>) -> ClientService {
        service_with_session(backend_api, InMemoryBackend::new("session"))
    }

    fn service_with_session(backend_api: Option<String>, session: InMemoryBackend) -> ClientService {
        let storage = ClientStorage::from_backends(
            Box::new(InMemoryBackend::new("local")),
            Box::new(session),
        );
        let oauth = OAuthClient::new(OAuthSettings {
            backend_api,
            ..Default::default()
        });
        ClientService::new(
            storage,
            MockAuthenticator::new(Duration::ZERO),
            oauth,
            Duration::ZERO,
        )
    }

    #[tokio::test]
    async fn login_without_selection_grants_catalog() {
        let service = service(None);
        let record = service.login().await.unwrap();
        assert_eq!(record.granted_permissions, PermissionSet::all());
    }

    #[tokio::test]
    async fn login_uses_confirmed_selection() {
        let service = service(None);
        let mut selector = PermissionSelector::new();
        selector.toggle(Scope::UserProfile);
        selector.toggle(Scope::UserMedia);

        assert_eq!(service.confirm_selection(&selector).await.unwrap(), Route::Login);
        let record = service.login().await.unwrap();

        assert_eq!(record.granted_permissions.len(), 3);
        assert!(!record.granted_permissions.contains(Scope::UserProfile));
        assert!(!record.granted_permissions.contains(Scope::UserMedia));
    }

    #[tokio::test]
    async fn unreadable_selection_grants_nothing() {
        let session = InMemoryBackend::new("session");
        let service = service_with_session(None, session.clone());
        session
            .set_item(SELECTION_KEY, r#"["threads_basic","user_profile"]"#)
            .await
            .unwrap();

        let err = service.login().await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Selection(SelectionError::Unreadable)
        ));
        assert_eq!(service.storage().load_credential().await.unwrap(), None);
    }

    #[tokio::test]
    async fn exchange_requires_required_group() {
        // The backend is never contacted, so nothing needs to listen on port 9.
        let service = service(Some("http://127.0.0.1:9/api".into()));
        service
            .storage()
            .save_selection(&PermissionSet::empty())
            .await
            .unwrap();

        let err = service.exchange_and_store("abc").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Selection(SelectionError::MissingRequired)
        ));
        assert_eq!(service.storage().load_credential().await.unwrap(), None);
    }

    #[tokio::test]
    async fn callback_without_code_goes_to_login() {
        let service = service(None);
        let route = service
            .complete_callback(CallbackParams {
                code: None,
                state: Some("xyz".into()),
            })
            .await;
        assert_eq!(route, Route::Login);
    }

    #[tokio::test]
    async fn callback_without_backend_goes_to_main() {
        let service = service(None);
        let route = service
            .complete_callback(CallbackParams {
                code: Some("abc".into()),
                state: None,
            })
            .await;
        assert_eq!(route, Route::Main);
    }

    #[tokio::test]
    async fn failed_exchange_goes_to_login() {
        // Nothing listens on port 9 of localhost.
        let service = service(Some("http://127.0.0.1:9/api".into()));
        let route = service
            .complete_callback(CallbackParams {
                code: Some("abc".into()),
                state: None,
            })
            .await;

        assert_eq!(route, Route::Login);
        assert_eq!(service.storage().load_credential().await.unwrap(), None);
    }
}
