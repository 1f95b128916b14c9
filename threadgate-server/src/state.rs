use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use threadgate_service::authenticator::MockAuthenticator;
use threadgate_service::oauth::OAuthClient;
use threadgate_service::selector::PermissionSelector;
use threadgate_service::{ClientService, ClientStorage};

use crate::config::Config;

/// Shared reference to the threadgate [services](Services).
pub type ServiceState = Arc<Services>;

/// Reference to the threadgate business logic.
///
/// This structure is created during server startup and shared with all HTTP request handlers. It
/// holds the client service and the in-progress permission selection of the single demo user.
///
/// In request handlers, use `axum::extract::State<ServiceState>` to retrieve a shared reference to
/// this structure.
#[derive(Debug)]
pub struct Services {
    /// The server configuration.
    pub config: Config,
    /// The client service instance.
    pub client: ClientService,
    selector: Mutex<PermissionSelector>,
}

impl Services {
    /// Creates all services from the configuration.
    pub fn spawn(config: Config) -> ServiceState {
        let storage = ClientStorage::new(
            config.local_storage.as_service_config(),
            config.session_storage.as_service_config(),
        );
        let client = ClientService::new(
            storage,
            MockAuthenticator::new(config.login.delay),
            OAuthClient::new(config.oauth.to_settings()),
            config.login.callback_delay,
        );

        Arc::new(Self {
            config,
            client,
            selector: Mutex::new(PermissionSelector::new()),
        })
    }

    /// Locks the in-progress permission selection.
    ///
    /// The guard must not be held across an `.await`.
    pub fn selector(&self) -> MutexGuard<'_, PermissionSelector> {
        self.selector.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
