//! Request shapes of the real OAuth provider and token-exchange backend.
//!
//! The demo never talks to the provider's Graph API; the requests below only describe what a
//! production client would send. The one call that is actually performed is the authorization
//! code exchange against a configured backend, see [`OAuthClient::exchange_code`].

use reqwest::{Request, Url};
use serde::{Deserialize, Serialize};
use threadgate_types::{PermissionSet, UserProfile};

use crate::error::{Result, ServiceError};

/// User agent string used for outgoing requests.
pub const USER_AGENT: &str = concat!("threadgate/", env!("CARGO_PKG_VERSION"));

/// Fields requested from the profile endpoint.
pub const PROFILE_FIELDS: &str = "id,username,name,profile_picture_url,biography,website";

/// Fields requested from the media endpoint.
pub const MEDIA_FIELDS: &str = "id,caption,media_type,media_url,timestamp,like_count,comments_count";

/// Path of the token exchange below the backend API root.
const TOKEN_EXCHANGE_PATH: &str = "auth/instagram/token";

/// Provider and backend endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthSettings {
    /// Application id issued by the provider.
    pub app_id: String,
    /// Where the provider redirects after authorization.
    pub redirect_uri: String,
    /// The provider's authorization endpoint.
    pub auth_endpoint: String,
    /// Root of the provider's Graph API.
    pub graph_endpoint: String,
    /// Graph API version segment.
    pub graph_version: String,
    /// Root of the token-exchange backend. Without it, callbacks are completed locally.
    pub backend_api: Option<String>,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            app_id: "YOUR_INSTAGRAM_APP_ID".into(),
            redirect_uri: "http://localhost:5173/auth/callback".into(),
            auth_endpoint: "https://api.instagram.com/oauth/authorize".into(),
            graph_endpoint: "https://graph.instagram.com".into(),
            graph_version: "v18.0".into(),
            backend_api: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    code: &'a str,
}

/// Successful answer of the token-exchange backend.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenExchangeResponse {
    /// The issued access token.
    #[serde(alias = "access_token")]
    pub access_token: String,
    /// The user the token belongs to.
    pub user: UserProfile,
}

/// Builds provider requests and performs the backend token exchange.
#[derive(Clone, Debug)]
pub struct OAuthClient {
    settings: OAuthSettings,
    client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a client for the given endpoints.
    pub fn new(settings: OAuthSettings) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Client::new()");

        Self { settings, client }
    }

    /// Returns the configured endpoints.
    pub fn settings(&self) -> &OAuthSettings {
        &self.settings
    }

    /// Returns `true` if callbacks exchange codes with a backend.
    pub fn has_token_backend(&self) -> bool {
        self.settings.backend_api.is_some()
    }

    /// The provider URL that starts the authorization flow for `scopes`.
    pub fn authorize_url(&self, scopes: &PermissionSet) -> Result<Url> {
        let scope = scopes
            .iter()
            .map(|scope| scope.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let request = self
            .client
            .get(&self.settings.auth_endpoint)
            .query(&[
                ("client_id", self.settings.app_id.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("response_type", "code"),
            ])
            .build()
            .map_err(|cause| ServiceError::reqwest("building authorization url", cause))?;

        Ok(request.url().clone())
    }

    /// The Graph API request for the user's profile.
    pub fn profile_request(&self, access_token: &str) -> Result<Request> {
        self.graph_request("me", &[("fields", PROFILE_FIELDS), ("access_token", access_token)])
    }

    /// The Graph API request for the user's media.
    pub fn media_request(&self, access_token: &str) -> Result<Request> {
        self.graph_request(
            "me/media",
            &[("fields", MEDIA_FIELDS), ("access_token", access_token)],
        )
    }

    /// The request validating an access token.
    pub fn debug_token_request(&self, access_token: &str) -> Result<Request> {
        let url = format!("{}/debug_token", self.settings.graph_endpoint);
        self.client
            .get(url)
            .query(&[("access_token", access_token)])
            .build()
            .map_err(|cause| ServiceError::reqwest("building debug_token request", cause))
    }

    fn graph_request(&self, path: &str, query: &[(&str, &str)]) -> Result<Request> {
        let url = format!(
            "{}/{}/{path}",
            self.settings.graph_endpoint, self.settings.graph_version
        );
        self.client
            .get(url)
            .query(query)
            .build()
            .map_err(|cause| ServiceError::reqwest(format!("building {path} request"), cause))
    }

    /// Exchanges an authorization code for an access token at the backend.
    ///
    /// There is no retry. Non-success responses are reported as errors.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenExchangeResponse> {
        let backend = self
            .settings
            .backend_api
            .as_deref()
            .ok_or(ServiceError::ExchangeUnavailable)?;
        let url = format!("{}/{TOKEN_EXCHANGE_PATH}", backend.trim_end_matches('/'));

        let response = self
            .client
            .post(url)
            .json(&TokenExchangeRequest { code })
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|cause| ServiceError::reqwest("exchanging authorization code", cause))?;

        response
            .json()
            .await
            .map_err(|cause| ServiceError::reqwest("reading token exchange response", cause))
    }
}
