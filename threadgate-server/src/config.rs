//! Configuration for the threadgate server.
//!
//! Configuration can be loaded from multiple sources with the following precedence (highest to
//! lowest):
//!
//! 1. Environment variables (prefixed with `TG__`)
//! 2. YAML configuration file (specified via `-c` or `--config` flag)
//! 3. Defaults
//!
//! See [`Config`] for a description of all configuration fields and their defaults.
//!
//! # Environment Variables
//!
//! Environment variables use `TG__` as a prefix and double underscores (`__`) to denote nested
//! configuration structures. For example:
//!
//! - `TG__HTTP_ADDR=0.0.0.0:5173` sets the HTTP server address
//! - `TG__LOCAL_STORAGE__TYPE=filesystem` sets the local storage type
//! - `TG__LOCAL_STORAGE__PATH=/data` sets the directory name
//!
//! # YAML Configuration File
//!
//! The above configuration in YAML format would look like this:
//!
//! ```yaml
//! http_addr: 0.0.0.0:5173
//!
//! local_storage:
//!   type: filesystem
//!   path: /data
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use figment::providers::{Env, Format, Serialized, Yaml};
use secrecy::{CloneableSecret, SecretBox, SerializableSecret, zeroize::Zeroize};
use serde::{Deserialize, Serialize};
use threadgate_service::StorageConfig;
use threadgate_service::authenticator::DEFAULT_LOGIN_DELAY;
use threadgate_service::oauth::OAuthSettings;
use threadgate_service::service::DEFAULT_CALLBACK_DELAY;
use tracing::level_filters::LevelFilter;

/// Environment variable prefix for all configuration options.
const ENV_PREFIX: &str = "TG__";

/// Newtype around `String` that may protect against accidental
/// logging of secrets in our configuration struct. Use with
/// [`secrecy::SecretBox`].
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfigSecret(String);

impl ConfigSecret {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ConfigSecret {
    fn from(str: &str) -> Self {
        ConfigSecret(str.to_string())
    }
}

impl fmt::Debug for ConfigSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "[redacted]")
    }
}

impl CloneableSecret for ConfigSecret {}
impl SerializableSecret for ConfigSecret {}
impl Zeroize for ConfigSecret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Storage area configuration.
///
/// The `type` field in YAML or `__TYPE` in environment variables determines which variant is used.
///
/// Used in: [`Config::local_storage`], [`Config::session_storage`]
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Storage {
    /// Local filesystem storage (type `"filesystem"`).
    ///
    /// Stores one JSON file per key. Values survive server restarts.
    ///
    /// # Example
    ///
    /// ```yaml
    /// local_storage:
    ///   type: filesystem
    ///   path: /data
    /// ```
    FileSystem {
        /// Directory path for storing values.
        ///
        /// The directory will be created if it doesn't exist. Relative paths are resolved from
        /// the server's working directory.
        path: PathBuf,
    },

    /// In-memory storage (type `"memory"`).
    ///
    /// Values are lost when the server stops.
    Memory,
}

impl Storage {
    /// Borrows this configuration for the service layer.
    pub fn as_service_config(&self) -> StorageConfig<'_> {
        match self {
            Storage::FileSystem { path } => StorageConfig::FileSystem { path },
            Storage::Memory => StorageConfig::Memory,
        }
    }
}

/// Pacing of the mock login flow.
///
/// Used in: [`Config::login`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Login {
    /// Artificial delay after a mock login before redirecting to the main screen.
    ///
    /// # Default
    ///
    /// `500ms`
    ///
    /// # Environment Variable
    ///
    /// `TG__LOGIN__DELAY`
    #[serde(with = "humantime_serde")]
    pub delay: Duration,

    /// Artificial delay of the OAuth callback when no token-exchange backend is configured.
    ///
    /// # Default
    ///
    /// `1s`
    ///
    /// # Environment Variable
    ///
    /// `TG__LOGIN__CALLBACK_DELAY`
    #[serde(with = "humantime_serde")]
    pub callback_delay: Duration,
}

impl Default for Login {
    fn default() -> Self {
        Self {
            delay: DEFAULT_LOGIN_DELAY,
            callback_delay: DEFAULT_CALLBACK_DELAY,
        }
    }
}

/// Endpoints of the OAuth provider and the token-exchange backend.
///
/// Used in: [`Config::oauth`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OAuth {
    /// Application id issued by the provider.
    ///
    /// # Environment Variable
    ///
    /// `TG__OAUTH__APP_ID`
    pub app_id: String,

    /// Redirect URI registered with the provider. Should point at `/auth/callback`.
    ///
    /// # Environment Variable
    ///
    /// `TG__OAUTH__REDIRECT_URI`
    pub redirect_uri: String,

    /// The provider's authorization endpoint.
    pub auth_endpoint: String,

    /// Root URL of the provider's Graph API.
    pub graph_endpoint: String,

    /// Graph API version, for example `v18.0`.
    pub graph_version: String,

    /// Root URL of the token-exchange backend.
    ///
    /// When set, `/auth/callback` exchanges the authorization code at
    /// `{backend_api}/auth/instagram/token`. When unset, the callback completes locally.
    ///
    /// # Default
    ///
    /// `None`
    ///
    /// # Environment Variable
    ///
    /// `TG__OAUTH__BACKEND_API`
    pub backend_api: Option<String>,
}

impl Default for OAuth {
    fn default() -> Self {
        let OAuthSettings {
            app_id,
            redirect_uri,
            auth_endpoint,
            graph_endpoint,
            graph_version,
            backend_api,
        } = OAuthSettings::default();

        Self {
            app_id,
            redirect_uri,
            auth_endpoint,
            graph_endpoint,
            graph_version,
            backend_api,
        }
    }
}

impl OAuth {
    /// Converts this section into service settings.
    pub fn to_settings(&self) -> OAuthSettings {
        OAuthSettings {
            app_id: self.app_id.clone(),
            redirect_uri: self.redirect_uri.clone(),
            auth_endpoint: self.auth_endpoint.clone(),
            graph_endpoint: self.graph_endpoint.clone(),
            graph_version: self.graph_version.clone(),
            backend_api: self.backend_api.clone(),
        }
    }
}

/// Runtime configuration for the Tokio async runtime.
///
/// Used in: [`Config::runtime`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Runtime {
    /// Number of worker threads for the server runtime.
    ///
    /// # Default
    ///
    /// Defaults to the number of CPU cores on the host machine.
    ///
    /// # Environment Variable
    ///
    /// `TG__RUNTIME__WORKER_THREADS`
    pub worker_threads: usize,
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get(),
        }
    }
}

/// [Sentry](https://sentry.io/) error tracking configuration.
///
/// Sentry is disabled by default and only enabled when a DSN is provided.
///
/// Used in: [`Config::sentry`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Sentry {
    /// Sentry DSN (Data Source Name).
    ///
    /// # Environment Variable
    ///
    /// `TG__SENTRY__DSN`
    pub dsn: Option<SecretBox<ConfigSecret>>,

    /// Environment name for this deployment.
    ///
    /// # Environment Variable
    ///
    /// `TG__SENTRY__ENVIRONMENT`
    pub environment: Option<Cow<'static, str>>,

    /// Server name or identifier.
    ///
    /// # Environment Variable
    ///
    /// `TG__SENTRY__SERVER_NAME`
    pub server_name: Option<Cow<'static, str>>,

    /// Error event sample rate, between `0.0` and `1.0`.
    ///
    /// # Default
    ///
    /// `1.0`
    pub sample_rate: f32,

    /// Transaction sample rate, between `0.0` and `1.0`.
    ///
    /// # Default
    ///
    /// `0.01`
    pub traces_sample_rate: f32,

    /// Additional tags attached to every event.
    pub tags: BTreeMap<String, String>,
}

impl Sentry {
    pub fn is_enabled(&self) -> bool {
        self.dsn.is_some()
    }
}

impl Default for Sentry {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            server_name: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.01,
            tags: BTreeMap::new(),
        }
    }
}

/// Log output format.
///
/// Used in: [`Logging::format`]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty output on a terminal, simplified otherwise.
    Auto,

    /// Multi-line human readable output.
    Pretty,

    /// Compact single-line output.
    Simplified,

    /// Newline-delimited JSON.
    Json,
}

mod display_fromstr {
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: std::fmt::Display,
    {
        serializer.collect_str(&value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
        T: std::str::FromStr,
        <T as std::str::FromStr>::Err: std::fmt::Display,
    {
        use serde::Deserialize;
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Logging configuration.
///
/// Used in: [`Config::logging`]
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Logging {
    /// Minimum level of emitted logs.
    ///
    /// # Default
    ///
    /// `info`
    ///
    /// # Environment Variable
    ///
    /// `TG__LOGGING__LEVEL`
    #[serde(with = "display_fromstr")]
    pub level: LevelFilter,

    /// Output format.
    ///
    /// # Default
    ///
    /// `auto`
    ///
    /// # Environment Variable
    ///
    /// `TG__LOGGING__FORMAT`
    pub format: LogFormat,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Auto,
        }
    }
}

/// Main configuration struct for the threadgate server.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Socket address the HTTP server binds to.
    ///
    /// # Default
    ///
    /// `127.0.0.1:5173`
    ///
    /// # Environment Variable
    ///
    /// `TG__HTTP_ADDR`
    pub http_addr: SocketAddr,

    /// Persistent storage area holding the credential record.
    ///
    /// # Default
    ///
    /// Filesystem storage in `data/local-storage`.
    pub local_storage: Storage,

    /// Per-session storage area holding the confirmed permission selection.
    ///
    /// # Default
    ///
    /// In-memory storage.
    pub session_storage: Storage,

    /// Pacing of the mock login flow.
    pub login: Login,

    /// OAuth provider and token-exchange endpoints.
    pub oauth: OAuth,

    /// Tokio runtime settings.
    pub runtime: Runtime,

    /// Logging settings.
    pub logging: Logging,

    /// Sentry settings.
    pub sentry: Sentry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([127, 0, 0, 1], 5173)),
            local_storage: Storage::FileSystem {
                path: PathBuf::from("data/local-storage"),
            },
            session_storage: Storage::Memory,
            login: Login::default(),
            oauth: OAuth::default(),
            runtime: Runtime::default(),
            logging: Logging::default(),
            sentry: Sentry::default(),
        }
    }
}

impl Config {
    /// Loads configuration from defaults, an optional YAML file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = figment::Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn configurable_via_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TG__HTTP_ADDR", "0.0.0.0:8080");
            jail.set_env("TG__LOCAL_STORAGE__TYPE", "memory");
            jail.set_env("TG__LOGIN__DELAY", "250ms");
            jail.set_env("TG__OAUTH__BACKEND_API", "http://localhost:3001/api");
            jail.set_env("TG__SENTRY__DSN", "abcde");
            jail.set_env("TG__SENTRY__ENVIRONMENT", "production");

            let config = Config::load(None).unwrap();

            assert_eq!(config.http_addr, "0.0.0.0:8080".parse().unwrap());
            assert_eq!(config.local_storage, Storage::Memory);
            assert_eq!(config.login.delay, Duration::from_millis(250));
            assert_eq!(config.login.callback_delay, DEFAULT_CALLBACK_DELAY);
            assert_eq!(
                config.oauth.backend_api.as_deref(),
                Some("http://localhost:3001/api")
            );
            assert_eq!(config.sentry.dsn.unwrap().expose_secret().as_str(), "abcde");
            assert_eq!(config.sentry.environment.as_deref(), Some("production"));

            Ok(())
        });
    }

    #[test]
    fn configurable_via_yaml() {
        let mut tempfile = tempfile::NamedTempFile::new().unwrap();
        tempfile
            .write_all(
                br#"
            local_storage:
                type: filesystem
                path: /var/lib/threadgate
            oauth:
                app_id: "1234567890"
                redirect_uri: https://demo.example.com/auth/callback
            logging:
                level: debug
                format: json
            "#,
            )
            .unwrap();

        figment::Jail::expect_with(|_jail| {
            let config = Config::load(Some(tempfile.path())).unwrap();

            assert_eq!(
                config.local_storage,
                Storage::FileSystem {
                    path: "/var/lib/threadgate".into()
                }
            );
            assert_eq!(config.oauth.app_id, "1234567890");
            assert_eq!(
                config.oauth.redirect_uri,
                "https://demo.example.com/auth/callback"
            );
            // Unset fields keep their defaults.
            assert_eq!(config.oauth.graph_version, "v18.0");
            assert_eq!(config.logging.level, LevelFilter::DEBUG);
            assert_eq!(config.logging.format, LogFormat::Json);
            assert_eq!(config.session_storage, Storage::Memory);

            Ok(())
        });
    }

    #[test]
    fn configured_with_env_and_yaml() {
        let mut tempfile = tempfile::NamedTempFile::new().unwrap();
        tempfile
            .write_all(
                br#"
            local_storage:
                type: filesystem
                path: /from/yaml
            "#,
            )
            .unwrap();

        figment::Jail::expect_with(|jail| {
            jail.set_env("TG__LOCAL_STORAGE__PATH", "/from/env");

            let config = Config::load(Some(tempfile.path())).unwrap();

            // Env should overwrite the yaml config
            assert_eq!(
                config.local_storage,
                Storage::FileSystem {
                    path: "/from/env".into()
                }
            );

            Ok(())
        });
    }
}
