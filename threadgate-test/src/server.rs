//! Exposes an in-process test server for use in integration tests.
//!
//! ```
//! use threadgate_test::server::TestServer;
//!
//! #[tokio::main]
//! async fn main() {
//!    let server = TestServer::new().await;
//!    let url = server.url("/health");
//!    // use the URL in tests...
//! }
//! ```

use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use tempfile::TempDir;
use threadgate_server::config::{Config, Storage};
use threadgate_server::state::Services;
use threadgate_server::web::App;

/// An in-process test server for use in integration tests.
///
/// The server keeps local storage in a temporary directory, which is deleted when the server is
/// dropped, and session storage in memory. Artificial login delays are disabled. It listens on a
/// random available port on localhost.
#[derive(Debug)]
pub struct TestServer {
    handle: tokio::task::JoinHandle<()>,
    socket: SocketAddr,
    _tempdir: TempDir,
}

impl TestServer {
    /// Starts a server with the test defaults.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Starts a server after applying `configure` on top of the test defaults.
    pub async fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let listener = TcpListener::bind(addr).unwrap();
        listener.set_nonblocking(true).unwrap();
        let socket = listener.local_addr().unwrap();

        let tempdir = tempfile::tempdir().unwrap();
        let mut config = Config {
            http_addr: socket,
            local_storage: Storage::FileSystem {
                path: tempdir.path().into(),
            },
            session_storage: Storage::Memory,
            ..Default::default()
        };
        config.login.delay = Duration::ZERO;
        config.login.callback_delay = Duration::ZERO;
        configure(&mut config);

        let app = App::new(Services::spawn(config));

        let handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            app.serve(listener).await.unwrap();
        });

        Self {
            handle,
            socket,
            _tempdir: tempdir,
        }
    }

    /// Returns a full URL pointing to the given path.
    ///
    /// This URL uses `localhost` as hostname.
    pub fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("http://localhost:{}/{}", self.socket.port(), path)
    }

    /// Returns an HTTP client that does not follow redirects.
    ///
    /// Navigation between screens is asserted on the `Location` header.
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
