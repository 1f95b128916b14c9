use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::{TcpListener, TcpSocket};
use tokio::signal::unix::SignalKind;

use crate::config::{Config, Storage};
use crate::state::Services;
use crate::web::app::App;

/// The maximum backlog for TCP listen sockets before refusing connections.
const TCP_LISTEN_BACKLOG: u32 = 1024;

/// Runs the threadgate HTTP server until termination is requested.
pub async fn server(config: Config) -> Result<()> {
    tracing::info!(
        local_storage = ?config.local_storage,
        session_storage = ?config.session_storage,
        token_exchange = config.oauth.backend_api.as_deref().unwrap_or("disabled"),
        login_delay = ?config.login.delay,
        "Starting threadgate"
    );
    if matches!(config.session_storage, Storage::FileSystem { .. }) {
        tracing::warn!("session storage is persistent, confirmed selections outlive restarts");
    }

    let listener = listen(&config).context("failed to start TCP listener")?;
    let state = Services::spawn(config);

    let server_handle = tokio::spawn(async move {
        App::new(state)
            .graceful_shutdown(true)
            .serve(listener)
            .await
    });

    // Blocks until a termination signal arrives, then lets the server drain.
    elegant_departure::tokio::depart()
        .on_termination()
        .on_sigint()
        .on_signal(SignalKind::hangup())
        .on_signal(SignalKind::quit())
        .await;

    server_handle.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn listen(config: &Config) -> Result<TcpListener> {
    let addr = config.http_addr;
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4(),
        SocketAddr::V6(_) => TcpSocket::new_v6(),
    }?;

    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;

    let listener = socket.listen(TCP_LISTEN_BACKLOG)?;
    tracing::info!("HTTP server listening on {addr}");

    Ok(listener)
}
