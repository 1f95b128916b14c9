//! Container healthcheck against a running server.

use anyhow::{Context, Result};
use reqwest::StatusCode;

use crate::config::Config;

/// Probes `/health` and `/ready` of the server configured in `config`.
///
/// Succeeds only if the server answers both and its storage areas are readable.
pub async fn healthcheck(config: Config) -> Result<()> {
    let client = reqwest::Client::new();

    for probe in ["health", "ready"] {
        let url = format!("http://{}/{probe}", config.http_addr);
        tracing::debug!(%url, "probing server");

        let status = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("{probe} probe failed to connect"))?
            .status();

        if status != StatusCode::OK {
            anyhow::bail!("{probe} probe returned {status}");
        }
        tracing::debug!(probe, "passed");
    }

    tracing::info!("OK");
    Ok(())
}
