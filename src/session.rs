use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue};
use tokio::io::AsyncWriteExt;

use crate::config::FetchConfig;

/// Client identity presented to the queried sites for one pass.
///
/// The retry pass presents a different user-agent and viewport than the
/// primary pass.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_agent: &'static str,
    pub viewport: (u32, u32),
}

impl Identity {
    /// Identity used by the primary pass.
    pub fn primary() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            viewport: (1280, 800),
        }
    }

    /// Alternate identity used by the retry pass.
    pub fn retry() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/99.0.4844.51 Safari/537.36",
            viewport: (1366, 768),
        }
    }
}

/// One browsing session: an HTTP client scoped to a single identity.
///
/// Page fetches are bounded by the configured navigation timeout; expiry is
/// an ordinary per-provider miss, never fatal to the run.
pub struct Session {
    client: reqwest::Client,
    nav_timeout: Duration,
}

impl Session {
    /// Build the client for an identity. Failure here aborts the whole run.
    pub fn start(identity: Identity, config: &FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("viewport-width", HeaderValue::from(identity.viewport.0));
        let client = reqwest::Client::builder()
            .user_agent(identity.user_agent)
            .default_headers(headers)
            .build()
            .context("failed to start browsing session")?;
        Ok(Self {
            client,
            nav_timeout: Duration::from_millis(config.nav_timeout_ms),
        })
    }

    /// Fetch a page as text, bounded by the navigation timeout.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .timeout(self.nav_timeout)
            .send()
            .await
            .with_context(|| format!("navigation failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("navigation rejected: {url}"))?;
        resp.text()
            .await
            .with_context(|| format!("failed to read page body: {url}"))
    }

    /// Stream a resource to `dest`, removing the partial file on any failure.
    pub async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let resp = self
            .client
            .get(url)
            .timeout(self.nav_timeout)
            .send()
            .await
            .with_context(|| format!("download request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("download rejected: {url}"))?;
        write_stream(resp.bytes_stream(), dest).await
    }
}

/// Drain a byte stream into `dest`.
///
/// The handle is flushed and closed on success; on failure it is closed, the
/// partial file removed, and the error returned to the caller.
pub(crate) async fn write_stream<S, B, E>(stream: S, dest: &Path) -> Result<()>
where
    S: futures::Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut file = tokio::fs::File::create(dest)
        .await
        .with_context(|| format!("failed to create {}", dest.display()))?;
    futures::pin_mut!(stream);
    let written = async {
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("transfer interrupted")?;
            file.write_all(chunk.as_ref()).await?;
        }
        file.flush().await?;
        Ok::<_, anyhow::Error>(())
    }
    .await;
    drop(file);
    if let Err(e) = written {
        let _ = tokio::fs::remove_file(dest).await;
        return Err(e.context(format!("failed to write {}", dest.display())));
    }
    Ok(())
}
