//! Artifact Fetcher
//!
//! Streams HTTP downloads into local files while keeping a progress
//! indicator up to date.

use std::time::{Duration, Instant};

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::progress::Progress;

/// Minimum time between two progress refreshes
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Download error types
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("status code {0}")]
    Status(StatusCode),
    #[error("failed to write the downloaded data ({0})")]
    Write(#[from] std::io::Error),
}

/// Result of a finished download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Downloaded {
    pub status: StatusCode,
    pub bytes: u64,
}

/// Rate limiter for progress updates
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    /// Whether an update is due at `now`. A due update resets the timer.
    pub fn ready_at(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn ready(&mut self) -> bool {
        self.ready_at(Instant::now())
    }
}

/// Size in mebibytes with one decimal
pub fn megabytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / (1024.0 * 1024.0))
}

/// Progress text with the downloaded size appended. The total is only
/// shown for determined indicators.
pub fn size_label(text: &str, downloaded: u64, total: Option<u64>, determined: bool) -> String {
    match total {
        Some(total) if determined => format!(
            "{} ({} / {} MB)",
            text,
            megabytes(downloaded),
            megabytes(total)
        ),
        _ => format!("{} ({} MB)", text, megabytes(downloaded)),
    }
}

/// HTTP client for the manifest and SDK artifacts
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("apm/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Downloads a small text document
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.text().await?)
    }

    /// Streams `url` into `output`.
    ///
    /// Percentages are reported only if `progress` is determined and the
    /// server sent the total size. With `show_size` the downloaded size is
    /// appended to the progress text, which is restored afterwards.
    pub async fn download(
        &self,
        output: &mut tokio::fs::File,
        url: &str,
        progress: &mut dyn Progress,
        show_size: bool,
    ) -> Result<Downloaded, FetchError> {
        info!("Downloading {}", url);
        let original_text = progress.text();
        let result = self.stream_into(output, url, progress, show_size, &original_text).await;
        if show_size {
            progress.set_text(&original_text);
        }
        result
    }

    async fn stream_into(
        &self,
        output: &mut tokio::fs::File,
        url: &str,
        progress: &mut dyn Progress,
        show_size: bool,
        original_text: &str,
    ) -> Result<Downloaded, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let total = response.content_length().filter(|len| *len > 0);
        let mut downloaded: u64 = 0;
        let mut throttle = Throttle::new(REFRESH_INTERVAL);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            output.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if !throttle.ready() {
                continue;
            }
            if let (Some(total), true) = (total, progress.is_determined()) {
                progress.set_percent(downloaded as f64 * 100.0 / total as f64);
            }
            if show_size {
                let label = size_label(original_text, downloaded, total, progress.is_determined());
                progress.set_text(&label);
            }
        }

        output.flush().await?;
        if total.is_some() && progress.is_determined() {
            progress.set_percent(100.0);
        }

        debug!("Downloaded {} bytes from {}", downloaded, url);
        Ok(Downloaded { status, bytes: downloaded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::from_millis(100));

        assert!(throttle.ready_at(start));
        assert!(!throttle.ready_at(start + Duration::from_millis(50)));
        assert!(throttle.ready_at(start + Duration::from_millis(100)));
        assert!(!throttle.ready_at(start + Duration::from_millis(199)));
        assert!(throttle.ready_at(start + Duration::from_millis(250)));
    }

    #[test]
    fn test_size_label() {
        let mb = 1024 * 1024;
        assert_eq!(
            size_label("Downloading build tools", mb / 2, Some(3 * mb), true),
            "Downloading build tools (0.5 / 3.0 MB)"
        );
        assert_eq!(
            size_label("Downloading tools", 3 * mb / 2, Some(3 * mb), false),
            "Downloading tools (1.5 MB)"
        );
        assert_eq!(
            size_label("Downloading platform", 0, None, true),
            "Downloading platform (0.0 MB)"
        );
    }
}
