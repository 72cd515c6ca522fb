//! Streaming file downloads with skip-if-complete and empty-response retries.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::CONTENT_LENGTH;
use reqwest::Response;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use crate::client::ShareClient;
use crate::error::{Result, ShareError};
use crate::models::{is_plain_name, FileEntry};

/// What a single download attempt ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Written(u64),
    AlreadyComplete,
    Empty,
}

fn make_progress_bar(size: u64, name: &str) -> ProgressBar {
    let bar = ProgressBar::new(size);
    if let Ok(style) = ProgressStyle::with_template(
        "{msg} [{bar:30}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    ) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(name.to_string());
    bar
}

/// Size announced by the server, `0` when missing or unreadable.
fn expected_size(response: &Response) -> u64 {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

impl ShareClient {
    /// Local path a file is written to.
    pub fn destination(&self, output_dir: &str, filename: &str) -> PathBuf {
        self.config().download_root.join(output_dir).join(filename)
    }

    /// Download a discovered file with the configured number of retries.
    pub async fn download_entry(&self, entry: &FileEntry) -> bool {
        self.download(
            &entry.url,
            &entry.output_dir,
            &entry.filename,
            self.config().retry.max_retries,
        )
        .await
    }

    /// Download `url` into `<download_root>/<output_dir>/<filename>`.
    ///
    /// Returns `true` when the file is on disk with the announced size,
    /// either written now or found complete from an earlier run. Every
    /// failure is logged and reported as `false`, including names that
    /// would resolve outside the download root.
    ///
    /// An empty response is treated as a temporary server-side refusal and
    /// retried while `retries_remaining > 0`, waiting longer each time.
    pub async fn download(
        &self,
        url: &str,
        output_dir: &str,
        filename: &str,
        retries_remaining: u32,
    ) -> bool {
        let dir_is_plain = output_dir.is_empty() || output_dir.split('/').all(is_plain_name);
        if !dir_is_plain || !is_plain_name(filename) {
            let shown = format!("{}/{}", output_dir, filename);
            error!("Failed to download {}: {}", url, ShareError::UnsafeName(shown));
            return false;
        }

        let destination = self.destination(output_dir, filename);
        let mut retries_remaining = retries_remaining;

        loop {
            match self.try_download(url, &destination, filename).await {
                Ok(Attempt::Written(bytes)) => {
                    info!("Downloaded {} ({} bytes)", destination.display(), bytes);
                    return true;
                }
                Ok(Attempt::AlreadyComplete) => {
                    warn!("File {} already fully downloaded.", filename);
                    return true;
                }
                Ok(Attempt::Empty) if retries_remaining > 0 => {
                    let delay = self.config().retry.delay(retries_remaining);
                    warn!(
                        "Zero file size for {}, retrying in {}s ({} retries left)",
                        url,
                        delay.as_secs(),
                        retries_remaining
                    );
                    tokio::time::sleep(delay).await;
                    retries_remaining -= 1;
                }
                Ok(Attempt::Empty) => {
                    error!(
                        "Failed to download {}: {}",
                        url,
                        ShareError::ZeroSize(filename.to_string())
                    );
                    return false;
                }
                Err(e) => {
                    error!("Failed to download {}: {}", url, e);
                    return false;
                }
            }
        }
    }

    async fn try_download(&self, url: &str, destination: &Path, filename: &str) -> Result<Attempt> {
        let response = self.get(url).send().await?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(ShareError::ApiError {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }

        let total_size = expected_size(&response);
        if total_size == 0 {
            return Ok(Attempt::Empty);
        }

        if let Ok(existing) = fs::metadata(destination).await {
            if existing.is_file() && existing.len() == total_size {
                return Ok(Attempt::AlreadyComplete);
            }
        }

        let progress = make_progress_bar(total_size, filename);
        let mut file = File::create(destination).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    progress.abandon();
                    return Err(e.into());
                }
            };
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            progress.set_position(written);
        }

        file.flush().await?;
        progress.finish_and_clear();
        debug!("Wrote {} of {} bytes to {}", written, total_size, destination.display());

        Ok(Attempt::Written(written))
    }
}
