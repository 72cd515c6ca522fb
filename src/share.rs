//! Processing of one share link from URL to files on disk.

use tracing::{info, warn};

use crate::client::ShareClient;
use crate::error::Result;
use crate::models::FileEntry;
use crate::url_parser::extract_share_id;
use crate::walker::normalize_single_file_url;

/// Outcome of processing one link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub discovered: usize,
    pub downloaded: usize,
    pub failed: usize,
}

impl ShareClient {
    /// Resolve a share link into the files it contains, ready to download.
    ///
    /// The landing page is fetched from `Config::public_base`, which is
    /// where every accepted link points.
    ///
    /// A share holding exactly one file gets its URL normalized with
    /// [`normalize_single_file_url`].
    pub async fn resolve_share(&self, link: &str) -> Result<Vec<FileEntry>> {
        let share_id = extract_share_id(link)?;
        let landing_page = format!("{}/{}", self.config().public_base, share_id);
        let token = self.resolve_session_token(&landing_page).await?;
        let base_url = self.resolve_base_url(&token).await?;
        let mut files = self.list_files(&share_id, &token, &base_url).await?;

        if let [single] = files.as_mut_slice() {
            single.url = normalize_single_file_url(&single.url, &single.filename);
        }

        Ok(files)
    }

    /// Download every file of a share, one after another.
    ///
    /// Failed files are counted, never fatal. With `dry_run` the files are
    /// printed instead of downloaded.
    pub async fn process_link(&self, link: &str, dry_run: bool) -> Result<LinkReport> {
        let files = self.resolve_share(link).await?;
        let mut report = LinkReport {
            discovered: files.len(),
            ..LinkReport::default()
        };

        if files.is_empty() {
            warn!("Nothing to download for {}", link);
            return Ok(report);
        }

        info!("Found {} file(s) in {}", files.len(), link);

        for (idx, entry) in files.iter().enumerate() {
            if dry_run {
                println!("{}", entry);
                continue;
            }

            info!("[{}/{}] {}", idx + 1, files.len(), entry.filename);
            if self.download_entry(entry).await {
                report.downloaded += 1;
            } else {
                report.failed += 1;
            }
        }

        Ok(report)
    }
}
