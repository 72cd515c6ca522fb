//! Folder tree traversal for a public share.

use tracing::{debug, error, warn};

use crate::client::ShareClient;
use crate::error::{Result, ShareError};
use crate::models::{is_plain_name, FileEntry, FolderItem, FolderListing};

/// A folder whose listing is being consumed.
struct Frame {
    weblink: String,
    path: String,
    items: std::vec::IntoIter<FolderItem>,
    depth: usize,
    /// Number of entries collected before this folder was opened.
    first_entry: usize,
}

/// Percent-encode one path segment of a weblink or download URL.
pub fn escape_segment(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Append a folder name to a local path. A `/` root contributes nothing.
fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() || parent == "/" {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

impl ShareClient {
    /// List every file under a share, depth first in listing order.
    ///
    /// # Arguments
    /// * `share_id` - Identifier taken from the share link
    /// * `token` - Page id of the share
    /// * `base_url` - Download shard returned by the dispatcher
    ///
    /// Fails as a whole when any folder in the tree cannot be listed.
    pub async fn list_files(
        &self,
        share_id: &str,
        token: &str,
        base_url: &str,
    ) -> Result<Vec<FileEntry>> {
        let result = self.walk(share_id, token, base_url).await;

        if let Err(e) = &result {
            match e {
                ShareError::MissingKey(key) => {
                    error!("Folder listing for {} is missing key '{}'", share_id, key)
                }
                ShareError::UnexpectedType(what) => {
                    error!("Unexpected folder listing for {}: {}", share_id, what)
                }
                ShareError::UnsafeName(name) => {
                    error!("Folder listing for {} has unsafe name {:?}", share_id, name)
                }
                other => error!("Failed to list {}: {}", share_id, other),
            }
        }

        result
    }

    async fn walk(&self, share_id: &str, token: &str, base_url: &str) -> Result<Vec<FileEntry>> {
        let max_depth = self.config().max_depth;
        let mut files = Vec::new();
        let mut stack = vec![self.open_folder(share_id.to_string(), token, "", 0, 0).await?];

        while let Some(frame) = stack.last_mut() {
            match frame.items.next() {
                Some(FolderItem::Folder { name }) => {
                    let depth = frame.depth + 1;
                    if depth > max_depth {
                        return Err(ShareError::DepthExceeded(max_depth));
                    }
                    let weblink = format!("{}/{}", frame.weblink, escape_segment(&name));
                    let parent = frame.path.clone();
                    let child = self
                        .open_folder(weblink, token, &parent, depth, files.len())
                        .await?;
                    stack.push(child);
                }
                Some(FolderItem::File { name, size }) => {
                    let output_dir = if frame.path == "/" {
                        String::new()
                    } else {
                        frame.path.clone()
                    };
                    files.push(FileEntry {
                        url: format!("{}/{}/{}", base_url, frame.weblink, escape_segment(&name)),
                        output_dir,
                        filename: name,
                        size,
                    });
                }
                Some(FolderItem::Unknown) => {}
                None => {
                    if files.len() == frame.first_entry {
                        warn!("No files found for {}", frame.weblink);
                    }
                    stack.pop();
                }
            }
        }

        Ok(files)
    }

    async fn open_folder(
        &self,
        weblink: String,
        token: &str,
        parent_path: &str,
        depth: usize,
        first_entry: usize,
    ) -> Result<Frame> {
        let url = format!(
            "{}/folder?weblink={}&x-page-id={}",
            self.config().api_base,
            weblink,
            token
        );
        debug!("Listing {}", weblink);

        let value = self.get_json(&url).await?;
        let listing = FolderListing::from_value(&value)?;

        let root_placeholder = depth == 0 && listing.name == "/";
        if !root_placeholder && !is_plain_name(&listing.name) {
            return Err(ShareError::UnsafeName(listing.name));
        }

        Ok(Frame {
            path: join_path(parent_path, &listing.name),
            items: listing.items.into_iter(),
            weblink,
            depth,
            first_entry,
        })
    }
}

/// Drop the trailing `/<escaped filename>` from a single-file share URL.
///
/// The listing of a share that is itself a file yields a URL ending in the
/// file name twice over; the download endpoint wants it once. Stripping
/// repeats until the suffix is gone, so the result is stable.
pub fn normalize_single_file_url(url: &str, filename: &str) -> String {
    let suffix = format!("/{}", escape_segment(filename));
    let mut normalized = url;
    while let Some(stripped) = normalized.strip_suffix(suffix.as_str()) {
        normalized = stripped;
    }
    normalized.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_segment() {
        assert_eq!(escape_segment("My Photos"), "My%20Photos");
        assert_eq!(escape_segment("a#b%c"), "a%23b%25c");
        assert_eq!(escape_segment("plain-name_1.txt"), "plain-name_1.txt");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "Root"), "Root");
        assert_eq!(join_path("", "/"), "/");
        assert_eq!(join_path("/", "Sub"), "Sub");
        assert_eq!(join_path("Root", "Sub"), "Root/Sub");
    }

    #[test]
    fn test_normalize_strips_filename() {
        let url = "https://shard.example/get/AbC/xyz/report%202024.pdf";
        assert_eq!(
            normalize_single_file_url(url, "report 2024.pdf"),
            "https://shard.example/get/AbC/xyz"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let cases = [
            ("https://shard.example/get/AbC/xyz/a.txt", "a.txt"),
            ("https://shard.example/get/AbC/a.txt/a.txt", "a.txt"),
            ("https://shard.example/get/AbC/xyz", "b c.txt"),
        ];
        for (url, name) in cases {
            let once = normalize_single_file_url(url, name);
            assert_eq!(normalize_single_file_url(&once, name), once);
        }
    }

    #[test]
    fn test_normalize_without_suffix_is_noop() {
        let url = "https://shard.example/get/AbC/xyz";
        assert_eq!(normalize_single_file_url(url, "a.txt"), url);
    }
}
