//! Data models for Cloud Mail.ru API responses.
//!
//! Responses are parsed into `serde_json::Value` first and validated here, so
//! a missing key and a key of the wrong shape surface as different errors.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ShareError};

/// One downloadable file discovered under a share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub url: String,
    /// Folder chain relative to the download root.
    pub output_dir: String,
    /// Name exactly as the API reports it.
    pub filename: String,
    pub size: Option<u64>,
}

impl std::fmt::Display for FileEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size_str = self
            .size
            .map(format_size)
            .unwrap_or_else(|| "-".to_string());
        let path = if self.output_dir.is_empty() {
            self.filename.clone()
        } else {
            format!("{}/{}", self.output_dir, self.filename)
        };
        write!(f, "{}\t{}", size_str, path)
    }
}

/// Whether a name from the API is a single plain path component.
///
/// Rejects `.`, `..`, absolute paths and anything holding a separator, so
/// joining the name onto the download root can never leave it.
pub fn is_plain_name(name: &str) -> bool {
    if name.contains('/') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// An entry of a folder listing, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FolderItem {
    Folder {
        name: String,
    },
    File {
        name: String,
        #[serde(default)]
        size: Option<u64>,
    },
    #[serde(other)]
    Unknown,
}

/// Validated body of the `folder` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderListing {
    pub name: String,
    pub items: Vec<FolderItem>,
}

impl FolderListing {
    /// Validate a raw `folder` response.
    pub fn from_value(value: &Value) -> Result<Self> {
        let body = field(value, "body")?;

        let name = field(body, "name")?
            .as_str()
            .ok_or_else(|| ShareError::UnexpectedType("body.name is not a string".to_string()))?
            .to_string();

        let list = field(body, "list")?
            .as_array()
            .ok_or_else(|| ShareError::UnexpectedType("body.list is not a list".to_string()))?;

        let items = list
            .iter()
            .map(|item| {
                FolderItem::deserialize(item).map_err(|e| {
                    ShareError::UnexpectedType(format!("malformed item in body.list: {}", e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { name, items })
    }
}

/// Validated body of the `dispatcher` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherResponse {
    pub weblink_get: String,
}

impl DispatcherResponse {
    /// Take the first `body.weblink_get[].url` from a raw `dispatcher` response.
    pub fn from_value(value: &Value) -> Result<Self> {
        let shards = field(field(value, "body")?, "weblink_get")?
            .as_array()
            .ok_or_else(|| {
                ShareError::UnexpectedType("body.weblink_get is not a list".to_string())
            })?;

        let first = shards.first().ok_or_else(|| {
            ShareError::UnexpectedType("body.weblink_get is an empty list".to_string())
        })?;

        let url = field(first, "url")?.as_str().ok_or_else(|| {
            ShareError::UnexpectedType("body.weblink_get[0].url is not a string".to_string())
        })?;

        Ok(Self {
            weblink_get: url.to_string(),
        })
    }
}

fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value> {
    match value {
        Value::Object(map) => map
            .get(key)
            .ok_or_else(|| ShareError::MissingKey(key.to_string())),
        _ => Err(ShareError::UnexpectedType(format!(
            "expected an object holding '{}'",
            key
        ))),
    }
}
