//! mailru_share - Download public Cloud Mail.ru shares.
//!
//! This library provides functionality to:
//! - Parse public share links and link list files
//! - Resolve a share's page id and download shard
//! - Walk a shared folder tree into a flat list of files
//! - Download files with skip-if-complete and retry on empty responses
//!
//! # Example
//!
//! ```no_run
//! use mailru_share::{Config, ShareClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ShareClient::new(Config::default());
//!
//!     let files = client
//!         .resolve_share("https://cloud.mail.ru/public/AbCd/xYz12")
//!         .await?;
//!     for file in &files {
//!         client.download_entry(file).await;
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod models;
pub mod session;
pub mod share;
pub mod url_parser;
pub mod walker;

// Re-exports for convenience
pub use client::ShareClient;
pub use config::{Config, RetryPolicy};
pub use error::{Result, ShareError};
pub use models::FileEntry;
pub use share::LinkReport;
pub use url_parser::extract_share_id;
pub use walker::normalize_single_file_url;
