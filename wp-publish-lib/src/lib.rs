//! `wp-publish-lib` holds the pieces behind the `wp-publish` CLI: loading a
//! Markdown document with a `---` metadata block, turning its body into
//! HTML, creating or updating the matching WordPress post, and keeping a
//! local JSON content calendar in step with the result.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use chrono::Local;
//! use wp_publish_lib::config::WordPressConfig;
//! use wp_publish_lib::document::{self, MetadataParser};
//! use wp_publish_lib::ledger;
//! use wp_publish_lib::markup::MarkupConverter;
//! use wp_publish_lib::publisher::{PostStatus, Publisher};
//!
//! # fn demo() -> Result<(), wp_publish_lib::error::PublishError> {
//! let path = Path::new("posts/hello.md");
//! let document = document::load(path, MetadataParser::Yaml)?;
//! let html = MarkupConverter::Html.convert(&document.body);
//!
//! let publisher = Publisher::new(WordPressConfig::from_env())?;
//! let record = publisher.publish(&document.metadata, html, PostStatus::Draft)?;
//!
//! let today = Local::now().date_naive();
//! ledger::update_ledger(
//!     Path::new(ledger::DEFAULT_LEDGER_PATH),
//!     &record,
//!     path,
//!     false,
//!     today,
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod ledger;
pub mod markup;
pub mod publisher;

use std::io::{self, Write};
use std::path::Path;
use tempfile::Builder as TempFileBuilder;

/// Replaces `path` with `contents` through a temporary file in the same
/// directory, so readers never observe a partial write.
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp_file = TempFileBuilder::new()
        .prefix(".wp-publish-")
        .suffix(".tmp")
        .tempfile_in(parent_dir)?;
    temp_file.write_all(contents)?;
    if let Ok(existing) = std::fs::metadata(path) {
        temp_file.as_file().set_permissions(existing.permissions())?;
    }
    temp_file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
