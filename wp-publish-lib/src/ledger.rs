//! The local content calendar: a JSON list of known posts keyed by slug.
//!
//! Only the fields this tool manages are interpreted. Everything else in
//! an entry, and any extra keys on the ledger itself, is carried through a
//! rewrite untouched.

use crate::error::PublishError;
use crate::publisher::PostRecord;
use chrono::NaiveDate;
use log::{info, warn};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use std::path::Path;

pub const DEFAULT_LEDGER_PATH: &str = "blog/content-calendar.json";

const DATE_FORMAT: &str = "%Y-%m-%d";
const AUTO_ADDED_NOTE: &str = "Auto-added by publish script";

const POSTS_KEY: &str = "posts";
const METADATA_KEY: &str = "metadata";

/// The calendar file. `posts` and `metadata` are decoded; every other root
/// key is kept as read, and all keys are written back in their file order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "JsonMap<String, JsonValue>")]
pub struct Ledger {
    pub posts: Vec<LedgerEntry>,
    pub metadata: JsonMap<String, JsonValue>,
    // Root keys in file order; the `posts` and `metadata` slots hold null.
    root: JsonMap<String, JsonValue>,
}

/// One post in the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerEntry(JsonMap<String, JsonValue>);

/// What [`update_ledger`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOutcome {
    /// The ledger file does not exist; nothing was written.
    Missing,
    /// An entry with the record's slug was updated in place.
    Updated,
    /// A new entry was appended.
    Appended,
}

impl LedgerEntry {
    /// Builds the entry for a post the calendar has not seen before.
    pub fn from_record(
        record: &PostRecord,
        file_path: &Path,
        publish: bool,
        today: NaiveDate,
    ) -> Self {
        let date = format_date(today);
        let published = if publish {
            JsonValue::from(date.clone())
        } else {
            JsonValue::Null
        };

        let mut fields = JsonMap::new();
        fields.insert("id".into(), format!("post-{}", record.id).into());
        fields.insert("slug".into(), record.slug.clone().into());
        fields.insert("title".into(), record.title.rendered.clone().into());
        fields.insert("status".into(), entry_status(publish).into());
        fields.insert("created".into(), date.clone().into());
        fields.insert("modified".into(), date.into());
        fields.insert("published".into(), published);
        fields.insert("wordpress_id".into(), record.id.into());
        fields.insert("wordpress_url".into(), record.link.clone().into());
        fields.insert("file_path".into(), file_path.display().to_string().into());
        fields.insert("tags".into(), json!([]));
        fields.insert("categories".into(), json!([]));
        fields.insert("seo".into(), json!({ "description": "", "keywords": [] }));
        fields.insert("notes".into(), AUTO_ADDED_NOTE.into());
        Self(fields)
    }

    pub fn slug(&self) -> Option<&str> {
        self.0.get("slug").and_then(JsonValue::as_str)
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(JsonValue::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    fn apply_record(&mut self, record: &PostRecord, publish: bool, today: NaiveDate) {
        let date = format_date(today);
        self.0.insert("wordpress_id".into(), record.id.into());
        self.0
            .insert("wordpress_url".into(), record.link.clone().into());
        self.0.insert("modified".into(), date.clone().into());
        if publish {
            self.0.insert("status".into(), entry_status(true).into());
            self.0.insert("published".into(), date.into());
        }
    }
}

impl TryFrom<JsonMap<String, JsonValue>> for Ledger {
    type Error = String;

    fn try_from(mut root: JsonMap<String, JsonValue>) -> Result<Self, Self::Error> {
        let posts = match root.get_mut(POSTS_KEY).map(JsonValue::take) {
            Some(posts) => serde_json::from_value(posts)
                .map_err(|err| format!("invalid `{POSTS_KEY}` list: {err}"))?,
            None => return Err(format!("missing field `{POSTS_KEY}`")),
        };
        let metadata = match root.get_mut(METADATA_KEY).map(JsonValue::take) {
            Some(JsonValue::Object(metadata)) => metadata,
            Some(_) => return Err(format!("`{METADATA_KEY}` must be an object")),
            None => JsonMap::new(),
        };

        Ok(Self {
            posts,
            metadata,
            root,
        })
    }
}

impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_metadata_slot = self.root.contains_key(METADATA_KEY);
        let len = self.root.len() + usize::from(!has_metadata_slot);

        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in &self.root {
            match key.as_str() {
                POSTS_KEY => map.serialize_entry(key, &self.posts)?,
                METADATA_KEY => map.serialize_entry(key, &self.metadata)?,
                _ => map.serialize_entry(key, value)?,
            }
        }
        if !has_metadata_slot {
            map.serialize_entry(METADATA_KEY, &self.metadata)?;
        }
        map.end()
    }
}

impl Ledger {
    /// A root key other than `posts` and `metadata`.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match key {
            POSTS_KEY | METADATA_KEY => None,
            _ => self.root.get(key),
        }
    }

    pub fn find(&self, slug: &str) -> Option<&LedgerEntry> {
        self.posts.iter().find(|entry| entry.slug() == Some(slug))
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.metadata.get("last_updated").and_then(JsonValue::as_str)
    }

    /// Folds a remote record into the ledger: the entry with the same slug
    /// is updated in place, otherwise a new one is appended.
    pub fn reconcile(
        &mut self,
        record: &PostRecord,
        file_path: &Path,
        publish: bool,
        today: NaiveDate,
    ) -> LedgerOutcome {
        let outcome = match self
            .posts
            .iter_mut()
            .find(|entry| entry.slug() == Some(record.slug.as_str()))
        {
            Some(entry) => {
                entry.apply_record(record, publish, today);
                LedgerOutcome::Updated
            }
            None => {
                self.posts
                    .push(LedgerEntry::from_record(record, file_path, publish, today));
                LedgerOutcome::Appended
            }
        };

        self.metadata
            .insert("last_updated".into(), format_date(today).into());
        outcome
    }
}

/// Reads the ledger at `path`, or `None` if there is no such file.
pub fn load(path: &Path) -> Result<Option<Ledger>, PublishError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| PublishError::LedgerIo {
        path: path.to_path_buf(),
        source,
    })?;
    let ledger = serde_json::from_str(&content).map_err(|source| PublishError::LedgerFormat {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(ledger))
}

/// Rewrites the whole ledger, pretty-printed with two-space indentation.
pub fn save(path: &Path, ledger: &Ledger) -> Result<(), PublishError> {
    let serialized =
        serde_json::to_vec_pretty(ledger).map_err(|source| PublishError::LedgerFormat {
            path: path.to_path_buf(),
            source,
        })?;
    crate::write_atomically(path, &serialized).map_err(|source| PublishError::LedgerIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the ledger at `ledger_path`, reconciles `record` into it and
/// writes it back. A missing ledger is only a warning.
pub fn update_ledger(
    ledger_path: &Path,
    record: &PostRecord,
    file_path: &Path,
    publish: bool,
    today: NaiveDate,
) -> Result<LedgerOutcome, PublishError> {
    let Some(mut ledger) = load(ledger_path)? else {
        warn!("Content calendar not found at {}", ledger_path.display());
        return Ok(LedgerOutcome::Missing);
    };

    let outcome = ledger.reconcile(record, file_path, publish, today);
    save(ledger_path, &ledger)?;
    info!(
        "Content calendar {} {:?} entry for slug '{}'",
        ledger_path.display(),
        outcome,
        record.slug
    );
    Ok(outcome)
}

fn entry_status(publish: bool) -> &'static str {
    if publish {
        "published"
    } else {
        "draft"
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
