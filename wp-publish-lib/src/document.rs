//! Loading Markdown documents and splitting off their `---` metadata block.

use crate::error::PublishError;
use log::warn;
use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as JsonValue};
use serde_yaml::{Mapping, Value as YamlValue};
use std::path::Path;

const DELIMITER: &str = "---";
const REMOTE_ID_KEY: &str = "wordpress_id";

/// How the text between the metadata delimiters is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataParser {
    /// Full YAML, nested values included.
    #[default]
    Yaml,
    /// One `key: value` pair per line; every value is a string.
    Flat,
}

/// Key-value attributes from the head of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata(Mapping);

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&YamlValue> {
        self.0.get(key)
    }

    pub fn mapping(&self) -> &Mapping {
        &self.0
    }

    pub fn title(&self) -> Option<String> {
        self.get("title").and_then(scalar_to_string)
    }

    pub fn slug(&self) -> Option<String> {
        self.get("slug").and_then(scalar_to_string)
    }

    /// Tags exactly as written, for the remote side to resolve.
    pub fn tags(&self) -> Option<JsonValue> {
        self.get("tags")
            .filter(|value| is_truthy(value))
            .map(yaml_to_json)
    }

    /// The stored remote post id, rendered as a path segment.
    pub fn wordpress_id(&self) -> Option<String> {
        self.get(REMOTE_ID_KEY)
            .filter(|value| is_truthy(value))
            .and_then(scalar_to_string)
    }

    /// `seo.description`. Always absent for flat metadata.
    pub fn seo_description(&self) -> Option<&str> {
        self.get("seo")?
            .get("description")?
            .as_str()
            .filter(|description| !description.is_empty())
    }

    pub fn to_json(&self) -> JsonValue {
        let object: JsonMap<String, JsonValue> = self
            .0
            .iter()
            .map(|(key, value)| (key_to_string(key), yaml_to_json(value)))
            .collect();
        JsonValue::Object(object)
    }
}

/// A loaded document: its metadata and the Markdown body that follows.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub metadata: Metadata,
    pub body: String,
    raw_metadata: Option<String>,
    newline: &'static str,
}

impl Document {
    /// Text between the delimiters, if the document had a metadata block.
    pub fn raw_metadata(&self) -> Option<&str> {
        self.raw_metadata.as_deref()
    }

    /// Renders the document with `wordpress_id: <id>` recorded in its
    /// metadata block, creating the block when there was none. An earlier
    /// top-level `wordpress_id` line is replaced; nested keys of the same
    /// name are left alone. Lines are written with the document's own
    /// line ending.
    pub fn with_remote_id(&self, id: u64) -> String {
        let newline = self.newline;
        let mut output = String::new();
        output.push_str(DELIMITER);
        output.push_str(newline);

        if let Some(raw) = self.raw_metadata.as_deref() {
            for line in raw.lines() {
                if line.starts_with(REMOTE_ID_KEY)
                    && line[REMOTE_ID_KEY.len()..].trim_start().starts_with(':')
                {
                    continue;
                }
                output.push_str(line);
                output.push_str(newline);
            }
        }

        output.push_str(&format!("{REMOTE_ID_KEY}: {id}{newline}"));
        output.push_str(DELIMITER);
        output.push_str(newline);
        output.push_str(&self.body);
        output
    }
}

/// Reads `path` and splits it into metadata and body.
pub fn load(path: &Path, parser: MetadataParser) -> Result<Document, PublishError> {
    let content = std::fs::read_to_string(path).map_err(|source| PublishError::DocumentIo {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&content, parser))
}

/// Splits `content` into metadata and body. Never fails: a missing closing
/// delimiter means there is no metadata, and a block that does not parse
/// is logged and treated as empty.
pub fn parse(content: &str, parser: MetadataParser) -> Document {
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };

    let Some((raw, body)) = split_metadata(content) else {
        return Document {
            metadata: Metadata::default(),
            body: content.to_string(),
            raw_metadata: None,
            newline,
        };
    };

    let metadata = match parser {
        MetadataParser::Yaml => parse_yaml(raw),
        MetadataParser::Flat => parse_flat(raw),
    };

    Document {
        metadata,
        body: body.to_string(),
        raw_metadata: Some(raw.to_string()),
        newline,
    }
}

/// Writes `document` back to `path` with its new remote id recorded.
pub fn write_remote_id(path: &Path, document: &Document, id: u64) -> Result<(), PublishError> {
    crate::write_atomically(path, document.with_remote_id(id).as_bytes()).map_err(|source| {
        PublishError::DocumentIo {
            path: path.to_path_buf(),
            source,
        }
    })
}

fn split_metadata(content: &str) -> Option<(&str, &str)> {
    let first_line = content.lines().next()?;
    if first_line.trim_end_matches('\r') != DELIMITER {
        return None;
    }

    let rest = strip_opening_delimiter(content)?;
    let (raw, body_start) = extract_metadata_block(rest)?;
    Some((raw, &rest[body_start..]))
}

fn strip_opening_delimiter(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(DELIMITER)?;

    if let Some(stripped) = rest.strip_prefix("\r\n") {
        Some(stripped)
    } else if let Some(stripped) = rest.strip_prefix('\n') {
        Some(stripped)
    } else {
        Some(rest)
    }
}

fn extract_metadata_block(content: &str) -> Option<(&str, usize)> {
    let mut offset = 0;

    for line in content.split_terminator('\n') {
        if line.trim_end_matches('\r') == DELIMITER {
            let mut body_start = offset + line.len();

            if content.len() > body_start && content.as_bytes()[body_start] == b'\n' {
                body_start += 1;
            }

            return Some((&content[..offset], body_start));
        }

        offset += line.len() + 1;
    }

    None
}

fn parse_yaml(raw: &str) -> Metadata {
    if raw.trim().is_empty() {
        return Metadata::default();
    }

    match serde_yaml::from_str::<YamlValue>(raw) {
        Ok(YamlValue::Mapping(mapping)) => Metadata(mapping),
        Ok(YamlValue::Null) => Metadata::default(),
        Ok(_) => {
            warn!("Could not parse frontmatter: expected a mapping of keys to values");
            Metadata::default()
        }
        Err(err) => {
            warn!("Could not parse frontmatter: {err}");
            Metadata::default()
        }
    }
}

fn parse_flat(raw: &str) -> Metadata {
    let mut mapping = Mapping::new();

    for line in raw.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().trim_matches(['"', '\'']);
        mapping.insert(
            YamlValue::String(key.trim().to_string()),
            YamlValue::String(value.to_string()),
        );
    }

    Metadata(mapping)
}

fn is_truthy(value: &YamlValue) -> bool {
    match value {
        YamlValue::Null => false,
        YamlValue::Bool(flag) => *flag,
        YamlValue::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        YamlValue::String(text) => !text.is_empty(),
        YamlValue::Sequence(items) => !items.is_empty(),
        YamlValue::Mapping(mapping) => !mapping.is_empty(),
        YamlValue::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

fn scalar_to_string(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(text) => Some(text.clone()),
        YamlValue::Number(number) => Some(number.to_string()),
        YamlValue::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn key_to_string(key: &YamlValue) -> String {
    scalar_to_string(key).unwrap_or_else(|| {
        serde_yaml::to_string(key)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default()
    })
}

fn yaml_to_json(value: &YamlValue) -> JsonValue {
    match value {
        YamlValue::Mapping(mapping) => JsonValue::Object(
            mapping
                .iter()
                .map(|(key, value)| (key_to_string(key), yaml_to_json(value)))
                .collect(),
        ),
        YamlValue::Sequence(items) => JsonValue::Array(items.iter().map(yaml_to_json).collect()),
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
        other => serde_json::to_value(other).unwrap_or(JsonValue::Null),
    }
}
