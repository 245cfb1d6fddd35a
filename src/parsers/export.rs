use std::collections::BTreeSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::Value;

use crate::types::{ConversationRecord, Message, Role};

const UNTITLED: &str = "Untitled conversation";

#[derive(Debug, Clone, Copy, PartialEq)]
enum ExportKind {
    Json,
    Zip,
}

fn export_kind(path: &Path) -> Option<ExportKind> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("json") => Some(ExportKind::Json),
        Some("zip") => Some(ExportKind::Zip),
        _ => None,
    }
}

/// Load every conversation from the given files and directories.
///
/// Files are parsed in parallel; records come back in the order the paths
/// were given (directories expand in name order).
pub fn load_exports(paths: &[PathBuf]) -> Result<Vec<ConversationRecord>> {
    let files = collect_export_files(paths)?;
    tracing::debug!("found {} export files", files.len());

    let per_file: Vec<Result<Vec<ConversationRecord>>> =
        files.par_iter().map(|path| load_file(path)).collect();

    let mut conversations = Vec::new();
    for records in per_file {
        conversations.extend(records?);
    }
    tracing::info!(
        "loaded {} conversations from {} files",
        conversations.len(),
        files.len()
    );
    Ok(conversations)
}

/// Expand paths into export files. Explicit files must be `.json` or
/// `.zip`; inside directories other files are ignored.
pub fn collect_export_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            bail!("path not found: {}", path.display());
        }
        if path.is_dir() {
            collect_dir(path, &mut files)?;
        } else if export_kind(path).is_some() {
            files.push(path.clone());
        } else {
            bail!(
                "unsupported file type: {} (expected .json or .zip)",
                path.display()
            );
        }
    }
    Ok(files)
}

fn collect_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        entries.push(entry?.path());
    }
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_dir(&path, files)?;
        } else if export_kind(&path).is_some() {
            files.push(path);
        } else {
            tracing::debug!("ignoring {}", path.display());
        }
    }
    Ok(())
}

fn load_file(path: &Path) -> Result<Vec<ConversationRecord>> {
    let source = path.display().to_string();
    match export_kind(path) {
        Some(ExportKind::Json) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read export: {}", source))?;
            parse_export(&content, &source)
        }
        Some(ExportKind::Zip) => load_zip(path),
        None => bail!("unsupported file type: {}", source),
    }
}

fn load_zip(path: &Path) -> Result<Vec<ConversationRecord>> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open archive: {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("invalid zip archive: {}", path.display()))?;

    let mut conversations = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() || !entry.name().to_lowercase().ends_with(".json") {
            continue;
        }
        let source = format!("{}:{}", path.display(), entry.name());
        let mut content = String::new();
        if let Err(e) = entry.read_to_string(&mut content) {
            tracing::warn!("skipping {}: {}", source, e);
            continue;
        }
        match parse_export(&content, &source) {
            Ok(records) => conversations.extend(records),
            Err(e) => tracing::warn!("skipping {}: {:#}", source, e),
        }
    }
    Ok(conversations)
}

/// Parse one JSON document: a list of conversations, an object with a
/// `conversations` list, or a single conversation object.
pub fn parse_export(content: &str, source: &str) -> Result<Vec<ConversationRecord>> {
    let document: Value =
        serde_json::from_str(content).with_context(|| format!("invalid JSON in {}", source))?;

    let entries = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("conversations") {
            Some(Value::Array(items)) => items,
            Some(_) => bail!("'conversations' is not a list in {}", source),
            None => vec![Value::Object(map)],
        },
        _ => bail!("unrecognized export structure in {}", source),
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value::<RawConversation>(entry) {
            Ok(raw) => Some(raw.into_record(&format!("{}#{}", source, i))),
            Err(e) => {
                tracing::warn!("skipping conversation {} in {}: {}", i, source, e);
                None
            }
        })
        .collect())
}

// --- Raw export shapes ---

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConversation {
    id: Option<Value>,
    conversation_id: Option<Value>,
    title: Option<String>,
    create_time: Option<Value>,
    update_time: Option<Value>,
    created_at: Option<Value>,
    updated_at: Option<Value>,
    /// ChatGPT message tree, keyed by node id
    mapping: Option<serde_json::Map<String, Value>>,
    messages: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNode {
    message: Option<RawNodeMessage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNodeMessage {
    author: RawAuthor,
    content: Option<Value>,
    create_time: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAuthor {
    role: Option<String>,
    name: Option<String>,
}

/// A message plus the raw author strings that feed `participants`.
struct ParsedMessage {
    message: Message,
    sort_key: f64,
    authors: Vec<String>,
}

impl RawConversation {
    fn into_record(self, fallback_id: &str) -> ConversationRecord {
        let id = self
            .conversation_id
            .as_ref()
            .or(self.id.as_ref())
            .and_then(value_as_id)
            .unwrap_or_else(|| fallback_id.to_string());
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let parsed = match (self.mapping, self.messages) {
            (Some(mapping), _) => parse_mapping(mapping),
            (None, Some(messages)) => messages.iter().map(parse_flat_message).collect(),
            (None, None) => Vec::new(),
        };

        let participants: BTreeSet<String> = parsed
            .iter()
            .flat_map(|p| p.authors.iter().cloned())
            .collect();

        ConversationRecord {
            id,
            title,
            messages: parsed.into_iter().map(|p| p.message).collect(),
            participants,
            created_at: self
                .create_time
                .as_ref()
                .or(self.created_at.as_ref())
                .and_then(parse_timestamp),
            updated_at: self
                .update_time
                .as_ref()
                .or(self.updated_at.as_ref())
                .and_then(parse_timestamp),
        }
    }
}

/// Tree nodes in document order, blank nodes dropped, stable-sorted by
/// creation time (missing times sort as 0).
fn parse_mapping(mapping: serde_json::Map<String, Value>) -> Vec<ParsedMessage> {
    let mut parsed: Vec<ParsedMessage> = mapping
        .into_iter()
        .filter_map(|(_, node)| serde_json::from_value::<RawNode>(node).ok()?.message)
        .filter_map(|raw| {
            let text = raw.content.as_ref().map(content_text).unwrap_or_default();
            if text.trim().is_empty() {
                return None;
            }
            let role_raw = raw.author.role.unwrap_or_default();
            let timestamp = raw.create_time.as_ref().and_then(parse_timestamp);
            let sort_key = raw.create_time.as_ref().and_then(value_as_f64).unwrap_or(0.0);
            let mut message = Message::new(Role::from_author(&role_raw), text.trim());
            message.timestamp = timestamp;
            Some(ParsedMessage {
                message,
                sort_key,
                authors: author_names(&role_raw, raw.author.name.as_deref()),
            })
        })
        .collect();

    parsed.sort_by(|a, b| {
        a.sort_key
            .partial_cmp(&b.sort_key)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    parsed
}

fn parse_flat_message(raw: &Value) -> ParsedMessage {
    let field = |key: &str| raw.get(key).filter(|v| !v.is_null());

    let (role_raw, name) = match field("author") {
        Some(Value::Object(author)) => (
            author.get("role").and_then(Value::as_str).unwrap_or_default(),
            author.get("name").and_then(Value::as_str),
        ),
        Some(Value::String(name)) => (
            field("role").and_then(Value::as_str).unwrap_or_default(),
            Some(name.as_str()),
        ),
        _ => (
            field("role").and_then(Value::as_str).unwrap_or_default(),
            field("name").and_then(Value::as_str),
        ),
    };

    let text = field("content")
        .or_else(|| field("text"))
        .map(content_text)
        .unwrap_or_default();
    let time = field("timestamp").or_else(|| field("create_time"));

    let mut message = Message::new(Role::from_author(role_raw), text);
    message.timestamp = time.and_then(parse_timestamp);
    ParsedMessage {
        message,
        sort_key: 0.0,
        authors: author_names(role_raw, name),
    }
}

fn author_names(role: &str, name: Option<&str>) -> Vec<String> {
    [Some(role), name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Message text from a string, a `{parts: [...]}` / `{text: ...}` object, or
/// a list of strings and `{text: ...}` blocks. Anything else reads as empty.
fn content_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(items) => join_parts(items),
        Value::Object(map) => match (map.get("parts"), map.get("text")) {
            (Some(Value::Array(parts)), _) => join_parts(parts),
            (_, Some(Value::String(text))) => text.clone(),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

fn join_parts(parts: &[Value]) -> String {
    parts
        .iter()
        .filter_map(|part| match part {
            Value::String(s) => Some(s.as_str()),
            Value::Object(block) => block.get("text").and_then(Value::as_str),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_timestamp(value)
            .map(|dt| dt.timestamp() as f64)
            .or_else(|| s.trim().parse().ok()),
        _ => None,
    }
}

/// Epoch seconds (number or numeric string) or an RFC 3339 string.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_f64().and_then(from_epoch),
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_epoch))
        }
        _ => None,
    }
}

fn from_epoch(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}
