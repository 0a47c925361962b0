// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted document types and value objects for the knowledge base.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lowest and highest permitted mastery/confidence score.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

/// Clamp a mastery/confidence score into the permitted range.
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(SCORE_MIN, SCORE_MAX)
}

/// Derive a file-name slug from a topic name.
///
/// Lowercases, maps runs of non-alphanumeric characters to single
/// hyphens, and trims leading/trailing hyphens. `"Rust Async!"` becomes
/// `"rust-async"`.
pub fn slugify(topic: &str) -> String {
    let mut slug = String::with_capacity(topic.len());
    let mut last_was_hyphen = true;
    for ch in topic.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("untitled");
    }
    slug
}

/// What the learner knows about one topic.
///
/// Profiles are created lazily with zeroed scores on first reference and
/// are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopicProfile {
    pub mastery: f64,
    pub confidence: f64,
    /// Date of the last write that actually changed a field.
    pub last_reviewed: Option<NaiveDate>,
    /// Note file path relative to the knowledge root, e.g. `notes/rust.md`.
    pub note_path: String,
}

impl TopicProfile {
    /// A fresh zeroed profile for `topic`.
    pub fn new(topic: &str) -> Self {
        Self {
            mastery: 0.0,
            confidence: 0.0,
            last_reviewed: None,
            note_path: format!("notes/{}.md", slugify(topic)),
        }
    }
}

/// The profile document as stored in `profile.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileDocument {
    /// Last write timestamp, ISO-8601.
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub topics: BTreeMap<String, TopicProfile>,
}

/// Which profile field a timeline event records a change to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileField {
    Mastery,
    Confidence,
    Notes,
}

/// Who initiated a knowledge write.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    Agent,
    User,
}

/// One append-only learning-history record in `timeline.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineEvent {
    /// ISO-8601 timestamp, non-decreasing across the file.
    pub timestamp: String,
    pub topic: String,
    pub field: ProfileField,
    pub old_value: serde_json::Value,
    pub new_value: serde_json::Value,
    pub reason: String,
    pub source: EventSource,
}

/// One record of the embedding index in `index.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexEntry {
    pub topic: String,
    pub note_path: String,
    pub embedding: Vec<f32>,
}

/// Health of a profile read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReadStatus {
    /// All files loaded cleanly (or do not exist yet).
    Ok,
    /// Some files were missing or unreadable; defaults substituted.
    Partial,
    /// Nothing usable could be loaded.
    Error,
}

/// Snapshot returned by `read_profile`. Reads never fail; degradation is
/// reported through `status` and `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub topics: BTreeMap<String, TopicProfile>,
    /// Most recent first, capped at 10.
    pub recent_events: Vec<TimelineEvent>,
    pub status: ReadStatus,
    pub message: Option<String>,
}

/// A ranked match from semantic note search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteMatch {
    pub title: String,
    pub note_path: String,
    pub score: f32,
    pub preview: String,
}

/// Result of `search_notes`. Failures surface in `error`, never as `Err`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSearch {
    pub matches: Vec<NoteMatch>,
    pub error: Option<String>,
}

impl NoteSearch {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            matches: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// How note text in a write request combines with the existing note.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NoteMode {
    /// Append after a blank-line separator.
    #[default]
    Append,
    /// Replace the whole note under a fresh topic heading.
    Replace,
}

/// A knowledge write request. Omitted fields retain their prior values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteRequest {
    pub topic: String,
    #[serde(default)]
    pub mastery: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub mode: NoteMode,
    #[serde(default)]
    pub reason: String,
    #[serde(default = "default_source")]
    pub source: EventSource,
}

fn default_source() -> EventSource {
    EventSource::Agent
}

impl WriteRequest {
    /// A request that touches nothing but the topic (lazy creation only).
    pub fn topic_only(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            mastery: None,
            confidence: None,
            notes: None,
            mode: NoteMode::Append,
            reason: String::new(),
            source: EventSource::Agent,
        }
    }
}

/// Whether a write applied fully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    Ok,
    Failed,
}

/// Outcome of a knowledge write. Filesystem and embedder failures are
/// reported here, never raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub status: WriteStatus,
    pub message: String,
    pub changed_fields: Vec<ProfileField>,
}
