// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-learner knowledge store.
//!
//! Persists a topic profile map, an append-only learning timeline, one
//! markdown note per topic, and an embedding index over the notes, all as
//! flat files under the configured data directory:
//!
//! ```text
//! knowledge/
//!   profile.json    topic -> {mastery, confidence, last_reviewed, note_path}
//!   timeline.json   append-only TimelineEvent array
//!   notes/<slug>.md one markdown note per topic
//!   index.json      {topic, note_path, embedding} records
//! ```
//!
//! Reads and writes follow a soft-failure contract: `read_profile`,
//! `search_notes` and `write` report degradation through status fields
//! instead of returning `Err`, so the dialogue loop never has to handle
//! a store error mid-conversation.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tokio::fs;
use tracing::{debug, warn};

use mentora_core::MentoraError;
use mentora_core::traits::embedding::EmbeddingAdapter;
use mentora_core::types::EmbeddingRole;

use crate::similarity::rank_by_similarity;
use crate::types::{
    IndexEntry, NoteMatch, NoteMode, NoteSearch, ProfileDocument, ProfileField, ProfileSnapshot,
    ReadStatus, TimelineEvent, TopicProfile, WriteOutcome, WriteRequest, WriteStatus, clamp_score,
};

const PROFILE_FILE: &str = "profile.json";
const TIMELINE_FILE: &str = "timeline.json";
const INDEX_FILE: &str = "index.json";

/// Number of timeline events surfaced in a profile snapshot.
const RECENT_EVENTS_CAP: usize = 10;

/// Flat-file knowledge store for a single learner.
pub struct KnowledgeStore {
    root: PathBuf,
    embedder: Arc<dyn EmbeddingAdapter>,
    preview_chars: usize,
}

impl KnowledgeStore {
    pub fn new(root: impl Into<PathBuf>, embedder: Arc<dyn EmbeddingAdapter>) -> Self {
        Self {
            root: root.into(),
            embedder,
            preview_chars: 200,
        }
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Read the full profile snapshot.
    ///
    /// Never fails: missing files mean a fresh store, unreadable files
    /// degrade to defaults with the problem noted in `message`.
    pub async fn read_profile(&self) -> ProfileSnapshot {
        let mut problems = Vec::new();

        let topics = match self.load_json::<ProfileDocument>(PROFILE_FILE).await {
            Ok(Some(doc)) => doc.topics,
            Ok(None) => Default::default(),
            Err(message) => {
                warn!(%message, "profile.json unreadable, substituting empty profile");
                problems.push(message);
                Default::default()
            }
        };

        let mut recent_events = match self.load_json::<Vec<TimelineEvent>>(TIMELINE_FILE).await {
            Ok(Some(events)) => events,
            Ok(None) => Vec::new(),
            Err(message) => {
                warn!(%message, "timeline.json unreadable, substituting empty timeline");
                problems.push(message);
                Vec::new()
            }
        };
        recent_events.reverse();
        recent_events.truncate(RECENT_EVENTS_CAP);

        let status = match problems.len() {
            0 => ReadStatus::Ok,
            1 => ReadStatus::Partial,
            _ => ReadStatus::Error,
        };
        ProfileSnapshot {
            topics,
            recent_events,
            status,
            message: if problems.is_empty() {
                None
            } else {
                Some(problems.join("; "))
            },
        }
    }

    /// Canonical topic names currently in the profile.
    pub async fn topic_names(&self) -> Vec<String> {
        match self.load_json::<ProfileDocument>(PROFILE_FILE).await {
            Ok(Some(doc)) => doc.topics.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Apply a knowledge write.
    ///
    /// The full prior state is reloaded immediately before mutating, so
    /// concurrent writers converge on last-writer-wins per field rather
    /// than clobbering whole documents. Unchanged values produce no
    /// timeline event and do not touch `last_reviewed`.
    pub async fn write(&self, request: WriteRequest) -> WriteOutcome {
        let requested_topic = request.topic.trim();
        if requested_topic.is_empty() {
            return WriteOutcome {
                status: WriteStatus::Failed,
                message: "topic must not be empty".to_string(),
                changed_fields: Vec::new(),
            };
        }

        let mut notices: Vec<String> = Vec::new();
        let mut doc = match self.load_json::<ProfileDocument>(PROFILE_FILE).await {
            Ok(Some(doc)) => doc,
            Ok(None) => ProfileDocument::default(),
            Err(message) => {
                warn!(%message, "profile.json unreadable, starting a fresh profile");
                notices.push(format!("prior profile was unreadable ({message})"));
                ProfileDocument::default()
            }
        };

        // Merge case-insensitively into an existing spelling.
        let topic = doc
            .topics
            .keys()
            .find(|k| k.eq_ignore_ascii_case(requested_topic))
            .cloned()
            .unwrap_or_else(|| requested_topic.to_string());
        let entry = doc
            .topics
            .entry(topic.clone())
            .or_insert_with(|| TopicProfile::new(&topic));

        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut changed_fields = Vec::new();
        let mut events = Vec::new();

        if let Some(mastery) = request.mastery {
            let new = clamp_score(mastery);
            if new != entry.mastery {
                events.push(TimelineEvent {
                    timestamp: timestamp.clone(),
                    topic: topic.clone(),
                    field: ProfileField::Mastery,
                    old_value: serde_json::json!(entry.mastery),
                    new_value: serde_json::json!(new),
                    reason: request.reason.clone(),
                    source: request.source,
                });
                entry.mastery = new;
                changed_fields.push(ProfileField::Mastery);
            }
        }

        if let Some(confidence) = request.confidence {
            let new = clamp_score(confidence);
            if new != entry.confidence {
                events.push(TimelineEvent {
                    timestamp: timestamp.clone(),
                    topic: topic.clone(),
                    field: ProfileField::Confidence,
                    old_value: serde_json::json!(entry.confidence),
                    new_value: serde_json::json!(new),
                    reason: request.reason.clone(),
                    source: request.source,
                });
                entry.confidence = new;
                changed_fields.push(ProfileField::Confidence);
            }
        }

        let note = request
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if let Some(note) = note {
            match self
                .write_note(&topic, &entry.note_path, note, request.mode)
                .await
            {
                Ok(Some((old_preview, new_content))) => {
                    events.push(TimelineEvent {
                        timestamp: timestamp.clone(),
                        topic: topic.clone(),
                        field: ProfileField::Notes,
                        old_value: old_preview
                            .map(|p| serde_json::json!(p))
                            .unwrap_or(serde_json::Value::Null),
                        new_value: serde_json::json!(self.preview(note)),
                        reason: request.reason.clone(),
                        source: request.source,
                    });
                    changed_fields.push(ProfileField::Notes);
                    if let Err(message) = self
                        .refresh_index_entry(&topic, &entry.note_path, &new_content)
                        .await
                    {
                        notices.push(message);
                    }
                }
                Ok(None) => {
                    debug!(topic, "note content unchanged, skipping write");
                }
                Err(message) => {
                    return WriteOutcome {
                        status: WriteStatus::Failed,
                        message,
                        changed_fields,
                    };
                }
            }
        }

        if !changed_fields.is_empty() {
            entry.last_reviewed = Some(Utc::now().date_naive());
            doc.updated_at = Some(timestamp);

            if let Err(message) = self.save_json(PROFILE_FILE, &doc).await {
                return WriteOutcome {
                    status: WriteStatus::Failed,
                    message,
                    changed_fields,
                };
            }
            if let Err(message) = self.append_events(events).await {
                return WriteOutcome {
                    status: WriteStatus::Failed,
                    message,
                    changed_fields,
                };
            }
        }

        let mut message = if changed_fields.is_empty() {
            format!("no changes for '{topic}'")
        } else {
            let fields: Vec<String> = changed_fields.iter().map(|f| f.to_string()).collect();
            format!("updated '{topic}': {}", fields.join(", "))
        };
        if !notices.is_empty() {
            message.push_str(&format!(" ({})", notices.join("; ")));
        }
        debug!(topic, ?changed_fields, "knowledge write applied");
        WriteOutcome {
            status: WriteStatus::Ok,
            message,
            changed_fields,
        }
    }

    /// Semantic search over topic notes.
    ///
    /// Failures (absent index, embedder down) surface in the `error`
    /// field, never as `Err`.
    pub async fn search_notes(&self, query: &str, top_k: usize) -> NoteSearch {
        let entries = match self.load_json::<Vec<IndexEntry>>(INDEX_FILE).await {
            Ok(Some(entries)) if !entries.is_empty() => entries,
            Ok(_) => {
                return NoteSearch::failure(
                    "embedding index not found; run `mentora reindex` first",
                );
            }
            Err(message) => return NoteSearch::failure(message),
        };

        let query_vector = match self.embedder.embed(query, EmbeddingRole::Query).await {
            Ok(vector) => vector,
            Err(err) => return NoteSearch::failure(format!("embedding failed: {err}")),
        };

        let candidates = entries
            .iter()
            .map(|entry| (entry, entry.embedding.as_slice()));
        let ranked = rank_by_similarity(&query_vector, candidates);

        let mut matches = Vec::new();
        for (entry, score) in ranked.into_iter().take(top_k) {
            let preview = match fs::read_to_string(self.root.join(&entry.note_path)).await {
                Ok(content) => self.preview(&content),
                Err(_) => String::new(),
            };
            matches.push(NoteMatch {
                title: entry.topic.clone(),
                note_path: entry.note_path.clone(),
                score,
                preview,
            });
        }
        NoteSearch {
            matches,
            error: None,
        }
    }

    /// Rebuild `index.json` from scratch by re-embedding every note.
    ///
    /// Returns the number of topics indexed. Topics without a readable
    /// note file are skipped with a warning.
    pub async fn rebuild_index(&self) -> Result<usize, MentoraError> {
        let doc = self
            .load_json::<ProfileDocument>(PROFILE_FILE)
            .await
            .map_err(MentoraError::Internal)?
            .unwrap_or_default();

        let mut entries = Vec::new();
        for (topic, profile) in &doc.topics {
            let content = match fs::read_to_string(self.root.join(&profile.note_path)).await {
                Ok(content) => content,
                Err(err) => {
                    warn!(topic, note_path = %profile.note_path, %err, "skipping unreadable note");
                    continue;
                }
            };
            let embedding = self.embedder.embed(&content, EmbeddingRole::Passage).await?;
            entries.push(IndexEntry {
                topic: topic.clone(),
                note_path: profile.note_path.clone(),
                embedding,
            });
        }

        let count = entries.len();
        self.save_json(INDEX_FILE, &entries)
            .await
            .map_err(MentoraError::Internal)?;
        debug!(count, "embedding index rebuilt");
        Ok(count)
    }

    // --- note handling ---

    /// Write the note file for `topic`.
    ///
    /// Returns `Ok(Some((old_preview, new_content)))` when the file
    /// changed, `Ok(None)` on a content no-op, `Err(message)` on I/O
    /// failure.
    async fn write_note(
        &self,
        topic: &str,
        note_path: &str,
        note: &str,
        mode: NoteMode,
    ) -> Result<Option<(Option<String>, String)>, String> {
        let path = self.root.join(note_path);
        let existing = fs::read_to_string(&path).await.ok();

        let new_content = match (&existing, mode) {
            (Some(current), NoteMode::Append) => {
                format!("{}\n\n{note}\n", current.trim_end())
            }
            _ => format!("# {topic}\n\n{note}\n"),
        };
        if existing.as_deref() == Some(new_content.as_str()) {
            return Ok(None);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| format!("could not create {}: {err}", parent.display()))?;
        }
        fs::write(&path, &new_content)
            .await
            .map_err(|err| format!("could not write {}: {err}", path.display()))?;

        let old_preview = existing.as_deref().map(|content| self.preview(content));
        Ok(Some((old_preview, new_content)))
    }

    /// Re-embed the full note content and upsert its index record.
    ///
    /// The note itself is already on disk; an embedding or index failure
    /// only degrades search, so it is reported as a notice, not a write
    /// failure.
    async fn refresh_index_entry(
        &self,
        topic: &str,
        note_path: &str,
        content: &str,
    ) -> Result<(), String> {
        let embedding = self
            .embedder
            .embed(content, EmbeddingRole::Passage)
            .await
            .map_err(|err| format!("note saved but embedding failed: {err}"))?;

        let mut entries = self
            .load_json::<Vec<IndexEntry>>(INDEX_FILE)
            .await
            .unwrap_or_default()
            .unwrap_or_default();
        match entries.iter_mut().find(|e| e.topic == topic) {
            Some(entry) => {
                entry.note_path = note_path.to_string();
                entry.embedding = embedding;
            }
            None => entries.push(IndexEntry {
                topic: topic.to_string(),
                note_path: note_path.to_string(),
                embedding,
            }),
        }
        self.save_json(INDEX_FILE, &entries).await
    }

    async fn append_events(&self, events: Vec<TimelineEvent>) -> Result<(), String> {
        if events.is_empty() {
            return Ok(());
        }
        let mut timeline = match self.load_json::<Vec<TimelineEvent>>(TIMELINE_FILE).await {
            Ok(Some(timeline)) => timeline,
            Ok(None) => Vec::new(),
            Err(message) => {
                warn!(%message, "timeline.json unreadable, starting a fresh timeline");
                Vec::new()
            }
        };
        timeline.extend(events);
        self.save_json(TIMELINE_FILE, &timeline).await
    }

    // --- file helpers ---

    /// Load and parse a JSON file under the store root.
    ///
    /// `Ok(None)` means the file does not exist; `Err` carries a
    /// human-readable message for read or parse failures.
    async fn load_json<T: serde::de::DeserializeOwned>(
        &self,
        file: &str,
    ) -> Result<Option<T>, String> {
        let path = self.root.join(file);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(format!("could not read {}: {err}", path.display())),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| format!("could not parse {}: {err}", path.display()))
    }

    async fn save_json<T: serde::Serialize>(&self, file: &str, value: &T) -> Result<(), String> {
        let path = self.root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| format!("could not create {}: {err}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(value)
            .map_err(|err| format!("could not serialize {}: {err}", path.display()))?;
        fs::write(&path, json)
            .await
            .map_err(|err| format!("could not write {}: {err}", path.display()))
    }

    fn preview(&self, content: &str) -> String {
        let collapsed: String = content.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.chars().take(self.preview_chars).collect()
    }
}
