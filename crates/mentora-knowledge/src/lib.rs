// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-learner knowledge base for the Mentora tutor agent.
//!
//! Three layers, bottom up:
//!
//! - [`similarity`] - pure cosine similarity and ranking over embeddings
//! - [`normalizer`] - maps free-form topic mentions onto canonical topics
//! - [`store`] - flat-file persistence of profiles, timeline, notes, and
//!   the note embedding index, with soft-failure read/write contracts

pub mod normalizer;
pub mod similarity;
pub mod store;
pub mod types;

pub use normalizer::{Normalized, TopicNormalizer};
pub use similarity::{cosine_similarity, rank_by_similarity};
pub use store::KnowledgeStore;
pub use types::{
    EventSource, IndexEntry, NoteMatch, NoteMode, NoteSearch, ProfileField, ProfileSnapshot,
    ReadStatus, TimelineEvent, TopicProfile, WriteOutcome, WriteRequest, WriteStatus,
};
