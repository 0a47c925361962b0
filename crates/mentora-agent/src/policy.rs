// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword and regex policy detection over user input.
//!
//! `analyze` is a pure function from one user message to the set of tool
//! obligations the dialogue loop must discharge before answering. The
//! tables are deliberately recall-biased: a false positive costs one
//! redundant tool call, a false negative breaks the tutoring contract.

use std::sync::OnceLock;

use regex::Regex;
use strum::Display;

/// Recency vocabulary that obligates a web search.
const SEARCH_TRIGGERS: &[&str] = &[
    "recent",
    "new",
    "latest",
    "current",
    "today",
    "update",
    "news",
    "happening",
    "trend",
];

/// Phrases expressing interest in a topic; the words after the phrase
/// become the read payload.
const TOPIC_TRIGGERS: &[&str] = &[
    "tell me about",
    "explain",
    "what is",
    "what are",
    "how does",
    "i want to learn",
    "teach me",
    "let's discuss",
    "talk about",
    "interested in",
    "curious about",
];

/// Confusion phrasing; also yields a read payload.
const CONFUSION_TRIGGERS: &[&str] = &[
    "doesn't make sense",
    "don't understand",
    "confused about",
    "struggling with",
    "help with",
];

/// First-person skill demonstrations that obligate a knowledge write.
const SKILL_TRIGGERS: &[&str] = &[
    "i built",
    "i made",
    "i created",
    "i implemented",
    "i developed",
    "i learned",
    "i understand",
    "i know",
    "i figured out",
    "i completed",
];

/// Maximum words captured as a topic payload.
const TOPIC_SPAN_WORDS: usize = 5;

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r#"https?://[^\s<>"')\]]+"#).expect("url regex is valid"))
}

fn year_regex() -> &'static Regex {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"\b20\d{2}\b").expect("year regex is valid"))
}

/// The four tool obligations, in discharge priority order: fetch the
/// user's URL first, read their knowledge second, search third, write
/// the new knowledge last (just before answering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ObligationKind {
    Fetch,
    Read,
    Search,
    Write,
}

/// Required/satisfied bookkeeping for one turn of the dialogue loop.
#[derive(Debug, Clone, Default)]
pub struct ObligationSet {
    pub fetch_required: bool,
    pub fetch_satisfied: bool,
    /// URLs found in the user message.
    pub fetch_urls: Vec<String>,

    pub read_required: bool,
    pub read_satisfied: bool,
    /// Topic span extracted from the user message.
    pub read_topic: String,

    pub search_required: bool,
    pub search_satisfied: bool,

    pub write_required: bool,
    pub write_satisfied: bool,
}

impl ObligationSet {
    /// Unsatisfied obligations in discharge priority order, rendered for
    /// the system prompt.
    pub fn pending(&self) -> Vec<String> {
        let mut pending = Vec::new();
        if self.fetch_required && !self.fetch_satisfied {
            pending.push(format!("FETCH (urls: {})", self.fetch_urls.join(", ")));
        }
        if self.read_required && !self.read_satisfied {
            pending.push(format!("READ (topic: {})", self.read_topic));
        }
        if self.search_required && !self.search_satisfied {
            pending.push("SEARCH".to_string());
        }
        if self.write_required && !self.write_satisfied {
            pending.push("WRITE".to_string());
        }
        pending
    }

    pub fn all_satisfied(&self) -> bool {
        !(self.fetch_required && !self.fetch_satisfied
            || self.read_required && !self.read_satisfied
            || self.search_required && !self.search_satisfied
            || self.write_required && !self.write_satisfied)
    }

    /// Mark an obligation discharged. Failed tool executions still count
    /// as attempted; the loop must not spin on a broken tool.
    pub fn mark_satisfied(&mut self, kind: ObligationKind) {
        match kind {
            ObligationKind::Fetch => self.fetch_satisfied = true,
            ObligationKind::Read => self.read_satisfied = true,
            ObligationKind::Search => self.search_satisfied = true,
            ObligationKind::Write => self.write_satisfied = true,
        }
    }
}

/// Detects obligations triggered by a user message.
pub struct PolicyDetector;

impl PolicyDetector {
    /// Pure analysis of one user message. No LLM involved.
    pub fn analyze(text: &str) -> ObligationSet {
        let mut set = ObligationSet::default();

        let urls = Self::detect_urls(text);
        if !urls.is_empty() {
            set.fetch_required = true;
            set.fetch_urls = urls;
        }

        if Self::detect_search_need(text) {
            set.search_required = true;
        }

        if let Some(topic) = Self::detect_topic_interest(text) {
            set.read_required = true;
            set.read_topic = topic;
        }

        // Write triggers on skill demonstration, but also whenever a
        // search or read is obligated: new content will be taught, so it
        // must be recorded.
        if Self::detect_skill_demonstration(text) || set.search_required || set.read_required {
            set.write_required = true;
        }

        set
    }

    pub fn detect_urls(text: &str) -> Vec<String> {
        url_regex()
            .find_iter(text)
            .map(|m| m.as_str().trim_end_matches(['.', ',']).to_string())
            .collect()
    }

    pub fn detect_search_need(text: &str) -> bool {
        let lower = text.to_ascii_lowercase();
        SEARCH_TRIGGERS.iter().any(|t| lower.contains(t)) || year_regex().is_match(text)
    }

    pub fn detect_skill_demonstration(text: &str) -> bool {
        let lower = text.to_ascii_lowercase();
        SKILL_TRIGGERS.iter().any(|t| lower.contains(t))
    }

    /// Extract a topic the user is interested in, confused about,
    /// studying, or shifting to. The span is capped at five words.
    pub fn detect_topic_interest(text: &str) -> Option<String> {
        let lower = text.to_ascii_lowercase();

        for trigger in TOPIC_TRIGGERS {
            if let Some(idx) = lower.find(trigger) {
                let span = Self::span_of(&text[idx + trigger.len()..]);
                if !span.is_empty() {
                    return Some(span);
                }
            }
        }

        for trigger in CONFUSION_TRIGGERS {
            let Some(idx) = lower.find(trigger) else {
                continue;
            };
            if *trigger == "doesn't make sense" {
                // The topic precedes this phrasing. The marker only helps
                // when it also appears before it; otherwise fall back to
                // the words leading up to the phrase.
                let marker = "something about";
                if let Some(span_start) = lower.find(marker).map(|s| s + marker.len()) {
                    if span_start <= idx {
                        let span = Self::span_of(&lower[span_start..idx]);
                        if !span.is_empty() {
                            return Some(span);
                        }
                    }
                }
                let before: Vec<&str> = lower[..idx].split_whitespace().collect();
                let tail = before
                    .iter()
                    .rev()
                    .take(TOPIC_SPAN_WORDS)
                    .rev()
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" ");
                if !tail.is_empty() {
                    return Some(tail);
                }
            } else {
                let span = Self::span_of(&text[idx + trigger.len()..]);
                if !span.is_empty() {
                    return Some(span);
                }
            }
        }

        // Student-role phrasing: "i am a <topic> student".
        if let (Some(start), Some(end)) = (lower.find("i am a"), lower.find("student")) {
            let start = start + "i am a".len();
            if start < end {
                let span = lower[start..end].trim().to_string();
                if !span.is_empty() {
                    return Some(span);
                }
            }
        }

        // Topic-shift phrasing.
        if lower.starts_with("now ") || lower.contains("switch to") || lower.contains("change topic")
        {
            let span = text
                .split_whitespace()
                .skip(1)
                .take(TOPIC_SPAN_WORDS)
                .collect::<Vec<_>>()
                .join(" ");
            let span = span.trim_matches(['.', ',', '?', '!']).to_string();
            if !span.is_empty() {
                return Some(span);
            }
        }

        None
    }

    fn span_of(rest: &str) -> String {
        rest.split_whitespace()
            .take(TOPIC_SPAN_WORDS)
            .collect::<Vec<_>>()
            .join(" ")
            .trim_matches(['.', ',', '?', '!'])
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_obligate_fetch_with_payload() {
        let set =
            PolicyDetector::analyze("Can you summarize https://example.com/post for me?");
        assert!(set.fetch_required);
        assert_eq!(set.fetch_urls, vec!["https://example.com/post"]);
    }

    #[test]
    fn recency_vocabulary_obligates_search_and_write() {
        let set = PolicyDetector::analyze("What's the latest in compilers?");
        assert!(set.search_required);
        // Searching implies teaching new content, which must be recorded.
        assert!(set.write_required);
    }

    #[test]
    fn four_digit_year_obligates_search() {
        let set = PolicyDetector::analyze("What changed in Rust in 2026?");
        assert!(set.search_required);
    }

    #[test]
    fn topic_interest_obligates_read_with_span() {
        let set = PolicyDetector::analyze("Tell me about graph neural networks please and thanks");
        assert!(set.read_required);
        assert_eq!(set.read_topic, "graph neural networks please and");
        assert!(set.write_required);
    }

    #[test]
    fn topic_span_is_capped_at_five_words() {
        let set = PolicyDetector::analyze("teach me one two three four five six seven");
        assert_eq!(set.read_topic.split_whitespace().count(), 5);
    }

    #[test]
    fn confusion_phrasing_obligates_read() {
        let set = PolicyDetector::analyze("I'm confused about lifetimes in Rust");
        assert!(set.read_required);
        assert_eq!(set.read_topic, "lifetimes in Rust");
    }

    #[test]
    fn doesnt_make_sense_looks_before_the_phrase() {
        let set = PolicyDetector::analyze("something about borrow checking doesn't make sense");
        assert!(set.read_required);
        assert_eq!(set.read_topic, "borrow checking");
    }

    #[test]
    fn topic_mention_after_confusion_phrase_falls_back_to_preceding_words() {
        // "something about" here comes after the confusion phrase, so it
        // cannot delimit the topic; the words before the phrase win.
        let set = PolicyDetector::analyze(
            "That doesn't make sense. Can you say something about monads?",
        );
        assert!(set.read_required);
        assert_eq!(set.read_topic, "that");
    }

    #[test]
    fn student_role_phrasing_obligates_read() {
        let set = PolicyDetector::analyze("Hi, I am a physics student");
        assert!(set.read_required);
        assert_eq!(set.read_topic, "physics");
    }

    #[test]
    fn topic_shift_obligates_read() {
        let set = PolicyDetector::analyze("Now chess openings");
        assert!(set.read_required);
        assert_eq!(set.read_topic, "chess openings");
    }

    #[test]
    fn skill_demonstration_obligates_write_only() {
        let set = PolicyDetector::analyze("i built a small ray tracer");
        assert!(set.write_required);
        assert!(!set.read_required);
        assert!(!set.search_required);
        assert!(!set.fetch_required);
    }

    #[test]
    fn small_talk_triggers_nothing() {
        let set = PolicyDetector::analyze("good morning!");
        assert!(set.all_satisfied());
        assert!(set.pending().is_empty());
    }

    #[test]
    fn pending_is_priority_ordered() {
        let set = PolicyDetector::analyze(
            "Tell me about the latest rust news, see https://example.com",
        );
        let pending = set.pending();
        assert_eq!(pending.len(), 4);
        assert!(pending[0].starts_with("FETCH"));
        assert!(pending[1].starts_with("READ"));
        assert_eq!(pending[2], "SEARCH");
        assert_eq!(pending[3], "WRITE");
    }

    #[test]
    fn marking_satisfied_clears_pending() {
        let mut set = PolicyDetector::analyze("teach me chess");
        assert!(!set.all_satisfied());
        set.mark_satisfied(ObligationKind::Read);
        set.mark_satisfied(ObligationKind::Write);
        assert!(set.all_satisfied());
    }
}
