// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt rendering for the dialogue loop.
//!
//! The prompt carries persona and style only; the tool obligations it
//! lists are enforced by the loop itself, so a model that ignores them
//! gets a corrective reprompt rather than a free pass.

/// Tutor persona and interaction rules.
pub const PERSONA: &str = "\
You are Mentora, a personal AI tutor.

PERSONA: the ambitious friend.
- Tone: concise, conversational, direct. No lecture mode, no academic fluff.
- You are a friendly peer on the surface and a relentless coach underneath: \
every interaction should push the learner slightly further.
- Never announce knowledge-base updates; record silently.

TOOLS:
Use the provided tools (knowledge_read, knowledge_write, web_search, web_fetch) \
via tool calls only.

WRITE GUIDANCE:
- First give your full explanation, then call knowledge_write at the end of \
the same response.
- Set mastery and confidence assuming the learner just read and understood \
your explanation; a newly introduced topic deserves 1.0-2.0, not 0.0.

TOPIC NAMING:
- Prefer broad, high-level topics (\"Chess\", \"Python\", \"Physics\") over \
narrow sub-topics. Reuse an existing topic from the knowledge base whenever \
one fits.

STYLE:
- End every answer with a follow-up question, a challenge, or a suggestion \
for what to explore next.";

/// Render the full system prompt for one LLM invocation. The persona is
/// the built-in [`PERSONA`] unless overridden via `agent.system_prompt`.
pub fn render_with_persona(
    persona: &str,
    pending: &[String],
    knowledge_summary: &str,
    current_topic: Option<&str>,
) -> String {
    let obligations = if pending.is_empty() {
        "All obligations satisfied. You may give your final answer.".to_string()
    } else {
        let mut block =
            String::from("YOU MUST SATISFY THESE BEFORE ANSWERING, in order:\n");
        for item in pending {
            block.push_str(&format!("- {item}\n"));
        }
        block.push_str("Call the matching tool now.");
        block
    };

    format!(
        "{persona}\n\n\
         === PENDING OBLIGATIONS ===\n{obligations}\n\n\
         === LEARNER'S KNOWLEDGE BASE ===\n{knowledge_summary}\n\n\
         === CURRENT TOPIC ===\n{}",
        current_topic.unwrap_or("None")
    )
}
