// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Policy enforcement and the dialogue loop for the Mentora tutor.
//!
//! The tutoring contract is enforced by code, not prompts:
//!
//! - [`policy`] detects tool obligations from each user message
//! - [`tools`] defines and executes the four structured tools
//! - [`prompt`] renders the system prompt with outstanding obligations
//! - [`session`] runs the bounded arbitration loop that refuses to
//!   answer until every obligation is discharged

pub mod policy;
pub mod prompt;
pub mod session;
pub mod tools;

pub use policy::{ObligationKind, ObligationSet, PolicyDetector};
pub use session::{
    APOLOGY_MESSAGE, STUCK_MESSAGE, SessionSettings, TurnState, TutorSession,
};
pub use tools::{ToolExecution, ToolRunner, obligation_for_tool, tool_definitions};
