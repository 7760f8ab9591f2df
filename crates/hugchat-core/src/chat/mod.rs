//! Per-request chat orchestration.
//!
//! ```text
//! Start → Authenticated → ConversationResolved → TurnSubmitted → Streaming
//! ```
//!
//! A `ChatSession` owns the cookies for one inbound request. Any remote call
//! that comes back `Unauthorized` triggers a single refresh of the session
//! and a single retry of that call; after that the budget is spent.

mod prompt;
mod session;

pub use prompt::{build_prompt, PROMPT_PREAMBLE};
pub use session::{ChatSession, TurnHandle, TurnMeta, EVENT_CHANNEL_CAPACITY};
