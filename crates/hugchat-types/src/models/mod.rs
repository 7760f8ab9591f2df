//! Domain models for the HuggingChat gateway.

mod conversation;
mod cookie;
mod identity;
mod model_info;
mod stream;

pub use conversation::{ConversationDetail, ConversationSummary, Message};
pub use cookie::{cookie_header, has_session_cookie, merge_cookies, SessionCookie, SESSION_COOKIE_NAME};
pub use identity::Identity;
pub use model_info::ModelInfo;
pub use stream::{StreamEvent, IMAGE_WEBP};
