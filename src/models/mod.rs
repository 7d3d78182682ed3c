mod conversation;
mod message;
mod request;

pub use conversation::Conversation;
pub use message::{Message, MessageRole, RecommendationPayload, PROVISIONAL_ID_PREFIX};
pub use request::{SendOptions, StreamRequest};
