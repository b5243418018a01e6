use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use uuid::Uuid;

/// Who authored a message in the conversation log.
///
/// The lowercase serialization is load-bearing: prompt history lines are
/// rendered as `"<sender>: <text>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry in the conversation log.
///
/// `text` is what the log displays and `raw_text` what prompt history is
/// built from; they are identical today and kept separate so display
/// formatting can diverge without touching prompt assembly. Entries are
/// append-only: nothing mutates or removes a message once added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub raw_text: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            role,
            raw_text: text.clone(),
            text,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Outcome of one completion request, delivered from the request task back
/// to the conversation manager over its reply channel.
///
/// `Ok(Some(text))` is a usable reply, `Ok(None)` a well-formed exchange
/// with no candidate text, `Err` a transport or decode fault.
#[derive(Debug)]
pub struct ChatReply {
    /// Session the request was issued under. Replies from a closed session
    /// carry a stale id and are dropped on arrival.
    pub session: Uuid,
    pub result: anyhow::Result<Option<String>>,
}
