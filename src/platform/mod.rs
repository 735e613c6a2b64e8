pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

/// A text message received from the chat platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Platform-specific user ID as string
    pub user_id: String,
    /// Platform-specific chat/channel ID as string
    pub chat_id: String,
    /// Display name of the sender, if the platform has one
    pub sender_name: Option<String>,
    /// The message text
    pub text: String,
}

/// Where the reply to one incoming message goes.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_reply(&self, text: &str) -> Result<()>;
}
