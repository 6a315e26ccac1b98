// src/sink/mod.rs

pub mod telegram;

pub use telegram::TelegramSink;

use thiserror::Error;

/// Send failures split by whether a retry can help. `Transport` covers
/// network/timeout trouble; `Rejected` means the endpoint received the
/// payload and refused it, so resending the same bytes is pointless.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("payload rejected (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

impl SinkError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SinkError::Transport(_))
    }
}

#[async_trait::async_trait]
pub trait Sink: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), SinkError>;

    /// Largest message the endpoint accepts; the dispatcher splits rendered
    /// output above this.
    fn max_message_len(&self) -> usize;
}
