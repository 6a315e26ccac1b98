// src/sink/telegram.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use super::{Sink, SinkError};

const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Telegram caps messages at 4096 chars; keep headroom for safety.
pub const TELEGRAM_MAX_MESSAGE_LEN: usize = 3500;

pub struct TelegramSink {
    token: String,
    chat_id: String,
    client: Client,
    timeout: Duration,
}

impl TelegramSink {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            token,
            chat_id,
            client: Client::new(),
            timeout: Duration::from_secs(25),
        }
    }

    pub fn from_env() -> Result<Self> {
        let token = std::env::var(ENV_BOT_TOKEN).context("TELEGRAM_BOT_TOKEN not set")?;
        let chat_id = std::env::var(ENV_CHAT_ID).context("TELEGRAM_CHAT_ID not set")?;
        Ok(Self::new(token, chat_id))
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait::async_trait]
impl Sink for TelegramSink {
    async fn send(&self, text: &str) -> Result<(), SinkError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "disable_web_page_preview": false,
        });

        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let detail: String = resp.text().await.unwrap_or_default().chars().take(140).collect();
        // 429 and 5xx are transient on Telegram's side; anything else means
        // the payload itself was refused.
        if status.is_server_error() || status.as_u16() == 429 {
            Err(SinkError::Transport(format!("telegram {status}: {detail}")))
        } else {
            Err(SinkError::Rejected {
                status: status.as_u16(),
                body: detail,
            })
        }
    }

    fn max_message_len(&self) -> usize {
        TELEGRAM_MAX_MESSAGE_LEN
    }
}
