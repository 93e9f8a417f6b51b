use std::sync::Arc;

use askama::Template;
use secstr::SecUtf8;

use super::Notification;

// Keep unused variants for documentation
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, serde::Serialize)]
enum ParseMode {
    HTML,
    Markdown,
    MarkdownV2,
}

#[derive(Debug, serde::Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: ParseMode,
}

#[derive(Debug, Template)]
#[template(path = "telegram-message.md", escape = "none")]
struct MessageTemplate<'a> {
    pub repository: &'a str,
    pub commit_message: &'a str,
    pub author: &'a str,
}

impl<'a> From<&'a Notification> for MessageTemplate<'a> {
    fn from(notification: &'a Notification) -> Self {
        Self {
            repository: &notification.repository,
            commit_message: &notification.commit_message,
            author: &notification.author,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to render message template: {0}")]
    Template(#[from] askama::Error),
    #[error("failed to send request to Telegram: {0}")]
    Request(String),
    #[error("Telegram API returned error: {status}\n{body}")]
    Api { status: u16, body: String },
    #[error("failed to read Telegram response: {0}")]
    Response(String),
}

pub struct Telegram {
    http: Arc<awc::Client>,
    url: SecUtf8,
    pub chat: String,
}

impl Telegram {
    pub fn new(http: Arc<awc::Client>, api_url: &str, token: &SecUtf8, chat: String) -> Self {
        let url = SecUtf8::from(format!(
            "{}/bot{}/sendMessage",
            api_url.trim_end_matches('/'),
            token.unsecure()
        ));
        Self { http, url, chat }
    }

    /// Performs a single `sendMessage` call and returns the API response.
    /// Any 2xx status is a success, whatever the body holds.
    pub async fn send(&self, notification: &Notification) -> Result<serde_json::Value, Error> {
        let text = &MessageTemplate::from(notification).render()?;
        let message = SendMessage {
            chat_id: &self.chat,
            text,
            parse_mode: ParseMode::Markdown,
        };

        let mut resp = self
            .http
            .post(self.url.unsecure())
            .send_json(&message)
            .await
            .map_err(|err| Error::Request(err.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .body()
                .await
                .map_err(|err| Error::Response(err.to_string()))?;
            return Err(Error::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        // Telegram accepted the message; an odd body doesn't change that.
        let body = match resp.body().await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!("Failed to read Telegram response body: {}", err);
                return Ok(serde_json::Value::Null);
            }
        };
        Ok(serde_json::from_slice(&body).unwrap_or_else(|err| {
            let raw = String::from_utf8_lossy(&body).into_owned();
            tracing::warn!("Telegram response is not JSON ({}): {}", err, raw);
            serde_json::Value::String(raw)
        }))
    }
}
