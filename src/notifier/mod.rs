use std::fmt;

mod telegram;
use std::sync::Arc;

pub use self::telegram::Error;

use actix::prelude::*;
use secstr::SecUtf8;

use crate::github::PushEvent;

/// Push summary to deliver. Answered with the Bot API response.
#[derive(Debug, Clone, Message)]
#[rtype(result = "Result<serde_json::Value, Error>")]
pub struct Notification {
    pub repository: String,
    pub commit_message: String,
    pub author: String,
}

impl From<&PushEvent> for Notification {
    fn from(event: &PushEvent) -> Self {
        Self {
            repository: event.repository_name().to_owned(),
            commit_message: event.commit_message().to_owned(),
            author: event.author_name().to_owned(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub telegram_token: SecUtf8,
    pub telegram_chat: String,
}

#[derive(Clone)]
pub struct Notifier {
    telegram: Arc<telegram::Telegram>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("telegram", &self.telegram.chat)
            .finish()
    }
}

impl Notifier {
    pub fn new(config: Config) -> Self {
        let http = Arc::new(awc::Client::new());
        let Config {
            api_url,
            telegram_token,
            telegram_chat,
        } = config;
        let telegram = Arc::new(telegram::Telegram::new(
            http,
            &api_url,
            &telegram_token,
            telegram_chat,
        ));
        Self { telegram }
    }
}

impl Actor for Notifier {
    type Context = Context<Self>;
}

impl Handler<Notification> for Notifier {
    type Result = ResponseFuture<<Notification as Message>::Result>;

    fn handle(&mut self, msg: Notification, _ctx: &mut Self::Context) -> Self::Result {
        let telegram = self.telegram.clone();
        Box::pin(async move { telegram.send(&msg).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_uses_event_fallbacks() {
        let event: PushEvent = serde_json::from_value(serde_json::json!({
            "ref": "refs/heads/main",
            "repository": { "full_name": "acme/app" }
        }))
        .unwrap();
        let notification = Notification::from(&event);

        assert_eq!(notification.repository, "acme/app");
        assert_eq!(notification.commit_message, "No commit message");
        assert_eq!(notification.author, "Unknown Author");
    }

    #[actix_rt::test]
    async fn debug_hides_token() {
        let notifier = Notifier::new(Config {
            api_url: "https://api.telegram.org".into(),
            telegram_token: SecUtf8::from(String::from("123:very-secret")),
            telegram_chat: "42".into(),
        });

        let debug = format!("{:?}", notifier);
        assert!(debug.contains("42"));
        assert!(!debug.contains("very-secret"));
    }
}
