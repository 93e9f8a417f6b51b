use actix::Addr;
use actix_web::{http::StatusCode, web, HttpRequest};
use tracing::Instrument as _;

use crate::{
    github::PushEvent,
    http::Webhook,
    notifier::{self, Notification, Notifier},
};

/// Bodies above this are rejected with `413`.
const WEBHOOK_BODY_LIMIT: usize = 100 * 1024;

const HEALTH_MESSAGE: &str = "GitHub to Telegram Webhook is running!";
const SENT_MESSAGE: &str = "Notification sent to Telegram";

#[derive(Debug, thiserror::Error)]
pub enum PushHookError {
    #[error("Not a push to main branch")]
    NotMain,
    #[error("Failed to send Telegram notification")]
    Delivery(#[source] notifier::Error),
    #[error("Failed to send Telegram notification")]
    Mailbox(#[from] actix::MailboxError),
}

impl actix_web::ResponseError for PushHookError {
    fn status_code(&self) -> StatusCode {
        match self {
            PushHookError::NotMain => StatusCode::OK,
            PushHookError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PushHookError::Mailbox(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

pub async fn push_hook(
    req: HttpRequest,
    Webhook(hook): Webhook<PushEvent>,
    notifier: web::Data<Addr<Notifier>>,
) -> Result<&'static str, PushHookError> {
    let span = tracing::info_span!(
        "handling webhook",
        github.event = header(&req, "X-GitHub-Event"),
        github.delivery = header(&req, "X-GitHub-Delivery"),
    );

    async move {
        if !hook.is_main_push() {
            tracing::info!(
                reference = ?hook.reference,
                "Not a push to the main branch: {:?}",
                hook.reference
            );
            return Err(PushHookError::NotMain);
        }

        match notifier.send(Notification::from(&hook)).await? {
            Ok(response) => {
                tracing::info!("Notification sent to Telegram: {}", response);
                Ok(SENT_MESSAGE)
            }
            Err(err) => {
                tracing::error!("Error sending Telegram notification: {}", err);
                Err(PushHookError::Delivery(err))
            }
        }
    }
    .instrument(span)
    .await
}

pub async fn health() -> &'static str {
    HEALTH_MESSAGE
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/webhook")
            .app_data(web::PayloadConfig::new(WEBHOOK_BODY_LIMIT))
            .route(web::post().to(push_hook)),
    )
    .route("/", web::get().to(health));
}
