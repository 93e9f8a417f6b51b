use actix_web::{
    dev::Payload, error::ResponseError, http::StatusCode, web::Bytes, FromRequest, HttpMessage as _,
    HttpRequest,
};
use futures::future::{FutureExt, LocalBoxFuture};

/// JSON webhook body. Anything that isn't `application/json`, an empty body,
/// and a JSON value other than an object yield `T::default()` instead of an
/// error. Only bytes that aren't JSON at all are rejected.
#[derive(Debug, Clone)]
pub struct Webhook<T>(pub T);

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("failed reading request data: {0}")]
    ActixError(#[from] actix_web::Error),
    #[error("invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::JsonError(_) => StatusCode::BAD_REQUEST,
            WebhookError::ActixError(err) => err.as_response_error().status_code(),
        }
    }
}

impl<T> FromRequest for Webhook<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    type Error = WebhookError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;
    type Config = ();

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let is_json = req.content_type().eq_ignore_ascii_case("application/json");

        Box::pin(Bytes::from_request(req, payload).map(
            move |bytes| -> Result<Self, Self::Error> {
                let bytes = bytes?;
                if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
                    tracing::debug!("Webhook body is empty or not JSON, treating it as an empty event");
                    return Ok(Self(T::default()));
                }

                let value: serde_json::Value = serde_json::from_slice(&bytes)?;
                if !value.is_object() {
                    tracing::debug!("Webhook body is not a JSON object, treating it as an empty event");
                    return Ok(Self(T::default()));
                }

                Ok(Self(serde_json::from_value(value)?))
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;
    use crate::github::PushEvent;

    #[actix_rt::test]
    async fn parses_json_body() {
        let (req, mut payload) = TestRequest::post()
            .set_json(&serde_json::json!({ "ref": "refs/heads/main" }))
            .to_http_parts();

        let Webhook(event) = Webhook::<PushEvent>::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(event.reference.as_deref(), Some("refs/heads/main"));
    }

    #[actix_rt::test]
    async fn non_json_body_is_empty_event() {
        let (req, mut payload) = TestRequest::post()
            .header("Content-Type", "application/x-www-form-urlencoded")
            .set_payload("payload=%7B%7D")
            .to_http_parts();

        let Webhook(event) = Webhook::<PushEvent>::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert!(event.reference.is_none());
    }

    #[actix_rt::test]
    async fn empty_json_body_is_empty_event() {
        let (req, mut payload) = TestRequest::post()
            .header("Content-Type", "application/json")
            .to_http_parts();

        let Webhook(event) = Webhook::<PushEvent>::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert!(event.reference.is_none());
    }

    #[actix_rt::test]
    async fn content_type_is_case_insensitive() {
        let (req, mut payload) = TestRequest::post()
            .header("Content-Type", "Application/JSON")
            .set_payload("{\"ref\":\"refs/heads/main\"}")
            .to_http_parts();

        let Webhook(event) = Webhook::<PushEvent>::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(event.reference.as_deref(), Some("refs/heads/main"));
    }

    #[actix_rt::test]
    async fn non_object_json_is_empty_event() {
        for body in &["[]", "[\"refs/heads/main\"]", "\"refs/heads/main\"", "42", "null"] {
            let (req, mut payload) = TestRequest::post()
                .header("Content-Type", "application/json")
                .set_payload(*body)
                .to_http_parts();

            let Webhook(event) = Webhook::<PushEvent>::from_request(&req, &mut payload)
                .await
                .unwrap();
            assert!(event.reference.is_none(), "{} must read as empty", body);
        }
    }

    #[actix_rt::test]
    async fn malformed_json_is_bad_request() {
        let (req, mut payload) = TestRequest::post()
            .header("Content-Type", "application/json")
            .set_payload("{\"ref\":")
            .to_http_parts();

        let err = Webhook::<PushEvent>::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
