//! Outbound message delivery.
//!
//! `TwilioSender` talks to the Twilio Messages API over the WhatsApp channel.
//! `LogSender` stands in when no provider credentials are configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::TwilioConfig;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("messaging request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("messaging provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Deliver `body` to one recipient; returns the provider's message id
    async fn send(&self, to: &str, body: &str) -> Result<String, SendError>;
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

pub struct TwilioSender {
    client: Client,
    config: TwilioConfig,
}

impl TwilioSender {
    pub fn new(config: TwilioConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl MessageSender for TwilioSender {
    async fn send(&self, to: &str, body: &str) -> Result<String, SendError> {
        let from = format!("whatsapp:{}", self.config.from_number);
        let to = format!("whatsapp:{}", to);

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("From", from.as_str()), ("To", to.as_str()), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let message: TwilioMessage = response.json().await?;
        Ok(message.sid)
    }
}

/// Sender that only logs; used when no messaging provider is configured
#[derive(Debug, Clone, Default)]
pub struct LogSender;

#[async_trait]
impl MessageSender for LogSender {
    async fn send(&self, to: &str, body: &str) -> Result<String, SendError> {
        tracing::info!("Alert for {} (no messaging provider configured): {}", to, body);
        Ok("logged".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::post,
        Form, Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/2010-04-01", addr)
    }

    fn sender(api_base: String) -> TwilioSender {
        TwilioSender::new(
            TwilioConfig {
                account_sid: "AC123".to_string(),
                auth_token: "token".to_string(),
                from_number: "+14155238886".to_string(),
                api_base,
            },
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_twilio_send_posts_whatsapp_form() {
        let router = Router::new().route(
            "/2010-04-01/Accounts/:sid/Messages.json",
            post(
                |Path(sid): Path<String>,
                 headers: HeaderMap,
                 Form(form): Form<HashMap<String, String>>| async move {
                    assert_eq!(sid, "AC123");
                    assert!(headers.contains_key("authorization"));
                    assert_eq!(form["From"], "whatsapp:+14155238886");
                    assert_eq!(form["To"], "whatsapp:+919019790330");
                    assert_eq!(form["Body"], "hello");
                    (StatusCode::CREATED, Json(json!({ "sid": "SM42" })))
                },
            ),
        );
        let api_base = serve(router).await;

        let sid = sender(api_base).send("+919019790330", "hello").await.unwrap();
        assert_eq!(sid, "SM42");
    }

    #[tokio::test]
    async fn test_twilio_rejection_is_error() {
        let router = Router::new().route(
            "/2010-04-01/Accounts/:sid/Messages.json",
            post(|| async { (StatusCode::BAD_REQUEST, "invalid To number") }),
        );
        let api_base = serve(router).await;

        let err = sender(api_base).send("bogus", "hello").await.unwrap_err();
        match err {
            SendError::Rejected { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("invalid To"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_log_sender_always_succeeds() {
        assert!(LogSender.send("+9199", "hello").await.is_ok());
    }
}
