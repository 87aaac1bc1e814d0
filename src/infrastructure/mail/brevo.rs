//! Brevo transactional-mail notifier

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::domain::{Notifier, OutboundEmail};

#[derive(Debug, Serialize)]
struct Party<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Party<'a>,
    to: Vec<Party<'a>>,
    subject: &'a str,
    text_content: &'a str,
    html_content: &'a str,
}

/// Notifier backed by the Brevo SMTP API
///
/// Delivery outcomes are logged; the boolean result is advisory and callers
/// never treat a failure as fatal.
#[derive(Debug, Clone)]
pub struct BrevoNotifier {
    config: MailConfig,
    http_client: Client,
}

impl BrevoNotifier {
    pub fn new(config: MailConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl Notifier for BrevoNotifier {
    async fn send(&self, email: OutboundEmail) -> bool {
        let payload = SendEmailRequest {
            sender: Party {
                name: &self.config.sender_name,
                email: &self.config.sender_email,
            },
            to: vec![Party {
                name: &email.to_name,
                email: &email.to_email,
            }],
            subject: &email.subject,
            text_content: &email.text,
            html_content: &email.html,
        };

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .header("api-key", &self.config.api_key)
            .header("accept", "application/json")
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                info!(to = %email.to_email, subject = %email.subject, "Email dispatched");
                true
            }
            Ok(response) => {
                warn!(
                    to = %email.to_email,
                    status = response.status().as_u16(),
                    "Mail provider rejected the email"
                );
                false
            }
            Err(e) => {
                warn!(to = %email.to_email, error = %e, "Failed to reach the mail provider");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_email() -> OutboundEmail {
        OutboundEmail {
            to_name: "Receiver".to_string(),
            to_email: "r@example.com".to_string(),
            subject: "Hello".to_string(),
            text: "plain".to_string(),
            html: "<p>rich</p>".to_string(),
        }
    }

    fn notifier_for(server: &MockServer) -> BrevoNotifier {
        BrevoNotifier::new(MailConfig {
            api_key: "test-api-key".to_string(),
            endpoint: format!("{}/v3/smtp/email", server.uri()),
            sender_name: "Sender".to_string(),
            sender_email: "s@example.com".to_string(),
        })
    }

    #[tokio::test]
    async fn test_send_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/smtp/email"))
            .and(header("api-key", "test-api-key"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let sent = notifier_for(&server).send(test_email()).await;
        assert!(sent);
    }

    #[tokio::test]
    async fn test_send_provider_rejection() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/smtp/email"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let sent = notifier_for(&server).send(test_email()).await;
        assert!(!sent);
    }

    #[tokio::test]
    async fn test_send_unreachable_provider() {
        let notifier = BrevoNotifier::new(MailConfig {
            api_key: "k".to_string(),
            endpoint: "http://127.0.0.1:1/v3/smtp/email".to_string(),
            sender_name: "Sender".to_string(),
            sender_email: "s@example.com".to_string(),
        });

        let sent = notifier.send(test_email()).await;
        assert!(!sent);
    }
}
