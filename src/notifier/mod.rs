//! Outbound email. Messages go through a mail-relay collaborator over
//! HTTP; when no relay is configured, sends are logged and dropped.

pub mod templates;

use crate::config::MailConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::sync::Mutex;
use tracing::{debug, info};

/// A rendered email ready to hand to the relay
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Display name shown as the sender; the relay keeps the configured
    /// sender address
    pub sender_name: Option<String>,
}

/// Seam for email dispatch so the reminder and offer flows can be tested
/// without a relay.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

/// Mailer that POSTs messages to the configured mail-relay service
pub struct RelayMailer {
    client: reqwest::Client,
    relay_url: String,
    sender_email: String,
    sender_name: String,
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from_email: &'a str,
    from_name: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl RelayMailer {
    pub fn new(relay_url: String, config: &MailConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.send_timeout())
            .build()
            .map_err(|e| AppError::Config(format!("mail client: {}", e)))?;

        Ok(Self {
            client,
            relay_url,
            sender_email: config.sender_email.clone(),
            sender_name: config.sender_name.clone(),
        })
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let payload = RelayPayload {
            from_email: &self.sender_email,
            from_name: message.sender_name.as_deref().unwrap_or(&self.sender_name),
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(format!("{}/send", self.relay_url.trim_end_matches('/')))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("mail relay: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "mail relay answered {}",
                response.status()
            )));
        }

        debug!(to = %message.to, subject = %message.subject, "email handed to relay");
        Ok(())
    }
}

/// Mailer for development: logs the message and succeeds
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "no mail relay configured, dropping email"
        );
        Ok(())
    }
}

/// Mailer that records every message in memory; used by the test suites
/// to assert on what would have been sent.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer lock poisoned").len()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        self.sent
            .lock()
            .expect("mailer lock poisoned")
            .push(message.clone());
        Ok(())
    }
}

/// Build the mailer the configuration asks for
pub fn mailer_from_config(config: &MailConfig) -> AppResult<Arc<dyn Mailer>> {
    match &config.relay_url {
        Some(url) => Ok(Arc::new(RelayMailer::new(url.clone(), config)?)),
        None => Ok(Arc::new(NoopMailer)),
    }
}
