//! Delivery of finished reports to the instructor.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;

use crate::core::AppConfig;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait ReportMailer {
    async fn send(&self, email: &Email) -> Result<(), Error>;
}

pub type SharedMailer = Arc<dyn ReportMailer + Send + Sync + 'static>;

/// Posts the email as JSON to a relay that owns the actual transport.
pub struct HttpMailer {
    url: String,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ReportMailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), Error> {
        self.client
            .post(&self.url)
            .timeout(Duration::from_secs(30))
            .json(email)
            .send()
            .await?
            .error_for_status()?;
        tracing::info!("Report sent to {}: {}", email.to, email.subject);
        Ok(())
    }
}

/// Used when no relay is configured. The report only shows up in logs.
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl ReportMailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), Error> {
        tracing::info!(
            "No mail relay configured, report for {} not sent\nSubject: {}\n\n{}",
            email.to,
            email.subject,
            email.body
        );
        Ok(())
    }
}

pub fn mailer_from_config(config: &AppConfig) -> SharedMailer {
    match &config.mail_relay_url {
        Some(url) => Arc::new(HttpMailer::new(url)),
        None => Arc::new(LogMailer),
    }
}
