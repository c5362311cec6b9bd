use std::sync::Arc;

use axum::async_trait;
use tracing::{debug, info, warn};

use crate::config::SmtpConfig;

/// A rendered message ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, envelope: Envelope) -> anyhow::Result<()>;
}

/// Writes the envelope to the log instead of talking to a relay.
#[derive(Debug, Clone)]
pub struct LogTransport {
    host: String,
    port: u16,
}

impl LogTransport {
    pub fn new(cfg: &SmtpConfig) -> Self {
        Self {
            host: cfg.host.clone().unwrap_or_default(),
            port: cfg.port,
        }
    }
}

#[async_trait]
impl MailTransport for LogTransport {
    async fn send(&self, envelope: Envelope) -> anyhow::Result<()> {
        info!(
            relay = %format!("{}:{}", self.host, self.port),
            from = %envelope.from,
            to = %envelope.to,
            subject = %envelope.subject,
            body_len = envelope.body.len(),
            "outgoing mail"
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct Mailer {
    smtp: SmtpConfig,
    transport: Arc<dyn MailTransport>,
}

impl Mailer {
    pub fn new(smtp: SmtpConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self { smtp, transport }
    }

    pub fn welcome_envelope(&self, to: &str, first_name: &str) -> Option<Envelope> {
        if !self.smtp.is_complete() {
            return None;
        }
        let from = self.smtp.from.clone()?;
        let body = format!(
            "Hi {first_name},\n\n\
             Welcome to FinanceFlow! Your account is ready.\n\
             Start tracking your income and expenses at {url}\n\n\
             The FinanceFlow team\n",
            url = self.smtp.frontend_url,
        );
        Some(Envelope {
            from,
            to: to.to_string(),
            subject: "Welcome to FinanceFlow".to_string(),
            body,
        })
    }

    /// Fire-and-forget. Never fails the caller.
    pub fn send_welcome(&self, to: String, first_name: String) {
        let Some(envelope) = self.welcome_envelope(&to, &first_name) else {
            debug!(%to, "smtp not configured, skipping welcome mail");
            return;
        };
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            if let Err(e) = transport.send(envelope).await {
                warn!(error = %e, %to, "welcome mail failed");
            }
        });
    }
}
