// src/utils/mail.rs

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::{config::Config, error::AppError};

/// Outgoing notification channel for account verification.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(&self, email: &str, link: &Url) -> Result<(), AppError>;
}

/// Writes verification links to the log instead of delivering them.
/// Used when no mail transport is configured.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(&self, email: &str, link: &Url) -> Result<(), AppError> {
        tracing::info!(%email, %link, "Verification link issued");
        Ok(())
    }
}

/// Builds `{public_url}/api/auth/verification?token=...`.
pub fn verification_link(config: &Config, token: &str) -> Result<Url, AppError> {
    let mut link = config
        .public_url
        .join("/api/auth/verification")
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    link.query_pairs_mut().append_pair("token", token);
    Ok(link)
}

/// Fire-and-forget: the request never waits on delivery, failures are only logged.
pub fn dispatch_verification(mailer: Arc<dyn Mailer>, email: String, link: Url) {
    tokio::spawn(async move {
        if let Err(e) = mailer.send_verification(&email, &link).await {
            tracing::warn!(%email, "Failed to send verification mail: {}", e);
        }
    });
}
