pub mod resend;

use async_trait::async_trait;

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_code(&self, to: &str, code: &str) -> anyhow::Result<()>;
}

/// Development sender: logs the code instead of delivering it.
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        tracing::info!(to, code, "verification code (log-only email sender)");
        Ok(())
    }
}
