use anyhow::Context;
use async_trait::async_trait;

use super::EmailSender;

pub struct ResendEmailSender {
    api_key: String,
    from: String,
    client: reqwest::Client,
}

impl ResendEmailSender {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            api_key,
            from,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send_code(&self, to: &str, code: &str) -> anyhow::Result<()> {
        let body = serde_json::json!({
            "from": self.from,
            "to": [to],
            "subject": "FixerHub Email Verification",
            "text": format!("Your verification code is: {code}"),
        });

        self.client
            .post("https://api.resend.com/emails")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to send verification email")?
            .error_for_status()
            .context("email API returned error")?;

        Ok(())
    }
}
