use reqwest::Client;
use serde_json::json;

use crate::domain::repository::Mailer;
use crate::error::ApiError;

/// Sends login codes through an HTTP mail provider (a Resend-style
/// `POST /emails` endpoint with a bearer key).
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: String, api_key: Option<String>, from: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
            from,
        }
    }
}

impl Mailer for HttpMailer {
    async fn deliver_code(&self, to: &str, code: &str) -> Result<(), ApiError> {
        let Some(api_key) = &self.api_key else {
            tracing::warn!("MAIL_API_KEY is not set; cannot deliver login code");
            return Err(ApiError::DeliveryFailed);
        };

        let body = json!({
            "from": self.from,
            "to": [to],
            "subject": "Your login code",
            "text": format!("Your one-time login code is {code}. It expires in 10 minutes."),
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("mail request failed: {e}");
                ApiError::DeliveryFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!("mail provider returned {status}: {error_body}");
            return Err(ApiError::DeliveryFailed);
        }
        Ok(())
    }
}
