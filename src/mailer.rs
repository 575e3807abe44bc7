//! Minimal transactional-email client (Resend-compatible `POST /emails`).
//!
//! One send = at most two attempts: a transport failure or a provider 5xx is
//! retried once, anything else is returned as is. Each attempt is bounded by
//! the client timeout.
//!
//! NOTE: We never log the API key or full recipient addresses.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::error::{ConfigurationError, MailError};
use crate::util::{redact_email, trunc_for_log};

pub const DEFAULT_BASE_URL: &str = "https://api.resend.com";
pub const DEFAULT_FROM: &str = "Soul Structure Results <results@soulstructure.example>";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MAX_ATTEMPTS: u32 = 2;

/// Fully rendered message ready to hand to the provider.
#[derive(Clone, Debug)]
pub struct OutgoingEmail {
  pub to: String,
  pub subject: String,
  pub html: String,
  pub text: String,
}

#[derive(Clone)]
pub struct Mailer {
  client: reqwest::Client,
  api_key: String,
  pub base_url: String,
  pub from: String,
}

impl std::fmt::Debug for Mailer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Mailer").field("base_url", &self.base_url).field("from", &self.from).finish_non_exhaustive()
  }
}

impl Mailer {
  pub fn new(api_key: String, base_url: String, from: String, timeout: Duration) -> Result<Self, ConfigurationError> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| ConfigurationError::HttpClient(e.to_string()))?;
    let base_url = base_url.trim_end_matches('/').to_string();
    Ok(Self { client, api_key, base_url, from })
  }

  /// Construct the client if we find RESEND_API_KEY; otherwise Ok(None).
  pub fn from_env() -> Result<Option<Self>, ConfigurationError> {
    let Ok(api_key) = std::env::var("RESEND_API_KEY") else {
      return Ok(None);
    };
    let base_url = std::env::var("RESEND_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let from = std::env::var("EMAIL_FROM").unwrap_or_else(|_| DEFAULT_FROM.into());
    let timeout_secs = match std::env::var("EMAIL_TIMEOUT_SECS") {
      Ok(v) => v.parse::<u64>().map_err(|_| ConfigurationError::InvalidEnv {
        name: "EMAIL_TIMEOUT_SECS",
        expected: "a whole number of seconds",
        value: v.clone(),
      })?,
      Err(_) => DEFAULT_TIMEOUT_SECS,
    };
    Self::new(api_key, base_url, from, Duration::from_secs(timeout_secs)).map(Some)
  }

  /// Deliver `email`, returning the provider's message id.
  #[instrument(level = "info", skip(self, email), fields(to = %redact_email(&email.to), subject_len = email.subject.len()))]
  pub async fn send(&self, email: &OutgoingEmail) -> Result<String, MailError> {
    validate_recipient(&email.to)?;

    let mut attempt = 1;
    loop {
      let start = std::time::Instant::now();
      match self.send_once(email).await {
        Ok(id) => {
          info!(target: "email", %id, attempt, elapsed = ?start.elapsed(), "Email accepted by provider");
          return Ok(id);
        }
        Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
          warn!(target: "email", attempt, error = %e, "Email send failed; retrying once");
          attempt += 1;
        }
        Err(e) => {
          error!(target: "email", attempt, error = %e, "Email send failed");
          return Err(e);
        }
      }
    }
  }

  async fn send_once(&self, email: &OutgoingEmail) -> Result<String, MailError> {
    let url = format!("{}/emails", self.base_url);
    let req = SendEmailRequest {
      from: &self.from,
      to: [email.to.as_str()],
      subject: &email.subject,
      html: &email.html,
      text: &email.text,
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "soul-structure-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| MailError::Transport(e.to_string()))?;

    let status = res.status();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      let message = extract_provider_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(MailError::Upstream { status: status.as_u16(), message });
    }

    let body: SendEmailResponse = res.json().await.map_err(|e| MailError::Decode(e.to_string()))?;
    Ok(body.id)
  }
}

/// Cheap syntactic check before spending a network call: one `@`, non-empty
/// local part, a dotted domain, no whitespace.
pub fn validate_recipient(address: &str) -> Result<(), MailError> {
  let address = address.trim();
  let ok = match address.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !address.chars().any(char::is_whitespace)
    }
    None => false,
  };
  if ok { Ok(()) } else { Err(MailError::InvalidRecipient) }
}

// --- Provider DTOs ---

#[derive(Serialize)]
struct SendEmailRequest<'a> {
  from: &'a str,
  to: [&'a str; 1],
  subject: &'a str,
  html: &'a str,
  text: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
  id: String,
}

/// Try to extract a clean error message from the provider's error body.
fn extract_provider_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EObj>(body).ok().map(|e| e.message)
}
