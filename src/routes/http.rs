//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs basic request/result info.

use std::sync::Arc;
use axum::{extract::{rejection::JsonRejection, State}, Json, response::IntoResponse};
use tracing::{field, info, instrument, Span};

use crate::error::ApiError;
use crate::logic::{email_result, score_answers};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, email_enabled: state.mailer.is_some() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_assessment(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(to_out(&state.assessment))
}

#[instrument(level = "info", skip_all, fields(answers = field::Empty))]
pub async fn http_post_score(
  State(state): State<Arc<AppState>>,
  body: Result<Json<ScoreIn>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  Span::current().record("answers", body.answers.len());
  let result = score_answers(&state, &body.answers)?;
  Ok(Json(result))
}

#[instrument(level = "info", skip_all, fields(answers = field::Empty, custom_subject = field::Empty))]
pub async fn http_post_email(
  State(state): State<Arc<AppState>>,
  body: Result<Json<EmailIn>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  Span::current()
    .record("answers", body.answers.len())
    .record("custom_subject", body.subject.is_some());
  let id = email_result(&state, &body.to, &body.answers, body.subject.as_deref()).await?;
  info!(target: "email", %id, "HTTP email_result delivered");
  Ok(Json(EmailOut { id }))
}
