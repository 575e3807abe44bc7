//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Scoring a complete answer sequence
//!   - Rendering and emailing a result
//!   - Driving an `AnswerSheet` through the question flow

use tracing::{info, instrument};

use crate::error::{ApiError, MailError};
use crate::mailer::OutgoingEmail;
use crate::protocol::ServerWsMessage;
use crate::report::{render_html, render_text, subject as default_subject};
use crate::domain::AssessmentResult;
use crate::scoring;
use crate::sheet::{AnswerSheet, Progress};
use crate::state::AppState;
use crate::util::redact_email;

#[instrument(level = "info", skip(state, answers), fields(answers = answers.len()))]
pub fn score_answers(state: &AppState, answers: &[f64]) -> Result<AssessmentResult, ApiError> {
  let result = scoring::score(&state.assessment, answers)?;
  info!(target: "assessment", score = %format!("{:.2}", result.score), state = %result.interpretation.state, "Assessment completed");
  Ok(result)
}

/// Score server-side (clients never supply the narrative), render, and send.
#[instrument(level = "info", skip(state, to, answers, subject_override), fields(to = %redact_email(to)))]
pub async fn email_result(
  state: &AppState,
  to: &str,
  answers: &[f64],
  subject_override: Option<&str>,
) -> Result<String, ApiError> {
  let Some(mailer) = &state.mailer else {
    return Err(MailError::Disabled.into());
  };
  let result = scoring::score(&state.assessment, answers)?;

  let subject = match subject_override.map(str::trim) {
    Some(s) if !s.is_empty() => s.to_string(),
    _ => default_subject(&result, &state.email),
  };
  let email = OutgoingEmail {
    to: to.trim().to_string(),
    subject,
    html: render_html(&result, &state.email),
    text: render_text(&result, &state.email),
  };

  let id = mailer.send(&email).await?;
  Ok(id)
}

pub fn question_message(state: &AppState, sheet: &AnswerSheet) -> ServerWsMessage {
  let index = sheet.cursor();
  let text = state.assessment.question(index).map(|q| q.text.clone()).unwrap_or_default();
  ServerWsMessage::Question { index, total: sheet.total(), text, current_answer: sheet.current_answer() }
}

/// Record one answer and reply with the next question, or the result once complete.
#[instrument(level = "debug", skip(state, sheet), fields(cursor = sheet.cursor()))]
pub fn answer_and_advance(state: &AppState, sheet: &mut AnswerSheet, score: f64) -> ServerWsMessage {
  match sheet.record(score) {
    Ok(Progress::Next(_)) => question_message(state, sheet),
    Ok(Progress::Complete) => {
      let answers = sheet.answers().unwrap_or_default();
      match score_answers(state, &answers) {
        Ok(result) => ServerWsMessage::Result { result },
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }
    Err(e) => ServerWsMessage::Error { message: format!("invalid answer: {}", e) },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Assessment;
  use crate::config::EmailSettings;
  use crate::domain::PillarState;

  fn state() -> AppState {
    AppState::new(Assessment::builtin().unwrap(), EmailSettings::default(), None)
  }

  #[test]
  fn walking_the_sheet_ends_in_a_result() {
    let state = state();
    let mut sheet = AnswerSheet::new(state.assessment.len());
    let mut last = question_message(&state, &sheet);
    for q in state.assessment.questions() {
      assert!(matches!(last, ServerWsMessage::Question { .. }));
      last = answer_and_advance(&state, &mut sheet, if q.reverse_coded { 1.0 } else { 5.0 });
    }
    match last {
      ServerWsMessage::Result { result } => {
        assert_eq!(result.score, 5.0);
        assert_eq!(result.interpretation.state, PillarState::Strong);
      }
      other => panic!("expected result, got {other:?}"),
    }
  }

  #[test]
  fn invalid_answer_replies_with_error_and_keeps_position() {
    let state = state();
    let mut sheet = AnswerSheet::new(state.assessment.len());
    let reply = answer_and_advance(&state, &mut sheet, 0.0);
    assert!(matches!(reply, ServerWsMessage::Error { .. }));
    assert!(matches!(question_message(&state, &sheet), ServerWsMessage::Question { index: 0, .. }));
  }

  #[test]
  fn score_answers_rejects_short_input() {
    let err = score_answers(&state(), &[3.0; 15]).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
  }

  #[tokio::test]
  async fn email_without_mailer_is_disabled() {
    let err = email_result(&state(), "jane@example.com", &[3.0; 16], None).await.unwrap_err();
    assert!(matches!(err, ApiError::Mail(MailError::Disabled)));
  }
}
