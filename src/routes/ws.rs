//! WebSocket upgrade + question loop. Each connection owns one `AnswerSheet`;
//! every client message gets exactly one JSON reply.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};
use uuid::Uuid;

use crate::logic::{answer_and_advance, email_result, question_message};
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::sheet::AnswerSheet;
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "soul_structure_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state), fields(conn = %Uuid::new_v4()))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "soul_structure_backend", "WebSocket connected");
  let mut sheet = AnswerSheet::new(state.assessment.len());

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "soul_structure_backend", kind = incoming.kind(), "WS received");
            handle_client_ws(incoming, &state, &mut sheet).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "soul_structure_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "soul_structure_backend", cursor = sheet.cursor(), "WebSocket disconnected");
}

#[instrument(level = "info", skip_all, fields(kind = msg.kind()))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState, sheet: &mut AnswerSheet) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Start => question_message(state, sheet),

    ClientWsMessage::Answer { score } => answer_and_advance(state, sheet, score),

    ClientWsMessage::Back => {
      sheet.back();
      question_message(state, sheet)
    }

    ClientWsMessage::Restart => {
      sheet.restart();
      info!(target: "assessment", "WS assessment restarted");
      question_message(state, sheet)
    }

    ClientWsMessage::EmailResult { to, subject } => {
      let Some(answers) = sheet.answers() else {
        return ServerWsMessage::Error { message: "Finish the assessment before requesting the email.".into() };
      };
      match email_result(state, &to, &answers, subject.as_deref()).await {
        Ok(id) => ServerWsMessage::EmailSent { id },
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Assessment;
  use crate::config::EmailSettings;

  fn state() -> AppState {
    AppState::new(Assessment::builtin().unwrap(), EmailSettings::default(), None)
  }

  #[tokio::test]
  async fn back_and_restart_move_the_cursor() {
    let state = state();
    let mut sheet = AnswerSheet::new(state.assessment.len());

    let reply = handle_client_ws(ClientWsMessage::Answer { score: 4.0 }, &state, &mut sheet).await;
    assert!(matches!(reply, ServerWsMessage::Question { index: 1, current_answer: None, .. }));

    let reply = handle_client_ws(ClientWsMessage::Back, &state, &mut sheet).await;
    assert!(matches!(reply, ServerWsMessage::Question { index: 0, current_answer: Some(4), .. }));

    let reply = handle_client_ws(ClientWsMessage::Restart, &state, &mut sheet).await;
    assert!(matches!(reply, ServerWsMessage::Question { index: 0, current_answer: None, .. }));
  }

  #[tokio::test]
  async fn email_before_completion_is_refused() {
    let state = state();
    let mut sheet = AnswerSheet::new(state.assessment.len());
    let reply = handle_client_ws(
      ClientWsMessage::EmailResult { to: "jane@example.com".into(), subject: None },
      &state,
      &mut sheet,
    )
    .await;
    assert!(matches!(reply, ServerWsMessage::Error { .. }));
  }

  #[tokio::test]
  async fn email_after_completion_reports_disabled_mailer() {
    let state = state();
    let mut sheet = AnswerSheet::new(state.assessment.len());
    for _ in 0..state.assessment.len() {
      handle_client_ws(ClientWsMessage::Answer { score: 3.0 }, &state, &mut sheet).await;
    }
    let reply = handle_client_ws(
      ClientWsMessage::EmailResult { to: "jane@example.com".into(), subject: None },
      &state,
      &mut sheet,
    )
    .await;
    match reply {
      ServerWsMessage::Error { message } => assert_eq!(message, "email delivery is not configured"),
      other => panic!("unexpected reply: {other:?}"),
    }
  }
}
