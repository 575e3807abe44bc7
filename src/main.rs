//! Soul Structure · Pillar Assessment Backend
//!
//! - Axum HTTP + WebSocket API for the Likert self-assessment
//! - Scoring, band interpretation and per-category breakdown
//! - Optional emailed report through a Resend-compatible API
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                   : u16 (default 3000)
//!   ASSESSMENT_CONFIG_PATH : path to TOML config (assessment override + email wording/brand)
//!   RESEND_API_KEY         : enables email delivery if present
//!   RESEND_BASE_URL        : default "https://api.resend.com"
//!   EMAIL_FROM             : sender, must belong to a verified domain
//!   EMAIL_TIMEOUT_SECS     : per-attempt timeout (default 10)
//!   LOG_LEVEL              : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT             : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod catalog;
mod band;
mod scoring;
mod sheet;
mod config;
mod report;
mod mailer;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Static configuration problems stop the process before it serves anything.
  let state = match AppState::from_env() {
    Ok(s) => Arc::new(s),
    Err(e) => {
      error!(target: "soul_structure_backend", error = %e, "Invalid configuration; refusing to start");
      return Err(e.into());
    }
  };

  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "soul_structure_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "soul_structure_backend", "HTTP server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!(target: "soul_structure_backend", error = %e, "Failed to listen for shutdown signal");
  }
}
