//! Application state: the validated assessment, email settings, and the optional mailer.
//!
//! Everything here is read-only after startup; per-respondent progress lives in
//! the WebSocket connection that owns it.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::catalog::Assessment;
use crate::config::{build_assessment, load_deployment_config_from_env, EmailSettings};
use crate::error::ConfigurationError;
use crate::mailer::Mailer;

#[derive(Clone, Debug)]
pub struct AppState {
    pub assessment: Arc<Assessment>,
    pub email: EmailSettings,
    pub mailer: Option<Mailer>,
}

impl AppState {
    pub fn new(assessment: Assessment, email: EmailSettings, mailer: Option<Mailer>) -> Self {
        Self { assessment: Arc::new(assessment), email, mailer }
    }

    /// Build state from env: load config, validate the assessment, init the mailer.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let cfg = load_deployment_config_from_env()?;
        let assessment = build_assessment(cfg.as_ref())?;
        let email = cfg.map(|c| c.email).unwrap_or_default();

        info!(
            target: "assessment",
            title = %assessment.title(),
            questions = assessment.len(),
            categories = assessment.categories().len(),
            reverse_coded = assessment.questions().iter().filter(|q| q.reverse_coded).count(),
            "Assessment loaded"
        );

        let mailer = Mailer::from_env()?;
        if let Some(m) = &mailer {
            info!(target: "soul_structure_backend", base_url = %m.base_url, from = %m.from, "Email delivery enabled.");
        } else {
            info!(target: "soul_structure_backend", "Email delivery disabled (no RESEND_API_KEY).");
        }

        Ok(Self::new(assessment, email, mailer))
    }
}
