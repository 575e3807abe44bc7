//! Deployment configuration: optional TOML file (assessment override + email presentation).
//!
//! See `DeploymentConfig` and `EmailSettings` for the expected schema.
//! Unknown keys are rejected, so a misspelled table fails startup instead of being ignored.

use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::{Assessment, Category, Interpretations, DEFAULT_TITLE};
use crate::domain::{AssessmentQuestion, PillarState};
use crate::error::ConfigurationError;

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
  #[serde(default)]
  pub assessment: Option<AssessmentCfg>,
  #[serde(default)]
  pub interpretations: InterpretationsCfg,
  #[serde(default)]
  pub email: EmailSettings,
}

/// Replacement question set. Questions and categories are replaced together.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssessmentCfg {
  #[serde(default)] pub title: Option<String>,
  pub questions: Vec<AssessmentQuestion>,
  pub categories: Vec<Category>,
}

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct InterpretationsCfg {
  #[serde(default)] pub strong: Option<InterpretationCfg>,
  #[serde(default)] pub growing: Option<InterpretationCfg>,
  #[serde(default)] pub unsteady: Option<InterpretationCfg>,
  #[serde(default)] pub fragile: Option<InterpretationCfg>,
}

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct InterpretationCfg {
  #[serde(default)] pub narrative: Option<String>,
  #[serde(default)] pub color: Option<String>,
}

/// Wording, links and brand palette of the emailed report.
/// Every field has a default, so a TOML `[email]` table may set only what it changes.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmailSettings {
  /// `{state}` is replaced with the pillar state.
  pub subject_template: String,
  pub heading: String,
  pub subheading: String,
  pub breakdown_heading: String,
  pub breakdown_intro: String,
  pub closing: String,
  pub cta_label: String,
  pub cta_url: String,
  pub sign_off: String,
  pub team: String,
  pub footer: String,
  pub brand: BrandPalette,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandPalette {
  pub cream: String,
  pub brown: String,
  pub green: String,
  pub gold: String,
  pub body_font: String,
}

impl Default for EmailSettings {
  fn default() -> Self {
    Self {
      subject_template: "Your Soul Structure Results: {state}".into(),
      heading: "Your Soul Structure Results".into(),
      subheading: "A reflection from the Strength Pillar Assessment".into(),
      breakdown_heading: "Your Strength Profile Breakdown".into(),
      breakdown_intro: "Here’s a closer look at your alignment across key dimensions.".into(),
      closing: "Your journey doesn’t end here. Continue exploring all Soul Structure pillars and deepen your wholeness.".into(),
      cta_label: "Join the Soul Structure Workshop".into(),
      cta_url: "https://tosinsanni.com/soulstructureworkshop/".into(),
      sign_off: "With gratitude,".into(),
      team: "The Soul Structure Team".into(),
      footer: "© Tosin Sanni | Soul Structure".into(),
      brand: BrandPalette::default(),
    }
  }
}

impl Default for BrandPalette {
  fn default() -> Self {
    Self {
      cream: "#FAF6F0".into(),
      brown: "#4A3B32".into(),
      green: "#6A994E".into(),
      gold: "#C9A227".into(),
      body_font: "Georgia, 'Times New Roman', serif".into(),
    }
  }
}

/// Load `DeploymentConfig` from ASSESSMENT_CONFIG_PATH. Unset means built-in defaults;
/// a file that cannot be read or parsed stops startup.
pub fn load_deployment_config_from_env() -> Result<Option<DeploymentConfig>, ConfigurationError> {
  let Ok(path) = std::env::var("ASSESSMENT_CONFIG_PATH") else {
    return Ok(None);
  };
  let cfg = load_deployment_config(&path)?;
  info!(target: "soul_structure_backend", %path, "Loaded deployment config (TOML)");
  Ok(Some(cfg))
}

pub fn load_deployment_config(path: &str) -> Result<DeploymentConfig, ConfigurationError> {
  let raw = std::fs::read_to_string(path)
    .map_err(|source| ConfigurationError::Read { path: path.to_string(), source })?;
  parse_deployment_config(&raw).map_err(|source| ConfigurationError::Parse { path: path.to_string(), source })
}

pub fn parse_deployment_config(raw: &str) -> Result<DeploymentConfig, toml::de::Error> {
  toml::from_str::<DeploymentConfig>(raw)
}

/// Build the served assessment: the override from config when present, else the built-in one.
/// Interpretation overrides apply either way.
pub fn build_assessment(cfg: Option<&DeploymentConfig>) -> Result<Assessment, ConfigurationError> {
  let Some(cfg) = cfg else {
    return Assessment::builtin();
  };

  let mut interpretations = Interpretations::default();
  let overrides = [
    (PillarState::Strong, &cfg.interpretations.strong),
    (PillarState::Growing, &cfg.interpretations.growing),
    (PillarState::Unsteady, &cfg.interpretations.unsteady),
    (PillarState::Fragile, &cfg.interpretations.fragile),
  ];
  for (state, o) in overrides {
    if let Some(o) = o {
      interpretations.set(state, o.narrative.clone(), o.color.clone());
    }
  }

  let assessment = match &cfg.assessment {
    Some(a) => Assessment::new(
      a.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
      a.questions.clone(),
      a.categories.clone(),
      interpretations,
    )?,
    None => Assessment::new(
      DEFAULT_TITLE.to_string(),
      crate::catalog::builtin_questions(),
      crate::catalog::builtin_categories(),
      interpretations,
    )?,
  };

  let (unassigned, shared) = assessment.coverage_gaps();
  if !unassigned.is_empty() {
    warn!(target: "assessment", ?unassigned, "Questions not covered by any category");
  }
  if !shared.is_empty() {
    warn!(target: "assessment", ?shared, "Questions counted in more than one category");
  }
  Ok(assessment)
}
