//! Domain models used by the backend: questions, pillar states, interpretations and results.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One Likert statement of the assessment. Identified by its position in the catalog.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AssessmentQuestion {
  pub text: String,
  /// Agreement with a reverse-coded statement signals a weaker pillar,
  /// so the raw answer is inverted before aggregation.
  #[serde(default)]
  pub reverse_coded: bool,
}

/// Qualitative bands, ordered from healthiest to most fragile.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PillarState {
  Strong,
  Growing,
  Unsteady,
  Fragile,
}

impl PillarState {
  pub const ALL: [PillarState; 4] = [
    PillarState::Strong,
    PillarState::Growing,
    PillarState::Unsteady,
    PillarState::Fragile,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      PillarState::Strong => "Strong",
      PillarState::Growing => "Growing",
      PillarState::Unsteady => "Unsteady",
      PillarState::Fragile => "Fragile",
    }
  }
}

impl fmt::Display for PillarState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Narrative and display color bound to a pillar state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoreInterpretation {
  pub state: PillarState,
  pub narrative: String,
  pub color: String,
}

/// Outcome of one completed assessment. Scores carry full precision;
/// rounding is a presentation concern.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
  pub score: f64,
  pub interpretation: ScoreInterpretation,
  pub category_scores: IndexMap<String, f64>,
}
