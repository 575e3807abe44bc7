//! Built-in assessment content and the validated `Assessment` aggregate.
//!
//! The catalog, category map and interpretations are immutable once the
//! `Assessment` is built at startup. A deployment may replace them from TOML
//! (see `config`), and the replacement passes the same validation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::band::classify;
use crate::domain::{AssessmentQuestion, PillarState, ScoreInterpretation};
use crate::error::ConfigurationError;

pub const SCALE_MIN: u8 = 1;
pub const SCALE_MAX: u8 = 5;
/// Reverse coding maps `v` to `REVERSE_PIVOT - v` (min + max of the scale).
pub const REVERSE_PIVOT: f64 = (SCALE_MIN + SCALE_MAX) as f64;

pub const SCALE_LABELS: [(u8, &str); 5] = [
  (1, "Strongly Disagree"),
  (2, "Disagree"),
  (3, "Neutral / Unsure"),
  (4, "Agree"),
  (5, "Strongly Agree"),
];

pub const DEFAULT_TITLE: &str = "Strength Pillar Assessment";

/// Named dimension grouping question indices.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Category {
  pub name: String,
  pub questions: Vec<usize>,
}

/// One interpretation per pillar state, indexed by the state's position in `PillarState::ALL`.
#[derive(Clone, Debug, PartialEq)]
pub struct Interpretations {
  by_state: [ScoreInterpretation; 4],
}

impl Interpretations {
  pub fn get(&self, state: PillarState) -> &ScoreInterpretation {
    &self.by_state[state as usize]
  }

  pub fn for_score(&self, score: f64) -> &ScoreInterpretation {
    self.get(classify(score))
  }

  /// Replace narrative and/or color of one state.
  pub fn set(&mut self, state: PillarState, narrative: Option<String>, color: Option<String>) {
    let entry = &mut self.by_state[state as usize];
    if let Some(n) = narrative { entry.narrative = n; }
    if let Some(c) = color { entry.color = c; }
  }
}

impl Default for Interpretations {
  fn default() -> Self {
    let by_state = PillarState::ALL.map(|state| {
      let (narrative, color) = default_interpretation(state);
      ScoreInterpretation { state, narrative: narrative.into(), color: color.into() }
    });
    Self { by_state }
  }
}

/// Validated assessment definition shared read-only by every request.
#[derive(Clone, Debug)]
pub struct Assessment {
  title: String,
  questions: Vec<AssessmentQuestion>,
  categories: Vec<Category>,
  interpretations: Interpretations,
}

impl Assessment {
  pub fn new(
    title: String,
    questions: Vec<AssessmentQuestion>,
    categories: Vec<Category>,
    interpretations: Interpretations,
  ) -> Result<Self, ConfigurationError> {
    if questions.is_empty() {
      return Err(ConfigurationError::EmptyCatalog);
    }
    if let Some(index) = questions.iter().position(|q| q.text.trim().is_empty()) {
      return Err(ConfigurationError::EmptyQuestion { index });
    }

    let mut seen = HashSet::new();
    for category in &categories {
      if category.name.trim().is_empty() {
        return Err(ConfigurationError::UnnamedCategory);
      }
      if !seen.insert(category.name.as_str()) {
        return Err(ConfigurationError::DuplicateCategory(category.name.clone()));
      }
      if category.questions.is_empty() {
        return Err(ConfigurationError::EmptyCategory(category.name.clone()));
      }
      if let Some(&index) = category.questions.iter().find(|&&i| i >= questions.len()) {
        return Err(ConfigurationError::IndexOutOfBounds {
          category: category.name.clone(),
          index,
          len: questions.len(),
        });
      }
    }

    Ok(Self { title, questions, categories, interpretations })
  }

  /// The Strength pillar shipped with the service.
  pub fn builtin() -> Result<Self, ConfigurationError> {
    Self::new(
      DEFAULT_TITLE.to_string(),
      builtin_questions(),
      builtin_categories(),
      Interpretations::default(),
    )
  }

  pub fn title(&self) -> &str { &self.title }

  pub fn questions(&self) -> &[AssessmentQuestion] { &self.questions }

  pub fn question(&self, index: usize) -> Option<&AssessmentQuestion> { self.questions.get(index) }

  pub fn len(&self) -> usize { self.questions.len() }

  pub fn categories(&self) -> &[Category] { &self.categories }

  pub fn interpretations(&self) -> &Interpretations { &self.interpretations }

  /// Questions that belong to no category, and questions claimed by more than one.
  /// Neither breaks scoring, but both usually mean the category map drifted.
  pub fn coverage_gaps(&self) -> (Vec<usize>, Vec<usize>) {
    let mut claims = vec![0usize; self.questions.len()];
    for category in &self.categories {
      for &i in &category.questions {
        claims[i] += 1;
      }
    }
    let unassigned = claims.iter().enumerate().filter(|(_, &n)| n == 0).map(|(i, _)| i).collect();
    let shared = claims.iter().enumerate().filter(|(_, &n)| n > 1).map(|(i, _)| i).collect();
    (unassigned, shared)
  }
}

fn q(text: &str, reverse_coded: bool) -> AssessmentQuestion {
  AssessmentQuestion { text: text.to_string(), reverse_coded }
}

pub fn builtin_questions() -> Vec<AssessmentQuestion> {
  vec![
    q("I eat foods that nourish and energize me rather than deplete me.", false),
    q("I often skip meals, eat mindlessly, or ignore my body’s hunger cues.", true),
    q("I enjoy movement or exercise that feels good to my body.", false),
    q("I see exercise as punishment for eating or for how my body looks.", true),
    q("I get enough sleep and feel rested when I wake up.", false),
    q("I often push through exhaustion or deny myself rest to keep working.", true),
    q("I take time to notice and respond to signs of physical fatigue, tension, or pain.", false),
    q("I treat my body with kindness, respect, and gratitude.", false),
    q("I feel disconnected from my body or often resent how it looks or feels.", true),
    q("I intentionally slow down or take breaks during busy days to restore energy.", false),
    q("I frequently feel stressed, tense, or physically unwell due to constant pressure.", true),
    q("I am mindful of what I consume — not just food, but media, noise, and emotional energy.", false),
    q("I feel strong, balanced, and present in my body most days.", false),
    q("I experience frequent headaches, stomach tension, or other stress-related discomforts.", true),
    q("I feel guilty or lazy when I rest or take time off.", true),
    q("I see my body as a partner in purpose, deserving of care, rest, and nourishment.", false),
  ]
}

pub fn builtin_categories() -> Vec<Category> {
  let c = |name: &str, questions: &[usize]| Category { name: name.to_string(), questions: questions.to_vec() };
  vec![
    c("Nourishment", &[0, 1, 11]),
    c("Movement", &[2, 3]),
    c("Rest & Recovery", &[4, 5, 9, 14]),
    c("Body Mindset", &[6, 7, 8, 10, 12, 13, 15]),
  ]
}

fn default_interpretation(state: PillarState) -> (&'static str, &'static str) {
  match state {
    PillarState::Strong => (
      "You have a balanced and nurturing relationship with your body. You eat, rest, and move with intention — not out of guilt or pressure, but out of care. You understand that strength is both physical and soulful, and you honour your body as a sacred partner in your purpose. Keep reinforcing this rhythm through consistent nourishment, joyful movement, and restorative rest.",
      "#6A994E",
    ),
    PillarState::Growing => (
      "You are cultivating a healthier relationship with your body, though you may still struggle with inconsistency or guilt around rest and self-care. You’re learning to listen more closely to your body’s needs and to separate worth from productivity. Continue fine-tuning your routines, paying attention to your body’s cues, and letting love — not pressure — guide your health habits.",
      "#F4A261",
    ),
    PillarState::Unsteady => (
      "Your body and mind may not yet feel in sync. You may oscillate between overexertion and neglect, or rely on willpower rather than rhythm. You might experience fatigue, stress-related discomfort, or self-criticism around food, rest, or appearance. This pillar would benefit from gentle recalibration — beginning with self-compassion, structured rest, and professional guidance in nutrition, exercise, or therapy where needed.",
      "#E76F51",
    ),
    PillarState::Fragile => (
      "You may feel physically drained, tense, or disconnected from your body. Sleep, nourishment, or movement may be inconsistent or guilt-driven. Your body might be signalling exhaustion or burnout through illness, pain, or emotional fatigue. This is a loving reminder to rebuild trust with your body — to slow down, seek holistic or medical support, and begin nurturing strength through small, consistent acts of care. Healing your relationship with your body will re-anchor your soul’s vitality.",
      "#D00000",
    ),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn questions(n: usize) -> Vec<AssessmentQuestion> {
    (0..n).map(|i| q(&format!("statement {i}"), false)).collect()
  }

  fn category(name: &str, questions: &[usize]) -> Category {
    Category { name: name.into(), questions: questions.to_vec() }
  }

  #[test]
  fn builtin_assessment_is_valid_and_partitioned() {
    let a = Assessment::builtin().expect("builtin config validates");
    assert_eq!(a.len(), 16);
    assert_eq!(a.categories().len(), 4);
    let (unassigned, shared) = a.coverage_gaps();
    assert!(unassigned.is_empty(), "unassigned: {unassigned:?}");
    assert!(shared.is_empty(), "shared: {shared:?}");
  }

  #[test]
  fn builtin_reverse_coded_positions() {
    let reversed: Vec<usize> = builtin_questions()
      .iter()
      .enumerate()
      .filter(|(_, q)| q.reverse_coded)
      .map(|(i, _)| i)
      .collect();
    assert_eq!(reversed, vec![1, 3, 5, 8, 10, 13, 14]);
  }

  #[test]
  fn rejects_out_of_bounds_index() {
    let err = Assessment::new("t".into(), questions(3), vec![category("A", &[0, 3])], Interpretations::default())
      .unwrap_err();
    match err {
      ConfigurationError::IndexOutOfBounds { category, index, len } => {
        assert_eq!(category, "A");
        assert_eq!(index, 3);
        assert_eq!(len, 3);
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn rejects_duplicate_and_empty_categories() {
    let dup = Assessment::new(
      "t".into(),
      questions(2),
      vec![category("A", &[0]), category("A", &[1])],
      Interpretations::default(),
    );
    assert!(matches!(dup, Err(ConfigurationError::DuplicateCategory(name)) if name == "A"));

    let empty = Assessment::new("t".into(), questions(2), vec![category("A", &[])], Interpretations::default());
    assert!(matches!(empty, Err(ConfigurationError::EmptyCategory(_))));

    let unnamed = Assessment::new("t".into(), questions(2), vec![category(" ", &[0])], Interpretations::default());
    assert!(matches!(unnamed, Err(ConfigurationError::UnnamedCategory)));
  }

  #[test]
  fn rejects_empty_catalog() {
    let err = Assessment::new("t".into(), Vec::new(), Vec::new(), Interpretations::default());
    assert!(matches!(err, Err(ConfigurationError::EmptyCatalog)));
  }

  #[test]
  fn coverage_gaps_reports_unassigned_and_shared() {
    let a = Assessment::new(
      "t".into(),
      questions(4),
      vec![category("A", &[0, 1]), category("B", &[1])],
      Interpretations::default(),
    )
    .expect("valid");
    assert_eq!(a.coverage_gaps(), (vec![2, 3], vec![1]));
  }

  #[test]
  fn interpretations_cover_every_state() {
    let i = Interpretations::default();
    for state in PillarState::ALL {
      let interp = i.get(state);
      assert_eq!(interp.state, state);
      assert!(!interp.narrative.is_empty());
      assert!(interp.color.starts_with('#'));
    }
    assert_eq!(i.for_score(4.6).state, PillarState::Strong);
    assert_eq!(i.for_score(f64::NAN).state, PillarState::Fragile);
  }

  #[test]
  fn interpretation_override_keeps_unset_fields() {
    let mut i = Interpretations::default();
    let before = i.get(PillarState::Growing).narrative.clone();
    i.set(PillarState::Growing, None, Some("#000000".into()));
    assert_eq!(i.get(PillarState::Growing).narrative, before);
    assert_eq!(i.get(PillarState::Growing).color, "#000000");
  }
}
