//! Scoring engine: raw Likert answers in, `AssessmentResult` out.
//!
//! Pure and deterministic. Answers are validated up front so that a result is
//! either fully computed or not produced at all.

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::catalog::{Assessment, REVERSE_PIVOT, SCALE_MAX, SCALE_MIN};
use crate::domain::{AssessmentQuestion, AssessmentResult};
use crate::error::InvalidInput;

/// Check one answer against the 1..=5 integral scale.
pub fn validate_answer(index: usize, value: f64) -> Result<(), InvalidInput> {
  if !value.is_finite() {
    return Err(InvalidInput::NonFinite { index });
  }
  if value < f64::from(SCALE_MIN) || value > f64::from(SCALE_MAX) {
    return Err(InvalidInput::OutOfScale { index, value, min: SCALE_MIN, max: SCALE_MAX });
  }
  if value.fract() != 0.0 {
    return Err(InvalidInput::NotWholeNumber { index, value });
  }
  Ok(())
}

/// Answer as it counts towards averages.
pub fn adjusted(question: &AssessmentQuestion, answer: f64) -> f64 {
  if question.reverse_coded { REVERSE_PIVOT - answer } else { answer }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
  let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
  sum / n as f64
}

#[instrument(level = "debug", skip(assessment, answers), fields(answers = answers.len()))]
pub fn score(assessment: &Assessment, answers: &[f64]) -> Result<AssessmentResult, InvalidInput> {
  if answers.len() != assessment.len() {
    return Err(InvalidInput::WrongLength { expected: assessment.len(), actual: answers.len() });
  }
  for (index, &value) in answers.iter().enumerate() {
    validate_answer(index, value)?;
  }

  let adjusted: Vec<f64> = assessment
    .questions()
    .iter()
    .zip(answers)
    .map(|(question, &answer)| adjusted(question, answer))
    .collect();

  let overall = mean(adjusted.iter().copied());

  // Categories are never empty (checked when the assessment is built).
  let category_scores: IndexMap<String, f64> = assessment
    .categories()
    .iter()
    .map(|c| (c.name.clone(), mean(c.questions.iter().map(|&i| adjusted[i]))))
    .collect();

  let interpretation = assessment.interpretations().for_score(overall).clone();
  debug!(target: "assessment", score = overall, state = %interpretation.state, "Assessment scored");

  Ok(AssessmentResult { score: overall, interpretation, category_scores })
}
