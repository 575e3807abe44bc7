//! Progressive answer collection, one question at a time.
//!
//! A sheet belongs to a single client connection and is dropped with it.

use crate::error::InvalidInput;
use crate::scoring::validate_answer;

#[derive(Clone, Debug, PartialEq)]
pub enum Progress {
  /// The cursor moved on to this question.
  Next(usize),
  /// The last question was answered and every position is filled.
  Complete,
}

#[derive(Clone, Debug)]
pub struct AnswerSheet {
  answers: Vec<Option<u8>>,
  cursor: usize,
}

impl AnswerSheet {
  pub fn new(total: usize) -> Self {
    Self { answers: vec![None; total], cursor: 0 }
  }

  pub fn total(&self) -> usize { self.answers.len() }

  /// Question currently awaiting an answer.
  pub fn cursor(&self) -> usize { self.cursor }

  /// Answer previously given at the cursor, if the user stepped back.
  pub fn current_answer(&self) -> Option<u8> {
    self.answers.get(self.cursor).copied().flatten()
  }

  /// Store `score` for the question at the cursor. Invalid scores leave the sheet untouched.
  pub fn record(&mut self, score: f64) -> Result<Progress, InvalidInput> {
    if self.cursor >= self.answers.len() {
      return Err(InvalidInput::WrongLength { expected: self.answers.len(), actual: self.answers.len() + 1 });
    }
    validate_answer(self.cursor, score)?;
    self.answers[self.cursor] = Some(score as u8);

    if self.cursor + 1 < self.answers.len() {
      self.cursor += 1;
      return Ok(Progress::Next(self.cursor));
    }
    // The cursor only advances past answered questions, so reaching the
    // last one means every slot before it is filled.
    Ok(Progress::Complete)
  }

  /// Step back one question. Returns the new cursor, or `None` at the first question.
  pub fn back(&mut self) -> Option<usize> {
    if self.cursor == 0 {
      return None;
    }
    self.cursor -= 1;
    Some(self.cursor)
  }

  pub fn restart(&mut self) {
    self.answers.iter_mut().for_each(|a| *a = None);
    self.cursor = 0;
  }

  /// Complete answer sequence, only once every question is answered.
  pub fn answers(&self) -> Option<Vec<f64>> {
    self.answers.iter().map(|a| a.map(f64::from)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn records_in_order_and_completes_on_last_question() {
    let mut sheet = AnswerSheet::new(3);
    assert_eq!(sheet.record(4.0), Ok(Progress::Next(1)));
    assert_eq!(sheet.record(2.0), Ok(Progress::Next(2)));
    assert!(sheet.answers().is_none());
    assert_eq!(sheet.record(5.0), Ok(Progress::Complete));
    assert_eq!(sheet.answers(), Some(vec![4.0, 2.0, 5.0]));
  }

  #[test]
  fn invalid_score_does_not_advance() {
    let mut sheet = AnswerSheet::new(2);
    assert!(matches!(sheet.record(9.0), Err(InvalidInput::OutOfScale { index: 0, .. })));
    assert!(matches!(sheet.record(f64::NAN), Err(InvalidInput::NonFinite { index: 0 })));
    assert_eq!(sheet.cursor(), 0);
    assert_eq!(sheet.current_answer(), None);
  }

  #[test]
  fn back_shows_previous_answer_and_overwrites_it() {
    let mut sheet = AnswerSheet::new(3);
    sheet.record(4.0).expect("valid");
    sheet.record(2.0).expect("valid");
    assert_eq!(sheet.back(), Some(1));
    assert_eq!(sheet.current_answer(), Some(2));
    assert_eq!(sheet.record(3.0), Ok(Progress::Next(2)));
    assert_eq!(sheet.record(1.0), Ok(Progress::Complete));
    assert_eq!(sheet.answers(), Some(vec![4.0, 3.0, 1.0]));
  }

  #[test]
  fn back_at_first_question_is_a_no_op() {
    let mut sheet = AnswerSheet::new(2);
    assert_eq!(sheet.back(), None);
    assert_eq!(sheet.cursor(), 0);
  }

  #[test]
  fn answering_the_last_question_again_overwrites_it() {
    let mut sheet = AnswerSheet::new(1);
    assert_eq!(sheet.record(3.0), Ok(Progress::Complete));
    assert_eq!(sheet.record(5.0), Ok(Progress::Complete));
    assert_eq!(sheet.answers(), Some(vec![5.0]));
  }

  #[test]
  fn restart_clears_everything() {
    let mut sheet = AnswerSheet::new(2);
    sheet.record(3.0).expect("valid");
    sheet.record(3.0).expect("valid");
    sheet.restart();
    assert_eq!(sheet.cursor(), 0);
    assert!(sheet.answers().is_none());
  }
}
