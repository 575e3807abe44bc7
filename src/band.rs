//! Band classifier: maps an average score to a pillar state.
//!
//! Bands are an ordered table of inclusive lower bounds, walked from the top.
//! Anything that clears no bound (scores below 2.5, and NaN since every
//! comparison with NaN is false) lands on `FALLBACK_STATE`.

use crate::domain::PillarState;

/// (inclusive lower bound, state), highest bound first.
pub const BANDS: [(f64, PillarState); 3] = [
  (4.5, PillarState::Strong),
  (3.5, PillarState::Growing),
  (2.5, PillarState::Unsteady),
];

/// State for scores below the lowest bound, and for NaN.
pub const FALLBACK_STATE: PillarState = PillarState::Fragile;

pub fn classify(score: f64) -> PillarState {
  BANDS
    .iter()
    .find(|(lower, _)| score >= *lower)
    .map(|(_, state)| *state)
    .unwrap_or(FALLBACK_STATE)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn breakpoints_are_inclusive_lower_bounds() {
    assert_eq!(classify(4.5), PillarState::Strong);
    assert_eq!(classify(4.4999), PillarState::Growing);
    assert_eq!(classify(3.5), PillarState::Growing);
    assert_eq!(classify(3.4999), PillarState::Unsteady);
    assert_eq!(classify(2.5), PillarState::Unsteady);
    assert_eq!(classify(2.4999), PillarState::Fragile);
  }

  #[test]
  fn scale_extremes() {
    assert_eq!(classify(5.0), PillarState::Strong);
    assert_eq!(classify(1.0), PillarState::Fragile);
  }

  #[test]
  fn out_of_range_and_nan_fall_through_to_fragile() {
    assert_eq!(classify(0.0), PillarState::Fragile);
    assert_eq!(classify(-3.0), PillarState::Fragile);
    assert_eq!(classify(f64::NEG_INFINITY), PillarState::Fragile);
    assert_eq!(classify(f64::NAN), PillarState::Fragile);
    assert_eq!(classify(7.0), PillarState::Strong);
  }

  #[test]
  fn every_score_matches_exactly_one_band() {
    let mut s = 0.0;
    while s <= 6.0 {
      let matching = BANDS
        .iter()
        .enumerate()
        .filter(|(i, (lower, _))| {
          let upper = if *i == 0 { f64::INFINITY } else { BANDS[i - 1].0 };
          s >= *lower && s < upper
        })
        .count();
      let below_all = s < BANDS[BANDS.len() - 1].0;
      assert_eq!(matching + usize::from(below_all), 1, "score {s}");
      s += 0.05;
    }
  }

  #[test]
  fn bands_are_ordered_healthiest_first() {
    for pair in BANDS.windows(2) {
      assert!(pair[0].0 > pair[1].0);
      assert!(pair[0].1 < pair[1].1);
    }
    assert!(BANDS[BANDS.len() - 1].1 < FALLBACK_STATE);
  }
}
