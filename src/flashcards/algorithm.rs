//! Spaced repetition scheduling
//!
//! A review reports recall difficulty on a 1-5 scale:
//! - 1: Forgot completely, start over
//! - 2: Recalled with heavy effort, shrink the interval
//! - 3: Recalled with some effort
//! - 4: Recalled after hesitation
//! - 5: Recalled instantly
//!
//! Ratings of 3 and above count as correct and grow both the ease factor
//! and the interval.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use super::models::SchedulingState;

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor of a new card
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

const EASE_STEP_UP: f64 = 0.1;
const EASE_STEP_DOWN: f64 = 0.2;
const HARD_INTERVAL_FACTOR: f64 = 0.6;

/// Tolerance for float products that should land on a whole number
const FLOOR_EPSILON: f64 = 1e-9;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("difficulty must be between 1 and 5, got {0}")]
pub struct InvalidDifficulty(pub i32);

/// A validated review rating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    difficulty: u8,
}

impl ReviewOutcome {
    pub fn new(difficulty: i32) -> Result<Self, InvalidDifficulty> {
        match u8::try_from(difficulty) {
            Ok(d @ 1..=5) => Ok(Self { difficulty: d }),
            _ => Err(InvalidDifficulty(difficulty)),
        }
    }

    pub fn difficulty(self) -> u8 {
        self.difficulty
    }

    pub fn is_correct(self) -> bool {
        self.difficulty >= 3
    }
}

/// Result of scheduling a review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub state: SchedulingState,
    pub correct: bool,
}

fn floor_days(value: f64) -> u32 {
    (value + FLOOR_EPSILON).floor().max(1.0) as u32
}

/// Compute the card state after a review at `now`
pub fn schedule(state: &SchedulingState, outcome: ReviewOutcome, now: DateTime<Utc>) -> ReviewResult {
    let correct = outcome.is_correct();
    let interval = state.interval_days.max(1);

    let ease_factor = if correct {
        state.ease_factor + EASE_STEP_UP
    } else {
        (state.ease_factor - EASE_STEP_DOWN).max(MIN_EASE_FACTOR)
    };

    let interval_days = match outcome.difficulty() {
        1 => 1,
        2 => floor_days(interval as f64 * HARD_INTERVAL_FACTOR),
        _ => floor_days(interval as f64 * ease_factor),
    };

    let next = SchedulingState {
        ease_factor,
        interval_days,
        review_count: state.review_count + 1,
        correct_count: state.correct_count + u32::from(correct),
        last_reviewed: Some(now),
        next_review: Some(now + Duration::days(i64::from(interval_days))),
    };

    ReviewResult {
        state: next,
        correct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(ease_factor: f64, interval_days: u32) -> SchedulingState {
        SchedulingState {
            ease_factor,
            interval_days,
            ..SchedulingState::default()
        }
    }

    fn outcome(d: i32) -> ReviewOutcome {
        ReviewOutcome::new(d).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rejects_out_of_range_difficulty() {
        for d in [-1, 0, 6, 300] {
            assert_eq!(ReviewOutcome::new(d), Err(InvalidDifficulty(d)));
        }
        for d in 1..=5 {
            assert!(ReviewOutcome::new(d).is_ok());
        }
    }

    #[test]
    fn test_hard_review_shrinks_interval() {
        let result = schedule(&state(2.5, 10), outcome(2), Utc::now());
        assert!(approx(result.state.ease_factor, 2.3));
        assert_eq!(result.state.interval_days, 6);
        assert!(!result.correct);
        assert_eq!(result.state.correct_count, 0);
        assert_eq!(result.state.review_count, 1);
    }

    #[test]
    fn test_ease_floor_holds() {
        let result = schedule(&state(1.3, 5), outcome(2), Utc::now());
        assert!(approx(result.state.ease_factor, 1.3));
        assert_eq!(result.state.interval_days, 3);
    }

    #[test]
    fn test_forgotten_card_resets_interval() {
        let result = schedule(&state(2.5, 1), outcome(1), Utc::now());
        assert_eq!(result.state.interval_days, 1);
        assert!(approx(result.state.ease_factor, 2.3));
        assert!(!result.correct);

        let long = schedule(&state(2.5, 40), outcome(1), Utc::now());
        assert_eq!(long.state.interval_days, 1);
    }

    #[test]
    fn test_correct_review_grows_interval() {
        let result = schedule(&state(2.5, 10), outcome(4), Utc::now());
        assert!(approx(result.state.ease_factor, 2.6));
        assert_eq!(result.state.interval_days, 26);
        assert!(result.correct);
        assert_eq!(result.state.correct_count, 1);
    }

    #[test]
    fn test_hard_review_of_new_card_stays_at_one_day() {
        let result = schedule(&SchedulingState::default(), outcome(2), Utc::now());
        assert_eq!(result.state.interval_days, 1);
    }

    #[test]
    fn test_next_review_follows_interval() {
        let now = Utc::now();
        let result = schedule(&state(2.5, 4), outcome(3), now);
        assert_eq!(result.state.interval_days, 10);
        assert_eq!(result.state.last_reviewed, Some(now));
        assert_eq!(result.state.next_review, Some(now + Duration::days(10)));
    }

    #[test]
    fn test_bounds_hold_for_every_rating() {
        let now = Utc::now();
        for ease in [1.3, 1.5, 2.5, 3.7] {
            for interval in [1, 2, 3, 10, 365] {
                for d in 1..=5 {
                    let result = schedule(&state(ease, interval), outcome(d), now);
                    assert!(result.state.ease_factor >= MIN_EASE_FACTOR);
                    assert!(result.state.interval_days >= 1);
                    assert_eq!(result.correct, d >= 3);
                }
            }
        }
    }

    #[test]
    fn test_repeated_failures_stay_at_floor() {
        let now = Utc::now();
        let mut current = state(1.6, 20);
        for _ in 0..5 {
            current = schedule(&current, outcome(1), now).state;
        }
        assert!(approx(current.ease_factor, MIN_EASE_FACTOR));
        assert_eq!(current.review_count, 5);
        assert_eq!(current.correct_count, 0);
    }
}
