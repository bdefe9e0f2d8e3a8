//! Quantity resolution: expected yields and attempt counts.
//!
//! Recursive tree scaling always uses [`attempts_needed`], which divides by
//! the average yield so results are deterministic. [`attempt_range`] is the
//! range-aware variant used by the single-recipe calculator.

use crate::recipe::Output;
use serde::{Deserialize, Serialize};

/// Number of times a recipe must run.
pub type Attempts = u64;

/// Expected units per attempt: `chance × midpoint(quantity)`.
pub fn average_yield(output: &Output) -> f64 {
    output.chance.unwrap_or(1.0) * output.quantity.midpoint()
}

/// Result of sizing a run count against an output's average yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptCount {
    pub attempts: Attempts,
    /// The average yield was zero, negative, or not finite and the count was
    /// clamped to one attempt.
    pub clamped: bool,
}

/// `ceil(target / average_yield(output))`.
///
/// A non-positive target needs no attempts. An output whose average yield is
/// not a positive finite number is treated as needing exactly one attempt,
/// and the result is flagged as clamped.
pub fn attempts_needed(target: f64, output: &Output) -> AttemptCount {
    if target.is_nan() || target <= 0.0 {
        return AttemptCount {
            attempts: 0,
            clamped: false,
        };
    }
    let per_attempt = average_yield(output);
    if !per_attempt.is_finite() || per_attempt <= 0.0 {
        return AttemptCount {
            attempts: 1,
            clamped: true,
        };
    }
    AttemptCount {
        attempts: ceil_to_attempts(target / per_attempt),
        clamped: false,
    }
}

/// Bounds on the number of attempts when an output is ranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRange {
    /// Attempts needed if every run yields the maximum.
    pub min: Attempts,
    /// Attempts needed if every run yields the minimum. `None` when the
    /// minimum yield is zero and no bound exists.
    pub max: Option<Attempts>,
}

/// `{ min: ceil(target / max), max: ceil(target / min) }`.
///
/// The chance of the output is ignored: the range describes what a
/// successful attempt yields. For a fixed output both bounds are equal.
pub fn attempt_range(target: f64, output: &Output) -> AttemptRange {
    if target.is_nan() || target <= 0.0 {
        return AttemptRange {
            min: 0,
            max: Some(0),
        };
    }
    let bound = |per_attempt: f64| -> Option<Attempts> {
        if per_attempt.is_finite() && per_attempt > 0.0 {
            Some(ceil_to_attempts(target / per_attempt))
        } else {
            None
        }
    };
    AttemptRange {
        min: bound(output.quantity.max()).unwrap_or(1),
        max: bound(output.quantity.min()),
    }
}

/// Round a positive ratio up to a whole attempt count.
fn ceil_to_attempts(ratio: f64) -> Attempts {
    // Guard against 12.000000000000002-style noise from chained products.
    let rounded = ratio.round();
    if (ratio - rounded).abs() < 1e-9 {
        return rounded as Attempts;
    }
    ratio.ceil() as Attempts
}
