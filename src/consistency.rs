//! Validating a prospective guess against the constraints built from the
//! history so far.
//!
//! This gates whether a new record may be appended to the history; it never
//! mutates the constraint set. The first violation found is reported.

use crate::constraints::ConstraintSet;
use crate::errors::ConsistencyError;
use crate::feedback::Feedback;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Boundary-friendly mirror of the check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
}

impl From<Result<(), ConsistencyError>> for Verdict {
    fn from(result: Result<(), ConsistencyError>) -> Self {
        match result {
            Ok(()) => Verdict { valid: true, reason: None },
            Err(e) => Verdict {
                valid: false,
                reason: Some(e.to_string()),
            },
        }
    }
}

/// Check a prospective `(guess, pattern)` pair against `constraints`.
///
/// Per position: a position fixed to a different character must not be
/// green for the new character; a position fixed to the same character must
/// be green; an excluded character must not be green or yellow; a character
/// already forbidden at the position must not be green there (a repeated
/// yellow is consistent evidence, not a contradiction). Then, per
/// character, the green+yellow total in the new guess must not exceed an
/// existing occurrence cap.
pub fn check_guess(
    guess: &str,
    pattern: &[Feedback],
    constraints: &ConstraintSet,
) -> Result<(), ConsistencyError> {
    let chars: Vec<char> = guess.chars().collect();
    if chars.len() != constraints.length() || pattern.len() != chars.len() {
        return Err(ConsistencyError::LengthMismatch {
            expected: constraints.length(),
            found: chars.len().min(pattern.len()),
        });
    }

    for (position, (&c, &f)) in chars.iter().zip(pattern).enumerate() {
        if let Some(fixed) = constraints.fixed[position] {
            if f == Feedback::Green && c != fixed {
                return Err(ConsistencyError::FixedMismatch {
                    position,
                    fixed,
                    guessed: c,
                });
            }
            if c == fixed && f != Feedback::Green {
                return Err(ConsistencyError::FixedNotGreen { position, fixed });
            }
        }
        if constraints.excluded.contains(&c) && f != Feedback::Gray {
            return Err(ConsistencyError::ExcludedPresent { ch: c, position });
        }
        if f == Feedback::Green && constraints.forbidden_at[position].contains(&c) {
            return Err(ConsistencyError::ForbiddenHere { ch: c, position });
        }
    }

    // Aggregate green+yellow totals against existing caps, reported in
    // first-occurrence order for determinism.
    let mut totals: HashMap<char, usize> = HashMap::new();
    for (&c, &f) in chars.iter().zip(pattern) {
        if f != Feedback::Gray {
            *totals.entry(c).or_insert(0) += 1;
        }
    }
    let mut seen = HashSet::new();
    for &c in &chars {
        if !seen.insert(c) {
            continue;
        }
        let count = totals.get(&c).copied().unwrap_or(0);
        if let Some(max) = constraints.max_count(c) {
            if count > max {
                return Err(ConsistencyError::TooManyOccurrences { ch: c, count, max });
            }
        }
    }
    Ok(())
}

/// [`check_guess`] with the `{valid, reason}` result shape.
pub fn verdict(guess: &str, pattern: &[Feedback], constraints: &ConstraintSet) -> Verdict {
    check_guess(guess, pattern, constraints).into()
}
