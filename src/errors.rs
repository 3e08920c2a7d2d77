//! Error types for the configuration, history and consistency boundaries.
//!
//! Search termination (cap, timeout, cancellation, exhaustion) is never an
//! error; those are [`SolveStatus`](crate::solver::SolveStatus) values.

use thiserror::Error;

/// Rejected configuration, caught before any search begins.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("equation length {length} is out of range ({min}-{max})",
            min = crate::solver::LENGTH_MIN, max = crate::solver::LENGTH_MAX)]
    LengthOutOfRange { length: usize },

    #[error("max_results must be at least 1")]
    ZeroResultCap,
}

/// Malformed guess history handed in by a collaborator.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("invalid history JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("guess {index}: guess has {guess_len} characters but the pattern has {pattern_len}")]
    LengthMismatch {
        index: usize,
        guess_len: usize,
        pattern_len: usize,
    },

    #[error("guess {index}: expected a single feedback pattern, found four")]
    UnexpectedMultiPattern { index: usize },

    #[error("guess {index}: expected four feedback patterns, found one")]
    UnexpectedSinglePattern { index: usize },

    #[error("invalid feedback character '{found}' at position {position}")]
    BadFeedbackChar { found: char, position: usize },
}

/// A prospective guess that contradicts the constraints implied by the
/// history so far. The first violation found wins; the message names the
/// exact position, character or count involved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("guess has {found} characters, expected {expected}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("position {position} is already fixed to '{fixed}', so '{guessed}' cannot be green there")]
    FixedMismatch {
        position: usize,
        fixed: char,
        guessed: char,
    },

    #[error("position {position} is known to be '{fixed}', so it must be marked green")]
    FixedNotGreen { position: usize, fixed: char },

    #[error("'{ch}' was excluded by earlier feedback, so it cannot be green or yellow at position {position}")]
    ExcludedPresent { ch: char, position: usize },

    #[error("'{ch}' was already ruled out at position {position}, so it cannot be green there")]
    ForbiddenHere { ch: char, position: usize },

    #[error("'{ch}' is marked green or yellow {count} times, but at most {max} occurrences are possible")]
    TooManyOccurrences { ch: char, count: usize, max: usize },
}
