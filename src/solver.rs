//! The search orchestrator: configuration, cancellation, progress
//! streaming, and single- or four-target decomposition.
//!
//! One [`Solver`] wraps one validated configuration. Each call to
//! [`Solver::solve`] rebuilds the constraint set(s) from the history,
//! runs one engine per target (four engines run on the rayon pool in
//! multi-target mode; they share no mutable state) and returns the ranked
//! candidates together with the termination status per target.
//!
//! Progress callbacks run synchronously inside the search, so they must
//! return quickly: enqueue for later rendering, never compute in place.

use crate::consistency::{self, Verdict};
use crate::constraints::ConstraintSet;
use crate::errors::{ConfigError, HistoryError};
use crate::feedback::FeedbackPattern;
use crate::history::GuessRecord;
use crate::scoring;
use crate::search::{self, EngineConfig, StopCause};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const LENGTH_MIN: usize = 5;
pub const LENGTH_MAX: usize = 20;
pub const DEFAULT_MAX_RESULTS: usize = 200;
pub const DEFAULT_YIELD_EVERY: u64 = 1000;
pub const DEFAULT_MIN_YIELD_INTERVAL_MS: u64 = 25;

/// Search session configuration. Validated once by [`Solver::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Equation length, 5-20 inclusive.
    pub length: usize,
    /// Stop expanding once this many results are accepted.
    pub max_results: usize,
    /// Four independent hidden equations instead of one.
    pub mode4: bool,
    /// Wall-clock bound in milliseconds; 0 means unbounded.
    pub timeout_ms: u64,
    /// Cooperative yield cadence, in recursive calls.
    pub yield_every: u64,
    /// Minimum wall-clock gap between suspensions.
    pub min_yield_interval_ms: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            length: 8,
            max_results: DEFAULT_MAX_RESULTS,
            mode4: false,
            timeout_ms: 0,
            yield_every: DEFAULT_YIELD_EVERY,
            min_yield_interval_ms: DEFAULT_MIN_YIELD_INTERVAL_MS,
        }
    }
}

/// How one target's search ended. All of these are normal terminations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// The whole pruned tree was explored.
    Exhausted,
    /// The result cap was reached.
    CapReached,
    /// The wall-clock timeout expired.
    TimedOut,
    /// The cancellation flag was observed.
    Cancelled,
}

/// One entry of the progress stream. Emitted at yield points (without a
/// result) and immediately whenever a candidate is accepted (with it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Target index; always 0 in single-target mode.
    pub target: usize,
    /// Recursive calls so far; divide by the space estimate for a rough
    /// completion percentage.
    pub explored: u64,
    pub found: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
}

/// Ranked result of one target's search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetOutcome {
    /// Candidates sorted by descending informativeness score.
    pub results: Vec<String>,
    pub status: SolveStatus,
    pub explored: u64,
    /// Pre-search size estimate of the pruned space (display only).
    pub space_estimate: u64,
}

/// Output of one solve call: one outcome in single-target mode, four in
/// multi-target mode, indexed by target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolveOutput {
    pub targets: Vec<TargetOutcome>,
}

impl SolveOutput {
    /// The sole outcome of a single-target solve.
    pub fn single(&self) -> &TargetOutcome {
        &self.targets[0]
    }
}

/// Caller-owned cancellation handle, shared with a running search.
///
/// Setting it stops the search from producing new results; everything
/// already accepted is still returned.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn as_atomic(&self) -> &AtomicBool {
        &self.0
    }
}

/// Candidate search orchestrator for one game configuration.
#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Validate the configuration at the boundary, before any search.
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        if !(LENGTH_MIN..=LENGTH_MAX).contains(&config.length) {
            return Err(ConfigError::LengthOutOfRange { length: config.length });
        }
        if config.max_results == 0 {
            return Err(ConfigError::ZeroResultCap);
        }
        Ok(Solver { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Check a prospective guess against the constraints implied by the
    /// history, per target. Callers use this to accept or reject the guess
    /// before appending it. The first contradiction wins; in multi-target
    /// mode its reason is prefixed with the offending target.
    pub fn check_guess(
        &self,
        history: &[GuessRecord],
        guess: &str,
        pattern: &FeedbackPattern,
    ) -> Result<Verdict, HistoryError> {
        let targets = if self.config.mode4 { 4 } else { 1 };
        for target in 0..targets {
            let constraints =
                ConstraintSet::from_history(history, target, self.config.mode4, self.config.length)?;
            let slice = match (pattern, self.config.mode4) {
                (FeedbackPattern::Single(p), false) => p,
                (FeedbackPattern::Multi(ps), true) => &ps[target],
                (FeedbackPattern::Single(_), true) => {
                    return Err(HistoryError::UnexpectedSinglePattern { index: history.len() });
                }
                (FeedbackPattern::Multi(_), false) => {
                    return Err(HistoryError::UnexpectedMultiPattern { index: history.len() });
                }
            };
            if let Err(e) = consistency::check_guess(guess, slice, &constraints) {
                let reason = if self.config.mode4 {
                    format!("target {target}: {e}")
                } else {
                    e.to_string()
                };
                return Ok(Verdict { valid: false, reason: Some(reason) });
            }
        }
        Ok(Verdict { valid: true, reason: None })
    }

    /// Enumerate candidates consistent with `history`.
    ///
    /// Pure with respect to its inputs: the history is only read, the
    /// constraint sets are rebuilt from scratch, and repeated calls with
    /// the same inputs explore the same tree in the same order.
    pub fn solve(
        &self,
        history: &[GuessRecord],
        cancel: &CancelFlag,
        progress: &(dyn Fn(ProgressEvent) + Sync),
    ) -> Result<SolveOutput, HistoryError> {
        let engine_config = self.engine_config();

        if self.config.mode4 {
            let mut sets = Vec::with_capacity(4);
            for target in 0..4 {
                sets.push(ConstraintSet::from_history(
                    history,
                    target,
                    true,
                    self.config.length,
                )?);
            }
            let targets: Vec<TargetOutcome> = sets
                .into_par_iter()
                .enumerate()
                .map(|(target, constraints)| {
                    self.run_target(target, &constraints, &engine_config, cancel, progress)
                })
                .collect();
            Ok(SolveOutput { targets })
        } else {
            let constraints = ConstraintSet::from_history(history, 0, false, self.config.length)?;
            let outcome = self.run_target(0, &constraints, &engine_config, cancel, progress);
            Ok(SolveOutput { targets: vec![outcome] })
        }
    }

    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            length: self.config.length,
            max_results: self.config.max_results,
            yield_every: self.config.yield_every.max(1),
            min_yield_interval: Duration::from_millis(self.config.min_yield_interval_ms),
            deadline: match self.config.timeout_ms {
                0 => None,
                ms => Some(Instant::now() + Duration::from_millis(ms)),
            },
        }
    }

    fn run_target(
        &self,
        target: usize,
        constraints: &ConstraintSet,
        engine_config: &EngineConfig,
        cancel: &CancelFlag,
        progress: &(dyn Fn(ProgressEvent) + Sync),
    ) -> TargetOutcome {
        let space_estimate = search::estimate_space(constraints, self.config.length);
        debug!(
            "target {target}: starting search, space estimate {space_estimate}, cap {}",
            engine_config.max_results
        );
        let raw = search::enumerate(
            constraints,
            engine_config,
            target,
            cancel.as_atomic(),
            progress,
        );
        let status = match raw.stopped {
            None => SolveStatus::Exhausted,
            Some(StopCause::CapReached) => SolveStatus::CapReached,
            Some(StopCause::TimedOut) => SolveStatus::TimedOut,
            Some(StopCause::Cancelled) => SolveStatus::Cancelled,
        };
        info!(
            "target {target}: {} candidates after {} calls ({status:?})",
            raw.results.len(),
            raw.explored
        );
        TargetOutcome {
            results: scoring::rank(raw.results),
            status,
            explored: raw.explored,
            space_estimate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_validated_at_the_boundary() {
        for length in [4, 21, 0] {
            let err = Solver::new(SolverConfig { length, ..Default::default() }).unwrap_err();
            assert_eq!(err, ConfigError::LengthOutOfRange { length });
        }
        for length in [5, 8, 20] {
            assert!(Solver::new(SolverConfig { length, ..Default::default() }).is_ok());
        }
    }

    #[test]
    fn zero_result_cap_is_rejected() {
        let err = Solver::new(SolverConfig { max_results: 0, ..Default::default() }).unwrap_err();
        assert_eq!(err, ConfigError::ZeroResultCap);
    }

    #[test]
    fn config_serde_fills_defaults() {
        let config: SolverConfig = serde_json::from_str(r#"{"length":5}"#).unwrap();
        assert_eq!(config.length, 5);
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
        assert!(!config.mode4);
        assert_eq!(config.timeout_ms, 0);
    }
}
