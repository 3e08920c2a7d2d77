//! Depth-first backtracking enumeration of candidate equations.
//!
//! The engine carries a single mutable usage map with
//! increment-before-recurse / decrement-after-return discipline, prunes
//! against the constraint set and the equation grammar at every position,
//! and hands each accepted candidate to the progress callback immediately.
//! Cooperative yielding, cancellation and the wall-clock deadline all live
//! at the recursion boundary, so a host can run one engine per thread (or
//! four, in multi-target mode) without any shared mutable state.

use crate::alphabet;
use crate::constraints::ConstraintSet;
use crate::equation;
use crate::solver::ProgressEvent;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Ceiling for the pre-search space-size estimate. Only used to turn the
/// explored counter into a display percentage.
pub(crate) const SPACE_ESTIMATE_CEILING: u64 = 1_000_000_000_000;

/// Why the enumeration stopped before exhausting the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopCause {
    CapReached,
    Cancelled,
    TimedOut,
}

#[derive(Debug)]
pub(crate) struct RawSearchResult {
    pub results: Vec<String>,
    pub explored: u64,
    pub stopped: Option<StopCause>,
}

/// Engine knobs resolved by the orchestrator from its configuration.
#[derive(Debug, Clone)]
pub(crate) struct EngineConfig {
    pub length: usize,
    pub max_results: usize,
    pub yield_every: u64,
    pub min_yield_interval: Duration,
    pub deadline: Option<Instant>,
}

/// Estimate the search space: the product over positions of the number of
/// locally allowed characters (fixed positions count one), saturating at
/// [`SPACE_ESTIMATE_CEILING`]. Purely informational; never affects pruning.
pub(crate) fn estimate_space(constraints: &ConstraintSet, length: usize) -> u64 {
    let mut estimate: u64 = 1;
    for pos in 0..length {
        let allowed = if constraints.fixed[pos].is_some() {
            1
        } else {
            alphabet::ALPHABET
                .iter()
                .filter(|&&c| {
                    !constraints.excluded.contains(&c) && !constraints.forbidden_at[pos].contains(&c)
                })
                .count() as u64
        };
        if allowed == 0 {
            return 0;
        }
        estimate = estimate.saturating_mul(allowed).min(SPACE_ESTIMATE_CEILING);
    }
    estimate
}

/// Enumerate every equation satisfying `constraints`, up to the result cap.
pub(crate) fn enumerate(
    constraints: &ConstraintSet,
    config: &EngineConfig,
    target: usize,
    cancel: &AtomicBool,
    progress: &(dyn Fn(ProgressEvent) + Sync),
) -> RawSearchResult {
    let mut searcher = Searcher {
        constraints,
        config,
        target,
        cancel,
        progress,
        current: vec!['\0'; config.length],
        usage: HashMap::new(),
        results: Vec::new(),
        explored: 0,
        last_yield: Instant::now(),
        stopped: None,
    };
    searcher.recurse(0, false);
    RawSearchResult {
        results: searcher.results,
        explored: searcher.explored,
        stopped: searcher.stopped,
    }
}

struct Searcher<'a> {
    constraints: &'a ConstraintSet,
    config: &'a EngineConfig,
    target: usize,
    cancel: &'a AtomicBool,
    progress: &'a (dyn Fn(ProgressEvent) + Sync),
    current: Vec<char>,
    usage: HashMap<char, usize>,
    results: Vec<String>,
    explored: u64,
    last_yield: Instant,
    stopped: Option<StopCause>,
}

impl Searcher<'_> {
    fn usage_of(&self, c: char) -> usize {
        self.usage.get(&c).copied().unwrap_or(0)
    }

    fn recurse(&mut self, pos: usize, equals_placed: bool) {
        if self.stopped.is_some() {
            return;
        }
        self.explored += 1;
        if self.cancel.load(Ordering::Relaxed) {
            self.stopped = Some(StopCause::Cancelled);
            return;
        }
        if self.explored % self.config.yield_every == 0 {
            self.yield_point();
            if self.stopped.is_some() {
                return;
            }
        }

        if pos == self.config.length {
            self.accept_leaf(equals_placed);
            return;
        }

        if let Some(fixed) = self.constraints.fixed[pos] {
            // An equals sign can never directly follow an operator.
            if fixed == '=' && pos > 0 && alphabet::is_operator(self.current[pos - 1]) {
                return;
            }
            if self.would_exceed_cap(fixed) {
                return;
            }
            self.place_and_recurse(pos, fixed, equals_placed);
        } else {
            for c in self.candidate_order(pos) {
                if self.stopped.is_some() {
                    return;
                }
                if self.can_place(c, pos, equals_placed) {
                    self.place_and_recurse(pos, c, equals_placed);
                }
            }
        }
    }

    fn place_and_recurse(&mut self, pos: usize, c: char, equals_placed: bool) {
        self.current[pos] = c;
        *self.usage.entry(c).or_insert(0) += 1;
        if self.still_satisfiable(pos) {
            self.recurse(pos + 1, equals_placed || c == '=');
        }
        if let Some(n) = self.usage.get_mut(&c) {
            *n -= 1;
            if *n == 0 {
                self.usage.remove(&c);
            }
        }
    }

    fn would_exceed_cap(&self, c: char) -> bool {
        match self.constraints.max_count(c) {
            Some(max) => self.usage_of(c) + 1 > max,
            None => false,
        }
    }

    /// All pruning rules for a free position, in order: forbidden position,
    /// occurrence cap, operator adjacency, equals placement, post-equals
    /// grammar.
    fn can_place(&self, c: char, pos: usize, equals_placed: bool) -> bool {
        if self.constraints.excluded.contains(&c) {
            return false;
        }
        if self.constraints.forbidden_at[pos].contains(&c) {
            return false;
        }
        if self.would_exceed_cap(c) {
            return false;
        }

        let prev = if pos > 0 { Some(self.current[pos - 1]) } else { None };

        if alphabet::is_operator(c) {
            if let Some(p) = prev {
                if alphabet::is_operator(p) || p == '=' {
                    // A lone '-' (unary negation) may follow an operator or
                    // '=', but never another '-'.
                    if c != '-' || p == '-' {
                        return false;
                    }
                }
            }
        }

        if c == '=' {
            if equals_placed || pos == 0 || pos == self.config.length - 1 {
                return false;
            }
            if let Some(p) = prev {
                if alphabet::is_operator(p) {
                    return false;
                }
            }
            // The right side cannot host an operator, so every outstanding
            // required operator occurrence must already be placed.
            for op in alphabet::OPERATORS {
                if self.usage_of(op) < self.constraints.required(op) {
                    return false;
                }
            }
        } else if equals_placed {
            // After '=': digits, plus a single '-' directly after it.
            if c == '-' {
                if prev != Some('=') {
                    return false;
                }
            } else if !alphabet::is_digit(c) {
                return false;
            }
        }

        true
    }

    /// Feasibility bound: with `c` tentatively placed at `pos`, the
    /// outstanding requirements must still fit in the remaining positions.
    fn still_satisfiable(&self, pos: usize) -> bool {
        let remaining = self.config.length - pos - 1;
        let mut deficit = 0usize;
        for (&c, &required) in &self.constraints.required_counts {
            deficit += required.saturating_sub(self.usage_of(c));
            if deficit > remaining {
                return false;
            }
        }
        true
    }

    /// Discovery ordering: characters still short of their requirement
    /// first, then digits over operators, '=' pulled toward the midpoint,
    /// operators pushed out of the first two positions, and a fixed small
    /// preference order breaking ties.
    fn candidate_order(&self, pos: usize) -> Vec<char> {
        let mid = (self.config.length / 2) as i64;
        let mut ranked: Vec<(i64, usize, char)> = Vec::with_capacity(alphabet::PREFERENCE.len());
        for (base, &c) in alphabet::PREFERENCE.iter().enumerate() {
            if self.constraints.excluded.contains(&c) {
                continue;
            }
            let mut weight: i64 = 0;
            if self.usage_of(c) < self.constraints.required(c) {
                weight += 1_000;
            }
            if alphabet::is_digit(c) {
                weight += 100;
            }
            if c == '=' {
                weight += 90 - 15 * (pos as i64 - mid).abs();
            }
            if alphabet::is_operator(c) && pos < 2 {
                weight -= 50;
            }
            ranked.push((weight, base, c));
        }
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        ranked.into_iter().map(|(_, _, c)| c).collect()
    }

    fn accept_leaf(&mut self, equals_placed: bool) {
        if !equals_placed {
            return;
        }
        for (&c, &required) in &self.constraints.required_counts {
            if self.usage_of(c) < required {
                return;
            }
        }
        let candidate: String = self.current.iter().collect();
        if !equation::is_valid_equation(&candidate, self.config.length) {
            return;
        }
        self.results.push(candidate.clone());
        (self.progress)(ProgressEvent {
            target: self.target,
            explored: self.explored,
            found: self.results.len(),
            latest: Some(candidate),
        });
        if self.results.len() >= self.config.max_results {
            self.stopped = Some(StopCause::CapReached);
        }
    }

    /// Reached every `yield_every` calls. The deadline is always checked;
    /// the actual suspension (and progress report) only happens once the
    /// minimum wall-clock interval has elapsed, to bound overhead. The
    /// cancellation flag is re-checked immediately after resuming.
    fn yield_point(&mut self) {
        if let Some(deadline) = self.config.deadline {
            if Instant::now() >= deadline {
                self.stopped = Some(StopCause::TimedOut);
                return;
            }
        }
        if self.last_yield.elapsed() < self.config.min_yield_interval {
            return;
        }
        (self.progress)(ProgressEvent {
            target: self.target,
            explored: self.explored,
            found: self.results.len(),
            latest: None,
        });
        std::thread::yield_now();
        self.last_yield = Instant::now();
        if self.cancel.load(Ordering::Relaxed) {
            self.stopped = Some(StopCause::Cancelled);
        }
    }
}
