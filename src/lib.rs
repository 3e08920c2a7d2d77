//! Constraint-based candidate search for equation-guessing games.
//!
//! A hidden arithmetic equation (digits, `+ - * /`, one `=`) is guessed
//! Wordle-style: each guess returns per-character green/yellow/gray
//! feedback. This crate turns the guess history into a constraint set,
//! then runs an exhaustive, pruned, cancellable backtracking search that
//! enumerates every equation consistent with all observed feedback, ranked
//! by a simple informativeness score.
//!
//! The crate is a pure core: (history, configuration) in, (ranked
//! candidates, progress stream) out. Screenshot classification, OCR and
//! rendering live with the caller, which only exchanges the plain data
//! types defined here.
//!
//! ```
//! use numberle_solver::{CancelFlag, GuessRecord, Solver, SolverConfig};
//!
//! let solver = Solver::new(SolverConfig { length: 5, ..Default::default() })?;
//! let history = vec![GuessRecord::single("2+2=4", "xgxgx")?];
//! let output = solver.solve(&history, &CancelFlag::new(), &|_event| {})?;
//! assert!(output.single().results.contains(&"3+3=6".to_string()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod alphabet;
pub mod consistency;
pub mod constraints;
pub mod equation;
pub mod errors;
pub mod feedback;
pub mod history;
pub mod scoring;
mod search;
pub mod solver;

pub use consistency::{check_guess, verdict, Verdict};
pub use constraints::ConstraintSet;
pub use equation::is_valid_equation;
pub use errors::{ConfigError, ConsistencyError, HistoryError};
pub use feedback::{Feedback, FeedbackPattern};
pub use history::{history_from_json, history_to_json, GuessRecord};
pub use solver::{
    CancelFlag, ProgressEvent, SolveOutput, SolveStatus, Solver, SolverConfig, TargetOutcome,
};
