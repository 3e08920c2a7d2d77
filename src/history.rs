//! Guess history records and per-target projection.
//!
//! A [`GuessRecord`] is appended by the caller (after the consistency check
//! passes) and never mutated in place; callers only pop the last record
//! ("undo") or clear the whole history. Records marked `solved` stay in the
//! history for display purposes but are excluded from constraint
//! aggregation.
//!
//! Histories also travel as JSON strings across the collaborator boundary,
//! e.g. `[{"guess":"2+2=4","pattern":"xgxgx","solved":false}]`.

use crate::errors::HistoryError;
use crate::feedback::{Feedback, FeedbackPattern};
use serde::{Deserialize, Serialize};

/// One guess with its observed feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub guess: String,
    pub pattern: FeedbackPattern,
    /// Fully green record; the target is already identified. Kept in the
    /// history but skipped when building constraints.
    #[serde(default)]
    pub solved: bool,
}

impl GuessRecord {
    /// Single-target record from a guess and a pattern string.
    pub fn single(guess: &str, pattern: &str) -> Result<Self, HistoryError> {
        let pattern = FeedbackPattern::single(pattern)?;
        Ok(GuessRecord {
            guess: guess.to_string(),
            solved: pattern.has_all_green(),
            pattern,
        })
    }

    /// Multi-target record from a guess and four pattern strings.
    pub fn multi(guess: &str, patterns: [&str; 4]) -> Result<Self, HistoryError> {
        Ok(GuessRecord {
            guess: guess.to_string(),
            pattern: FeedbackPattern::multi(patterns)?,
            solved: false,
        })
    }
}

/// One history entry projected onto a single target.
#[derive(Debug, Clone)]
pub(crate) struct ProjectedRow {
    pub guess: Vec<char>,
    pub feedback: Vec<Feedback>,
}

/// Project the shared history onto target `target`, dropping solved records
/// and verifying that every record has the shape the mode calls for.
pub(crate) fn project(
    history: &[GuessRecord],
    target: usize,
    mode4: bool,
    length: usize,
) -> Result<Vec<ProjectedRow>, HistoryError> {
    let mut rows = Vec::new();
    for (index, record) in history.iter().enumerate() {
        if record.solved {
            continue;
        }
        let feedback = match (&record.pattern, mode4) {
            (FeedbackPattern::Single(p), false) => p.clone(),
            (FeedbackPattern::Multi(ps), true) => ps[target].clone(),
            (FeedbackPattern::Single(_), true) => {
                return Err(HistoryError::UnexpectedSinglePattern { index });
            }
            (FeedbackPattern::Multi(_), false) => {
                return Err(HistoryError::UnexpectedMultiPattern { index });
            }
        };
        let guess: Vec<char> = record.guess.chars().collect();
        if guess.len() != length || feedback.len() != guess.len() {
            return Err(HistoryError::LengthMismatch {
                index,
                guess_len: guess.len(),
                pattern_len: feedback.len(),
            });
        }
        rows.push(ProjectedRow { guess, feedback });
    }
    Ok(rows)
}

/// Parse a whole history from a JSON array of records.
pub fn history_from_json(json: &str) -> Result<Vec<GuessRecord>, HistoryError> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize a history as JSON for the collaborator boundary.
pub fn history_to_json(history: &[GuessRecord]) -> Result<String, HistoryError> {
    Ok(serde_json::to_string(history)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_record_marks_solved_when_all_green() {
        assert!(GuessRecord::single("3+3=6", "ggggg").unwrap().solved);
        assert!(!GuessRecord::single("2+2=4", "xgxgx").unwrap().solved);
    }

    #[test]
    fn projection_skips_solved_records() {
        let history = vec![
            GuessRecord::single("2+2=4", "xgxgx").unwrap(),
            GuessRecord::single("3+3=6", "ggggg").unwrap(),
        ];
        let rows = project(&history, 0, false, 5).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].guess, vec!['2', '+', '2', '=', '4']);
    }

    #[test]
    fn projection_selects_the_requested_target() {
        let history = vec![GuessRecord::multi("2+2=4", ["xgxgx", "ggggg", "xxxxx", "yxxxy"]).unwrap()];
        let rows = project(&history, 1, true, 5).unwrap();
        assert_eq!(rows[0].feedback, vec![Feedback::Green; 5]);
        let rows = project(&history, 3, true, 5).unwrap();
        assert_eq!(rows[0].feedback[0], Feedback::Yellow);
    }

    #[test]
    fn projection_rejects_shape_mismatches() {
        let single = vec![GuessRecord::single("2+2=4", "xgxgx").unwrap()];
        assert!(matches!(
            project(&single, 0, true, 5),
            Err(HistoryError::UnexpectedSinglePattern { index: 0 })
        ));

        let multi = vec![GuessRecord::multi("2+2=4", ["xgxgx"; 4]).unwrap()];
        assert!(matches!(
            project(&multi, 0, false, 5),
            Err(HistoryError::UnexpectedMultiPattern { index: 0 })
        ));

        let short = vec![GuessRecord::single("2+2=4", "xgxg").unwrap()];
        assert!(matches!(
            project(&short, 0, false, 5),
            Err(HistoryError::LengthMismatch { index: 0, guess_len: 5, pattern_len: 4 })
        ));
    }

    #[test]
    fn json_round_trip() {
        let history = vec![
            GuessRecord::single("2+2=4", "xgxgx").unwrap(),
            GuessRecord::multi("1+8=9", ["xxxxx", "gyxgy", "ggggg", "yyyyy"]).unwrap(),
        ];
        let json = history_to_json(&history).unwrap();
        assert_eq!(history_from_json(&json).unwrap(), history);
    }

    #[test]
    fn json_solved_defaults_to_false() {
        let history = history_from_json(r#"[{"guess":"2+2=4","pattern":"xgxgx"}]"#).unwrap();
        assert!(!history[0].solved);
    }
}
