//! Folding a guess history into an aggregate constraint set.
//!
//! The set is rebuilt from scratch every time the history changes and stays
//! immutable for the duration of one search.

use crate::errors::HistoryError;
use crate::feedback::Feedback;
use crate::history::{project, GuessRecord, ProjectedRow};
use std::collections::{HashMap, HashSet};

/// Everything deduced from the history about the hidden equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    /// Characters pinned by green feedback, indexed by position.
    pub fixed: Vec<Option<char>>,
    /// Minimum outstanding occurrences per character, net of fixed
    /// positions already assigned that character.
    pub required_counts: HashMap<char, usize>,
    /// Hard per-character occurrence caps (most restrictive guess wins).
    pub max_counts: HashMap<char, usize>,
    /// Characters known absent from the hidden equation.
    pub excluded: HashSet<char>,
    /// Characters ruled out per position by yellow and
    /// present-but-capped gray feedback.
    pub forbidden_at: Vec<HashSet<char>>,
}

impl ConstraintSet {
    /// An unconstrained set for equations of `length` characters.
    pub fn empty(length: usize) -> Self {
        ConstraintSet {
            fixed: vec![None; length],
            required_counts: HashMap::new(),
            max_counts: HashMap::new(),
            excluded: HashSet::new(),
            forbidden_at: vec![HashSet::new(); length],
        }
    }

    pub fn length(&self) -> usize {
        self.fixed.len()
    }

    pub(crate) fn required(&self, c: char) -> usize {
        self.required_counts.get(&c).copied().unwrap_or(0)
    }

    pub(crate) fn max_count(&self, c: char) -> Option<usize> {
        self.max_counts.get(&c).copied()
    }

    /// Build the constraints one target deduces from a guess history,
    /// skipping solved records and validating record shapes. Rebuilt from
    /// scratch on every call; never mutated incrementally.
    pub fn from_history(
        history: &[GuessRecord],
        target: usize,
        mode4: bool,
        length: usize,
    ) -> Result<Self, HistoryError> {
        let rows = project(history, target, mode4, length)?;
        Ok(Self::build(&rows, length))
    }

    /// Fold projected history rows into a constraint set.
    ///
    /// Per guess, each character's green/yellow occurrences are tallied
    /// first; then per position:
    /// - green fixes the position and counts toward the requirement;
    /// - yellow forbids the character there and counts toward the
    ///   requirement;
    /// - gray excludes the character outright when it has no green/yellow
    ///   occurrence in the same guess, otherwise caps it at exactly that
    ///   tally and forbids it at the gray position.
    ///
    /// Requirements aggregate by maximum across guesses, caps by minimum.
    /// Finally, requirements already satisfied by fixed positions are
    /// subtracted out, and any character that later evidence shows present
    /// (a positive requirement or a fixed position) is lifted back out of
    /// the exclusion set.
    pub(crate) fn build(rows: &[ProjectedRow], length: usize) -> Self {
        let mut cs = ConstraintSet::empty(length);

        for row in rows {
            // Green + yellow tally for this guess alone.
            let mut present: HashMap<char, usize> = HashMap::new();
            for (&c, &f) in row.guess.iter().zip(&row.feedback) {
                if f != Feedback::Gray {
                    *present.entry(c).or_insert(0) += 1;
                }
            }

            let mut caps: HashMap<char, usize> = HashMap::new();
            for (pos, (&c, &f)) in row.guess.iter().zip(&row.feedback).enumerate() {
                match f {
                    Feedback::Green => {
                        cs.fixed[pos] = Some(c);
                    }
                    Feedback::Yellow => {
                        cs.forbidden_at[pos].insert(c);
                    }
                    Feedback::Gray => {
                        let tally = present.get(&c).copied().unwrap_or(0);
                        if tally == 0 {
                            cs.excluded.insert(c);
                        } else {
                            // Present elsewhere, capped at the tally, and
                            // known not to be here.
                            caps.insert(c, tally);
                            cs.forbidden_at[pos].insert(c);
                        }
                    }
                }
            }

            for (&c, &n) in &present {
                let entry = cs.required_counts.entry(c).or_insert(0);
                *entry = (*entry).max(n);
            }
            for (&c, &cap) in &caps {
                cs.max_counts
                    .entry(c)
                    .and_modify(|m| *m = (*m).min(cap))
                    .or_insert(cap);
            }
        }

        // Correction (a): fixed positions already satisfy part of the
        // requirement they established.
        let mut fixed_tally: HashMap<char, usize> = HashMap::new();
        for c in cs.fixed.iter().flatten() {
            *fixed_tally.entry(*c).or_insert(0) += 1;
        }
        for (c, n) in &fixed_tally {
            if let Some(req) = cs.required_counts.get_mut(c) {
                *req = req.saturating_sub(*n);
            }
        }

        // Correction (b): evidence of presence overrides an earlier
        // blanket exclusion.
        let required_counts = &cs.required_counts;
        cs.excluded.retain(|c| {
            required_counts.get(c).copied().unwrap_or(0) == 0 && !fixed_tally.contains_key(c)
        });

        cs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::project;
    use crate::history::GuessRecord;

    fn build_single(guesses: &[(&str, &str)], length: usize) -> ConstraintSet {
        let history: Vec<GuessRecord> = guesses
            .iter()
            .map(|(g, p)| GuessRecord::single(g, p).unwrap())
            .collect();
        let rows = project(&history, 0, false, length).unwrap();
        ConstraintSet::build(&rows, length)
    }

    #[test]
    fn all_gray_duplicates_are_excluded() {
        // "2+2=4" with x g x g x: both 2s and the 4 are wholly gray.
        let cs = build_single(&[("2+2=4", "xgxgx")], 5);
        assert!(cs.excluded.contains(&'2'));
        assert!(cs.excluded.contains(&'4'));
        assert_eq!(cs.fixed[1], Some('+'));
        assert_eq!(cs.fixed[3], Some('='));
        // The fixed occurrences already satisfy their own requirements.
        assert_eq!(cs.required('+'), 0);
        assert_eq!(cs.required('='), 0);
    }

    #[test]
    fn gray_with_green_elsewhere_caps_the_count() {
        // "1*1=1": green 1 at position 2, gray 1s at positions 0 and 4.
        let cs = build_single(&[("1*1=1", "xgggx")], 5);
        assert_eq!(cs.max_count('1'), Some(1));
        assert!(cs.forbidden_at[0].contains(&'1'));
        assert!(cs.forbidden_at[4].contains(&'1'));
        assert!(!cs.excluded.contains(&'1'));
        assert_eq!(cs.fixed[2], Some('1'));
    }

    #[test]
    fn yellow_forbids_its_position_and_requires_the_char() {
        let cs = build_single(&[("8+1=9", "ygggx")], 5);
        assert!(cs.forbidden_at[0].contains(&'8'));
        assert_eq!(cs.required('8'), 1);
        assert!(cs.excluded.contains(&'9'));
    }

    #[test]
    fn later_presence_lifts_an_earlier_exclusion() {
        // First guess marks 7 wholly gray, second shows it yellow.
        let cs = build_single(&[("7+1=08", "xgxgxx"), ("6+7=13", "xxyxxx")], 6);
        assert!(!cs.excluded.contains(&'7'));
        assert_eq!(cs.required('7'), 1);
        assert!(cs.forbidden_at[2].contains(&'7'));
    }

    #[test]
    fn requirements_aggregate_by_maximum() {
        // One yellow 3 in the first guess, two in the second.
        let cs = build_single(&[("3+1=4", "yxxxx"), ("3*3=9", "yxyxx")], 5);
        assert_eq!(cs.required('3'), 2);
    }

    #[test]
    fn caps_aggregate_by_minimum() {
        // First guess caps 1 at one occurrence, second at two.
        let cs = build_single(&[("1*1=1", "xgggx"), ("11=11", "gygxx")], 5);
        assert_eq!(cs.max_count('1'), Some(1));
    }

    #[test]
    fn rebuild_is_deterministic() {
        let guesses = [("2+2=4", "xgxgx"), ("8+1=9", "yggyx")];
        assert_eq!(build_single(&guesses, 5), build_single(&guesses, 5));
    }
}
