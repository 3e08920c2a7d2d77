//! Ranking results by a simple informativeness heuristic.

use crate::alphabet;
use std::collections::HashSet;

/// `1.5 x distinct characters - operator count` (operators exclude `=`).
/// More varied candidates reveal more; operator-heavy ones read worse.
pub fn score(candidate: &str) -> f64 {
    score_key(candidate) as f64 / 2.0
}

// Doubled integer score, exact and orderable: 3*distinct - 2*operators.
fn score_key(candidate: &str) -> i64 {
    let distinct: HashSet<char> = candidate.chars().collect();
    let operators = candidate
        .chars()
        .filter(|&c| alphabet::is_operator(c))
        .count();
    3 * distinct.len() as i64 - 2 * operators as i64
}

/// Sort descending by score; ties keep discovery order.
pub fn rank(mut results: Vec<String>) -> Vec<String> {
    results.sort_by_key(|r| std::cmp::Reverse(score_key(r)));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_distinct_one_operator_scores_six_and_a_half() {
        assert!((score("1+2=3") - 6.5).abs() < f64::EPSILON);
    }

    #[test]
    fn repeated_characters_score_lower() {
        // 4 distinct, 1 operator: 1.5*4 - 1 = 5.
        assert!((score("3+3=6") - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn more_distinct_fewer_operators_ranks_first() {
        let ranked = rank(vec![
            "3+3=6".into(),   // 5.0
            "1+2=3".into(),   // 6.5
            "1*2*3=6".into(), // 1.5*6 - 2 = 7.0
        ]);
        assert_eq!(ranked, vec!["1*2*3=6", "1+2=3", "3+3=6"]);
    }

    #[test]
    fn ties_preserve_discovery_order() {
        let ranked = rank(vec!["1+2=3".into(), "2+1=3".into(), "3+1=4".into()]);
        assert_eq!(ranked, vec!["1+2=3", "2+1=3", "3+1=4"]);
    }
}
