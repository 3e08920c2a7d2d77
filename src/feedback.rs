//! Per-character feedback and the single/multi-target pattern shape.
//!
//! Collaborators (color-grid extraction, clipboard import) deliver feedback
//! as plain pattern strings: `g` for green, `y` for yellow, `x` for gray
//! (`b` and `-` are accepted as gray aliases on input). Multi-target games
//! deliver four such strings per guess. The tagged [`FeedbackPattern`]
//! resolves that shape once, at the history-projection boundary, so the
//! constraint builder and search engine only ever see one canonical
//! per-target pattern.

use crate::errors::HistoryError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Classification of one guess character against the hidden equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    /// Correct character at this position.
    Green,
    /// Character present in the hidden equation, but not at this position.
    Yellow,
    /// Character absent, or already fully accounted for elsewhere.
    Gray,
}

impl Feedback {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'g' => Some(Feedback::Green),
            'y' => Some(Feedback::Yellow),
            'x' | 'b' | '-' => Some(Feedback::Gray),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Feedback::Green => 'g',
            Feedback::Yellow => 'y',
            Feedback::Gray => 'x',
        }
    }
}

/// Parse a pattern string such as `"xgxgx"`.
pub fn parse_pattern(s: &str) -> Result<Vec<Feedback>, HistoryError> {
    s.chars()
        .enumerate()
        .map(|(position, c)| {
            Feedback::from_char(c).ok_or(HistoryError::BadFeedbackChar { found: c, position })
        })
        .collect()
}

pub fn pattern_to_string(pattern: &[Feedback]) -> String {
    pattern.iter().map(|f| f.to_char()).collect()
}

/// Feedback for one guess: one pattern in single-target games, four
/// parallel patterns in multi-target games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackPattern {
    Single(Vec<Feedback>),
    Multi([Vec<Feedback>; 4]),
}

impl FeedbackPattern {
    /// Parse from one pattern string.
    pub fn single(pattern: &str) -> Result<Self, HistoryError> {
        Ok(FeedbackPattern::Single(parse_pattern(pattern)?))
    }

    /// Parse from four pattern strings.
    pub fn multi(patterns: [&str; 4]) -> Result<Self, HistoryError> {
        let [a, b, c, d] = patterns;
        Ok(FeedbackPattern::Multi([
            parse_pattern(a)?,
            parse_pattern(b)?,
            parse_pattern(c)?,
            parse_pattern(d)?,
        ]))
    }

    /// True when at least one pattern is fully green.
    pub fn has_all_green(&self) -> bool {
        fn all_green(p: &[Feedback]) -> bool {
            !p.is_empty() && p.iter().all(|&f| f == Feedback::Green)
        }
        match self {
            FeedbackPattern::Single(p) => all_green(p),
            FeedbackPattern::Multi(ps) => ps.iter().any(|p| all_green(p)),
        }
    }
}

/// Wire shape: a bare string or an array of four strings.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PatternRepr {
    Single(String),
    Multi([String; 4]),
}

impl Serialize for FeedbackPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            FeedbackPattern::Single(p) => PatternRepr::Single(pattern_to_string(p)),
            FeedbackPattern::Multi(ps) => PatternRepr::Multi([
                pattern_to_string(&ps[0]),
                pattern_to_string(&ps[1]),
                pattern_to_string(&ps[2]),
                pattern_to_string(&ps[3]),
            ]),
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FeedbackPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match PatternRepr::deserialize(deserializer)? {
            PatternRepr::Single(s) => FeedbackPattern::single(&s).map_err(D::Error::custom),
            PatternRepr::Multi([a, b, c, d]) => {
                FeedbackPattern::multi([&a, &b, &c, &d]).map_err(D::Error::custom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pattern_strings() {
        let p = parse_pattern("xgygx").unwrap();
        assert_eq!(
            p,
            vec![
                Feedback::Gray,
                Feedback::Green,
                Feedback::Yellow,
                Feedback::Green,
                Feedback::Gray
            ]
        );
        assert_eq!(pattern_to_string(&p), "xgygx");
    }

    #[test]
    fn gray_aliases_accepted() {
        assert_eq!(parse_pattern("b-x").unwrap(), vec![Feedback::Gray; 3]);
    }

    #[test]
    fn rejects_unknown_feedback_char() {
        let err = parse_pattern("gq").unwrap_err();
        assert!(matches!(
            err,
            HistoryError::BadFeedbackChar { found: 'q', position: 1 }
        ));
    }

    #[test]
    fn detects_all_green() {
        assert!(FeedbackPattern::single("ggggg").unwrap().has_all_green());
        assert!(!FeedbackPattern::single("ggggy").unwrap().has_all_green());
        let multi = FeedbackPattern::multi(["xxxxx", "ggggg", "xxxxx", "xxxxx"]).unwrap();
        assert!(multi.has_all_green());
    }

    #[test]
    fn serde_round_trips_both_shapes() {
        let single = FeedbackPattern::single("xgxgx").unwrap();
        let json = serde_json::to_string(&single).unwrap();
        assert_eq!(json, "\"xgxgx\"");
        assert_eq!(serde_json::from_str::<FeedbackPattern>(&json).unwrap(), single);

        let multi = FeedbackPattern::multi(["ggggg", "xxxxx", "yyyyy", "xgxgx"]).unwrap();
        let json = serde_json::to_string(&multi).unwrap();
        assert_eq!(serde_json::from_str::<FeedbackPattern>(&json).unwrap(), multi);
    }
}
