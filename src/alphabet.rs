//! The 15-symbol equation alphabet and character classification helpers.

/// Every symbol an equation may contain.
pub const ALPHABET: [char; 15] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '+', '-', '*', '/', '=',
];

/// The four arithmetic operators. `=` is not an operator.
pub const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// Discovery preference order: small digits before large, `0` last,
/// `+`/`-` before `*`/`/`, `=` at the end. Used only to decide which
/// valid candidates surface first in a capped, streaming search.
pub(crate) const PREFERENCE: [char; 15] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '+', '-', '*', '/', '=',
];

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_operator(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/')
}

pub fn in_alphabet(c: char) -> bool {
    is_digit(c) || is_operator(c) || c == '='
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        for c in ALPHABET {
            assert!(in_alphabet(c));
        }
        assert!(!in_alphabet('%'));
        assert!(!in_alphabet('('));
        assert!(is_operator('-'));
        assert!(!is_operator('='));
        assert!(is_digit('0'));
        assert!(!is_digit('+'));
    }
}
