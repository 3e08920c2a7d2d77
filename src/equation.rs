//! Equation validation and arithmetic evaluation.
//!
//! The validator is a plain boolean acceptor: malformed input is simply not
//! a valid equation, never an error. The left-hand side is evaluated by a
//! pure, total evaluator returning `Option<i64>`; `None` covers bad syntax,
//! division by zero, inexact division and overflow alike.

use crate::alphabet;

/// Evaluate the left-hand side of an equation with standard precedence.
///
/// `*` and `/` bind tighter than `+` and `-`; ties associate left to right.
/// A leading `-` negates the first operand. Every division must have a
/// non-zero divisor and a zero remainder, and all intermediate arithmetic
/// must stay within `i64`.
pub fn eval_left(expr: &str) -> Option<i64> {
    let chars: Vec<char> = expr.chars().collect();
    let mut i = 0usize;
    let negate = chars.first() == Some(&'-');
    if negate {
        i = 1;
    }

    // Tokenize into alternating numbers and operators. The alphabet is
    // ASCII, so char indices double as byte indices.
    let mut nums: Vec<i64> = Vec::new();
    let mut ops: Vec<char> = Vec::new();
    loop {
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return None; // operator without an operand
        }
        nums.push(expr[start..i].parse().ok()?);
        if i == chars.len() {
            break;
        }
        let op = chars[i];
        if !alphabet::is_operator(op) {
            return None;
        }
        ops.push(op);
        i += 1;
    }
    if negate {
        nums[0] = -nums[0];
    }

    // First pass: fold * and / into terms, left to right.
    let mut terms: Vec<i64> = vec![nums[0]];
    let mut term_ops: Vec<char> = Vec::new();
    for (k, &op) in ops.iter().enumerate() {
        let rhs = nums[k + 1];
        match op {
            '*' => {
                let last = terms.len() - 1;
                terms[last] = terms[last].checked_mul(rhs)?;
            }
            '/' => {
                let last = terms.len() - 1;
                if rhs == 0 || terms[last] % rhs != 0 {
                    return None;
                }
                terms[last] /= rhs;
            }
            _ => {
                term_ops.push(op);
                terms.push(rhs);
            }
        }
    }

    // Second pass: sum the terms.
    let mut acc = terms[0];
    for (k, &op) in term_ops.iter().enumerate() {
        acc = if op == '+' {
            acc.checked_add(terms[k + 1])?
        } else {
            acc.checked_sub(terms[k + 1])?
        };
    }
    Some(acc)
}

/// An optional leading `-` followed by at least one digit, nothing else.
fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Decide whether `expr` is a syntactically and arithmetically valid
/// equation of exactly `length` symbols.
///
/// Rules, checked in order with short-circuiting:
/// 1. length and alphabet membership;
/// 2. exactly one `=`, neither first nor last;
/// 3. both sides non-empty;
/// 4. the right side is `-?[0-9]+`;
/// 5. the left side does not start with `*` or `/`;
/// 6. the left side evaluates exactly to the right side's integer value.
pub fn is_valid_equation(expr: &str, length: usize) -> bool {
    let chars: Vec<char> = expr.chars().collect();
    if chars.len() != length || !chars.iter().all(|&c| alphabet::in_alphabet(c)) {
        return false;
    }

    let mut equals = chars.iter().enumerate().filter(|(_, &c)| c == '=');
    let eq_pos = match (equals.next(), equals.next()) {
        (Some((pos, _)), None) => pos,
        _ => return false,
    };
    if eq_pos == 0 || eq_pos == chars.len() - 1 {
        return false;
    }

    let left = &expr[..eq_pos];
    let right = &expr[eq_pos + 1..];
    if left.is_empty() || right.is_empty() {
        return false;
    }

    if !is_integer_literal(right) {
        return false;
    }
    if left.starts_with('*') || left.starts_with('/') {
        return false;
    }

    let Some(left_value) = eval_left(left) else {
        return false;
    };
    let Ok(right_value) = right.parse::<i64>() else {
        return false;
    };
    left_value == right_value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_with_precedence() {
        assert_eq!(eval_left("2+3*4"), Some(14));
        assert_eq!(eval_left("20-6/2"), Some(17));
        assert_eq!(eval_left("2*3+4*5"), Some(26));
        assert_eq!(eval_left("10-2-3"), Some(5));
    }

    #[test]
    fn leading_minus_negates() {
        assert_eq!(eval_left("-5+8"), Some(3));
        assert_eq!(eval_left("-2*3"), Some(-6));
    }

    #[test]
    fn division_must_be_exact() {
        assert_eq!(eval_left("8/4"), Some(2));
        assert_eq!(eval_left("9/2"), None);
        assert_eq!(eval_left("5/0"), None);
        assert_eq!(eval_left("1/2*2"), None);
    }

    #[test]
    fn malformed_expressions_are_none() {
        assert_eq!(eval_left(""), None);
        assert_eq!(eval_left("3++2"), None);
        assert_eq!(eval_left("+3"), None);
        assert_eq!(eval_left("3+"), None);
        assert_eq!(eval_left("-"), None);
    }

    #[test]
    fn overflow_is_none() {
        assert_eq!(eval_left("99999999999999999999"), None);
        assert_eq!(eval_left("9999999999*9999999999"), None);
    }

    #[test]
    fn accepts_valid_equations() {
        assert!(is_valid_equation("3+3=6", 5));
        assert!(is_valid_equation("2+3*4=14", 8));
        assert!(is_valid_equation("1-9=-8", 6));
        assert!(is_valid_equation("-1+3=2", 6));
        assert!(is_valid_equation("12=12", 5));
    }

    #[test]
    fn rejects_invalid_equations() {
        // wrong arithmetic
        assert!(!is_valid_equation("3*3=6", 5));
        // leading '='
        assert!(!is_valid_equation("=3+36", 5));
        // trailing '='
        assert!(!is_valid_equation("3+36=", 5));
        // two '='
        assert!(!is_valid_equation("3=3=3", 5));
        // no '='
        assert!(!is_valid_equation("3+3+6", 5));
        // wrong length
        assert!(!is_valid_equation("3+3=6", 6));
        // foreign character
        assert!(!is_valid_equation("3+3>6", 5));
        // operator on the right side
        assert!(!is_valid_equation("6=3+3", 5));
        // left side starting with '*'
        assert!(!is_valid_equation("*3+3=9", 6));
        // inexact division
        assert!(!is_valid_equation("7/2*2=7", 7));
    }
}
