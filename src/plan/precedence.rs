//! Operator precedence for the shunting-yard parser

use std::cmp::Ordering;

use super::token::Operator;

/// Precedence levels (higher number = higher precedence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Precedence {
    /// Logical OR
    Or = 1,
    /// Logical XOR
    Xor = 2,
    /// Logical AND
    And = 3,
    /// Prefix NOT
    Not = 4,
}

impl Precedence {
    /// Get precedence for an operator
    pub fn for_operator(operator: Operator) -> Precedence {
        match operator {
            Operator::Or => Precedence::Or,
            Operator::Xor => Precedence::Xor,
            Operator::And => Precedence::And,
            Operator::Not => Precedence::Not,
        }
    }
}

/// Compares how tightly `a` binds relative to `b`.
pub fn compare_precedence(a: Operator, b: Operator) -> Ordering {
    Precedence::for_operator(a).cmp(&Precedence::for_operator(b))
}

/// Returns true when `operator` groups right-to-left.
pub fn is_right_associative(operator: Operator) -> bool {
    matches!(operator, Operator::Not)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order() {
        assert_eq!(compare_precedence(Operator::Not, Operator::And), Ordering::Greater);
        assert_eq!(compare_precedence(Operator::And, Operator::Xor), Ordering::Greater);
        assert_eq!(compare_precedence(Operator::Xor, Operator::Or), Ordering::Greater);
        assert_eq!(compare_precedence(Operator::Or, Operator::Or), Ordering::Equal);
        assert_eq!(compare_precedence(Operator::Or, Operator::Not), Ordering::Less);
    }

    #[test]
    fn only_not_is_right_associative() {
        assert!(is_right_associative(Operator::Not));
        assert!(!is_right_associative(Operator::And));
        assert!(!is_right_associative(Operator::Xor));
    }
}
