//! Automatic closing of open parenthesis groups.

use std::borrow::Cow;

/// Number of `)` needed to close every `(` in the expression.
pub fn pending_closers(expr: &str) -> usize {
    let opens = expr.chars().filter(|&c| c == '(').count();
    let closes = expr.chars().filter(|&c| c == ')').count();
    opens.saturating_sub(closes)
}

/// Append the missing closing parentheses, if any.
pub fn balance(expr: &str) -> Cow<'_, str> {
    match pending_closers(expr) {
        0 => Cow::Borrowed(expr),
        n => Cow::Owned(format!("{expr}{}", ")".repeat(n))),
    }
}
