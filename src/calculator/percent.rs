//! Rewriting of `%` suffixes into plain arithmetic.
//!
//! The buffer stores `%` as typed; it is only expanded right before
//! evaluation. Each pass runs over the whole string before the next one,
//! because the final catch-all pass would otherwise consume operands that
//! the operator-aware passes expand differently.
//!
//! A parenthesized left operand such as `(2+3)+5%` is not a literal, so the
//! operator-aware passes do not fire and the percent falls through to the
//! catch-all pass as a plain fraction of one.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    /// `)%`: percent of a closed group.
    static ref GROUP_PERCENT: Regex = Regex::new(r"\)%").unwrap();

    /// `A*B%` or `A/B%`: the percent scales the right-hand side.
    static ref SCALING_PERCENT: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)([*/])(\d+(?:\.\d+)?)%").unwrap();

    /// `A+B%` or `A-B%`: the percent is taken of the left operand.
    static ref RELATIVE_PERCENT: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)([+\-])(\d+(?:\.\d+)?)%").unwrap();

    /// Any remaining `N%`.
    static ref BARE_PERCENT: Regex = Regex::new(r"(\d+(?:\.\d+)?)%").unwrap();
}

/// Expand every `%` in a raw expression.
pub fn rewrite(expr: &str) -> String {
    if !expr.contains('%') {
        return expr.to_string();
    }

    let rewritten = GROUP_PERCENT.replace_all(expr, ")*0.01");
    let rewritten = SCALING_PERCENT.replace_all(&rewritten, "${1}${2}(${3}/100)");
    let rewritten = RELATIVE_PERCENT.replace_all(&rewritten, "${1}${2}(${1}*${3}/100)");
    let rewritten = BARE_PERCENT.replace_all(&rewritten, "(${1}*0.01)");

    debug!(from = expr, to = %rewritten, "percent rewritten");
    rewritten.into_owned()
}
