//! Calculator core: turning button presses into evaluated expressions.
//!
//! This module provides functionality to:
//! - Admit or reject each button press against the typed expression
//! - Expand percent notation and close open parentheses
//! - Evaluate expressions using fasteval or fend
//! - Format expressions and results for display
//! - Copy results to the clipboard

mod buffer;
mod clipboard;
mod error;
mod evaluation;
mod format;
mod keys;
mod parens;
mod percent;
mod token;

pub use buffer::{Admission, ExpressionBuffer, MAX_DIGIT_RUN, Tail, classify_tail};
pub use clipboard::{clipboard_text, copy_result};
pub use error::CalcError;
pub use evaluation::{
    Calculation, Evaluated, EvaluationResult, Evaluator, EvaluatorKind, FastevalEvaluator,
    FendEvaluator, calculate, result_as_input,
};
pub use format::{ELLIPSIS_WIDTH, Formatter, LocaleFormatter, ellipsis};
pub use keys::{key_to_token, looks_like_keys, parse_keys};
pub use parens::{balance, pending_closers};
pub use percent::rewrite as rewrite_percent;
pub use token::{Operator, Token, is_operator};
