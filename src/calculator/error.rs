//! Failure kinds of the calculator core.
//!
//! Every variant is shown to the user as the same error sentinel; the kinds
//! only differ in what happens to the input buffer afterwards.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    /// Evaluation attempted on an empty expression or one ending in an
    /// operator or `%`. The buffer is left as typed.
    #[error("expression is empty or ends with an operator")]
    EmptyOrTrailingOperator,

    /// `%` pressed without a number or closed group before it. The buffer is
    /// left as typed.
    #[error("percent needs a number or a closed group before it")]
    PercentContextInvalid,

    /// The evaluator failed on the expression. The buffer is cleared.
    #[error("evaluator rejected the expression: {0}")]
    EvaluatorRejected(String),

    /// A character in textual key input that maps to no button.
    #[error("unknown key {0:?}")]
    UnknownKey(char),
}

impl CalcError {
    /// Whether the input buffer should be cleared after this failure.
    pub fn clears_input(&self) -> bool {
        matches!(self, Self::EvaluatorRejected(_))
    }
}
