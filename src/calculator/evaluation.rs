//! Expression evaluation.
//!
//! The arithmetic itself is delegated to an [`Evaluator`] (fasteval by
//! default, fend as an alternative). This module decides what string is
//! handed to it: parentheses balanced, juxtaposed operands multiplied,
//! percent expanded, and the previous answer prepended when the expression
//! starts with an operator.

use std::borrow::Cow;
use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::CalcError;
use super::format::Formatter;
use super::token::is_operator;
use super::{parens, percent};

lazy_static! {
    /// A point with no fraction digits after it, as in `5.` or `5.+1`.
    static ref DANGLING_POINT: Regex = Regex::new(r"(\d)\.(\D|$)").unwrap();
}

/// A successfully evaluated value and its display form.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluated {
    /// The numeric value.
    pub value: f64,
    /// Formatted for display (with thousand separators).
    pub display: String,
}

/// The result currently shown under the input line.
#[derive(Clone, Debug, PartialEq)]
pub enum EvaluationResult {
    Value(Evaluated),
    /// The error sentinel.
    Error,
}

impl Default for EvaluationResult {
    fn default() -> Self {
        Self::zero()
    }
}

impl EvaluationResult {
    /// The initial result of a fresh session.
    pub fn zero() -> Self {
        Self::Value(Evaluated {
            value: 0.0,
            display: "0".to_string(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// The numeric value, unless this is the error sentinel.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(evaluated) => Some(evaluated.value),
            Self::Error => None,
        }
    }
}

/// An arithmetic evaluator.
///
/// Any failure (parse error, division by zero, ...) is reported as an error
/// message; callers do not distinguish failure kinds.
pub trait Evaluator {
    fn evaluate(&self, expression: &str) -> Result<f64, String>;
}

/// Available evaluator backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    #[default]
    Fasteval,
    Fend,
}

impl EvaluatorKind {
    pub fn build(self) -> Box<dyn Evaluator> {
        match self {
            Self::Fasteval => Box::new(FastevalEvaluator),
            Self::Fend => Box::new(FendEvaluator),
        }
    }
}

/// Evaluator backed by fasteval.
#[derive(Clone, Copy, Debug, Default)]
pub struct FastevalEvaluator;

impl Evaluator for FastevalEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64, String> {
        // Use an empty namespace (no custom variables)
        let mut namespace = BTreeMap::<String, f64>::new();

        let value =
            fasteval::ez_eval(expression, &mut namespace).map_err(|e| format!("{e:?}"))?;

        if value.is_nan() {
            Err("Not a Number".to_string())
        } else if value.is_infinite() {
            let msg = if value.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            };
            Err(msg.to_string())
        } else {
            Ok(value)
        }
    }
}

/// Evaluator backed by fend.
#[derive(Clone, Copy, Debug, Default)]
pub struct FendEvaluator;

impl Evaluator for FendEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64, String> {
        let mut context = fend_core::Context::new();
        let result = fend_core::evaluate(expression, &mut context)?;

        // Inexact results are prefixed, e.g. "approx. 0.3333333333".
        let main = result.get_main_result().trim();
        let number = main.strip_prefix("approx. ").unwrap_or(main);

        number
            .parse::<f64>()
            .map_err(|_| format!("Not a number: {main}"))
    }
}

/// Everything produced by pressing `=`.
#[derive(Clone, Debug, PartialEq)]
pub struct Calculation {
    /// The buffer with missing closers appended.
    pub balanced: String,
    /// The grouped form of `balanced`, shown above the input line.
    pub previous_expression: String,
    /// The string handed to the evaluator, if evaluation was attempted.
    pub expression: Option<String>,
    pub outcome: Result<Evaluated, CalcError>,
}

/// Balance, rewrite and evaluate a raw expression.
///
/// `prior` is the result currently on display; it becomes the left operand
/// when the expression starts with an operator.
pub fn calculate(
    raw: &str,
    prior: &EvaluationResult,
    evaluator: &dyn Evaluator,
    formatter: &dyn Formatter,
) -> Calculation {
    let balanced = parens::balance(raw).into_owned();
    let previous_expression = formatter.format_number_in_expression(&balanced);

    let mut calculation = Calculation {
        balanced,
        previous_expression,
        expression: None,
        outcome: Err(CalcError::EmptyOrTrailingOperator),
    };

    if calculation.balanced.is_empty() {
        return calculation;
    }

    let juxtaposed = insert_implicit_products(&calculation.balanced);
    let trimmed = DANGLING_POINT.replace_all(&juxtaposed, "${1}${2}");
    let rewritten = percent::rewrite(&trimmed);
    if rewritten.ends_with(|c: char| is_operator(c) || c == '%') {
        return calculation;
    }

    let expression = if rewritten.starts_with(is_operator) {
        let base = match prior {
            EvaluationResult::Value(evaluated) => formatter.strip_grouping(&evaluated.display),
            EvaluationResult::Error => "0".to_string(),
        };
        format!("{base}{rewritten}")
    } else {
        rewritten
    };
    debug!(%expression, "evaluating");

    calculation.outcome = evaluate_checked(&expression, evaluator, formatter);
    match &calculation.outcome {
        Ok(evaluated) => info!(%expression, result = %evaluated.display, "evaluated"),
        Err(e) => info!(%expression, error = %e, "evaluation failed"),
    }
    calculation.expression = Some(expression);
    calculation
}

/// Insert `*` wherever an operand directly follows a closed group, a
/// percent or a number: `5(3)`, `(2)(3)`, `(-5)3`, `5%3`.
fn insert_implicit_products(expr: &str) -> Cow<'_, str> {
    let implies_product = |prev: char, next: char| match prev {
        ')' | '%' => next == '(' || next == '.' || next.is_ascii_digit(),
        '.' | '0'..='9' => next == '(',
        _ => false,
    };

    let chars: Vec<char> = expr.chars().collect();
    if !chars.windows(2).any(|w| implies_product(w[0], w[1])) {
        return Cow::Borrowed(expr);
    }

    let mut result = String::with_capacity(expr.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && implies_product(chars[i - 1], c) {
            result.push('*');
        }
        result.push(c);
    }
    Cow::Owned(result)
}

fn evaluate_checked(
    expression: &str,
    evaluator: &dyn Evaluator,
    formatter: &dyn Formatter,
) -> Result<Evaluated, CalcError> {
    let value = evaluator
        .evaluate(expression)
        .map_err(CalcError::EvaluatorRejected)?;

    if !value.is_finite() {
        return Err(CalcError::EvaluatorRejected(format!("{value}")));
    }

    Ok(Evaluated {
        value,
        display: formatter.format_result(value),
    })
}

/// Turn a displayed result back into buffer input.
///
/// Grouping separators are removed. A negative value is wrapped as `(-n)`,
/// so it reads as a value and not as "subtract from the previous answer".
pub fn result_as_input(display: &str, formatter: &dyn Formatter) -> String {
    let raw = formatter.strip_grouping(display);
    if raw.starts_with('-') {
        format!("({raw})")
    } else {
        raw
    }
}
