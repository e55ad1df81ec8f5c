//! Display formatting for expressions and results.
//!
//! All locale-dependent decisions live behind [`Formatter`], so the buffer
//! and the evaluation bridge never see grouping separators or glyphs.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::evaluation::EvaluationResult;

/// Default maximum width of a history line before it is shortened.
pub const ELLIPSIS_WIDTH: usize = 22;

/// Characters kept from each end of a shortened history line.
const ELLIPSIS_KEEP: usize = 8;

/// Magnitude from which results are shown in exponential form.
const EXPONENTIAL_THRESHOLD: f64 = 1e12;

/// Magnitude below which the shortest float form is already exponential.
const TINY_THRESHOLD: f64 = 1e-6;

lazy_static! {
    /// A numeric literal inside an expression.
    static ref NUMBER_LITERAL: Regex = Regex::new(r"\d+(\.\d+)?").unwrap();
}

/// Turns raw strings and values into display text.
pub trait Formatter {
    /// Group the digits of every numeric literal in a raw expression.
    fn format_number_in_expression(&self, raw: &str) -> String;

    /// Replace raw operator characters with display glyphs.
    fn to_display_symbols(&self, s: &str) -> String;

    /// Render a numeric result.
    fn format_result(&self, value: f64) -> String;

    /// Text shown in place of a result when evaluation failed.
    fn error_sentinel(&self) -> &str;

    /// Remove grouping separators, giving back the raw form.
    fn strip_grouping(&self, s: &str) -> String;

    /// Render an evaluation result, passing the error sentinel through.
    fn format_evaluation(&self, result: &EvaluationResult) -> String {
        match result {
            EvaluationResult::Value(evaluated) => evaluated.display.clone(),
            EvaluationResult::Error => self.error_sentinel().to_string(),
        }
    }
}

/// Shorten a long line to its first and last characters.
pub fn ellipsis(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }

    let head: String = s.chars().take(ELLIPSIS_KEEP).collect();
    let tail: String = s.chars().skip(len - ELLIPSIS_KEEP).collect();
    format!("{head}...{tail}")
}

/// Formatter parameterized by separator, glyphs and fraction digits.
///
/// The default matches the `en-US` conventions: `,` grouping, `×` and `÷`,
/// at most three fraction digits.
#[derive(Clone, Debug)]
pub struct LocaleFormatter {
    pub grouping_separator: char,
    pub multiply_glyph: char,
    pub divide_glyph: char,
    pub max_fraction_digits: usize,
    pub error_text: String,
}

impl Default for LocaleFormatter {
    fn default() -> Self {
        Self {
            grouping_separator: ',',
            multiply_glyph: '×',
            divide_glyph: '÷',
            max_fraction_digits: 3,
            error_text: "Error".to_string(),
        }
    }
}

impl LocaleFormatter {
    /// Insert the grouping separator every three digits of an integer part.
    fn group_digits(&self, digits: &str) -> String {
        let mut result = String::new();
        for (i, c) in digits.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(self.grouping_separator);
            }
            result.push(c);
        }
        result.chars().rev().collect()
    }

    fn format_fixed(&self, value: f64) -> String {
        let formatted = format!("{:.*}", self.max_fraction_digits, value);
        let trimmed = if formatted.contains('.') {
            formatted.trim_end_matches('0').trim_end_matches('.')
        } else {
            formatted.as_str()
        };

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (unsigned, None),
        };

        let mut result = String::new();
        // Rounding can leave "-0", which is shown as plain zero.
        if negative && unsigned != "0" {
            result.push('-');
        }
        result.push_str(&self.group_digits(int_part));
        if let Some(frac_part) = frac_part {
            result.push('.');
            result.push_str(frac_part);
        }
        result
    }
}

impl Formatter for LocaleFormatter {
    fn format_number_in_expression(&self, raw: &str) -> String {
        NUMBER_LITERAL
            .replace_all(raw, |caps: &Captures| {
                let literal = &caps[0];
                // Zero-prefixed runs such as "007" are shown as typed.
                if literal.starts_with('0') && literal.len() > 1 && !literal.starts_with("0.") {
                    return literal.to_string();
                }
                match literal.split_once('.') {
                    Some((int_part, frac_part)) => {
                        format!("{}.{}", self.group_digits(int_part), frac_part)
                    }
                    None => self.group_digits(literal),
                }
            })
            .into_owned()
    }

    fn to_display_symbols(&self, s: &str) -> String {
        s.chars()
            .map(|c| match c {
                '*' => self.multiply_glyph,
                '/' => self.divide_glyph,
                c => c,
            })
            .collect()
    }

    fn format_result(&self, value: f64) -> String {
        let magnitude = value.abs();
        if magnitude > 0.0 && magnitude < TINY_THRESHOLD {
            // `{:e}` never writes a `+` on the exponent.
            return format!("{value:e}");
        }

        // The threshold applies to the value as it would be shown.
        let rounded = format!("{:.*}", self.max_fraction_digits, value)
            .parse::<f64>()
            .unwrap_or(value);
        if rounded.abs() >= EXPONENTIAL_THRESHOLD {
            return format!("{rounded:e}");
        }
        self.format_fixed(value)
    }

    fn error_sentinel(&self) -> &str {
        &self.error_text
    }

    fn strip_grouping(&self, s: &str) -> String {
        s.chars().filter(|&c| c != self.grouping_separator).collect()
    }
}
