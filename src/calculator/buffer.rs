//! The raw expression buffer and its token admission rules.
//!
//! Every rule is keyed on the class of the buffer's last character, see
//! [`Tail`]. The buffer only ever holds the raw form: no grouping
//! separators, no display glyphs.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::error::CalcError;
use super::parens;
use super::token::{Operator, Token, is_operator};

/// Maximum digits in the number currently being typed.
pub const MAX_DIGIT_RUN: usize = 15;

lazy_static! {
    /// The number being typed at the end of the buffer: digits, optionally
    /// followed by a point and more digits.
    static ref TRAILING_NUMBER: Regex = Regex::new(r"\d+(\.\d*)?$").unwrap();
}

/// Classification of the last character of the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tail {
    Empty,
    Digit,
    Point,
    /// A binary operator.
    Operator,
    /// The buffer is exactly `-`.
    LeadingMinus,
    /// A `-` typed right after `*` or `/`, the sign of the next operand.
    OperandSign,
    OpenParen,
    CloseParen,
    Percent,
    /// Anything else, e.g. the exponent marker of a written-back result.
    Other,
}

/// Classify the tail of a raw expression.
pub fn classify_tail(raw: &str) -> Tail {
    let mut rev = raw.chars().rev();
    let Some(last) = rev.next() else {
        return Tail::Empty;
    };

    match last {
        '0'..='9' => Tail::Digit,
        '.' => Tail::Point,
        '(' => Tail::OpenParen,
        ')' => Tail::CloseParen,
        '%' => Tail::Percent,
        '-' => match rev.next() {
            None => Tail::LeadingMinus,
            Some('*' | '/') => Tail::OperandSign,
            Some(_) => Tail::Operator,
        },
        c if is_operator(c) => Tail::Operator,
        _ => Tail::Other,
    }
}

/// Outcome of offering a token to the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The buffer changed.
    Accepted,
    /// The token was not admitted; the buffer is unchanged.
    Ignored,
}

/// The expression currently being typed.
#[derive(Clone, Debug)]
pub struct ExpressionBuffer {
    raw: String,
    max_digits: usize,
}

impl Default for ExpressionBuffer {
    fn default() -> Self {
        Self::new(MAX_DIGIT_RUN)
    }
}

impl ExpressionBuffer {
    pub fn new(max_digits: usize) -> Self {
        Self {
            raw: String::new(),
            max_digits,
        }
    }

    /// The raw expression.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn tail(&self) -> Tail {
        classify_tail(&self.raw)
    }

    /// Replace the whole buffer, e.g. when reusing a history entry.
    pub fn set(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Remove exactly one trailing character.
    pub fn delete_last(&mut self) -> Admission {
        match self.raw.pop() {
            Some(_) => Admission::Accepted,
            None => Admission::Ignored,
        }
    }

    /// Number of `)` still needed to close every open group.
    pub fn pending_closers(&self) -> usize {
        parens::pending_closers(&self.raw)
    }

    /// Offer a token to the buffer.
    ///
    /// `%` in an invalid position is reported as
    /// [`CalcError::PercentContextInvalid`]; every other rejected token is
    /// [`Admission::Ignored`]. `=` is never handled here and is ignored.
    pub fn apply(&mut self, token: Token) -> Result<Admission, CalcError> {
        let tail = self.tail();

        let admission = match token {
            Token::Digit(d) => self.push_digit(d),
            Token::CloseParen => self.push_close_paren(),
            Token::Operator(op) => self.push_operator(op, tail),
            Token::Percent => self.push_percent(tail)?,
            Token::Point => self.push_point(),
            Token::OpenParen => self.push('('),
            Token::DeleteLast => self.delete_last(),
            Token::ClearAll => {
                self.clear();
                Admission::Accepted
            }
            Token::Equals => Admission::Ignored,
        };

        debug!(?token, ?tail, ?admission, raw = %self.raw, "token applied");
        Ok(admission)
    }

    fn push(&mut self, c: char) -> Admission {
        self.raw.push(c);
        Admission::Accepted
    }

    fn trailing_number(&self) -> Option<&str> {
        TRAILING_NUMBER.find(&self.raw).map(|m| m.as_str())
    }

    fn push_digit(&mut self, d: u8) -> Admission {
        let Some(c) = char::from_digit(u32::from(d), 10) else {
            return Admission::Ignored;
        };

        let run_digits = self
            .trailing_number()
            .map(|n| n.chars().filter(char::is_ascii_digit).count())
            .unwrap_or(0);
        if run_digits >= self.max_digits {
            return Admission::Ignored;
        }

        self.push(c)
    }

    fn push_close_paren(&mut self) -> Admission {
        if parens::pending_closers(&self.raw) == 0 {
            return Admission::Ignored;
        }
        self.push(')')
    }

    fn push_operator(&mut self, op: Operator, tail: Tail) -> Admission {
        match (tail, op) {
            (Tail::Empty, Operator::Subtract) => self.push('-'),
            // Leading `*` or `/` multiplies or divides an implicit zero.
            (Tail::Empty, Operator::Multiply | Operator::Divide) => {
                self.raw.push('0');
                self.push(op.as_char())
            }
            (Tail::Empty, Operator::Add) | (Tail::LeadingMinus, _) => Admission::Ignored,
            (Tail::OperandSign, _) => {
                self.raw.truncate(self.raw.len() - 2);
                self.push(op.as_char())
            }
            (Tail::Operator, Operator::Subtract) if self.raw.ends_with(['*', '/']) => {
                self.push('-')
            }
            (Tail::Operator, _) => {
                self.raw.pop();
                self.push(op.as_char())
            }
            _ => self.push(op.as_char()),
        }
    }

    fn push_percent(&mut self, tail: Tail) -> Result<Admission, CalcError> {
        match tail {
            Tail::Digit | Tail::CloseParen => Ok(self.push('%')),
            _ => Err(CalcError::PercentContextInvalid),
        }
    }

    fn push_point(&mut self) -> Admission {
        if self.trailing_number().is_some_and(|n| n.contains('.')) {
            return Admission::Ignored;
        }
        self.push('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(keys: &str) -> ExpressionBuffer {
        let mut buffer = ExpressionBuffer::default();
        for c in keys.chars() {
            let token = match c {
                '0'..='9' => Token::Digit(c as u8 - b'0'),
                '.' => Token::Point,
                '(' => Token::OpenParen,
                ')' => Token::CloseParen,
                '%' => Token::Percent,
                _ => Token::Operator(Operator::from_char(c).unwrap()),
            };
            let _ = buffer.apply(token);
        }
        buffer
    }

    #[test]
    fn test_tail_classes() {
        assert_eq!(classify_tail(""), Tail::Empty);
        assert_eq!(classify_tail("12"), Tail::Digit);
        assert_eq!(classify_tail("1."), Tail::Point);
        assert_eq!(classify_tail("-"), Tail::LeadingMinus);
        assert_eq!(classify_tail("5*-"), Tail::OperandSign);
        assert_eq!(classify_tail("5+-"), Tail::Operator);
        assert_eq!(classify_tail("5+"), Tail::Operator);
        assert_eq!(classify_tail("(5"), Tail::Digit);
        assert_eq!(classify_tail("("), Tail::OpenParen);
        assert_eq!(classify_tail("(5)"), Tail::CloseParen);
        assert_eq!(classify_tail("5%"), Tail::Percent);
        assert_eq!(classify_tail("1e"), Tail::Other);
    }

    #[test]
    fn test_digit_limit() {
        let mut buffer = typed("123456789012345");
        assert_eq!(buffer.apply(Token::Digit(6)), Ok(Admission::Ignored));
        assert_eq!(buffer.as_str(), "123456789012345");
    }

    #[test]
    fn test_digit_limit_ignores_point() {
        let mut buffer = typed("1234567.89012345");
        assert_eq!(buffer.apply(Token::Digit(1)), Ok(Admission::Ignored));
        assert_eq!(buffer.as_str(), "1234567.89012345");
    }

    #[test]
    fn test_digit_limit_resets_after_operator() {
        let mut buffer = typed("123456789012345+");
        assert_eq!(buffer.apply(Token::Digit(1)), Ok(Admission::Accepted));
        assert_eq!(buffer.as_str(), "123456789012345+1");
    }

    #[test]
    fn test_close_paren_needs_open() {
        assert_eq!(typed(")").as_str(), "");
        assert_eq!(typed("(5))").as_str(), "(5)");
        assert_eq!(typed("((5)").as_str(), "((5)");
    }

    #[test]
    fn test_operator_on_empty() {
        assert_eq!(typed("-").as_str(), "-");
        assert_eq!(typed("+").as_str(), "");
        assert_eq!(typed("/").as_str(), "0/");
        assert_eq!(typed("*5").as_str(), "0*5");
    }

    #[test]
    fn test_operator_replaces_operator() {
        assert_eq!(typed("5+*").as_str(), "5*");
        assert_eq!(typed("5-+").as_str(), "5+");
        assert_eq!(typed("5+-").as_str(), "5-");
    }

    #[test]
    fn test_leading_minus_is_preserved() {
        assert_eq!(typed("-+").as_str(), "-");
        assert_eq!(typed("--").as_str(), "-");
        assert_eq!(typed("-*3").as_str(), "-3");
    }

    #[test]
    fn test_operand_sign_after_multiply() {
        assert_eq!(typed("5*-").as_str(), "5*-");
        assert_eq!(typed("5*-3").as_str(), "5*-3");
        assert_eq!(typed("5/-+").as_str(), "5+");
        assert_eq!(typed("5*--").as_str(), "5-");
    }

    #[test]
    fn test_percent_admission() {
        assert_eq!(typed("5%").as_str(), "5%");
        assert_eq!(typed("(5)%").as_str(), "(5)%");

        for keys in ["", "5+", "5.", "(", "5%"] {
            let mut buffer = typed(keys);
            let before = buffer.as_str().to_string();
            assert_eq!(
                buffer.apply(Token::Percent),
                Err(CalcError::PercentContextInvalid),
                "percent after {keys:?}"
            );
            assert_eq!(buffer.as_str(), before);
        }
    }

    #[test]
    fn test_decimal_point() {
        assert_eq!(typed("0.").as_str(), "0.");
        assert_eq!(typed("1.2.").as_str(), "1.2");
        assert_eq!(typed("1..").as_str(), "1.");
        assert_eq!(typed("1.2+3.").as_str(), "1.2+3.");
    }

    #[test]
    fn test_open_paren_always_appended() {
        assert_eq!(typed("((").as_str(), "((");
        assert_eq!(typed("5(").as_str(), "5(");
    }

    #[test]
    fn test_delete_and_clear() {
        let mut buffer = typed("12+3");
        assert_eq!(buffer.apply(Token::DeleteLast), Ok(Admission::Accepted));
        assert_eq!(buffer.as_str(), "12+");
        assert_eq!(buffer.apply(Token::ClearAll), Ok(Admission::Accepted));
        assert!(buffer.is_empty());
        assert_eq!(buffer.apply(Token::DeleteLast), Ok(Admission::Ignored));
    }

    #[test]
    fn test_pending_closers() {
        assert_eq!(typed("((5").pending_closers(), 2);
        assert_eq!(typed("(5)").pending_closers(), 0);
    }
}
