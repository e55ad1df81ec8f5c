//! Button presses understood by the expression buffer.

/// A binary operator as stored in the raw expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// The character written into the raw expression.
    pub fn as_char(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }

    /// Parse a raw operator character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            _ => None,
        }
    }
}

/// Check if a character is one of the four raw binary operators.
pub fn is_operator(c: char) -> bool {
    Operator::from_char(c).is_some()
}

/// A single button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A digit 0-9.
    Digit(u8),
    /// The decimal point.
    Point,
    /// One of `+ - * /`.
    Operator(Operator),
    OpenParen,
    CloseParen,
    Percent,
    /// Remove the last character (the backspace button).
    DeleteLast,
    /// Reset input, previous expression and result (the AC button).
    ClearAll,
    /// Evaluate (the `=` button).
    Equals,
}

impl Token {
    /// Build a digit token, rejecting anything above 9.
    pub fn digit(d: u8) -> Option<Self> {
        (d <= 9).then_some(Self::Digit(d))
    }

    /// The character this token appends to the raw expression, if any.
    pub fn as_char(self) -> Option<char> {
        match self {
            Self::Digit(d) => char::from_digit(u32::from(d), 10),
            Self::Point => Some('.'),
            Self::Operator(op) => Some(op.as_char()),
            Self::OpenParen => Some('('),
            Self::CloseParen => Some(')'),
            Self::Percent => Some('%'),
            Self::DeleteLast | Self::ClearAll | Self::Equals => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_bounds() {
        assert_eq!(Token::digit(7), Some(Token::Digit(7)));
        assert_eq!(Token::digit(10), None);
    }

    #[test]
    fn test_token_chars() {
        assert_eq!(Token::Digit(0).as_char(), Some('0'));
        assert_eq!(Token::Operator(Operator::Divide).as_char(), Some('/'));
        assert_eq!(Token::Equals.as_char(), None);
    }

    #[test]
    fn test_operator_round_trip() {
        for c in ['+', '-', '*', '/'] {
            assert_eq!(Operator::from_char(c).map(Operator::as_char), Some(c));
        }
        assert!(!is_operator('%'));
    }
}
