//! Textual key input for the calculator.
//!
//! Maps a line of typed characters onto button presses, so the engine can
//! be driven from a terminal or a script.

use lazy_static::lazy_static;
use regex::Regex;

use super::error::CalcError;
use super::token::{Operator, Token};

lazy_static! {
    /// Matches strings made only of known key characters.
    /// Allows: digits, whitespace, operators and their glyphs, parentheses,
    /// percent, `=`, `<` (delete) and `c` (clear).
    static ref KEY_CHARS: Regex = Regex::new(r"^[\d\s\.\+\-\*/xX×÷()%=<cC]*$").unwrap();
}

/// Check if input consists only of calculator keys.
///
/// This is a fast pre-check before mapping the keys one by one.
pub fn looks_like_keys(input: &str) -> bool {
    !input.trim().is_empty() && KEY_CHARS.is_match(input)
}

/// Map a single key character onto a token.
///
/// Returns `Ok(None)` for whitespace, which separates keys without meaning.
pub fn key_to_token(key: char) -> Result<Option<Token>, CalcError> {
    let token = match key {
        '0'..='9' => Token::Digit(key as u8 - b'0'),
        '.' => Token::Point,
        '+' => Token::Operator(Operator::Add),
        '-' => Token::Operator(Operator::Subtract),
        '*' | 'x' | 'X' | '×' => Token::Operator(Operator::Multiply),
        '/' | '÷' => Token::Operator(Operator::Divide),
        '(' => Token::OpenParen,
        ')' => Token::CloseParen,
        '%' => Token::Percent,
        '=' => Token::Equals,
        '<' => Token::DeleteLast,
        'c' | 'C' => Token::ClearAll,
        c if c.is_whitespace() => return Ok(None),
        c => return Err(CalcError::UnknownKey(c)),
    };
    Ok(Some(token))
}

/// Map a whole line of keys onto tokens, failing on the first unknown key.
pub fn parse_keys(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    for key in input.chars() {
        if let Some(token) = key_to_token(key)? {
            tokens.push(token);
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_accepted() {
        assert!(looks_like_keys("2+3="));
        assert!(looks_like_keys("10 x 5 ="));
        assert!(looks_like_keys("(5+3"));
        assert!(looks_like_keys("100+5%="));
        assert!(looks_like_keys("12<<c"));
        assert!(looks_like_keys("6÷2×3"));
    }

    #[test]
    fn test_invalid_input_rejected() {
        assert!(!looks_like_keys(""));
        assert!(!looks_like_keys("   "));
        assert!(!looks_like_keys("sin(0)"));
        assert!(!looks_like_keys("2^8"));
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(
            parse_keys("1 + 2="),
            Ok(vec![
                Token::Digit(1),
                Token::Operator(Operator::Add),
                Token::Digit(2),
                Token::Equals,
            ])
        );
        assert_eq!(
            parse_keys("x÷<c"),
            Ok(vec![
                Token::Operator(Operator::Multiply),
                Token::Operator(Operator::Divide),
                Token::DeleteLast,
                Token::ClearAll,
            ])
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(parse_keys("2^8"), Err(CalcError::UnknownKey('^')));
    }
}
