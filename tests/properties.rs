//! Properties that hold for any sequence of button presses.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use regex::Regex;

use zcalc::calculator::{
    Evaluator, ExpressionBuffer, FastevalEvaluator, Formatter, LocaleFormatter, MAX_DIGIT_RUN,
    Operator, Token, rewrite_percent,
};
use zcalc::history::MemoryBackend;
use zcalc::{CalculatorSession, HistoryStore};

fn token_strategy() -> impl Strategy<Value = Token> {
    prop_oneof![
        4 => (0u8..10).prop_map(Token::Digit),
        1 => Just(Token::Point),
        1 => Just(Token::Operator(Operator::Add)),
        1 => Just(Token::Operator(Operator::Subtract)),
        1 => Just(Token::Operator(Operator::Multiply)),
        1 => Just(Token::Operator(Operator::Divide)),
        1 => Just(Token::OpenParen),
        1 => Just(Token::CloseParen),
        1 => Just(Token::Percent),
        1 => Just(Token::DeleteLast),
    ]
}

#[derive(Clone, Default)]
struct Recording {
    seen: Rc<RefCell<Vec<String>>>,
}

impl Evaluator for Recording {
    fn evaluate(&self, expression: &str) -> Result<f64, String> {
        self.seen.borrow_mut().push(expression.to_string());
        FastevalEvaluator.evaluate(expression)
    }
}

proptest! {
    #[test]
    fn test_digit_runs_stay_within_limit(tokens in prop::collection::vec(token_strategy(), 0..120)) {
        let number = Regex::new(r"\d+(\.\d+)?").unwrap();
        let mut buffer = ExpressionBuffer::default();
        for token in tokens {
            let _ = buffer.apply(token);
            for run in number.find_iter(buffer.as_str()) {
                let digits = run.as_str().chars().filter(char::is_ascii_digit).count();
                prop_assert!(digits <= MAX_DIGIT_RUN, "{} in {}", run.as_str(), buffer.as_str());
            }
        }
    }

    #[test]
    fn test_evaluated_expressions_are_balanced(
        tokens in prop::collection::vec(token_strategy(), 0..40),
    ) {
        let evaluator = Recording::default();
        let mut session = CalculatorSession::new(
            Box::new(evaluator.clone()),
            Box::new(LocaleFormatter::default()),
            HistoryStore::load(Box::new(MemoryBackend::new())),
            MAX_DIGIT_RUN,
        );
        for token in tokens {
            let _ = session.apply(token);
        }
        let _ = session.calculate();

        for expression in evaluator.seen.borrow().iter() {
            let opens = expression.matches('(').count();
            let closes = expression.matches(')').count();
            prop_assert_eq!(opens, closes, "{}", expression);
        }
    }

    #[test]
    fn test_percent_rewrite_is_a_fixed_point(
        tokens in prop::collection::vec(token_strategy(), 0..40),
    ) {
        let mut buffer = ExpressionBuffer::default();
        for token in tokens {
            let _ = buffer.apply(token);
        }
        let once = rewrite_percent(buffer.as_str());
        prop_assert_eq!(rewrite_percent(&once), once.clone());
    }

    #[test]
    fn test_rendering_leaves_input_untouched(
        tokens in prop::collection::vec(token_strategy(), 0..40),
    ) {
        let formatter = LocaleFormatter::default();
        let mut buffer = ExpressionBuffer::default();
        for token in tokens {
            let _ = buffer.apply(token);
        }
        let before = buffer.as_str().to_string();
        let shown = formatter.to_display_symbols(&formatter.format_number_in_expression(buffer.as_str()));
        prop_assert_eq!(buffer.as_str(), before.as_str());
        prop_assert_eq!(formatter.strip_grouping(&shown).chars().count(), before.chars().count());
    }
}
