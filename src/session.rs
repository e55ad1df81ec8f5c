//! A calculator session: the typed expression, the last result, the
//! expression that produced it, and the history.
//!
//! Every public method is one atomic state transition. Display accessors
//! are derived on each call and never touch the stored raw expression.

use tracing::{debug, info};

use crate::calculator::{
    Admission, CalcError, EvaluationResult, Evaluator, ExpressionBuffer, Formatter, Token,
    calculate, parse_keys, result_as_input,
};
use crate::config::Config;
use crate::history::{HistoryBackend, HistoryEntry, HistoryError, HistoryStore};

pub struct CalculatorSession {
    buffer: ExpressionBuffer,
    /// Grouped form of the expression behind the current result.
    previous_expression: String,
    result: EvaluationResult,
    history: HistoryStore,
    evaluator: Box<dyn Evaluator>,
    formatter: Box<dyn Formatter>,
}

impl CalculatorSession {
    pub fn new(
        evaluator: Box<dyn Evaluator>,
        formatter: Box<dyn Formatter>,
        history: HistoryStore,
        max_digits: usize,
    ) -> Self {
        Self {
            buffer: ExpressionBuffer::new(max_digits),
            previous_expression: String::new(),
            result: EvaluationResult::zero(),
            history,
            evaluator,
            formatter,
        }
    }

    /// Build a session from config, loading history from `backend`.
    pub fn from_config(config: &Config, backend: Box<dyn HistoryBackend>) -> Self {
        Self::new(
            config.evaluator.build(),
            Box::new(config.formatter()),
            HistoryStore::load(backend),
            config.max_digits,
        )
    }

    /// The raw expression as typed.
    pub fn raw_expression(&self) -> &str {
        self.buffer.as_str()
    }

    /// The typed expression with grouped digits and operator glyphs.
    pub fn display_expression(&self) -> String {
        let grouped = self.formatter.format_number_in_expression(self.buffer.as_str());
        self.formatter.to_display_symbols(&grouped)
    }

    /// The expression behind the current result, ready for display.
    pub fn previous_expression(&self) -> String {
        self.formatter.to_display_symbols(&self.previous_expression)
    }

    /// The closing parentheses `=` would add, shown after the input.
    pub fn paren_hint(&self) -> String {
        ")".repeat(self.buffer.pending_closers())
    }

    pub fn result(&self) -> &EvaluationResult {
        &self.result
    }

    /// The current result, or the error sentinel.
    pub fn result_display(&self) -> String {
        self.formatter.format_evaluation(&self.result)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    /// Handle one button press.
    ///
    /// A `%` without a valid base sets the result to the error sentinel and
    /// leaves the input unchanged.
    pub fn apply(&mut self, token: Token) -> Result<Admission, CalcError> {
        match token {
            Token::Equals => self.calculate().map(|()| Admission::Accepted),
            Token::ClearAll => {
                self.clear_all();
                Ok(Admission::Accepted)
            }
            Token::DeleteLast => Ok(self.delete_last()),
            token => self.buffer.apply(token).inspect_err(|_| {
                self.result = EvaluationResult::Error;
            }),
        }
    }

    /// Handle a line of textual keys, e.g. `"2+3="`.
    ///
    /// Unknown keys reject the whole line before anything is applied.
    /// Otherwise every key is applied and the last failure, if any, is
    /// returned.
    pub fn apply_keys(&mut self, input: &str) -> Result<(), CalcError> {
        let tokens = parse_keys(input)?;

        let mut last_error = None;
        for token in tokens {
            if let Err(e) = self.apply(token) {
                last_error = Some(e);
            }
        }
        last_error.map_or(Ok(()), Err)
    }

    /// Evaluate the typed expression (the `=` button).
    ///
    /// On success the result becomes the new typing base and is added to
    /// history. An evaluator failure clears the input; an empty or dangling
    /// expression leaves it for correction.
    pub fn calculate(&mut self) -> Result<(), CalcError> {
        let calculation = calculate(
            self.buffer.as_str(),
            &self.result,
            self.evaluator.as_ref(),
            self.formatter.as_ref(),
        );
        self.previous_expression = calculation.previous_expression;

        match calculation.outcome {
            Ok(evaluated) => {
                self.buffer
                    .set(result_as_input(&evaluated.display, self.formatter.as_ref()));
                self.history.append(HistoryEntry::new(
                    self.previous_expression.clone(),
                    evaluated.display.clone(),
                ));
                self.result = EvaluationResult::Value(evaluated);
                Ok(())
            }
            Err(e) => {
                if e.clears_input() {
                    self.buffer.clear();
                }
                self.result = EvaluationResult::Error;
                Err(e)
            }
        }
    }

    /// Remove the last typed character.
    pub fn delete_last(&mut self) -> Admission {
        self.buffer.delete_last()
    }

    /// Reset input, previous expression and result (the AC button).
    pub fn clear_all(&mut self) {
        self.buffer.clear();
        self.previous_expression.clear();
        self.result = EvaluationResult::zero();
        debug!("session cleared");
    }

    /// Continue typing from a stored expression.
    pub fn reuse_expression(&mut self, index: usize) -> Result<(), HistoryError> {
        let entry = self.history.get(index)?;
        let raw = self.formatter.strip_grouping(&entry.expression);
        self.buffer.set(raw);
        self.previous_expression.clear();
        Ok(())
    }

    /// Continue typing from a stored result.
    pub fn reuse_result(&mut self, index: usize) -> Result<(), HistoryError> {
        let entry = self.history.get(index)?;
        let raw = result_as_input(&entry.result, self.formatter.as_ref());
        self.buffer.set(raw);
        self.previous_expression.clear();
        Ok(())
    }

    pub fn delete_history(&mut self, index: usize) -> Result<HistoryEntry, HistoryError> {
        let removed = self.history.delete(index)?;
        info!(index, expression = %removed.expression, "history entry deleted");
        Ok(removed)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("history cleared");
    }
}
