//! A calculator input engine.
//!
//! Button presses build a raw arithmetic expression under a fixed set of
//! admission rules; `=` balances and rewrites it, hands it to an evaluator
//! and records the outcome in a persisted history.

pub mod calculator;
pub mod config;
pub mod history;
pub mod items;
pub mod session;
pub mod ui;

pub use calculator::{CalcError, EvaluationResult, Token};
pub use config::Config;
pub use history::{HistoryEntry, HistoryStore};
pub use session::CalculatorSession;
