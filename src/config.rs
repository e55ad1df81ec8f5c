use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::calculator::{ELLIPSIS_WIDTH, EvaluatorKind, LocaleFormatter, MAX_DIGIT_RUN};
use crate::history::JsonFileBackend;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum digits in a single number being typed.
    #[serde(default = "default_max_digits")]
    pub max_digits: usize,
    /// History lines longer than this are shortened.
    #[serde(default = "default_ellipsis_width")]
    pub ellipsis_width: usize,
    /// Fraction digits kept in fixed-notation results.
    #[serde(default = "default_max_fraction_digits")]
    pub max_fraction_digits: usize,
    #[serde(default = "default_grouping_separator")]
    pub grouping_separator: char,
    #[serde(default = "default_multiply_glyph")]
    pub multiply_glyph: char,
    #[serde(default = "default_divide_glyph")]
    pub divide_glyph: char,
    /// Shown instead of a result when evaluation fails.
    #[serde(default = "default_error_text")]
    pub error_text: String,
    #[serde(default)]
    pub evaluator: EvaluatorKind,
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
}

fn default_max_digits() -> usize {
    MAX_DIGIT_RUN
}
fn default_ellipsis_width() -> usize {
    ELLIPSIS_WIDTH
}
fn default_max_fraction_digits() -> usize {
    3
}
fn default_grouping_separator() -> char {
    ','
}
fn default_multiply_glyph() -> char {
    '×'
}
fn default_divide_glyph() -> char {
    '÷'
}
fn default_error_text() -> String {
    "Error".to_string()
}
fn default_history_file() -> PathBuf {
    JsonFileBackend::default_path()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_digits: default_max_digits(),
            ellipsis_width: default_ellipsis_width(),
            max_fraction_digits: default_max_fraction_digits(),
            grouping_separator: default_grouping_separator(),
            multiply_glyph: default_multiply_glyph(),
            divide_glyph: default_divide_glyph(),
            error_text: default_error_text(),
            evaluator: EvaluatorKind::default(),
            history_file: default_history_file(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("validating {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Reject settings that would corrupt raw expressions.
    ///
    /// The grouping separator is stripped from results before they are
    /// typed back in, so it must not be a character an expression can hold.
    pub fn validate(&self) -> Result<()> {
        let sep = self.grouping_separator;
        if sep.is_alphanumeric() || sep.is_whitespace() || "+-*/().%".contains(sep) {
            bail!("grouping_separator {sep:?} clashes with expression characters");
        }
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zcalc")
            .join("config.toml")
    }

    /// The display formatter described by this config.
    pub fn formatter(&self) -> LocaleFormatter {
        LocaleFormatter {
            grouping_separator: self.grouping_separator,
            multiply_glyph: self.multiply_glyph,
            divide_glyph: self.divide_glyph,
            max_fraction_digits: self.max_fraction_digits,
            error_text: self.error_text.clone(),
        }
    }
}
