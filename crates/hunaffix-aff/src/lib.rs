//! Rule-table provider for the hunaffix engines.
//!
//! # Architecture
//!
//! - [`flags`] -- flag encodings (short, long, numeric, UTF-8) and compound-rule tokens
//! - [`options`] -- global affix-file settings
//! - [`table`] -- flag-to-rule lookup behind the [`RuleProvider`] trait
//! - [`parser`] -- affix-file and rule-block reader
//! - [`dic`] -- dictionary-line reader

pub mod dic;
pub mod flags;
pub mod options;
pub mod parser;
pub mod table;

pub use dic::{DictionaryReader, parse_dictionary_line};
pub use flags::{FlagType, Quantifier};
pub use options::AffixOptions;
pub use parser::{AffixParser, parse_affix_text, parse_rule_lines};
pub use table::{RuleProvider, RuleTable};

use hunaffix_core::ConditionError;

/// Error type for affix and dictionary reading.
#[derive(Debug, thiserror::Error)]
pub enum AffError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("unsupported character set {0:?}: only UTF-8 is accepted")]
    UnsupportedCharset(String),
    #[error("invalid flag {flag:?}: {reason}")]
    InvalidFlag { flag: String, reason: String },
    #[error("invalid condition: {0}")]
    Condition(#[from] ConditionError),
    #[error("configuration error: {0}")]
    Configuration(String),
}
