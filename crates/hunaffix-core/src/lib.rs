//! Shared types for Hunspell affix rule expansion and reduction.
//!
//! - [`affix`] -- affix entries, rules and the entry matcher
//! - [`condition`] -- anchored character-class conditions
//! - [`entry`] -- dictionary entries, inflections and morphological fields
//! - [`case`] -- case classification used at compound boundaries

pub mod affix;
pub mod case;
pub mod condition;
pub mod entry;

pub use affix::{AffixEntry, AffixType, RuleEntry};
pub use condition::{CharClass, Condition};
pub use entry::{DictionaryEntry, Inflection};

/// Error raised by a malformed condition pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("unterminated character class in condition {0:?}")]
    UnterminatedClass(String),
    #[error("empty character class in condition {0:?}")]
    EmptyClass(String),
    #[error("unexpected ']' in condition {0:?}")]
    UnexpectedBracket(String),
}

/// Error raised while applying an affix entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AffixError {
    #[error("rule {flag} strips the whole word {word:?} but full stripping is not enabled")]
    FullStrip { flag: String, word: String },
    #[error("rule {flag} cannot strip {strip:?} from {word:?}")]
    StripMismatch {
        flag: String,
        strip: String,
        word: String,
    },
}
