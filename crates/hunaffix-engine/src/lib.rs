//! Hunspell affix engines: expansion, compounding and rule reduction.
//!
//! - [`Expander`] turns a dictionary entry into every inflection its flags
//!   allow (onefold, twofold and cross-product folds, then the circumfix,
//!   need-affix and only-in-compound filters).
//! - [`Compounder`] builds compounds by compound rule, by compound flag or
//!   by begin/middle/end positions and expands them again.
//! - [`Reducer`] infers a compact, disjoint rule block for one flag from
//!   the inflections it produces across a dictionary, and re-checks that
//!   the block regenerates exactly the same forms.
//! - [`Workbench`] owns a rule table and a dictionary and runs the batch
//!   operations: whole-dictionary expansion and reduction of many flags.

pub mod compound;
pub mod expansion;
pub mod reducer;
pub mod verify;
pub mod workbench;

pub use compound::{CompoundStrategy, Compounder, WordMembership};
pub use expansion::{ExpansionError, ExpansionOptions, Expander};
pub use reducer::{
    CodepointComparator, LanguageComparator, LineEntry, ReductionOptions, Reducer,
};
pub use verify::verify;
pub use workbench::{AcceptAll, BatchExpansion, LineFailure, WordChecker, Workbench};

use hunaffix_aff::AffError;

/// Error type for rule reduction.
///
/// Any of these aborts the reduction of the current flag; no partial rule
/// block is produced.
#[derive(Debug, thiserror::Error)]
pub enum ReductionError {
    /// The flag has no rule in the table.
    #[error("no rule is declared for flag {0:?}")]
    UnknownFlag(String),

    /// A word cannot be told apart from words that must not take the rule.
    #[error("cannot separate {word:?} from colliding words under condition {condition}")]
    IrreducibleCondition { word: String, condition: String },

    /// The reduced block does not regenerate the original inflections.
    #[error("reduced rule changes the expansion of {line:?}: missing {missing:?}, unexpected {unexpected:?}")]
    ReductionCorrectness {
        line: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// Condition disjoining did not settle.
    #[error("condition disjoining did not settle within {limit} iterations")]
    IterationLimit { limit: usize },

    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    /// The produced rule lines could not be read back.
    #[error("unreadable rule lines: {0}")]
    Rule(#[from] AffError),
}

/// Receiver of coarse progress updates, in percent.
pub trait ProgressSink {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressSink for F {
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// Progress sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: u8) {}
}
