// Affix expansion: stem -> every inflection allowed by its flags
//
// Expansion runs in three folds over the primary direction (suffixes, or
// prefixes with COMPLEXPREFIXES):
//
// 1. onefold  -- primary affixes named by the stem
// 2. twofold  -- primary affixes named by the onefold results
// 3. lastfold -- secondary affixes on the stem and every combinable result
//
// After the folds no inflection may still name an affix it could not
// consume; circumfix, need-affix and only-in-compound constraints then
// drop individual inflections.

mod builder;
mod constraints;

use hashbrown::HashSet;
use hunaffix_aff::options::is_flag;
use hunaffix_aff::{AffixOptions, RuleProvider};
use hunaffix_core::{AffixType, DictionaryEntry, Inflection, RuleEntry};

/// Error type for expansion failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpansionError {
    /// The rule table contradicts its own settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A flag resolves to no rule and is neither managed nor whitelisted.
    #[error("unknown flag {flag:?} on {word:?}")]
    UnknownFlag { flag: String, word: String },

    /// An inflection still names an affix after both folds of its direction.
    #[error("twofold rule violated: {word:?} still carries affix flag {flag:?}")]
    TwofoldViolation { flag: String, word: String },
}

/// Expansion settings that are not part of the affix file.
#[derive(Debug, Clone, Default)]
pub struct ExpansionOptions {
    /// Flags allowed on words although no rule or setting defines them.
    pub non_productive_flags: HashSet<String>,
}

impl ExpansionOptions {
    pub fn with_non_productive<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            non_productive_flags: flags.into_iter().map(Into::into).collect(),
        }
    }
}

/// The affix expansion engine.
///
/// Stateless apart from its borrowed inputs; one expander may serve any
/// number of threads.
#[derive(Clone, Copy)]
pub struct Expander<'a> {
    rules: &'a dyn RuleProvider,
    options: &'a ExpansionOptions,
}

impl<'a> Expander<'a> {
    pub fn new(rules: &'a dyn RuleProvider, options: &'a ExpansionOptions) -> Self {
        Self { rules, options }
    }

    pub fn affix_options(&self) -> &'a AffixOptions {
        self.rules.options()
    }

    pub fn rules(&self) -> &'a dyn RuleProvider {
        self.rules
    }

    /// Resolve a flag, giving the overriding rule precedence for its flag.
    pub(crate) fn resolve<'r>(
        &self,
        flag: &str,
        overridden: Option<&'r RuleEntry>,
    ) -> Option<&'r RuleEntry>
    where
        'a: 'r,
    {
        match overridden {
            Some(rule) if rule.flag == flag => Some(rule),
            _ => self.rules.lookup(flag),
        }
    }

    /// Whether a flag without a rule is acceptable on a word.
    fn is_marker(&self, flag: &str) -> bool {
        self.affix_options().is_managed_flag(flag)
            || self.options.non_productive_flags.contains(flag)
    }

    /// Expand a dictionary entry into all its inflections.
    ///
    /// The first element is the stem itself unless a constraint removes it.
    /// With `overridden`, that rule replaces the table's rule for its flag.
    pub fn expand(
        &self,
        entry: &DictionaryEntry,
        is_compound: bool,
        overridden: Option<&RuleEntry>,
    ) -> Result<Vec<Inflection>, ExpansionError> {
        let options = self.affix_options();
        if options
            .forbidden_word_flag
            .as_deref()
            .is_some_and(|f| entry.has_flag(f))
        {
            return Ok(Vec::new());
        }
        let mut inflections = self.folds(entry, is_compound, overridden)?;
        constraints::enforce(&mut inflections, options, is_compound);
        Ok(inflections)
    }

    /// Every fold of the expansion, before any constraint filter runs.
    ///
    /// Forms dropped by the filters are still here; the reducer needs them
    /// because they feed later folds.
    pub(crate) fn folds(
        &self,
        entry: &DictionaryEntry,
        is_compound: bool,
        overridden: Option<&RuleEntry>,
    ) -> Result<Vec<Inflection>, ExpansionError> {
        let options = self.affix_options();
        let primary = options.primary_direction();
        let secondary = primary.opposite();
        let base = Inflection::base(entry);

        let onefold = self.apply_direction(&base, primary, is_compound, overridden)?;

        let mut twofold = Vec::new();
        for parent in &onefold {
            twofold.extend(self.apply_direction(parent, primary, is_compound, overridden)?);
        }
        self.check_consumed(&twofold, primary, overridden)?;

        let mut inflections = Vec::with_capacity(1 + onefold.len() + twofold.len());
        inflections.push(base);
        inflections.extend(onefold);
        inflections.extend(twofold);

        let mut lastfold = Vec::new();
        for parent in inflections.iter().filter(|i| i.base || i.combinable) {
            lastfold.extend(self.apply_direction(parent, secondary, is_compound, overridden)?);
        }
        self.check_consumed(&lastfold, secondary, overridden)?;
        inflections.extend(lastfold);
        Ok(inflections)
    }

    /// Apply every rule of `direction` named by the parent's flags.
    fn apply_direction(
        &self,
        parent: &Inflection,
        direction: AffixType,
        is_compound: bool,
        overridden: Option<&RuleEntry>,
    ) -> Result<Vec<Inflection>, ExpansionError> {
        let options = self.affix_options();
        let mut out = Vec::new();
        for flag in &parent.continuation_flags {
            let Some(rule) = self.resolve(flag, overridden) else {
                if self.is_marker(flag) {
                    continue;
                }
                return Err(ExpansionError::UnknownFlag {
                    flag: flag.clone(),
                    word: parent.word.clone(),
                });
            };
            if rule.affix_type != direction {
                continue;
            }
            // cross products need both sides to agree
            if direction != options.primary_direction() && !parent.base && !rule.combinable {
                continue;
            }
            for entry in rule.applicable(&parent.word) {
                if is_compound
                    && options
                        .compound_forbid_flag
                        .as_deref()
                        .is_some_and(|f| entry.has_continuation_flag(f))
                {
                    continue;
                }
                out.push(self.build_inflection(parent, rule, entry, overridden)?);
            }
        }
        Ok(out)
    }

    /// Fail when an inflection names a rule of a direction already used up.
    fn check_consumed(
        &self,
        inflections: &[Inflection],
        direction: AffixType,
        overridden: Option<&RuleEntry>,
    ) -> Result<(), ExpansionError> {
        for inflection in inflections {
            for flag in &inflection.continuation_flags {
                if self
                    .resolve(flag, overridden)
                    .is_some_and(|r| r.affix_type == direction)
                {
                    return Err(ExpansionError::TwofoldViolation {
                        flag: flag.clone(),
                        word: inflection.word.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Whether the setting names a flag carried by the inflection.
pub(crate) fn carries(inflection: &Inflection, setting: &Option<String>) -> bool {
    setting.as_deref().is_some_and(|f| inflection.has_flag(f))
}

/// Whether a flag is one of the per-application constraint markers.
pub(crate) fn is_constraint_flag(options: &AffixOptions, flag: &str) -> bool {
    is_flag(&options.need_affix_flag, flag) || is_flag(&options.circumfix_flag, flag)
}
