// Compound generation
//
// Every strategy reduces to the same loop: describe the compound as a
// list of slots, each holding candidate components, then walk the slot
// tuples in lexicographic order. Tuples that survive the boundary checks
// become dictionary entries which are expanded again as compounds.

mod assembly;
mod tuples;

use hashbrown::HashSet;
use hunaffix_core::entry::MORPH_PART;
use hunaffix_core::{AffixType, DictionaryEntry, Inflection};

use crate::expansion::{ExpansionError, Expander};
use assembly::Assembler;
use tuples::{SlotTuples, flag_sequences};

/// Longest compound tried when neither `COMPOUNDWORDMAX` nor the caller
/// sets a bound.
pub const DEFAULT_MAX_COMPONENTS: usize = 3;

/// Membership test against the word list, used by the `REP` check.
pub trait WordMembership: Sync {
    fn contains(&self, word: &str) -> bool;
}

impl WordMembership for HashSet<String> {
    fn contains(&self, word: &str) -> bool {
        HashSet::contains(self, word)
    }
}

/// How components are chosen for each position of a compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundStrategy<'r> {
    /// No compounding.
    None,
    /// Positions follow a `COMPOUNDRULE` pattern.
    ByRule(&'r str),
    /// Any word carrying `COMPOUNDFLAG` fits any position.
    ByFlag,
    /// `COMPOUNDBEGIN`, `COMPOUNDMIDDLE` and `COMPOUNDEND` fix the positions.
    ByBeginMiddleEnd,
}

/// Candidate components plus the slot lists that index into them.
struct Plan {
    pool: Vec<Inflection>,
    slots: Vec<Vec<Vec<usize>>>,
}

/// Compound generator on top of an [`Expander`].
#[derive(Clone, Copy)]
pub struct Compounder<'a> {
    expander: Expander<'a>,
    membership: Option<&'a dyn WordMembership>,
}

impl<'a> Compounder<'a> {
    pub fn new(expander: Expander<'a>) -> Self {
        Self {
            expander,
            membership: None,
        }
    }

    /// Word list consulted when `CHECKCOMPOUNDREP` is on.
    pub fn with_membership(mut self, membership: &'a dyn WordMembership) -> Self {
        self.membership = Some(membership);
        self
    }

    pub fn by_compound_rule(
        &self,
        inputs: &[DictionaryEntry],
        rule: &str,
        limit: usize,
    ) -> Result<Vec<Inflection>, ExpansionError> {
        self.compose(CompoundStrategy::ByRule(rule), inputs, limit, DEFAULT_MAX_COMPONENTS)
    }

    pub fn by_compound_flag(
        &self,
        inputs: &[DictionaryEntry],
        limit: usize,
        max_components: usize,
    ) -> Result<Vec<Inflection>, ExpansionError> {
        self.compose(CompoundStrategy::ByFlag, inputs, limit, max_components)
    }

    pub fn by_begin_middle_end(
        &self,
        inputs: &[DictionaryEntry],
        limit: usize,
        max_components: usize,
    ) -> Result<Vec<Inflection>, ExpansionError> {
        self.compose(CompoundStrategy::ByBeginMiddleEnd, inputs, limit, max_components)
    }

    /// Generate compounds with the given strategy.
    ///
    /// At most `limit` compound words are assembled; each is then expanded
    /// with its outer affixes. The result holds no two inflections with the
    /// same word, flags and fields, in first-seen order.
    pub fn compose(
        &self,
        strategy: CompoundStrategy<'_>,
        inputs: &[DictionaryEntry],
        limit: usize,
        max_components: usize,
    ) -> Result<Vec<Inflection>, ExpansionError> {
        let plan = self.plan(strategy, inputs, max_components)?;
        let assembler = Assembler::new(self.expander.affix_options(), self.membership);

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut assembled = 0;
        'slots: for slots in &plan.slots {
            for tuple in SlotTuples::new(slots) {
                if assembled >= limit {
                    break 'slots;
                }
                let parts: Vec<&Inflection> = tuple.iter().map(|&i| &plan.pool[i]).collect();
                let Some(word) = assembler.join(&parts) else {
                    continue;
                };
                assembled += 1;
                let entry = self.compound_entry(word, &parts);
                for inflection in self.expander.expand(&entry, true, None)? {
                    if seen.insert(inflection.identity()) {
                        out.push(inflection);
                    }
                }
            }
        }
        log::debug!(
            "{strategy:?}: {assembled} compounds from {} candidates, {} inflections",
            plan.pool.len(),
            out.len()
        );
        Ok(out)
    }

    fn plan(
        &self,
        strategy: CompoundStrategy<'_>,
        inputs: &[DictionaryEntry],
        max_components: usize,
    ) -> Result<Plan, ExpansionError> {
        let options = self.expander.affix_options();
        let max_components = match options.compound_word_max {
            Some(max) => max.min(max_components.max(2)),
            None => max_components,
        };

        match strategy {
            CompoundStrategy::None => Ok(Plan {
                pool: Vec::new(),
                slots: Vec::new(),
            }),
            CompoundStrategy::ByRule(rule) => {
                let tokens = options
                    .flag_type
                    .split_compound_rule(rule)
                    .map_err(|e| ExpansionError::Configuration(e.to_string()))?;
                let pool: Vec<Inflection> = inputs.iter().map(Inflection::base).collect();
                let slots = flag_sequences(&tokens, max_components)
                    .into_iter()
                    .map(|sequence| {
                        sequence
                            .iter()
                            .map(|flag| candidates(&pool, |c| c.has_flag(flag)))
                            .collect()
                    })
                    .collect();
                Ok(Plan { pool, slots })
            }
            CompoundStrategy::ByFlag => {
                let Some(flag) = options.compound_flag.as_deref() else {
                    return Err(ExpansionError::Configuration(
                        "compounding by flag needs COMPOUNDFLAG".to_string(),
                    ));
                };
                let pool = self.component_pool(inputs, |i| i.has_flag(flag))?;
                let all: Vec<usize> = (0..pool.len()).collect();
                let slots = (2..=max_components).map(|n| vec![all.clone(); n]).collect();
                Ok(Plan { pool, slots })
            }
            CompoundStrategy::ByBeginMiddleEnd => {
                let any = options.compound_flag.clone();
                let begin = options.compound_begin_flag.clone();
                let middle = options.compound_middle_flag.clone();
                let end = options.compound_end_flag.clone();
                if any.is_none() && (begin.is_none() || end.is_none()) {
                    return Err(ExpansionError::Configuration(
                        "compounding by position needs COMPOUNDBEGIN and COMPOUNDEND".to_string(),
                    ));
                }
                let fits = |i: &Inflection, position: &Option<String>| {
                    [position, &any]
                        .into_iter()
                        .any(|f| f.as_deref().is_some_and(|f| i.has_flag(f)))
                };
                let pool =
                    self.component_pool(inputs, |i| fits(i, &begin) || fits(i, &middle) || fits(i, &end))?;
                let begins = candidates(&pool, |i| fits(i, &begin));
                let middles = candidates(&pool, |i| fits(i, &middle));
                let ends = candidates(&pool, |i| fits(i, &end));
                let slots = (2..=max_components)
                    .map(|n| {
                        let mut slots = Vec::with_capacity(n);
                        slots.push(begins.clone());
                        slots.extend(std::iter::repeat_n(middles.clone(), n - 2));
                        slots.push(ends.clone());
                        slots
                    })
                    .collect();
                Ok(Plan { pool, slots })
            }
        }
    }

    /// Every compound-position inflection of every input.
    fn component_pool(
        &self,
        inputs: &[DictionaryEntry],
        keep: impl Fn(&Inflection) -> bool,
    ) -> Result<Vec<Inflection>, ExpansionError> {
        let mut pool = Vec::new();
        for entry in inputs {
            pool.extend(
                self.expander
                    .expand(entry, true, None)?
                    .into_iter()
                    .filter(|i| keep(i)),
            );
        }
        Ok(pool)
    }

    /// Dictionary entry for an assembled compound.
    ///
    /// The compound takes the prefix flags of its first component and the
    /// suffix flags of its last one.
    fn compound_entry(&self, word: String, parts: &[&Inflection]) -> DictionaryEntry {
        let outer_flags = |part: Option<&&Inflection>, affix_type: AffixType| -> Vec<String> {
            part.map(|p| {
                p.continuation_flags
                    .iter()
                    .filter(|f| {
                        self.expander
                            .rules()
                            .lookup(f)
                            .is_some_and(|r| r.affix_type == affix_type)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
        };
        let mut flags = outer_flags(parts.first(), AffixType::Prefix);
        flags.extend(outer_flags(parts.last(), AffixType::Suffix));
        let fields = parts
            .iter()
            .map(|p| format!("{MORPH_PART}{}", p.word))
            .collect();
        DictionaryEntry::new(word, flags, fields)
    }
}

fn candidates(pool: &[Inflection], keep: impl Fn(&Inflection) -> bool) -> Vec<usize> {
    pool.iter()
        .enumerate()
        .filter(|(_, i)| keep(i))
        .map(|(index, _)| index)
        .collect()
}
