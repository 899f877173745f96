// Rule reduction: from observed inflections back to a compact rule block
//
// For one flag the reducer
// 1. records every place the flag applies across the dictionary, and what
//    each application produced, as line entries
// 2. compacts them, splits additions, disjoins their conditions and merges
//    similar results
// 3. writes the rule block, reads it back and re-expands the dictionary to
//    check nothing changed

pub mod compaction;
pub mod disjoin;
pub mod format;
pub mod line_entry;
pub mod merge;

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use hunaffix_core::{AffixEntry, Condition, DictionaryEntry, RuleEntry};

use crate::expansion::Expander;
use crate::verify::verify;
use crate::{ProgressSink, ReductionError};
pub use line_entry::{Addition, LineEntry};

/// Default cap on condition-disjoining passes.
pub const DEFAULT_ITERATION_LIMIT: usize = 10_000;

/// Ordering used when sorting produced rule lines.
pub trait LanguageComparator: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Plain code point order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodepointComparator;

impl LanguageComparator for CodepointComparator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

/// Reduction settings.
#[derive(Clone)]
pub struct ReductionOptions {
    /// Widen each condition to the longest text its words share.
    pub keep_longest_common_affix: bool,
    /// Passes allowed before condition disjoining gives up.
    pub iteration_limit: usize,
    pub comparator: Arc<dyn LanguageComparator>,
}

impl Default for ReductionOptions {
    fn default() -> Self {
        Self {
            keep_longest_common_affix: false,
            iteration_limit: DEFAULT_ITERATION_LIMIT,
            comparator: Arc::new(CodepointComparator),
        }
    }
}

impl fmt::Debug for ReductionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReductionOptions")
            .field("keep_longest_common_affix", &self.keep_longest_common_affix)
            .field("iteration_limit", &self.iteration_limit)
            .finish_non_exhaustive()
    }
}

/// Everything the dictionary reveals about one flag.
#[derive(Debug, Clone, Default)]
pub struct Observations {
    /// One line entry per application of the flag.
    pub entries: Vec<LineEntry>,
    /// Every oriented word the flag could apply to.
    pub universe: BTreeSet<String>,
    /// Indices of the dictionary entries where the flag applies.
    pub lines: Vec<usize>,
}

/// Run the four reduction stages over a working set of line entries.
pub fn reduce_entries(
    entries: Vec<LineEntry>,
    universe: &BTreeSet<String>,
    iteration_limit: usize,
    progress: &mut dyn ProgressSink,
) -> Result<Vec<LineEntry>, ReductionError> {
    let entries = compaction::compact(entries);
    log::debug!("compacted to {} entries", entries.len());
    progress.report(30);

    let entries = compaction::disjoint_additions(entries);
    log::debug!("{} entries after splitting additions", entries.len());
    progress.report(40);

    let entries = disjoin::disjoin_conditions(entries, universe, iteration_limit)?;
    log::debug!("{} entries after disjoining conditions", entries.len());
    progress.report(70);

    let entries = merge::merge_similar(entries);
    log::debug!("{} entries after merging", entries.len());
    progress.report(80);
    Ok(entries)
}

/// Rule reducer bound to an expander.
#[derive(Clone, Copy)]
pub struct Reducer<'a> {
    expander: Expander<'a>,
    options: &'a ReductionOptions,
}

impl<'a> Reducer<'a> {
    pub fn new(expander: Expander<'a>, options: &'a ReductionOptions) -> Self {
        Self { expander, options }
    }

    fn rule(&self, flag: &str) -> Result<&'a RuleEntry, ReductionError> {
        self.expander
            .rules()
            .lookup(flag)
            .ok_or_else(|| ReductionError::UnknownFlag(flag.to_string()))
    }

    /// Collect the applications of `flag` across the dictionary.
    ///
    /// The places the flag may apply are found by expanding each line once
    /// more with a probe rule that applies everywhere and changes nothing.
    pub fn observe(
        &self,
        flag: &str,
        dictionary: &[DictionaryEntry],
    ) -> Result<Observations, ReductionError> {
        let rule = self.rule(flag)?;
        let affix_type = rule.affix_type;
        let mut probe = RuleEntry::new(flag, affix_type, rule.combinable);
        probe.entries.push(Arc::new(AffixEntry {
            affix_type,
            flag: flag.to_string(),
            strip: String::new(),
            add: String::new(),
            continuation_flags: Vec::new(),
            condition: Condition::any(),
            morph_fields: Vec::new(),
        }));

        let forbidden = self.expander.affix_options().forbidden_word_flag.as_deref();
        let applies = |e: &AffixEntry| e.flag == flag;
        let mut observations = Observations::default();
        for (index, entry) in dictionary.iter().enumerate() {
            if forbidden.is_some_and(|f| entry.has_flag(f)) {
                continue;
            }
            let mut relevant = false;
            for site in self.expander.folds(entry, false, Some(&probe))? {
                if site.applied_rules.last().is_some_and(|e| applies(e)) {
                    observations
                        .universe
                        .insert(line_entry::orient(&site.word, affix_type));
                    relevant = true;
                }
            }
            if !relevant {
                continue;
            }
            observations.lines.push(index);
            for inflection in self.expander.folds(entry, false, None)? {
                let Some(last) = inflection.applied_rules.last().filter(|e| applies(e)) else {
                    continue;
                };
                let Some(parent) = last.undo(&inflection.word) else {
                    continue;
                };
                observations
                    .entries
                    .extend(LineEntry::from_inflection(&inflection, &parent, affix_type));
            }
        }
        log::debug!(
            "flag {flag}: {} applications over {} words",
            observations.entries.len(),
            observations.universe.len()
        );
        Ok(observations)
    }

    /// Reduce `flag` to a rule block and check it against the dictionary.
    ///
    /// Returns the formatted lines, header first. Any failure discards the
    /// whole block.
    pub fn reduce(
        &self,
        flag: &str,
        dictionary: &[DictionaryEntry],
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<String>, ReductionError> {
        progress.report(0);
        let rule = self.rule(flag)?;
        let observations = self.observe(flag, dictionary)?;
        progress.report(20);

        let entries = reduce_entries(
            observations.entries,
            &observations.universe,
            self.options.iteration_limit,
            progress,
        )?;

        let mut affixes = format::to_affix_entries(
            &entries,
            flag,
            rule.affix_type,
            self.options.keep_longest_common_affix,
        );
        format::sort_entries(&mut affixes, self.options.comparator.as_ref());
        let reduced = format::build_rule(flag, rule.affix_type, rule.combinable, affixes);
        let lines = format::format_rule(&reduced, self.expander.affix_options().flag_type);
        progress.report(90);

        let involved: Vec<DictionaryEntry> = observations
            .lines
            .iter()
            .map(|&i| dictionary[i].clone())
            .collect();
        verify(&self.expander, flag, &lines, &involved)?;
        progress.report(100);
        log::debug!("flag {flag}: {} rule lines", lines.len() - 1);
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoProgress;
    use crate::expansion::ExpansionOptions;
    use hunaffix_aff::{DictionaryReader, FlagType, RuleTable, parse_affix_text};

    fn dictionary(text: &str) -> Vec<DictionaryEntry> {
        DictionaryReader::new(text, FlagType::Short)
            .map(|r| r.unwrap().1)
            .collect()
    }

    fn reduce(table: &RuleTable, flag: &str, dic: &str) -> Result<Vec<String>, ReductionError> {
        let expansion = ExpansionOptions::default();
        let options = ReductionOptions::default();
        let reducer = Reducer::new(Expander::new(table, &expansion), &options);
        reducer.reduce(flag, &dictionary(dic), &mut NoProgress)
    }

    // --- observation ---

    #[test]
    fn observe_collects_sites_and_applications() {
        let table = parse_affix_text("SFX A Y 2\nSFX A 0 s [^s]\nSFX A 0 es s\n").unwrap();
        let expansion = ExpansionOptions::default();
        let options = ReductionOptions::default();
        let reducer = Reducer::new(Expander::new(&table, &expansion), &options);
        let obs = reducer
            .observe("A", &dictionary("cat/A\nbus/A\ndog\n"))
            .unwrap();
        assert_eq!(obs.lines, vec![0, 1]);
        assert_eq!(obs.universe.len(), 2);
        assert_eq!(obs.entries.len(), 2);
    }

    // --- reduction ---

    #[test]
    fn redundant_entries_collapse() {
        let aff = "\
SFX A Y 3
SFX A 0 s t
SFX A 0 s g
SFX A 0 s n
";
        let table = parse_affix_text(aff).unwrap();
        let lines = reduce(&table, "A", "cat/A\ndog/A\nhen/A\n").unwrap();
        assert_eq!(lines, vec!["SFX A Y 1", "SFX A 0 s ."]);
    }

    #[test]
    fn conditions_are_learned_from_words() {
        let aff = "\
SFX A Y 2
SFX A y ies [^aeiou]y
SFX A 0 s [aeiou]y
";
        let table = parse_affix_text(aff).unwrap();
        let lines = reduce(&table, "A", "happy/A\nday/A\nboy/A\n").unwrap();
        assert_eq!(lines, vec!["SFX A Y 2", "SFX A y ies py", "SFX A 0 s [^p]y"]);
    }

    #[test]
    fn chained_suffix_keeps_continuation() {
        let aff = "SFX A Y 1\nSFX A 0 s1/B .\nSFX B Y 1\nSFX B 0 s2 .\n";
        let table = parse_affix_text(aff).unwrap();
        let lines = reduce(&table, "A", "aa/A\n").unwrap();
        assert_eq!(lines, vec!["SFX A Y 1", "SFX A 0 s1/B ."]);
    }

    #[test]
    fn chained_suffixes_over_two_lines() {
        let aff = "SFX A Y 1\nSFX A 0 s1/S .\nSFX S Y 1\nSFX S 0 s2 .\n";
        let table = parse_affix_text(aff).unwrap();
        let dic = "aa/A\nbb/A\n";
        assert_eq!(reduce(&table, "A", dic).unwrap(), vec!["SFX A Y 1", "SFX A 0 s1/S ."]);
        assert_eq!(reduce(&table, "S", dic).unwrap(), vec!["SFX S Y 1", "SFX S 0 s2 ."]);
    }

    #[test]
    fn prefixes_are_reduced_in_natural_order() {
        let aff = "PFX P Y 2\nPFX P 0 un d\nPFX P 0 re t\n";
        let table = parse_affix_text(aff).unwrap();
        let lines = reduce(&table, "P", "do/P\ntie/P\n").unwrap();
        assert_eq!(lines, vec!["PFX P Y 2", "PFX P 0 un d", "PFX P 0 re t"]);
    }

    #[test]
    fn unused_flag_gives_empty_block() {
        let table = parse_affix_text("SFX A Y 1\nSFX A 0 s .\n").unwrap();
        let lines = reduce(&table, "A", "cat\n").unwrap();
        assert_eq!(lines, vec!["SFX A Y 0"]);
    }

    #[test]
    fn unknown_flag() {
        let table = parse_affix_text("SFX A Y 1\nSFX A 0 s .\n").unwrap();
        assert!(matches!(
            reduce(&table, "Z", "cat/A\n"),
            Err(ReductionError::UnknownFlag(_))
        ));
    }

    #[test]
    fn progress_reaches_one_hundred() {
        let table = parse_affix_text("SFX A Y 1\nSFX A 0 s .\n").unwrap();
        let expansion = ExpansionOptions::default();
        let options = ReductionOptions::default();
        let reducer = Reducer::new(Expander::new(&table, &expansion), &options);
        let mut seen = Vec::new();
        let mut sink = |p: u8| seen.push(p);
        reducer
            .reduce("A", &dictionary("cat/A\n"), &mut sink)
            .unwrap();
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }
}
