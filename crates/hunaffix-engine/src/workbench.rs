// Workbench: a rule table plus a dictionary, and the batch operations
// that run over both.
//
// The workbench owns everything the engines borrow and builds short-lived
// Expander/Reducer/Compounder views on each call, so no engine holds a
// reference back into it.

use std::sync::atomic::{AtomicBool, Ordering};

use hashbrown::HashSet;
use hunaffix_aff::{AffError, DictionaryReader, RuleProvider, RuleTable, parse_affix_text};
use hunaffix_core::{DictionaryEntry, Inflection};

use crate::compound::{CompoundStrategy, Compounder};
use crate::expansion::{ExpansionError, ExpansionOptions, Expander};
use crate::reducer::{ReductionOptions, Reducer};
use crate::{NoProgress, ProgressSink, ReductionError};

/// Correctness check applied to every word produced by batch expansion.
pub trait WordChecker: Send + Sync {
    /// `Err` carries the reason the word is rejected.
    fn check(&self, word: &str) -> Result<(), String>;
}

/// Checker that accepts every word.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl WordChecker for AcceptAll {
    fn check(&self, _word: &str) -> Result<(), String> {
        Ok(())
    }
}

/// A dictionary line that could not be read or expanded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line_number}: {message}")]
pub struct LineFailure {
    pub line_number: usize,
    pub message: String,
}

/// Outcome of expanding a whole dictionary.
#[derive(Debug, Default)]
pub struct BatchExpansion {
    /// Inflections per successful line, keyed by line number.
    pub inflections: Vec<(usize, Vec<Inflection>)>,
    pub failures: Vec<LineFailure>,
    /// The run stopped early on the cancellation flag.
    pub cancelled: bool,
}

/// A rule table and a dictionary.
pub struct Workbench {
    table: RuleTable,
    entries: Vec<DictionaryEntry>,
    line_numbers: Vec<usize>,
    /// Every dictionary word, for the compound `REP` check.
    words: HashSet<String>,

    // -- Options --
    expansion_options: ExpansionOptions,
    reduction_options: ReductionOptions,
    checker: Box<dyn WordChecker>,
}

impl Workbench {
    /// Create a workbench over already parsed data.
    ///
    /// `dictionary` pairs each entry with its line number in the source.
    pub fn new(table: RuleTable, dictionary: Vec<(usize, DictionaryEntry)>) -> Self {
        let (line_numbers, entries): (Vec<usize>, Vec<DictionaryEntry>) =
            dictionary.into_iter().unzip();
        let words = entries.iter().map(|e| e.word.clone()).collect();
        Self {
            table,
            entries,
            line_numbers,
            words,
            expansion_options: ExpansionOptions::default(),
            reduction_options: ReductionOptions::default(),
            checker: Box::new(AcceptAll),
        }
    }

    /// Read an affix text and a dictionary text.
    ///
    /// A malformed affix file is fatal. Malformed dictionary lines are
    /// returned as failures and left out of the workbench.
    pub fn from_texts(aff: &str, dic: &str) -> Result<(Self, Vec<LineFailure>), AffError> {
        let table = parse_affix_text(aff)?;
        let flag_type = table.options().flag_type;
        let mut dictionary = Vec::new();
        let mut failures = Vec::new();
        for result in DictionaryReader::new(dic, flag_type) {
            match result {
                Ok(line) => dictionary.push(line),
                Err(AffError::Syntax { line, message }) => {
                    log::warn!("dictionary line {line}: {message}");
                    failures.push(LineFailure {
                        line_number: line,
                        message,
                    });
                }
                Err(other) => return Err(other),
            }
        }
        Ok((Self::new(table, dictionary), failures))
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    // =========================================================================
    // Option setters
    // =========================================================================

    pub fn set_expansion_options(&mut self, options: ExpansionOptions) {
        self.expansion_options = options;
    }

    pub fn set_reduction_options(&mut self, options: ReductionOptions) {
        self.reduction_options = options;
    }

    /// Replace the checker consulted by [`Workbench::expand_all`].
    pub fn set_checker(&mut self, checker: Box<dyn WordChecker>) {
        self.checker = checker;
    }

    // =========================================================================
    // Engines
    // =========================================================================

    pub fn expander(&self) -> Expander<'_> {
        Expander::new(&self.table, &self.expansion_options)
    }

    pub fn reducer(&self) -> Reducer<'_> {
        Reducer::new(self.expander(), &self.reduction_options)
    }

    pub fn compounder(&self) -> Compounder<'_> {
        Compounder::new(self.expander()).with_membership(&self.words)
    }

    /// Expand every dictionary line.
    ///
    /// Lines that fail to expand, or that produce a word the checker
    /// rejects, are reported and skipped. `cancel` is polled between lines.
    pub fn expand_all(
        &self,
        cancel: Option<&AtomicBool>,
        progress: &mut dyn ProgressSink,
    ) -> BatchExpansion {
        let expander = self.expander();
        let total = self.entries.len().max(1);
        let mut batch = BatchExpansion::default();
        let mut reported = 0;
        progress.report(0);

        for (i, (entry, &line_number)) in self.entries.iter().zip(&self.line_numbers).enumerate() {
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                log::debug!("expansion cancelled at line {line_number}");
                batch.cancelled = true;
                return batch;
            }
            match self.expand_checked(&expander, entry) {
                Ok(inflections) => batch.inflections.push((line_number, inflections)),
                Err(message) => {
                    log::warn!("line {line_number}: {message}");
                    batch.failures.push(LineFailure {
                        line_number,
                        message,
                    });
                }
            }
            let percent = ((i + 1) * 100 / total) as u8;
            if percent >= reported + 10 {
                reported = percent;
                progress.report(percent);
            }
        }
        if reported < 100 {
            progress.report(100);
        }
        batch
    }

    fn expand_checked(
        &self,
        expander: &Expander<'_>,
        entry: &DictionaryEntry,
    ) -> Result<Vec<Inflection>, String> {
        let inflections = expander
            .expand(entry, false, None)
            .map_err(|e| e.to_string())?;
        for inflection in &inflections {
            self.checker
                .check(&inflection.word)
                .map_err(|reason| format!("{} rejected: {reason}", inflection.word))?;
        }
        Ok(inflections)
    }

    /// Build compounds from the whole dictionary.
    pub fn compounds(
        &self,
        strategy: CompoundStrategy<'_>,
        limit: usize,
        max_components: usize,
    ) -> Result<Vec<Inflection>, ExpansionError> {
        self.compounder()
            .compose(strategy, &self.entries, limit, max_components)
    }

    /// Reduce one flag to a verified rule block.
    pub fn reduce(
        &self,
        flag: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<String>, ReductionError> {
        self.reducer().reduce(flag, &self.entries, progress)
    }

    /// Reduce several flags, one thread per flag.
    ///
    /// Results come back in the order of `flags`; a failure affects only
    /// its own flag.
    pub fn reduce_flags(&self, flags: &[&str]) -> Vec<(String, Result<Vec<String>, ReductionError>)> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = flags
                .iter()
                .map(|&flag| scope.spawn(move || (flag.to_string(), self.reduce(flag, &mut NoProgress))))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    }

    /// Check produced rule lines for `flag` against the whole dictionary.
    pub fn verify(&self, flag: &str, produced: &[String]) -> Result<(), ReductionError> {
        crate::verify::verify(&self.expander(), flag, produced, &self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFF: &str = "SFX A Y 1\nSFX A 0 s .\nSFX B Y 1\nSFX B 0 ed .\n";

    fn workbench(dic: &str) -> Workbench {
        let (workbench, failures) = Workbench::from_texts(AFF, dic).unwrap();
        assert!(failures.is_empty());
        workbench
    }

    fn words(inflections: &[Inflection]) -> Vec<&str> {
        inflections.iter().map(|i| i.word.as_str()).collect()
    }

    struct NoQ;

    impl WordChecker for NoQ {
        fn check(&self, word: &str) -> Result<(), String> {
            if word.contains('q') {
                Err("contains q".to_string())
            } else {
                Ok(())
            }
        }
    }

    // --- loading ---

    #[test]
    fn bad_dictionary_lines_are_failures() {
        let aff = "FLAG long\nSFX Aa Y 1\nSFX Aa 0 s .\n";
        let (workbench, failures) = Workbench::from_texts(aff, "cat/Aa\ndog/abc\nhen\n").unwrap();
        assert_eq!(workbench.entries().len(), 2);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].line_number, 2);
    }

    #[test]
    fn bad_affix_text_is_fatal() {
        assert!(Workbench::from_texts("SET ISO8859-1\n", "cat\n").is_err());
    }

    // --- batch expansion ---

    #[test]
    fn expand_all_reports_and_continues() {
        let workbench = workbench("cat/A\ndog/Z\nhen\n");
        let batch = workbench.expand_all(None, &mut NoProgress);
        assert!(!batch.cancelled);
        assert_eq!(batch.inflections.len(), 2);
        assert_eq!(batch.inflections[0].0, 1);
        assert_eq!(words(&batch.inflections[0].1), vec!["cat", "cats"]);
        assert_eq!(batch.inflections[1].0, 3);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].line_number, 2);
    }

    #[test]
    fn checker_rejection_is_a_line_failure() {
        let mut workbench = workbench("cat/A\nqat/A\n");
        workbench.set_checker(Box::new(NoQ));
        let batch = workbench.expand_all(None, &mut NoProgress);
        assert_eq!(batch.inflections.len(), 1);
        assert_eq!(batch.failures[0].line_number, 2);
        assert!(batch.failures[0].message.contains("contains q"));
    }

    #[test]
    fn cancellation_stops_between_lines() {
        let workbench = workbench("cat/A\ndog/A\n");
        let cancel = AtomicBool::new(true);
        let batch = workbench.expand_all(Some(&cancel), &mut NoProgress);
        assert!(batch.cancelled);
        assert!(batch.inflections.is_empty());
    }

    #[test]
    fn expansion_progress() {
        let workbench = workbench("cat/A\ndog/A\nhen/A\n");
        let mut seen = Vec::new();
        let mut sink = |p: u8| seen.push(p);
        workbench.expand_all(None, &mut sink);
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
    }

    // --- reduction ---

    #[test]
    fn reduce_flags_keeps_order_and_isolates_failures() {
        let workbench = workbench("cat/AB\ndog/A\n");
        let results = workbench.reduce_flags(&["B", "Z", "A"]);
        let flags: Vec<&str> = results.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(flags, vec!["B", "Z", "A"]);
        assert_eq!(results[0].1.as_ref().unwrap(), &vec!["SFX B Y 1", "SFX B 0 ed ."]);
        assert!(matches!(results[1].1, Err(ReductionError::UnknownFlag(_))));
        assert_eq!(results[2].1.as_ref().unwrap(), &vec!["SFX A Y 1", "SFX A 0 s ."]);
    }

    #[test]
    fn verify_against_whole_dictionary() {
        let workbench = workbench("cat/A\ndog/A\n");
        let good = vec!["SFX A Y 1".to_string(), "SFX A 0 s .".to_string()];
        let bad = vec!["SFX A Y 1".to_string(), "SFX A 0 s t".to_string()];
        assert!(workbench.verify("A", &good).is_ok());
        assert!(matches!(
            workbench.verify("A", &bad),
            Err(ReductionError::ReductionCorrectness { .. })
        ));
    }
}
