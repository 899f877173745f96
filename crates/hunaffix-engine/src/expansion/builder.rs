// Inflection builder: one affix entry applied to one parent form

use std::sync::Arc;

use hunaffix_core::entry::combine_fields;
use hunaffix_core::{AffixEntry, Inflection, RuleEntry};

use super::{ExpansionError, Expander, is_constraint_flag};

impl Expander<'_> {
    /// Derive a new inflection from `parent` by applying `entry` of `rule`.
    ///
    /// The new form carries the entry's continuation flags plus every flag
    /// of the parent except those naming rules of the direction just
    /// consumed and the per-application constraint markers. Markers such as
    /// the compound flags or only-in-compound therefore reach the affixed
    /// forms of a stem.
    pub(crate) fn build_inflection(
        &self,
        parent: &Inflection,
        rule: &RuleEntry,
        entry: &Arc<AffixEntry>,
        overridden: Option<&RuleEntry>,
    ) -> Result<Inflection, ExpansionError> {
        let options = self.affix_options();
        let word = entry
            .apply(&parent.word, options.full_strip)
            .map_err(|e| ExpansionError::Configuration(e.to_string()))?;

        let direction = rule.affix_type;
        let mut continuation_flags = entry.continuation_flags.clone();
        for flag in &parent.continuation_flags {
            if continuation_flags.contains(flag) {
                continue;
            }
            let consumed = self
                .resolve(flag, overridden)
                .is_some_and(|r| r.affix_type == direction);
            if !consumed && !is_constraint_flag(options, flag) {
                continuation_flags.push(flag.clone());
            }
        }

        let mut applied_rules = Vec::with_capacity(parent.applied_rules.len() + 1);
        applied_rules.extend(parent.applied_rules.iter().cloned());
        applied_rules.push(Arc::clone(entry));

        Ok(Inflection {
            word,
            continuation_flags,
            morph_fields: combine_fields(&parent.morph_fields, &entry.morph_fields),
            applied_rules,
            combinable: parent.combinable && rule.combinable,
            base: false,
        })
    }
}
