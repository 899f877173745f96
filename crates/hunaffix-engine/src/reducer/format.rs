// Rule formatting: line entries back to affix-file lines

use std::cmp::Ordering;
use std::sync::Arc;

use hunaffix_aff::FlagType;
use hunaffix_core::{AffixEntry, AffixType, Condition, RuleEntry};

use super::LanguageComparator;
use super::line_entry::{LineEntry, orient};

/// Longest text every word of the set ends with.
fn common_suffix<'a>(words: impl IntoIterator<Item = &'a String>) -> String {
    let mut words = words.into_iter();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut suffix: Vec<char> = first.chars().collect();
    for word in words {
        let shared = suffix
            .iter()
            .rev()
            .zip(word.chars().rev())
            .take_while(|(a, b)| **a == *b)
            .count();
        suffix.drain(..suffix.len() - shared);
    }
    suffix.into_iter().collect()
}

/// Turn reduced line entries into affix entries of `flag`, one per
/// addition, in natural orientation.
///
/// With `keep_longest_common_affix`, a condition is replaced by the
/// longest text all its words end with whenever that text is longer; it
/// accepts a subset of what the old condition accepted and still every
/// word of the entry.
pub fn to_affix_entries(
    entries: &[LineEntry],
    flag: &str,
    affix_type: AffixType,
    keep_longest_common_affix: bool,
) -> Vec<AffixEntry> {
    let mut out = Vec::new();
    for entry in entries {
        let mut condition = entry.condition.clone();
        if keep_longest_common_affix {
            let widest = common_suffix(&entry.from);
            if widest.chars().count() > condition.len() {
                condition = Condition::literal(&widest);
            }
        }
        let condition = match affix_type {
            AffixType::Suffix => condition,
            AffixType::Prefix => condition.reversed(),
        };
        for addition in &entry.additions {
            out.push(AffixEntry {
                affix_type,
                flag: flag.to_string(),
                strip: orient(&entry.removal, affix_type),
                add: orient(&addition.text, affix_type),
                continuation_flags: addition.continuation_flags.clone(),
                condition: condition.clone(),
                morph_fields: addition.morph_fields.clone(),
            });
        }
    }
    out
}

/// Deterministic output order: condition length, bracket groups, strip
/// length, then collated condition, strip and addition.
pub fn sort_entries(entries: &mut [AffixEntry], comparator: &dyn LanguageComparator) {
    entries.sort_by(|a, b| {
        a.condition
            .len()
            .cmp(&b.condition.len())
            .then_with(|| a.condition.bracket_groups().cmp(&b.condition.bracket_groups()))
            .then_with(|| a.strip.chars().count().cmp(&b.strip.chars().count()))
            .then_with(|| comparator.compare(&a.condition.to_string(), &b.condition.to_string()))
            .then_with(|| comparator.compare(&a.strip, &b.strip))
            .then_with(|| comparator.compare(&a.add, &b.add))
            .then_with(|| compare_tails(a, b))
    });
}

fn compare_tails(a: &AffixEntry, b: &AffixEntry) -> Ordering {
    a.continuation_flags
        .cmp(&b.continuation_flags)
        .then_with(|| a.morph_fields.cmp(&b.morph_fields))
}

/// One rule line: `TYPE FLAG STRIP ADD[/FLAGS] CONDITION [MORPH...]`.
pub fn format_line(entry: &AffixEntry, flag_type: FlagType) -> String {
    let strip = if entry.strip.is_empty() { "0" } else { entry.strip.as_str() };
    let mut line = format!(
        "{} {} {} {} {}",
        entry.affix_type,
        entry.flag,
        strip,
        entry.addition_token(flag_type.separator()),
        entry.condition
    );
    for field in &entry.morph_fields {
        line.push(' ');
        line.push_str(field);
    }
    line
}

/// The whole rule block, header first.
pub fn format_rule(rule: &RuleEntry, flag_type: FlagType) -> Vec<String> {
    let mut lines = Vec::with_capacity(rule.entries.len() + 1);
    lines.push(rule.header());
    lines.extend(rule.entries.iter().map(|e| format_line(e, flag_type)));
    lines
}

/// Assemble the rule from sorted entries.
pub(crate) fn build_rule(
    flag: &str,
    affix_type: AffixType,
    combinable: bool,
    entries: Vec<AffixEntry>,
) -> RuleEntry {
    let mut rule = RuleEntry::new(flag, affix_type, combinable);
    rule.entries = entries.into_iter().map(Arc::new).collect();
    rule
}
