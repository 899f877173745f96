// Line entries: generalized rule candidates used during reduction
//
// All strings are kept in suffix orientation: prefix material is reversed
// on the way in and reversed back when the rule lines are written.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use hunaffix_core::{AffixType, Condition, Inflection};

/// One addition of a line entry: the added text plus the continuation
/// flags and morphological fields of the entry that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Addition {
    /// Added text, oriented; empty for `0`.
    pub text: String,
    pub continuation_flags: Vec<String>,
    pub morph_fields: Vec<String>,
}

impl Addition {
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            continuation_flags: Vec::new(),
            morph_fields: Vec::new(),
        }
    }
}

/// Candidate rule: strip `removal`, add each addition, where `condition`
/// holds.
///
/// `from` lists the words that justify the rule. Equality and hashing look
/// at removal, additions and condition only.
#[derive(Debug, Clone)]
pub struct LineEntry {
    /// Stripped text, oriented; empty stands for the `0` sentinel.
    pub removal: String,
    pub additions: BTreeSet<Addition>,
    /// Matched against the end of oriented words.
    pub condition: Condition,
    pub from: BTreeSet<String>,
}

impl PartialEq for LineEntry {
    fn eq(&self, other: &Self) -> bool {
        self.removal == other.removal
            && self.additions == other.additions
            && self.condition == other.condition
    }
}

impl Eq for LineEntry {}

impl Hash for LineEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.removal.hash(state);
        self.additions.hash(state);
        self.condition.hash(state);
    }
}

/// Reverse a string when working on prefixes.
pub(crate) fn orient(text: &str, affix_type: AffixType) -> String {
    match affix_type {
        AffixType::Suffix => text.to_string(),
        AffixType::Prefix => text.chars().rev().collect(),
    }
}

/// Number of leading characters two strings share.
pub(crate) fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

fn tail_from(text: &str, chars: usize) -> String {
    text.chars().skip(chars).collect()
}

impl LineEntry {
    pub fn new(removal: impl Into<String>, addition: Addition, condition: Condition) -> Self {
        Self {
            removal: removal.into(),
            additions: BTreeSet::from([addition]),
            condition,
            from: BTreeSet::new(),
        }
    }

    /// Line entry explaining how `original` became `inflection`.
    ///
    /// Both words are oriented first; the shared leading part is dropped,
    /// what remains of the original is the removal and what remains of the
    /// inflection is the addition. The condition is the removal itself.
    /// Returns `None` when the inflection has no applied rule.
    pub fn from_inflection(
        inflection: &Inflection,
        original: &str,
        affix_type: AffixType,
    ) -> Option<Self> {
        let applied = inflection.applied_rules.last()?;
        let source = orient(original, affix_type);
        let derived = orient(&inflection.word, affix_type);
        let shared = common_prefix_len(&source, &derived);
        let removal = tail_from(&source, shared);
        let addition = Addition {
            text: tail_from(&derived, shared),
            continuation_flags: applied.continuation_flags.clone(),
            morph_fields: applied.morph_fields.clone(),
        };
        let condition = Condition::literal(&removal);
        let mut entry = LineEntry::new(removal, addition, condition);
        entry.from.insert(source);
        Some(entry)
    }

    /// Whether the condition accepts an oriented word.
    pub fn accepts(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        self.condition.matches_end(&chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hunaffix_aff::{FlagType, parse_affix_text, parse_dictionary_line};

    use crate::expansion::{ExpansionOptions, Expander};

    fn expand(aff: &str, line: &str) -> Vec<Inflection> {
        let table = parse_affix_text(aff).unwrap();
        let options = ExpansionOptions::default();
        let entry = parse_dictionary_line(1, line, FlagType::Short).unwrap();
        Expander::new(&table, &options)
            .expand(&entry, false, None)
            .unwrap()
    }

    #[test]
    fn suffix_with_strip() {
        let result = expand("SFX A Y 1\nSFX A y ies [^aeiou]y\n", "happy/A");
        let entry = LineEntry::from_inflection(&result[1], "happy", AffixType::Suffix).unwrap();
        assert_eq!(entry.removal, "y");
        assert_eq!(entry.additions.first().unwrap().text, "ies");
        assert_eq!(entry.condition.to_string(), "y");
        assert!(entry.from.contains("happy"));
    }

    #[test]
    fn prefix_is_reversed() {
        let result = expand("PFX P Y 1\nPFX P 0 un/X . dp:un\n", "do/P");
        let entry = LineEntry::from_inflection(&result[1], "do", AffixType::Prefix).unwrap();
        assert_eq!(entry.removal, "");
        assert!(entry.condition.is_empty());
        let addition = entry.additions.first().unwrap();
        assert_eq!(addition.text, "nu");
        assert_eq!(addition.continuation_flags, vec!["X".to_string()]);
        assert_eq!(addition.morph_fields, vec!["dp:un".to_string()]);
        assert!(entry.from.contains("od"));
    }

    #[test]
    fn base_inflection_has_no_line_entry() {
        let result = expand("SFX A Y 1\nSFX A 0 s .\n", "cat/A");
        assert!(LineEntry::from_inflection(&result[0], "cat", AffixType::Suffix).is_none());
    }

    #[test]
    fn equality_ignores_provenance() {
        let mut a = LineEntry::new("", Addition::bare("s"), Condition::any());
        let b = a.clone();
        a.from.insert("cat".to_string());
        assert_eq!(a, b);
        assert!(a.accepts("dog"));
    }
}
