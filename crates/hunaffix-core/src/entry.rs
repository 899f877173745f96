// Dictionary entries and the inflections derived from them

use std::sync::Arc;

use crate::affix::AffixEntry;

// ---------------------------------------------------------------------------
// Morphological field tags
// ---------------------------------------------------------------------------

pub const MORPH_STEM: &str = "st:";
pub const MORPH_ALLOMORPH: &str = "al:";
pub const MORPH_PART_OF_SPEECH: &str = "po:";
pub const MORPH_DERIVATIONAL_SUFFIX: &str = "ds:";
pub const MORPH_INFLECTIONAL_SUFFIX: &str = "is:";
pub const MORPH_TERMINAL_SUFFIX: &str = "ts:";
pub const MORPH_SURFACE_PREFIX: &str = "sp:";
pub const MORPH_PART: &str = "pa:";
pub const MORPH_DERIVATIONAL_PREFIX: &str = "dp:";
pub const MORPH_INFLECTIONAL_PREFIX: &str = "ip:";
pub const MORPH_TERMINAL_PREFIX: &str = "tp:";
pub const MORPH_PHONETIC: &str = "ph:";

/// Tags that take part in inflection identity.
///
/// Stem, allomorph and phonetic annotations describe the entry rather
/// than the inflected form and are left out.
const SIGNIFICANT_TAGS: &[&str] = &[
    MORPH_PART_OF_SPEECH,
    MORPH_DERIVATIONAL_SUFFIX,
    MORPH_INFLECTIONAL_SUFFIX,
    MORPH_TERMINAL_SUFFIX,
    MORPH_SURFACE_PREFIX,
    MORPH_PART,
    MORPH_DERIVATIONAL_PREFIX,
    MORPH_INFLECTIONAL_PREFIX,
    MORPH_TERMINAL_PREFIX,
];

/// Fields replaced, rather than accumulated, by a later affix application.
const INFLECTIONAL_TAGS: &[&str] = &[
    MORPH_INFLECTIONAL_SUFFIX,
    MORPH_TERMINAL_SUFFIX,
    MORPH_INFLECTIONAL_PREFIX,
    MORPH_TERMINAL_PREFIX,
];

fn tag_of(field: &str) -> Option<&str> {
    field.get(..3).filter(|t| t.ends_with(':'))
}

/// The significant fields of a field list, sorted.
pub fn significant_fields(fields: &[String]) -> Vec<String> {
    let mut out: Vec<String> = fields
        .iter()
        .filter(|f| tag_of(f).is_some_and(|t| SIGNIFICANT_TAGS.contains(&t)))
        .cloned()
        .collect();
    out.sort();
    out
}

/// Combine the fields of a parent form with those of an applied affix.
///
/// Inflectional fields of the affix replace the parent's fields with the
/// same tag; everything else accumulates without duplicates.
pub fn combine_fields(parent: &[String], affix: &[String]) -> Vec<String> {
    let replaced: Vec<&str> = affix
        .iter()
        .filter_map(|f| tag_of(f))
        .filter(|t| INFLECTIONAL_TAGS.contains(t))
        .collect();
    let mut out: Vec<String> = parent
        .iter()
        .filter(|f| tag_of(f).is_none_or(|t| !replaced.contains(&t)))
        .cloned()
        .collect();
    for field in affix {
        if !out.contains(field) {
            out.push(field.clone());
        }
    }
    out
}

// ---------------------------------------------------------------------------
// DictionaryEntry
// ---------------------------------------------------------------------------

/// One dictionary line: a stem, its continuation flags and morphology.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DictionaryEntry {
    pub word: String,
    /// Flags in declaration order, without duplicates.
    pub continuation_flags: Vec<String>,
    pub morph_fields: Vec<String>,
}

impl DictionaryEntry {
    pub fn new(word: impl Into<String>, flags: Vec<String>, morph_fields: Vec<String>) -> Self {
        let mut continuation_flags: Vec<String> = Vec::with_capacity(flags.len());
        for flag in flags {
            if !continuation_flags.contains(&flag) {
                continuation_flags.push(flag);
            }
        }
        Self {
            word: word.into(),
            continuation_flags,
            morph_fields,
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        !flag.is_empty() && self.continuation_flags.iter().any(|f| f == flag)
    }
}

// ---------------------------------------------------------------------------
// Inflection
// ---------------------------------------------------------------------------

/// A word form produced by expansion, the stem itself included.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Inflection {
    pub word: String,
    pub continuation_flags: Vec<String>,
    pub morph_fields: Vec<String>,
    /// Applied affixes, oldest first.
    pub applied_rules: Vec<Arc<AffixEntry>>,
    /// Whether an affix of the other direction may still be attached.
    pub combinable: bool,
    /// True only for the unmodified stem.
    pub base: bool,
}

impl Inflection {
    /// The base inflection: the stem as it stands in the dictionary.
    pub fn base(entry: &DictionaryEntry) -> Self {
        Self {
            word: entry.word.clone(),
            continuation_flags: entry.continuation_flags.clone(),
            morph_fields: entry.morph_fields.clone(),
            applied_rules: Vec::new(),
            combinable: true,
            base: true,
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        !flag.is_empty() && self.continuation_flags.iter().any(|f| f == flag)
    }

    /// Identity used for deduplication: word, sorted flags and fields.
    pub fn identity(&self) -> (String, Vec<String>, Vec<String>) {
        let mut flags = self.continuation_flags.clone();
        flags.sort();
        (self.word.clone(), flags, self.morph_fields.clone())
    }

    /// Key used when comparing inflection sets: word and significant fields.
    pub fn signature(&self) -> (String, Vec<String>) {
        (self.word.clone(), significant_fields(&self.morph_fields))
    }

    /// Dictionary-line view of the inflection (`word/flags fields`).
    pub fn to_dictionary_entry(&self) -> DictionaryEntry {
        DictionaryEntry::new(
            self.word.clone(),
            self.continuation_flags.clone(),
            self.morph_fields.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn dictionary_entry_deduplicates_flags() {
        let e = DictionaryEntry::new("foo", fields(&["A", "B", "A"]), Vec::new());
        assert_eq!(e.continuation_flags, fields(&["A", "B"]));
        assert!(e.has_flag("B"));
        assert!(!e.has_flag(""));
    }

    #[test]
    fn base_inflection_mirrors_entry() {
        let e = DictionaryEntry::new("foo", fields(&["A"]), fields(&["po:noun"]));
        let base = Inflection::base(&e);
        assert!(base.base);
        assert!(base.applied_rules.is_empty());
        assert_eq!(base.to_dictionary_entry(), e);
    }

    #[test]
    fn significant_fields_drop_stem_and_sort() {
        let f = fields(&["st:foo", "po:noun", "is:plural", "ph:fu"]);
        assert_eq!(significant_fields(&f), fields(&["is:plural", "po:noun"]));
    }

    #[test]
    fn combine_replaces_inflectional_fields() {
        let parent = fields(&["po:noun", "is:sg"]);
        let affix = fields(&["is:pl", "ds:ness"]);
        assert_eq!(
            combine_fields(&parent, &affix),
            fields(&["po:noun", "is:pl", "ds:ness"])
        );
    }
}
