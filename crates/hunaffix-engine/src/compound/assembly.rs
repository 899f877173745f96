// Compound assembly: joining components under the boundary checks

use hunaffix_aff::AffixOptions;
use hunaffix_core::{AffixType, Inflection};
use hunaffix_core::case::{boundary_case_clash, normalize_boundary};

use super::WordMembership;

/// Joins component tuples into compound words.
pub(crate) struct Assembler<'a> {
    options: &'a AffixOptions,
    membership: Option<&'a dyn WordMembership>,
}

impl<'a> Assembler<'a> {
    pub(crate) fn new(options: &'a AffixOptions, membership: Option<&'a dyn WordMembership>) -> Self {
        Self {
            options,
            membership,
        }
    }

    /// The compound spelled by `components`, or `None` when a check rejects it.
    pub(crate) fn join(&self, components: &[&Inflection]) -> Option<String> {
        let options = self.options;
        let last = components.len().saturating_sub(1);
        for (position, component) in components.iter().enumerate() {
            if component.word.chars().count() < options.compound_min {
                return None;
            }
            if (position > 0 && !self.permits(component, AffixType::Prefix))
                || (position < last && !self.permits(component, AffixType::Suffix))
            {
                return None;
            }
            if options
                .forbidden_word_flag
                .as_deref()
                .is_some_and(|f| component.has_flag(f))
            {
                return None;
            }
        }

        let (first, rest) = components.split_first()?;
        let mut word = first.word.clone();
        let mut previous = first.word.as_str();
        for component in rest {
            if options.check_compound_dup && previous == component.word {
                return None;
            }
            let mut next = normalize_boundary(&word, &component.word);
            if options.check_compound_case && boundary_case_clash(&word, &next) {
                return None;
            }
            if options.check_compound_triple && forms_triple(&word, &next) {
                if !options.simplified_triple {
                    return None;
                }
                next.remove(0);
            }
            word.push_str(&next);
            previous = component.word.as_str();
        }

        if options.check_compound_rep && self.resembles_known_word(&word) {
            return None;
        }
        Some(word)
    }

    /// Whether the component's affixes of `affix_type` may face another
    /// component. Prefixes belong at the start of the compound and suffixes
    /// at its end; elsewhere each one needs `COMPOUNDPERMITFLAG`.
    fn permits(&self, component: &Inflection, affix_type: AffixType) -> bool {
        let permit = self.options.compound_permit_flag.as_deref();
        component
            .applied_rules
            .iter()
            .filter(|e| e.affix_type == affix_type)
            .all(|e| permit.is_some_and(|f| e.has_continuation_flag(f)))
    }

    /// Whether a `REP` substitution turns the compound into a known word.
    fn resembles_known_word(&self, word: &str) -> bool {
        let Some(membership) = self.membership else {
            return false;
        };
        self.options.replacements.iter().any(|(from, to)| {
            word.match_indices(from.as_str()).any(|(at, _)| {
                let candidate = format!("{}{to}{}", &word[..at], &word[at + from.len()..]);
                membership.contains(&candidate)
            })
        })
    }
}

/// Whether three identical letters meet across the boundary.
fn forms_triple(left: &str, right: &str) -> bool {
    let mut tail = left.chars().rev();
    let mut head = right.chars();
    let (Some(l1), Some(r1)) = (tail.next(), head.next()) else {
        return false;
    };
    if l1 != r1 {
        return false;
    }
    tail.next() == Some(l1) || head.next() == Some(l1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;
    use hunaffix_core::{AffixEntry, Condition, DictionaryEntry};
    use std::sync::Arc;

    fn component(word: &str) -> Inflection {
        Inflection::base(&DictionaryEntry::new(word, Vec::new(), Vec::new()))
    }

    fn join(options: &AffixOptions, words: &[&str]) -> Option<String> {
        let parts: Vec<Inflection> = words.iter().map(|w| component(w)).collect();
        let refs: Vec<&Inflection> = parts.iter().collect();
        Assembler::new(options, None).join(&refs)
    }

    #[test]
    fn plain_concatenation() {
        let options = AffixOptions::default();
        assert_eq!(join(&options, &["foot", "ball"]), Some("football".to_string()));
    }

    #[test]
    fn short_component_is_rejected() {
        let options = AffixOptions::default();
        assert_eq!(join(&options, &["ab", "ball"]), None);
    }

    #[test]
    fn triple_letters() {
        let mut options = AffixOptions {
            compound_min: 1,
            check_compound_triple: true,
            ..AffixOptions::default()
        };
        assert_eq!(join(&options, &["schiff", "fahrt"]), None);
        assert_eq!(join(&options, &["bett", "tuch"]), None);
        assert_eq!(join(&options, &["bet", "tuch"]), Some("bettuch".to_string()));
        options.simplified_triple = true;
        assert_eq!(join(&options, &["schiff", "fahrt"]), Some("schiffahrt".to_string()));
    }

    #[test]
    fn duplicate_components() {
        let options = AffixOptions {
            check_compound_dup: true,
            ..AffixOptions::default()
        };
        assert_eq!(join(&options, &["foo", "foo"]), None);
        assert_eq!(join(&options, &["foo", "bar", "foo"]), Some("foobarfoo".to_string()));
    }

    #[test]
    fn case_is_normalized_at_boundary() {
        let options = AffixOptions::default();
        assert_eq!(join(&options, &["Haus", "Tür"]), Some("Haustür".to_string()));
        assert_eq!(join(&options, &["ABC", "def"]), Some("ABCDEF".to_string()));
    }

    #[test]
    fn case_clash_is_rejected_when_checked() {
        let options = AffixOptions {
            check_compound_case: true,
            ..AffixOptions::default()
        };
        assert_eq!(join(&options, &["fooB", "bar"]), None);
        assert_eq!(join(&options, &["foo", "bar"]), Some("foobar".to_string()));
    }

    fn suffixed(word: &str, add: &str, continuation_flags: &[&str]) -> Inflection {
        let entry = AffixEntry {
            affix_type: AffixType::Suffix,
            flag: "A".to_string(),
            strip: String::new(),
            add: add.to_string(),
            continuation_flags: continuation_flags.iter().map(|f| f.to_string()).collect(),
            condition: Condition::any(),
            morph_fields: Vec::new(),
        };
        let mut inflection = component(word);
        inflection.word.push_str(add);
        inflection.applied_rules.push(Arc::new(entry));
        inflection.base = false;
        inflection
    }

    #[test]
    fn inner_suffix_needs_permit_flag() {
        let mut options = AffixOptions::default();
        let bar = component("bar");
        let plain = suffixed("foo", "s", &[]);
        let permitted = suffixed("foo", "s", &["p"]);

        assert_eq!(Assembler::new(&options, None).join(&[&bar, &plain]), Some("barfoos".to_string()));
        assert_eq!(Assembler::new(&options, None).join(&[&plain, &bar]), None);
        assert_eq!(Assembler::new(&options, None).join(&[&permitted, &bar]), None);

        options.compound_permit_flag = Some("p".to_string());
        assert_eq!(Assembler::new(&options, None).join(&[&plain, &bar]), None);
        assert_eq!(
            Assembler::new(&options, None).join(&[&permitted, &bar]),
            Some("foosbar".to_string())
        );
    }

    #[test]
    fn rep_lookalike_is_rejected() {
        let options = AffixOptions {
            check_compound_rep: true,
            replacements: vec![("ph".to_string(), "f".to_string())],
            ..AffixOptions::default()
        };
        let known: HashSet<String> = ["alfabet".to_string()].into_iter().collect();
        let parts = [component("alph"), component("abet")];
        let refs: Vec<&Inflection> = parts.iter().collect();
        assert_eq!(Assembler::new(&options, Some(&known as &dyn WordMembership)).join(&refs), None);
        assert_eq!(
            Assembler::new(&options, None).join(&refs),
            Some("alphabet".to_string())
        );
    }
}
