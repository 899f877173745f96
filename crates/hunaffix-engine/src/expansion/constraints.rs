// Post-expansion filters: circumfix, need-affix and only-in-compound

use hunaffix_aff::AffixOptions;
use hunaffix_core::{AffixType, Inflection};

use super::carries;

/// Drop inflections that break a constraint, keeping the order of the rest.
pub(super) fn enforce(inflections: &mut Vec<Inflection>, options: &AffixOptions, is_compound: bool) {
    inflections.retain(|inflection| {
        !breaks_circumfix(inflection, options)
            && !carries(inflection, &options.need_affix_flag)
            && (is_compound || !carries(inflection, &options.only_in_compound_flag))
    });
}

/// A circumfix-marked affix needs exactly one marked partner on the other
/// side of the word.
fn breaks_circumfix(inflection: &Inflection, options: &AffixOptions) -> bool {
    let Some(circumfix) = options.circumfix_flag.as_deref() else {
        return false;
    };
    let marked = |affix_type: AffixType| {
        inflection
            .applied_rules
            .iter()
            .filter(|e| e.affix_type == affix_type && e.has_continuation_flag(circumfix))
            .count()
    };
    let prefixes = marked(AffixType::Prefix);
    let suffixes = marked(AffixType::Suffix);
    if prefixes == 0 && suffixes == 0 {
        return false;
    }
    prefixes != 1 || suffixes != 1
}

#[cfg(test)]
mod tests {
    use crate::expansion::{ExpansionOptions, Expander};
    use hunaffix_aff::{FlagType, parse_affix_text, parse_dictionary_line};

    fn expand_words(aff: &str, line: &str, is_compound: bool) -> Vec<String> {
        let table = parse_affix_text(aff).unwrap();
        let options = ExpansionOptions::default();
        let entry = parse_dictionary_line(1, line, FlagType::Short).unwrap();
        Expander::new(&table, &options)
            .expand(&entry, is_compound, None)
            .unwrap()
            .into_iter()
            .map(|i| i.word)
            .collect()
    }

    #[test]
    fn circumfix_needs_both_halves() {
        let aff = "\
CIRCUMFIX X
PFX A Y 1
PFX A 0 ge/X .
SFX B Y 2
SFX B 0 t/X .
SFX B 0 en .
";
        assert_eq!(
            expand_words(aff, "mach/AB", false),
            vec!["mach", "machen", "gemacht"]
        );
    }

    #[test]
    fn need_affix_hides_bare_stem() {
        let aff = "NEEDAFFIX %\nSFX A Y 1\nSFX A 0 s .\n";
        assert_eq!(expand_words(aff, "foo/A%", false), vec!["foos"]);
    }

    #[test]
    fn need_affix_on_entry_hides_intermediate_form() {
        let aff = "NEEDAFFIX %\nSFX A Y 1\nSFX A 0 s/%B .\nSFX B Y 1\nSFX B 0 t .\n";
        assert_eq!(expand_words(aff, "foo/A", false), vec!["foo", "foost"]);
    }

    #[test]
    fn only_in_compound_is_dropped_outside_compounds() {
        let aff = "ONLYINCOMPOUND c\nSFX A Y 1\nSFX A 0 s/c .\n";
        assert_eq!(expand_words(aff, "foo/A", false), vec!["foo"]);
        assert_eq!(expand_words(aff, "foo/A", true), vec!["foo", "foos"]);
    }
}
