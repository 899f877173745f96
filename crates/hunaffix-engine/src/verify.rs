// Correctness re-check of a reduced rule block

use std::collections::BTreeSet;

use hunaffix_aff::{AffError, parse_rule_lines};
use hunaffix_core::{DictionaryEntry, Inflection};

use crate::ReductionError;
use crate::expansion::Expander;

/// Render a dictionary entry the way it is written in a `.dic` file.
fn dictionary_line(entry: &DictionaryEntry, expander: &Expander<'_>) -> String {
    let mut line = entry.word.clone();
    if !entry.continuation_flags.is_empty() {
        line.push('/');
        line.push_str(
            &expander
                .affix_options()
                .flag_type
                .join(&entry.continuation_flags),
        );
    }
    for field in &entry.morph_fields {
        line.push(' ');
        line.push_str(field);
    }
    line
}

fn signatures(inflections: Vec<Inflection>) -> BTreeSet<(String, Vec<String>)> {
    inflections.iter().map(|i| i.signature()).collect()
}

fn describe(set: BTreeSet<&(String, Vec<String>)>) -> Vec<String> {
    set.into_iter()
        .map(|(word, fields)| {
            if fields.is_empty() {
                word.clone()
            } else {
                format!("{word} {}", fields.join(" "))
            }
        })
        .collect()
}

/// Check that `produced` regenerates the dictionary exactly.
///
/// The lines are read back into a rule for `flag`; every entry of
/// `original` is expanded with the table's rule and with the read-back
/// rule, and the two inflection sets (word plus significant fields) must
/// be equal. The first entry that differs is reported.
pub fn verify(
    expander: &Expander<'_>,
    flag: &str,
    produced: &[String],
    original: &[DictionaryEntry],
) -> Result<(), ReductionError> {
    let rule = parse_rule_lines(produced, expander.affix_options())?;
    if rule.flag != flag {
        return Err(AffError::Configuration(format!(
            "rule lines describe flag {} instead of {flag}",
            rule.flag
        ))
        .into());
    }

    for entry in original {
        let before = signatures(expander.expand(entry, false, None)?);
        let after = signatures(expander.expand(entry, false, Some(&rule))?);
        if before != after {
            return Err(ReductionError::ReductionCorrectness {
                line: dictionary_line(entry, expander),
                missing: describe(before.difference(&after).collect()),
                unexpected: describe(after.difference(&before).collect()),
            });
        }
    }
    Ok(())
}
