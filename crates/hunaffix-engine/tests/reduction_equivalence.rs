//! Reduction round trips: a reduced rule block, put back into the table,
//! must expand every dictionary line to exactly the same forms.

use std::collections::BTreeSet;

use hunaffix_aff::{DictionaryReader, RuleProvider, RuleTable, parse_affix_text, parse_rule_lines};
use hunaffix_engine::{NoProgress, Workbench};

fn dictionary(table: &RuleTable, dic: &str) -> Vec<(usize, hunaffix_core::DictionaryEntry)> {
    DictionaryReader::new(dic, table.options().flag_type)
        .collect::<Result<_, _>>()
        .unwrap()
}

fn forms(workbench: &Workbench) -> Vec<BTreeSet<(String, Vec<String>)>> {
    let batch = workbench.expand_all(None, &mut NoProgress);
    assert!(batch.failures.is_empty(), "{:?}", batch.failures);
    batch
        .inflections
        .into_iter()
        .map(|(_, inflections)| inflections.iter().map(|i| i.signature()).collect())
        .collect()
}

/// Reduce every flag in `flags`, substitute the reduced rules and compare
/// the expansions before and after.
fn assert_round_trip(aff: &str, dic: &str, flags: &[&str]) -> Vec<Vec<String>> {
    let table = parse_affix_text(aff).unwrap();
    let before = Workbench::new(table.clone(), dictionary(&table, dic));

    let mut reduced_table = table.clone();
    let mut blocks = Vec::new();
    for (flag, result) in before.reduce_flags(flags) {
        let lines = result.unwrap_or_else(|e| panic!("flag {flag}: {e}"));
        reduced_table.insert(parse_rule_lines(&lines, table.options()).unwrap());
        blocks.push(lines);
    }
    let after = Workbench::new(reduced_table, dictionary(&table, dic));
    assert_eq!(forms(&before), forms(&after));
    blocks
}

#[test]
fn english_plurals() {
    let aff = "\
SFX A Y 3
SFX A y ies [^aeiou]y
SFX A 0 s [aeiou]y
SFX A 0 s [^y]
";
    let dic = "happy/A\nday/A\nboy/A\ncat/A\ndog/A\ncity/A\n";
    let blocks = assert_round_trip(aff, dic, &["A"]);
    assert!(blocks[0][0].starts_with("SFX A Y "));
}

#[test]
fn prefixes_with_conditions() {
    let aff = "PFX P Y 2\nPFX P 0 un [^r]\nPFX P 0 re r\n";
    let dic = "do/P\ntie/P\nread/P\nrun/P\n";
    assert_round_trip(aff, dic, &["P"]);
}

#[test]
fn morphological_fields_survive() {
    let aff = "SFX M Y 2\nSFX M 0 s . is:plural\nSFX M 0 's . is:possessive\n";
    let dic = "cat/M po:noun\ndog/M po:noun\n";
    let blocks = assert_round_trip(aff, dic, &["M"]);
    assert!(blocks[0].iter().any(|l| l.ends_with("is:plural")));
    assert!(blocks[0].iter().any(|l| l.ends_with("is:possessive")));
}

#[test]
fn chained_and_cross_product_flags() {
    let aff = "\
PFX P Y 1
PFX P 0 re .
SFX A Y 2
SFX A 0 s/B [^s]
SFX A 0 es s
SFX B Y 1
SFX B 0 x .
";
    let dic = "do/PA\nbus/A\nkiss/PA\nhen\n";
    assert_round_trip(aff, dic, &["P", "A", "B"]);
}

#[test]
fn overlong_rules_shrink() {
    let aff = "\
SFX D Y 4
SFX D 0 ed k
SFX D 0 ed lk
SFX D 0 ed alk
SFX D 0 ed n
";
    let dic = "walk/D\ntalk/D\nlearn/D\n";
    let blocks = assert_round_trip(aff, dic, &["D"]);
    assert!(blocks[0].len() < 5);
}
