// Stage 4: merging rules that differ only in their first class

use std::collections::BTreeSet;

use hashbrown::HashMap;
use hunaffix_core::{CharClass, Condition};

use super::line_entry::{Addition, LineEntry};

/// Fuse entries with the same removal and additions whose conditions have
/// the same length and differ only in their first element.
///
/// The fused condition takes the union of the first elements, so it
/// accepts exactly the words accepted by one of the originals.
pub fn merge_similar(entries: Vec<LineEntry>) -> Vec<LineEntry> {
    let mut index: HashMap<(String, BTreeSet<Addition>, Vec<CharClass>), usize> = HashMap::new();
    let mut out: Vec<LineEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some((first, rest)) = entry.condition.elements().split_first() else {
            out.push(entry);
            continue;
        };
        let key = (entry.removal.clone(), entry.additions.clone(), rest.to_vec());
        match index.get(&key) {
            Some(&i) => {
                let target = &mut out[i];
                let merged = target.condition.elements()[0].union(first);
                target.condition = with_first(&target.condition, merged);
                target.from.extend(entry.from);
            }
            None => {
                index.insert(key, out.len());
                out.push(entry);
            }
        }
    }
    out
}

fn with_first(condition: &Condition, first: CharClass) -> Condition {
    let mut elements = condition.elements().to_vec();
    elements[0] = first;
    Condition::from_elements(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::line_entry::Addition;

    fn entry(add: &str, condition: &str) -> LineEntry {
        LineEntry::new("", Addition::bare(add), Condition::parse(condition).unwrap())
    }

    #[test]
    fn first_classes_are_united() {
        let out = merge_similar(vec![entry("s", "ab"), entry("s", "cb"), entry("s", "[de]b")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].condition.to_string(), "[acde]b");
    }

    #[test]
    fn different_additions_stay_apart() {
        let out = merge_similar(vec![entry("s", "ab"), entry("es", "cb")]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn different_tails_stay_apart() {
        let out = merge_similar(vec![entry("s", "ab"), entry("s", "ac")]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn negated_union() {
        let out = merge_similar(vec![entry("s", "[^xy]b"), entry("s", "xb")]);
        assert_eq!(out[0].condition.to_string(), "[^y]b");
    }
}
