// Stage 3: condition disjoining
//
// Every entry starts from the condition compaction left it with and is
// narrowed, one character position at a time moving towards the start of
// the word, until its condition accepts no word of the universe outside
// its `from` set. The working list is rebuilt as a new generation on every
// pass; entries that are done move to the finished list.
//
// Narrowing is driven by the universe of words the flag could apply to,
// not by comparing sibling entries with each other. Entries whose
// conditions contain one another are not extracted as branches, and a
// parent's negated class never gates its children. A character that separates an entry from every colliding word
// becomes its class at once; shared characters go one position deeper.
// Entries that end up identical are joined later by the merge stage.

use std::collections::BTreeSet;

use hashbrown::HashMap;
use hunaffix_core::{CharClass, Condition};

use super::line_entry::LineEntry;
use crate::ReductionError;

/// A positive class is preferred while it is not larger than the negated
/// alternative by more than this many characters.
const LENGTH_DISCOUNT: usize = 1;

/// An entry being narrowed, with the words its condition still accepts.
#[derive(Debug)]
struct Pending {
    entry: LineEntry,
    /// Universe words outside `from` that the condition accepts.
    collisions: Vec<String>,
}

/// Character `offset` positions before the end of `word`.
fn char_from_end(word: &str, offset: usize) -> Option<char> {
    word.chars().rev().nth(offset)
}

fn prepend(condition: &Condition, class: CharClass) -> Condition {
    let mut elements = Vec::with_capacity(condition.len() + 1);
    elements.push(class);
    elements.extend(condition.elements().iter().cloned());
    Condition::from_elements(elements)
}

/// Smallest description of `accepted` that still rejects `rejected`.
fn choose_class(accepted: BTreeSet<char>, rejected: &BTreeSet<char>) -> CharClass {
    if accepted.len() < rejected.len() + LENGTH_DISCOUNT {
        if let Some(class) = CharClass::positive(accepted) {
            return class;
        }
    }
    CharClass::negated(rejected.clone())
}

/// Narrow the conditions of `entries` until they are disjoint from the
/// rest of `universe`.
///
/// `universe` holds every oriented word the flag could have applied to.
/// The result accepts, for each entry's additions, exactly the words of
/// its `from` set among the universe. Entries may come back split into
/// several entries with narrower conditions.
pub fn disjoin_conditions(
    entries: Vec<LineEntry>,
    universe: &BTreeSet<String>,
    iteration_limit: usize,
) -> Result<Vec<LineEntry>, ReductionError> {
    // entries sharing a condition share their first collision scan
    let mut scans: HashMap<Condition, Vec<&String>> = HashMap::new();
    let mut generation: Vec<Pending> = Vec::with_capacity(entries.len());
    for entry in entries {
        let matching = scans.entry(entry.condition.clone()).or_insert_with(|| {
            universe.iter().filter(|word| entry.accepts(word)).collect()
        });
        let collisions = matching
            .iter()
            .filter(|word| !entry.from.contains(**word))
            .map(|word| (*word).clone())
            .collect();
        generation.push(Pending { entry, collisions });
    }

    let mut finished = Vec::new();
    let mut iterations = 0;
    while !generation.is_empty() {
        iterations += 1;
        if iterations > iteration_limit {
            return Err(ReductionError::IterationLimit {
                limit: iteration_limit,
            });
        }
        generation.sort_by_key(|p| p.entry.condition.len());
        log::trace!(
            "disjoin pass {iterations}: {} pending, {} finished",
            generation.len(),
            finished.len()
        );
        let mut next = Vec::new();
        for pending in generation {
            narrow(pending, &mut next, &mut finished)?;
        }
        generation = next;
    }
    Ok(finished)
}

/// Narrow one entry by a single position.
fn narrow(
    pending: Pending,
    next: &mut Vec<Pending>,
    finished: &mut Vec<LineEntry>,
) -> Result<(), ReductionError> {
    let Pending { entry, collisions } = pending;
    if collisions.is_empty() {
        finished.push(entry);
        return Ok(());
    }
    let offset = entry.condition.len();

    // words the condition already spells out completely
    let (exhausted, longer): (Vec<&String>, Vec<&String>) = entry
        .from
        .iter()
        .partition(|w| w.chars().count() <= offset);
    for word in exhausted {
        if collisions.iter().any(|c| c.ends_with(word.as_str())) {
            return Err(ReductionError::IrreducibleCondition {
                word: word.clone(),
                condition: entry.condition.to_string(),
            });
        }
        finished.push(LineEntry {
            condition: Condition::literal(word),
            from: BTreeSet::from([word.clone()]),
            ..entry.clone()
        });
    }
    if longer.is_empty() {
        return Ok(());
    }

    let mut accepted: BTreeSet<char> = BTreeSet::new();
    for word in &longer {
        accepted.extend(char_from_end(word, offset));
    }
    let rejected: BTreeSet<char> = collisions
        .iter()
        .filter_map(|w| char_from_end(w, offset))
        .collect();

    let clear: BTreeSet<char> = accepted.difference(&rejected).copied().collect();
    if !clear.is_empty() {
        let from = longer
            .iter()
            .filter(|w| char_from_end(w, offset).is_some_and(|c| clear.contains(&c)))
            .map(|w| (*w).clone())
            .collect();
        finished.push(LineEntry {
            condition: prepend(&entry.condition, choose_class(clear, &rejected)),
            from,
            ..entry.clone()
        });
    }

    for c in accepted.intersection(&rejected) {
        let at = |w: &&String| char_from_end(w, offset) == Some(*c);
        next.push(Pending {
            entry: LineEntry {
                condition: prepend(&entry.condition, CharClass::Char(*c)),
                from: longer.iter().copied().filter(at).cloned().collect(),
                ..entry.clone()
            },
            collisions: collisions.iter().filter(at).cloned().collect(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::line_entry::Addition;

    fn words(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn entry(removal: &str, add: &str, from: &[&str]) -> LineEntry {
        let mut e = LineEntry::new(removal, Addition::bare(add), Condition::literal(removal));
        e.from = words(from);
        e
    }

    fn conditions(entries: &[LineEntry]) -> Vec<String> {
        let mut c: Vec<String> = entries.iter().map(|e| e.condition.to_string()).collect();
        c.sort();
        c
    }

    /// Every universe word is accepted by exactly the entries listing it.
    fn assert_exact(entries: &[LineEntry], universe: &BTreeSet<String>, wanted: &[&str]) {
        for word in universe {
            let accepted = entries.iter().any(|e| e.accepts(word));
            assert_eq!(accepted, wanted.contains(&word.as_str()), "word {word}");
        }
    }

    // --- narrowing ---

    #[test]
    fn no_collision_keeps_condition() {
        let universe = words(&["cat", "dog"]);
        let out = disjoin_conditions(vec![entry("", "s", &["cat", "dog"])], &universe, 100).unwrap();
        assert_eq!(conditions(&out), vec!["."]);
    }

    #[test]
    fn positive_class_when_small() {
        let universe = words(&["cat", "dog", "pig", "hen"]);
        let out = disjoin_conditions(vec![entry("", "s", &["cat"])], &universe, 100).unwrap();
        assert_eq!(conditions(&out), vec!["t"]);
        assert_exact(&out, &universe, &["cat"]);
    }

    #[test]
    fn negated_class_when_smaller() {
        let universe = words(&["cab", "cat", "cod", "cup", "dog"]);
        let out = disjoin_conditions(
            vec![entry("", "s", &["cab", "cat", "cod", "cup"])],
            &universe,
            100,
        )
        .unwrap();
        assert_eq!(conditions(&out), vec!["[^g]"]);
        assert_exact(&out, &universe, &["cab", "cat", "cod", "cup"]);
    }

    #[test]
    fn overlap_goes_one_position_deeper() {
        let universe = words(&["bay", "day", "boy", "toy", "key"]);
        let out = disjoin_conditions(vec![entry("y", "ies", &["bay", "day"])], &universe, 100).unwrap();
        assert_eq!(conditions(&out), vec!["ay"]);
        assert_exact(&out, &universe, &["bay", "day"]);
    }

    #[test]
    fn sibling_classes_are_complementary() {
        let universe = words(&["xa", "xb", "xc", "xd"]);
        let out = disjoin_conditions(
            vec![
                entry("", "1", &["xa", "xb"]),
                entry("", "2", &["xc", "xd"]),
            ],
            &universe,
            100,
        )
        .unwrap();
        assert_eq!(conditions(&out), vec!["[ab]", "[cd]"]);
        assert!(!out.iter().any(|e| e.accepts("xe") && e.accepts("xa")));
        // a letter no dictionary word has at that place matches neither rule
        assert!(!out.iter().any(|e| e.accepts("xe")));
        assert_eq!(out.iter().filter(|e| e.accepts("xa")).count(), 1);
        assert_eq!(out.iter().filter(|e| e.accepts("xd")).count(), 1);
    }

    #[test]
    fn length_alone_can_separate() {
        let universe = words(&["ab", "cab"]);
        let out = disjoin_conditions(vec![entry("", "s", &["cab"])], &universe, 100).unwrap();
        assert_eq!(conditions(&out), vec![".ab"]);
        assert_exact(&out, &universe, &["cab"]);
    }

    #[test]
    fn mixed_depths() {
        let universe = words(&["sa", "ta", "xsa", "ysa"]);
        let out = disjoin_conditions(vec![entry("", "s", &["ta", "xsa"])], &universe, 100).unwrap();
        assert_eq!(conditions(&out), vec!["ta", "xsa"]);
        assert_exact(&out, &universe, &["ta", "xsa"]);
    }

    // --- failures ---

    #[test]
    fn suffix_of_colliding_word_is_irreducible() {
        let universe = words(&["ab", "cab"]);
        let err = disjoin_conditions(vec![entry("", "s", &["ab"])], &universe, 100).unwrap_err();
        assert!(matches!(err, ReductionError::IrreducibleCondition { ref word, .. } if word == "ab"));
    }

    #[test]
    fn iteration_cap() {
        let universe = words(&["aaaa", "baaa"]);
        let err = disjoin_conditions(vec![entry("", "s", &["aaaa"])], &universe, 2).unwrap_err();
        assert!(matches!(err, ReductionError::IterationLimit { limit: 2 }));
    }
}
