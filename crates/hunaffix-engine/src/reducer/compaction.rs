// Stages 1 and 2: compaction of duplicate line entries and disjoint additions

use std::collections::BTreeSet;
use std::hash::Hash;

use hashbrown::HashMap;
use hunaffix_core::Condition;

use super::line_entry::{Addition, LineEntry, common_prefix_len};

/// Group entries by `key` in first-seen order, folding each group with `merge`.
fn bucket<K, F, M>(entries: Vec<LineEntry>, key: F, merge: M) -> Vec<LineEntry>
where
    K: Hash + Eq,
    F: Fn(&LineEntry) -> K,
    M: Fn(&mut LineEntry, LineEntry),
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut out: Vec<LineEntry> = Vec::new();
    for entry in entries {
        match index.get(&key(&entry)) {
            Some(&i) => merge(&mut out[i], entry),
            None => {
                index.insert(key(&entry), out.len());
                out.push(entry);
            }
        }
    }
    out
}

fn merge_from(target: &mut LineEntry, other: LineEntry) {
    target.from.extend(other.from);
}

fn merge_additions(target: &mut LineEntry, other: LineEntry) {
    target.additions.extend(other.additions);
}

/// Canonicalize the working set without losing provenance.
///
/// 1. one entry per `(removal, addition, condition)`, words merged
/// 2. one entry per `(removal, condition, words)`, additions merged
/// 3. one entry per `(removal, additions, condition)`, words merged
///
/// Afterwards every addition belongs to exactly one entry.
pub fn compact(entries: Vec<LineEntry>) -> Vec<LineEntry> {
    let singles: Vec<LineEntry> = entries
        .into_iter()
        .flat_map(|entry| {
            let LineEntry {
                removal,
                additions,
                condition,
                from,
            } = entry;
            additions.into_iter().map(move |addition| LineEntry {
                removal: removal.clone(),
                additions: BTreeSet::from([addition]),
                condition: condition.clone(),
                from: from.clone(),
            })
        })
        .collect();

    let by_addition = bucket(
        singles,
        |e| (e.removal.clone(), e.additions.clone(), e.condition.clone()),
        merge_from,
    );
    let by_words = bucket(
        by_addition,
        |e| (e.removal.clone(), e.condition.clone(), e.from.clone()),
        merge_additions,
    );
    bucket(
        by_words,
        |e| (e.removal.clone(), e.additions.clone(), e.condition.clone()),
        merge_from,
    )
}

/// Stage 2: split entries whose additions share leading text with the removal.
///
/// Additions are partitioned by the length of the text they share with the
/// removal; that shared text moves out of both sides and the condition,
/// which already spells the full removal, keeps the context. Each
/// sub-entry is then folded into the result set (see [`fold_into`]).
pub fn disjoint_additions(entries: Vec<LineEntry>) -> Vec<LineEntry> {
    let mut out: Vec<LineEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut partitions: Vec<(usize, BTreeSet<Addition>)> = Vec::new();
        for addition in &entry.additions {
            let shared = common_prefix_len(&entry.removal, &addition.text);
            match partitions.iter_mut().find(|(len, _)| *len == shared) {
                Some((_, set)) => {
                    set.insert(addition.clone());
                }
                None => partitions.push((shared, BTreeSet::from([addition.clone()]))),
            }
        }
        for (shared, additions) in partitions {
            let removal: String = entry.removal.chars().skip(shared).collect();
            let additions = additions
                .into_iter()
                .map(|a| Addition {
                    text: a.text.chars().skip(shared).collect(),
                    ..a
                })
                .collect();
            let sub = LineEntry {
                removal,
                additions,
                condition: entry.condition.clone(),
                from: entry.from.clone(),
            };
            fold_into(&mut out, sub);
        }
    }
    out
}

/// Removal and addition of one application, each past the text they share.
type SpinePair = (String, Addition);

/// The `(removal, addition)` pairs of an entry, trimmed of their common
/// leading text.
fn spine(entry: &LineEntry) -> BTreeSet<SpinePair> {
    entry
        .additions
        .iter()
        .map(|addition| {
            let shared = common_prefix_len(&entry.removal, &addition.text);
            let removal = entry.removal.chars().skip(shared).collect();
            let addition = Addition {
                text: addition.text.chars().skip(shared).collect(),
                ..addition.clone()
            };
            (removal, addition)
        })
        .collect()
}

/// Longest run of elements both conditions end with.
fn common_condition_tail(a: &Condition, b: &Condition) -> Condition {
    let shared = a
        .elements()
        .iter()
        .rev()
        .zip(b.elements().iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    Condition::from_elements(a.elements()[a.len() - shared..].to_vec())
}

/// Add a sub-entry to the result set.
///
/// - a structurally equal entry takes its words
/// - an entry with the same spine takes its words, and its condition
///   shrinks to the tail both conditions share
/// - an entry whose spine is a strict superset and which already covers
///   every word of the sub-entry makes it redundant
///
/// Otherwise the sub-entry is appended.
fn fold_into(out: &mut Vec<LineEntry>, entry: LineEntry) {
    if let Some(existing) = out.iter_mut().find(|existing| **existing == entry) {
        existing.from.extend(entry.from);
        return;
    }
    let wanted = spine(&entry);
    for existing in out.iter_mut() {
        let held = spine(existing);
        if held == wanted {
            existing.condition = common_condition_tail(&existing.condition, &entry.condition);
            existing.from.extend(entry.from);
            return;
        }
        if held.is_superset(&wanted) && entry.from.is_subset(&existing.from) {
            return;
        }
    }
    out.push(entry);
}
