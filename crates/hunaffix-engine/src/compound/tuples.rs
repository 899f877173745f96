// Slot tuples: lexicographic odometer over per-slot candidate lists

use hashbrown::HashSet;
use hunaffix_aff::Quantifier;

/// Iterator over every tuple picking one candidate per slot.
///
/// The last slot turns fastest. Nothing is yielded when any slot is empty.
pub(crate) struct SlotTuples<'s> {
    slots: &'s [Vec<usize>],
    cursor: Vec<usize>,
    exhausted: bool,
}

impl<'s> SlotTuples<'s> {
    pub(crate) fn new(slots: &'s [Vec<usize>]) -> Self {
        Self {
            slots,
            cursor: vec![0; slots.len()],
            exhausted: slots.is_empty() || slots.iter().any(Vec::is_empty),
        }
    }
}

impl Iterator for SlotTuples<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.exhausted {
            return None;
        }
        let item = self
            .cursor
            .iter()
            .zip(self.slots)
            .map(|(&c, slot)| slot[c])
            .collect();
        for i in (0..self.cursor.len()).rev() {
            self.cursor[i] += 1;
            if self.cursor[i] < self.slots[i].len() {
                return Some(item);
            }
            self.cursor[i] = 0;
        }
        self.exhausted = true;
        Some(item)
    }
}

/// Flag sequences matched by a tokenized compound rule.
///
/// Sequences hold between 2 and `max_len` flags; shorter sequences come
/// first, and within one length the order follows the rule's tokens.
pub(crate) fn flag_sequences(tokens: &[(String, Quantifier)], max_len: usize) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    unfold(tokens, max_len, &mut current, &mut out);
    let mut seen = HashSet::new();
    out.retain(|s| s.len() >= 2 && seen.insert(s.clone()));
    out.sort_by_key(Vec::len);
    out
}

fn unfold(
    tokens: &[(String, Quantifier)],
    max_len: usize,
    current: &mut Vec<String>,
    out: &mut Vec<Vec<String>>,
) {
    let Some(((flag, quantifier), rest)) = tokens.split_first() else {
        out.push(current.clone());
        return;
    };
    let (min, max) = match quantifier {
        Quantifier::One => (1, 1),
        Quantifier::ZeroOrOne => (0, 1),
        Quantifier::ZeroOrMore => (0, usize::MAX),
    };
    let mark = current.len();
    let mut repeats = 0;
    while repeats < min {
        current.push(flag.clone());
        repeats += 1;
    }
    loop {
        if current.len() > max_len {
            break;
        }
        unfold(rest, max_len, current, out);
        if repeats == max {
            break;
        }
        current.push(flag.clone());
        repeats += 1;
    }
    current.truncate(mark);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[(&str, Quantifier)]) -> Vec<(String, Quantifier)> {
        list.iter().map(|(f, q)| (f.to_string(), *q)).collect()
    }

    fn seqs(found: Vec<Vec<String>>) -> Vec<String> {
        found.into_iter().map(|s| s.concat()).collect()
    }

    #[test]
    fn odometer_order() {
        let slots = vec![vec![0, 1], vec![5, 6, 7]];
        let all: Vec<Vec<usize>> = SlotTuples::new(&slots).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 5],
                vec![0, 6],
                vec![0, 7],
                vec![1, 5],
                vec![1, 6],
                vec![1, 7]
            ]
        );
    }

    #[test]
    fn empty_slot_yields_nothing() {
        let slots = vec![vec![0], vec![]];
        assert_eq!(SlotTuples::new(&slots).count(), 0);
    }

    #[test]
    fn star_and_optional_unfold() {
        use Quantifier::*;
        let t = tokens(&[("A", One), ("B", ZeroOrMore), ("C", ZeroOrOne)]);
        assert_eq!(seqs(flag_sequences(&t, 3)), vec!["AC", "AB", "ABC", "ABB"]);
    }

    #[test]
    fn sequences_shorter_than_two_are_skipped() {
        use Quantifier::*;
        let t = tokens(&[("A", One), ("B", ZeroOrOne)]);
        assert_eq!(seqs(flag_sequences(&t, 4)), vec!["AB"]);
    }
}
