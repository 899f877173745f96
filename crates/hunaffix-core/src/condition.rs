// Affix conditions: anchored character-class patterns
//
// A condition is a sequence of elements, each matching exactly one
// character: a literal, the wildcard `.`, a class `[abc]` or a negated
// class `[^abc]`. Suffix conditions are anchored at the end of the word,
// prefix conditions at its start. The lone pattern `.` means "no
// condition" and is stored as an empty element list.

use std::collections::BTreeSet;
use std::fmt;

use crate::ConditionError;

/// One position of a condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CharClass {
    /// `.`: any character.
    Any,
    /// A literal character.
    Char(char),
    /// `[abc]`: one of the listed characters (always two or more).
    Set(BTreeSet<char>),
    /// `[^abc]`: any character except the listed ones (never empty).
    Negated(BTreeSet<char>),
}

impl CharClass {
    /// Build a positive class, collapsing to a literal when it holds a single character.
    ///
    /// An empty set matches nothing; callers never build one, so it is
    /// reported as `None`.
    pub fn positive(chars: BTreeSet<char>) -> Option<Self> {
        match chars.len() {
            0 => None,
            1 => chars.into_iter().next().map(CharClass::Char),
            _ => Some(CharClass::Set(chars)),
        }
    }

    /// Build a negated class, collapsing to `.` when nothing is excluded.
    pub fn negated(chars: BTreeSet<char>) -> Self {
        if chars.is_empty() {
            CharClass::Any
        } else {
            CharClass::Negated(chars)
        }
    }

    /// Whether the class accepts the character.
    pub fn contains(&self, c: char) -> bool {
        match self {
            CharClass::Any => true,
            CharClass::Char(x) => *x == c,
            CharClass::Set(set) => set.contains(&c),
            CharClass::Negated(set) => !set.contains(&c),
        }
    }

    /// Whether the class is written with brackets.
    pub fn is_bracketed(&self) -> bool {
        matches!(self, CharClass::Set(_) | CharClass::Negated(_))
    }

    /// The class accepting every character accepted by either operand.
    pub fn union(&self, other: &CharClass) -> CharClass {
        use CharClass::*;
        match (self, other) {
            (Any, _) | (_, Any) => Any,
            (Negated(a), Negated(b)) => CharClass::negated(a.intersection(b).copied().collect()),
            (Negated(excluded), positive) | (positive, Negated(excluded)) => {
                let accepted = positive.accepted_chars();
                CharClass::negated(excluded.difference(&accepted).copied().collect())
            }
            (left, right) => {
                let mut chars = left.accepted_chars();
                chars.extend(right.accepted_chars());
                // both operands are non-empty positives, so the union is too
                CharClass::positive(chars).unwrap_or(Any)
            }
        }
    }

    fn accepted_chars(&self) -> BTreeSet<char> {
        match self {
            CharClass::Char(c) => BTreeSet::from([*c]),
            CharClass::Set(set) => set.clone(),
            CharClass::Any | CharClass::Negated(_) => BTreeSet::new(),
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharClass::Any => f.write_str("."),
            CharClass::Char(c) => write!(f, "{c}"),
            CharClass::Set(set) => {
                f.write_str("[")?;
                for c in set {
                    write!(f, "{c}")?;
                }
                f.write_str("]")
            }
            CharClass::Negated(set) => {
                f.write_str("[^")?;
                for c in set {
                    write!(f, "{c}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A parsed affix condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Condition {
    elements: Vec<CharClass>,
}

impl Condition {
    /// The empty condition, matching every word.
    pub fn any() -> Self {
        Self::default()
    }

    /// A condition made of literal characters only.
    pub fn literal(text: &str) -> Self {
        Self {
            elements: text.chars().map(CharClass::Char).collect(),
        }
    }

    pub fn from_elements(elements: Vec<CharClass>) -> Self {
        Self { elements }
    }

    /// Parse the textual form used in affix files.
    pub fn parse(pattern: &str) -> Result<Self, ConditionError> {
        if pattern.is_empty() || pattern == "." {
            return Ok(Self::any());
        }

        let chars: Vec<char> = pattern.chars().collect();
        let mut elements = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '[' => {
                    let close = chars[i + 1..]
                        .iter()
                        .position(|&c| c == ']')
                        .map(|p| p + i + 1)
                        .ok_or_else(|| ConditionError::UnterminatedClass(pattern.to_string()))?;
                    let mut body = &chars[i + 1..close];
                    let negated = body.first() == Some(&'^');
                    if negated {
                        body = &body[1..];
                    }
                    if body.is_empty() {
                        return Err(ConditionError::EmptyClass(pattern.to_string()));
                    }
                    let set: BTreeSet<char> = body.iter().copied().collect();
                    let class = if negated {
                        CharClass::negated(set)
                    } else {
                        CharClass::positive(set)
                            .ok_or_else(|| ConditionError::EmptyClass(pattern.to_string()))?
                    };
                    elements.push(class);
                    i = close + 1;
                }
                ']' => return Err(ConditionError::UnexpectedBracket(pattern.to_string())),
                '.' => {
                    elements.push(CharClass::Any);
                    i += 1;
                }
                c => {
                    elements.push(CharClass::Char(c));
                    i += 1;
                }
            }
        }
        Ok(Self { elements })
    }

    /// Number of characters the condition inspects.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[CharClass] {
        &self.elements
    }

    /// Number of bracketed elements.
    pub fn bracket_groups(&self) -> usize {
        self.elements.iter().filter(|e| e.is_bracketed()).count()
    }

    /// True when the tail of `word` satisfies the condition.
    pub fn matches_end(&self, word: &[char]) -> bool {
        if word.len() < self.elements.len() {
            return false;
        }
        let tail = &word[word.len() - self.elements.len()..];
        self.elements.iter().zip(tail).all(|(e, &c)| e.contains(c))
    }

    /// True when the head of `word` satisfies the condition.
    pub fn matches_start(&self, word: &[char]) -> bool {
        if word.len() < self.elements.len() {
            return false;
        }
        self.elements.iter().zip(word).all(|(e, &c)| e.contains(c))
    }

    /// Same condition with its element order reversed.
    ///
    /// Turns a prefix condition into the equivalent suffix condition on the
    /// reversed word, and back.
    pub fn reversed(&self) -> Self {
        Self {
            elements: self.elements.iter().rev().cloned().collect(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elements.is_empty() {
            return f.write_str(".");
        }
        for e in &self.elements {
            write!(f, "{e}")?;
        }
        Ok(())
    }
}
