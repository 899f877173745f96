// Affix entries and the rules grouping them under a flag

use std::fmt;
use std::sync::Arc;

use crate::AffixError;
use crate::condition::Condition;

/// Direction of an affix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AffixType {
    Prefix,
    Suffix,
}

impl AffixType {
    /// Keyword used in affix files.
    pub fn tag(self) -> &'static str {
        match self {
            AffixType::Prefix => "PFX",
            AffixType::Suffix => "SFX",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "PFX" => Some(AffixType::Prefix),
            "SFX" => Some(AffixType::Suffix),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            AffixType::Prefix => AffixType::Suffix,
            AffixType::Suffix => AffixType::Prefix,
        }
    }
}

impl fmt::Display for AffixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One strip + add + condition transformation.
///
/// `strip` and `add` hold the literal text (the affix-file placeholder `0`
/// is already translated into an empty string).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AffixEntry {
    pub affix_type: AffixType,
    pub flag: String,
    pub strip: String,
    pub add: String,
    pub continuation_flags: Vec<String>,
    pub condition: Condition,
    pub morph_fields: Vec<String>,
}

impl AffixEntry {
    pub fn has_continuation_flag(&self, flag: &str) -> bool {
        !flag.is_empty() && self.continuation_flags.iter().any(|f| f == flag)
    }

    /// Check whether the entry can be applied to `word`.
    ///
    /// The condition must hold at the anchored end (start, for prefixes) and
    /// the word must carry `strip` at the same place.
    pub fn matches(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        let condition_ok = match self.affix_type {
            AffixType::Suffix => self.condition.matches_end(&chars),
            AffixType::Prefix => self.condition.matches_start(&chars),
        };
        condition_ok
            && match self.affix_type {
                AffixType::Suffix => word.ends_with(&self.strip),
                AffixType::Prefix => word.starts_with(&self.strip),
            }
    }

    /// Whether applying the entry would remove the whole word.
    pub fn strips_whole(&self, word: &str) -> bool {
        !self.strip.is_empty() && self.strip.len() == word.len()
    }

    /// Apply the entry to a word that `matches`.
    ///
    /// Removing every character of the word is only allowed with
    /// `full_strip`; otherwise the rule table is inconsistent with its
    /// configuration and an error is returned. A word that does not carry
    /// `strip` at the anchored end is an error too.
    pub fn apply(&self, word: &str, full_strip: bool) -> Result<String, AffixError> {
        if self.strips_whole(word) && !full_strip {
            return Err(AffixError::FullStrip {
                flag: self.flag.clone(),
                word: word.to_string(),
            });
        }
        let mismatch = || AffixError::StripMismatch {
            flag: self.flag.clone(),
            strip: self.strip.clone(),
            word: word.to_string(),
        };
        let derived = match self.affix_type {
            AffixType::Suffix => {
                let stem = word.strip_suffix(self.strip.as_str()).ok_or_else(mismatch)?;
                format!("{stem}{}", self.add)
            }
            AffixType::Prefix => {
                let stem = word.strip_prefix(self.strip.as_str()).ok_or_else(mismatch)?;
                format!("{}{stem}", self.add)
            }
        };
        Ok(derived)
    }

    /// Reverse the transformation on a derived word.
    pub fn undo(&self, derived: &str) -> Option<String> {
        match self.affix_type {
            AffixType::Suffix => derived
                .strip_suffix(self.add.as_str())
                .map(|stem| format!("{stem}{}", self.strip)),
            AffixType::Prefix => derived
                .strip_prefix(self.add.as_str())
                .map(|stem| format!("{}{stem}", self.strip)),
        }
    }

    /// The `ADD[/FLAGS]` token of the affix-file line.
    ///
    /// `flag_separator` is `","` for numeric flags and empty otherwise.
    pub fn addition_token(&self, flag_separator: &str) -> String {
        let add = if self.add.is_empty() { "0" } else { self.add.as_str() };
        if self.continuation_flags.is_empty() {
            add.to_string()
        } else {
            format!("{add}/{}", self.continuation_flags.join(flag_separator))
        }
    }
}

impl fmt::Display for AffixEntry {
    /// `TYPE FLAG STRIP ADD CONDITION [MORPH...]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strip = if self.strip.is_empty() { "0" } else { self.strip.as_str() };
        write!(
            f,
            "{} {} {} {} {}",
            self.affix_type,
            self.flag,
            strip,
            self.addition_token(""),
            self.condition
        )?;
        for field in &self.morph_fields {
            write!(f, " {field}")?;
        }
        Ok(())
    }
}

/// All entries sharing one flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub flag: String,
    pub affix_type: AffixType,
    /// Cross-product permission (`Y`/`N` in the rule header).
    pub combinable: bool,
    pub entries: Vec<Arc<AffixEntry>>,
}

impl RuleEntry {
    pub fn new(flag: impl Into<String>, affix_type: AffixType, combinable: bool) -> Self {
        Self {
            flag: flag.into(),
            affix_type,
            combinable,
            entries: Vec::new(),
        }
    }

    /// Header line `TYPE FLAG Y|N COUNT`.
    pub fn header(&self) -> String {
        format!(
            "{} {} {} {}",
            self.affix_type,
            self.flag,
            if self.combinable { 'Y' } else { 'N' },
            self.entries.len()
        )
    }

    /// Entries applicable to `word`, in declaration order.
    pub fn applicable<'a>(&'a self, word: &'a str) -> impl Iterator<Item = &'a Arc<AffixEntry>> {
        self.entries.iter().filter(move |e| e.matches(word))
    }
}
