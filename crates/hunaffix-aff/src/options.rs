// Global affix-file settings consulted by the expansion engine

use crate::flags::FlagType;

/// Default minimum length of a compound component (`COMPOUNDMIN`).
pub const DEFAULT_COMPOUND_MIN: usize = 3;

/// Settings declared once per affix file.
///
/// Flag-valued settings are `None` when the affix file does not declare
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffixOptions {
    pub flag_type: FlagType,
    /// `COMPLEXPREFIXES`: prefixes become the primary direction.
    pub complex_prefixes: bool,
    /// `FULLSTRIP`: an affix may strip the whole word.
    pub full_strip: bool,

    pub forbidden_word_flag: Option<String>,
    pub circumfix_flag: Option<String>,
    pub need_affix_flag: Option<String>,
    pub only_in_compound_flag: Option<String>,

    pub compound_flag: Option<String>,
    pub compound_begin_flag: Option<String>,
    pub compound_middle_flag: Option<String>,
    pub compound_end_flag: Option<String>,
    pub compound_forbid_flag: Option<String>,
    pub compound_permit_flag: Option<String>,
    /// `COMPOUNDRULE` patterns, as written.
    pub compound_rules: Vec<String>,
    pub compound_min: usize,
    pub compound_word_max: Option<usize>,

    pub check_compound_triple: bool,
    pub simplified_triple: bool,
    pub check_compound_case: bool,
    pub check_compound_dup: bool,
    pub check_compound_rep: bool,
    /// `REP` table, underscores already turned into spaces.
    pub replacements: Vec<(String, String)>,
}

impl Default for AffixOptions {
    fn default() -> Self {
        Self {
            flag_type: FlagType::Short,
            complex_prefixes: false,
            full_strip: false,
            forbidden_word_flag: None,
            circumfix_flag: None,
            need_affix_flag: None,
            only_in_compound_flag: None,
            compound_flag: None,
            compound_begin_flag: None,
            compound_middle_flag: None,
            compound_end_flag: None,
            compound_forbid_flag: None,
            compound_permit_flag: None,
            compound_rules: Vec::new(),
            compound_min: DEFAULT_COMPOUND_MIN,
            compound_word_max: None,
            check_compound_triple: false,
            simplified_triple: false,
            check_compound_case: false,
            check_compound_dup: false,
            check_compound_rep: false,
            replacements: Vec::new(),
        }
    }
}

/// True when `setting` is declared and equal to `flag`.
pub fn is_flag(setting: &Option<String>, flag: &str) -> bool {
    setting.as_deref() == Some(flag)
}

impl AffixOptions {
    fn singleton_flags(&self) -> impl Iterator<Item = &str> {
        [
            &self.forbidden_word_flag,
            &self.circumfix_flag,
            &self.need_affix_flag,
            &self.only_in_compound_flag,
            &self.compound_flag,
            &self.compound_begin_flag,
            &self.compound_middle_flag,
            &self.compound_end_flag,
            &self.compound_forbid_flag,
            &self.compound_permit_flag,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
    }

    /// Flags used by compound rules.
    ///
    /// Malformed rules contribute nothing here; they are reported when the
    /// compound engine parses them.
    pub fn compound_rule_flags(&self) -> Vec<String> {
        self.compound_rules
            .iter()
            .filter_map(|rule| self.flag_type.split_compound_rule(rule).ok())
            .flatten()
            .map(|(flag, _)| flag)
            .collect()
    }

    /// Whether a flag is handled by a global setting rather than an affix rule.
    pub fn is_managed_flag(&self, flag: &str) -> bool {
        self.singleton_flags().any(|f| f == flag)
            || self.compound_rule_flags().iter().any(|f| f == flag)
    }

    /// The direction applied first during expansion.
    pub fn primary_direction(&self) -> hunaffix_core::AffixType {
        if self.complex_prefixes {
            hunaffix_core::AffixType::Prefix
        } else {
            hunaffix_core::AffixType::Suffix
        }
    }
}
