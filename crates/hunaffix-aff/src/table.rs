// Rule table: flag -> rule lookup plus the global settings

use std::sync::Arc;

use hashbrown::HashMap;
use hunaffix_core::{AffixType, RuleEntry};

use crate::options::AffixOptions;

/// Read-only source of affix rules.
///
/// Implementations must be shareable between threads: expansion of
/// different dictionary lines may run concurrently against one provider.
pub trait RuleProvider: Sync {
    /// The rule declared for `flag`, if any.
    fn lookup(&self, flag: &str) -> Option<&RuleEntry>;

    /// Global settings of the affix file.
    fn options(&self) -> &AffixOptions;
}

/// In-memory rule table built by the affix reader.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, Arc<RuleEntry>>,
    options: AffixOptions,
}

impl RuleTable {
    pub fn new(options: AffixOptions) -> Self {
        Self {
            rules: HashMap::new(),
            options,
        }
    }

    /// Register a rule, replacing any rule with the same flag.
    pub fn insert(&mut self, rule: RuleEntry) {
        self.rules.insert(rule.flag.clone(), Arc::new(rule));
    }

    /// Remove a rule from the table and hand it back.
    pub fn take(&mut self, flag: &str) -> Option<RuleEntry> {
        self.rules.remove(flag).map(Arc::unwrap_or_clone)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Flags of every rule of the given direction, sorted.
    pub fn flags_of(&self, affix_type: AffixType) -> Vec<String> {
        let mut flags: Vec<String> = self
            .rules
            .values()
            .filter(|r| r.affix_type == affix_type)
            .map(|r| r.flag.clone())
            .collect();
        flags.sort();
        flags
    }
}

impl RuleProvider for RuleTable {
    fn lookup(&self, flag: &str) -> Option<&RuleEntry> {
        self.rules.get(flag).map(Arc::as_ref)
    }

    fn options(&self) -> &AffixOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut table = RuleTable::new(AffixOptions::default());
        table.insert(RuleEntry::new("A", AffixType::Suffix, true));
        table.insert(RuleEntry::new("B", AffixType::Prefix, false));
        assert_eq!(table.len(), 2);
        assert!(table.lookup("A").is_some());
        assert!(table.lookup("C").is_none());
        assert_eq!(table.flags_of(AffixType::Prefix), vec!["B".to_string()]);
    }

    #[test]
    fn insert_replaces_same_flag() {
        let mut table = RuleTable::default();
        table.insert(RuleEntry::new("A", AffixType::Suffix, true));
        table.insert(RuleEntry::new("A", AffixType::Suffix, false));
        assert_eq!(table.len(), 1);
        assert!(!table.lookup("A").map(|r| r.combinable).unwrap_or(true));
    }
}
