// Flag encodings: short, long, numeric and UTF-8 flags

use crate::AffError;

/// The four flag encodings selectable with the `FLAG` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagType {
    /// One character per flag (the default).
    #[default]
    Short,
    /// Two characters per flag (`FLAG long`).
    Long,
    /// Comma-separated decimal numbers (`FLAG num`).
    Numeric,
    /// One Unicode code point per flag (`FLAG UTF-8`).
    Utf8,
}

/// Largest value accepted for a numeric flag.
const MAX_NUMERIC_FLAG: u32 = 65_000;

/// Repetition marker following a compound-rule token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// Exactly once.
    One,
    /// `?`: zero or one time.
    ZeroOrOne,
    /// `*`: any number of times.
    ZeroOrMore,
}

impl FlagType {
    /// Parse the value of a `FLAG` directive.
    pub fn from_directive(value: &str) -> Result<Self, AffError> {
        match value {
            "long" => Ok(FlagType::Long),
            "num" => Ok(FlagType::Numeric),
            "UTF-8" | "utf-8" => Ok(FlagType::Utf8),
            "short" | "char" => Ok(FlagType::Short),
            other => Err(AffError::InvalidFlag {
                flag: other.to_string(),
                reason: "unknown flag type".to_string(),
            }),
        }
    }

    /// Separator placed between flags when writing them back.
    pub fn separator(self) -> &'static str {
        match self {
            FlagType::Numeric => ",",
            _ => "",
        }
    }

    /// Split a run of flags (the part after `/` in a word or an affix).
    pub fn split(self, text: &str) -> Result<Vec<String>, AffError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            FlagType::Short | FlagType::Utf8 => Ok(text.chars().map(String::from).collect()),
            FlagType::Long => {
                let chars: Vec<char> = text.chars().collect();
                if chars.len() % 2 != 0 {
                    return Err(AffError::InvalidFlag {
                        flag: text.to_string(),
                        reason: "long flags need an even number of characters".to_string(),
                    });
                }
                Ok(chars.chunks(2).map(|pair| pair.iter().collect()).collect())
            }
            FlagType::Numeric => text
                .split(',')
                .map(|part| {
                    let value: u32 = part.trim().parse().map_err(|_| AffError::InvalidFlag {
                        flag: part.to_string(),
                        reason: "not a number".to_string(),
                    })?;
                    if value == 0 || value > MAX_NUMERIC_FLAG {
                        return Err(AffError::InvalidFlag {
                            flag: part.to_string(),
                            reason: format!("numeric flags must lie in 1..={MAX_NUMERIC_FLAG}"),
                        });
                    }
                    Ok(value.to_string())
                })
                .collect(),
        }
    }

    /// Parse a value that must hold exactly one flag.
    pub fn single(self, text: &str) -> Result<String, AffError> {
        let mut flags = self.split(text)?;
        if flags.len() != 1 {
            return Err(AffError::InvalidFlag {
                flag: text.to_string(),
                reason: "expected exactly one flag".to_string(),
            });
        }
        Ok(flags.remove(0))
    }

    /// Join flags back into their textual form.
    pub fn join(self, flags: &[String]) -> String {
        flags.join(self.separator())
    }

    /// Split a `COMPOUNDRULE` pattern into flags with their quantifiers.
    ///
    /// Short and UTF-8 flags are written bare (`AB*C?`); long and numeric
    /// flags are wrapped in parentheses (`(aa)(bb)*`).
    pub fn split_compound_rule(self, rule: &str) -> Result<Vec<(String, Quantifier)>, AffError> {
        let chars: Vec<char> = rule.chars().collect();
        let mut tokens: Vec<(String, Quantifier)> = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let flag = match chars[i] {
                '*' | '?' => {
                    let quantifier = if chars[i] == '*' {
                        Quantifier::ZeroOrMore
                    } else {
                        Quantifier::ZeroOrOne
                    };
                    match tokens.last_mut() {
                        Some(last) if last.1 == Quantifier::One => last.1 = quantifier,
                        _ => {
                            return Err(AffError::InvalidFlag {
                                flag: rule.to_string(),
                                reason: "dangling quantifier in compound rule".to_string(),
                            });
                        }
                    }
                    i += 1;
                    continue;
                }
                '(' => {
                    let close = chars[i + 1..]
                        .iter()
                        .position(|&c| c == ')')
                        .map(|p| p + i + 1)
                        .ok_or_else(|| AffError::InvalidFlag {
                            flag: rule.to_string(),
                            reason: "unterminated group in compound rule".to_string(),
                        })?;
                    let inner: String = chars[i + 1..close].iter().collect();
                    i = close + 1;
                    self.single(&inner)?
                }
                c => {
                    if matches!(self, FlagType::Long | FlagType::Numeric) {
                        return Err(AffError::InvalidFlag {
                            flag: rule.to_string(),
                            reason: "long and numeric compound-rule flags need parentheses"
                                .to_string(),
                        });
                    }
                    i += 1;
                    c.to_string()
                }
            };
            tokens.push((flag, Quantifier::One));
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // --- split ---

    #[test]
    fn short_flags_are_single_chars() {
        assert_eq!(FlagType::Short.split("AB").unwrap(), strings(&["A", "B"]));
        assert!(FlagType::Short.split("").unwrap().is_empty());
    }

    #[test]
    fn long_flags_are_pairs() {
        assert_eq!(FlagType::Long.split("aaBb").unwrap(), strings(&["aa", "Bb"]));
        assert!(FlagType::Long.split("abc").is_err());
    }

    #[test]
    fn numeric_flags_are_comma_separated() {
        assert_eq!(FlagType::Numeric.split("1,23").unwrap(), strings(&["1", "23"]));
        assert!(FlagType::Numeric.split("1,x").is_err());
        assert!(FlagType::Numeric.split("0").is_err());
    }

    #[test]
    fn utf8_flags_are_code_points() {
        assert_eq!(FlagType::Utf8.split("\u{00E4}\u{00F6}").unwrap(), strings(&["\u{00E4}", "\u{00F6}"]));
    }

    #[test]
    fn join_uses_separator() {
        assert_eq!(FlagType::Numeric.join(&strings(&["1", "2"])), "1,2");
        assert_eq!(FlagType::Long.join(&strings(&["aa", "bb"])), "aabb");
    }

    #[test]
    fn directive_values() {
        assert_eq!(FlagType::from_directive("long").unwrap(), FlagType::Long);
        assert_eq!(FlagType::from_directive("num").unwrap(), FlagType::Numeric);
        assert!(FlagType::from_directive("weird").is_err());
    }

    // --- compound rules ---

    #[test]
    fn compound_rule_short_flags() {
        let tokens = FlagType::Short.split_compound_rule("AB*C?").unwrap();
        assert_eq!(
            tokens,
            vec![
                ("A".to_string(), Quantifier::One),
                ("B".to_string(), Quantifier::ZeroOrMore),
                ("C".to_string(), Quantifier::ZeroOrOne),
            ]
        );
    }

    #[test]
    fn compound_rule_long_flags() {
        let tokens = FlagType::Long.split_compound_rule("(aa)(bb)*").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1], ("bb".to_string(), Quantifier::ZeroOrMore));
        assert!(FlagType::Long.split_compound_rule("aabb").is_err());
    }

    #[test]
    fn compound_rule_dangling_quantifier() {
        assert!(FlagType::Short.split_compound_rule("*A").is_err());
    }
}
