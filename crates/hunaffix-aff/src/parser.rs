// Affix-file reader
//
// Understands the directives the expansion and reduction engines consume;
// other directives are skipped. Only UTF-8 text is accepted.

use std::sync::Arc;

use hashbrown::HashMap;
use hunaffix_core::{AffixEntry, AffixType, Condition, RuleEntry};

use crate::AffError;
use crate::flags::FlagType;
use crate::options::AffixOptions;
use crate::table::RuleTable;

/// A rule whose header has been read, with the entries still expected.
struct PendingRule {
    rule: RuleEntry,
    declared: usize,
}

/// Line-by-line affix parser.
pub struct AffixParser {
    options: AffixOptions,
    rules: HashMap<String, PendingRule>,
    /// Flags in header order, for a deterministic table.
    order: Vec<String>,
    rep_header_seen: bool,
    compound_rule_header_seen: bool,
}

fn syntax(line: usize, message: impl Into<String>) -> AffError {
    AffError::Syntax {
        line,
        message: message.into(),
    }
}

fn parse_count(line: usize, token: Option<&&str>, what: &str) -> Result<usize, AffError> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| syntax(line, format!("{what} needs a numeric argument")))
}

impl AffixParser {
    pub fn new(options: AffixOptions) -> Self {
        Self {
            options,
            rules: HashMap::new(),
            order: Vec::new(),
            rep_header_seen: false,
            compound_rule_header_seen: false,
        }
    }

    /// Consume one line (1-based `line_number` is used in errors).
    pub fn feed_line(&mut self, line_number: usize, line: &str) -> Result<(), AffError> {
        let line = line.trim_start_matches('\u{FEFF}');
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }
        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let ln = line_number;
        let flag_type = self.options.flag_type;

        match tokens[0] {
            "SET" => {
                let charset = tokens.get(1).copied().unwrap_or_default();
                if !charset.eq_ignore_ascii_case("UTF-8") {
                    return Err(AffError::UnsupportedCharset(charset.to_string()));
                }
            }
            "FLAG" => {
                let value = tokens.get(1).ok_or_else(|| syntax(ln, "FLAG needs a value"))?;
                self.options.flag_type = FlagType::from_directive(value)?;
            }
            "COMPLEXPREFIXES" => self.options.complex_prefixes = true,
            "FULLSTRIP" => self.options.full_strip = true,
            "CHECKCOMPOUNDTRIPLE" => self.options.check_compound_triple = true,
            "SIMPLIFIEDTRIPLE" => self.options.simplified_triple = true,
            "CHECKCOMPOUNDCASE" => self.options.check_compound_case = true,
            "CHECKCOMPOUNDDUP" => self.options.check_compound_dup = true,
            "CHECKCOMPOUNDREP" => self.options.check_compound_rep = true,
            "FORBIDDENWORD" | "CIRCUMFIX" | "NEEDAFFIX" | "PSEUDOROOT" | "ONLYINCOMPOUND"
            | "COMPOUNDFLAG" | "COMPOUNDBEGIN" | "COMPOUNDMIDDLE" | "COMPOUNDEND"
            | "COMPOUNDFORBIDFLAG" | "COMPOUNDPERMITFLAG" => {
                let value = tokens
                    .get(1)
                    .ok_or_else(|| syntax(ln, format!("{} needs a flag", tokens[0])))?;
                let flag = Some(flag_type.single(value)?);
                let o = &mut self.options;
                match tokens[0] {
                    "FORBIDDENWORD" => o.forbidden_word_flag = flag,
                    "CIRCUMFIX" => o.circumfix_flag = flag,
                    "NEEDAFFIX" | "PSEUDOROOT" => o.need_affix_flag = flag,
                    "ONLYINCOMPOUND" => o.only_in_compound_flag = flag,
                    "COMPOUNDFLAG" => o.compound_flag = flag,
                    "COMPOUNDBEGIN" => o.compound_begin_flag = flag,
                    "COMPOUNDMIDDLE" => o.compound_middle_flag = flag,
                    "COMPOUNDEND" => o.compound_end_flag = flag,
                    "COMPOUNDFORBIDFLAG" => o.compound_forbid_flag = flag,
                    _ => o.compound_permit_flag = flag,
                }
            }
            "COMPOUNDMIN" => {
                self.options.compound_min = parse_count(ln, tokens.get(1), "COMPOUNDMIN")?.max(1);
            }
            "COMPOUNDWORDMAX" => {
                self.options.compound_word_max =
                    Some(parse_count(ln, tokens.get(1), "COMPOUNDWORDMAX")?);
            }
            "REP" => {
                if !self.rep_header_seen && tokens.len() == 2 {
                    parse_count(ln, tokens.get(1), "REP")?;
                    self.rep_header_seen = true;
                } else if tokens.len() >= 3 {
                    self.options
                        .replacements
                        .push((tokens[1].replace('_', " "), tokens[2].replace('_', " ")));
                } else {
                    return Err(syntax(ln, "REP entry needs a pattern and a replacement"));
                }
            }
            "COMPOUNDRULE" => {
                let value = tokens.get(1).ok_or_else(|| syntax(ln, "COMPOUNDRULE needs a value"))?;
                if !self.compound_rule_header_seen && value.chars().all(|c| c.is_ascii_digit()) {
                    self.compound_rule_header_seen = true;
                } else {
                    flag_type.split_compound_rule(value)?;
                    self.options.compound_rules.push(value.to_string());
                }
            }
            "PFX" | "SFX" => self.feed_affix(ln, &tokens)?,
            other => log::debug!("line {ln}: skipping directive {other}"),
        }
        Ok(())
    }

    fn feed_affix(&mut self, ln: usize, tokens: &[&str]) -> Result<(), AffError> {
        let affix_type = AffixType::from_tag(tokens[0]).ok_or_else(|| syntax(ln, "not an affix line"))?;
        let flag_text = tokens.get(1).ok_or_else(|| syntax(ln, "affix line without flag"))?;
        let flag = self.options.flag_type.single(flag_text)?;

        let Some(pending) = self.rules.get_mut(&flag) else {
            // header: TYPE FLAG Y|N COUNT
            let combinable = match tokens.get(2).copied() {
                Some("Y") => true,
                Some("N") => false,
                _ => return Err(syntax(ln, format!("rule {flag} header needs Y or N"))),
            };
            let declared = parse_count(ln, tokens.get(3), "affix header")?;
            self.order.push(flag.clone());
            self.rules.insert(
                flag.clone(),
                PendingRule {
                    rule: RuleEntry::new(flag, affix_type, combinable),
                    declared,
                },
            );
            return Ok(());
        };

        if pending.rule.affix_type != affix_type {
            return Err(syntax(ln, format!("flag {flag} used for both PFX and SFX")));
        }
        if pending.rule.entries.len() >= pending.declared {
            return Err(syntax(ln, format!("rule {flag} has more entries than declared")));
        }
        let entry = parse_affix_entry(ln, affix_type, flag, tokens, self.options.flag_type)?;
        pending.rule.entries.push(Arc::new(entry));
        Ok(())
    }

    /// Finish parsing, checking that every rule got its declared entries.
    pub fn finish(mut self) -> Result<RuleTable, AffError> {
        let mut table = RuleTable::new(self.options);
        for flag in self.order {
            if let Some(pending) = self.rules.remove(&flag) {
                if pending.rule.entries.len() != pending.declared {
                    return Err(AffError::Configuration(format!(
                        "rule {flag} declares {} entries but has {}",
                        pending.declared,
                        pending.rule.entries.len()
                    )));
                }
                table.insert(pending.rule);
            }
        }
        Ok(table)
    }
}

/// Parse `TYPE FLAG STRIP ADD[/FLAGS] [CONDITION [MORPH...]]`.
fn parse_affix_entry(
    ln: usize,
    affix_type: AffixType,
    flag: String,
    tokens: &[&str],
    flag_type: FlagType,
) -> Result<AffixEntry, AffError> {
    if tokens.len() < 4 {
        return Err(syntax(ln, format!("rule {flag} entry needs strip and add")));
    }
    let strip = match tokens[2] {
        "0" => String::new(),
        s => s.to_string(),
    };
    let (add, continuation) = match tokens[3].split_once('/') {
        Some((add, flags)) => (add, flag_type.split(flags)?),
        None => (tokens[3], Vec::new()),
    };
    let add = if add == "0" { String::new() } else { add.to_string() };
    let condition = Condition::parse(tokens.get(4).copied().unwrap_or("."))?;
    let morph_fields = tokens.iter().skip(5).map(|s| s.to_string()).collect();

    Ok(AffixEntry {
        affix_type,
        flag,
        strip,
        add,
        continuation_flags: continuation,
        condition,
        morph_fields,
    })
}

/// Parse a whole affix file.
pub fn parse_affix_text(text: &str) -> Result<RuleTable, AffError> {
    let mut parser = AffixParser::new(AffixOptions::default());
    for (i, line) in text.lines().enumerate() {
        parser.feed_line(i + 1, line)?;
    }
    parser.finish()
}

/// Parse a block holding a single rule (header and entries) under the
/// given settings.
pub fn parse_rule_lines<S: AsRef<str>>(
    lines: &[S],
    options: &AffixOptions,
) -> Result<RuleEntry, AffError> {
    let mut parser = AffixParser::new(options.clone());
    for (i, line) in lines.iter().enumerate() {
        parser.feed_line(i + 1, line.as_ref())?;
    }
    let flags = parser.order.clone();
    let mut table = parser.finish()?;
    match flags.as_slice() {
        [flag] => {
            let rule = table.take(flag);
            rule.ok_or_else(|| AffError::Configuration(format!("rule {flag} vanished")))
        }
        _ => Err(AffError::Configuration(format!(
            "expected exactly one rule, found {}",
            flags.len()
        ))),
    }
}
