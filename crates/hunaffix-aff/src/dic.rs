// Dictionary reader: `word/flags morph...` lines as a pull iterator

use std::iter::Enumerate;
use std::str::Lines;

use hunaffix_core::DictionaryEntry;

use crate::AffError;
use crate::flags::FlagType;

/// Parse one dictionary line.
///
/// The word ends at the first unescaped `/` or at whitespace; `\/` stands
/// for a literal slash. Flags run up to the next whitespace and the rest
/// of the line holds morphological fields.
pub fn parse_dictionary_line(
    line_number: usize,
    line: &str,
    flag_type: FlagType,
) -> Result<DictionaryEntry, AffError> {
    let line = line.trim_end();
    let mut word = String::new();
    let mut chars = line.char_indices().peekable();
    let mut flags_start = None;
    let mut rest_start = line.len();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' if matches!(chars.peek(), Some((_, '/'))) => {
                word.push('/');
                chars.next();
            }
            '/' if !word.is_empty() => {
                flags_start = Some(i + 1);
                break;
            }
            c if c.is_whitespace() => {
                rest_start = i;
                break;
            }
            c => word.push(c),
        }
    }

    if word.is_empty() {
        return Err(AffError::Syntax {
            line: line_number,
            message: "dictionary line without a word".to_string(),
        });
    }

    let flags = match flags_start {
        Some(start) => {
            let end = line[start..]
                .find(char::is_whitespace)
                .map_or(line.len(), |p| p + start);
            rest_start = end;
            flag_type.split(&line[start..end])?
        }
        None => Vec::new(),
    };
    let morph_fields = line[rest_start..]
        .split_whitespace()
        .map(str::to_string)
        .collect();

    Ok(DictionaryEntry::new(word, flags, morph_fields))
}

/// Iterator over the entries of a dictionary text.
///
/// Yields `(line_number, entry)` pairs (1-based line numbers). A leading
/// line holding only the entry count, blank lines and comment lines
/// (starting with `#` or a tab) are skipped. Malformed lines yield an
/// [`AffError::Syntax`] carrying their line number, and iteration
/// continues with the next line.
pub struct DictionaryReader<'a> {
    lines: Enumerate<Lines<'a>>,
    flag_type: FlagType,
}

impl<'a> DictionaryReader<'a> {
    pub fn new(text: &'a str, flag_type: FlagType) -> Self {
        Self {
            lines: text.lines().enumerate(),
            flag_type,
        }
    }
}

impl Iterator for DictionaryReader<'_> {
    type Item = Result<(usize, DictionaryEntry), AffError>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, raw) in self.lines.by_ref() {
            let line = raw.trim_start_matches('\u{FEFF}');
            if line.trim().is_empty() || line.starts_with('#') || line.starts_with('\t') {
                continue;
            }
            if index == 0 && line.trim().chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let line_number = index + 1;
            return Some(
                parse_dictionary_line(line_number, line, self.flag_type)
                    .map(|entry| (line_number, entry))
                    .map_err(|e| match e {
                        AffError::Syntax { .. } => e,
                        other => AffError::Syntax {
                            line: line_number,
                            message: other.to_string(),
                        },
                    }),
            );
        }
        None
    }
}
