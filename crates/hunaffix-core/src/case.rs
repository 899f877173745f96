// Case classification and compound boundary normalization

/// Classification of character casing within a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseType {
    /// No letters found in the word (only digits, punctuation, etc.).
    NoLetters,
    /// All letters are lowercase: "house".
    Lower,
    /// First letter is uppercase, rest are lowercase: "House".
    Title,
    /// Mixed case that does not fit other patterns: "iPhone", "McDonald".
    Camel,
    /// All letters are uppercase: "NASA".
    Upper,
}

/// Detect the case pattern of a word.
///
/// Non-letter characters are ignored when determining the pattern.
pub fn detect_case(word: &str) -> CaseType {
    let mut chars = word.chars().filter(|c| c.is_alphabetic());
    let Some(first) = chars.next() else {
        return CaseType::NoLetters;
    };

    let mut rest_lower = true;
    let mut all_upper = first.is_uppercase();
    for c in chars {
        if c.is_uppercase() {
            rest_lower = false;
        } else {
            all_upper = false;
        }
    }

    if all_upper {
        CaseType::Upper
    } else if !rest_lower {
        CaseType::Camel
    } else if first.is_uppercase() {
        CaseType::Title
    } else {
        CaseType::Lower
    }
}

/// Apply a case transformation to a word.
///
/// `NoLetters` and `Camel` leave the word unchanged.
pub fn set_case(word: &str, case_type: CaseType) -> String {
    match case_type {
        CaseType::NoLetters | CaseType::Camel => word.to_string(),
        CaseType::Lower => word.to_lowercase(),
        CaseType::Upper => word.to_uppercase(),
        CaseType::Title => {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
                None => String::new(),
            }
        }
    }
}

/// Adapt the case of the next compound component to the one before it.
///
/// A title-case component loses its capital after a lowercase, title or
/// camel component; after an all-uppercase component, lowercase and
/// title components are uppercased. Everything else is kept as written.
pub fn normalize_boundary(previous: &str, next: &str) -> String {
    match (detect_case(previous), detect_case(next)) {
        (CaseType::Lower | CaseType::Title | CaseType::Camel, CaseType::Title) => {
            set_case(next, CaseType::Lower)
        }
        (CaseType::Upper, CaseType::Title | CaseType::Lower) => set_case(next, CaseType::Upper),
        _ => next.to_string(),
    }
}

/// Whether the characters meeting at a compound boundary clash in case.
pub fn boundary_case_clash(previous: &str, next: &str) -> bool {
    match (previous.chars().last(), next.chars().next()) {
        (Some(a), Some(b)) => {
            (a.is_uppercase() && b.is_lowercase()) || (a.is_lowercase() && b.is_uppercase())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- detect_case tests --

    #[test]
    fn detect_no_letters() {
        assert_eq!(detect_case(""), CaseType::NoLetters);
        assert_eq!(detect_case("123"), CaseType::NoLetters);
    }

    #[test]
    fn detect_patterns() {
        assert_eq!(detect_case("house"), CaseType::Lower);
        assert_eq!(detect_case("House"), CaseType::Title);
        assert_eq!(detect_case("NASA"), CaseType::Upper);
        assert_eq!(detect_case("iPhone"), CaseType::Camel);
        assert_eq!(detect_case("McDonald"), CaseType::Camel);
    }

    #[test]
    fn detect_ignores_digits() {
        assert_eq!(detect_case("abc123"), CaseType::Lower);
        assert_eq!(detect_case("A4"), CaseType::Upper);
    }

    #[test]
    fn detect_non_ascii() {
        assert_eq!(detect_case("\u{00C4}iti"), CaseType::Title); // Äiti
        assert_eq!(detect_case("k\u{00E4}vel\u{00F6}"), CaseType::Lower); // kävelö
    }

    // -- set_case tests --

    #[test]
    fn set_case_variants() {
        assert_eq!(set_case("HOUSE", CaseType::Lower), "house");
        assert_eq!(set_case("house", CaseType::Upper), "HOUSE");
        assert_eq!(set_case("hOUSE", CaseType::Title), "House");
        assert_eq!(set_case("iPhone", CaseType::Camel), "iPhone");
    }

    // -- boundary tests --

    #[test]
    fn title_after_lower_is_lowered() {
        assert_eq!(normalize_boundary("foot", "Ball"), "ball");
    }

    #[test]
    fn lower_after_upper_is_raised() {
        assert_eq!(normalize_boundary("NASA", "flug"), "FLUG");
    }

    #[test]
    fn camel_component_is_kept() {
        assert_eq!(normalize_boundary("foot", "iPhone"), "iPhone");
    }

    #[test]
    fn clash_detection() {
        assert!(boundary_case_clash("footB", "all"));
        assert!(!boundary_case_clash("foot", "ball"));
        assert!(!boundary_case_clash("NASA", "FLUG"));
    }
}
