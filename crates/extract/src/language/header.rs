use crate::consts::{HEADER_LANGUAGE_SPLIT_REGEX, NON_ALPHABETIC_REGEX};
use crate::models::LanguageTag;
use std::collections::BTreeSet;

const LANGUAGE_PREFIX: &str = "Language:";
const HEADER_TERMINATOR: &str = "***";

/// Scans the header of a plain-text work for a `Language:` line.
///
/// Stops at the first line starting with `***` (the start-of-text marker), so
/// a `Language:` line in the body of the work is never considered. Returns an
/// empty set when the header declares nothing usable.
pub fn header_languages<I, S>(lines: I) -> BTreeSet<LanguageTag>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for line in lines {
        let line = line.as_ref().trim();
        if line.starts_with(LANGUAGE_PREFIX) {
            return parse_language_line(line);
        }
        if line.starts_with(HEADER_TERMINATOR) {
            break;
        }
    }
    BTreeSet::new()
}

/// Splits a `Language: …` line into lower-cased alphabetic tags.
///
/// Separators are commas, ampersands, the words "and"/"with", whitespace and
/// slashes. Only the text between the first and second colon is considered.
pub fn parse_language_line(line: &str) -> BTreeSet<LanguageTag> {
    let Some(value) = line.split(':').nth(1) else {
        return BTreeSet::new();
    };
    let value = value.trim().to_lowercase();
    HEADER_LANGUAGE_SPLIT_REGEX
        .split(&value)
        .map(|token| NON_ALPHABETIC_REGEX.replace_all(token, ""))
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tags(set: BTreeSet<LanguageTag>) -> Vec<String> {
        set.into_iter().map(|t| t.to_string()).collect()
    }

    #[rstest]
    #[case("Language: English", vec!["english"])]
    #[case("Language: English, French", vec!["english", "french"])]
    #[case("Language: English and French", vec!["english", "french"])]
    #[case("Language: Latin & Greek", vec!["greek", "latin"])]
    #[case("Language: German/English", vec!["english", "german"])]
    #[case("Language: Dutch with English translation", vec!["dutch", "english", "translation"])]
    #[case("Language: Old-English", vec!["oldenglish"])]
    #[case("Language: Scandinavian", vec!["scandinavian"])]
    #[case("Language: Mandarin and Cantonese", vec!["cantonese", "mandarin"])]
    #[case("Language:", vec![])]
    fn test_parse_language_line(#[case] line: &str, #[case] expected: Vec<&str>) {
        assert_eq!(tags(parse_language_line(line)), expected);
    }

    #[test]
    fn finds_language_in_header() {
        let text = "The Project Gutenberg EBook of Something\n\nTitle: Something\nLanguage: French\n\n*** START OF THIS PROJECT GUTENBERG EBOOK ***\n";
        assert_eq!(tags(header_languages(text.lines())), vec!["french"]);
    }

    #[test]
    fn ignores_language_after_terminator() {
        let text = "Title: Something\n*** START ***\nLanguage: French\n";
        assert!(header_languages(text.lines()).is_empty());
    }

    #[test]
    fn indented_lines_are_trimmed() {
        let lines = ["   Language: Spanish   "];
        assert_eq!(tags(header_languages(lines)), vec!["spanish"]);
    }
}
