use crate::consts::{ENTRY_LINE_REGEX, LANGUAGE_ANNOTATION_REGEX};
use crate::error::{ErrorKind, Result};

/// A trimmed, non-blank line of the master index and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the source document.
    pub number: usize,
    pub text: &'a str,
}

/// Splits a document into trimmed lines, dropping blank ones.
pub fn tokenize(document: &str) -> Vec<Line<'_>> {
    document
        .lines()
        .enumerate()
        .map(|(i, text)| Line { number: i + 1, text: text.trim() })
        .filter(|line| !line.text.is_empty())
        .collect()
}

/// What an entry-boundary line turned out to describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Shape {
    /// A listed work: title to the left, identifier at the end of the line.
    Entry { identifier: u64, title: String },
    /// A placeholder such as `42850 Not in the Posted Archives`.
    Unlisted(u64),
}

/// Does this line start a new entry?
///
/// Either the line ends in a padded identifier (optionally flagged `C` for
/// copyright), or it mentions the identifier one below the last one parsed.
/// The second test is a heuristic: listings run in descending order, so the
/// next entry usually carries the previous identifier minus one.
pub(crate) fn is_boundary(text: &str, expected: u64) -> bool {
    if ENTRY_LINE_REGEX.is_match(text) {
        return true;
    }
    expected > 1 && text.contains(&(expected - 1).to_string())
}

/// Classifies a boundary line into an entry or an unlisted placeholder.
pub(crate) fn classify(line: Line<'_>) -> Result<Shape> {
    let malformed = || ErrorKind::Malformed {
        line: line.number,
        content: line.text.to_string(),
    };
    let body = line.text.strip_suffix('C').unwrap_or(line.text);
    let title_end = body.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if title_end < body.len() {
        let Ok(identifier) = body[title_end..].parse() else {
            exn::bail!(malformed());
        };
        return Ok(Shape::Entry {
            identifier,
            title: body[..title_end].trim().to_string(),
        });
    }
    // No trailing identifier: take the last run of digits anywhere in the line.
    let Some(run_end) = line.text.rfind(|c: char| c.is_ascii_digit()).map(|i| i + 1) else {
        exn::bail!(malformed());
    };
    let run_start = line.text[..run_end].trim_end_matches(|c: char| c.is_ascii_digit()).len();
    match line.text[run_start..run_end].parse() {
        Ok(identifier) => Ok(Shape::Unlisted(identifier)),
        Err(_) => exn::bail!(malformed()),
    }
}

/// Returns the language named by a `[Language: …]` annotation line.
pub(crate) fn language_annotation(text: &str) -> Option<&str> {
    LANGUAGE_ANNOTATION_REGEX.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(text: &str) -> Line<'_> {
        Line { number: 1, text }
    }

    #[test]
    fn tokenize_trims_and_skips_blanks() {
        let lines = tokenize("  first  \n\n   \nsecond\n");
        assert_eq!(lines, vec![Line { number: 1, text: "first" }, Line { number: 4, text: "second" }]);
    }

    #[rstest]
    #[case("Divine Comedy                              1000", 5, true)]
    #[case("Some Title, by Some Author                 60005C", 5, true)]
    #[case("42850 Not in the Posted Archives", 42_851, true)]
    #[case("42850 Not in the Posted Archives", 100, false)]
    #[case("[Language: Italian]", 1001, false)]
    #[case("Volume 2", 5, false)]
    #[case("anything with a 0 in it", 1, false)]
    fn test_is_boundary(#[case] text: &str, #[case] expected: u64, #[case] boundary: bool) {
        assert_eq!(is_boundary(text, expected), boundary);
    }

    #[rstest]
    #[case("Divine Comedy                              1000", Shape::Entry { identifier: 1000, title: "Divine Comedy".into() })]
    #[case("Copyrighted Work, by Someone     60005C", Shape::Entry { identifier: 60005, title: "Copyrighted Work, by Someone".into() })]
    #[case("12345", Shape::Entry { identifier: 12345, title: String::new() })]
    #[case("42850 Not in the Posted Archives", Shape::Unlisted(42_850))]
    #[case("Number 42850 withdrawn", Shape::Unlisted(42_850))]
    fn test_classify(#[case] text: &str, #[case] expected: Shape) {
        assert_eq!(classify(line(text)).unwrap(), expected);
    }

    #[test]
    fn classify_without_digits_is_malformed() {
        let err = classify(Line { number: 7, text: "No identifier here" }).unwrap_err();
        assert_eq!(
            *err,
            ErrorKind::Malformed {
                line: 7,
                content: "No identifier here".into()
            }
        );
    }

    #[rstest]
    #[case("[Language: Italian]", Some("Italian"))]
    #[case("[Language:   Middle English ]", Some("Middle English"))]
    #[case("[Subtitle: Hell]", None)]
    #[case("Language: Italian", None)]
    fn test_language_annotation(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(language_annotation(text), expected);
    }
}
