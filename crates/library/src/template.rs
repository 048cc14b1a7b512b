//! Path templating for the organized target tree.
//!
//! Converts a [`Placement`] into a relative target path using a
//! user-configured [upon] template. The template syntax follows upon's
//! Mustache-like conventions (`{{ variable }}`, `{{ value|formatter }}`),
//! extended with two helpers:
//!
//! - **`slug`**: converts strings to URL-safe slugs, stripping quotation marks
//!   first to avoid leading or trailing hyphens.
//! - **`truncate`**: truncates strings to a maximum byte length at a character
//!   boundary, usable as either `truncate(value, n)` or `{{ value|truncate: n }}`.
//!
//! # Template Variables
//!
//! | Variable   | Type             | Description                                   |
//! |------------|------------------|-----------------------------------------------|
//! | `language` | `String`         | Language tag the file is filed under          |
//! | `format`   | `String`         | `txt`, `epub` or `pdf`                        |
//! | `basename` | `String`         | File name of the source                       |
//! | `id`       | `Option<u64>`    | Work identifier (absent for reloaded listings) |
//! | `title`    | `Option<String>` | Title from the master index                   |
//!
//! # Example
//!
//! ```
//! use gutcat_library::{PathGenerator, Placement};
//! use std::path::PathBuf;
//!
//! let placement = Placement {
//!     language: "it".parse().unwrap(),
//!     format: "txt".parse().unwrap(),
//!     source: PathBuf::from("/corpus/1/0/0/1000/1000.txt"),
//!     identifier: Some(1000),
//!     title: Some("Divine Comedy".to_string()),
//! };
//! let generator: PathGenerator = "{{ language }}/{{ title|slug }}/{{ basename }}".parse().unwrap();
//! assert_eq!(generator.generate(&placement).unwrap(), "it/divine-comedy/1000.txt");
//! ```

use crate::error::{Error, ErrorKind, Result};
use crate::listing::Placement;
use exn::{OptionExt, ResultExt};
use gutcat_storage::validate_path;
use std::str::FromStr;
use tracing::instrument;
use upon::{Engine, Template};

/// The `<language>/<format>/<basename>` layout.
pub const DEFAULT_TEMPLATE: &str = "{{ language }}/{{ format }}/{{ basename }}";

/// Generates target paths from [`Placement`]s and a template string.
///
/// Constructed via [`FromStr`], which compiles the template eagerly so that
/// syntax errors surface at creation time rather than at render time.
///
/// Generated paths are normalized (segments trimmed, empty segments dropped)
/// and validated by [`gutcat_storage::validate_path`] so they cannot leave
/// the target root.
pub struct PathGenerator {
    engine: Engine<'static>,
    template: Template<'static>,
}
impl FromStr for PathGenerator {
    type Err = Error;

    /// Registers the `slug` formatter and `truncate` function, then compiles
    /// the template. Returns [`ErrorKind::Template`] on a syntax error.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(s.to_string()).or_raise(|| ErrorKind::Template)?;
        Ok(Self { engine, template })
    }
}
impl std::fmt::Debug for PathGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathGenerator").finish_non_exhaustive()
    }
}
impl PathGenerator {
    /// Renders the template for one placement, returning a normalized path
    /// relative to the target root.
    #[instrument(skip_all, fields(source = %placement.source.display()))]
    pub fn generate(&self, placement: &Placement) -> Result<String> {
        let parameters = Self::parameters(placement)?;
        let path = self
            .template
            .render(&self.engine, parameters)
            .to_string()
            .or_raise(|| ErrorKind::Template)?;
        Self::normalize(path)
    }

    /// Trims each path segment, drops empty ones, then validates via
    /// [`gutcat_storage::validate_path`].
    fn normalize(s: impl Into<String>) -> Result<String> {
        let path = s
            .into()
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        validate_path(&path).or_raise(|| ErrorKind::Template).and_then(|p| {
            p.to_str().map(|p| p.to_string())
            // Infallible: input was String, so won't fail. Here for completeness.
            .ok_or_raise(|| ErrorKind::Template)
        })
    }

    fn parameters(placement: &Placement) -> Result<upon::Value> {
        let basename = placement.basename().ok_or_raise(|| ErrorKind::Template)?;
        Ok(upon::value! {
            language: placement.language.as_str(),
            format: placement.format.extension(),
            basename: basename,
            id: placement.identifier,
            title: placement.title.as_deref(),
        })
    }
}

/// Custom [`upon`] extensions for path-safe string manipulation.
mod addons {
    use rslug::slugify;
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    /// Converts strings to URL-safe slugs after stripping quotation marks.
    fn slug_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => {
                let marks = [
                    '\u{0027}', '\u{0022}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{201E}', '\u{201B}',
                    '\u{0060}', '\u{00AB}', '\u{00BB}', '\u{2039}', '\u{203A}',
                ];
                let stripped: String = s.chars().filter(|c| !marks.contains(c)).collect();
                write!(f, "{}", slugify!(&stripped))?
            },
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> String {
        s[..s.floor_char_boundary(max_bytes)].to_string()
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("slug", slug_formatter);
        engine.add_function("truncate", truncate_to_char_boundary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gutcat_extract::models::Format;
    use rstest::rstest;
    use std::path::PathBuf;

    fn placement(source: &str, identifier: Option<u64>, title: Option<&str>) -> Placement {
        Placement {
            language: "en".parse().unwrap(),
            format: Format::from_path(source).unwrap(),
            source: PathBuf::from(source),
            identifier,
            title: title.map(str::to_string),
        }
    }

    #[test]
    fn default_layout() {
        let generator: PathGenerator = DEFAULT_TEMPLATE.parse().unwrap();
        let path = generator.generate(&placement("/corpus/1/0/0/1000/1000.txt", Some(1000), None)).unwrap();
        assert_eq!(path, "en/txt/1000.txt");
    }

    #[test]
    fn slug_strips_quotes() {
        let generator: PathGenerator = "{{ title|slug }}/{{ basename }}".parse().unwrap();
        let p = placement("/c/1.txt", Some(1), Some("\"Hello\" World's 'Test'"));
        assert_eq!(generator.generate(&p).unwrap(), "hello-worlds-test/1.txt");
    }

    #[rstest]
    #[case("{{ truncate(title, 10)|slug }}")]
    #[case("{{ title|truncate: 10|slug }}")]
    fn truncates_titles(#[case] template: &str) {
        let generator: PathGenerator = template.parse().unwrap();
        let p = placement("/c/1.txt", Some(1), Some("A Very Long Title Indeed"));
        assert_eq!(generator.generate(&p).unwrap(), "a-very-lon");
    }

    #[test]
    fn optional_identifier() {
        let generator: PathGenerator = "{{ language }}/{% if id %}{{ id }}-{% endif %}{{ basename }}".parse().unwrap();
        assert_eq!(generator.generate(&placement("/c/7.txt", Some(7), None)).unwrap(), "en/7-7.txt");
        assert_eq!(generator.generate(&placement("/c/7.txt", None, None)).unwrap(), "en/7.txt");
    }

    #[test]
    fn missing_title_collapses_segment() {
        let generator: PathGenerator = "{{ language }}/{{ title }}/{{ basename }}".parse().unwrap();
        assert_eq!(generator.generate(&placement("/c/7.txt", Some(7), None)).unwrap(), "en/7.txt");
    }

    #[rstest]
    #[case("../{{ basename }}")]
    #[case("{{ language }}/../../{{ basename }}")]
    fn rejects_escaping_paths(#[case] template: &str) {
        let generator: PathGenerator = template.parse().unwrap();
        let err = generator.generate(&placement("/c/1.txt", Some(1), None)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Template));
    }

    #[test]
    fn invalid_syntax_fails_at_construction() {
        let err = "{{ language ".parse::<PathGenerator>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Template));
    }
}
