//! Decoding of Newick node labels into name, common name and OTT id.

use crate::newick::defs::{COMMON_NAME_SEPARATOR, OTT_MARKER, UNDERSCORE_REPLACEMENT};

/// The parts of a node label.
///
/// A raw label such as `Homo_sapiens_ott770315-Human` is decoded as follows:
/// 1. Underscores become spaces: `Homo sapiens ott770315-Human`
/// 2. The label is split at its first hyphen. The part before it (minus a
///    single trailing space) is the name candidate, the part after it the
///    common name. Without a hyphen, both are the whole decoded label.
/// 3. A trailing ` ott` + digits suffix of the name candidate is moved to `ott`.
///
/// # Example
/// ```
/// use taxatree::newick::label::ParsedLabel;
///
/// let label = ParsedLabel::parse("Homo_sapiens_ott770315-Human");
/// assert_eq!(label.name, "Homo sapiens");
/// assert_eq!(label.common, "Human");
/// assert_eq!(label.ott.as_deref(), Some("770315"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLabel {
    pub name: String,
    pub common: String,
    pub ott: Option<String>,
}

impl ParsedLabel {
    /// Decodes a raw label token.
    pub fn parse(raw: &str) -> Self {
        let decoded = raw.replace('_', UNDERSCORE_REPLACEMENT);

        let (name_candidate, common) = match decoded.find(COMMON_NAME_SEPARATOR) {
            Some(i) => {
                let before = &decoded[..i];
                let after = &decoded[i + COMMON_NAME_SEPARATOR.len_utf8()..];
                (before.strip_suffix(' ').unwrap_or(before), after)
            }
            None => (decoded.as_str(), decoded.as_str()),
        };

        let (name, ott) = split_ott_suffix(name_candidate);

        ParsedLabel {
            name: name.to_string(),
            common: common.to_string(),
            ott: ott.map(str::to_string),
        }
    }
}

/// Splits a trailing ` ott<digits>` off `name`.
///
/// # Returns
/// The name without the suffix and the digits, or `name` unchanged and `None`
/// if there is no such suffix (at least one digit is required).
fn split_ott_suffix(name: &str) -> (&str, Option<&str>) {
    let digits_start = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits_start == name.len() {
        return (name, None);
    }

    match name[..digits_start].strip_suffix(OTT_MARKER) {
        Some(stripped) => (stripped, Some(&name[digits_start..])),
        None => (name, None),
    }
}
