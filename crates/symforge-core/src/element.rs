//! Shared metadata types for library elements.
//!
//! Every reusable library element carries a semantic version, an author and
//! localized name/description/keywords. The locale maps always contain the
//! default locale so lookups never fail, and they are BTree-backed so
//! serialization order is deterministic.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use symforge_sexpr::ParseError;

/// Locale every element must provide texts for.
pub const DEFAULT_LOCALE: &str = "en_US";

/// Dotted numeric version of a library element, e.g. `0.1` or `2.4.1`.
///
/// Trailing zero segments are normalized away on construction, so `1.0.0`
/// and `1.0` compare equal and serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    segments: Vec<u32>,
}

impl Version {
    /// At most this many dotted segments.
    pub const MAX_SEGMENTS: usize = 10;

    pub fn new(segments: Vec<u32>) -> Result<Self, ParseError> {
        if segments.is_empty() || segments.len() > Self::MAX_SEGMENTS {
            return Err(ParseError::invalid_value(
                "version",
                segments
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join("."),
            ));
        }
        let mut segments = segments;
        while segments.len() > 1 && segments.last() == Some(&0) {
            segments.pop();
        }
        Ok(Version { segments })
    }

    pub fn segments(&self) -> &[u32] {
        &self.segments
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::invalid_value("version", text);
        let segments = text
            .split('.')
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                segment.parse::<u32>().map_err(|_| invalid())
            })
            .collect::<Result<Vec<u32>, ParseError>>()?;
        Version::new(segments).map_err(|_| invalid())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
            first = false;
        }
        Ok(())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                std::cmp::Ordering::Equal => continue,
                order => return order,
            }
        }
        std::cmp::Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A validated, human-readable element name.
///
/// Trimmed, non-empty, at most 100 characters, no control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementName(String);

impl ElementName {
    pub const MAX_CHARS: usize = 100;

    pub fn new(name: impl Into<String>) -> Result<Self, ParseError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed.chars().count() > Self::MAX_CHARS
            || trimmed.chars().any(char::is_control)
        {
            return Err(ParseError::invalid_value("element name", name));
        }
        Ok(ElementName(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ElementName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locale → validated name map; the default locale is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedNames {
    map: BTreeMap<String, ElementName>,
}

impl LocalizedNames {
    pub fn new(default: ElementName) -> Self {
        let mut map = BTreeMap::new();
        map.insert(DEFAULT_LOCALE.to_string(), default);
        LocalizedNames { map }
    }

    pub fn insert(&mut self, locale: impl Into<String>, name: ElementName) {
        self.map.insert(locale.into(), name);
    }

    /// Name for the locale, falling back to the default locale.
    pub fn get(&self, locale: &str) -> &ElementName {
        self.map.get(locale).unwrap_or_else(|| self.default_name())
    }

    pub fn default_name(&self) -> &ElementName {
        &self.map[DEFAULT_LOCALE]
    }

    /// Entries in deterministic (lexical locale) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElementName)> {
        self.map.iter().map(|(locale, name)| (locale.as_str(), name))
    }
}

/// Locale → free-text map; the default locale is always present (possibly
/// with an empty string).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedText {
    map: BTreeMap<String, String>,
}

impl LocalizedText {
    pub fn new(default: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(DEFAULT_LOCALE.to_string(), default.into());
        LocalizedText { map }
    }

    pub fn insert(&mut self, locale: impl Into<String>, text: impl Into<String>) {
        self.map.insert(locale.into(), text.into());
    }

    pub fn get(&self, locale: &str) -> &str {
        self.map
            .get(locale)
            .unwrap_or_else(|| &self.map[DEFAULT_LOCALE])
    }

    pub fn default_text(&self) -> &str {
        &self.map[DEFAULT_LOCALE]
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map
            .iter()
            .map(|(locale, text)| (locale.as_str(), text.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse_and_display() {
        let version: Version = "0.1".parse().unwrap();
        assert_eq!(version.to_string(), "0.1");
        assert_eq!(version.segments(), &[0, 1]);
    }

    #[test]
    fn test_version_normalizes_trailing_zeros() {
        let a: Version = "1.0.0".parse().unwrap();
        let b: Version = "1".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "1");
    }

    #[test]
    fn test_version_ordering() {
        let parse = |s: &str| s.parse::<Version>().unwrap();
        assert!(parse("0.2") > parse("0.1.9"));
        assert!(parse("1.0") < parse("1.0.1"));
        assert_eq!(parse("2"), parse("2.0"));
    }

    #[test]
    fn test_version_rejects_malformed() {
        assert!("".parse::<Version>().is_err());
        assert!("1..2".parse::<Version>().is_err());
        assert!("1.a".parse::<Version>().is_err());
        assert!("-1.0".parse::<Version>().is_err());
        assert!("1.2.3.4.5.6.7.8.9.10.11".parse::<Version>().is_err());
    }

    #[test]
    fn test_element_name_validation() {
        assert_eq!(ElementName::new("  Op-Amp  ").unwrap().as_str(), "Op-Amp");
        assert!(ElementName::new("").is_err());
        assert!(ElementName::new("   ").is_err());
        assert!(ElementName::new("bad\nname").is_err());
        assert!(ElementName::new("x".repeat(101)).is_err());
    }

    #[test]
    fn test_localized_fallback() {
        let mut names = LocalizedNames::new(ElementName::new("Resistor").unwrap());
        names.insert("de_DE", ElementName::new("Widerstand").unwrap());
        assert_eq!(names.get("de_DE").as_str(), "Widerstand");
        assert_eq!(names.get("fr_FR").as_str(), "Resistor");

        let text = LocalizedText::new("");
        assert_eq!(text.get("ja_JP"), "");
    }

    #[test]
    fn test_localized_iteration_is_sorted() {
        let mut text = LocalizedText::new("default");
        text.insert("it_IT", "ciao");
        text.insert("de_DE", "hallo");
        let locales: Vec<&str> = text.iter().map(|(locale, _)| locale).collect();
        assert_eq!(locales, vec!["de_DE", "en_US", "it_IT"]);
    }
}
