//! Page addresses.
//!
//! A slug is what the wiki shows in its URLs: lower-case, `/`-separated
//! segments made of ASCII letters, digits, `_` and `-`. User input is cleaned
//! the way the wiki's URL form cleaned it (trim, spaces to underscores,
//! lower-case, no leading or trailing slash) and then validated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A normalized page address, e.g. `home` or `docs/getting_started`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PageSlug(String);

impl PageSlug {
    /// Clean and validate a page address.
    pub fn parse(input: &str) -> Result<Self, TypeError> {
        let invalid = |reason: String| TypeError::InvalidPageSlug {
            input: input.to_string(),
            reason,
        };

        let cleaned = input
            .trim()
            .replace(' ', "_")
            .to_lowercase()
            .trim_matches('/')
            .to_string();
        if cleaned.is_empty() {
            return Err(invalid("must not be empty".into()));
        }

        for segment in cleaned.split('/') {
            if segment.is_empty() {
                return Err(invalid("empty path segment".into()));
            }
            if segment == "." || segment == ".." {
                return Err(invalid(format!("relative segment {segment:?}")));
            }
            if let Some(bad) = segment
                .chars()
                .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
            {
                return Err(invalid(format!("unsupported character {bad:?}")));
            }
        }

        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the `/`-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl fmt::Display for PageSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PageSlug> for String {
    fn from(slug: PageSlug) -> Self {
        slug.0
    }
}

impl TryFrom<String> for PageSlug {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_like_the_url_form() {
        let slug = PageSlug::parse("  /Getting Started/ ").unwrap();
        assert_eq!(slug.as_str(), "getting_started");
    }

    #[test]
    fn nested_segments() {
        let slug = PageSlug::parse("Docs/Intro-Page").unwrap();
        assert_eq!(slug.as_str(), "docs/intro-page");
        assert_eq!(slug.segments().collect::<Vec<_>>(), vec!["docs", "intro-page"]);
    }

    #[test]
    fn rejects_empty_and_relative() {
        assert!(PageSlug::parse("").is_err());
        assert!(PageSlug::parse("///").is_err());
        assert!(PageSlug::parse("a//b").is_err());
        assert!(PageSlug::parse("a/../b").is_err());
        assert!(PageSlug::parse("./a").is_err());
    }

    #[test]
    fn rejects_special_characters() {
        let err = PageSlug::parse("home?x=1").unwrap_err();
        assert!(matches!(err, TypeError::InvalidPageSlug { .. }));
        assert!(PageSlug::parse("a~b").is_err());
        assert!(PageSlug::parse("café").is_err());
    }

    #[test]
    fn serde_cleans_input() {
        let slug: PageSlug = serde_json::from_str("\"Home\"").unwrap();
        assert_eq!(slug.as_str(), "home");
        assert_eq!(serde_json::to_string(&slug).unwrap(), "\"home\"");
    }
}
