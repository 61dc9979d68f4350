use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Maximum length of an editor identity, in characters.
pub const MAX_EDITOR_LEN: usize = 64;

/// Identity of the user who made an edit.
///
/// Always passed explicitly to the history engine; there is no ambient
/// "current user". Surrounding whitespace is trimmed, and the result must be
/// non-empty, at most [`MAX_EDITOR_LEN`] characters, and free of control
/// characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EditorId(String);

impl EditorId {
    /// Validate and wrap an editor name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let raw = name.into();
        let invalid = |reason: &str| TypeError::InvalidEditor {
            input: raw.clone(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if trimmed.chars().count() > MAX_EDITOR_LEN {
            return Err(invalid("too long"));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(invalid("contains control characters"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EditorId> for String {
    fn from(id: EditorId) -> Self {
        id.0
    }
}

impl TryFrom<String> for EditorId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
