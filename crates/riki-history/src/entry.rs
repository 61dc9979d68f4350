use riki_types::{EditTimestamp, EditorId};
use serde::{Deserialize, Serialize};

/// One recorded edit of a page.
///
/// Holds the complete page text at the time of the edit. Fields are only
/// reachable through accessors: an entry handed out by a store is a copy and
/// the stored original never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    timestamp: EditTimestamp,
    content: String,
    editor: EditorId,
}

impl Entry {
    pub fn new(timestamp: EditTimestamp, content: impl Into<String>, editor: EditorId) -> Self {
        Self {
            timestamp,
            content: content.into(),
            editor,
        }
    }

    pub fn timestamp(&self) -> EditTimestamp {
        self.timestamp
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn editor(&self) -> &EditorId {
        &self.editor
    }

    /// Length of the content in characters.
    pub fn content_len(&self) -> usize {
        self.content.chars().count()
    }
}
