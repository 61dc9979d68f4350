//! Edit scripts: the output of the diff engine and the input of the renderer.

use serde::{Deserialize, Serialize};

/// A single edit operation over one character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditOp {
    /// The character is present in both old and new text.
    Keep(char),
    /// The character was added in the new text.
    Insert(char),
    /// The character was removed from the old text.
    Delete(char),
}

impl EditOp {
    /// The character this operation carries.
    pub fn unit(&self) -> char {
        match *self {
            Self::Keep(c) | Self::Insert(c) | Self::Delete(c) => c,
        }
    }

    pub fn kind(&self) -> RunKind {
        match self {
            Self::Keep(_) => RunKind::Keep,
            Self::Insert(_) => RunKind::Insert,
            Self::Delete(_) => RunKind::Delete,
        }
    }
}

/// An ordered sequence of [`EditOp`]s transforming one text into another.
///
/// Within every stretch between two `Keep`s, deletions come before
/// insertions. [`crate::DiffEngine`] always produces scripts in this form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ops: Vec::with_capacity(capacity),
        }
    }

    /// Build a script from raw operations, moving deletions ahead of
    /// insertions inside each change region.
    pub fn from_ops(ops: impl IntoIterator<Item = EditOp>) -> Self {
        let mut script = Self::new();
        let mut deleted = Vec::new();
        let mut inserted = Vec::new();

        for op in ops {
            match op {
                EditOp::Delete(_) => deleted.push(op),
                EditOp::Insert(_) => inserted.push(op),
                EditOp::Keep(_) => {
                    script.ops.append(&mut deleted);
                    script.ops.append(&mut inserted);
                    script.ops.push(op);
                }
            }
        }
        script.ops.append(&mut deleted);
        script.ops.append(&mut inserted);
        script
    }

    pub fn push(&mut self, op: EditOp) {
        self.ops.push(op);
    }

    pub(crate) fn keep_str(&mut self, text: &[char]) {
        self.ops.extend(text.iter().copied().map(EditOp::Keep));
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EditOp> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns `true` if the script contains only `Keep` operations.
    pub fn is_identity(&self) -> bool {
        self.ops.iter().all(|op| matches!(op, EditOp::Keep(_)))
    }

    /// Number of inserted characters.
    pub fn inserted(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, EditOp::Insert(_)))
            .count()
    }

    /// Number of deleted characters.
    pub fn deleted(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, EditOp::Delete(_)))
            .count()
    }

    /// Reconstruct the old text (Keep + Delete).
    pub fn old_text(&self) -> String {
        self.ops
            .iter()
            .filter(|op| !matches!(op, EditOp::Insert(_)))
            .map(EditOp::unit)
            .collect()
    }

    /// Reconstruct the new text (Keep + Insert).
    pub fn new_text(&self) -> String {
        self.ops
            .iter()
            .filter(|op| !matches!(op, EditOp::Delete(_)))
            .map(EditOp::unit)
            .collect()
    }

    /// Group consecutive operations of the same kind.
    pub fn runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for op in &self.ops {
            match runs.last_mut() {
                Some(run) if run.kind == op.kind() => run.text.push(op.unit()),
                _ => runs.push(Run {
                    kind: op.kind(),
                    text: op.unit().to_string(),
                }),
            }
        }
        runs
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a EditOp;
    type IntoIter = std::slice::Iter<'a, EditOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Kind of a [`Run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunKind {
    Keep,
    Insert,
    Delete,
}

/// A maximal stretch of same-kind operations, as text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub kind: RunKind,
    pub text: String,
}
