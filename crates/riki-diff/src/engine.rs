//! Character-level diff between two page versions.
//!
//! The engine trims the common prefix and suffix, then aligns the remaining
//! middle with a longest-common-subsequence table. When the table would be
//! too large it switches to the `similar` crate's linear-space Myers
//! algorithm. Both paths produce a shortest edit script.

use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag};
use tracing::debug;

use crate::script::{EditOp, EditScript};

/// Default bound on LCS table cells (`old_len * new_len` after trimming).
pub const DEFAULT_MAX_TABLE_CELLS: usize = 4_000_000;

/// Which alignment algorithm to use for the untrimmed middle section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStrategy {
    /// LCS table when it fits in `max_table_cells`, Myers otherwise.
    #[default]
    Auto,
    /// Always build the full LCS table.
    Table,
    /// Always use linear-space Myers.
    Myers,
}

/// Configuration for [`DiffEngine`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffConfig {
    pub strategy: DiffStrategy,
    /// Largest LCS table [`DiffStrategy::Auto`] will build.
    pub max_table_cells: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            strategy: DiffStrategy::Auto,
            max_table_cells: DEFAULT_MAX_TABLE_CELLS,
        }
    }
}

/// Computes shortest edit scripts between two texts.
///
/// The output is deterministic. When several shortest scripts exist, equal
/// characters are kept rather than deleted and re-inserted, and deletions
/// are placed before insertions.
#[derive(Clone, Debug, Default)]
pub struct DiffEngine {
    config: DiffConfig,
}

impl DiffEngine {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compute the edit script transforming `old` into `new`.
    pub fn diff(&self, old: &str, new: &str) -> EditScript {
        let old: Vec<char> = old.chars().collect();
        let new: Vec<char> = new.chars().collect();

        let prefix = old
            .iter()
            .zip(&new)
            .take_while(|(a, b)| a == b)
            .count();
        let suffix = old[prefix..]
            .iter()
            .rev()
            .zip(new[prefix..].iter().rev())
            .take_while(|(a, b)| a == b)
            .count();

        let old_mid = &old[prefix..old.len() - suffix];
        let new_mid = &new[prefix..new.len() - suffix];

        let mut script = EditScript::with_capacity(old.len().max(new.len()));
        script.keep_str(&old[..prefix]);

        if old_mid.is_empty() {
            new_mid
                .iter()
                .for_each(|&c| script.push(EditOp::Insert(c)));
        } else if new_mid.is_empty() {
            old_mid
                .iter()
                .for_each(|&c| script.push(EditOp::Delete(c)));
        } else {
            let middle = match self.choose(old_mid.len(), new_mid.len()) {
                DiffStrategy::Myers => myers_align(old_mid, new_mid),
                _ => table_align(old_mid, new_mid),
            };
            middle.iter().for_each(|&op| script.push(op));
        }

        script.keep_str(&old[old.len() - suffix..]);
        script
    }

    fn choose(&self, old_len: usize, new_len: usize) -> DiffStrategy {
        match self.config.strategy {
            DiffStrategy::Auto => {
                let cells = old_len.saturating_mul(new_len);
                let strategy = if cells <= self.config.max_table_cells {
                    DiffStrategy::Table
                } else {
                    DiffStrategy::Myers
                };
                debug!(old_len, new_len, cells, ?strategy, "diff strategy selected");
                strategy
            }
            forced => forced,
        }
    }
}

/// Diff two texts with the default configuration.
pub fn diff_texts(old: &str, new: &str) -> EditScript {
    DiffEngine::default().diff(old, new)
}

/// Quadratic LCS alignment.
///
/// `lcs[i][j]` holds the LCS length of `old[i..]` and `new[j..]`, so the
/// script can be read off front to back.
fn table_align(old: &[char], new: &[char]) -> EditScript {
    let (n, m) = (old.len(), new.len());
    let width = m + 1;
    let mut lcs = vec![0u32; (n + 1) * width];

    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * width + j] = if old[i] == new[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            ops.push(EditOp::Keep(old[i]));
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            ops.push(EditOp::Delete(old[i]));
            i += 1;
        } else {
            ops.push(EditOp::Insert(new[j]));
            j += 1;
        }
    }
    ops.extend(old[i..].iter().map(|&c| EditOp::Delete(c)));
    ops.extend(new[j..].iter().map(|&c| EditOp::Insert(c)));

    EditScript::from_ops(ops)
}

/// Linear-space Myers alignment via `similar`.
fn myers_align(old: &[char], new: &[char]) -> EditScript {
    let diff_ops = similar::capture_diff_slices(Algorithm::Myers, old, new);
    let ops = diff_ops.iter().flat_map(|op| {
        op.iter_changes(old, new).map(|change| match change.tag() {
            ChangeTag::Equal => EditOp::Keep(change.value()),
            ChangeTag::Delete => EditOp::Delete(change.value()),
            ChangeTag::Insert => EditOp::Insert(change.value()),
        })
    });
    EditScript::from_ops(ops)
}
