//! JSON snapshot files for page histories.
//!
//! The history engine itself works purely in memory. Durable storage is a
//! separate, explicit step: each page's history is written to
//! `<dir>/<page>.history.json`, with `/` in nested page slugs encoded as `~`.
//! Files are replaced atomically (temp file + rename) so a crash never leaves
//! a half-written snapshot behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use riki_types::PageSlug;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::entry::Entry;
use crate::error::{HistoryError, HistoryResult};
use crate::history::History;
use crate::memory::InMemoryHistoryStore;
use crate::traits::HistoryStore;

const SNAPSHOT_SUFFIX: &str = ".history.json";

/// On-disk form of a page history. Entries are stored oldest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub page: PageSlug,
    pub entries: Vec<Entry>,
}

impl From<&History> for HistorySnapshot {
    fn from(history: &History) -> Self {
        Self {
            page: history.page().clone(),
            entries: history.oldest_first().cloned().collect(),
        }
    }
}

impl TryFrom<HistorySnapshot> for History {
    type Error = HistoryError;

    fn try_from(snapshot: HistorySnapshot) -> HistoryResult<Self> {
        History::from_entries(snapshot.page, snapshot.entries)
    }
}

/// Path of the snapshot file for `page` inside `dir`.
pub fn snapshot_path(dir: &Path, page: &PageSlug) -> PathBuf {
    let stem = page.segments().collect::<Vec<_>>().join("~");
    dir.join(format!("{stem}{SNAPSHOT_SUFFIX}"))
}

/// Write one page's history to `dir`, replacing any previous snapshot.
pub fn save_page(dir: &Path, history: &History) -> HistoryResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = snapshot_path(dir, history.page());
    let json = serde_json::to_vec_pretty(&HistorySnapshot::from(history))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&json)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| HistoryError::Io(e.error))?;
    Ok(path)
}

/// Write every page in `store` to `dir`. Returns the number of pages written.
pub fn save_all(dir: &Path, store: &dyn HistoryStore) -> HistoryResult<usize> {
    let mut written = 0;
    for page in store.pages()? {
        if let Some(history) = store.history(&page)? {
            save_page(dir, &history)?;
            written += 1;
        }
    }
    info!(dir = %dir.display(), pages = written, "history snapshots saved");
    Ok(written)
}

/// Load every snapshot in `dir` into a new in-memory store.
///
/// A missing directory yields an empty store. Files that cannot be read or
/// parsed are skipped with a warning.
pub fn load_dir(dir: &Path) -> HistoryResult<InMemoryHistoryStore> {
    if !dir.exists() {
        info!(dir = %dir.display(), "no history snapshot directory; starting empty");
        return Ok(InMemoryHistoryStore::new());
    }

    let mut histories = Vec::new();
    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        let is_snapshot = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(SNAPSHOT_SUFFIX));
        if !is_snapshot {
            continue;
        }
        match load_file(&path) {
            Ok(history) => histories.push(history),
            Err(err) => warn!("skipping unreadable snapshot {}: {err}", path.display()),
        }
    }

    info!(dir = %dir.display(), pages = histories.len(), "history snapshots loaded");
    Ok(InMemoryHistoryStore::from_histories(histories))
}

fn load_file(path: &Path) -> HistoryResult<History> {
    let bytes = fs::read(path)?;
    let snapshot: HistorySnapshot = serde_json::from_slice(&bytes)?;
    History::try_from(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use riki_types::{EditTimestamp, EditorId};

    fn page(name: &str) -> PageSlug {
        PageSlug::parse(name).unwrap()
    }

    fn editor(name: &str) -> EditorId {
        EditorId::new(name).unwrap()
    }

    fn ts(millis: u64) -> EditTimestamp {
        EditTimestamp::new(millis, 0)
    }

    #[test]
    fn nested_slug_path_encoding() {
        let path = snapshot_path(Path::new("/data"), &page("docs/intro"));
        assert_eq!(path, PathBuf::from("/data/docs~intro.history.json"));
    }

    #[test]
    fn save_and_load_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryHistoryStore::new();
        let home = page("home");
        let nested = page("docs/intro");
        store
            .record(&home, "hello world".into(), editor("alice"), ts(1))
            .unwrap();
        store
            .record(&home, "hello brave world".into(), editor("bob"), ts(2))
            .unwrap();
        store
            .record(&nested, "intro".into(), editor("carol"), ts(5))
            .unwrap();

        assert_eq!(save_all(dir.path(), &store).unwrap(), 2);

        let loaded = load_dir(dir.path()).unwrap();
        assert_eq!(loaded.pages().unwrap(), vec![nested.clone(), home.clone()]);
        assert_eq!(
            loaded.history(&home).unwrap(),
            store.history(&home).unwrap()
        );
        let pred = loaded.predecessor_of(&home, ts(2)).unwrap().unwrap();
        assert_eq!(pred.editor().as_str(), "alice");
    }

    #[test]
    fn save_page_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::new(page("home"));
        history.record("v1", editor("x"), ts(1)).unwrap();
        save_page(dir.path(), &history).unwrap();
        history.record("v2", editor("x"), ts(2)).unwrap();
        let path = save_page(dir.path(), &history).unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn missing_dir_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_dir(&dir.path().join("absent")).unwrap();
        assert!(store.pages().unwrap().is_empty());
    }

    #[test]
    fn corrupt_snapshot_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::new(page("good"));
        history.record("ok", editor("x"), ts(1)).unwrap();
        save_page(dir.path(), &history).unwrap();
        fs::write(dir.path().join("bad.history.json"), b"{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let store = load_dir(dir.path()).unwrap();
        assert_eq!(store.pages().unwrap(), vec![page("good")]);
    }

    #[test]
    fn snapshot_with_duplicate_timestamps_is_rejected() {
        let snapshot = HistorySnapshot {
            page: page("home"),
            entries: vec![
                Entry::new(ts(1), "a", editor("x")),
                Entry::new(ts(1), "b", editor("x")),
            ],
        };
        assert!(matches!(
            History::try_from(snapshot),
            Err(HistoryError::DuplicateTimestamp { .. })
        ));
    }
}
