//! Submitted-line history and its newline-delimited persistence format.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

/// Ordered log of submitted lines, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    entries: Vec<String>,
}

impl HistoryStore {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Append unconditionally, consecutive duplicates included.
    pub fn append(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read at most `max_lines` most-recent entries from `path`.
    ///
    /// A missing file is an empty history. Blank lines are skipped.
    pub fn load(path: &Path, max_lines: usize) -> io::Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no history file yet");
                return Ok(Self::default());
            }
            Err(err) => return Err(err),
        };
        let lines: Vec<&str> = raw.lines().filter(|line| !line.trim().is_empty()).collect();
        let skip = lines.len().saturating_sub(max_lines);
        let entries: Vec<String> = lines[skip..].iter().map(|s| s.to_string()).collect();
        info!(path = %path.display(), entries = entries.len(), "loaded history");
        Ok(Self { entries })
    }

    /// Overwrite `path` with the `max_lines` most recent non-blank entries.
    ///
    /// Embedded newlines are written as spaces so one entry stays one line.
    /// Blank entries are dropped, matching what `load` would skip.
    pub fn save(path: &Path, max_lines: usize, lines: &[String]) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let kept: Vec<String> = lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.replace(['\r', '\n'], " "))
            .collect();
        let skip = kept.len().saturating_sub(max_lines);
        let mut out = String::new();
        for line in &kept[skip..] {
            out.push_str(line);
            out.push('\n');
        }
        fs::write(path, out)?;
        info!(path = %path.display(), entries = kept.len() - skip, "saved history");
        Ok(())
    }

    /// Cursor one step older. `None` means "not navigating".
    pub(crate) fn older(&self, index: Option<usize>) -> Option<usize> {
        match index {
            None => self.entries.len().checked_sub(1),
            Some(idx) => Some(idx.saturating_sub(1)),
        }
    }

    /// Cursor one step newer; stepping past the newest entry returns `None`.
    pub(crate) fn newer(&self, index: Option<usize>) -> Option<usize> {
        index.and_then(|idx| (idx + 1 < self.entries.len()).then_some(idx + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    fn store(entries: &[&str]) -> HistoryStore {
        HistoryStore::new(entries.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn duplicates_are_kept() {
        let mut history = HistoryStore::default();
        history.append("a");
        history.append("a");
        assert_eq!(history.entries(), &["a".to_string(), "a".to_string()]);
    }

    #[test]
    fn save_keeps_most_recent_entries() {
        let tmp = TestTempDir::new("history-save");
        let path = tmp.child("nested/history");
        let lines: Vec<String> = (1..=5).map(|i| format!("x = {i}")).collect();
        HistoryStore::save(&path, 3, &lines).expect("save history");

        let raw = std::fs::read_to_string(&path).expect("read history");
        assert_eq!(raw, "x = 3\nx = 4\nx = 5\n");
    }

    #[test]
    fn load_clips_and_skips_blank_lines() {
        let tmp = TestTempDir::new("history-load");
        let path = tmp.write_text("history", "a\n\nb\nc\n");
        let history = HistoryStore::load(&path, 2).expect("load history");
        assert_eq!(history.entries(), &["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn missing_file_is_empty_history() {
        let tmp = TestTempDir::new("history-missing");
        let history = HistoryStore::load(&tmp.child("nope"), 10).expect("load history");
        assert!(history.is_empty());
    }

    #[test]
    fn embedded_newlines_are_flattened_on_save() {
        let tmp = TestTempDir::new("history-newline");
        let path = tmp.child("history");
        HistoryStore::save(&path, 10, &["a\nb".to_string()]).expect("save history");
        let history = HistoryStore::load(&path, 10).expect("load history");
        assert_eq!(history.entries(), &["a b".to_string()]);
    }

    #[test]
    fn blank_entries_are_not_persisted() {
        let tmp = TestTempDir::new("history-blank");
        let path = tmp.child("history");
        let lines: Vec<String> = ["a", "   ", "b", "\t", "c"].iter().map(|s| s.to_string()).collect();
        HistoryStore::save(&path, 2, &lines).expect("save history");

        let raw = std::fs::read_to_string(&path).expect("read history");
        assert_eq!(raw, "b\nc\n");
        let history = HistoryStore::load(&path, 10).expect("load history");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn cursor_steps_clamp_at_oldest_and_detach_past_newest() {
        let history = store(&["one", "two"]);
        assert_eq!(history.older(None), Some(1));
        assert_eq!(history.older(Some(1)), Some(0));
        assert_eq!(history.older(Some(0)), Some(0));
        assert_eq!(history.newer(Some(0)), Some(1));
        assert_eq!(history.newer(Some(1)), None);
        assert_eq!(history.newer(None), None);
        assert_eq!(HistoryStore::default().older(None), None);
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn saved_history_reloads_as_bounded_suffix(
                entries in proptest::collection::vec(
                    proptest::string::string_regex("[a-z][a-z0-9 ]{0,11}").expect("regex"),
                    0..40
                ),
                max_lines in 0usize..25,
            ) {
                let tmp = TestTempDir::new("history-prop");
                let path = tmp.child("history");
                HistoryStore::save(&path, max_lines, &entries).expect("save history");
                let loaded = HistoryStore::load(&path, max_lines).expect("load history");

                let kept = entries.len().min(max_lines);
                prop_assert_eq!(loaded.len(), kept);
                prop_assert_eq!(loaded.entries(), &entries[entries.len() - kept..]);
            }
        }
    }
}
