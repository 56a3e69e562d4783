//! Incremental reverse substring search over history.

use crate::session::history::HistoryStore;

/// Live query plus the history index of the current match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    position: usize,
}

impl SearchState {
    /// Fresh search with an empty query positioned at the newest entry.
    pub fn start(history: &HistoryStore) -> Self {
        Self {
            query: String::new(),
            position: newest(history),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Replace the query and rescan from the newest entry.
    ///
    /// Returns the matching entry; an empty query never matches.
    pub fn set_query(&mut self, query: String, history: &HistoryStore) -> Option<String> {
        self.query = query;
        self.position = newest(history);
        if self.query.is_empty() {
            return None;
        }
        self.scan(history)
    }

    /// Step one entry older, then scan for the next older match.
    pub fn continue_backward(&mut self, history: &HistoryStore) -> Option<String> {
        if history.is_empty() {
            return None;
        }
        match self.position.checked_sub(1) {
            Some(position) => {
                self.position = position;
                self.scan(history)
            }
            None => {
                self.position = newest(history);
                None
            }
        }
    }

    fn scan(&mut self, history: &HistoryStore) -> Option<String> {
        let upper = self.position.min(newest(history));
        let found = history.entries()[..history.len().min(upper + 1)]
            .iter()
            .enumerate()
            .rev()
            .find(|(_, entry)| entry.contains(&self.query));
        match found {
            Some((idx, entry)) => {
                self.position = idx;
                Some(entry.clone())
            }
            None => {
                self.position = newest(history);
                None
            }
        }
    }
}

fn newest(history: &HistoryStore) -> usize {
    history.len().saturating_sub(1)
}
