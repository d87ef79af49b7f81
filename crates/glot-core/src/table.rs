//! Flat key -> value lookup table.
//!
//! The exact-match half of the dual index. Rebuilt wholesale on every
//! region load; individual entries may be overridden in place afterwards
//! for runtime patching (the trie is deliberately left untouched by
//! overrides, which are a patch feature, not enumeration data).

use rustc_hash::FxHashMap;

/// Exact-match `key -> value` table for one loaded region.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    entries: FxHashMap<String, String>,
}

impl LookupTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from an entry list, replacing duplicates by last-wins.
    pub fn build<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries: FxHashMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        tracing::debug!(entries = entries.len(), "lookup table built");
        Self { entries }
    }

    /// Exact-match lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or replace a single entry in the live table.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Whether the table has an entry for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_get() {
        let table = LookupTable::build([("ui.menu.start", "Start"), ("ui.menu.quit", "Quit")]);
        assert_eq!(table.get("ui.menu.start"), Some("Start"));
        assert_eq!(table.get("ui.menu.quit"), Some("Quit"));
        assert_eq!(table.get("ui.menu.load"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn contains_is_exact() {
        let table = LookupTable::build([("ui.menu.start", "Start")]);
        assert!(table.contains("ui.menu.start"));
        assert!(!table.contains("ui.menu"));
        assert!(!table.contains("ui.menu.start.x"));
    }

    #[test]
    fn insert_overrides_live_entry() {
        let mut table = LookupTable::build([("ui.menu.start", "Start")]);
        table.insert("ui.menu.start", "Begin");
        assert_eq!(table.get("ui.menu.start"), Some("Begin"));

        table.insert("ui.menu.new", "New Game");
        assert_eq!(table.get("ui.menu.new"), Some("New Game"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn empty_table() {
        let table = LookupTable::new();
        assert!(table.is_empty());
        assert_eq!(table.get("anything"), None);
    }
}
