//! Per-tab blocked request counts
//!
//! A key exists only for tabs that are open and have been observed at least
//! once; a missing key reads as zero. The store is purely in memory and
//! starts empty whenever the host process does.

use std::collections::HashMap;

use crate::types::TabId;

/// Mapping from tab id to the number of requests blocked in it.
#[derive(Debug, Default, Clone)]
pub struct CounterStore {
    counts: HashMap<TabId, u32>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one blocked request for `tab_id`.
    ///
    /// Returns the new count, or `None` when the id does not belong to a
    /// displayed tab, in which case nothing is stored.
    pub fn record_block(&mut self, tab_id: TabId) -> Option<u32> {
        if !tab_id.is_valid() {
            return None;
        }
        let count = self.counts.entry(tab_id).or_insert(0);
        *count = count.saturating_add(1);
        Some(*count)
    }

    /// Zero the count for a tab that navigated to a new URL.
    pub fn reset_for_navigation(&mut self, tab_id: TabId) {
        self.counts.insert(tab_id, 0);
    }

    /// Forget a closed tab. Returns the count it had, if any.
    pub fn remove(&mut self, tab_id: TabId) -> Option<u32> {
        self.counts.remove(&tab_id)
    }

    /// Current count, zero when the tab has no entry.
    #[inline]
    pub fn get(&self, tab_id: TabId) -> u32 {
        self.counts.get(&tab_id).copied().unwrap_or(0)
    }

    pub fn contains(&self, tab_id: TabId) -> bool {
        self.counts.contains_key(&tab_id)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Snapshot of all entries ordered by tab id.
    pub fn entries(&self) -> Vec<(TabId, u32)> {
        let mut entries: Vec<(TabId, u32)> = self.counts.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(tab, _)| tab.0);
        entries
    }
}
