//! Search, pagination and retention over the entry list
//!
//! Entries are always stored most-recent-first, so none of these
//! functions sort: stored order is the answer.

use super::models::Entry;

/// Case-insensitive substring search over transcripts and coping plans.
///
/// A blank query returns every entry in stored order.
pub fn search<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    if query.trim().is_empty() {
        return entries.iter().collect();
    }

    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            entry
                .answers
                .iter()
                .any(|a| a.transcript.to_lowercase().contains(&needle))
                || entry.coping_plan.to_lowercase().contains(&needle)
        })
        .collect()
}

/// First `loaded_count` items of an already filtered list
pub fn paginate<T>(items: &[T], loaded_count: usize) -> &[T] {
    &items[..loaded_count.min(items.len())]
}

/// Drop everything after the first `keep` entries.
///
/// Returns how many entries were removed. A list of `keep` or fewer
/// entries is left alone.
pub fn retain_newest(entries: &mut Vec<Entry>, keep: usize) -> usize {
    if entries.len() <= keep {
        return 0;
    }
    let removed = entries.len() - keep;
    entries.truncate(keep);
    removed
}

/// Progressive "load more" state for the journal list.
///
/// Recomputed from scratch whenever the query changes; there is no cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    step: usize,
    loaded: usize,
}

impl Pager {
    pub fn new(step: usize) -> Self {
        let step = step.max(1);
        Self { step, loaded: step }
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Items currently revealed
    pub fn visible<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.loaded)
    }

    /// Called when the row at `index` comes on screen.
    ///
    /// Reveals another step when that row is the last visible one and more
    /// remain. Returns whether anything new was revealed.
    pub fn item_appeared(&mut self, index: usize, total: usize) -> bool {
        let visible = self.loaded.min(total);
        if visible == 0 || index + 1 != visible || self.loaded >= total {
            return false;
        }
        self.loaded = total.min(self.loaded + self.step);
        true
    }

    /// Back to the first page, e.g. after the query changed
    pub fn reset(&mut self) {
        self.loaded = self.step;
    }

    /// Keep the loaded count within a list that just shrank
    pub fn clamp(&mut self, total: usize) {
        self.loaded = self.loaded.min(total);
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_STEP)
    }
}
