use lazylist::VirtualWindow;

use crate::{PageCache, PageFetch};

/// End-of-window fetch policy.
///
/// Issues the next page fetch exactly when the rendered window reaches the
/// last known slot while more data may exist. Duplicate suppression lives in
/// the cache's in-flight marker; this type only decides *when* to ask.
///
/// Re-evaluate on every window or item-count change: scroll events, appends
/// (the end-of-list condition re-triggers for the following page), and ticks.
/// Failures are not retried here; the next poll simply asks again.
#[derive(Clone, Debug, Default)]
pub struct FetchScheduler {
    last_issued: Option<usize>,
}

impl FetchScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates the trigger against the current window.
    pub fn poll<T>(
        &mut self,
        window: &VirtualWindow,
        cache: &mut PageCache<T>,
    ) -> Option<PageFetch> {
        let item_count = cache.len();
        let near_end = match &window.range {
            Some(range) => range.end_index.saturating_add(1) >= item_count,
            // Nothing windowed: only an entirely empty list warrants a
            // bootstrap fetch (a zero viewport with items does not).
            None => item_count == 0,
        };
        if !near_end {
            return None;
        }

        let fetch = cache.begin_next()?;
        if let Some(last) = self.last_issued {
            debug_assert!(
                fetch.page() > last,
                "page fetches must be issued in increasing order (last={last}, next={})",
                fetch.page()
            );
        }
        self.last_issued = Some(fetch.page());
        Some(fetch)
    }

    /// Forgets ordering history after a cache invalidation.
    pub fn reset(&mut self) {
        self.last_issued = None;
    }
}
