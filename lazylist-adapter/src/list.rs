use alloc::vec::Vec;

use lazylist::{VirtualWindow, WindowEngine, WindowOptions, WindowSlot};

use crate::{
    FetchError, FetchScheduler, PageCache, PageFetch, SettleOutcome, StableId,
};

/// Drives a [`WindowEngine`] over a paged data source.
///
/// Owns the engine, the [`PageCache`], and the [`FetchScheduler`], and keeps
/// them consistent: scroll and viewport events re-evaluate the fetch trigger,
/// appends grow the engine and re-derive the loading slot from the cache's
/// "has more" state, and a query-key change invalidates everything back to
/// page 0.
///
/// The controller is sans-IO like the rest of the crate: inputs return an
/// optional [`PageFetch`] that the caller executes against its data source,
/// feeding the outcome back through [`Self::complete_fetch`].
#[derive(Clone, Debug)]
pub struct ListController<T, Q = ()>
where
    Q: PartialEq,
{
    engine: WindowEngine,
    cache: PageCache<T>,
    scheduler: FetchScheduler,
    query: Q,
    last_error: Option<FetchError>,
}

impl<T, Q: PartialEq> ListController<T, Q> {
    /// Creates a controller for an initially empty list.
    ///
    /// `options.item_count` is overridden to 0: the item count is owned by
    /// the cache from here on.
    pub fn new(options: WindowOptions, page_size: usize, query: Q) -> Self {
        let cache = PageCache::new(page_size);
        let mut options = options;
        options.item_count = 0;
        let mut engine = WindowEngine::new(options);
        engine.set_loading_slot_visible(cache.has_more());
        Self {
            engine,
            cache,
            scheduler: FetchScheduler::new(),
            query,
            last_error: None,
        }
    }

    pub fn engine(&self) -> &WindowEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut WindowEngine {
        &mut self.engine
    }

    pub fn cache(&self) -> &PageCache<T> {
        &self.cache
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Number of fetched items.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&T> {
        self.cache.get(index)
    }

    /// Render key for the item at `index`.
    pub fn key_for(&self, index: usize) -> Option<T::Id>
    where
        T: StableId,
    {
        self.cache.get(index).map(StableId::stable_id)
    }

    pub fn window(&self) -> VirtualWindow {
        self.engine.window()
    }

    pub fn collect_slots(&self, out: &mut Vec<WindowSlot>) {
        self.engine.collect_slots(out);
    }

    /// The page fetch error from the most recent settle, if any.
    ///
    /// Cleared by the next successful append or invalidation; the list stays
    /// usable and retryable throughout.
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<FetchError> {
        self.last_error.take()
    }

    /// Viewport resize from the render surface.
    pub fn on_viewport_size(&mut self, size: u32) -> Option<PageFetch> {
        self.engine.set_viewport_size(size);
        self.poll_fetch()
    }

    /// Scroll event from the render surface.
    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) -> Option<PageFetch> {
        self.engine.apply_scroll_offset_event_clamped(offset, now_ms);
        self.poll_fetch()
    }

    /// Timer/frame tick: drives the `is_scrolling` debounce and re-evaluates
    /// the fetch trigger.
    pub fn tick(&mut self, now_ms: u64) -> Option<PageFetch> {
        self.engine.update_scrolling(now_ms);
        self.poll_fetch()
    }

    /// Re-evaluates the end-of-window fetch trigger.
    pub fn poll_fetch(&mut self) -> Option<PageFetch> {
        let window = self.engine.window();
        self.scheduler.poll(&window, &mut self.cache)
    }

    /// Applies the outcome of a fetch returned by one of the input methods.
    ///
    /// On append the engine grows by the appended count and the loading slot
    /// follows the cache's "has more" state; the caller should poll again
    /// (or simply keep ticking) since the grown list may immediately warrant
    /// the next page. Failures are recorded for [`Self::last_error`].
    pub fn complete_fetch(
        &mut self,
        fetch: PageFetch,
        result: Result<Vec<T>, FetchError>,
    ) -> SettleOutcome {
        let outcome = self.cache.settle_next(fetch, result);
        match &outcome {
            SettleOutcome::Appended { appended, has_more } => {
                self.last_error = None;
                let (appended, has_more) = (*appended, *has_more);
                self.engine.batch_update(|engine| {
                    engine.append_items(appended);
                    engine.set_loading_slot_visible(has_more);
                });
            }
            SettleOutcome::Failed(err) => {
                self.last_error = Some(err.clone());
            }
            SettleOutcome::Stale => {}
        }
        outcome
    }

    /// Switches the query key (filter parameters).
    ///
    /// A changed key discards every page and refetches from page 0; an
    /// unchanged key is a no-op.
    pub fn set_query(&mut self, query: Q) -> Option<PageFetch> {
        if self.query == query {
            return None;
        }
        self.query = query;
        self.refetch()
    }

    /// Explicitly discards every page and starts over from page 0.
    pub fn refetch(&mut self) -> Option<PageFetch> {
        self.cache.invalidate();
        self.scheduler.reset();
        self.last_error = None;
        self.engine.batch_update(|engine| {
            engine.set_item_count(0);
            engine.set_loading_slot_visible(true);
        });
        self.poll_fetch()
    }
}
