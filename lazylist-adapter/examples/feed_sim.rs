// Example: paging and pull-to-refresh driven by a simulated feed.
use lazylist::WindowOptions;
use lazylist_adapter::{FetchError, ListController, PullGestureController, StableId};

#[derive(Clone, Debug)]
struct Entry {
    id: u64,
}

impl StableId for Entry {
    type Id = u64;

    fn stable_id(&self) -> u64 {
        self.id
    }
}

const PAGE_SIZE: usize = 50;
const TOTAL: u64 = 130;

fn fetch_page(page: usize) -> Result<Vec<Entry>, FetchError> {
    let start = (page * PAGE_SIZE) as u64;
    let end = (start + PAGE_SIZE as u64).min(TOTAL);
    Ok((start..end).map(|id| Entry { id }).collect())
}

fn main() {
    let mut list = ListController::new(WindowOptions::new(0, |_| 24), PAGE_SIZE, "inbox");
    let mut now_ms = 0u64;

    // Scroll to the bottom repeatedly; each time the window reaches the end
    // of known data the next page goes out, until the source runs dry.
    let mut pending = list.on_viewport_size(240);
    while let Some(fetch) = pending {
        println!("fetching page {}", fetch.page());
        let outcome = list.complete_fetch(fetch, fetch_page(fetch.page()));
        println!("  -> {outcome:?}");
        now_ms += 16;
        pending = list.on_scroll(u64::MAX, now_ms);
    }
    println!(
        "loaded {} items, has_more={}, first key={:?}",
        list.len(),
        list.cache().has_more(),
        list.key_for(0)
    );

    // A pull past the threshold commits exactly one refresh.
    let mut pull = PullGestureController::default();
    pull.pointer_down(0.0, true);
    pull.pointer_move(220.0, true);
    if pull.pointer_up() {
        println!("refreshing (pull distance {:.0})", pull.pull_distance());
        if let Some(fetch) = list.refetch() {
            list.complete_fetch(fetch, fetch_page(fetch.page()));
        }
        pull.refresh_settled(Ok(()));
    }
    while pull.is_animating() {
        now_ms += 16;
        pull.tick(now_ms);
    }
    println!(
        "pull back to rest: {:?} at {}",
        pull.phase(),
        pull.pull_distance()
    );
}
