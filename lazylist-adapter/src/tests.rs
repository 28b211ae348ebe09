use crate::*;

use alloc::string::ToString;
use alloc::vec::Vec;

use lazylist::{SlotKind, WindowOptions};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Task {
    id: u64,
}

impl StableId for Task {
    type Id = u64;

    fn stable_id(&self) -> u64 {
        self.id
    }
}

fn tasks(range: core::ops::Range<u64>) -> Vec<Task> {
    range.map(|id| Task { id }).collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// --- PageCache ---

#[test]
fn duplicate_triggers_share_one_fetch() {
    let mut cache = PageCache::<Task>::new(10);
    let fetch = cache.begin_next().unwrap();
    assert_eq!(fetch.page(), 0);
    // A second trigger while one is outstanding is a no-op.
    assert!(cache.begin_next().is_none());
    assert!(cache.is_fetching_next());

    let outcome = cache.settle_next(fetch, Ok(tasks(0..10)));
    assert_eq!(
        outcome,
        SettleOutcome::Appended {
            appended: 10,
            has_more: true
        }
    );
    assert!(!cache.is_fetching_next());
    assert_eq!(cache.begin_next().unwrap().page(), 1);
}

#[test]
fn failed_fetch_keeps_cache_retryable() {
    let mut cache = PageCache::<Task>::new(10);
    let fetch = cache.begin_next().unwrap();
    let err = FetchError::Network("timeout".to_string());
    assert_eq!(
        cache.settle_next(fetch, Err(err.clone())),
        SettleOutcome::Failed(err)
    );
    // Nothing appended, has_more untouched, in-flight cleared: retry works.
    assert_eq!(cache.len(), 0);
    assert!(cache.has_more());
    assert_eq!(cache.begin_next().unwrap().page(), 0);
}

#[test]
fn short_page_ends_the_sequence() {
    let mut cache = PageCache::<Task>::new(3);
    let fetch = cache.begin_next().unwrap();
    let outcome = cache.settle_next(fetch, Ok(tasks(0..2)));
    assert_eq!(
        outcome,
        SettleOutcome::Appended {
            appended: 2,
            has_more: false
        }
    );
    assert!(!cache.has_more());
    assert!(cache.begin_next().is_none());

    // Only a full invalidation brings has_more back.
    cache.invalidate();
    assert!(cache.has_more());
    assert_eq!(cache.begin_next().unwrap().page(), 0);
}

#[test]
fn stale_settles_are_discarded() {
    let mut cache = PageCache::<Task>::new(5);
    let orphaned = cache.begin_next().unwrap();
    cache.invalidate();

    assert_eq!(cache.settle_next(orphaned, Ok(tasks(0..5))), SettleOutcome::Stale);
    assert_eq!(cache.len(), 0);
    assert!(!cache.is_fetching_next());

    // The post-invalidation fetch proceeds normally.
    let fresh = cache.begin_next().unwrap();
    assert_eq!(fresh.page(), 0);
    assert_eq!(
        cache.settle_next(fresh, Ok(tasks(100..105))),
        SettleOutcome::Appended {
            appended: 5,
            has_more: true
        }
    );
    assert_eq!(cache.get(0), Some(&Task { id: 100 }));
}

#[test]
fn concatenated_sequence_is_stable_across_pages() {
    let mut cache = PageCache::<Task>::new(3);
    let fetch = cache.begin_next().unwrap();
    cache.settle_next(fetch, Ok(tasks(0..3)));
    let fetch = cache.begin_next().unwrap();
    assert_eq!(fetch.page(), 1);
    cache.settle_next(fetch, Ok(tasks(3..5)));

    assert_eq!(cache.len(), 5);
    assert_eq!(cache.next_page_index(), 2);
    let ids: Vec<u64> = cache.iter().map(|t| t.id).collect();
    assert_eq!(ids, [0, 1, 2, 3, 4]);
    assert_eq!(cache.get(4), Some(&Task { id: 4 }));
    assert_eq!(cache.get(5), None);
    assert_eq!(cache.pages().len(), 2);
    assert_eq!(cache.pages()[1].index(), 1);
}

// --- FetchScheduler / ListController ---

fn controller(page_size: usize) -> ListController<Task, &'static str> {
    ListController::new(WindowOptions::new(0, |_| 10), page_size, "inbox")
}

#[test]
fn empty_list_bootstraps_page_zero() {
    // 0 items with more available: the window is empty and page 0 is
    // requested immediately, before the viewport is even known.
    let mut list = controller(50);
    assert!(list.window().is_empty());
    let fetch = list.poll_fetch().unwrap();
    assert_eq!(fetch.page(), 0);
    // Re-polling while the fetch is in flight stays quiet.
    assert!(list.poll_fetch().is_none());
    assert!(list.tick(16).is_none());
}

#[test]
fn fifty_then_thirty_exhausts_the_source() {
    // page_size = 50; page 0 comes back full, page 1 comes back short.
    let mut list = controller(50);

    // The empty list triggers its bootstrap fetch on the first input.
    let fetch = list.on_viewport_size(100).unwrap();
    let outcome = list.complete_fetch(fetch, Ok(tasks(0..50)));
    assert_eq!(
        outcome,
        SettleOutcome::Appended {
            appended: 50,
            has_more: true
        }
    );
    assert_eq!(list.len(), 50);
    assert!(list.engine().loading_slot_visible());

    // Scroll to the end: the window reaches the loading slot and page 1 goes
    // out.
    let fetch = list.on_scroll(u64::MAX, 1_000).unwrap();
    assert_eq!(fetch.page(), 1);
    let outcome = list.complete_fetch(fetch, Ok(tasks(50..80)));
    assert_eq!(
        outcome,
        SettleOutcome::Appended {
            appended: 30,
            has_more: false
        }
    );
    assert_eq!(list.len(), 80);
    assert!(!list.cache().has_more());
    assert!(!list.engine().loading_slot_visible());
    assert_eq!(list.engine().slot_count(), 80);

    // Even parked at the end of the list, nothing further is fetched.
    assert!(list.on_scroll(u64::MAX, 2_000).is_none());
    assert!(list.tick(2_016).is_none());
}

#[test]
fn scrolling_short_of_the_end_does_not_fetch() {
    let mut list = controller(50);
    let fetch = list.on_viewport_size(100).unwrap();
    list.complete_fetch(fetch, Ok(tasks(0..50)));

    // 50 items of size 10; a window around offset 0 is nowhere near the end.
    assert!(list.on_scroll(0, 1_000).is_none());
    assert!(list.on_scroll(120, 1_016).is_none());
}

#[test]
fn failed_page_fetch_surfaces_and_retries_on_next_trigger() {
    let mut list = controller(50);

    let fetch = list.on_viewport_size(100).unwrap();
    let err = FetchError::Decode("bad json".to_string());
    assert_eq!(
        list.complete_fetch(fetch, Err(err.clone())),
        SettleOutcome::Failed(err.clone())
    );
    assert_eq!(list.last_error(), Some(&err));
    assert_eq!(list.len(), 0);

    // No automatic retry; the next window evaluation triggers again.
    let fetch = list.poll_fetch().unwrap();
    assert_eq!(fetch.page(), 0);
    list.complete_fetch(fetch, Ok(tasks(0..50)));
    assert_eq!(list.last_error(), None);
    assert_eq!(list.len(), 50);
}

#[test]
fn query_change_invalidates_and_discards_in_flight_fetches() {
    let mut list = controller(10);

    let orphaned = list.on_viewport_size(40).unwrap();

    // Same key: no-op, the in-flight fetch stays valid.
    assert!(list.set_query("inbox").is_none());

    // New key: everything resets and page 0 is refetched immediately.
    let fresh = list.set_query("archived").unwrap();
    assert_eq!(fresh.page(), 0);
    assert_eq!(list.query(), &"archived");

    // The orphaned fetch settles late; its result is discarded.
    assert_eq!(
        list.complete_fetch(orphaned, Ok(tasks(0..10))),
        SettleOutcome::Stale
    );
    assert_eq!(list.len(), 0);

    list.complete_fetch(fresh, Ok(tasks(500..505)));
    assert_eq!(list.len(), 5);
    assert_eq!(list.key_for(0), Some(500));
}

#[test]
fn appends_grow_the_engine_and_reuse_the_loading_slot() {
    let mut list = controller(4);

    let fetch = list.on_viewport_size(60).unwrap();
    list.complete_fetch(fetch, Ok(tasks(0..4)));
    assert_eq!(list.engine().item_count(), 4);

    let mut slots = Vec::new();
    list.collect_slots(&mut slots);
    // 4 items of size 10 under a viewport of 60: all of them plus the
    // trailing loading slot are windowed.
    assert!(slots.iter().any(|slot| slot.kind == SlotKind::Loading));
    let loading = slots.last().unwrap();
    assert_eq!(loading.index, 4);
    assert_eq!(loading.start, 40);

    assert_eq!(list.item(2), Some(&Task { id: 2 }));
    assert_eq!(list.item(4), None);
}

// --- PullGestureController ---

fn settle_to_idle(pull: &mut PullGestureController, mut now_ms: u64) -> u64 {
    for _ in 0..1_000 {
        now_ms += 16;
        let distance = pull.tick(now_ms);
        assert!(distance >= 0.0, "pull distance must never go negative");
        if pull.phase() == PullPhase::Idle {
            return now_ms;
        }
    }
    panic!("spring failed to settle: phase={:?}", pull.phase());
}

#[test]
fn damped_drag_commits_past_threshold() {
    // Threshold 80, damping 0.5: a 200px drag lands at min(100, 120) = 100
    // and the release commits.
    let mut pull = PullGestureController::default();
    pull.pointer_down(0.0, true);
    pull.pointer_move(200.0, true);
    assert!(approx(pull.pull_distance(), 100.0));

    assert!(pull.pointer_up());
    assert_eq!(pull.phase(), PullPhase::Committed);
    assert!(pull.is_refreshing());
    assert!(pull.is_animating());

    // While the refresh runs the indicator springs onto the threshold.
    let mut now_ms = 0;
    for _ in 0..200 {
        now_ms += 16;
        pull.tick(now_ms);
        if !pull.is_animating() {
            break;
        }
    }
    assert_eq!(pull.phase(), PullPhase::Committed);
    assert!(approx(pull.pull_distance(), 80.0));

    pull.refresh_settled(Ok(()));
    assert_eq!(pull.phase(), PullPhase::Returning);
    settle_to_idle(&mut pull, now_ms);
    assert_eq!(pull.pull_distance(), 0.0);
}

#[test]
fn release_below_threshold_never_refreshes() {
    let mut pull = PullGestureController::default();
    pull.pointer_down(10.0, true);
    pull.pointer_move(110.0, true); // raw 100 * 0.5 = 50 < 80
    assert!(approx(pull.pull_distance(), 50.0));

    assert!(!pull.pointer_up());
    assert_eq!(pull.phase(), PullPhase::Returning);
    settle_to_idle(&mut pull, 0);
    assert_eq!(pull.pull_distance(), 0.0);
}

#[test]
fn pull_distance_clamps_at_max_overscroll() {
    let mut pull = PullGestureController::default();
    pull.pointer_down(0.0, true);
    pull.pointer_move(10_000.0, true);
    assert!(approx(pull.pull_distance(), 120.0));
}

#[test]
fn scrolling_away_abandons_the_pull_without_ending_the_drag() {
    let mut pull = PullGestureController::default();
    pull.pointer_down(0.0, true);
    pull.pointer_move(200.0, true);
    assert!(pull.pull_distance() > 0.0);

    pull.pointer_move(210.0, false);
    assert_eq!(pull.pull_distance(), 0.0);
    assert_eq!(pull.phase(), PullPhase::Dragging);

    // Back at the top, the same gesture resumes from the live delta.
    pull.pointer_move(150.0, true);
    assert!(approx(pull.pull_distance(), 75.0));
}

#[test]
fn gesture_starts_require_idle_top_and_enabled() {
    let mut pull = PullGestureController::default();

    pull.pointer_down(0.0, false); // not at scroll-top
    assert_eq!(pull.phase(), PullPhase::Idle);

    pull.set_enabled(false);
    pull.pointer_down(0.0, true);
    assert_eq!(pull.phase(), PullPhase::Idle);
    pull.set_enabled(true);

    // A touch landing while the indicator is still returning is ignored.
    pull.pointer_down(0.0, true);
    pull.pointer_move(120.0, true);
    pull.pointer_up();
    assert_eq!(pull.phase(), PullPhase::Returning);
    pull.pointer_down(0.0, true);
    assert_eq!(pull.phase(), PullPhase::Returning);
}

#[test]
fn late_moves_and_releases_are_ignored() {
    let mut pull = PullGestureController::default();
    pull.pointer_down(0.0, true);
    pull.pointer_move(60.0, true);
    assert!(!pull.pointer_up());

    let after_release = pull.pull_distance();
    pull.pointer_move(500.0, true); // arrives after gesture end
    assert_eq!(pull.pull_distance(), after_release);
    assert!(!pull.pointer_up());
}

#[test]
fn cancel_is_gesture_end_with_current_distance() {
    let mut pull = PullGestureController::default();
    pull.pointer_down(0.0, true);
    pull.pointer_move(200.0, true);
    // Cancelling past the threshold still commits, exactly like a release.
    assert!(pull.pointer_cancel());
    assert_eq!(pull.phase(), PullPhase::Committed);
}

#[test]
fn failed_refresh_still_returns_to_rest() {
    let mut pull = PullGestureController::default();
    pull.pointer_down(0.0, true);
    pull.pointer_move(200.0, true);
    assert!(pull.pointer_up());

    pull.refresh_settled(Err(RefreshError("offline".to_string())));
    assert_eq!(pull.phase(), PullPhase::Returning);
    settle_to_idle(&mut pull, 0);
    assert_eq!(pull.pull_distance(), 0.0);
}

#[test]
fn each_commit_invokes_exactly_one_refresh() {
    let mut pull = PullGestureController::default();
    pull.pointer_down(0.0, true);
    pull.pointer_move(200.0, true);

    let mut refreshes = 0;
    if pull.pointer_up() {
        refreshes += 1;
    }
    // No second commit from repeated releases or touches mid-refresh.
    if pull.pointer_up() {
        refreshes += 1;
    }
    pull.pointer_down(0.0, true);
    pull.pointer_move(300.0, true);
    if pull.pointer_up() {
        refreshes += 1;
    }
    assert_eq!(refreshes, 1);
    assert_eq!(pull.phase(), PullPhase::Committed);
}

#[test]
fn disabling_mid_refresh_discards_the_late_settle() {
    let mut pull = PullGestureController::default();
    pull.pointer_down(0.0, true);
    pull.pointer_move(200.0, true);
    assert!(pull.pointer_up());

    pull.set_enabled(false);
    assert_eq!(pull.phase(), PullPhase::Idle);
    assert_eq!(pull.pull_distance(), 0.0);
    assert!(!pull.is_animating());

    // The orphaned refresh settles later; nothing moves.
    pull.refresh_settled(Ok(()));
    assert_eq!(pull.phase(), PullPhase::Idle);
    assert_eq!(pull.tick(16), 0.0);
}

#[test]
fn visual_signals_follow_the_documented_ramps() {
    let mut pull = PullGestureController::default();
    pull.pointer_down(0.0, true);

    pull.pointer_move(80.0, true); // distance 40 = threshold / 2
    assert!(approx(pull.indicator_opacity(), 0.5));
    assert!(approx(pull.indicator_scale(), 0.75));
    assert!(approx(pull.indicator_rotation(), 90.0));
    assert!(approx(pull.content_offset(), 40.0 * 80.0 / 120.0));

    pull.pointer_move(160.0, true); // distance 80 = threshold
    assert!(approx(pull.indicator_opacity(), 1.0));
    assert!(approx(pull.indicator_scale(), 1.0));
    assert!(approx(pull.indicator_rotation(), 180.0));

    pull.pointer_move(10_000.0, true); // clamped at 120
    assert!(approx(pull.indicator_opacity(), 1.0));
    // Content never travels past the cap, however far the finger pulls.
    assert!(approx(pull.content_offset(), 80.0));
}

#[test]
fn rotation_freezes_while_refreshing() {
    let mut pull = PullGestureController::default();
    pull.pointer_down(0.0, true);
    pull.pointer_move(200.0, true);
    assert!(pull.pointer_up());

    let frozen = pull.indicator_rotation();
    let mut now_ms = 0;
    for _ in 0..50 {
        now_ms += 16;
        pull.tick(now_ms);
        assert_eq!(pull.indicator_rotation(), frozen);
    }

    pull.refresh_settled(Ok(()));
    settle_to_idle(&mut pull, now_ms);
    assert!(pull.indicator_rotation() < frozen);
}

// --- Spring ---

#[test]
fn spring_converges_onto_its_target() {
    let mut spring = Spring::new(100.0, 0.0, SpringConfig::default());
    let mut steps = 0;
    while !spring.is_settled() {
        spring.advance(1.0 / 60.0);
        steps += 1;
        assert!(steps < 1_000, "spring failed to converge");
    }
    assert_eq!(spring.value(), 0.0);
}

#[test]
fn spring_retarget_keeps_motion_continuous() {
    let mut spring = Spring::new(100.0, 80.0, SpringConfig::default());
    spring.advance(0.05);
    let mid = spring.value();
    spring.retarget(0.0);
    spring.advance(1.0 / 60.0);
    // No teleporting: one frame later the value is still near where it was.
    assert!((spring.value() - mid).abs() < 20.0);
    let mut steps = 0;
    while !spring.is_settled() {
        spring.advance(1.0 / 60.0);
        steps += 1;
        assert!(steps < 1_000, "spring failed to converge after retarget");
    }
    assert_eq!(spring.value(), 0.0);
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pull_distance_is_clamped_and_monotone_under_monotone_drags(
            ys in proptest::collection::vec(0f32..2_000.0, 1..40),
        ) {
            let mut sorted = ys;
            sorted.sort_by(f32::total_cmp);

            let mut pull = PullGestureController::default();
            pull.pointer_down(0.0, true);
            let mut prev = 0.0f32;
            for y in sorted {
                pull.pointer_move(y, true);
                let distance = pull.pull_distance();
                prop_assert!(distance >= prev);
                prop_assert!((0.0..=120.0).contains(&distance));
                prev = distance;
            }
        }

        #[test]
        fn settling_a_fetch_always_clears_the_in_flight_flag(
            len in 0usize..12,
            fail in proptest::bool::ANY,
        ) {
            let mut cache = PageCache::<Task>::new(8);
            let fetch = cache.begin_next().unwrap();
            let result = if fail {
                Err(FetchError::Network("down".to_string()))
            } else {
                Ok(tasks(0..len as u64))
            };
            let _ = cache.settle_next(fetch, result);
            prop_assert!(!cache.is_fetching_next());
        }
    }
}
