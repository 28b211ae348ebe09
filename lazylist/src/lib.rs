//! A headless windowing engine for incrementally loaded lists.
//!
//! For the data-loading and gesture layer (page cache, fetch scheduling,
//! pull-to-refresh), see the `lazylist-adapter` crate.
//!
//! This crate focuses on the geometry that makes large, partially loaded lists
//! render at interactive frame rates: prefix sums over slot sizes, fast
//! offset → index lookup, overscanned windows, and a synthetic trailing
//! loading slot for lists whose tail has not been fetched yet.
//!
//! It is UI-agnostic. A UI layer is expected to provide:
//! - viewport size and scroll offset
//! - item size estimates and (optionally) measured sizes after first paint
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod engine;
mod fenwick;
mod options;
mod state;
mod types;


pub use engine::WindowEngine;
pub use options::{OnChangeCallback, SizeEstimator, WindowOptions};
pub use state::ScrollState;
pub use types::{Align, ScrollDirection, SlotKind, VirtualWindow, WindowRange, WindowSlot};
