//! Paged data loading and pull-to-refresh controllers for the `lazylist`
//! engine.
//!
//! The `lazylist` crate is UI-agnostic and focuses on window geometry. This
//! crate provides the stateful collaborators a list adapter needs around it:
//!
//! - [`PageCache`]: lazily fetched pages with an at-most-one in-flight fetch
//! - [`FetchScheduler`]: issues the next page when the window nears the end
//! - [`ListController`]: wires engine, cache, and scheduler together
//! - [`PullGestureController`]: damped pull-to-refresh gesture with a spring
//!   return animation
//!
//! Everything here is sans-IO and single-writer: external fetches and the
//! refresh operation are suspension points modeled as begin/settle pairs, so
//! the caller owns the actual transport (and its timeout policy) while the
//! in-flight invariants live here.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod list;
mod page;
mod pull;
mod scheduler;
mod spring;

#[cfg(test)]
mod tests;

pub use error::{FetchError, RefreshError};
pub use list::ListController;
pub use page::{Page, PageCache, PageFetch, SettleOutcome, StableId};
pub use pull::{PullConfig, PullGestureController, PullPhase};
pub use scheduler::FetchScheduler;
pub use spring::{Spring, SpringConfig};
