//! Service layer: engagement tracking and the cached review store.
//!
//! Both services are thin coordinators over the injected stores: the
//! [`EngagementTracker`] combines local session identity with the remote
//! dedup fence and counters, and the [`ReviewStore`] adds a short-lived
//! read cache and aggregate statistics over the reviews collection.

pub mod engagement;
pub mod reviews;

pub use engagement::EngagementTracker;
pub use reviews::ReviewStore;
