//! # villa-engagement
//!
//! Guest engagement and reviews data layer for a villa rental marketing
//! site. The presentation layer (pages, gallery, styling) lives elsewhere
//! and calls into this crate; everything here is the data-access core:
//! deduplicated view counting, per-browser like toggling, and a cached
//! review store over a remote document database.
//!
//! ## Architecture
//!
//! ```text
//! Presentation layer (out of scope)
//!     │
//!     ├── EngagementTracker (service/)
//!     ├── ReviewStore       (service/)
//!     │
//!     ├── SessionStore ── KeyValueStore (local/)
//!     │
//!     └── DocumentStore (store/)
//!             ├── MemoryStore
//!             └── PostgresStore (sqlx)
//! ```
//!
//! Both store seams are trait objects so tests run against in-memory
//! fakes. Read paths degrade to cached, seed, or zeroed values when the
//! remote store is unreachable; the review-creation write path surfaces
//! its errors.

pub mod config;
pub mod contact;
pub mod domain;
pub mod error;
pub mod local;
pub mod service;
pub mod store;
