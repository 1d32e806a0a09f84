//! Domain layer: review and engagement types.
//!
//! Contains the review identity newtype, review documents and drafts with
//! their validation rules, the built-in seed reviews, and the engagement
//! counter types shared by the store adapters and services.

pub mod engagement;
pub mod review;
pub mod review_id;

pub use engagement::{EngagementCounters, EngagementSnapshot, LikeStatus, ViewSession};
pub use review::{Review, ReviewDraft, ReviewPatch, seed_reviews};
pub use review_id::ReviewId;
