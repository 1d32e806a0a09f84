//! Remote document store adapter.
//!
//! [`DocumentStore`] abstracts the hosted document database behind the
//! three logical collections the site uses: the engagement counter
//! singleton, the reviews collection, and the view-dedup sessions. Two
//! implementations are provided: [`MemoryStore`] for tests and ephemeral
//! deployments, and [`PostgresStore`] for durable storage via `sqlx`.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;

use crate::domain::{EngagementCounters, Review, ReviewDraft, ReviewId, ReviewPatch};
use crate::error::EngagementError;

/// Async interface to the remote document store.
///
/// All counter mutation goes through the store's atomic increment
/// primitive, never a read-modify-write over two calls, so concurrent
/// viewers cannot lose updates. Operations fail with
/// [`EngagementError::Transport`] when the store is unreachable; callers
/// decide whether to surface or degrade.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Fetches the counters singleton, atomically creating it with zero
    /// counters when absent.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when the store is unreachable.
    async fn engagement_counters(&self) -> Result<EngagementCounters, EngagementError>;

    /// Atomically adds 1 to the view total and returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when the store is unreachable.
    async fn increment_views(&self) -> Result<i64, EngagementError>;

    /// Atomically adds 1 to the like total and returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when the store is unreachable.
    async fn increment_likes(&self) -> Result<i64, EngagementError>;

    /// Atomically subtracts 1 from the like total, clamped at zero, and
    /// returns the new total.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when the store is unreachable.
    async fn decrement_likes(&self) -> Result<i64, EngagementError>;

    /// Fetches all reviews ordered by creation time descending.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when the store is unreachable.
    async fn list_reviews(&self) -> Result<Vec<Review>, EngagementError>;

    /// Validates the draft and writes a new review with a store-assigned
    /// id and creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Validation`] before any network write
    /// when the draft is invalid, or [`EngagementError::Transport`] when
    /// the write fails.
    async fn create_review(&self, draft: &ReviewDraft) -> Result<Review, EngagementError>;

    /// Deletes a review. `Ok(false)` when no such review exists.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when the store is unreachable.
    async fn delete_review(&self, id: &ReviewId) -> Result<bool, EngagementError>;

    /// Applies a partial update to a review. `Ok(false)` when no such
    /// review exists.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when the store is unreachable.
    async fn update_review(
        &self,
        id: &ReviewId,
        patch: &ReviewPatch,
    ) -> Result<bool, EngagementError>;

    /// Records a view from `session_id` and decides whether it should be
    /// counted. The sole view-dedup decision point: a new session or one
    /// whose last counted view is older than the dedup window returns
    /// `true` (and has its timestamp refreshed); otherwise `false`
    /// without mutating state.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when the store is unreachable.
    async fn record_view_session(&self, session_id: &str) -> Result<bool, EngagementError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Store doubles shared by the service tests.

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// A store where every operation fails with a transport error,
    /// simulating an unreachable document database.
    #[derive(Debug, Default)]
    pub struct FailingStore;

    fn unreachable_store<T>() -> Result<T, EngagementError> {
        Err(EngagementError::Transport("store unreachable".to_string()))
    }

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn engagement_counters(&self) -> Result<EngagementCounters, EngagementError> {
            unreachable_store()
        }

        async fn increment_views(&self) -> Result<i64, EngagementError> {
            unreachable_store()
        }

        async fn increment_likes(&self) -> Result<i64, EngagementError> {
            unreachable_store()
        }

        async fn decrement_likes(&self) -> Result<i64, EngagementError> {
            unreachable_store()
        }

        async fn list_reviews(&self) -> Result<Vec<Review>, EngagementError> {
            unreachable_store()
        }

        async fn create_review(&self, draft: &ReviewDraft) -> Result<Review, EngagementError> {
            // Validation still happens before the network is touched.
            draft.validate()?;
            unreachable_store()
        }

        async fn delete_review(&self, _id: &ReviewId) -> Result<bool, EngagementError> {
            unreachable_store()
        }

        async fn update_review(
            &self,
            _id: &ReviewId,
            _patch: &ReviewPatch,
        ) -> Result<bool, EngagementError> {
            unreachable_store()
        }

        async fn record_view_session(&self, _session_id: &str) -> Result<bool, EngagementError> {
            unreachable_store()
        }
    }

    /// Wraps a [`MemoryStore`] and counts `list_reviews` calls so cache
    /// behavior can be asserted.
    #[derive(Debug)]
    pub struct CountingStore {
        pub inner: MemoryStore,
        pub list_calls: AtomicUsize,
    }

    impl CountingStore {
        pub fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                list_calls: AtomicUsize::new(0),
            }
        }

        pub fn list_call_count(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn engagement_counters(&self) -> Result<EngagementCounters, EngagementError> {
            self.inner.engagement_counters().await
        }

        async fn increment_views(&self) -> Result<i64, EngagementError> {
            self.inner.increment_views().await
        }

        async fn increment_likes(&self) -> Result<i64, EngagementError> {
            self.inner.increment_likes().await
        }

        async fn decrement_likes(&self) -> Result<i64, EngagementError> {
            self.inner.decrement_likes().await
        }

        async fn list_reviews(&self) -> Result<Vec<Review>, EngagementError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_reviews().await
        }

        async fn create_review(&self, draft: &ReviewDraft) -> Result<Review, EngagementError> {
            self.inner.create_review(draft).await
        }

        async fn delete_review(&self, id: &ReviewId) -> Result<bool, EngagementError> {
            self.inner.delete_review(id).await
        }

        async fn update_review(
            &self,
            id: &ReviewId,
            patch: &ReviewPatch,
        ) -> Result<bool, EngagementError> {
            self.inner.update_review(id, patch).await
        }

        async fn record_view_session(&self, session_id: &str) -> Result<bool, EngagementError> {
            self.inner.record_view_session(session_id).await
        }
    }
}
