//! Engagement tracker: deduplicated view counting and like toggling.

use std::sync::Arc;

use crate::domain::{EngagementSnapshot, LikeStatus};
use crate::error::EngagementError;
use crate::local::SessionStore;
use crate::store::DocumentStore;

/// Decides, per page load, whether a view should be counted, and exposes
/// like toggling with at-most-one-like-per-browser semantics.
///
/// The like guarantee is enforced locally through the session store's
/// liked flag, not server-verified; clearing local storage bypasses it.
/// Consumers are expected to re-poll [`EngagementTracker::stats`] on their
/// own interval to reflect other visitors' activity.
#[derive(Debug)]
pub struct EngagementTracker {
    store: Arc<dyn DocumentStore>,
    session: SessionStore,
}

impl EngagementTracker {
    /// Creates a tracker over the given remote store and local session
    /// state.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, session: SessionStore) -> Self {
        Self { store, session }
    }

    /// Tracks a page view and returns the view total.
    ///
    /// Obtains the session id, asks the store's dedup fence whether this
    /// view should count, and increments only when it should; otherwise
    /// the current total is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when the remote store is
    /// unreachable.
    pub async fn track_view(&self) -> Result<i64, EngagementError> {
        let session_id = self.session.get_or_create_session_id();

        if self.store.record_view_session(&session_id).await? {
            self.store.increment_views().await
        } else {
            Ok(self.store.engagement_counters().await?.total_views)
        }
    }

    /// Toggles this browser's like and returns the new state.
    ///
    /// The local flag is written only after the remote call succeeds, so
    /// an abandoned call cannot leave the flag out of step with the
    /// counter it guards.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when the remote store is
    /// unreachable; the local flag is left unchanged in that case.
    pub async fn toggle_like(&self) -> Result<LikeStatus, EngagementError> {
        if self.session.has_liked() {
            let total_likes = self.store.decrement_likes().await?;
            self.session.set_liked(false);
            Ok(LikeStatus {
                total_likes,
                has_liked: false,
            })
        } else {
            let total_likes = self.store.increment_likes().await?;
            self.session.set_liked(true);
            Ok(LikeStatus {
                total_likes,
                has_liked: true,
            })
        }
    }

    /// Whether this browser currently holds a like.
    #[must_use]
    pub fn has_liked(&self) -> bool {
        self.session.has_liked()
    }

    /// Returns the aggregate engagement view for display.
    ///
    /// A read path: when the remote store is unreachable the counters
    /// degrade to zero rather than surfacing the error.
    pub async fn stats(&self) -> EngagementSnapshot {
        let session_id = self.session.get_or_create_session_id();
        let (total_views, total_likes) = match self.store.engagement_counters().await {
            Ok(counters) => (counters.total_views, counters.total_likes),
            Err(e) => {
                tracing::warn!(error = %e, "engagement fetch failed, serving zeroed counters");
                (0, 0)
            }
        };

        EngagementSnapshot {
            total_views,
            total_likes,
            has_liked: self.session.has_liked(),
            session_id,
        }
    }

    /// Clears all locally persisted engagement state (admin reset).
    ///
    /// Remote counters are untouched; only this browser's session id,
    /// last-activity time, and liked flag are removed.
    pub fn reset_local(&self) {
        self.session.clear();
    }
}
