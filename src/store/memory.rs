//! In-process document store backed by `tokio::sync::RwLock` maps.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::domain::{EngagementCounters, Review, ReviewDraft, ReviewId, ReviewPatch, ViewSession};
use crate::error::EngagementError;

/// In-memory [`DocumentStore`].
///
/// Counter mutation happens under a single write lock, which gives the
/// same lost-update safety the hosted store's atomic increment provides.
/// Useful for tests and for running the site without a database.
#[derive(Debug)]
pub struct MemoryStore {
    counters: RwLock<EngagementCounters>,
    reviews: RwLock<HashMap<ReviewId, Review>>,
    sessions: RwLock<HashMap<String, ViewSession>>,
    dedup_window: Duration,
}

impl MemoryStore {
    /// Creates an empty store with the given view-dedup window.
    #[must_use]
    pub fn new(view_dedup_window_secs: u64) -> Self {
        Self {
            counters: RwLock::new(EngagementCounters::empty()),
            reviews: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            dedup_window: Duration::seconds(
                i64::try_from(view_dedup_window_secs).unwrap_or(i64::MAX / 1000),
            ),
        }
    }

    /// Rewinds a session's last-counted timestamp, simulating the passage
    /// of time in dedup tests.
    #[cfg(test)]
    pub(crate) async fn backdate_session(&self, session_id: &str, secs: i64) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            session.timestamp = session.timestamp - Duration::seconds(secs);
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn engagement_counters(&self) -> Result<EngagementCounters, EngagementError> {
        Ok(*self.counters.read().await)
    }

    async fn increment_views(&self) -> Result<i64, EngagementError> {
        let mut counters = self.counters.write().await;
        counters.total_views += 1;
        counters.last_updated = Utc::now();
        Ok(counters.total_views)
    }

    async fn increment_likes(&self) -> Result<i64, EngagementError> {
        let mut counters = self.counters.write().await;
        counters.total_likes += 1;
        counters.last_updated = Utc::now();
        Ok(counters.total_likes)
    }

    async fn decrement_likes(&self) -> Result<i64, EngagementError> {
        let mut counters = self.counters.write().await;
        if counters.total_likes > 0 {
            counters.total_likes -= 1;
            counters.last_updated = Utc::now();
        }
        Ok(counters.total_likes)
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, EngagementError> {
        let reviews = self.reviews.read().await;
        let mut list: Vec<Review> = reviews.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn create_review(&self, draft: &ReviewDraft) -> Result<Review, EngagementError> {
        let draft = draft.validate()?;
        let now = Utc::now();
        let review = Review {
            id: ReviewId::new(),
            name: draft.name,
            text: draft.text,
            rating: draft.rating,
            date: now.date_naive(),
            verified: false,
            created_at: now,
        };

        let mut reviews = self.reviews.write().await;
        reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn delete_review(&self, id: &ReviewId) -> Result<bool, EngagementError> {
        let mut reviews = self.reviews.write().await;
        Ok(reviews.remove(id).is_some())
    }

    async fn update_review(
        &self,
        id: &ReviewId,
        patch: &ReviewPatch,
    ) -> Result<bool, EngagementError> {
        let mut reviews = self.reviews.write().await;
        let Some(review) = reviews.get_mut(id) else {
            return Ok(false);
        };
        if let Some(name) = &patch.name {
            review.name = name.clone();
        }
        if let Some(text) = &patch.text {
            review.text = text.clone();
        }
        if let Some(rating) = patch.rating {
            review.rating = rating;
        }
        if let Some(verified) = patch.verified {
            review.verified = verified;
        }
        Ok(true)
    }

    async fn record_view_session(&self, session_id: &str) -> Result<bool, EngagementError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            None => {
                sessions.insert(
                    session_id.to_string(),
                    ViewSession {
                        session_id: session_id.to_string(),
                        timestamp: now,
                    },
                );
                Ok(true)
            }
            Some(session) if now - session.timestamp > self.dedup_window => {
                session.timestamp = now;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }
}
