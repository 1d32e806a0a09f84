//! Cached review store and aggregate rating statistics.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::domain::{Review, ReviewDraft, ReviewId, ReviewPatch, seed_reviews};
use crate::error::EngagementError;
use crate::store::DocumentStore;

/// A fetched review list with its fetch time.
#[derive(Debug)]
struct CachedReviews {
    entries: Vec<Review>,
    cached_at: DateTime<Utc>,
}

/// CRUD plus a short-lived read cache over the reviews collection.
///
/// Reads degrade gracefully: an empty remote collection or a transport
/// failure yields the built-in seed list so the page is never empty.
/// Writes are stricter; review creation propagates validation and
/// transport errors, while admin delete/update are advisory.
#[derive(Debug)]
pub struct ReviewStore {
    store: Arc<dyn DocumentStore>,
    cache: Mutex<Option<CachedReviews>>,
    cache_ttl: Duration,
}

impl ReviewStore {
    /// Creates a review store with the given cache lifetime.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, cache_ttl_secs: u64) -> Self {
        Self {
            store,
            cache: Mutex::new(None),
            cache_ttl: Duration::seconds(i64::try_from(cache_ttl_secs).unwrap_or(i64::MAX / 1000)),
        }
    }

    /// Returns all reviews, newest first.
    ///
    /// Serves the cache while it is younger than the TTL. An empty remote
    /// result is replaced (and cached) as the seed list; a transport
    /// failure serves the seed list without caching it, so the next call
    /// retries the store.
    pub async fn all_reviews(&self) -> Vec<Review> {
        {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.as_ref()
                && Utc::now() - cached.cached_at < self.cache_ttl
            {
                return cached.entries.clone();
            }
        }

        match self.store.list_reviews().await {
            Ok(list) => {
                let entries = if list.is_empty() {
                    tracing::debug!("no remote reviews, serving seed list");
                    seed_reviews()
                } else {
                    list
                };
                let mut cache = self.cache.lock().await;
                *cache = Some(CachedReviews {
                    entries: entries.clone(),
                    cached_at: Utc::now(),
                });
                entries
            }
            Err(e) => {
                tracing::warn!(error = %e, "review fetch failed, serving seed list");
                seed_reviews()
            }
        }
    }

    /// Returns the first `count` reviews for a preview strip.
    pub async fn preview(&self, count: usize) -> Vec<Review> {
        let mut reviews = self.all_reviews().await;
        reviews.truncate(count);
        reviews
    }

    /// Returns the reviews with the given star rating.
    pub async fn by_rating(&self, rating: u8) -> Vec<Review> {
        self.all_reviews()
            .await
            .into_iter()
            .filter(|r| r.rating == rating)
            .collect()
    }

    /// Submits a new review and invalidates the cache.
    ///
    /// The cache is invalidated whenever remote state may have been
    /// touched; a validation failure never reaches the network and leaves
    /// the cache intact.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Validation`] for bad input or
    /// [`EngagementError::Transport`] when the write fails; neither is
    /// swallowed, so the caller can display it.
    pub async fn add_review(&self, draft: &ReviewDraft) -> Result<Review, EngagementError> {
        match self.store.create_review(draft).await {
            Ok(review) => {
                self.invalidate().await;
                Ok(review)
            }
            Err(e) => {
                if !e.is_validation() {
                    self.invalidate().await;
                }
                Err(e)
            }
        }
    }

    /// Deletes a review (admin). Advisory: returns `false` on any
    /// failure rather than an error.
    pub async fn delete_review(&self, id: &ReviewId) -> bool {
        match self.store.delete_review(id).await {
            Ok(true) => {
                self.invalidate().await;
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::warn!(review_id = %id, error = %e, "review delete failed");
                false
            }
        }
    }

    /// Applies a partial update to a review (admin). Advisory: returns
    /// `false` on any failure rather than an error.
    pub async fn update_review(&self, id: &ReviewId, patch: &ReviewPatch) -> bool {
        match self.store.update_review(id, patch).await {
            Ok(true) => {
                self.invalidate().await;
                true
            }
            Ok(false) => false,
            Err(e) => {
                tracing::warn!(review_id = %id, error = %e, "review update failed");
                false
            }
        }
    }

    /// Arithmetic mean of all ratings, rounded to one decimal place.
    /// Returns `0.0` for an empty set.
    pub async fn average_rating(&self) -> f64 {
        let reviews = self.all_reviews().await;
        if reviews.is_empty() {
            return 0.0;
        }
        let total: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
        let mean = total as f64 / reviews.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    /// Count of reviews per star value. All five keys are always present,
    /// defaulting to zero.
    pub async fn rating_distribution(&self) -> BTreeMap<u8, u64> {
        let mut distribution: BTreeMap<u8, u64> = (1..=5).map(|r| (r, 0)).collect();
        for review in self.all_reviews().await {
            if let Some(count) = distribution.get_mut(&review.rating) {
                *count += 1;
            }
        }
        distribution
    }

    async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        *cache = None;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::store::test_support::{CountingStore, FailingStore};

    fn draft(name: &str, text: &str, rating: u8) -> ReviewDraft {
        ReviewDraft {
            name: name.to_string(),
            text: text.to_string(),
            rating,
        }
    }

    async fn seeded_store(ratings: &[u8]) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new(5));
        for (i, rating) in ratings.iter().enumerate() {
            let result = store
                .create_review(&draft(
                    &format!("Guest {i}"),
                    "A perfectly lovely stay overall.",
                    *rating,
                ))
                .await;
            assert!(result.is_ok());
        }
        store
    }

    #[tokio::test]
    async fn empty_store_serves_seed_list() {
        let reviews = ReviewStore::new(Arc::new(MemoryStore::new(5)), 30);
        let listed = reviews.all_reviews().await;
        assert_eq!(listed.len(), 6);
        assert!(listed.iter().all(|r| r.verified));
    }

    #[tokio::test]
    async fn failing_store_serves_seed_list() {
        let reviews = ReviewStore::new(Arc::new(FailingStore), 30);
        let listed = reviews.all_reviews().await;
        assert_eq!(listed.len(), 6);

        // The fallback is not cached; aggregates still work over it.
        assert!(reviews.average_rating().await > 0.0);
    }

    #[tokio::test]
    async fn added_review_appears_first_and_shifts_mean() {
        let store = seeded_store(&[3, 3]).await;
        let reviews = ReviewStore::new(store, 30);
        assert!((reviews.average_rating().await - 3.0).abs() < f64::EPSILON);

        let result = reviews
            .add_review(&draft("Ann", "Wonderful stay, would return!", 5))
            .await;
        let Ok(added) = result else {
            panic!("expected created review");
        };

        let listed = reviews.all_reviews().await;
        assert_eq!(listed.first().map(|r| r.id), Some(added.id));
        // (3 + 3 + 5) / 3 = 3.666... rounds to 3.7.
        assert!((reviews.average_rating().await - 3.7).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn invalid_draft_fails_without_network_write() {
        let store = Arc::new(CountingStore::new(MemoryStore::new(5)));
        let reviews = ReviewStore::new(Arc::clone(&store) as Arc<dyn DocumentStore>, 30);

        let result = reviews.add_review(&draft("", "short", 0)).await;
        assert!(result.is_err_and(|e| e.is_validation()));
        assert!(store.inner.list_reviews().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn rating_distribution_has_all_five_keys() {
        let store = seeded_store(&[5, 5, 4, 3, 5]).await;
        let reviews = ReviewStore::new(store, 30);

        let distribution = reviews.rating_distribution().await;
        assert_eq!(distribution.get(&5), Some(&3));
        assert_eq!(distribution.get(&4), Some(&1));
        assert_eq!(distribution.get(&3), Some(&1));
        assert_eq!(distribution.get(&2), Some(&0));
        assert_eq!(distribution.get(&1), Some(&0));
    }

    #[tokio::test]
    async fn second_read_within_ttl_hits_cache() {
        let store = Arc::new(CountingStore::new(MemoryStore::new(5)));
        let _ = store
            .create_review(&draft("Ann", "Wonderful stay, would return!", 5))
            .await;

        let reviews = ReviewStore::new(Arc::clone(&store) as Arc<dyn DocumentStore>, 30);
        let first = reviews.all_reviews().await;
        let second = reviews.all_reviews().await;

        assert_eq!(first, second);
        assert_eq!(store.list_call_count(), 1);
    }

    #[tokio::test]
    async fn write_invalidates_cache() {
        let store = Arc::new(CountingStore::new(MemoryStore::new(5)));
        let reviews = ReviewStore::new(Arc::clone(&store) as Arc<dyn DocumentStore>, 30);

        let _ = reviews.all_reviews().await;
        assert_eq!(store.list_call_count(), 1);

        let result = reviews
            .add_review(&draft("Ann", "Wonderful stay, would return!", 5))
            .await;
        assert!(result.is_ok());

        let listed = reviews.all_reviews().await;
        assert_eq!(store.list_call_count(), 2);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.first().map(|r| r.name.as_str()), Some("Ann"));
    }

    #[tokio::test]
    async fn zero_ttl_disables_caching() {
        let store = Arc::new(CountingStore::new(MemoryStore::new(5)));
        let _ = store
            .create_review(&draft("Ann", "Wonderful stay, would return!", 5))
            .await;

        let reviews = ReviewStore::new(Arc::clone(&store) as Arc<dyn DocumentStore>, 0);
        let _ = reviews.all_reviews().await;
        let _ = reviews.all_reviews().await;
        assert_eq!(store.list_call_count(), 2);
    }

    #[tokio::test]
    async fn delete_is_advisory_and_invalidates_on_success() {
        let store = seeded_store(&[4]).await;
        let listed = store.list_reviews().await.unwrap_or_default();
        let Some(existing) = listed.first() else {
            panic!("expected one review");
        };

        let reviews = ReviewStore::new(Arc::clone(&store) as Arc<dyn DocumentStore>, 30);
        let _ = reviews.all_reviews().await;

        assert!(reviews.delete_review(&existing.id).await);
        // Collection is now empty, so the next read serves the seed list.
        assert_eq!(reviews.all_reviews().await.len(), 6);

        assert!(!reviews.delete_review(&existing.id).await);
        assert!(!ReviewStore::new(Arc::new(FailingStore), 30).delete_review(&existing.id).await);
    }

    #[tokio::test]
    async fn update_patches_fields() {
        let store = seeded_store(&[4]).await;
        let listed = store.list_reviews().await.unwrap_or_default();
        let Some(existing) = listed.first() else {
            panic!("expected one review");
        };

        let reviews = ReviewStore::new(Arc::clone(&store) as Arc<dyn DocumentStore>, 30);
        let patch = ReviewPatch {
            verified: Some(true),
            rating: Some(5),
            ..ReviewPatch::default()
        };
        assert!(reviews.update_review(&existing.id, &patch).await);

        let refreshed = reviews.all_reviews().await;
        assert!(refreshed.first().is_some_and(|r| r.verified && r.rating == 5));
    }

    #[tokio::test]
    async fn preview_and_by_rating_filter() {
        let store = seeded_store(&[5, 4, 5]).await;
        let reviews = ReviewStore::new(store, 30);

        assert_eq!(reviews.preview(2).await.len(), 2);
        assert_eq!(reviews.by_rating(5).await.len(), 2);
        assert_eq!(reviews.by_rating(1).await.len(), 0);
    }

    #[tokio::test]
    async fn average_rounds_to_one_decimal() {
        let store = seeded_store(&[5, 5, 4, 3, 5]).await;
        let reviews = ReviewStore::new(store, 30);
        // 22 / 5 = 4.4 exactly after rounding.
        assert!((reviews.average_rating().await - 4.4).abs() < f64::EPSILON);
    }
}
