//! PostgreSQL implementation of the document store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::DocumentStore;
use crate::config::EngagementConfig;
use crate::domain::{EngagementCounters, Review, ReviewDraft, ReviewId, ReviewPatch};
use crate::error::EngagementError;

/// PostgreSQL-backed [`DocumentStore`] using `sqlx::PgPool`.
///
/// Counter mutation is a single conditional upsert per call, so it stays
/// correct under concurrent writers without any read-modify-write.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    dedup_window_secs: f64,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool, view_dedup_window_secs: u64) -> Self {
        Self {
            pool,
            dedup_window_secs: view_dedup_window_secs as f64,
        }
    }

    /// Connects to the database described by `config` and returns a store.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when the connection cannot
    /// be established.
    pub async fn connect(config: &EngagementConfig) -> Result<Self, EngagementError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await?;
        tracing::info!("connected to document store");
        Ok(Self::new(pool, config.view_dedup_window_secs))
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Transport`] when a migration fails.
    pub async fn migrate(&self) -> Result<(), EngagementError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| EngagementError::Transport(e.to_string()))
    }
}

fn review_from_row(
    (id, name, text, rating, date, verified, created_at): (
        Uuid,
        String,
        String,
        i16,
        NaiveDate,
        bool,
        DateTime<Utc>,
    ),
) -> Review {
    Review {
        id: ReviewId::from_uuid(id),
        name,
        text,
        rating: u8::try_from(rating).unwrap_or_default(),
        date,
        verified,
        created_at,
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn engagement_counters(&self) -> Result<EngagementCounters, EngagementError> {
        sqlx::query("INSERT INTO engagement (id) VALUES ('stats') ON CONFLICT (id) DO NOTHING")
            .execute(&self.pool)
            .await?;

        let (total_views, total_likes, last_updated) =
            sqlx::query_as::<_, (i64, i64, DateTime<Utc>)>(
                "SELECT total_views, total_likes, last_updated FROM engagement WHERE id = 'stats'",
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(EngagementCounters {
            total_views,
            total_likes,
            last_updated,
        })
    }

    async fn increment_views(&self) -> Result<i64, EngagementError> {
        let total = sqlx::query_scalar::<_, i64>(
            "INSERT INTO engagement (id, total_views) VALUES ('stats', 1) \
             ON CONFLICT (id) DO UPDATE \
             SET total_views = engagement.total_views + 1, last_updated = now() \
             RETURNING total_views",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn increment_likes(&self) -> Result<i64, EngagementError> {
        let total = sqlx::query_scalar::<_, i64>(
            "INSERT INTO engagement (id, total_likes) VALUES ('stats', 1) \
             ON CONFLICT (id) DO UPDATE \
             SET total_likes = engagement.total_likes + 1, last_updated = now() \
             RETURNING total_likes",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn decrement_likes(&self) -> Result<i64, EngagementError> {
        let total = sqlx::query_scalar::<_, i64>(
            "INSERT INTO engagement (id) VALUES ('stats') \
             ON CONFLICT (id) DO UPDATE \
             SET total_likes = GREATEST(engagement.total_likes - 1, 0), last_updated = now() \
             RETURNING total_likes",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, EngagementError> {
        type ReviewRow = (Uuid, String, String, i16, NaiveDate, bool, DateTime<Utc>);

        let ordered = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, name, body, rating, review_date, verified, created_at \
             FROM reviews ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await;

        let rows = match ordered {
            Ok(rows) => rows,
            Err(e) => {
                // Server-side ordering can fail on a missing index; fetch
                // unordered and sort here instead.
                tracing::warn!(error = %e, "ordered review fetch failed, sorting client-side");
                let mut rows = sqlx::query_as::<_, ReviewRow>(
                    "SELECT id, name, body, rating, review_date, verified, created_at \
                     FROM reviews",
                )
                .fetch_all(&self.pool)
                .await?;
                rows.sort_by(|a, b| b.6.cmp(&a.6));
                rows
            }
        };

        Ok(rows.into_iter().map(review_from_row).collect())
    }

    async fn create_review(&self, draft: &ReviewDraft) -> Result<Review, EngagementError> {
        let draft = draft.validate()?;
        let date = Utc::now().date_naive();

        let (id, created_at) = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
            "INSERT INTO reviews (name, body, rating, review_date) \
             VALUES ($1, $2, $3, $4) RETURNING id, created_at",
        )
        .bind(&draft.name)
        .bind(&draft.text)
        .bind(i16::from(draft.rating))
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(review_id = %id, "review saved");

        Ok(Review {
            id: ReviewId::from_uuid(id),
            name: draft.name,
            text: draft.text,
            rating: draft.rating,
            date,
            verified: false,
            created_at,
        })
    }

    async fn delete_review(&self, id: &ReviewId) -> Result<bool, EngagementError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_review(
        &self,
        id: &ReviewId,
        patch: &ReviewPatch,
    ) -> Result<bool, EngagementError> {
        let result = sqlx::query(
            "UPDATE reviews SET \
                 name = COALESCE($2, name), \
                 body = COALESCE($3, body), \
                 rating = COALESCE($4, rating), \
                 verified = COALESCE($5, verified) \
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(patch.name.as_deref())
        .bind(patch.text.as_deref())
        .bind(patch.rating.map(i16::from))
        .bind(patch.verified)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_view_session(&self, session_id: &str) -> Result<bool, EngagementError> {
        // One conditional upsert: inserts a new session, refreshes an
        // expired one, and returns no row when the view is suppressed.
        let counted = sqlx::query_scalar::<_, String>(
            "INSERT INTO view_sessions (session_id, seen_at) VALUES ($1, now()) \
             ON CONFLICT (session_id) DO UPDATE SET seen_at = now() \
             WHERE view_sessions.seen_at < now() - make_interval(secs => $2) \
             RETURNING session_id",
        )
        .bind(session_id)
        .bind(self.dedup_window_secs)
        .fetch_optional(&self.pool)
        .await?;

        Ok(counted.is_some())
    }
}
