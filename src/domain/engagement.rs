//! Engagement counter and view-session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The singleton counters document (`engagement/stats`).
///
/// Created lazily with zero counters on first read and never deleted.
/// `total_likes` never goes below zero; decrement is a no-op at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounters {
    /// Total deduplicated page views.
    pub total_views: i64,
    /// Total outstanding likes.
    pub total_likes: i64,
    /// Timestamp of the last counter mutation.
    pub last_updated: DateTime<Utc>,
}

impl EngagementCounters {
    /// Zeroed counters, used when the document is first created.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_views: 0,
            total_likes: 0,
            last_updated: Utc::now(),
        }
    }
}

/// A view-dedup record, one per browser session.
///
/// Purely a fence against rapid-reload view inflation; not retained for
/// analytics beyond presence and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSession {
    /// Session identifier minted by the local session store.
    pub session_id: String,
    /// Last time a view from this session was counted.
    pub timestamp: DateTime<Utc>,
}

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    /// New like total after the toggle.
    pub total_likes: i64,
    /// Whether this browser now holds a like.
    pub has_liked: bool,
}

/// Aggregate engagement view for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngagementSnapshot {
    /// Total deduplicated page views.
    pub total_views: i64,
    /// Total outstanding likes.
    pub total_likes: i64,
    /// Whether this browser holds a like.
    pub has_liked: bool,
    /// The browser's current session id.
    pub session_id: String,
}
