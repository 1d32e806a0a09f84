//! Browser session identity and the local liked flag.

use std::sync::Arc;

use chrono::Utc;

use super::KeyValueStore;

/// Storage key for the session identifier. The names keep the original
/// site's keys so an existing deployment's stored state carries over.
pub const SESSION_ID_KEY: &str = "paradise_prelude_session_id";

/// Storage key for the last-activity timestamp (epoch millis).
pub const LAST_VIEW_TIME_KEY: &str = "paradise_prelude_last_view_time";

/// Storage key for the has-liked flag.
pub const USER_LIKED_KEY: &str = "paradise_prelude_user_liked";

/// Local session state: session id, last-activity time, and liked flag.
///
/// Every operation degrades to a fresh in-memory default when the
/// underlying [`KeyValueStore`] fails; nothing here ever returns an error.
#[derive(Debug)]
pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
    session_timeout_millis: i64,
}

impl SessionStore {
    /// Creates a session store over the given local storage with the given
    /// inactivity timeout.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, session_timeout_secs: u64) -> Self {
        Self {
            kv,
            session_timeout_millis: i64::try_from(session_timeout_secs)
                .unwrap_or(i64::MAX / 1000)
                .saturating_mul(1000),
        }
    }

    /// Returns the current session id, minting a new one when none is
    /// stored or the last activity is older than the inactivity timeout.
    ///
    /// Refreshes the last-activity timestamp on every call.
    pub fn get_or_create_session_id(&self) -> String {
        let now_millis = Utc::now().timestamp_millis();

        let stored = self.kv.get(SESSION_ID_KEY).ok().flatten();
        let last_view = self
            .kv
            .get(LAST_VIEW_TIME_KEY)
            .ok()
            .flatten()
            .and_then(|v| v.parse::<i64>().ok());

        if let (Some(id), Some(last_millis)) = (stored, last_view)
            && now_millis.saturating_sub(last_millis) < self.session_timeout_millis
        {
            self.touch(now_millis);
            return id;
        }

        let id = generate_session_id();
        if self.kv.set(SESSION_ID_KEY, &id).is_err() {
            tracing::debug!("local storage unavailable, using in-memory session id");
        }
        self.touch(now_millis);
        id
    }

    /// Whether this browser currently holds a like. Defaults to `false`
    /// when storage is unavailable.
    #[must_use]
    pub fn has_liked(&self) -> bool {
        self.kv
            .get(USER_LIKED_KEY)
            .ok()
            .flatten()
            .is_some_and(|v| v == "true")
    }

    /// Persists the liked flag. A storage failure is silently ignored;
    /// the flag simply reverts to its default on the next read.
    pub fn set_liked(&self, liked: bool) {
        let value = if liked { "true" } else { "false" };
        if self.kv.set(USER_LIKED_KEY, value).is_err() {
            tracing::debug!(liked, "local storage unavailable, liked flag not persisted");
        }
    }

    /// Clears all locally persisted engagement state (admin reset).
    pub fn clear(&self) {
        for key in [SESSION_ID_KEY, LAST_VIEW_TIME_KEY, USER_LIKED_KEY] {
            let _ = self.kv.remove(key);
        }
    }

    fn touch(&self, now_millis: i64) {
        let _ = self.kv.set(LAST_VIEW_TIME_KEY, &now_millis.to_string());
    }
}

/// Mints a session id unique with overwhelming probability: a time-based
/// prefix plus a random suffix.
fn generate_session_id() -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(12)
        .collect();
    format!("session_{}_{}", Utc::now().timestamp_millis(), suffix)
}
