//! Guest reviews: documents, submission drafts, and the seed list.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::ReviewId;
use crate::error::EngagementError;

/// Minimum length of a review text after trimming.
pub const TEXT_MIN_LEN: usize = 10;

/// Maximum length of a review text after trimming.
pub const TEXT_MAX_LEN: usize = 500;

/// A stored guest review.
///
/// Immutable once created except through the explicit admin update and
/// delete operations. Displayed in creation-time descending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Store-assigned identifier.
    pub id: ReviewId,
    /// Display name of the reviewer.
    pub name: String,
    /// Review body, 10–500 characters.
    pub text: String,
    /// Star rating, 1–5.
    pub rating: u8,
    /// Calendar date shown next to the review.
    pub date: NaiveDate,
    /// Whether the stay was verified by the host.
    pub verified: bool,
    /// Store-assigned creation timestamp; display sort key.
    pub created_at: DateTime<Utc>,
}

/// A review submission as collected from the presentation layer.
///
/// Validated by [`ReviewDraft::validate`] before any network write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDraft {
    /// Display name of the reviewer.
    pub name: String,
    /// Review body.
    pub text: String,
    /// Star rating, 1–5.
    pub rating: u8,
}

impl ReviewDraft {
    /// Validates the draft and returns a normalized copy with `name` and
    /// `text` trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Validation`] when the trimmed name is
    /// empty, the trimmed text is outside 10–500 characters, or the rating
    /// is outside 1–5.
    pub fn validate(&self) -> Result<Self, EngagementError> {
        let name = self.name.trim();
        let text = self.text.trim();

        if name.is_empty() {
            return Err(EngagementError::Validation("name must not be empty".to_string()));
        }
        if text.chars().count() < TEXT_MIN_LEN || text.chars().count() > TEXT_MAX_LEN {
            return Err(EngagementError::Validation(format!(
                "text must be {TEXT_MIN_LEN}-{TEXT_MAX_LEN} characters"
            )));
        }
        if !(1..=5).contains(&self.rating) {
            return Err(EngagementError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                self.rating
            )));
        }

        Ok(Self {
            name: name.to_string(),
            text: text.to_string(),
            rating: self.rating,
        })
    }
}

/// A partial update applied to an existing review (admin operation).
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewPatch {
    /// New reviewer name.
    pub name: Option<String>,
    /// New review body.
    pub text: Option<String>,
    /// New star rating.
    pub rating: Option<u8>,
    /// New verification status.
    pub verified: Option<bool>,
}

/// Returns the fixed fallback list shown when the remote store has no
/// reviews or is unreachable, newest first.
///
/// The entries are the launch reviews of the original site; their ids are
/// stable so repeated fallbacks render identically.
#[must_use]
pub fn seed_reviews() -> Vec<Review> {
    vec![
        seed(
            1,
            "Emily R.",
            "A truly magical stay! The villa is stunning, the staff attentive, and the location \
             perfect for exploring the southern coast.",
            5,
            2024,
            1,
            15,
        ),
        seed(
            2,
            "Liam S.",
            "We loved the infinity pool and the ocean views. Every detail was perfect. Highly \
             recommended!",
            5,
            2024,
            1,
            10,
        ),
        seed(
            3,
            "Sofia D.",
            "The most relaxing holiday we have ever had. The garden and spa are a dream. Will \
             return!",
            5,
            2024,
            1,
            8,
        ),
        seed(
            4,
            "Arjun K.",
            "Great location, clean and safe with some Nice natural attractions. Just 10 min from \
             the beach, very easy to find family and better based on the amenities.",
            4,
            2024,
            1,
            5,
        ),
        seed(
            5,
            "Chai, France",
            "Lovely and quiet. Well located. Happy return. Very unique. Perfectly clean. All \
             green property, everything in one place.",
            5,
            2024,
            1,
            3,
        ),
        seed(
            6,
            "Deepu, Singapore",
            "Amazing resort. Beautiful, serene, and lovely hospitality. The views are out of a \
             novel, and the swimming pool. You feel isolated from the ocean but simultaneously \
             safe. Will return to visit again.",
            5,
            2024,
            1,
            1,
        ),
    ]
}

fn seed(n: u128, name: &str, text: &str, rating: u8, year: i32, month: u32, day: u32) -> Review {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    let created_at = Utc
        .from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap_or_default());
    Review {
        id: ReviewId::from_uuid(uuid::Uuid::from_u128(n)),
        name: name.to_string(),
        text: text.to_string(),
        rating,
        date,
        verified: true,
        created_at,
    }
}
