//! Wire types for the remote directory API.
//!
//! Field names mirror the remote JSON (camelCase); everything the sync engine
//! does not consume is left off deliberately so schema drift in unrelated
//! fields cannot break deserialization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One account reachable by the current credential.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Resource name, e.g. `accounts/104312345`.
    pub name: String,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccountsResponse {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A location as returned by the list endpoint (name and title only; full
/// fields come from the detail endpoint).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    /// Resource name, e.g. `locations/98765`.
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLocationsResponse {
    #[serde(default)]
    pub locations: Vec<LocationSummary>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Full field set for one location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub profile: Option<LocationProfile>,
    #[serde(default)]
    pub phone_numbers: Option<PhoneNumbers>,
    #[serde(default)]
    pub website_uri: Option<String>,
    #[serde(default)]
    pub storefront_address: Option<PostalAddress>,
    #[serde(default)]
    pub categories: Option<Categories>,
    #[serde(default)]
    pub metadata: Option<LocationMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationProfile {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumbers {
    #[serde(default)]
    pub primary_phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(default)]
    pub address_lines: Vec<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub administrative_area: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub region_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Categories {
    #[serde(default)]
    pub primary_category: Option<Category>,
    #[serde(default)]
    pub additional_categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMetadata {
    /// The closest thing the directory exposes to a "verified" bit.
    #[serde(default)]
    pub has_voice_of_merchant: bool,
}

impl LocationDetail {
    /// Flattens primary + additional categories into display names.
    #[must_use]
    pub fn category_names(&self) -> Vec<String> {
        let Some(categories) = &self.categories else {
            return Vec::new();
        };
        let mut names = Vec::new();
        if let Some(primary) = &categories.primary_category {
            if let Some(display) = &primary.display_name {
                names.push(display.clone());
            }
        }
        for extra in &categories.additional_categories {
            if let Some(display) = &extra.display_name {
                names.push(display.clone());
            }
        }
        names
    }

    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.metadata
            .as_ref()
            .is_some_and(|m| m.has_voice_of_merchant)
    }
}

// ---------------------------------------------------------------------------
// Legacy review endpoint types
// ---------------------------------------------------------------------------

/// Star rating enum used by the legacy review endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StarRating {
    StarRatingUnspecified,
    One,
    Two,
    Three,
    Four,
    Five,
}

impl StarRating {
    /// Converts the enum to an integer rating; `None` for unspecified.
    #[must_use]
    pub fn score(self) -> Option<i16> {
        match self {
            StarRating::StarRatingUnspecified => None,
            StarRating::One => Some(1),
            StarRating::Two => Some(2),
            StarRating::Three => Some(3),
            StarRating::Four => Some(4),
            StarRating::Five => Some(5),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewer {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReply {
    pub comment: String,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
}

/// One review from the legacy endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteReview {
    pub review_id: String,
    #[serde(default)]
    pub reviewer: Option<Reviewer>,
    pub star_rating: StarRating,
    #[serde(default)]
    pub comment: Option<String>,
    pub create_time: DateTime<Utc>,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_reply: Option<ReviewReply>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReviewsResponse {
    #[serde(default)]
    pub reviews: Vec<RemoteReview>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub total_review_count: Option<i64>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_rating_scores() {
        assert_eq!(StarRating::One.score(), Some(1));
        assert_eq!(StarRating::Five.score(), Some(5));
        assert_eq!(StarRating::StarRatingUnspecified.score(), None);
    }

    #[test]
    fn star_rating_deserializes_from_screaming_snake() {
        let rating: StarRating = serde_json::from_str("\"FOUR\"").unwrap();
        assert_eq!(rating, StarRating::Four);
        let unspecified: StarRating =
            serde_json::from_str("\"STAR_RATING_UNSPECIFIED\"").unwrap();
        assert_eq!(unspecified.score(), None);
    }

    #[test]
    fn location_detail_tolerates_missing_optional_blocks() {
        let detail: LocationDetail = serde_json::from_str(
            r#"{"name": "locations/1", "title": "Corner Cafe"}"#,
        )
        .unwrap();
        assert!(detail.category_names().is_empty());
        assert!(!detail.is_verified());
        assert!(detail.storefront_address.is_none());
    }

    #[test]
    fn location_detail_flattens_categories() {
        let detail: LocationDetail = serde_json::from_str(
            r#"{
                "name": "locations/1",
                "title": "Corner Cafe",
                "categories": {
                    "primaryCategory": {"displayName": "Cafe"},
                    "additionalCategories": [{"displayName": "Bakery"}]
                },
                "metadata": {"hasVoiceOfMerchant": true}
            }"#,
        )
        .unwrap();
        assert_eq!(detail.category_names(), vec!["Cafe", "Bakery"]);
        assert!(detail.is_verified());
    }
}
