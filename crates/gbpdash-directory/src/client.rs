//! HTTP client for the remote business directory API.
//!
//! Wraps `reqwest` with bearer-token auth, per-status error classification,
//! and typed response deserialization. Two base URLs are involved: the
//! current business-information API for accounts/locations and the legacy
//! endpoint that still serves reviews.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::DirectoryError;
use crate::types::{
    Account, ListAccountsResponse, ListLocationsResponse, ListReviewsResponse, LocationDetail,
    LocationSummary,
};

const DEFAULT_BASE_URL: &str = "https://mybusinessbusinessinformation.googleapis.com/v1/";
const DEFAULT_REVIEWS_BASE_URL: &str = "https://mybusiness.googleapis.com/v4/";

/// Fields requested from the location detail endpoint.
const LOCATION_READ_MASK: &str =
    "name,title,profile,phoneNumbers,websiteUri,storefrontAddress,categories,metadata";

/// The list endpoints are paged; this client consumes the full first page
/// only and does not paginate further.
const PAGE_SIZE: u32 = 100;

/// Client for the remote directory API.
///
/// Use [`DirectoryClient::new`] for production or
/// [`DirectoryClient::with_base_urls`] to point at a mock server in tests.
pub struct DirectoryClient {
    client: Client,
    access_token: String,
    base_url: Url,
    reviews_base_url: Url,
}

impl DirectoryClient {
    /// Creates a new client pointed at the production directory API.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, DirectoryError> {
        Self::with_base_urls(
            access_token,
            timeout_secs,
            user_agent,
            DEFAULT_BASE_URL,
            DEFAULT_REVIEWS_BASE_URL,
        )
    }

    /// Creates a new client with custom base URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DirectoryError::Api`] if a base URL is
    /// invalid.
    pub fn with_base_urls(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
        reviews_base_url: &str,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            base_url: parse_base_url(base_url)?,
            reviews_base_url: parse_base_url(reviews_base_url)?,
        })
    }

    /// Cheap connectivity probe: lists one account and discards the result.
    ///
    /// Used by the review sync to fail fast with a descriptive error before
    /// touching the legacy endpoint.
    ///
    /// # Errors
    ///
    /// Returns the classified [`DirectoryError`] if the probe fails.
    pub async fn check_connectivity(&self) -> Result<(), DirectoryError> {
        let url = join_url(&self.base_url, "accounts", "accounts")?;
        self.get_json_raw(url, &[("pageSize", "1")], "connectivity check")
            .await?;
        Ok(())
    }

    /// Lists accounts reachable by the current credential (first page only).
    ///
    /// # Errors
    ///
    /// Returns the classified [`DirectoryError`] on remote failure, or
    /// [`DirectoryError::Deserialize`] if the response shape is unexpected.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, DirectoryError> {
        let url = join_url(&self.base_url, "accounts", "accounts")?;
        let page_size = PAGE_SIZE.to_string();
        let body = self
            .get_json_raw(url, &[("pageSize", &page_size)], "accounts")
            .await?;
        let parsed: ListAccountsResponse = deserialize(body, "accounts")?;
        Ok(parsed.accounts)
    }

    /// Lists locations under one account (first page only, name and title).
    ///
    /// # Errors
    ///
    /// Returns the classified [`DirectoryError`] on remote failure, or
    /// [`DirectoryError::Deserialize`] if the response shape is unexpected.
    pub async fn list_locations(
        &self,
        account_name: &str,
    ) -> Result<Vec<LocationSummary>, DirectoryError> {
        let path = format!("{account_name}/locations");
        let url = join_url(&self.base_url, &path, account_name)?;
        let page_size = PAGE_SIZE.to_string();
        let body = self
            .get_json_raw(
                url,
                &[("readMask", "name,title"), ("pageSize", &page_size)],
                account_name,
            )
            .await?;
        let parsed: ListLocationsResponse = deserialize(body, account_name)?;
        Ok(parsed.locations)
    }

    /// Fetches the full field set for one location.
    ///
    /// # Errors
    ///
    /// Returns the classified [`DirectoryError`] on remote failure (400/401/
    /// 403/404 each map to a distinct category), or
    /// [`DirectoryError::Deserialize`] if the response shape is unexpected.
    pub async fn get_location(
        &self,
        location_name: &str,
    ) -> Result<LocationDetail, DirectoryError> {
        let url = join_url(&self.base_url, location_name, location_name)?;
        let body = self
            .get_json_raw(url, &[("readMask", LOCATION_READ_MASK)], location_name)
            .await?;
        deserialize(body, location_name)
    }

    /// Lists reviews for a location via the legacy endpoint.
    ///
    /// `location_path` is the full hierarchical path, e.g.
    /// `accounts/104312345/locations/98765`. The endpoint is unstable;
    /// callers should treat [`DirectoryError::NotFound`] as "try fallback",
    /// not as "no reviews".
    ///
    /// # Errors
    ///
    /// Returns the classified [`DirectoryError`] on remote failure, or
    /// [`DirectoryError::Deserialize`] if the response shape is unexpected.
    pub async fn list_reviews(
        &self,
        location_path: &str,
    ) -> Result<ListReviewsResponse, DirectoryError> {
        let path = format!("{location_path}/reviews");
        let url = join_url(&self.reviews_base_url, &path, location_path)?;
        let body = self.get_json_raw(url, &[], location_path).await?;
        deserialize(body, location_path)
    }

    /// Creates or replaces the owner reply on a review (legacy endpoint).
    ///
    /// `review_path` is the full hierarchical review name, e.g.
    /// `accounts/104312345/locations/98765/reviews/abc`.
    ///
    /// # Errors
    ///
    /// Returns the classified [`DirectoryError`] on remote failure.
    pub async fn create_reply(
        &self,
        review_path: &str,
        comment: &str,
    ) -> Result<(), DirectoryError> {
        let path = format!("{review_path}/reply");
        let url = join_url(&self.reviews_base_url, &path, review_path)?;
        tracing::debug!(review = review_path, "directory PUT reply");
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "comment": comment }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                review = review_path,
                status = status.as_u16(),
                "reply upsert failed"
            );
        }
        check_status(status, review_path)?;
        Ok(())
    }

    /// Deletes the owner reply on a review (legacy endpoint).
    ///
    /// # Errors
    ///
    /// Returns the classified [`DirectoryError`] on remote failure.
    pub async fn delete_reply(&self, review_path: &str) -> Result<(), DirectoryError> {
        let path = format!("{review_path}/reply");
        let url = join_url(&self.reviews_base_url, &path, review_path)?;
        tracing::debug!(review = review_path, "directory DELETE reply");
        let response = self
            .client
            .delete(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                review = review_path,
                status = status.as_u16(),
                "reply delete failed"
            );
        }
        check_status(status, review_path)?;
        Ok(())
    }

    /// Sends an authenticated GET, classifies non-2xx statuses, and parses
    /// the body as JSON.
    async fn get_json_raw(
        &self,
        url: Url,
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<serde_json::Value, DirectoryError> {
        tracing::debug!(%url, context, "directory GET");
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, context, status = status.as_u16(), "directory GET failed");
        }
        check_status(status, context)?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DirectoryError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, DirectoryError> {
    // Ensure exactly one trailing slash so Url::join appends rather than
    // replacing the last path segment.
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| DirectoryError::Api {
        status: 0,
        context: format!("invalid base URL '{base_url}': {e}"),
    })
}

fn join_url(base: &Url, path: &str, context: &str) -> Result<Url, DirectoryError> {
    base.join(path).map_err(|e| DirectoryError::Api {
        status: 0,
        context: format!("invalid path '{path}' for {context}: {e}"),
    })
}

fn check_status(status: StatusCode, context: &str) -> Result<(), DirectoryError> {
    if status.is_success() {
        return Ok(());
    }
    Err(DirectoryError::from_status(status.as_u16(), context))
}

fn deserialize<T: serde::de::DeserializeOwned>(
    body: serde_json::Value,
    context: &str,
) -> Result<T, DirectoryError> {
    serde_json::from_value(body).map_err(|e| DirectoryError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_base_url_normalises_trailing_slash() {
        let url = parse_base_url("https://example.com/v1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/v1/");
        let url = parse_base_url("https://example.com/v1///").unwrap();
        assert_eq!(url.as_str(), "https://example.com/v1/");
    }

    #[test]
    fn join_url_appends_hierarchical_paths() {
        let base = parse_base_url("https://example.com/v1").unwrap();
        let url = join_url(&base, "accounts/1/locations", "accounts/1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/v1/accounts/1/locations");
    }

    #[test]
    fn check_status_passes_2xx_and_classifies_others() {
        assert!(check_status(StatusCode::OK, "x").is_ok());
        let err = check_status(StatusCode::UNAUTHORIZED, "x").unwrap_err();
        assert!(matches!(err, DirectoryError::Unauthorized(_)));
    }
}
