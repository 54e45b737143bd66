use thiserror::Error;

/// Errors returned by the remote directory client.
///
/// Remote HTTP failures are classified into distinct categories so callers
/// can react appropriately: re-authenticate on [`DirectoryError::Unauthorized`],
/// stop on [`DirectoryError::PermissionDenied`], retry later on
/// [`DirectoryError::QuotaExceeded`]. The client itself never retries.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The credential is expired or invalid (401). The caller should prompt
    /// re-authentication rather than retry.
    #[error("directory credential rejected for {0}; re-authentication required")]
    Unauthorized(String),

    /// Access to this account or location is denied (403). Not retryable
    /// without user action.
    #[error("access denied by the directory for {0}")]
    PermissionDenied(String),

    /// The remote quota is exhausted (429). Retryable later; backoff policy
    /// is left to the caller.
    #[error("directory quota exceeded while fetching {0}")]
    QuotaExceeded(String),

    /// The resource does not exist, or the endpoint no longer accepts this
    /// shape of request (400/404 schema drift on legacy endpoints).
    #[error("directory resource not found: {resource}")]
    NotFound { resource: String },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other non-2xx response.
    #[error("directory API error (HTTP {status}) for {context}")]
    Api { status: u16, context: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DirectoryError {
    /// Maps a non-success HTTP status to the matching error category.
    #[must_use]
    pub fn from_status(status: u16, context: &str) -> Self {
        match status {
            401 => DirectoryError::Unauthorized(context.to_string()),
            403 => DirectoryError::PermissionDenied(context.to_string()),
            429 => DirectoryError::QuotaExceeded(context.to_string()),
            400 | 404 => DirectoryError::NotFound {
                resource: context.to_string(),
            },
            other => DirectoryError::Api {
                status: other,
                context: context.to_string(),
            },
        }
    }

    /// True when the error should trigger the degraded review-sync fallback
    /// rather than propagate: the legacy review endpoint answering 400/404
    /// means "unsupported shape", not "no reviews".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_maps_to_unauthorized() {
        let err = DirectoryError::from_status(401, "accounts");
        assert!(matches!(err, DirectoryError::Unauthorized(_)));
    }

    #[test]
    fn status_403_maps_to_permission_denied() {
        let err = DirectoryError::from_status(403, "locations/1");
        assert!(matches!(err, DirectoryError::PermissionDenied(_)));
    }

    #[test]
    fn status_429_maps_to_quota_exceeded() {
        let err = DirectoryError::from_status(429, "accounts");
        assert!(matches!(err, DirectoryError::QuotaExceeded(_)));
    }

    #[test]
    fn status_400_and_404_map_to_not_found() {
        assert!(DirectoryError::from_status(400, "reviews").is_not_found());
        assert!(DirectoryError::from_status(404, "reviews").is_not_found());
    }

    #[test]
    fn other_statuses_map_to_api_error() {
        let err = DirectoryError::from_status(500, "accounts");
        assert!(matches!(err, DirectoryError::Api { status: 500, .. }));
        assert!(!err.is_not_found());
    }
}
