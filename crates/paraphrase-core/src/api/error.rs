use thiserror::Error;

use crate::models::ApiErrorResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - please log in again")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Request rejected: {0}")]
    Validation(String),

    #[error("{}", rate_limit_message(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

fn rate_limit_message(retry_after_secs: &Option<u64>) -> String {
    match *retry_after_secs {
        Some(secs) => format!("Rate limited - try again in {}s", secs),
        None => "Rate limited - please wait before retrying".to_string(),
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// The backend's `detail` message when the body carries one.
    fn detail(body: &str) -> String {
        match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(err) => Self::truncate_body(&err.detail),
            Err(_) => Self::truncate_body(body),
        }
    }

    /// Pull `N` out of "Rate limit exceeded. Try again in Ns."
    fn parse_retry_after(detail: &str) -> Option<u64> {
        let (_, tail) = detail.rsplit_once(" in ")?;
        let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = Self::detail(body);
        match status.as_u16() {
            400 | 422 => ApiError::Validation(detail),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited {
                retry_after_secs: Self::parse_retry_after(&detail),
            },
            500..=599 => ApiError::ServerError(detail),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, detail)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_maps_codes() {
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, r#"{"detail": "Not authorized"}"#),
            ApiError::AccessDenied(d) if d == "Not authorized"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, "missing"),
            ApiError::NotFound(d) if d == "missing"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"detail": "Invalid reCAPTCHA"}"#),
            ApiError::Validation(d) if d == "Invalid reCAPTCHA"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, "short and stout"),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_unprocessable_entity_keeps_raw_body() {
        // FastAPI-style validation errors carry a list, not a string
        let body = r#"{"detail": [{"loc": ["body", "text"], "msg": "too long"}]}"#;
        match ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, body) {
            ApiError::Validation(d) => assert_eq!(d, body),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rate_limit_parses_retry_after() {
        let body = r#"{"detail": "Rate limit exceeded. Try again in 42s."}"#;
        match ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, body) {
            ApiError::RateLimited { retry_after_secs } => assert_eq!(retry_after_secs, Some(42)),
            other => panic!("unexpected error: {:?}", other),
        }

        match ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, "slow down") {
            ApiError::RateLimited { retry_after_secs } => assert_eq!(retry_after_secs, None),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rate_limit_message() {
        let err = ApiError::RateLimited {
            retry_after_secs: Some(7),
        };
        assert_eq!(err.to_string(), "Rate limited - try again in 7s");
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with("(truncated, 510 total bytes)"));

        // Never split a multi-byte character
        let wide = "é".repeat(MAX_ERROR_BODY_LENGTH);
        assert!(ApiError::truncate_body(&wide).contains("truncated"));
    }
}
