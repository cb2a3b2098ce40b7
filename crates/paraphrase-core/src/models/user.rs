use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserRegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub recaptcha_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserRegisterResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserLoginRequest {
    pub email: String,
    pub password: String,
    pub recaptcha_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "bearer"
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Error body returned by the backend for non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ApiErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_defaults_token_type() {
        let resp: TokenResponse = serde_json::from_str(r#"{"access_token": "a.b.c"}"#)
            .expect("Failed to parse token response");
        assert_eq!(resp.access_token, "a.b.c");
        assert_eq!(resp.token_type, "bearer");
    }

    #[test]
    fn test_register_request_field_names() {
        let req = UserRegisterRequest {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "Secret#123".to_string(),
            phone_number: "+1 555 0100".to_string(),
            recaptcha_token: "captcha".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["phone_number"], "+1 555 0100");
        assert_eq!(value["recaptcha_token"], "captcha");
    }
}
