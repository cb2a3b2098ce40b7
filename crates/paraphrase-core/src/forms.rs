//! Client-side input shape validation.
//!
//! These checks only catch obviously malformed input before a round trip.
//! The backend remains the authority on password policy and everything else.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum characters accepted in the input pane.
pub const MAX_INPUT_CHARS: usize = 5000;

const MIN_LOGIN_PASSWORD_LENGTH: usize = 6;
const MIN_REGISTER_PASSWORD_LENGTH: usize = 8;
const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;

/// One `@`, non-empty local part, dotted domain, no whitespace.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@.][^\s@]*\.[^\s@.]+$").expect("valid email regex"));

/// Digits, spaces, dashes and parentheses, with an optional leading `+`.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s()-]+$").expect("valid phone regex"));

static DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("valid digit regex"));
static UPPER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").expect("valid upper regex"));
static LOWER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").expect("valid lower regex"));

/// Characters that satisfy the "special character" password rule.
static SPECIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[!@#$%^&*()\[\]?"'<>]"#).expect("valid special regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

fn validate_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Please enter a valid email address"));
    }
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        validate_email(&self.email, &mut errors);

        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        } else if self.password.chars().count() < MIN_LOGIN_PASSWORD_LENGTH {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 6 characters",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        let username_len = self.username.chars().count();
        if username_len == 0 {
            errors.push(FieldError::new("username", "Username is required"));
        } else if username_len < MIN_USERNAME_LENGTH {
            errors.push(FieldError::new(
                "username",
                "Username must be at least 3 characters",
            ));
        } else if username_len > MAX_USERNAME_LENGTH {
            errors.push(FieldError::new(
                "username",
                "Username must be at most 50 characters",
            ));
        }

        validate_email(&self.email, &mut errors);
        errors.extend(password_problems(&self.password));

        if self.phone_number.is_empty() {
            errors.push(FieldError::new("phone_number", "Phone number is required"));
        } else if !is_valid_phone(&self.phone_number) {
            errors.push(FieldError::new(
                "phone_number",
                "Please enter a valid phone number",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Every unmet registration password rule.
pub fn password_problems(password: &str) -> Vec<FieldError> {
    if password.is_empty() {
        return vec![FieldError::new("password", "Password is required")];
    }

    let mut problems = Vec::new();
    if password.chars().count() < MIN_REGISTER_PASSWORD_LENGTH {
        problems.push(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    if !DIGIT_RE.is_match(password) {
        problems.push(FieldError::new(
            "password",
            "Password must contain at least one digit",
        ));
    }
    if !UPPER_RE.is_match(password) {
        problems.push(FieldError::new(
            "password",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !LOWER_RE.is_match(password) {
        problems.push(FieldError::new(
            "password",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !SPECIAL_RE.is_match(password) {
        problems.push(FieldError::new(
            "password",
            "Password must contain at least one special character",
        ));
    }
    problems
}

/// Check text headed for the paraphrase endpoint.
pub fn validate_input_text(text: &str) -> Result<(), FieldError> {
    if text.trim().is_empty() {
        return Err(FieldError::new("text", "Please enter some text to paraphrase"));
    }
    if text.chars().count() > MAX_INPUT_CHARS {
        return Err(FieldError::new("text", "Text exceeds 5000 characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_form() -> RegisterForm {
        RegisterForm {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "Secret#123".to_string(),
            phone_number: "+1 (555) 010-0100".to_string(),
        }
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@.com"));
        assert!(!is_valid_email("ada@example."));
        assert!(!is_valid_email("ada@@example.com"));
        assert!(!is_valid_email("ada lovelace@example.com"));
        assert!(!is_valid_email("ada@example.com."));
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("5550100"));
        assert!(is_valid_phone("+44 20 7946-0958"));
        assert!(is_valid_phone("(555) 010-0100"));

        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("+"));
        assert!(!is_valid_phone("555-CALL"));
        assert!(!is_valid_phone("++5550100"));
    }

    #[test]
    fn test_login_form_reports_all_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "email");
        assert_eq!(errors[1].message, "Password is required");

        let form = LoginForm {
            email: "ada@example.com".to_string(),
            password: "12345".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec![FieldError::new("password", "Password must be at least 6 characters")]);

        let form = LoginForm {
            email: "ada@example.com".to_string(),
            password: "123456".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_register_form_valid() {
        assert!(register_form().validate().is_ok());
    }

    #[test]
    fn test_register_form_username_bounds() {
        let mut form = register_form();
        form.username = "ab".to_string();
        assert_eq!(form.validate().unwrap_err()[0].field, "username");

        form.username = "a".repeat(50);
        assert!(form.validate().is_ok());

        form.username = "a".repeat(51);
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_password_problems_lists_each_rule() {
        assert!(password_problems("Secret#123").is_empty());
        assert_eq!(password_problems("").len(), 1);
        // short, no digit, no uppercase, no special
        assert_eq!(password_problems("abc").len(), 4);
        assert_eq!(password_problems("SECRET#123").len(), 1);
        assert_eq!(password_problems("Secret1234").len(), 1);
        // Only the listed symbols count as special
        assert!(password_problems("Secret]123").is_empty());
        assert!(password_problems("Secret\"123").is_empty());
        assert_eq!(password_problems("Secret~123").len(), 1);
    }

    #[test]
    fn test_validate_input_text() {
        assert!(validate_input_text("Hello world").is_ok());
        assert!(validate_input_text("   \n").is_err());
        assert!(validate_input_text(&"x".repeat(MAX_INPUT_CHARS)).is_ok());
        assert!(validate_input_text(&"x".repeat(MAX_INPUT_CHARS + 1)).is_err());
        // Counted in characters, not bytes
        assert!(validate_input_text(&"é".repeat(MAX_INPUT_CHARS)).is_ok());
    }
}
