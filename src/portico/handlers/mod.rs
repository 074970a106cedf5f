pub mod auth;
pub mod health;
pub mod pages;

// common functions for the handlers
use regex::Regex;

pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 100;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

fn valid_password(password: &str) -> bool {
    (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password.chars().count())
}

/// Validate the registration form. Returns human-readable messages, empty
/// when the form is acceptable.
pub fn validate_registration(name: &str, email: &str, password: &str) -> Vec<String> {
    let mut errors = validate_login(email, password);
    if name.trim().is_empty() {
        errors.insert(0, "Name must not be blank.".to_string());
    }
    errors
}

/// Validate the login form (email + password only).
pub fn validate_login(email: &str, password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if !valid_email(email) {
        errors.push("Email is not in a valid format.".to_string());
    }
    if !valid_password(password) {
        errors.push(format!(
            "Password must be between {PASSWORD_MIN_LEN} and {PASSWORD_MAX_LEN} characters."
        ));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("name.surname@example.co"));
    }

    #[test]
    fn valid_email_rejects_malformed_input() {
        assert!(!valid_email(""));
        assert!(!valid_email("plainaddress"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("a b@example.com"));
        assert!(!valid_email("@example.com"));
    }

    #[test]
    fn password_length_boundaries() {
        // 5 rejected, 6 accepted, 100 accepted, 101 rejected
        assert!(!validate_login("a@example.com", "12345")
            .is_empty());
        assert!(validate_login("a@example.com", "123456").is_empty());
        assert!(validate_login("a@example.com", &"x".repeat(100)).is_empty());
        assert!(!validate_login("a@example.com", &"x".repeat(101)).is_empty());
    }

    #[test]
    fn registration_requires_a_name() {
        let errors = validate_registration("", "a@example.com", "123456");
        assert_eq!(errors, vec!["Name must not be blank.".to_string()]);

        let errors = validate_registration("   ", "a@example.com", "123456");
        assert!(!errors.is_empty());

        assert!(validate_registration("Alice", "a@example.com", "123456").is_empty());
    }

    #[test]
    fn validation_collects_all_failures() {
        let errors = validate_registration("", "nope", "123");
        assert_eq!(errors.len(), 3);
    }
}
