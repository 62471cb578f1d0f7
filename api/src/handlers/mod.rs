//! Resource handlers.
//!
//! One module per resource. Every handler follows the same shape:
//! extract → validate field presence → authorize → mutate through a
//! repository trait → map domain errors to HTTP.

pub mod posts;
pub mod profile;
pub mod session;
pub mod users;

/// Minimal structural email check: one `@` with a dotted domain.
///
/// Deliverability is not this layer's problem; the check only catches
/// obviously malformed input the same way the original validator did.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// True when an optional field is present with non-blank content.
pub(crate) fn present(field: Option<&String>) -> bool {
    field.is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@com."));
    }

    #[test]
    fn presence_check() {
        assert!(present(Some(&"x".to_string())));
        assert!(!present(Some(&"  ".to_string())));
        assert!(!present(None));
    }
}
