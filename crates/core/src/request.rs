//! Validated identify request.

use crate::error::ResolveError;

/// An identify request that has passed input validation.
///
/// Construction guarantees at least one identifier is present and that both
/// are trimmed, non-empty strings. Whitespace-only input counts as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifyRequest {
    email: Option<String>,
    phone_number: Option<String>,
}

impl IdentifyRequest {
    /// Validate raw input into a request.
    ///
    /// Fails with `InvalidRequest` when both identifiers are absent or
    /// empty. This runs before any store access.
    pub fn new(
        email: Option<String>,
        phone_number: Option<String>,
    ) -> Result<Self, ResolveError> {
        let email = normalize(email);
        let phone_number = normalize(phone_number);

        if email.is_none() && phone_number.is_none() {
            return Err(ResolveError::invalid_request(
                "at least one of email or phoneNumber must be provided",
            ));
        }

        Ok(Self {
            email,
            phone_number,
        })
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_when_both_identifiers_absent() {
        let err = IdentifyRequest::new(None, None).unwrap_err();
        assert!(err.is_invalid_request());
    }

    #[test]
    fn rejects_when_both_identifiers_blank() {
        let err = IdentifyRequest::new(Some("  ".into()), Some("".into())).unwrap_err();
        assert!(err.is_invalid_request());
    }

    #[test]
    fn accepts_email_only() {
        let req = IdentifyRequest::new(Some("doc@hillvalley.edu".into()), None).unwrap();
        assert_eq!(req.email(), Some("doc@hillvalley.edu"));
        assert_eq!(req.phone_number(), None);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let req = IdentifyRequest::new(None, Some(" 123456 ".into())).unwrap();
        assert_eq!(req.phone_number(), Some("123456"));
    }
}
