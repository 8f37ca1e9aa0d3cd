//! Authenticated user identity.

use std::error::Error;
use std::fmt::{Display, Formatter};

const ANONYMOUS_USER_ID: &str = "anonymous";

/// Stable opaque user identifier supplied by the auth collaborator.
///
/// One persisted document exists per user id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidUserId(pub String);

impl Display for InvalidUserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "user id `{}` must be non-empty and must not contain `/` or whitespace",
            self.0
        )
    }
}

impl Error for InvalidUserId {}

impl UserId {
    /// Parses a user id, trimming surrounding whitespace.
    ///
    /// Ids become document keys and path segments, so `/` and inner
    /// whitespace are rejected.
    pub fn parse(value: &str) -> Result<Self, InvalidUserId> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.contains('/') || trimmed.contains(char::is_whitespace) {
            return Err(InvalidUserId(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Id used when no sign-in provider is configured.
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_USER_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
