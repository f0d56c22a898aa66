//! Error types for the RAM connector.

use thiserror::Error;

/// Result type alias using [`RamError`].
pub type RamResult<T> = Result<T, RamError>;

/// Remote error codes the connector recognizes.
///
/// Whether an API failure is absorbed as a no-op or propagated is decided by
/// matching on this enum; any code the connector does not recognize lands in
/// [`RamErrorCode::Unclassified`] and always propagates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RamErrorCode {
    /// `EntityNotExist.User` — the user does not exist.
    UserNotFound,
    /// `EntityNotExist.User.LoginProfile` — the user has no login profile.
    LoginProfileNotFound,
    /// `EntityAlreadyExists.User.Policy` — the policy is already attached.
    PolicyAlreadyAttached,
    /// `EntityNotExist.User.Policy` — the policy is not attached.
    PolicyNotAttached,
    /// `EntityAlreadyExists.User.Group` — the user is already in the group.
    AlreadyInGroup,
    /// `EntityNotExist.User.Group` — the user is not in the group.
    NotInGroup,
    /// Any other code, kept verbatim.
    Unclassified(String),
}

impl RamErrorCode {
    /// Classifies a wire code.
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code {
            "EntityNotExist.User" => Self::UserNotFound,
            "EntityNotExist.User.LoginProfile" => Self::LoginProfileNotFound,
            "EntityAlreadyExists.User.Policy" => Self::PolicyAlreadyAttached,
            "EntityNotExist.User.Policy" => Self::PolicyNotAttached,
            "EntityAlreadyExists.User.Group" => Self::AlreadyInGroup,
            "EntityNotExist.User.Group" => Self::NotInGroup,
            other => Self::Unclassified(other.to_string()),
        }
    }

    /// The wire spelling of this code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::UserNotFound => "EntityNotExist.User",
            Self::LoginProfileNotFound => "EntityNotExist.User.LoginProfile",
            Self::PolicyAlreadyAttached => "EntityAlreadyExists.User.Policy",
            Self::PolicyNotAttached => "EntityNotExist.User.Policy",
            Self::AlreadyInGroup => "EntityAlreadyExists.User.Group",
            Self::NotInGroup => "EntityNotExist.User.Group",
            Self::Unclassified(code) => code,
        }
    }
}

impl std::fmt::Display for RamErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when interacting with the RAM service.
#[derive(Debug, Error)]
pub enum RamError {
    /// Configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error response from the RAM API.
    #[error("RAM API error: {code} - {message}")]
    Api {
        code: RamErrorCode,
        message: String,
        request_id: String,
    },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl RamError {
    /// The remote error code, when this is an API error.
    #[must_use]
    pub fn api_code(&self) -> Option<&RamErrorCode> {
        match self {
            RamError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True when this is an API error carrying exactly `code`.
    pub(crate) fn is_api_code(&self, code: &RamErrorCode) -> bool {
        self.api_code() == Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        let codes = [
            ("EntityNotExist.User", RamErrorCode::UserNotFound),
            (
                "EntityNotExist.User.LoginProfile",
                RamErrorCode::LoginProfileNotFound,
            ),
            (
                "EntityAlreadyExists.User.Policy",
                RamErrorCode::PolicyAlreadyAttached,
            ),
            ("EntityNotExist.User.Policy", RamErrorCode::PolicyNotAttached),
            (
                "EntityAlreadyExists.User.Group",
                RamErrorCode::AlreadyInGroup,
            ),
            ("EntityNotExist.User.Group", RamErrorCode::NotInGroup),
        ];

        for (wire, expected) in codes {
            let parsed = RamErrorCode::parse(wire);
            assert_eq!(parsed, expected, "wire code {wire}");
            assert_eq!(parsed.as_str(), wire);
        }
    }

    #[test]
    fn test_parse_unclassified_code() {
        let parsed = RamErrorCode::parse("NoPermission.Policy");
        assert_eq!(
            parsed,
            RamErrorCode::Unclassified("NoPermission.Policy".to_string())
        );
        assert_eq!(parsed.as_str(), "NoPermission.Policy");
    }

    #[test]
    fn test_api_code_accessor() {
        let err = RamError::Api {
            code: RamErrorCode::UserNotFound,
            message: "user alice does not exist".to_string(),
            request_id: "req-1".to_string(),
        };
        assert!(err.is_api_code(&RamErrorCode::UserNotFound));
        assert!(!err.is_api_code(&RamErrorCode::NotInGroup));

        let err = RamError::Config("missing access key".to_string());
        assert!(err.api_code().is_none());
    }

    #[test]
    fn test_api_error_display() {
        let err = RamError::Api {
            code: RamErrorCode::PolicyNotAttached,
            message: "policy is not attached".to_string(),
            request_id: "req-2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "RAM API error: EntityNotExist.User.Policy - policy is not attached"
        );
    }
}
