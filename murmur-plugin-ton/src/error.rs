use murmur_core::MurmurError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// One field that failed validation, e.g. `TON_PRIVATE_KEY: Required`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Error, Debug)]
pub enum TonConfigError {
    #[error("Ton configuration validation failed:\n{}", join_issues(.issues))]
    Validation { issues: Vec<ValidationIssue> },

    /// Settings lookup failed; carried through unchanged.
    #[error(transparent)]
    Provider(#[from] MurmurError),
}

impl TonConfigError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TonConfigError::Validation { .. })
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            TonConfigError::Validation { issues } => issues,
            TonConfigError::Provider(_) => &[],
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            TonConfigError::Validation { .. } => "E2005",
            TonConfigError::Provider(e) => e.error_code(),
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_each_field() {
        let err = TonConfigError::Validation {
            issues: vec![
                ValidationIssue::new("TON_PRIVATE_KEY", "Required"),
                ValidationIssue::new("TON_RPC_URL", "Required"),
            ],
        };

        assert_eq!(
            err.to_string(),
            "Ton configuration validation failed:\nTON_PRIVATE_KEY: Required\nTON_RPC_URL: Required"
        );
        assert!(err.is_validation());
        assert_eq!(err.issues().len(), 2);
    }

    #[test]
    fn test_provider_error_is_transparent() {
        let inner = MurmurError::SettingsUnavailable {
            key: "TON_RPC_URL".to_string(),
            message: "vault sealed".to_string(),
        };
        let expected = inner.to_string();

        let err = TonConfigError::from(inner);
        assert_eq!(err.to_string(), expected);
        assert!(!err.is_validation());
        assert!(err.issues().is_empty());
        assert_eq!(err.error_code(), "E3005");
    }
}
