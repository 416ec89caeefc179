//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use subdomain_bot_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Subdomain label failed syntax validation
    #[error("Invalid subdomain name: {0}")]
    InvalidName(String),

    /// Label would shadow an owned subdomain or the base domain itself
    #[error("Invalid subdomain: {0}")]
    InvalidSubdomain(String),

    /// Balance too low for the requested operation
    #[error("Insufficient credits: {required} required, {available} available")]
    InsufficientCredits { required: u64, available: u64 },

    /// A record with the requested name already exists in the zone
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Referenced entity absent locally or remotely
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller lacks administrator privilege
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The DNS provider could not be reached
    #[error("DNS provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// A confirmation window or external call exceeded its deadline
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The messaging gateway failed to deliver or resolve
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::InvalidName(_)
            | Self::InvalidSubdomain(_)
            | Self::InsufficientCredits { .. }
            | Self::AlreadyExists(_)
            | Self::NotFound(_)
            | Self::PermissionDenied(_)
            | Self::Timeout(_)
            | Self::ValidationError(_) => true,
            Self::Provider(e) => e.is_expected(),
            _ => false,
        }
    }

    /// Normalize a provider failure from a read path.
    ///
    /// Transport-level failures become [`ProviderUnavailable`](Self::ProviderUnavailable);
    /// everything else keeps the provider's own classification.
    #[must_use]
    pub fn from_provider_read(err: ProviderError) -> Self {
        if err.is_unavailable() {
            Self::ProviderUnavailable(err.to_string())
        } else {
            Self::Provider(err)
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn network_error() -> ProviderError {
        ProviderError::NetworkError {
            provider: "cloudflare".to_string(),
            detail: "connection refused".to_string(),
        }
    }

    #[test]
    fn expected_errors() {
        assert!(CoreError::InvalidName("a b".to_string()).is_expected());
        assert!(
            CoreError::InsufficientCredits {
                required: 10,
                available: 3
            }
            .is_expected()
        );
        assert!(CoreError::Timeout("reset".to_string()).is_expected());
        assert!(!CoreError::StorageError("disk full".to_string()).is_expected());
        assert!(!CoreError::ProviderUnavailable("down".to_string()).is_expected());
    }

    #[test]
    fn provider_expectation_is_delegated() {
        let not_found = ProviderError::RecordNotFound {
            provider: "cloudflare".to_string(),
            record_id: "r1".to_string(),
            raw_message: None,
        };
        assert!(CoreError::from(not_found).is_expected());
        assert!(!CoreError::from(network_error()).is_expected());
    }

    #[test]
    fn read_failures_become_unavailable() {
        assert!(matches!(
            CoreError::from_provider_read(network_error()),
            CoreError::ProviderUnavailable(_)
        ));

        let denied = ProviderError::InvalidCredentials {
            provider: "cloudflare".to_string(),
            raw_message: None,
        };
        assert!(matches!(
            CoreError::from_provider_read(denied),
            CoreError::Provider(ProviderError::InvalidCredentials { .. })
        ));
    }

    #[test]
    fn insufficient_credits_message() {
        let err = CoreError::InsufficientCredits {
            required: 10,
            available: 4,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient credits: 10 required, 4 available"
        );
    }
}
