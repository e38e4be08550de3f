//! Conversions from external infrastructure errors into domain errors.

use dunkstats_domain::DunkstatsError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct InfraError(pub DunkstatsError);

impl From<InfraError> for DunkstatsError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DunkstatsError> for InfraError {
    fn from(value: DunkstatsError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDunkstatsError {
    fn into_dunkstats(self) -> DunkstatsError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DunkstatsError */
/* -------------------------------------------------------------------------- */

impl IntoDunkstatsError for HttpError {
    fn into_dunkstats(self) -> DunkstatsError {
        if self.is_timeout() {
            return DunkstatsError::NetworkFailure("HTTP request timed out".into());
        }

        if self.is_connect() {
            return DunkstatsError::NetworkFailure(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return DunkstatsError::Serialization(format!("invalid response body: {self}"));
        }

        if self.is_builder() {
            return DunkstatsError::Internal(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => DunkstatsError::Auth(message),
                429 => DunkstatsError::RateLimitExceeded(message),
                400..=499 => DunkstatsError::MalformedRequest(message),
                _ => DunkstatsError::ServerUnavailable(message),
            };
        }

        DunkstatsError::NetworkFailure(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_dunkstats())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → DunkstatsError */
/* -------------------------------------------------------------------------- */

impl IntoDunkstatsError for std::io::Error {
    fn into_dunkstats(self) -> DunkstatsError {
        DunkstatsError::Io(format!("{:?}: {self}", self.kind()))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_dunkstats())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml → DunkstatsError */
/* -------------------------------------------------------------------------- */

impl IntoDunkstatsError for serde_json::Error {
    fn into_dunkstats(self) -> DunkstatsError {
        DunkstatsError::Serialization(format!(
            "JSON error at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_dunkstats())
    }
}

impl IntoDunkstatsError for toml::de::Error {
    fn into_dunkstats(self) -> DunkstatsError {
        DunkstatsError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_dunkstats())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
