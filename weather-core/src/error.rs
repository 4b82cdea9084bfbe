use std::fmt;

use thiserror::Error;

/// Time resolution of a forecast payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Current,
    Hourly,
    Daily,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Current => "current",
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every failure a single dashboard run can surface.
///
/// Errors propagate to the caller untouched: nothing in this crate retries or
/// substitutes partial results.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No location found for '{query}'")]
    NotFound { query: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Schema mismatch in {granularity} payload: {detail}")]
    SchemaMismatch {
        granularity: Granularity,
        detail: String,
    },

    #[error("Upstream rate limit reached{}", retry_hint(.retry_after_secs))]
    UpstreamRateLimited { retry_after_secs: Option<u64> },

    #[error("The {0} payload contains no rows")]
    EmptySeries(Granularity),
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(" (retry after {secs}s)"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

impl DashboardError {
    pub(crate) fn schema(granularity: Granularity, detail: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            granularity,
            detail: detail.into(),
        }
    }

    pub(crate) fn transport(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("{context}: request timed out"))
        } else {
            Self::Transport(format!("{context}: {err}"))
        }
    }

    /// Short text suitable for showing in place of the dashboard.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::InvalidInput(message) => message.clone(),
            DashboardError::NotFound { query } => {
                format!("Could not find city: '{query}'. Please check the spelling.")
            }
            DashboardError::Transport(_) => {
                "Unable to reach the weather service. Please check your connection and try again."
                    .to_string()
            }
            DashboardError::MalformedResponse(_)
            | DashboardError::SchemaMismatch { .. }
            | DashboardError::EmptySeries(_) => {
                "The weather service returned data in an unexpected shape.".to_string()
            }
            DashboardError::UpstreamRateLimited { .. } => {
                "The weather service is throttling requests. Please wait a moment and try again."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_message_includes_retry_after() {
        let err = DashboardError::UpstreamRateLimited {
            retry_after_secs: Some(30),
        };
        assert_eq!(err.to_string(), "Upstream rate limit reached (retry after 30s)");

        let err = DashboardError::UpstreamRateLimited {
            retry_after_secs: None,
        };
        assert_eq!(err.to_string(), "Upstream rate limit reached");
    }

    #[test]
    fn schema_mismatch_names_the_granularity() {
        let err = DashboardError::schema(Granularity::Daily, "missing column 'wind_speed_10m_max'");
        let msg = err.to_string();

        assert!(msg.contains("daily payload"));
        assert!(msg.contains("wind_speed_10m_max"));
    }

    #[test]
    fn user_messages() {
        let err = DashboardError::NotFound {
            query: "Atlantis".into(),
        };
        assert!(err.user_message().contains("Atlantis"));

        let err = DashboardError::EmptySeries(Granularity::Hourly);
        assert!(err.user_message().contains("unexpected shape"));
        assert_eq!(err.to_string(), "The hourly payload contains no rows");
    }
}
