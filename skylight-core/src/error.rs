use thiserror::Error;

/// Which upstream service a [`ServiceError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Observation,
    Forecast,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Observation => "observation",
            Upstream::Forecast => "forecast",
        }
    }
}

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed upstream call. Propagated to the caller, never retried; the
/// aggregator also records it in the view-model state.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to send {0} request")]
    Request(Upstream, #[source] reqwest::Error),

    #[error("{upstream} request failed with status {status}: {body}")]
    Status {
        upstream: Upstream,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed {0} response: {1}")]
    Malformed(Upstream, String),
}

impl ServiceError {
    pub fn upstream(&self) -> Upstream {
        match self {
            ServiceError::Request(upstream, _) => *upstream,
            ServiceError::Status { upstream, .. } => *upstream,
            ServiceError::Malformed(upstream, _) => *upstream,
        }
    }
}
