//! Per-node failure classification: skip and continue, or abort the run.

use std::fmt;

use crate::error::FoafhubError;

/// Why a node was abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The platform refused access to this entity
    PermissionDenied(String),
    /// Connectivity fault; the client is rebuilt before continuing
    TransientNetwork(String),
    /// Quota ran out between pacing and the request
    RateLimited(String),
}

impl SkipReason {
    pub fn class(&self) -> &'static str {
        match self {
            SkipReason::PermissionDenied(_) => "permission denied",
            SkipReason::TransientNetwork(_) => "network fault",
            SkipReason::RateLimited(_) => "rate limited",
        }
    }

    pub fn needs_reconnect(&self) -> bool {
        matches!(self, SkipReason::TransientNetwork(_))
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PermissionDenied(detail)
            | SkipReason::TransientNetwork(detail)
            | SkipReason::RateLimited(detail) => write!(f, "{}: {}", self.class(), detail),
        }
    }
}

/// Outcome of a failed node step.
#[derive(Debug)]
pub enum StepError {
    Skip(SkipReason),
    Fatal(FoafhubError),
}

impl From<FoafhubError> for StepError {
    fn from(err: FoafhubError) -> Self {
        classify(err)
    }
}

/// Only the recoverable platform failures are skipped; anything else aborts.
pub fn classify(err: FoafhubError) -> StepError {
    match err {
        FoafhubError::PermissionDenied(detail) => StepError::Skip(SkipReason::PermissionDenied(detail)),
        FoafhubError::Network(detail) => StepError::Skip(SkipReason::TransientNetwork(detail)),
        FoafhubError::RateLimited(detail) => StepError::Skip(SkipReason::RateLimited(detail)),
        other => StepError::Fatal(other),
    }
}
