//! Error types for the research pipeline domain.
//!
//! [`ResearchError`] and [`GenerationError`] are produced by the adapters behind
//! the [`crate::ResearchClient`] and [`crate::ReportGenerator`] ports. The
//! orchestrator never lets either escape: it folds them into a [`RunFailure`],
//! whose `Display` output is the single human-readable message shown to the
//! user.
//!
//! [`ConfigError`] is produced at start-up; a run never begins with invalid
//! configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Component errors
// ---------------------------------------------------------------------------

/// Failures of a research call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResearchError {
    /// The research API key was not supplied. No request was sent.
    #[error("Research API key is missing")]
    MissingCredential,

    /// The API reported completion but the payload lacked a required field.
    #[error("Invalid research response: {reason}")]
    InvalidResponse {
        /// Which part of the payload was missing or malformed.
        reason: String,
    },

    /// Transport failure, non-success HTTP status, or an API-reported error.
    #[error("{message}")]
    NetworkOrApi {
        /// Description of the failure as reported by the transport or API.
        message: String,
    },
}

impl ResearchError {
    /// Shorthand for [`ResearchError::InvalidResponse`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ResearchError::NetworkOrApi`].
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkOrApi {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------

/// Failures of a text-generation call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The generation API key was not supplied. No request was sent.
    #[error("Generation API key is missing")]
    MissingCredential,

    /// The configured model or its endpoint cannot be used.
    #[error("{message}")]
    ModelInit {
        /// Description of the initialisation problem.
        message: String,
    },

    /// The generation request failed or returned no usable text.
    #[error("{message}")]
    Generation {
        /// Description of the failure.
        message: String,
    },
}

impl GenerationError {
    /// Shorthand for [`GenerationError::ModelInit`].
    pub fn model_init(message: impl Into<String>) -> Self {
        Self::ModelInit {
            message: message.into(),
        }
    }

    /// Shorthand for [`GenerationError::Generation`].
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Run-level failure
// ---------------------------------------------------------------------------

/// The stage of a run at which it terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Credential check before any network call.
    Preflight,
    /// The deep-research call.
    Research,
    /// First generation pass.
    Draft,
    /// Second generation pass.
    Enhance,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Preflight => "preflight",
            Stage::Research => "research",
            Stage::Draft => "draft",
            Stage::Enhance => "enhance",
        };
        f.write_str(name)
    }
}

/// Classification of a run failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingCredential,
    InvalidResponse,
    NetworkOrApiError,
    ModelInitError,
    GenerationError,
}

impl From<&ResearchError> for FailureKind {
    fn from(err: &ResearchError) -> Self {
        match err {
            ResearchError::MissingCredential => FailureKind::MissingCredential,
            ResearchError::InvalidResponse { .. } => FailureKind::InvalidResponse,
            ResearchError::NetworkOrApi { .. } => FailureKind::NetworkOrApiError,
        }
    }
}

impl From<&GenerationError> for FailureKind {
    fn from(err: &GenerationError) -> Self {
        match err {
            GenerationError::MissingCredential => FailureKind::MissingCredential,
            GenerationError::ModelInit { .. } => FailureKind::ModelInitError,
            GenerationError::Generation { .. } => FailureKind::GenerationError,
        }
    }
}

/// Terminal failure of a run.
///
/// `message` is ready to show to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RunFailure {
    /// Stage that failed; later stages were not attempted.
    pub stage: Stage,
    /// Error classification.
    pub kind: FailureKind,
    /// Human-readable failure message.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Invalid configuration detected before a run starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A setting has a value outside its permitted range.
    #[error("Invalid value for '{setting}': {reason}")]
    InvalidValue {
        /// Name of the offending setting.
        setting: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidValue`].
    pub fn invalid(setting: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            setting: setting.into(),
            reason: reason.into(),
        }
    }
}
