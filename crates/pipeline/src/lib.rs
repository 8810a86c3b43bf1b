//! Core domain for the deep-research report pipeline.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, error type, and port trait used throughout the workspace.
//! Infrastructure crates implement the traits defined here; they never add
//! domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RunId`, `Topic`, `ModelId`) |
//! | [`credentials`] | Run-scoped, redacted API keys |
//! | [`types`] | Value types (`ResearchParams`, `ResearchFindings`, `ActivityEvent`, etc.) |
//! | [`errors`] | Component errors, run failure, configuration errors |
//! | [`ports`] | `ResearchClient`, `ReportGenerator`, `ActivityObserver` |

pub mod credentials;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use credentials::{ApiKey, Credentials};
pub use errors::{ConfigError, FailureKind, GenerationError, ResearchError, RunFailure, Stage};
pub use identifiers::{ModelId, RunId, Topic};
pub use ports::{ActivityObserver, NoopObserver, ReportGenerator, ResearchClient};
pub use types::{ActivityEvent, ReportText, ResearchFindings, ResearchParams, Source, Timestamp};
