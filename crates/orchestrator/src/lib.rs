//! Orchestration for the deep-research report pipeline.
//!
//! This crate provides the [`PipelineExecutor`] that sequences one run
//! (research, draft generation, enhancement), the prompt builders used between
//! stages, and a channel-backed [`ActivityObserver`](pipeline::ActivityObserver).
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The executor sequences calls to the
//! [`pipeline::ResearchClient`] and [`pipeline::ReportGenerator`] ports. It owns
//! no I/O of its own and is tested with in-memory port doubles.

pub mod executor;
pub mod observer;
pub mod prompts;

pub use executor::{
    PipelineExecutor, ResearchReport, RunOutcome, RunRequest, MISSING_CREDENTIALS_MESSAGE,
};
pub use observer::{activity_channel, ChannelObserver};
