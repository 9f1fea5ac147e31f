//! proctor-core: Shared types, configuration, and error handling for the
//! Proctor interview-monitoring platform.
//!
//! This crate provides the foundational types used across all Proctor
//! components:
//! - Session and code-event types consumed by the detection pipeline
//! - Behavioral, speech, and signal-resolution metrics from collaborators
//! - Tagged session-event payloads for replay and ingestion
//! - Configuration management (thresholds, weights, catalogs)
//! - Common error types

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use error::ProctorError;
