//! Configuration management for the rating engine
//!
//! This module handles policy parameter loading from environment variables,
//! validation, and default values for rating runs.

pub mod engine;

// Re-export commonly used types
pub use engine::{EngineConfig, RoundingRule, UnknownCompetitorPolicy};
