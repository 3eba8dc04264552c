//! Engine policy configuration
//!
//! All knobs that historically lived as per-season constants are collected
//! here so one engine can serve every pool: K-factor, initial rating, draw
//! handling, rounding rule, and the unknown-competitor policy.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// How a computed rating delta is rounded to a whole point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundingRule {
    /// Round half to even (banker's rounding)
    HalfToEven,
    /// Round half away from zero (ordinary rounding)
    HalfAwayFromZero,
}

/// What to do when a match references a competitor the engine has never seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownCompetitorPolicy {
    /// Abort the run with an error
    Fail,
    /// Skip the offending match and log a warning
    SkipAndLog,
}

/// Policy parameters for one rating run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Overall sensitivity constant; how much one match can move a rating
    pub k_factor: f64,
    /// Rating assigned to every competitor before any match is applied
    pub initial_rating: f64,
    /// Rounding applied to every computed delta
    pub rounding: RoundingRule,
    /// Whether draws are a legal outcome in this pool
    pub allow_draws: bool,
    /// Handling of matches that reference unregistered competitors
    pub on_unknown: UnknownCompetitorPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            k_factor: 20.0,
            initial_rating: 1500.0,
            rounding: RoundingRule::HalfToEven,
            allow_draws: false,
            on_unknown: UnknownCompetitorPolicy::Fail,
        }
    }
}

impl EngineConfig {
    /// Configuration for round-robin pool stages, where equal scores are legal
    pub fn pool_stage() -> Self {
        Self {
            allow_draws: true,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Variable lookup is injected so tests never touch the process-wide
    // environment.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(k) = get("K_FACTOR") {
            config.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid K_FACTOR value: {}", k))?;
        }
        if let Some(rating) = get("INITIAL_RATING") {
            config.initial_rating = rating
                .parse()
                .map_err(|_| anyhow!("Invalid INITIAL_RATING value: {}", rating))?;
        }
        if let Some(rule) = get("ROUNDING_RULE") {
            config.rounding = match rule.as_str() {
                "half_to_even" => RoundingRule::HalfToEven,
                "half_away_from_zero" => RoundingRule::HalfAwayFromZero,
                other => return Err(anyhow!("Invalid ROUNDING_RULE value: {}", other)),
            };
        }
        if let Some(draws) = get("ALLOW_DRAWS") {
            config.allow_draws = draws
                .parse()
                .map_err(|_| anyhow!("Invalid ALLOW_DRAWS value: {}", draws))?;
        }
        if let Some(policy) = get("ON_UNKNOWN_COMPETITOR") {
            config.on_unknown = match policy.as_str() {
                "fail" => UnknownCompetitorPolicy::Fail,
                "skip" => UnknownCompetitorPolicy::SkipAndLog,
                other => {
                    return Err(anyhow!("Invalid ON_UNKNOWN_COMPETITOR value: {}", other))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "K-factor must be a positive finite number".to_string(),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(crate::error::RatingError::ConfigurationError {
                message: "Initial rating must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
