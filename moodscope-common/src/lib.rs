//! Shared plumbing for moodscope services: the `~/.moodscope/config.json`
//! config layer with env overrides and validation, plus tracing setup.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::{
    ClassifierConfig, Config, NetworkConfig, ObservabilityConfig, SummarizerConfig, TwitterConfig,
};
pub use error::{Error, Result};
pub use validation::{Validate, ValidationError, ValidationResult};
