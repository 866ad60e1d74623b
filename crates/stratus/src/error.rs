//! Error types for Stratus operations.
//!
//! This module provides the main error type [`StratusError`] and the
//! [`ConfigurationError`] raised while turning a service catalog into a
//! diagram model. Validation problems are reported through
//! [`ValidationReport`](crate::validate::ValidationReport) and export problems
//! through [`export::Error`](crate::export::Error).

use std::io;

use thiserror::Error;

use crate::{export, validate::ValidationReport};

/// The main error type for Stratus operations.
#[derive(Debug, Error)]
pub enum StratusError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Validation failed with {} error(s)", .0.errors().len())]
    Validation(ValidationReport),

    #[error("Export error: {0}")]
    Export(#[from] export::Error),

    #[error("{failed} of {attempted} output format(s) failed")]
    Incomplete { failed: usize, attempted: usize },
}

/// Malformed or incomplete input configuration.
///
/// Raised by catalog loading and model construction. Never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("failed to parse catalog: {0}")]
    Parse(String),

    #[error("unsupported catalog format `{0}`, expected .toml or .json")]
    UnsupportedFormat(String),

    #[error("invalid canvas size {width}x{height}, both dimensions must be positive")]
    InvalidCanvas { width: f32, height: f32 },

    #[error("`{owner}` is missing required field `{field}`")]
    MissingField { owner: String, field: String },

    #[error("`{owner}` field `{field}` must be {expected}")]
    InvalidField {
        owner: String,
        field: String,
        expected: &'static str,
    },

    #[error("`{owner}` sets only part of its position, x, y, width and height go together")]
    PartialPosition { owner: String },

    #[error("container `{container}` refers to unknown service group `{group}`")]
    UnknownGroup { container: String, group: String },

    #[error("service group `{group}` is claimed by both `{first}` and `{second}`")]
    GroupClaimedTwice {
        group: String,
        first: String,
        second: String,
    },
}
