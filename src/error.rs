//! Errors raised at the fallible edges of the crate.
//!
//! The aero model and the flow advection are total; only settings loading and
//! parameter validation can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating tunnel configuration
#[derive(Error, Debug)]
pub enum TunnelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfDomain {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

pub type Result<T, E = TunnelError> = std::result::Result<T, E>;
