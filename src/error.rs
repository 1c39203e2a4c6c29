//! Error type shared by every tuned control operation.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum TunedError {
    // Bus errors are rendered in the message and have no `source()`.
    #[error("failed to connect to system bus: {0}")]
    Connection(zbus::Error),

    #[error("D-Bus call {method} failed: {cause}")]
    Call { method: String, cause: zbus::Error },

    #[error("unexpected reply from {method}: {reason}")]
    Decode { method: String, reason: String },

    /// The daemon answered `(false, detail)`; displays the detail verbatim.
    #[error("{0}")]
    DaemonReportedFailure(String),

    #[error("timeout starting service {unit} after {attempts} status checks")]
    Timeout { unit: String, attempts: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TunedError {
    pub(crate) fn call(method: impl Into<String>, cause: impl Into<zbus::Error>) -> Self {
        Self::Call {
            method: method.into(),
            cause: cause.into(),
        }
    }

    pub(crate) fn decode(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            method: method.into(),
            reason: reason.into(),
        }
    }
}
