//! Calls on the tuned control interface.

use std::fmt;

use tracing::debug;
use zbus::Connection;

use super::names::{TUNED_DEST, TUNED_INTERFACE, TUNED_PATH};
use super::reply::{Reply, ResponseConvention};
use crate::error::TunedError;

/// Methods of `com.redhat.tuned.control` used by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMethod {
    Disable,
    Profiles,
    IsRunning,
    ActiveProfile,
    VerifyProfile,
    SwitchProfile,
    AutoProfile,
    RecommendProfile,
}

impl ControlMethod {
    /// Member name on the bus.
    pub fn name(self) -> &'static str {
        match self {
            ControlMethod::Disable => "disable",
            ControlMethod::Profiles => "profiles",
            ControlMethod::IsRunning => "is_running",
            ControlMethod::ActiveProfile => "active_profile",
            ControlMethod::VerifyProfile => "verify_profile",
            ControlMethod::SwitchProfile => "switch_profile",
            ControlMethod::AutoProfile => "auto_profile",
            ControlMethod::RecommendProfile => "recommend_profile",
        }
    }

    pub fn convention(self) -> ResponseConvention {
        match self {
            ControlMethod::Disable => ResponseConvention::NoPayload,
            ControlMethod::SwitchProfile | ControlMethod::AutoProfile => {
                ResponseConvention::FlagDetail
            }
            ControlMethod::Profiles
            | ControlMethod::IsRunning
            | ControlMethod::ActiveProfile
            | ControlMethod::VerifyProfile
            | ControlMethod::RecommendProfile => ResponseConvention::DirectValue,
        }
    }
}

impl fmt::Display for ControlMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Invoke `method` with at most one string argument.
pub async fn call(
    connection: &Connection,
    method: ControlMethod,
    arg: Option<&str>,
) -> Result<Reply, TunedError> {
    let proxy = zbus::Proxy::new(connection, TUNED_DEST, TUNED_PATH, TUNED_INTERFACE)
        .await
        .map_err(|e| TunedError::call(method.name(), e))?;

    debug!(method = method.name(), ?arg, "calling tuned");
    let message = match arg {
        Some(arg) => proxy.call_method(method.name(), &(arg,)).await,
        None => proxy.call_method(method.name(), &()).await,
    }
    .map_err(|e| TunedError::call(method.name(), e))?;

    if method.convention() == ResponseConvention::NoPayload {
        return Ok(Reply::empty());
    }
    Reply::from_message(method.name(), &message)
}
