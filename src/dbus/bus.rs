//! Bus seam used by the service guard and the tuned client.

use async_trait::async_trait;

use super::connection::connect;
use super::names::JOB_MODE_REPLACE;
use super::reply::Reply;
use super::systemd;
use super::tuned::{self, ControlMethod};
use crate::error::TunedError;

/// Remote primitives the client is built from.
///
/// Each call is self-contained: implementations must not hold a connection
/// across calls.
#[async_trait]
pub trait Bus: Send + Sync {
    /// Current `ActiveState` of the tuned unit.
    async fn active_state(&self) -> Result<String, TunedError>;

    /// Request a start job for the tuned unit.
    async fn start_unit(&self) -> Result<(), TunedError>;

    /// Request a stop job for the tuned unit.
    async fn stop_unit(&self) -> Result<(), TunedError>;

    /// Invoke one method on the tuned control interface.
    async fn call_control(
        &self,
        method: ControlMethod,
        arg: Option<&str>,
    ) -> Result<Reply, TunedError>;
}

/// [`Bus`] over the real system bus, one connection per call.
#[derive(Debug, Clone)]
pub struct SystemBus {
    unit: String,
}

impl SystemBus {
    pub fn new(unit: impl Into<String>) -> Self {
        Self { unit: unit.into() }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

#[async_trait]
impl Bus for SystemBus {
    async fn active_state(&self) -> Result<String, TunedError> {
        let connection = connect().await?;
        systemd::active_state(&connection, &self.unit).await
    }

    async fn start_unit(&self) -> Result<(), TunedError> {
        let connection = connect().await?;
        systemd::start_unit(&connection, &self.unit, JOB_MODE_REPLACE).await
    }

    async fn stop_unit(&self) -> Result<(), TunedError> {
        let connection = connect().await?;
        systemd::stop_unit(&connection, &self.unit, JOB_MODE_REPLACE).await
    }

    async fn call_control(
        &self,
        method: ControlMethod,
        arg: Option<&str>,
    ) -> Result<Reply, TunedError> {
        let connection = connect().await?;
        tuned::call(&connection, method, arg).await
    }
}
