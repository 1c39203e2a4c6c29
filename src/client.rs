//! Tuned control client.
//!
//! Every daemon operation runs the availability guard first, then issues a
//! single call on `com.redhat.tuned.control` and decodes the reply according
//! to the method's response convention. The unit lifecycle primitives
//! (`service_status`, `service_start`, `service_stop`) talk to systemd
//! directly and never run the guard.

use tracing::debug;

use crate::config::Config;
use crate::dbus::{Bus, ControlMethod, DaemonResponse, SystemBus};
use crate::error::TunedError;
use crate::guard::{ensure_service_running, StartPolicy};

/// Client for the tuned daemon and its systemd unit.
pub struct TunedClient<B: Bus = SystemBus> {
    bus: B,
    unit: String,
    policy: StartPolicy,
    autostart: bool,
}

impl TunedClient<SystemBus> {
    /// Client on the system bus, configured from `config`.
    pub fn system(config: &Config) -> Self {
        let unit = config.service.unit.clone();
        Self::with_bus(SystemBus::new(unit.clone()), unit)
            .policy(StartPolicy::from(&config.guard))
            .autostart(config.guard.autostart)
    }
}

impl<B: Bus> TunedClient<B> {
    pub fn with_bus(bus: B, unit: impl Into<String>) -> Self {
        Self {
            bus,
            unit: unit.into(),
            policy: StartPolicy::default(),
            autostart: true,
        }
    }

    /// Override the start-and-poll budget.
    pub fn policy(mut self, policy: StartPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// When disabled, daemon calls go out without checking the unit first.
    pub fn autostart(mut self, enabled: bool) -> Self {
        self.autostart = enabled;
        self
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Ensure the tuned unit is active, starting it if needed.
    pub async fn ensure_service_running(&self) -> Result<(), TunedError> {
        ensure_service_running(&self.bus, &self.unit, self.policy).await
    }

    async fn dispatch(
        &self,
        method: ControlMethod,
        arg: Option<&str>,
    ) -> Result<DaemonResponse, TunedError> {
        if self.autostart {
            self.ensure_service_running().await?;
        }

        let reply = self.bus.call_control(method, arg).await?;
        debug!(method = method.name(), ?reply, "tuned replied");
        DaemonResponse::decode(method.name(), method.convention(), reply)
    }

    /// Turn off all tuning.
    pub async fn disable(&self) -> Result<(), TunedError> {
        self.dispatch(ControlMethod::Disable, None).await?;
        Ok(())
    }

    /// Available profiles, in the daemon's order.
    pub async fn profiles(&self) -> Result<Vec<String>, TunedError> {
        let method = ControlMethod::Profiles;
        self.dispatch(method, None)
            .await?
            .into_string_list(method.name())
    }

    /// Whether the daemon reports tuning as running.
    pub async fn is_running(&self) -> Result<bool, TunedError> {
        let method = ControlMethod::IsRunning;
        self.dispatch(method, None).await?.into_bool(method.name())
    }

    pub async fn active_profile(&self) -> Result<String, TunedError> {
        let method = ControlMethod::ActiveProfile;
        self.dispatch(method, None)
            .await?
            .into_string(method.name())
    }

    /// Whether the current system settings match the active profile.
    pub async fn verify_profile(&self) -> Result<bool, TunedError> {
        let method = ControlMethod::VerifyProfile;
        self.dispatch(method, None).await?.into_bool(method.name())
    }

    /// Switch to `profile`; the daemon's failure detail becomes the error.
    pub async fn switch_profile(&self, profile: &str) -> Result<(), TunedError> {
        let method = ControlMethod::SwitchProfile;
        self.dispatch(method, Some(profile))
            .await?
            .into_outcome(method.name())
    }

    /// Switch to the daemon's recommended profile.
    pub async fn auto_profile(&self) -> Result<(), TunedError> {
        let method = ControlMethod::AutoProfile;
        self.dispatch(method, None)
            .await?
            .into_outcome(method.name())
    }

    pub async fn recommend_profile(&self) -> Result<String, TunedError> {
        let method = ControlMethod::RecommendProfile;
        self.dispatch(method, None)
            .await?
            .into_string(method.name())
    }

    /// Raw `ActiveState` of the unit (`active`, `inactive`, ...).
    pub async fn service_status(&self) -> Result<String, TunedError> {
        self.bus.active_state().await
    }

    /// Queue a start job. Success means systemd accepted the job, not that
    /// the unit reached `active`.
    pub async fn service_start(&self) -> Result<(), TunedError> {
        self.bus.start_unit().await
    }

    /// Queue a stop job.
    pub async fn service_stop(&self) -> Result<(), TunedError> {
        self.bus.stop_unit().await
    }
}
