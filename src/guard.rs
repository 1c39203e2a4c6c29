//! Service availability guard.
//!
//! Before any daemon call the tuned unit must be active. If systemd reports
//! it `inactive`, a start job is queued and the state is polled a bounded
//! number of times. Status query failures never abort the guard; they read
//! as "not inactive" before the start and "not yet active" while polling.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::GuardConfig;
use crate::dbus::Bus;
use crate::error::TunedError;

pub const STATE_ACTIVE: &str = "active";
pub const STATE_INACTIVE: &str = "inactive";

/// Start-and-poll budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for StartPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            interval: Duration::from_secs(1),
        }
    }
}

impl From<&GuardConfig> for StartPolicy {
    fn from(config: &GuardConfig) -> Self {
        Self {
            attempts: config.poll_attempts,
            interval: config.poll_interval(),
        }
    }
}

/// Make sure the tuned unit is running, starting it if it is inactive.
///
/// `unit` is only used for diagnostics.
pub async fn ensure_service_running<B>(
    bus: &B,
    unit: &str,
    policy: StartPolicy,
) -> Result<(), TunedError>
where
    B: Bus + ?Sized,
{
    match bus.active_state().await {
        Ok(state) if state == STATE_INACTIVE => {}
        Ok(state) => {
            debug!(unit, state = %state, "service not inactive, nothing to do");
            return Ok(());
        }
        Err(e) => {
            debug!(unit, error = %e, "service state unknown, assuming running");
            return Ok(());
        }
    }

    info!(unit, "service inactive, starting it");
    bus.start_unit().await?;

    for attempt in 1..=policy.attempts {
        match bus.active_state().await {
            Ok(state) if state == STATE_ACTIVE => {
                debug!(unit, attempt, "service active");
                return Ok(());
            }
            Ok(state) => debug!(unit, attempt, state = %state, "service not active yet"),
            Err(e) => debug!(unit, attempt, error = %e, "service state query failed"),
        }

        if attempt < policy.attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    warn!(
        unit,
        attempts = policy.attempts,
        "service did not become active"
    );
    Err(TunedError::Timeout {
        unit: unit.to_string(),
        attempts: policy.attempts,
    })
}


#[cfg(test)]
mod tests {
    use super::testing::{query_failure, ScriptedBus};
    use super::*;
    use tokio::time::Instant;

    const UNIT: &str = "tuned.service";

    /// Paused clock only moves by whole sleeps; allow for timer rounding.
    fn assert_waited(started: Instant, expected: Duration) {
        let elapsed = started.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(100),
            "waited {:?}, expected {:?}",
            elapsed,
            expected
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_service_needs_no_start() {
        let bus = ScriptedBus::active();
        let started = Instant::now();

        ensure_service_running(&bus, UNIT, StartPolicy::default())
            .await
            .unwrap();

        assert_eq!(bus.starts(), 0);
        assert_eq!(bus.state_queries(), 1);
        assert_waited(started, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_states_need_no_start() {
        for state in [
            "active",
            "activating",
            "failed",
            "reloading",
            "deactivating",
            "",
        ] {
            let bus = ScriptedBus::with_states(vec![Ok(state.to_string())]);
            ensure_service_running(&bus, UNIT, StartPolicy::default())
                .await
                .unwrap();
            assert_eq!(bus.starts(), 0, "state {:?} triggered a start", state);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_error_is_tolerated() {
        let bus = ScriptedBus::with_states(vec![Err(query_failure())]);

        ensure_service_running(&bus, UNIT, StartPolicy::default())
            .await
            .unwrap();

        assert_eq!(bus.starts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_becomes_active_on_kth_poll() {
        for k in 1..=10u32 {
            let mut states = vec![Ok("inactive".to_string())];
            for _ in 1..k {
                states.push(Ok("activating".to_string()));
            }
            states.push(Ok("active".to_string()));
            let bus = ScriptedBus::with_states(states);
            let started = Instant::now();

            ensure_service_running(&bus, UNIT, StartPolicy::default())
                .await
                .unwrap();

            assert_eq!(bus.starts(), 1);
            // One pre-check plus k polls.
            assert_eq!(bus.state_queries(), 1 + k);
            assert_waited(started, Duration::from_secs(u64::from(k - 1)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_errors_count_as_not_yet_active() {
        let bus = ScriptedBus::with_states(vec![
            Ok("inactive".into()),
            Err(query_failure()),
            Err(query_failure()),
            Ok("active".into()),
        ]);
        let started = Instant::now();

        ensure_service_running(&bus, UNIT, StartPolicy::default())
            .await
            .unwrap();

        assert_eq!(bus.state_queries(), 4);
        assert_waited(started, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_after_all_polls() {
        let bus = ScriptedBus::with_states(vec![Ok("inactive".into())]);
        let started = Instant::now();

        let err = ensure_service_running(&bus, UNIT, StartPolicy::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TunedError::Timeout { attempts: 10, .. }));
        assert!(err.to_string().starts_with("timeout starting service"));
        assert_eq!(bus.state_queries(), 11);
        // Nine waits: none after the last poll.
        assert_waited(started, Duration::from_secs(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_start_skips_polling() {
        let bus = ScriptedBus::with_states(vec![Ok("inactive".into())]).failing_start("denied");
        let started = Instant::now();

        let err = ensure_service_running(&bus, UNIT, StartPolicy::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TunedError::Call { .. }));
        assert!(err.to_string().contains("denied"));
        assert_eq!(bus.state_queries(), 1);
        assert_waited(started, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_policy() {
        let bus = ScriptedBus::with_states(vec![Ok("inactive".into())]);
        let policy = StartPolicy {
            attempts: 3,
            interval: Duration::from_millis(250),
        };
        let started = Instant::now();

        let err = ensure_service_running(&bus, UNIT, policy)
            .await
            .unwrap_err();

        assert!(matches!(err, TunedError::Timeout { attempts: 3, .. }));
        assert_eq!(bus.state_queries(), 4);
        assert_waited(started, Duration::from_millis(500));
    }

    #[test]
    fn test_policy_from_config() {
        let config = GuardConfig {
            autostart: true,
            poll_attempts: 5,
            poll_interval_ms: 200,
        };
        let policy = StartPolicy::from(&config);
        assert_eq!(policy.attempts, 5);
        assert_eq!(policy.interval, Duration::from_millis(200));
        assert_eq!(
            StartPolicy::from(&GuardConfig::default()),
            StartPolicy::default()
        );
    }
}
