//! Systemd unit control for the service hosting tuned.

use tracing::debug;
use zbus::fdo::PropertiesProxy;
use zbus::names::InterfaceName;
use zbus::proxy::CacheProperties;
use zbus::zvariant::OwnedObjectPath;
use zbus::Connection;

use super::names::{unit_object_path, SYSTEMD_DEST, SYSTEMD_UNIT_INTERFACE};
use super::reply::ReplyValue;
use crate::error::TunedError;

/// Proxy for `org.freedesktop.systemd1.Unit` job methods.
#[zbus::proxy(
    interface = "org.freedesktop.systemd1.Unit",
    default_service = "org.freedesktop.systemd1"
)]
trait Unit {
    fn start(&self, mode: &str) -> zbus::Result<OwnedObjectPath>;
    fn stop(&self, mode: &str) -> zbus::Result<OwnedObjectPath>;
}

async fn unit_proxy<'a>(connection: &Connection, unit: &str) -> zbus::Result<UnitProxy<'a>> {
    UnitProxy::builder(connection)
        .path(unit_object_path(unit))?
        .cache_properties(CacheProperties::No)
        .build()
        .await
}

/// Read the unit's `ActiveState` through `org.freedesktop.DBus.Properties.Get`.
pub async fn active_state(connection: &Connection, unit: &str) -> Result<String, TunedError> {
    let method = "Properties.Get(ActiveState)";
    let proxy = PropertiesProxy::builder(connection)
        .destination(SYSTEMD_DEST)
        .and_then(|b| b.path(unit_object_path(unit)))
        .map_err(|e| TunedError::call(method, e))?
        .build()
        .await
        .map_err(|e| TunedError::call(method, e))?;

    let value = proxy
        .get(
            InterfaceName::from_static_str_unchecked(SYSTEMD_UNIT_INTERFACE),
            "ActiveState",
        )
        .await
        .map_err(|e| TunedError::call(method, e))?;

    match ReplyValue::from(&*value) {
        ReplyValue::Str(state) => Ok(state),
        other => Err(TunedError::decode(
            method,
            format!("expected s, got {}", other.kind()),
        )),
    }
}

/// Queue a start job; the returned job path is discarded.
pub async fn start_unit(connection: &Connection, unit: &str, mode: &str) -> Result<(), TunedError> {
    let proxy = unit_proxy(connection, unit)
        .await
        .map_err(|e| TunedError::call("Unit.Start", e))?;
    let job = proxy
        .start(mode)
        .await
        .map_err(|e| TunedError::call("Unit.Start", e))?;
    debug!(unit, job = %job.as_str(), "start job queued");
    Ok(())
}

/// Queue a stop job; the returned job path is discarded.
pub async fn stop_unit(connection: &Connection, unit: &str, mode: &str) -> Result<(), TunedError> {
    let proxy = unit_proxy(connection, unit)
        .await
        .map_err(|e| TunedError::call("Unit.Stop", e))?;
    let job = proxy
        .stop(mode)
        .await
        .map_err(|e| TunedError::call("Unit.Stop", e))?;
    debug!(unit, job = %job.as_str(), "stop job queued");
    Ok(())
}
