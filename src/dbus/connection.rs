//! System bus connector.

use tracing::debug;
use zbus::Connection;

use crate::error::TunedError;

/// Open a fresh connection to the system bus.
///
/// No retries; the connection closes when the returned handle is dropped,
/// so each caller owns it for exactly one operation.
pub async fn connect() -> Result<Connection, TunedError> {
    let connection = Connection::system().await.map_err(TunedError::Connection)?;
    debug!(
        unique_name = ?connection.unique_name(),
        "connected to system bus"
    );
    Ok(connection)
}
