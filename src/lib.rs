//! Control client for the tuned performance-tuning daemon.
//!
//! Talks to tuned over the system D-Bus (`com.redhat.tuned.control`) and to
//! systemd for the unit hosting it. Daemon operations make sure the unit is
//! running first, starting it and polling for a bounded time if needed.

pub mod client;
pub mod config;
pub mod dbus;
pub mod error;
pub mod guard;

// Re-export commonly used types for convenience
pub use client::TunedClient;
pub use config::Config;
pub use error::TunedError;
pub use guard::StartPolicy;
