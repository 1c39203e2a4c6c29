//! D-Bus plumbing for talking to systemd and the tuned daemon.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  org.freedesktop.systemd1.Unit   ┌──────────────┐
//! │              │─────────────────────────────────>│ systemd      │
//! │  TunedClient │                                  └──────────────┘
//! │  (SystemBus) │  com.redhat.tuned.control        ┌──────────────┐
//! │              │─────────────────────────────────>│ tuned        │
//! └──────────────┘                                  └──────────────┘
//! ```
//!
//! Every primitive on [`SystemBus`] opens its own system bus connection and
//! drops it before returning.

mod bus;
mod connection;
pub mod names;
pub mod reply;
mod systemd;
mod tuned;

pub use bus::{Bus, SystemBus};
pub use connection::connect;
pub use reply::{DaemonResponse, Reply, ReplyValue, ResponseConvention};
pub use tuned::ControlMethod;
