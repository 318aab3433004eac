//! Servus - embedded home automation controller.
//!
//! The crate root owns the control plane glue: the [`workspace::Workspace`]
//! lifecycle kernel that boots and unwinds the subsystems, the
//! construct-once [`slot::Slot`] each subsystem lives in, the
//! [`signals::SignalBridge`] that turns SIGINT/SIGTERM into a shutdown
//! request, and the [`monitor::Monitor`] status endpoint. The subsystems
//! themselves live in the member crates (`servus-gpio`, `servus-therma`,
//! `servus-pool`, `servus-www`, `servus-config`).

pub mod error;
pub mod monitor;
pub mod signals;
pub mod slot;
pub mod workspace;

pub use error::{Result, WorkspaceError};
pub use monitor::Monitor;
pub use signals::{ShutdownFlag, SignalBridge};
pub use slot::Slot;
pub use workspace::{LifecycleState, Workspace, WorkspaceOptions};
