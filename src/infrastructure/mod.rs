//! Infrastructure Layer
//!
//! Process lifecycle: shutdown coordination and the supervisor that runs
//! both transports.

pub mod shutdown;
pub mod supervisor;

pub use shutdown::{shutdown_signal, RequestGuard, ShutdownController};
pub use supervisor::{ServiceSupervisor, SupervisorState};
