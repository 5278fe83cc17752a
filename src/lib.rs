pub mod core;
pub mod line;

// Re-export commonly used types
pub use crate::core::builder::Simulation;
pub use crate::core::error::{Result, SimError};
pub use crate::core::event::{Request, Wake};
pub use crate::core::execution::{ConcurrencyMode, ReplicationConfig, SimulationEngine};
pub use crate::core::process::{Context, Process};
pub use crate::core::types::{BufferId, ProcessId, SimTime, Token, TokenKind};
pub use crate::line::{run_replications, run_simulation, LineConfig, SimulationResults};
