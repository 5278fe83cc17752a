pub mod config;
pub mod simulation_engine;

// Re-export commonly used types
pub use config::{ConcurrencyMode, ReplicationConfig};
pub use simulation_engine::{Finished, SimulationEngine};
