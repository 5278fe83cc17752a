pub mod arrivals;
pub mod config;
pub mod metrics;
pub mod runner;
pub mod sampler;
pub mod station;

// Re-export commonly used types
pub use config::{LineConfig, StationConfig};
pub use metrics::LineMetrics;
pub use runner::{build_line, run_replications, run_simulation, SimulationResults};
