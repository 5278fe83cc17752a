use crate::core::types::SimTime;
use serde::Serialize;

/// Counters published by one station
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StationCounters {
    pub name: String,
    /// Tokens taken from the input buffer
    pub pulled: u64,
    /// Tokens pushed into the output buffer
    pub output: u64,
    /// Minutes spent processing, excluding time blocked on the output
    pub busy_time: SimTime,
}

/// Buffer levels at one instant, in buffer registration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySample {
    pub time_min: SimTime,
    pub levels: Vec<usize>,
}

/// Passive accumulator for one run.
///
/// Written by the arrival generators and stations while the run is in
/// progress, read once after the horizon.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LineMetrics {
    /// New orders generated, whether accepted or lost
    pub new_attempts: u64,
    /// New orders that found room in their buffer
    pub arrivals_new: u64,
    /// New orders dropped because their buffer was full
    pub lost_new: u64,
    pub arrivals_returns: u64,
    pub stations: Vec<StationCounters>,
    pub inventory: Vec<InventorySample>,
}

impl LineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a counter slot for a station and return its index
    pub fn register_station(&mut self, name: &str) -> usize {
        self.stations.push(StationCounters {
            name: name.to_string(),
            ..StationCounters::default()
        });
        self.stations.len() - 1
    }

    pub fn station(&self, name: &str) -> Option<&StationCounters> {
        self.stations.iter().find(|station| station.name == name)
    }
}

/// Percentage of the horizon a station spent processing.
///
/// A zero horizon reports 0 rather than dividing by zero.
pub fn utilization_pct(busy_time: SimTime, horizon: SimTime) -> f64 {
    if horizon > 0.0 {
        100.0 * busy_time / horizon
    } else {
        0.0
    }
}
