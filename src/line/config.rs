use crate::core::types::SimTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaConfig {
    pub seed: u64,
    pub horizon_min: SimTime,
    #[serde(default)]
    pub record_trace: bool,
    /// Sample every buffer level at this interval (minutes)
    #[serde(default)]
    pub inventory_sample_min: Option<SimTime>,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            horizon_min: 480.0,
            record_trace: false,
            inventory_sample_min: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferConfig {
    pub name: String,
    /// Signed so that a negative value is reported as an invalid capacity
    pub capacity: i64,
}

impl BufferConfig {
    pub fn new(name: &str, capacity: i64) -> Self {
        Self {
            name: name.to_string(),
            capacity,
        }
    }
}

/// Poisson stream of new orders, dropped when the target buffer is full
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrdersConfig {
    pub buffer: String,
    pub rate_per_min: f64,
}

/// Truck arrivals delivering batches of returns, never dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsConfig {
    pub buffer: String,
    pub interarrival_min: f64,
    pub batch_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrivalsConfig {
    #[serde(default)]
    pub new_orders: Option<NewOrdersConfig>,
    #[serde(default)]
    pub returns: Option<ReturnsConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    pub id: String,
    pub input: String,
    pub output: String,
    pub cycle_time_s: f64,
    /// Capacity hint only; stations always serve one token at a time
    #[serde(default)]
    pub workers_required: u32,
}

impl StationConfig {
    pub fn new(id: &str, input: &str, output: &str, cycle_time_s: f64) -> Self {
        Self {
            id: id.to_string(),
            input: input.to_string(),
            output: output.to_string(),
            cycle_time_s,
            workers_required: 0,
        }
    }

    pub fn with_workers_required(mut self, workers: u32) -> Self {
        self.workers_required = workers;
        self
    }
}

/// Parsed description of one production line run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    pub meta: MetaConfig,
    pub buffers: Vec<BufferConfig>,
    #[serde(default)]
    pub arrivals: ArrivalsConfig,
    #[serde(default)]
    pub forward_flow: Vec<StationConfig>,
}

impl Default for LineConfig {
    /// Baseline press line: new orders land in `neu_lager`, returns in
    /// `warenannahme`, and three presses run in series.
    fn default() -> Self {
        Self {
            meta: MetaConfig::default(),
            buffers: vec![
                BufferConfig::new("neu_lager", 50),
                BufferConfig::new("warenannahme", 100),
                BufferConfig::new("after_pressen_1", 10),
                BufferConfig::new("after_pressen_2", 10),
                BufferConfig::new("after_pressen_3", 1000),
            ],
            arrivals: ArrivalsConfig {
                new_orders: Some(NewOrdersConfig {
                    buffer: "neu_lager".to_string(),
                    rate_per_min: 1.0,
                }),
                returns: Some(ReturnsConfig {
                    buffer: "warenannahme".to_string(),
                    interarrival_min: 60.0,
                    batch_mean: 5.0,
                }),
            },
            forward_flow: vec![
                StationConfig::new("pressen_1", "neu_lager", "after_pressen_1", 45.0)
                    .with_workers_required(1),
                StationConfig::new("pressen_2", "after_pressen_1", "after_pressen_2", 50.0)
                    .with_workers_required(1),
                StationConfig::new("pressen_3", "after_pressen_2", "after_pressen_3", 40.0)
                    .with_workers_required(1),
            ],
        }
    }
}

impl LineConfig {
    /// An empty line: no buffers, arrivals or stations
    pub fn empty(seed: u64, horizon_min: SimTime) -> Self {
        Self {
            meta: MetaConfig {
                seed,
                horizon_min,
                ..MetaConfig::default()
            },
            buffers: Vec::new(),
            arrivals: ArrivalsConfig::default(),
            forward_flow: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.meta.seed = seed;
        self
    }

    pub fn with_horizon(mut self, horizon_min: SimTime) -> Self {
        self.meta.horizon_min = horizon_min;
        self
    }

    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.meta.record_trace = enabled;
        self
    }

    pub fn with_inventory_sampling(mut self, interval_min: SimTime) -> Self {
        self.meta.inventory_sample_min = Some(interval_min);
        self
    }

    pub fn with_buffer(mut self, name: &str, capacity: i64) -> Self {
        self.buffers.push(BufferConfig::new(name, capacity));
        self
    }

    pub fn with_new_orders(mut self, buffer: &str, rate_per_min: f64) -> Self {
        self.arrivals.new_orders = Some(NewOrdersConfig {
            buffer: buffer.to_string(),
            rate_per_min,
        });
        self
    }

    pub fn with_returns(mut self, buffer: &str, interarrival_min: f64, batch_mean: f64) -> Self {
        self.arrivals.returns = Some(ReturnsConfig {
            buffer: buffer.to_string(),
            interarrival_min,
            batch_mean,
        });
        self
    }

    pub fn with_station(mut self, station: StationConfig) -> Self {
        self.forward_flow.push(station);
        self
    }
}
