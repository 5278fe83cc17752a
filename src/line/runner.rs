use crate::core::builder::Simulation;
use crate::core::error::{Result, SimError};
use crate::core::execution::{ConcurrencyMode, Finished, ReplicationConfig};
use crate::core::trace::TraceRecord;
use crate::core::types::{SimTime, Token};
use crate::line::arrivals::{NewOrderSource, ReturnsSource};
use crate::line::config::LineConfig;
use crate::line::metrics::{utilization_pct, InventorySample, LineMetrics};
use crate::line::sampler::InventorySampler;
use crate::line::station::Station;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalReport {
    pub new_accepted: u64,
    pub new_lost: u64,
    pub new_attempts: u64,
    pub returns: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub name: String,
    pub output: u64,
    pub pulled: u64,
    pub busy_time: SimTime,
    pub utilization_pct: f64,
    pub workers_required: u32,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct BufferReport {
    pub name: String,
    pub capacity: usize,
    pub level: usize,
    /// Queued tokens, front first
    pub contents: Vec<Token>,
    /// Producers still blocked on a full buffer when the run ended
    pub waiting_putters: usize,
}

/// Plain snapshot of a finished run
#[derive(Debug, PartialEq, Serialize)]
pub struct SimulationResults {
    pub seed: u64,
    pub horizon: SimTime,
    pub final_time: SimTime,
    pub events_processed: u64,
    pub arrivals: ArrivalReport,
    pub stations: Vec<StationReport>,
    pub buffers: Vec<BufferReport>,
    /// Columns follow `buffers`
    pub inventory: Vec<InventorySample>,
    pub trace: Option<Vec<TraceRecord>>,
}

impl SimulationResults {
    fn from_finished(config: &LineConfig, finished: Finished<LineMetrics>) -> Self {
        let horizon = config.meta.horizon_min;
        let metrics = finished.shared;

        let stations = metrics
            .stations
            .iter()
            .zip(&config.forward_flow)
            .map(|(counters, station)| StationReport {
                name: counters.name.clone(),
                output: counters.output,
                pulled: counters.pulled,
                busy_time: counters.busy_time,
                utilization_pct: utilization_pct(counters.busy_time, horizon),
                workers_required: station.workers_required,
            })
            .collect();

        let buffers = finished
            .buffers
            .into_iter()
            .map(|store| BufferReport {
                name: store.name().to_string(),
                capacity: store.capacity(),
                level: store.len(),
                waiting_putters: store.waiting_putters(),
                contents: store.into_contents(),
            })
            .collect();

        Self {
            seed: config.meta.seed,
            horizon,
            final_time: finished.now,
            events_processed: finished.events_processed,
            arrivals: ArrivalReport {
                new_accepted: metrics.arrivals_new,
                new_lost: metrics.lost_new,
                new_attempts: metrics.new_attempts,
                returns: metrics.arrivals_returns,
            },
            stations,
            buffers,
            inventory: metrics.inventory,
            trace: finished.trace,
        }
    }

    pub fn station(&self, name: &str) -> Option<&StationReport> {
        self.stations.iter().find(|station| station.name == name)
    }

    pub fn buffer(&self, name: &str) -> Option<&BufferReport> {
        self.buffers.iter().find(|buffer| buffer.name == name)
    }
}

/// Wire buffers, arrival streams and stations from `config`.
///
/// Processes are registered in a fixed order (new orders, returns,
/// stations in flow order, sampler) so a seed fully determines the run.
pub fn build_line(config: &LineConfig) -> Result<Simulation<LineMetrics>> {
    let mut sim = Simulation::new().with_trace(config.meta.record_trace);

    for buffer in &config.buffers {
        sim.add_buffer(&buffer.name, buffer.capacity)?;
    }

    if let Some(new_orders) = &config.arrivals.new_orders {
        let target = sim.buffer_id(&new_orders.buffer)?;
        sim.add_process(Box::new(NewOrderSource::new(new_orders, target)?));
    }

    if let Some(returns) = &config.arrivals.returns {
        let target = sim.buffer_id(&returns.buffer)?;
        sim.add_process(Box::new(ReturnsSource::new(returns, target)?));
    }

    let mut seen = HashSet::new();
    for (slot, station) in config.forward_flow.iter().enumerate() {
        if !seen.insert(station.id.as_str()) {
            return Err(SimError::DuplicateName {
                kind: "station",
                name: station.id.clone(),
            });
        }
        let input = sim.buffer_id(&station.input)?;
        let output = sim.buffer_id(&station.output)?;
        sim.add_process(Box::new(Station::new(station, slot, input, output)?));
    }

    if let Some(interval) = config.meta.inventory_sample_min {
        let buffers = sim.buffer_ids();
        sim.add_process(Box::new(InventorySampler::new(interval, buffers)?));
    }

    Ok(sim)
}

/// Run one simulation up to `config.meta.horizon_min` and snapshot the result
pub fn run_simulation(config: &LineConfig) -> Result<SimulationResults> {
    let sim = build_line(config)?;

    let mut metrics = LineMetrics::new();
    for station in &config.forward_flow {
        metrics.register_station(&station.id);
    }

    debug!(
        "Starting run: seed {}, horizon {} min, {} processes",
        config.meta.seed,
        config.meta.horizon_min,
        sim.process_count()
    );

    let mut engine = sim.build(config.meta.seed, metrics)?;
    engine.run(config.meta.horizon_min)?;

    Ok(SimulationResults::from_finished(config, engine.finish()))
}

/// Run one independent replication per seed, results in seed order
pub fn run_replications(
    config: &LineConfig,
    seeds: &[u64],
    replication: &ReplicationConfig,
) -> Result<Vec<SimulationResults>> {
    let run_seed = |&seed: &u64| run_simulation(&config.clone().with_seed(seed));

    match replication.concurrency_mode {
        ConcurrencyMode::Sequential => seeds.iter().map(run_seed).collect(),
        ConcurrencyMode::Rayon => {
            info!("Running {} replications on rayon", seeds.len());
            match replication.thread_pool_size {
                Some(size) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(size)
                        .build()
                        .map_err(|err| SimError::ThreadPool(err.to_string()))?;
                    pool.install(|| seeds.par_iter().map(run_seed).collect())
                }
                None => seeds.par_iter().map(run_seed).collect(),
            }
        }
    }
}
