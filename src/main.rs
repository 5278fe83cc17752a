use linesim::line::runner::{run_replications, run_simulation};
use linesim::{ConcurrencyMode, LineConfig, ReplicationConfig};
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let config = LineConfig::default().with_inventory_sampling(60.0);

    info!(
        "Press line: seed {}, horizon {} min, {} buffers, {} stations",
        config.meta.seed,
        config.meta.horizon_min,
        config.buffers.len(),
        config.forward_flow.len()
    );

    let results = run_simulation(&config)?;

    info!(
        "New orders: {} accepted, {} lost. Returns: {}",
        results.arrivals.new_accepted, results.arrivals.new_lost, results.arrivals.returns
    );
    for station in &results.stations {
        info!(
            "{}: output {}, busy {:.2} min, utilization {:.2}%",
            station.name, station.output, station.busy_time, station.utilization_pct
        );
    }
    for buffer in &results.buffers {
        info!("{} level at end: {}/{}", buffer.name, buffer.level, buffer.capacity);
    }

    let seeds: Vec<u64> = (1..=8).collect();
    let replication = ReplicationConfig::new().with_concurrency(ConcurrencyMode::Rayon);
    let replications = run_replications(&config, &seeds, &replication)?;
    let last_station = config.forward_flow.last().map(|station| station.id.as_str());
    if let Some(name) = last_station {
        let outputs: Vec<u64> = replications
            .iter()
            .filter_map(|run| run.station(name).map(|station| station.output))
            .collect();
        let mean = outputs.iter().sum::<u64>() as f64 / outputs.len().max(1) as f64;
        info!(
            "{} throughput over {} replications: mean {:.1} per run",
            name,
            outputs.len(),
            mean
        );
    }

    Ok(())
}
