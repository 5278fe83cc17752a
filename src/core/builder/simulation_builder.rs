use crate::core::buffer::Store;
use crate::core::error::{Result, SimError};
use crate::core::execution::simulation_engine::SimulationEngine;
use crate::core::process::Process;
use crate::core::types::{BufferId, ProcessId};
use std::collections::HashMap;

/// Imperative API for wiring buffers and processes before a run.
///
/// `S` is the state shared by every process of the run (typically a
/// metrics accumulator).
pub struct Simulation<S> {
    buffers: Vec<Store>,
    /// Buffer name -> id
    buffer_names: HashMap<String, BufferId>,
    processes: Vec<Box<dyn Process<S>>>,
    record_trace: bool,
}

impl<S> Simulation<S> {
    pub fn new() -> Self {
        Self {
            buffers: Vec::new(),
            buffer_names: HashMap::new(),
            processes: Vec::new(),
            record_trace: false,
        }
    }

    /// Record every resumption and suspension in the engine trace
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }

    /// Add a named bounded buffer. Capacity 0 makes every put a direct hand-off.
    pub fn add_buffer(&mut self, name: &str, capacity: i64) -> Result<BufferId> {
        if self.buffer_names.contains_key(name) {
            return Err(SimError::DuplicateName {
                kind: "buffer",
                name: name.to_string(),
            });
        }

        let store = Store::new(name, capacity)?;
        let id = BufferId(self.buffers.len());
        self.buffers.push(store);
        self.buffer_names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Look up a buffer added earlier
    pub fn buffer_id(&self, name: &str) -> Result<BufferId> {
        self.buffer_names
            .get(name)
            .copied()
            .ok_or_else(|| SimError::missing("buffer", name))
    }

    /// Buffer ids in the order they were added
    pub fn buffer_ids(&self) -> Vec<BufferId> {
        (0..self.buffers.len()).map(BufferId).collect()
    }

    /// Register a process. Processes start at time 0 in registration order.
    pub fn add_process(&mut self, process: Box<dyn Process<S>>) -> ProcessId {
        let id = ProcessId(self.processes.len());
        self.processes.push(process);
        id
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Build the engine with its random stream seeded from `seed`
    pub fn build(self, seed: u64, shared: S) -> Result<SimulationEngine<S>> {
        SimulationEngine::new(
            self.processes,
            self.buffers,
            seed,
            shared,
            self.record_trace,
        )
    }
}

impl<S> Default for Simulation<S> {
    fn default() -> Self {
        Self::new()
    }
}
