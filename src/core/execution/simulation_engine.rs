use crate::core::buffer::{Insert, Store, Taken};
use crate::core::error::{Result, SimError};
use crate::core::event::{Request, Wake};
use crate::core::event_scheduler::EventScheduler;
use crate::core::process::{Context, Process};
use crate::core::trace::{TraceAction, TraceRecord};
use crate::core::types::{BufferId, ProcessId, SimTime};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Discrete-event engine: one clock, one random stream, the buffers and the
/// processes that suspend on them.
///
/// Only one process runs at a time. A process woken by another process's
/// buffer operation is resumed through a zero-delay event, so simultaneous
/// resumptions are served from the central loop in FIFO order.
pub struct SimulationEngine<S> {
    scheduler: EventScheduler,
    processes: Vec<Box<dyn Process<S>>>,
    buffers: Vec<Store>,
    rng: StdRng,
    shared: S,
    trace: Option<Vec<TraceRecord>>,
    events_processed: u64,
}

/// Everything left once a run is over
pub struct Finished<S> {
    pub now: SimTime,
    pub buffers: Vec<Store>,
    pub shared: S,
    pub trace: Option<Vec<TraceRecord>>,
    pub events_processed: u64,
}

impl<S> SimulationEngine<S> {
    pub(crate) fn new(
        processes: Vec<Box<dyn Process<S>>>,
        buffers: Vec<Store>,
        seed: u64,
        shared: S,
        record_trace: bool,
    ) -> Result<Self> {
        let mut scheduler = EventScheduler::new();
        for index in 0..processes.len() {
            scheduler.schedule(0.0, ProcessId(index), Wake::Start)?;
        }

        Ok(Self {
            scheduler,
            processes,
            buffers,
            rng: StdRng::seed_from_u64(seed),
            shared,
            trace: record_trace.then(Vec::new),
            events_processed: 0,
        })
    }

    /// Run until no pending event is due at or before `until`.
    ///
    /// Events scheduled beyond the horizon are discarded and the clock is
    /// left at `until`. Returns the final clock value.
    pub fn run(&mut self, until: SimTime) -> Result<SimTime> {
        if !until.is_finite() || until < 0.0 {
            return Err(SimError::InvalidHorizon(until));
        }

        while self.step(until)? {}

        let abandoned = self.scheduler.pending();
        self.scheduler.clear();
        self.scheduler.advance_to(until);

        debug!(
            "Run finished at t={:.4}: {} events processed, {} abandoned past the horizon",
            self.now(),
            self.events_processed,
            abandoned
        );
        Ok(self.now())
    }

    /// Process the next event if it is due at or before `until`, returns
    /// true if one was processed
    pub fn step(&mut self, until: SimTime) -> Result<bool> {
        let previous = self.scheduler.now();
        let Some(event) = self.scheduler.pop_until(until) else {
            return Ok(false);
        };

        if event.time > previous {
            debug!("=== Simulated time {:.4} ===", event.time);
        }

        self.events_processed += 1;
        self.dispatch(event.process, event.wake)?;
        Ok(true)
    }

    /// Resume `process` and keep serving its requests until it suspends
    fn dispatch(&mut self, process: ProcessId, mut wake: Wake) -> Result<()> {
        loop {
            let now = self.scheduler.now();
            if self.trace.is_some() {
                let action = self.wake_action(&wake);
                self.record(process, action);
            }

            let request = {
                let mut ctx = Context::new(now, &mut self.rng, &mut self.shared, &self.buffers);
                self.processes[process.0].resume(wake, &mut ctx)?
            };

            wake = match request {
                Request::Timeout(delay) => {
                    self.scheduler.schedule(delay, process, Wake::Timeout)?;
                    self.record(process, TraceAction::AwaitingTimer { delay });
                    return Ok(());
                }
                Request::Get(buffer) => {
                    let taken = self.store_mut(buffer)?.get(process);
                    match taken {
                        Some(Taken { token, released }) => {
                            if let Some(putter) = released {
                                self.scheduler.schedule(0.0, putter, Wake::Stored { buffer })?;
                            }
                            Wake::Got { buffer, token }
                        }
                        None => {
                            trace!(
                                "{} waits on empty {}",
                                self.processes[process.0].name(),
                                self.buffers[buffer.0].name()
                            );
                            let action = TraceAction::AwaitingGet {
                                buffer: self.buffers[buffer.0].name().to_string(),
                            };
                            self.record(process, action);
                            return Ok(());
                        }
                    }
                }
                Request::Put(buffer, token) => {
                    let token_id = token.id().to_string();
                    let placed = self.store_mut(buffer)?.put(process, token);
                    match placed {
                        Some(insert) => {
                            self.complete_insert(buffer, insert)?;
                            Wake::Stored { buffer }
                        }
                        None => {
                            trace!(
                                "{} blocked putting {} into full {}",
                                self.processes[process.0].name(),
                                token_id,
                                self.buffers[buffer.0].name()
                            );
                            let action = TraceAction::AwaitingPut {
                                buffer: self.buffers[buffer.0].name().to_string(),
                                token: token_id,
                            };
                            self.record(process, action);
                            return Ok(());
                        }
                    }
                }
                Request::TryPut(buffer, token) => {
                    let offered = self.store_mut(buffer)?.offer(token);
                    match offered {
                        Ok(insert) => {
                            self.complete_insert(buffer, insert)?;
                            Wake::Stored { buffer }
                        }
                        Err(token) => Wake::Rejected { buffer, token },
                    }
                }
            };
        }
    }

    fn complete_insert(&mut self, buffer: BufferId, insert: Insert) -> Result<()> {
        if let Insert::HandedOff { getter, token } = insert {
            self.scheduler.schedule(0.0, getter, Wake::Got { buffer, token })?;
        }
        Ok(())
    }

    fn store_mut(&mut self, buffer: BufferId) -> Result<&mut Store> {
        self.buffers
            .get_mut(buffer.0)
            .ok_or(SimError::UnknownBuffer(buffer))
    }

    fn buffer_label(&self, buffer: BufferId) -> String {
        self.buffers
            .get(buffer.0)
            .map(|store| store.name().to_string())
            .unwrap_or_else(|| buffer.to_string())
    }

    fn wake_action(&self, wake: &Wake) -> TraceAction {
        match wake {
            Wake::Start => TraceAction::Started,
            Wake::Timeout => TraceAction::TimerFired,
            Wake::Got { buffer, token } => TraceAction::Received {
                buffer: self.buffer_label(*buffer),
                token: token.id().to_string(),
            },
            Wake::Stored { buffer } => TraceAction::Delivered {
                buffer: self.buffer_label(*buffer),
            },
            Wake::Rejected { buffer, token } => TraceAction::Rejected {
                buffer: self.buffer_label(*buffer),
                token: token.id().to_string(),
            },
        }
    }

    fn record(&mut self, process: ProcessId, action: TraceAction) {
        if self.trace.is_none() {
            return;
        }
        let time = self.scheduler.now();
        let name = self.processes[process.0].name().to_string();
        if let Some(trace) = self.trace.as_mut() {
            trace.push(TraceRecord {
                time,
                process: name,
                action,
            });
        }
    }

    /// Get current simulated time
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    pub fn buffer(&self, buffer: BufferId) -> Option<&Store> {
        self.buffers.get(buffer.0)
    }

    pub fn buffers(&self) -> &[Store] {
        &self.buffers
    }

    pub fn shared(&self) -> &S {
        &self.shared
    }

    /// Recorded trace, empty when tracing is off
    pub fn trace(&self) -> &[TraceRecord] {
        self.trace.as_deref().unwrap_or(&[])
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Check if there are pending events in the scheduler
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.has_events()
    }

    pub fn finish(self) -> Finished<S> {
        Finished {
            now: self.scheduler.now(),
            buffers: self.buffers,
            shared: self.shared,
            trace: self.trace,
            events_processed: self.events_processed,
        }
    }
}
