use crate::core::error::{Result, SimError};
use crate::core::event::{Request, Wake};
use crate::core::process::{Context, Process};
use crate::core::types::{BufferId, SimTime, Token};
use crate::line::config::StationConfig;
use crate::line::metrics::LineMetrics;
use log::trace;

/// Where a station is in its pull/process/push loop
#[derive(Debug)]
pub enum StationState {
    /// Waiting on the input buffer
    Idle,
    /// Processing `token` since `started_at`
    Busy { token: Token, started_at: SimTime },
    /// Processing done, waiting for the output buffer to accept the token
    Blocked,
}

/// Serial single-server station.
///
/// Pulls one token, holds it for a fixed cycle time and pushes it
/// downstream. Busy time covers the processing interval only; time spent
/// blocked on a full output buffer is not credited.
pub struct Station {
    name: String,
    slot: usize,
    input: BufferId,
    output: BufferId,
    cycle_time: SimTime,
    workers_required: u32,
    state: StationState,
    pulled: u64,
    produced: u64,
    busy_time: SimTime,
}

impl Station {
    /// `slot` is the station's counter index in `LineMetrics`
    pub fn new(config: &StationConfig, slot: usize, input: BufferId, output: BufferId) -> Result<Self> {
        // Cycle times are configured in seconds, the clock runs in minutes
        let cycle_time = config.cycle_time_s / 60.0;
        if !(cycle_time >= 0.0) {
            return Err(SimError::InvalidDelay { delay: cycle_time });
        }

        Ok(Self {
            name: config.id.clone(),
            slot,
            input,
            output,
            cycle_time,
            workers_required: config.workers_required,
            state: StationState::Idle,
            pulled: 0,
            produced: 0,
            busy_time: 0.0,
        })
    }

    /// Processing duration in minutes
    pub fn cycle_time(&self) -> SimTime {
        self.cycle_time
    }

    // Not used to gate concurrency: one token is processed at a time.
    pub fn workers_required(&self) -> u32 {
        self.workers_required
    }

    pub fn state(&self) -> &StationState {
        &self.state
    }

    fn publish(&self, metrics: &mut LineMetrics) {
        if let Some(counters) = metrics.stations.get_mut(self.slot) {
            counters.pulled = self.pulled;
            counters.output = self.produced;
            counters.busy_time = self.busy_time;
        }
    }
}

impl Process<LineMetrics> for Station {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&mut self, wake: Wake, ctx: &mut Context<'_, LineMetrics>) -> Result<Request> {
        match (std::mem::replace(&mut self.state, StationState::Idle), wake) {
            (StationState::Idle, Wake::Start) => Ok(Request::Get(self.input)),
            (StationState::Idle, Wake::Got { token, .. }) => {
                self.pulled += 1;
                self.publish(ctx.shared_mut());
                trace!("[{}] processing {} at t={:.4}", self.name, token, ctx.now());
                self.state = StationState::Busy {
                    token,
                    started_at: ctx.now(),
                };
                Ok(Request::Timeout(self.cycle_time))
            }
            (StationState::Busy { token, started_at }, Wake::Timeout) => {
                self.busy_time += ctx.now() - started_at;
                self.publish(ctx.shared_mut());
                self.state = StationState::Blocked;
                Ok(Request::Put(self.output, token))
            }
            (StationState::Blocked, Wake::Stored { .. }) => {
                self.produced += 1;
                self.publish(ctx.shared_mut());
                Ok(Request::Get(self.input))
            }
            (state, other) => {
                self.state = state;
                Err(SimError::unexpected_wake(&self.name, &other))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TokenKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn press(cycle_time_s: f64) -> Result<Station> {
        let config = StationConfig::new("press", "in", "out", cycle_time_s);
        Station::new(&config, 0, BufferId(0), BufferId(1))
    }

    #[test]
    fn test_cycle_time_in_minutes() {
        assert_eq!(press(90.0).unwrap().cycle_time(), 1.5);
        assert_eq!(
            press(-6.0).err(),
            Some(SimError::InvalidDelay { delay: -0.1 })
        );
    }

    #[test]
    fn test_processing_loop() {
        let mut station = press(30.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut metrics = LineMetrics::new();
        metrics.register_station("press");

        let mut ctx = Context::new(0.0, &mut rng, &mut metrics, &[]);
        assert!(matches!(
            station.resume(Wake::Start, &mut ctx).unwrap(),
            Request::Get(BufferId(0))
        ));

        let token = Token::new("NEW-00001".to_string(), TokenKind::New, 0.0);
        let got = Wake::Got {
            buffer: BufferId(0),
            token,
        };
        assert!(matches!(
            station.resume(got, &mut ctx).unwrap(),
            Request::Timeout(delay) if delay == 0.5
        ));

        let mut ctx = Context::new(0.5, &mut rng, &mut metrics, &[]);
        match station.resume(Wake::Timeout, &mut ctx).unwrap() {
            Request::Put(buffer, token) => {
                assert_eq!(buffer, BufferId(1));
                assert_eq!(token.id(), "NEW-00001");
            }
            other => panic!("expected put, got {:?}", other),
        }
        assert_eq!(ctx.shared().stations[0].busy_time, 0.5);
        assert_eq!(ctx.shared().stations[0].output, 0);

        let stored = Wake::Stored {
            buffer: BufferId(1),
        };
        assert!(matches!(
            station.resume(stored, &mut ctx).unwrap(),
            Request::Get(BufferId(0))
        ));
        assert_eq!(metrics.stations[0].output, 1);
        assert_eq!(metrics.stations[0].pulled, 1);
    }

    #[test]
    fn test_unexpected_wake() {
        let mut station = press(30.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut metrics = LineMetrics::new();
        let mut ctx = Context::new(0.0, &mut rng, &mut metrics, &[]);

        assert!(matches!(
            station.resume(Wake::Timeout, &mut ctx),
            Err(SimError::UnexpectedWake { .. })
        ));
    }
}
