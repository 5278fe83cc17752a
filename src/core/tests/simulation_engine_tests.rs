// Tests for SimulationEngine suspension and resumption order
#[cfg(test)]
mod tests {
    use crate::core::builder::Simulation;
    use crate::core::error::{Result, SimError};
    use crate::core::event::{Request, Wake};
    use crate::core::process::{Context, Process};
    use crate::core::trace::TraceAction;
    use crate::core::types::{BufferId, SimTime, Token, TokenKind};
    use std::collections::VecDeque;

    const PARKED: SimTime = 1e9;

    #[derive(Default)]
    struct Log {
        /// (time, process, token)
        received: Vec<(SimTime, String, String)>,
        rejected: Vec<String>,
        max_level: usize,
        ticks: u32,
    }

    /// Puts its tokens one after another with blocking semantics
    struct Feeder {
        name: String,
        buffer: BufferId,
        start_delay: SimTime,
        tokens: VecDeque<String>,
    }

    impl Feeder {
        fn new(name: &str, buffer: BufferId, start_delay: SimTime, count: usize) -> Self {
            Self {
                name: name.to_string(),
                buffer,
                start_delay,
                tokens: (0..count).map(|i| format!("{}-{}", name, i)).collect(),
            }
        }
    }

    impl Process<Log> for Feeder {
        fn name(&self) -> &str {
            &self.name
        }

        fn resume(&mut self, wake: Wake, ctx: &mut Context<'_, Log>) -> Result<Request> {
            match wake {
                Wake::Start => Ok(Request::Timeout(self.start_delay)),
                Wake::Timeout | Wake::Stored { .. } => match self.tokens.pop_front() {
                    Some(id) => Ok(Request::Put(
                        self.buffer,
                        Token::new(id, TokenKind::New, ctx.now()),
                    )),
                    None => Ok(Request::Timeout(PARKED)),
                },
                other => Err(SimError::unexpected_wake(&self.name, &other)),
            }
        }
    }

    /// Takes tokens and holds each one for `hold` before taking the next
    struct Sink {
        name: String,
        buffer: BufferId,
        start_delay: SimTime,
        hold: SimTime,
    }

    impl Sink {
        fn new(name: &str, buffer: BufferId, start_delay: SimTime, hold: SimTime) -> Self {
            Self {
                name: name.to_string(),
                buffer,
                start_delay,
                hold,
            }
        }
    }

    impl Process<Log> for Sink {
        fn name(&self) -> &str {
            &self.name
        }

        fn resume(&mut self, wake: Wake, ctx: &mut Context<'_, Log>) -> Result<Request> {
            let level = ctx.buffer_len(self.buffer).unwrap_or(0);
            let log = ctx.shared_mut();
            log.max_level = log.max_level.max(level);

            match wake {
                Wake::Start => Ok(Request::Timeout(self.start_delay)),
                Wake::Timeout => Ok(Request::Get(self.buffer)),
                Wake::Got { token, .. } => {
                    let now = ctx.now();
                    ctx.shared_mut()
                        .received
                        .push((now, self.name.clone(), token.id().to_string()));
                    Ok(Request::Timeout(self.hold))
                }
                other => Err(SimError::unexpected_wake(&self.name, &other)),
            }
        }
    }

    struct Ticker {
        period: SimTime,
    }

    impl Process<Log> for Ticker {
        fn name(&self) -> &str {
            "ticker"
        }

        fn resume(&mut self, wake: Wake, ctx: &mut Context<'_, Log>) -> Result<Request> {
            if let Wake::Timeout = wake {
                ctx.shared_mut().ticks += 1;
            }
            Ok(Request::Timeout(self.period))
        }
    }

    /// Offers two tokens without waiting
    struct Offerer {
        buffer: BufferId,
        offered: u32,
    }

    impl Process<Log> for Offerer {
        fn name(&self) -> &str {
            "offerer"
        }

        fn resume(&mut self, wake: Wake, ctx: &mut Context<'_, Log>) -> Result<Request> {
            if let Wake::Rejected { token, .. } = wake {
                ctx.shared_mut().rejected.push(token.id().to_string());
            }
            if self.offered < 2 {
                self.offered += 1;
                let id = format!("O-{}", self.offered);
                return Ok(Request::TryPut(self.buffer, Token::new(id, TokenKind::New, ctx.now())));
            }
            Ok(Request::Timeout(PARKED))
        }
    }

    #[test]
    fn test_tokens_leave_in_entry_order_and_respect_capacity() {
        let mut sim = Simulation::new();
        let buffer = sim.add_buffer("b", 2).unwrap();
        sim.add_process(Box::new(Feeder::new("f", buffer, 0.0, 6)));
        sim.add_process(Box::new(Sink::new("s", buffer, 0.0, 1.0)));

        let mut engine = sim.build(1, Log::default()).unwrap();
        engine.run(100.0).unwrap();

        let ids: Vec<&str> = engine
            .shared()
            .received
            .iter()
            .map(|(_, _, id)| id.as_str())
            .collect();
        assert_eq!(ids, vec!["f-0", "f-1", "f-2", "f-3", "f-4", "f-5"]);
        assert!(engine.shared().max_level <= 2);
        assert_eq!(engine.buffer(buffer).unwrap().len(), 0);
    }

    #[test]
    fn test_zero_capacity_rendezvous_timestamps_match() {
        let mut sim = Simulation::new().with_trace(true);
        let buffer = sim.add_buffer("handoff", 0).unwrap();
        sim.add_process(Box::new(Feeder::new("producer", buffer, 0.0, 1)));
        sim.add_process(Box::new(Sink::new("consumer", buffer, 3.0, 10.0)));

        let mut engine = sim.build(1, Log::default()).unwrap();
        engine.run(5.0).unwrap();

        let trace = engine.trace();
        let blocked = trace
            .iter()
            .find(|r| r.process == "producer" && matches!(r.action, TraceAction::AwaitingPut { .. }))
            .unwrap();
        assert_eq!(blocked.time, 0.0);

        let delivered = trace
            .iter()
            .find(|r| r.process == "producer" && matches!(r.action, TraceAction::Delivered { .. }))
            .unwrap();
        let received = trace
            .iter()
            .find(|r| r.process == "consumer" && matches!(r.action, TraceAction::Received { .. }))
            .unwrap();
        assert_eq!(delivered.time, 3.0);
        assert_eq!(received.time, delivered.time);
    }

    #[test]
    fn test_simultaneous_getters_resume_in_registration_order() {
        let mut sim = Simulation::new();
        let buffer = sim.add_buffer("b", 5).unwrap();
        sim.add_process(Box::new(Sink::new("s0", buffer, 0.0, 100.0)));
        sim.add_process(Box::new(Sink::new("s1", buffer, 0.0, 100.0)));
        sim.add_process(Box::new(Sink::new("s2", buffer, 0.0, 100.0)));
        sim.add_process(Box::new(Feeder::new("f", buffer, 1.0, 3)));

        let mut engine = sim.build(1, Log::default()).unwrap();
        engine.run(10.0).unwrap();

        assert_eq!(
            engine.shared().received,
            vec![
                (1.0, "s0".to_string(), "f-0".to_string()),
                (1.0, "s1".to_string(), "f-1".to_string()),
                (1.0, "s2".to_string(), "f-2".to_string()),
            ]
        );
    }

    #[test]
    fn test_blocked_putters_resume_in_order() {
        let mut sim = Simulation::new();
        let buffer = sim.add_buffer("b", 1).unwrap();
        sim.add_process(Box::new(Feeder::new("a", buffer, 0.0, 2)));
        sim.add_process(Box::new(Feeder::new("b", buffer, 0.0, 2)));
        sim.add_process(Box::new(Sink::new("s", buffer, 1.0, 1.0)));

        let mut engine = sim.build(1, Log::default()).unwrap();
        engine.run(20.0).unwrap();

        let ids: Vec<&str> = engine
            .shared()
            .received
            .iter()
            .map(|(_, _, id)| id.as_str())
            .collect();
        // a-0 is stored at once, then a-1 queues ahead of b-0
        assert_eq!(ids, vec!["a-0", "a-1", "b-0", "b-1"]);
    }

    #[test]
    fn test_run_stops_at_horizon() {
        let mut sim = Simulation::new();
        sim.add_process(Box::new(Ticker { period: 1.0 }));
        let mut engine = sim.build(1, Log::default()).unwrap();

        let end = engine.run(4.5).unwrap();
        assert_eq!(end, 4.5);
        assert_eq!(engine.shared().ticks, 4);
        assert!(!engine.has_pending_events());
    }

    #[test]
    fn test_event_at_horizon_is_processed() {
        let mut sim = Simulation::new();
        sim.add_process(Box::new(Ticker { period: 1.0 }));
        let mut engine = sim.build(1, Log::default()).unwrap();

        engine.run(5.0).unwrap();
        assert_eq!(engine.shared().ticks, 5);
    }

    #[test]
    fn test_zero_horizon_only_runs_time_zero_events() {
        let mut sim = Simulation::new();
        sim.add_process(Box::new(Ticker { period: 1.0 }));
        let mut engine = sim.build(1, Log::default()).unwrap();

        assert_eq!(engine.run(0.0).unwrap(), 0.0);
        assert_eq!(engine.events_processed(), 1);
        assert_eq!(engine.shared().ticks, 0);
    }

    #[test]
    fn test_invalid_horizon() {
        let mut engine = Simulation::<Log>::new().build(1, Log::default()).unwrap();
        assert_eq!(engine.run(-1.0), Err(SimError::InvalidHorizon(-1.0)));
        assert!(engine.run(f64::NAN).is_err());
    }

    #[test]
    fn test_negative_delay_aborts_run() {
        let mut sim = Simulation::new();
        sim.add_process(Box::new(Ticker { period: -2.0 }));
        let mut engine = sim.build(1, Log::default()).unwrap();

        assert_eq!(
            engine.run(10.0),
            Err(SimError::InvalidDelay { delay: -2.0 })
        );
    }

    #[test]
    fn test_try_put_hands_back_rejected_token() {
        let mut sim = Simulation::new();
        let buffer = sim.add_buffer("b", 1).unwrap();
        sim.add_process(Box::new(Offerer { buffer, offered: 0 }));
        let mut engine = sim.build(1, Log::default()).unwrap();
        engine.run(1.0).unwrap();

        assert_eq!(engine.shared().rejected, vec!["O-2".to_string()]);
        let store = engine.buffer(buffer).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.items().next().unwrap().id(), "O-1");
    }

    #[test]
    fn test_duplicate_and_missing_buffers() {
        let mut sim = Simulation::<Log>::new();
        sim.add_buffer("b", 1).unwrap();
        assert!(matches!(
            sim.add_buffer("b", 2),
            Err(SimError::DuplicateName { kind: "buffer", .. })
        ));
        assert!(matches!(
            sim.buffer_id("nope"),
            Err(SimError::MissingConfiguration { kind: "buffer", .. })
        ));
    }

    #[test]
    fn test_finish_hands_over_buffers() {
        let mut sim = Simulation::new();
        let buffer = sim.add_buffer("b", 3).unwrap();
        sim.add_process(Box::new(Feeder::new("f", buffer, 0.0, 5)));
        let mut engine = sim.build(1, Log::default()).unwrap();
        engine.run(1.0).unwrap();

        let finished = engine.finish();
        assert_eq!(finished.now, 1.0);
        let store = &finished.buffers[0];
        assert_eq!(store.len(), 3);
        assert_eq!(store.waiting_putters(), 1);
    }
}
