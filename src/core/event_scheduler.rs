use super::error::{Result, SimError};
use super::event::Wake;
use super::types::{ProcessId, SimTime};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
pub struct ScheduledEvent {
    pub time: SimTime,
    pub sequence_num: u64,
    pub process: ProcessId,
    pub wake: Wake,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Simulated clock plus the pending event set.
///
/// Events sharing a timestamp pop in the order they were scheduled.
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
    now: SimTime,
}

impl EventScheduler {
    /// Create a new EventScheduler with the clock at 0
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
            now: 0.0,
        }
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `wake` for `process` at `now + delay`
    pub fn schedule(&mut self, delay: SimTime, process: ProcessId, wake: Wake) -> Result<()> {
        // `!(>=)` also rejects NaN
        if !(delay >= 0.0) {
            return Err(SimError::InvalidDelay { delay });
        }

        self.event_queue.push(ScheduledEvent {
            time: self.now + delay,
            sequence_num: self.sequence_counter,
            process,
            wake,
        });
        self.sequence_counter += 1;
        Ok(())
    }

    /// Pop the earliest event if it is due at or before `until`, advancing the clock to it
    pub fn pop_until(&mut self, until: SimTime) -> Option<ScheduledEvent> {
        if self.peek_next_time()? > until {
            return None;
        }
        let event = self.event_queue.pop()?;
        self.now = event.time;
        Some(event)
    }

    /// Time of the next pending event
    pub fn peek_next_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|event| event.time)
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.event_queue.len()
    }

    /// Move the clock forward without running anything. Never moves it back.
    pub fn advance_to(&mut self, time: SimTime) {
        if time > self.now {
            self.now = time;
        }
    }

    /// Drop every pending event
    pub fn clear(&mut self) {
        self.event_queue.clear();
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
