use super::buffer::Store;
use super::error::Result;
use super::event::{Request, Wake};
use super::types::{BufferId, SimTime};
use rand::rngs::StdRng;

/// A logical thread of simulated activity.
///
/// Processes are explicit state machines: the engine calls `resume` with
/// the outcome of the previous request and the process answers with its
/// next suspension point. Everything between two suspension points runs
/// atomically with respect to other processes.
pub trait Process<S> {
    fn name(&self) -> &str;

    fn resume(&mut self, wake: Wake, ctx: &mut Context<'_, S>) -> Result<Request>;
}

/// What a process may touch while it is being resumed
pub struct Context<'a, S> {
    now: SimTime,
    rng: &'a mut StdRng,
    shared: &'a mut S,
    buffers: &'a [Store],
}

impl<'a, S> Context<'a, S> {
    pub(crate) fn new(
        now: SimTime,
        rng: &'a mut StdRng,
        shared: &'a mut S,
        buffers: &'a [Store],
    ) -> Self {
        Self {
            now,
            rng,
            shared,
            buffers,
        }
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    /// The run's single seeded random stream
    pub fn rng(&mut self) -> &mut StdRng {
        &mut *self.rng
    }

    pub fn shared(&self) -> &S {
        &*self.shared
    }

    pub fn shared_mut(&mut self) -> &mut S {
        &mut *self.shared
    }

    /// Number of tokens currently queued in a buffer
    pub fn buffer_len(&self, buffer: BufferId) -> Option<usize> {
        self.buffers.get(buffer.0).map(Store::len)
    }

    pub fn buffer_name(&self, buffer: BufferId) -> Option<&str> {
        self.buffers.get(buffer.0).map(Store::name)
    }
}
