use crate::core::error::{Result, SimError};
use crate::core::event::{Request, Wake};
use crate::core::process::{Context, Process};
use crate::core::types::{BufferId, SimTime};
use crate::line::metrics::{InventorySample, LineMetrics};

/// Records every buffer level at time 0 and then at a fixed interval
pub struct InventorySampler {
    interval: SimTime,
    buffers: Vec<BufferId>,
}

impl InventorySampler {
    pub fn new(interval: SimTime, buffers: Vec<BufferId>) -> Result<Self> {
        // A zero interval would sample forever without advancing the clock
        if !(interval > 0.0) {
            return Err(SimError::InvalidDelay { delay: interval });
        }
        Ok(Self { interval, buffers })
    }

    fn sample(&self, ctx: &mut Context<'_, LineMetrics>) {
        let levels = self
            .buffers
            .iter()
            .map(|&buffer| ctx.buffer_len(buffer).unwrap_or(0))
            .collect();
        let time_min = ctx.now();
        ctx.shared_mut()
            .inventory
            .push(InventorySample { time_min, levels });
    }
}

impl Process<LineMetrics> for InventorySampler {
    fn name(&self) -> &str {
        "inventory_sampler"
    }

    fn resume(&mut self, wake: Wake, ctx: &mut Context<'_, LineMetrics>) -> Result<Request> {
        match wake {
            Wake::Start | Wake::Timeout => {
                self.sample(ctx);
                Ok(Request::Timeout(self.interval))
            }
            other => Err(SimError::unexpected_wake(self.name(), &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_must_be_positive() {
        assert!(InventorySampler::new(0.0, Vec::new()).is_err());
        assert!(InventorySampler::new(-5.0, Vec::new()).is_err());
        assert!(InventorySampler::new(15.0, Vec::new()).is_ok());
    }
}
