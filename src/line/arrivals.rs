use crate::core::error::{Result, SimError};
use crate::core::event::{Request, Wake};
use crate::core::process::{Context, Process};
use crate::core::types::{BufferId, SimTime, Token, TokenKind};
use crate::line::config::{NewOrdersConfig, ReturnsConfig};
use crate::line::metrics::LineMetrics;
use log::{debug, trace};
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};

/// Wait used for a stream that never fires
pub const NEVER: SimTime = 1e9;

/// Exponential interarrival times, or no arrivals at all
#[derive(Debug, Clone, Copy)]
pub enum Interarrival {
    Exponential(Exp<f64>),
    Never,
}

impl Interarrival {
    /// Poisson stream with `rate` arrivals per minute; `rate <= 0` never fires
    pub fn from_rate(stream: &str, rate: f64) -> Result<Self> {
        if !(rate > 0.0) {
            return Ok(Interarrival::Never);
        }
        if !rate.is_finite() {
            return Err(SimError::InvalidDistribution {
                stream: stream.to_string(),
                reason: format!("arrival rate {} is not finite", rate),
            });
        }
        Exp::new(rate)
            .map(Interarrival::Exponential)
            .map_err(|err| SimError::InvalidDistribution {
                stream: stream.to_string(),
                reason: err.to_string(),
            })
    }

    /// Poisson stream with a mean gap of `mean` minutes; `mean <= 0` never fires
    pub fn from_mean(stream: &str, mean: SimTime) -> Result<Self> {
        if !(mean > 0.0) {
            return Ok(Interarrival::Never);
        }
        Self::from_rate(stream, 1.0 / mean)
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> SimTime {
        match self {
            Interarrival::Exponential(exp) => exp.sample(rng),
            Interarrival::Never => NEVER,
        }
    }
}

/// New orders: wait, create one token, drop it if the buffer is full.
pub struct NewOrderSource {
    name: String,
    buffer: BufferId,
    interarrival: Interarrival,
    generated: u64,
}

impl NewOrderSource {
    pub fn new(config: &NewOrdersConfig, buffer: BufferId) -> Result<Self> {
        let name = "new_orders".to_string();
        let interarrival = Interarrival::from_rate(&name, config.rate_per_min)?;
        Ok(Self {
            name,
            buffer,
            interarrival,
            generated: 0,
        })
    }

    fn wait(&self, ctx: &mut Context<'_, LineMetrics>) -> Request {
        Request::Timeout(self.interarrival.draw(ctx.rng()))
    }
}

impl Process<LineMetrics> for NewOrderSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&mut self, wake: Wake, ctx: &mut Context<'_, LineMetrics>) -> Result<Request> {
        match wake {
            Wake::Start => Ok(self.wait(ctx)),
            Wake::Timeout => {
                self.generated += 1;
                ctx.shared_mut().new_attempts += 1;
                let token = Token::new(
                    format!("NEW-{:05}", self.generated),
                    TokenKind::New,
                    ctx.now(),
                );
                Ok(Request::TryPut(self.buffer, token))
            }
            Wake::Stored { .. } => {
                ctx.shared_mut().arrivals_new += 1;
                Ok(self.wait(ctx))
            }
            Wake::Rejected { token, .. } => {
                debug!("[{}] {} lost at t={:.4}: buffer full", self.name, token, ctx.now());
                ctx.shared_mut().lost_new += 1;
                Ok(self.wait(ctx))
            }
            other => Err(SimError::unexpected_wake(&self.name, &other)),
        }
    }
}

/// Returns: a truck arrives, then each token of its batch is put with
/// blocking semantics. Returns are never dropped.
pub struct ReturnsSource {
    name: String,
    buffer: BufferId,
    interarrival: Interarrival,
    batch: Normal<f64>,
    remaining: u32,
    generated: u64,
}

impl ReturnsSource {
    pub fn new(config: &ReturnsConfig, buffer: BufferId) -> Result<Self> {
        let name = "returns".to_string();
        let interarrival = Interarrival::from_mean(&name, config.interarrival_min)?;
        let batch = Normal::new(config.batch_mean, 1.0).map_err(|err| {
            SimError::InvalidDistribution {
                stream: name.clone(),
                reason: err.to_string(),
            }
        })?;

        Ok(Self {
            name,
            buffer,
            interarrival,
            batch,
            remaining: 0,
            generated: 0,
        })
    }

    /// Normal batch size rounded to the nearest integer, at least 1
    fn draw_batch(&self, ctx: &mut Context<'_, LineMetrics>) -> u32 {
        let size = self.batch.sample(ctx.rng()).round();
        size.max(1.0) as u32
    }

    fn put_next(&mut self, now: SimTime) -> Request {
        self.remaining -= 1;
        self.generated += 1;
        let token = Token::new(
            format!("RET-{:05}", self.generated),
            TokenKind::Return,
            now,
        );
        Request::Put(self.buffer, token)
    }
}

impl Process<LineMetrics> for ReturnsSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resume(&mut self, wake: Wake, ctx: &mut Context<'_, LineMetrics>) -> Result<Request> {
        match wake {
            Wake::Start => Ok(Request::Timeout(self.interarrival.draw(ctx.rng()))),
            Wake::Timeout => {
                self.remaining = self.draw_batch(ctx);
                trace!("[{}] truck with {} returns at t={:.4}", self.name, self.remaining, ctx.now());
                Ok(self.put_next(ctx.now()))
            }
            Wake::Stored { .. } => {
                ctx.shared_mut().arrivals_returns += 1;
                if self.remaining > 0 {
                    Ok(self.put_next(ctx.now()))
                } else {
                    Ok(Request::Timeout(self.interarrival.draw(ctx.rng())))
                }
            }
            other => Err(SimError::unexpected_wake(&self.name, &other)),
        }
    }
}
