use super::types::SimTime;
use serde::Serialize;

/// What a process did at one point of the run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TraceAction {
    Started,
    TimerFired,
    Received { buffer: String, token: String },
    Delivered { buffer: String },
    Rejected { buffer: String, token: String },
    AwaitingTimer { delay: SimTime },
    AwaitingGet { buffer: String },
    AwaitingPut { buffer: String, token: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    pub time: SimTime,
    pub process: String,
    pub action: TraceAction,
}

impl std::fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:>10.4}] {}: ", self.time, self.process)?;
        match &self.action {
            TraceAction::Started => write!(f, "started"),
            TraceAction::TimerFired => write!(f, "timer fired"),
            TraceAction::Received { buffer, token } => write!(f, "got {} from {}", token, buffer),
            TraceAction::Delivered { buffer } => write!(f, "put into {}", buffer),
            TraceAction::Rejected { buffer, token } => write!(f, "{} rejected by {}", token, buffer),
            TraceAction::AwaitingTimer { delay } => write!(f, "sleeping {:.4}", delay),
            TraceAction::AwaitingGet { buffer } => write!(f, "waiting on {}", buffer),
            TraceAction::AwaitingPut { buffer, token } => {
                write!(f, "blocked putting {} into {}", token, buffer)
            }
        }
    }
}
