use super::types::{BufferId, SimTime, Token};

/// Value a process is resumed with.
#[derive(Debug)]
pub enum Wake {
    /// First activation, delivered at time 0 in registration order
    Start,
    /// A `Request::Timeout` elapsed
    Timeout,
    /// A `Request::Get` completed
    Got { buffer: BufferId, token: Token },
    /// A `Request::Put` or `Request::TryPut` placed the token
    Stored { buffer: BufferId },
    /// A `Request::TryPut` found the buffer full; the token is handed back
    Rejected { buffer: BufferId, token: Token },
}

impl Wake {
    pub fn label(&self) -> &'static str {
        match self {
            Wake::Start => "start",
            Wake::Timeout => "timeout",
            Wake::Got { .. } => "got",
            Wake::Stored { .. } => "stored",
            Wake::Rejected { .. } => "rejected",
        }
    }
}

impl std::fmt::Display for Wake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Wake::Got { buffer, token } | Wake::Rejected { buffer, token } => {
                write!(f, "{}({}, {})", self.label(), buffer, token)
            }
            Wake::Stored { buffer } => write!(f, "{}({})", self.label(), buffer),
            _ => write!(f, "{}", self.label()),
        }
    }
}

/// Suspension point returned by a process.
#[derive(Debug)]
pub enum Request {
    /// Sleep for the given simulated delay
    Timeout(SimTime),
    /// Blocking take from the front of a buffer
    Get(BufferId),
    /// Blocking append; waits while the buffer is full
    Put(BufferId, Token),
    /// Non-blocking append; a full buffer answers with `Wake::Rejected`
    TryPut(BufferId, Token),
}
