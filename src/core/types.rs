use serde::{Deserialize, Serialize};

/// Simulated time in minutes. Advanced only by the scheduler.
pub type SimTime = f64;

/// Handle for a process registered with a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub(crate) usize);

impl ProcessId {
    /// Registration index of the process
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "process#{}", self.0)
    }
}

/// Handle for a bounded buffer owned by a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub(crate) usize);

impl BufferId {
    /// Registration index of the buffer
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "buffer#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    New,
    Return,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::New => write!(f, "new"),
            TokenKind::Return => write!(f, "return"),
        }
    }
}

/// One physical unit travelling through the line.
///
/// Tokens are immutable and deliberately not `Clone`: a token is moved from
/// its producer into a buffer (or a pending wake-up) and from there into
/// exactly one consumer.
#[derive(Debug, PartialEq, Serialize)]
pub struct Token {
    id: String,
    kind: TokenKind,
    created_at: SimTime,
}

impl Token {
    pub fn new(id: String, kind: TokenKind, created_at: SimTime) -> Self {
        Self {
            id,
            kind,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn created_at(&self) -> SimTime {
        self.created_at
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
