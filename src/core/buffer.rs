use super::error::{Result, SimError};
use super::types::{ProcessId, Token};
use std::collections::VecDeque;

/// Result of placing a token without waiting
#[derive(Debug)]
pub enum Insert {
    /// Appended to the queue
    Stored,
    /// A getter was already waiting; the token goes straight to it
    HandedOff { getter: ProcessId, token: Token },
}

/// Result of a successful take
#[derive(Debug)]
pub struct Taken {
    pub token: Token,
    /// Waiting putter whose token was moved in behind the freed slot
    pub released: Option<ProcessId>,
}

/// Bounded FIFO store with FIFO wait-lists for blocked putters and getters.
///
/// Invariants kept by every operation:
/// - `items.len() <= capacity`
/// - getters only wait while `items` is empty
/// - putters only wait while `items` is full
pub struct Store {
    name: String,
    capacity: usize,
    items: VecDeque<Token>,
    putters: VecDeque<(ProcessId, Token)>,
    getters: VecDeque<ProcessId>,
}

impl Store {
    pub fn new(name: impl Into<String>, capacity: i64) -> Result<Self> {
        let name = name.into();
        let capacity = usize::try_from(capacity)
            .map_err(|_| SimError::InvalidCapacity {
                name: name.clone(),
                capacity,
            })?;

        Ok(Self {
            name,
            capacity,
            items: VecDeque::new(),
            putters: VecDeque::new(),
            getters: VecDeque::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn items(&self) -> impl Iterator<Item = &Token> {
        self.items.iter()
    }

    pub fn waiting_putters(&self) -> usize {
        self.putters.len()
    }

    pub fn waiting_getters(&self) -> usize {
        self.getters.len()
    }

    /// Non-blocking put: the token comes back if there is neither a waiting
    /// getter nor a free slot.
    pub fn offer(&mut self, token: Token) -> std::result::Result<Insert, Token> {
        if let Some(getter) = self.getters.pop_front() {
            return Ok(Insert::HandedOff { getter, token });
        }
        if self.items.len() < self.capacity {
            self.items.push_back(token);
            return Ok(Insert::Stored);
        }
        Err(token)
    }

    /// Blocking put: `None` means `putter` is now queued with its token.
    pub fn put(&mut self, putter: ProcessId, token: Token) -> Option<Insert> {
        match self.offer(token) {
            Ok(insert) => Some(insert),
            Err(token) => {
                self.putters.push_back((putter, token));
                None
            }
        }
    }

    /// Blocking get: `None` means `getter` is now queued.
    pub fn get(&mut self, getter: ProcessId) -> Option<Taken> {
        if let Some(token) = self.items.pop_front() {
            let released = self.putters.pop_front().map(|(putter, waiting)| {
                self.items.push_back(waiting);
                putter
            });
            return Some(Taken { token, released });
        }

        // Only reachable with capacity 0: rendezvous with the first putter
        if let Some((putter, token)) = self.putters.pop_front() {
            return Some(Taken {
                token,
                released: Some(putter),
            });
        }

        self.getters.push_back(getter);
        None
    }

    /// Tokens still queued, front first. Tokens held by blocked putters are
    /// not part of the contents.
    pub fn into_contents(self) -> Vec<Token> {
        self.items.into_iter().collect()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("level", &self.items.len())
            .field("capacity", &self.capacity)
            .field("waiting_putters", &self.putters.len())
            .field("waiting_getters", &self.getters.len())
            .finish()
    }
}
