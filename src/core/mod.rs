pub mod buffer;
pub mod builder;
pub mod error;
pub mod event;
pub mod event_scheduler;
pub mod execution;
pub mod process;
pub mod trace;
pub mod types;

#[cfg(test)]
mod tests;
