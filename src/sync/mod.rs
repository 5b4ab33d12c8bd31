//! Command queues shared between the client's listeners and its game loop.

mod queue;

pub use queue::{BlockingQueue, CommandQueue, PollQueue, Signal};
