//! Background task draining an input source into a queue.

use super::{Input, InputSource, Origin};
use crate::sync::{BlockingQueue, CommandQueue, Signal};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, warn};

/// Handle to a running listener task.
#[derive(Debug)]
pub struct Listener {
    origin: Origin,
    handle: JoinHandle<()>,
}

impl Listener {
    /// Starts pulling from `source` into `queue`. Must be called inside a
    /// tokio runtime.
    ///
    /// A source error is reported once as [`Signal::ConnectionLost`] and ends
    /// the task, as does closing the queue.
    pub fn spawn<S>(mut source: S, origin: Origin, queue: Arc<BlockingQueue<Input>>) -> Self
    where
        S: InputSource,
    {
        let handle = tokio::spawn(
            async move {
                loop {
                    let signal = match source.next_signal().await {
                        Ok(Some(signal)) => signal,
                        Ok(None) => continue,
                        Err(e) => {
                            warn!(error = %e, "Input source failed");
                            Signal::ConnectionLost
                        }
                    };
                    if !forward(&queue, Input { origin, signal }).await
                        || signal == Signal::ConnectionLost
                    {
                        break;
                    }
                }
                debug!("Listener stopped");
            }
            .instrument(info_span!("listener", ?origin)),
        );
        Self { origin, handle }
    }

    /// True once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels the task and waits for it to wind down.
    ///
    /// A hand-off already blocked on a full queue is only released by
    /// [`BlockingQueue::close`], so close the queue first.
    pub async fn stop(self) {
        self.handle.abort();
        match self.handle.await {
            Err(e) if e.is_panic() => warn!(origin = ?self.origin, "Listener task panicked"),
            _ => debug!(origin = ?self.origin, "Listener joined"),
        }
    }
}

/// Hands one input to the blocking queue off the async workers.
///
/// Returns false once the queue is closed.
async fn forward(queue: &Arc<BlockingQueue<Input>>, input: Input) -> bool {
    let queue = Arc::clone(queue);
    match tokio::task::spawn_blocking(move || {
        queue.put(input);
        !queue.is_closed()
    })
    .await
    {
        Ok(open) => open,
        Err(e) => {
            warn!(error = %e, "Queue hand-off failed");
            false
        }
    }
}
