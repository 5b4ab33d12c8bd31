//! Command queues shared between producers and a single consumer.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Item carried from client input sources to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// A key byte.
    Command(u8),
    /// The remote side went away.
    ConnectionLost,
    /// The local user asked to leave.
    Quit,
}

/// FIFO of pending commands.
pub trait CommandQueue<T>: Send + Sync {
    /// Appends an item.
    fn put(&self, item: T);

    /// Takes the oldest item.
    ///
    /// Non-blocking queues return `None` when empty; blocking queues wait.
    fn get(&self) -> Option<T>;

    /// True when at least one item is waiting.
    fn has_pending(&self) -> bool;

    /// Drops everything waiting.
    fn clear(&self);
}

/// Unbounded queue whose operations never wait for another party.
///
/// Each operation is one short critical section.
#[derive(Debug)]
pub struct PollQueue<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> PollQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    fn items(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of waiting items.
    pub fn len(&self) -> usize {
        self.items().len()
    }

    /// True when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl<T> Default for PollQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> CommandQueue<T> for PollQueue<T> {
    fn put(&self, item: T) {
        self.items().push_back(item);
    }

    fn get(&self) -> Option<T> {
        self.items().pop_front()
    }

    fn has_pending(&self) -> bool {
        !self.items().is_empty()
    }

    fn clear(&self) {
        self.items().clear();
    }
}

#[derive(Debug)]
struct Slot<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Queue holding at most one pending item.
///
/// `get` waits for an item, `put` waits until the previous item has been
/// taken. Producers therefore never run more than one command ahead of the
/// consumer. After [`close`](Self::close) nothing waits any more: `put`
/// discards and `get` drains what is left, then returns `None`.
#[derive(Debug)]
pub struct BlockingQueue<T> {
    slot: Mutex<Slot<T>>,
    changed: Condvar,
}

impl<T> BlockingQueue<T> {
    /// Creates an empty, open queue.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                items: VecDeque::new(),
                closed: false,
            }),
            changed: Condvar::new(),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wakes every waiter and stops accepting items.
    pub fn close(&self) {
        self.slot().closed = true;
        self.changed.notify_all();
    }

    /// True once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.slot().closed
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> CommandQueue<T> for BlockingQueue<T> {
    fn put(&self, item: T) {
        let mut slot = self
            .changed
            .wait_while(self.slot(), |slot| !slot.items.is_empty() && !slot.closed)
            .unwrap_or_else(PoisonError::into_inner);
        if slot.closed {
            return;
        }
        slot.items.push_back(item);
        drop(slot);
        self.changed.notify_all();
    }

    fn get(&self) -> Option<T> {
        let mut slot = self
            .changed
            .wait_while(self.slot(), |slot| slot.items.is_empty() && !slot.closed)
            .unwrap_or_else(PoisonError::into_inner);
        let item = slot.items.pop_front();
        drop(slot);
        self.changed.notify_all();
        item
    }

    fn has_pending(&self) -> bool {
        !self.slot().items.is_empty()
    }

    fn clear(&self) {
        self.slot().items.clear();
        self.changed.notify_all();
    }
}
