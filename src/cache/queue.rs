//! Sweep Queue Module
//!
//! Insertion-ordered queue feeding the background sweep.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::cache::entry::Tracked;

// == Queue ==
/// FIFO of tracked keys, consumed by a single sweep task.
///
/// The queue only decides the order in which keys are considered for
/// reclamation. Whether a key is live is always answered by the store's map.
///
/// Pushing never blocks: the buffer is unbounded and the wake-up goes through
/// [`Notify`], which keeps a permit when nobody is waiting yet.
///
/// Once [`close`](Queue::close)d the queue stays empty and drops every push,
/// so a store whose sweep has stopped does not accumulate entries.
#[derive(Debug, Default)]
pub struct Queue {
    slots: Mutex<Slots>,
    notify: Notify,
}

#[derive(Debug, Default)]
struct Slots {
    items: VecDeque<Tracked>,
    closed: bool,
}

impl Queue {
    // == Constructor ==
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Appends an entry at the tail and wakes the consumer. No-op once closed.
    pub fn push(&self, item: Tracked) {
        {
            let mut slots = self.slots.lock();
            if slots.closed {
                return;
            }
            slots.items.push_back(item);
        }
        self.notify.notify_one();
    }

    // == Close ==
    /// Drops pending entries and ignores later pushes. Returns how many
    /// entries were dropped.
    pub fn close(&self) -> usize {
        let mut slots = self.slots.lock();
        slots.closed = true;
        let dropped = slots.items.len();
        slots.items.clear();
        dropped
    }

    pub fn is_closed(&self) -> bool {
        self.slots.lock().closed
    }

    // == Next ==
    /// Removes and returns the head, waiting until one is available.
    pub async fn next(&self) -> Tracked {
        loop {
            if let Some(item) = self.try_next() {
                return item;
            }
            self.notify.notified().await;
        }
    }

    /// Removes and returns the head without waiting.
    pub fn try_next(&self) -> Option<Tracked> {
        self.slots.lock().items.pop_front()
    }

    // == Length ==
    /// Returns the number of pending entries.
    pub fn len(&self) -> usize {
        self.slots.lock().items.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.slots.lock().items.is_empty()
    }
}
