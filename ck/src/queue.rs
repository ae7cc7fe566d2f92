//! Bounded send queue shared by producers and the keying loop
//!
//! Pushing waits while the queue is full and popping waits while it is empty.
//! The lock is never held across an await point.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tracing::debug;

use crate::event::Event;

/// Default queue capacity, enough for any reasonable message
pub const DEFAULT_QUEUE_CAPACITY: usize = 2048;

/// Fixed-capacity FIFO of keying events
pub struct SendQueue {
    events: Mutex<VecDeque<Event>>,
    capacity: usize,
    not_empty: Notify,
    not_full: Notify,
}

impl SendQueue {
    /// Create an empty queue; a capacity of zero is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        debug!(capacity, "SendQueue::new: called");
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            not_empty: Notify::new(),
            not_full: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an event, waiting for space if the queue is full
    pub async fn push(&self, event: Event) {
        loop {
            if self.try_push(event) {
                return;
            }
            self.not_full.notified().await;
        }
    }

    /// Append an event if there is room
    pub fn try_push(&self, event: Event) -> bool {
        {
            let mut events = self.lock();
            if events.len() >= self.capacity {
                return false;
            }
            events.push_back(event);
        }
        self.not_empty.notify_one();
        true
    }

    /// Remove the oldest event, waiting until one is available
    pub async fn pop(&self) -> Event {
        loop {
            if let Some(event) = self.try_pop() {
                return event;
            }
            self.not_empty.notified().await;
        }
    }

    /// Remove the oldest event without waiting
    pub fn try_pop(&self) -> Option<Event> {
        let event = self.lock().pop_front();
        if event.is_some() {
            self.not_full.notify_one();
        }
        event
    }

    /// Discard queued events until the queue is observed empty
    ///
    /// Returns the number of events discarded.
    pub fn drain(&self) -> usize {
        let mut drained = 0;
        while self.try_pop().is_some() {
            drained += 1;
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SendQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}
