//! The keyer: producer API and the send-queue processing loop
//!
//! Producers turn text into events and push them onto the send queue. The
//! processor pops one event at a time, reads the current speed, toggles the
//! key for dits and dahs, and sleeps for the event and its trailing space.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::KeyerError;
use crate::event::{self, Event};
use crate::key::{Key, SpeedSource};
use crate::queue::{DEFAULT_QUEUE_CAPACITY, SendQueue};
use crate::timing::event_length;

/// Sends queued text as Morse code on a key
///
/// Share it behind an `Arc` to queue from one task while another runs
/// [`Keyer::process_send_queue`].
pub struct Keyer {
    key: Arc<dyn Key>,
    speed: Arc<dyn SpeedSource>,
    queue: SendQueue,
}

impl Keyer {
    /// Create a keyer with the default queue capacity
    pub fn new(speed: Arc<dyn SpeedSource>, key: Arc<dyn Key>) -> Self {
        Self::with_capacity(speed, key, DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a keyer whose send queue holds at most `capacity` events
    pub fn with_capacity(speed: Arc<dyn SpeedSource>, key: Arc<dyn Key>, capacity: usize) -> Self {
        debug!(capacity, "Keyer::with_capacity: called");
        Self {
            key,
            speed,
            queue: SendQueue::new(capacity),
        }
    }

    /// Process the send queue
    ///
    /// With `return_on_empty_queue` set this returns `Ok(())` as soon as the
    /// queue is found empty; otherwise it waits for more events forever. An
    /// error from the key always stops the loop and is returned; events still
    /// queued at that point stay queued.
    pub async fn process_send_queue(&self, return_on_empty_queue: bool) -> Result<(), KeyerError> {
        debug!(return_on_empty_queue, "Keyer::process_send_queue: called");
        loop {
            let event = if return_on_empty_queue {
                match self.queue.try_pop() {
                    Some(event) => event,
                    None => {
                        debug!("Keyer::process_send_queue: queue empty, returning");
                        return Ok(());
                    }
                }
            } else {
                self.queue.pop().await
            };
            self.send(event).await?;
        }
    }

    /// Process the send queue until a shutdown signal arrives
    ///
    /// The signal is only taken between events: an event already dequeued
    /// is keyed to completion, so the key is always left up. A closed
    /// channel counts as a shutdown. Key errors stop the loop as in
    /// [`Keyer::process_send_queue`].
    pub async fn process_until_shutdown(&self, mut shutdown_rx: mpsc::Receiver<()>) -> Result<(), KeyerError> {
        debug!("Keyer::process_until_shutdown: called");
        loop {
            let event = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    debug!(pending = self.pending(), "Keyer::process_until_shutdown: shutdown received");
                    return Ok(());
                }
                event = self.queue.pop() => event,
            };
            self.send(event).await?;
        }
    }

    /// Returns true when nothing is waiting to be sent
    pub fn send_queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of events waiting to be sent
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue a message for sending
    ///
    /// Every character is checked before anything is queued, so a message
    /// with an unsupported character is rejected as a whole.
    pub async fn queue_message(&self, message: &str) -> Result<(), KeyerError> {
        debug!(len = message.len(), "Keyer::queue_message: called");
        let mut sequences = Vec::with_capacity(message.len());
        for c in message.chars() {
            match event::events(c) {
                Some(events) => sequences.push(events),
                None => {
                    debug!(?c, "Keyer::queue_message: unsupported character, rejecting message");
                    return Err(KeyerError::UnsupportedCharacter(c));
                }
            }
        }

        for events in sequences {
            self.enqueue(events).await;
        }
        Ok(())
    }

    /// Queue a single character for sending
    pub async fn queue_rune(&self, c: char) -> Result<(), KeyerError> {
        debug!(?c, "Keyer::queue_rune: called");
        let events = event::events(c).ok_or(KeyerError::UnsupportedCharacter(c))?;
        self.enqueue(events).await;
        Ok(())
    }

    /// Interrupt the current message by draining the send queue
    ///
    /// An event the processor has already taken still completes.
    pub fn drain_send_queue(&self) {
        let drained = self.queue.drain();
        debug!(drained, "Keyer::drain_send_queue: drained");
    }

    async fn enqueue(&self, events: &[Event]) {
        for event in events {
            self.queue.push(*event).await;
        }
    }

    async fn send(&self, event: Event) -> Result<(), KeyerError> {
        self.key_event(event).await.inspect_err(|e| {
            warn!(error = %e, ?event, "Keyer::send: key failed, stopping");
        })
    }

    async fn key_event(&self, event: Event) -> Result<(), KeyerError> {
        let wpm = self.speed.speed();
        debug!(?event, wpm, "Keyer::key_event: called");

        if event.is_signal() {
            self.key.down().await?;
        }
        tokio::time::sleep(event_length(event, wpm)).await;
        if event.is_signal() {
            self.key.up().await?;
        }
        tokio::time::sleep(event_length(Event::Space, wpm)).await;
        Ok(())
    }
}
