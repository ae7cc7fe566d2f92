//! CWKeyer - asynchronous Morse code (CW) keyer
//!
//! Text is queued on a bounded send queue and keyed by a background loop.
//! The speed is read before every event, so it can be changed while a
//! message is being sent, and the queue can be drained to stop a message.
//!
//! # Architecture
//!
//! ```text
//! queue_message ─┐                         ┌─ SpeedSource::speed()
//! queue_rune ────┼─▶ [ SendQueue ] ──▶ process_send_queue / process_until_shutdown
//! drain ─────────┘                         └─ Key::down() / Key::up()
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use cwkeyer::{AtomicSpeed, Keyer, LogKey};
//!
//! let speed = Arc::new(AtomicSpeed::new(18));
//! let keyer = Arc::new(Keyer::new(speed.clone(), Arc::new(LogKey::new())));
//!
//! let (shutdown_tx, shutdown_rx) = tokio::sync::mpsc::channel(1);
//! let processor = tokio::spawn({
//!     let keyer = keyer.clone();
//!     async move { keyer.process_until_shutdown(shutdown_rx).await }
//! });
//!
//! keyer.queue_message("CQ CQ CQ DE K3GDS K3GDS KN").await?;
//! speed.set(25);
//! keyer.drain_send_queue();
//! shutdown_tx.send(()).await?;
//! processor.await??;
//! ```

pub mod cli;
pub mod config;
mod error;
pub mod event;
mod key;
mod keyer;
mod queue;
pub mod timing;

pub use error::{KeyError, KeyerError};
pub use event::{Event, is_keyable};
pub use key::{AtomicSpeed, ConsoleKey, Key, LogKey, SpeedSource};
pub use keyer::Keyer;
pub use queue::{DEFAULT_QUEUE_CAPACITY, SendQueue};

/// Default sending speed in words per minute
pub const DEFAULT_WPM: u32 = 18;
