//! Key sinks and speed sources
//!
//! The keyer drives a [`Key`] and asks a [`SpeedSource`] for the speed before
//! every event. Hardware sinks (serial DTR lines, tone generators) live outside
//! this crate; [`LogKey`] and [`ConsoleKey`] cover hosts without a rig.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use colored::Colorize;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::KeyError;

/// A key that can be closed (down) and opened (up)
#[async_trait]
pub trait Key: Send + Sync {
    /// Close the circuit
    async fn down(&self) -> Result<(), KeyError>;

    /// Open the circuit
    async fn up(&self) -> Result<(), KeyError>;
}

/// Provides the sending speed in words per minute
///
/// Called once per keyed event, so a new value takes effect on the next event.
pub trait SpeedSource: Send + Sync {
    fn speed(&self) -> u32;
}

impl<F> SpeedSource for F
where
    F: Fn() -> u32 + Send + Sync,
{
    fn speed(&self) -> u32 {
        self()
    }
}

/// Speed that can be changed from any thread while keying
#[derive(Debug)]
pub struct AtomicSpeed {
    wpm: AtomicU32,
}

impl AtomicSpeed {
    pub fn new(wpm: u32) -> Self {
        Self {
            wpm: AtomicU32::new(wpm),
        }
    }

    pub fn get(&self) -> u32 {
        self.wpm.load(Ordering::Relaxed)
    }

    pub fn set(&self, wpm: u32) {
        debug!(wpm, "AtomicSpeed::set: called");
        self.wpm.store(wpm, Ordering::Relaxed);
    }
}

impl SpeedSource for AtomicSpeed {
    fn speed(&self) -> u32 {
        self.get()
    }
}

/// Key that reports transitions through tracing and counts them
#[derive(Debug, Default)]
pub struct LogKey {
    downs: AtomicUsize,
    ups: AtomicUsize,
}

impl LogKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downs(&self) -> usize {
        self.downs.load(Ordering::SeqCst)
    }

    pub fn ups(&self) -> usize {
        self.ups.load(Ordering::SeqCst)
    }

    /// Total key transitions, down and up
    pub fn toggles(&self) -> usize {
        self.downs() + self.ups()
    }
}

#[async_trait]
impl Key for LogKey {
    async fn down(&self) -> Result<(), KeyError> {
        let count = self.downs.fetch_add(1, Ordering::SeqCst) + 1;
        info!(count, "key down");
        Ok(())
    }

    async fn up(&self) -> Result<(), KeyError> {
        let count = self.ups.fetch_add(1, Ordering::SeqCst) + 1;
        info!(count, "key up");
        Ok(())
    }
}

/// Marks drawn for the longest element, in units of the shortest one seen
const MAX_MARK_WIDTH: u32 = 3;

#[derive(Default)]
struct ConsoleState {
    pressed_at: Option<Instant>,
    shortest: Option<Duration>,
}

/// Key that draws the keyed signal on a terminal
///
/// Each element is drawn on key up, its width scaled against the shortest
/// element seen so far, so dits render as one mark and dahs as three.
pub struct ConsoleKey {
    out: Mutex<Box<dyn Write + Send>>,
    state: Mutex<ConsoleState>,
}

impl ConsoleKey {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
            state: Mutex::new(ConsoleState::default()),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn mark_width(held: Duration, shortest: Duration) -> u32 {
        if shortest.is_zero() {
            return 1;
        }
        let ratio = (held.as_secs_f64() / shortest.as_secs_f64()).round() as u32;
        ratio.clamp(1, MAX_MARK_WIDTH)
    }
}

#[async_trait]
impl Key for ConsoleKey {
    async fn down(&self) -> Result<(), KeyError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.pressed_at = Some(Instant::now());
        Ok(())
    }

    async fn up(&self) -> Result<(), KeyError> {
        let width = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(pressed_at) = state.pressed_at.take() else {
                debug!("ConsoleKey::up: up without down, ignoring");
                return Ok(());
            };
            let held = pressed_at.elapsed();
            let shortest = state.shortest.map_or(held, |s| s.min(held));
            state.shortest = Some(shortest);
            Self::mark_width(held, shortest)
        };

        let mark = "▬".repeat(width as usize);
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        write!(out, "{} ", mark.green())?;
        out.flush()?;
        Ok(())
    }
}
