//! Keying events and the character table
//!
//! Every supported character maps to a fixed sequence of [`Event`]s. Ordinary
//! characters end with a [`Event::CharSpace`]; the space character is a single
//! [`Event::WordSpace`].

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// A single timed step of keyed output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Short signal element
    Dit,
    /// Long signal element
    Dah,
    /// One-unit gap played after every event
    Space,
    /// Gap between characters
    CharSpace,
    /// Gap between words
    WordSpace,
}

impl Event {
    /// Length of this event in timing units
    ///
    /// `CharSpace` and `WordSpace` are one unit short of the usual 3 and 7
    /// because every event is followed by a `Space`.
    pub fn units(self) -> u64 {
        match self {
            Event::Dit => 1,
            Event::Dah => 3,
            Event::Space => 1,
            Event::CharSpace => 2,
            Event::WordSpace => 6,
        }
    }

    /// Whether the key closes for this event
    pub fn is_signal(self) -> bool {
        matches!(self, Event::Dit | Event::Dah)
    }

    /// Printable symbol for signal events
    pub fn symbol(self) -> Option<char> {
        match self {
            Event::Dit => Some('.'),
            Event::Dah => Some('-'),
            _ => None,
        }
    }
}

// dI(t), dA(h), C(har space), W(ord space)
use Event::{CharSpace as C, Dah as A, Dit as I, WordSpace as W};

const TABLE: &[(char, &[Event])] = &[
    ('A', &[I, A, C]),
    ('B', &[A, I, I, I, C]),
    ('C', &[A, I, A, I, C]),
    ('D', &[A, I, I, C]),
    ('E', &[I, C]),
    ('F', &[I, I, A, I, C]),
    ('G', &[A, A, I, C]),
    ('H', &[I, I, I, I, C]),
    ('I', &[I, I, C]),
    ('J', &[I, A, A, A, C]),
    ('K', &[A, I, A, C]),
    ('L', &[I, A, I, I, C]),
    ('M', &[A, A, C]),
    ('N', &[A, I, C]),
    ('O', &[A, A, A, C]),
    ('P', &[I, A, A, I, C]),
    ('Q', &[A, A, I, A, C]),
    ('R', &[I, A, I, C]),
    ('S', &[I, I, I, C]),
    ('T', &[A, C]),
    ('U', &[I, I, A, C]),
    ('V', &[I, I, I, A, C]),
    ('W', &[I, A, A, C]),
    ('X', &[A, I, I, A, C]),
    ('Y', &[A, I, A, A, C]),
    ('Z', &[A, A, I, I, C]),
    ('0', &[A, A, A, A, A, C]),
    ('1', &[I, A, A, A, A, C]),
    ('2', &[I, I, A, A, A, C]),
    ('3', &[I, I, I, A, A, C]),
    ('4', &[I, I, I, I, A, C]),
    ('5', &[I, I, I, I, I, C]),
    ('6', &[A, I, I, I, I, C]),
    ('7', &[A, A, I, I, I, C]),
    ('8', &[A, A, A, I, I, C]),
    ('9', &[A, A, A, A, I, C]),
    ('?', &[I, I, A, A, I, I, C]),
    ('/', &[A, I, I, A, I, C]),
    (' ', &[W]),
];

static EVENTS: Lazy<HashMap<char, &'static [Event]>> = Lazy::new(|| TABLE.iter().copied().collect());

/// Look up the events for a character, case-insensitively
///
/// Returns `None` for anything outside `A-Z`, `0-9`, `?`, `/` and space.
pub fn events(c: char) -> Option<&'static [Event]> {
    let mut upper = c.to_uppercase();
    let folded = match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => return None,
    };
    EVENTS.get(&folded).copied()
}

/// Returns true if the character can be keyed
pub fn is_keyable(c: char) -> bool {
    events(c).is_some()
}

/// Unsupported characters of `text`, in order of first appearance
pub fn unkeyable(text: &str) -> Vec<char> {
    let mut bad = Vec::new();
    for c in text.chars() {
        if !is_keyable(c) && !bad.contains(&c) {
            bad.push(c);
        }
    }
    bad
}

/// Render a character as dots and dashes
pub fn pattern(c: char) -> Option<String> {
    events(c).map(|events| events.iter().filter_map(|e| e.symbol()).collect())
}
