// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Interval queries over time-stamped events.
//!
//! Every membership test is half-open: time `t` belongs to `[start, end)`
//! iff `start <= t < end`. Song-scale data is a few hundred events, so
//! queries are linear scans that preserve input order.

use crate::model::{ChordEvent, LyricLine, Section};

/// A half-open time interval in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Half-open containment; NaN never matches
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

/// Anything with a start and end time
pub trait Timed {
    fn start(&self) -> f64;
    fn end(&self) -> f64;

    fn interval(&self) -> Interval {
        Interval::new(self.start(), self.end())
    }
}

macro_rules! impl_timed {
    ($($ty:ty),*) => {
        $(impl Timed for $ty {
            fn start(&self) -> f64 {
                self.start
            }

            fn end(&self) -> f64 {
                self.end
            }
        })*
    };
}

impl_timed!(Section, LyricLine);

impl Timed for ChordEvent {
    fn start(&self) -> f64 {
        self.start
    }

    /// A chord without an end is zero-length and contains no time
    fn end(&self) -> f64 {
        self.end_time()
    }
}

/// Read-only query view over an event slice
#[derive(Debug, Clone, Copy)]
pub struct TemporalIndex<'a, T> {
    events: &'a [T],
}

impl<'a, T: Timed> TemporalIndex<'a, T> {
    pub fn new(events: &'a [T]) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events whose start falls inside `window`, in input order.
    ///
    /// Zero-length events are still matched by their start.
    pub fn starting_within(&self, window: Interval) -> Vec<&'a T> {
        self.events
            .iter()
            .filter(|event| window.contains(event.start()))
            .collect()
    }

    /// First event, in input order, whose own interval contains `t`
    pub fn first_containing(&self, t: f64) -> Option<&'a T> {
        first_containing(self.events.iter(), t)
    }
}

/// First event from `events` whose interval contains `t`
pub fn first_containing<'a, T, I>(events: I, t: f64) -> Option<&'a T>
where
    T: Timed + 'a,
    I: IntoIterator<Item = &'a T>,
{
    events.into_iter().find(|event| event.interval().contains(t))
}
