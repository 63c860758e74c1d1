// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Non-fatal data anomalies found while building a chart.
//!
//! Each anomaly is resolved by a fixed default (beat 1, shift 0,
//! last write wins, sentinel message) and reported through `tracing`.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// A data-shape problem in upstream analysis output
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    #[error("section \"{section}\" has no valid start_beat values; defaulting shift to 0")]
    NoBeatData { section: String },

    #[error("chord at {start:.2}s in section \"{section}\" has no start_beat; placed on beat 1")]
    MissingBeat { section: String, start: f64 },

    #[error("chord at {start:.2}s in section \"{section}\" has no start_bar; left out of the bar grid")]
    MissingBar { section: String, start: f64 },

    #[error("chord at {start:.2}s in section \"{section}\" ends at bar {end_bar} before its start bar {start_bar}")]
    InvertedBars {
        section: String,
        start: f64,
        start_bar: i64,
        end_bar: i64,
    },

    #[error("section \"{section}\" spans {span} bars; truncated to {limit}")]
    BarSpanTooLarge {
        section: String,
        span: i64,
        limit: i64,
    },

    #[error("bar {bar} beat {beat} in section \"{section}\": \"{replaced}\" overwritten by \"{label}\"")]
    SlotCollision {
        section: String,
        bar: i64,
        beat: u8,
        replaced: String,
        label: String,
    },

    #[error("section \"{section}\" has no chords")]
    EmptySection { section: String },
}

/// Collected anomalies for one render pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Anomaly>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log an anomaly
    pub fn push(&mut self, anomaly: Anomaly) {
        warn!("{}", anomaly);
        self.items.push(anomaly);
    }

    pub fn items(&self) -> &[Anomaly] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anomaly> {
        self.items.iter()
    }
}
