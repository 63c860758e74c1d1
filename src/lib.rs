// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! chordchart: beat-aligned chord charts with synchronized lyrics.
//!
//! A job snapshot (sections, chord events, lyric lines) is loaded once from
//! a [`source::JobSource`], then turned into a [`chart::ChordChart`] and a
//! [`lyrics::LyricSheet`] for the current [`model::ChartSettings`].

pub mod chart;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod lyrics;
pub mod model;
pub mod source;
pub mod timeline;
pub mod ui;
pub mod view;

pub use chart::ChordChart;
pub use error::{LoadError, SourceError};
pub use loader::{cancellation, load_snapshot, CancelGuard, CancelToken, JobSnapshot};
pub use lyrics::LyricSheet;
pub use model::{ChartSettings, ChordEvent, ChordStyle, LyricLine, LyricWord, Section, Simplification, ViewMode};
pub use source::{FileSource, HttpSource, JobSource};
pub use view::JobView;
