// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Job views.
//!
//! A [`JobView`] owns one immutable job snapshot together with the chart
//! and lyric sheet derived from it. Changing settings re-derives both from
//! the same snapshot; loading another job means building a new view.

pub mod text;

pub use crate::model::ViewMode;
pub use text::{column_rows, render_text};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::chart::ChordChart;
use crate::loader::JobSnapshot;
use crate::lyrics::LyricSheet;
use crate::model::ChartSettings;

/// Snapshot plus everything derived from it for one set of settings
#[derive(Debug, Clone)]
pub struct JobView {
    snapshot: JobSnapshot,
    settings: ChartSettings,
    chart: ChordChart,
    lyrics: LyricSheet,
}

impl JobView {
    /// Derive chart and lyrics for `snapshot`
    pub fn new(snapshot: JobSnapshot, settings: ChartSettings) -> Self {
        let chart = ChordChart::build(&snapshot.sections, &snapshot.chords, &settings);
        let lyrics = LyricSheet::build(&snapshot.sections, &snapshot.lines, &snapshot.chords, &settings);
        Self {
            snapshot,
            settings,
            chart,
            lyrics,
        }
    }

    /// Same snapshot, re-derived with new settings
    pub fn with_settings(self, settings: ChartSettings) -> Self {
        if settings == self.settings {
            return self;
        }
        Self::new(self.snapshot, settings)
    }

    /// Re-derive in place; returns whether anything changed
    pub fn apply_settings(&mut self, settings: ChartSettings) -> bool {
        if settings == self.settings {
            return false;
        }
        self.chart = ChordChart::build(&self.snapshot.sections, &self.snapshot.chords, &settings);
        self.lyrics = LyricSheet::build(
            &self.snapshot.sections,
            &self.snapshot.lines,
            &self.snapshot.chords,
            &settings,
        );
        self.settings = settings;
        true
    }

    pub fn snapshot(&self) -> &JobSnapshot {
        &self.snapshot
    }

    pub fn settings(&self) -> ChartSettings {
        self.settings
    }

    pub fn chart(&self) -> &ChordChart {
        &self.chart
    }

    pub fn lyrics(&self) -> &LyricSheet {
        &self.lyrics
    }

    pub fn job_id(&self) -> &str {
        &self.snapshot.job_id
    }

    /// Job name, falling back to the id
    pub fn title(&self) -> &str {
        &self.snapshot.title
    }

    /// Pretty-printed JSON export of the derived chart and lyrics
    pub fn to_json(&self) -> Result<String> {
        let export = JsonExport {
            job_id: self.job_id(),
            title: self.title(),
            settings: self.settings,
            chart: &self.chart,
            lyrics: &self.lyrics,
        };
        serde_json::to_string_pretty(&export).context("Failed to serialize job view to JSON")
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    job_id: &'a str,
    title: &'a str,
    settings: ChartSettings,
    chart: &'a ChordChart,
    lyrics: &'a LyricSheet,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChordEvent, ChordStyle, LyricLine, LyricWord, Section, Simplification};
    use serde_json::Value;

    fn snapshot() -> JobSnapshot {
        JobSnapshot {
            job_id: "job-7".to_string(),
            title: "Demo".to_string(),
            sections: vec![Section::new("Verse", 0.0, 8.0)],
            chords: vec![ChordEvent::new(0.0, 4.0)
                .at_bar(0)
                .with_beat(1)
                .with_label(Simplification::Complex, ChordStyle::Pop, "A:min")
                .with_label(Simplification::Complex, ChordStyle::Jazz, "A:min7")],
            lines: vec![LyricLine::from_words(0.5, 3.0, vec![LyricWord::new("hello", 0.5, 1.0)])],
        }
    }

    #[test]
    fn test_view_derives_chart_and_lyrics() {
        let view = JobView::new(snapshot(), ChartSettings::default());
        assert_eq!(view.title(), "Demo");
        assert_eq!(view.chart().sections.len(), 1);
        assert_eq!(view.chart().sections[0].bars[0].display, "Am");
        assert_eq!(view.lyrics().line_count(), 1);
    }

    #[test]
    fn test_apply_settings_rederives() {
        let mut view = JobView::new(snapshot(), ChartSettings::default());
        assert!(!view.apply_settings(ChartSettings::default()));

        let jazz = ChartSettings::new(Simplification::Complex, ChordStyle::Jazz);
        assert!(view.apply_settings(jazz));
        assert_eq!(view.settings(), jazz);
        assert_eq!(view.chart().sections[0].bars[0].display, "Am7");
        // Snapshot is untouched
        assert_eq!(view.snapshot().chords.len(), 1);
    }

    #[test]
    fn test_with_settings() {
        let jazz = ChartSettings::new(Simplification::Complex, ChordStyle::Jazz);
        let view = JobView::new(snapshot(), ChartSettings::default()).with_settings(jazz);
        assert_eq!(view.chart().settings, jazz);
    }

    #[test]
    fn test_to_json() {
        let view = JobView::new(snapshot(), ChartSettings::default());
        let json: Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();
        assert_eq!(json["job_id"], "job-7");
        assert_eq!(json["settings"]["simplification"], "complex");
        assert_eq!(json["chart"]["sections"][0]["label"], "Verse");
        assert!(json["lyrics"]["groups"].is_array());
    }
}
