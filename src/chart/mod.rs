// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Beat-aligned chord chart.
//!
//! This module provides:
//! - Format: raw chord label to display string
//! - Beat: per-section onset normalization
//! - Grid: bar slots, collapse and repeat compression
//!
//! `ChordChart::build` runs the whole pipeline once per section.

pub mod beat;
pub mod format;
pub mod grid;

pub use beat::{BeatNormalizer, BEATS_PER_BAR};
pub use format::{chord_label, format_chord, EMPTY_SLOT};
pub use grid::{BarCell, BarSlots, PlacedChord, REPEAT_MARKER};

use serde::Serialize;
use tracing::debug;

use crate::diagnostics::{Anomaly, Diagnostics};
use crate::model::{ChartSettings, ChordEvent, Section};
use crate::timeline::{TemporalIndex, Timed};

/// Sentinel for a section without placeable chords
pub const NO_CHORDS_MESSAGE: &str = "No chords in this section.";

/// Sentinel for a job without sections
pub const NO_SECTIONS_MESSAGE: &str = "No sections available.";

/// Chart of one song section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionChart {
    pub label: String,
    pub start: f64,
    pub end: f64,
    pub normalization: BeatNormalizer,
    pub bars: Vec<BarCell>,
}

impl SectionChart {
    /// True when the section renders the "no chords" sentinel
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bars in rows of four, padded at the end
    pub fn rows(&self) -> Vec<[Option<&BarCell>; grid::BARS_PER_ROW]> {
        grid::rows(&self.bars)
    }
}

/// Chord chart for a whole song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChordChart {
    pub settings: ChartSettings,
    pub sections: Vec<SectionChart>,
    pub diagnostics: Diagnostics,
}

impl ChordChart {
    /// Build the chart for every section, in section order.
    ///
    /// Chords belong to the section containing their start time; overlapping
    /// sections may both claim a chord, gaps leave it out of the chart.
    pub fn build(sections: &[Section], chords: &[ChordEvent], settings: &ChartSettings) -> Self {
        let index = TemporalIndex::new(chords);
        let mut diagnostics = Diagnostics::new();

        let sections = sections
            .iter()
            .map(|section| build_section(section, &index, settings, &mut diagnostics))
            .collect();

        Self {
            settings: *settings,
            sections,
            diagnostics,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn build_section(
    section: &Section,
    index: &TemporalIndex<'_, ChordEvent>,
    settings: &ChartSettings,
    diagnostics: &mut Diagnostics,
) -> SectionChart {
    let chords = index.starting_within(section.interval());
    let normalization = BeatNormalizer::from_chords(chords.iter().copied());

    debug!(
        section = %section.label,
        chords = chords.len(),
        dominant_beat = ?normalization.dominant_beat(),
        shift = normalization.shift(),
        "normalized section"
    );

    if !chords.is_empty() && !normalization.has_beat_data() {
        diagnostics.push(Anomaly::NoBeatData {
            section: section.label.clone(),
        });
    }

    let placed: Vec<PlacedChord> = chords
        .iter()
        .filter_map(|chord| place_chord(section, chord, &normalization, settings, diagnostics))
        .collect();

    let bars = grid::build_bars(&section.label, &placed, diagnostics);
    if bars.is_empty() {
        diagnostics.push(Anomaly::EmptySection {
            section: section.label.clone(),
        });
    }

    SectionChart {
        label: section.label.clone(),
        start: section.start,
        end: section.end,
        normalization,
        bars,
    }
}

fn place_chord(
    section: &Section,
    chord: &ChordEvent,
    normalization: &BeatNormalizer,
    settings: &ChartSettings,
    diagnostics: &mut Diagnostics,
) -> Option<PlacedChord> {
    let Some(start_bar) = chord.start_bar else {
        diagnostics.push(Anomaly::MissingBar {
            section: section.label.clone(),
            start: chord.start,
        });
        return None;
    };

    if normalization.has_beat_data() && chord.start_beat.is_none() {
        diagnostics.push(Anomaly::MissingBeat {
            section: section.label.clone(),
            start: chord.start,
        });
    }

    let end_bar = chord.last_bar().unwrap_or(start_bar);
    if end_bar < start_bar {
        diagnostics.push(Anomaly::InvertedBars {
            section: section.label.clone(),
            start: chord.start,
            start_bar,
            end_bar,
        });
    }

    Some(PlacedChord::new(
        start_bar,
        end_bar,
        normalization.adjust(chord.start_beat),
        chord_label(chord, settings),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChordStyle, Simplification};

    fn chord(start: f64, bar: i64, beat: i64, label: &str) -> ChordEvent {
        ChordEvent::new(start, start + 0.5)
            .at_bar(bar)
            .with_beat(beat)
            .with_all_labels(label)
    }

    #[test]
    fn test_build_normalizes_per_section() {
        let sections = vec![Section::new("Intro", 0.0, 10.0), Section::new("Verse", 10.0, 20.0)];
        let chords = vec![
            // Intro: onsets mostly on beat 3
            chord(0.0, 0, 3, "C:maj"),
            chord(2.0, 1, 3, "G:maj"),
            chord(3.0, 1, 1, "A:min"),
            // Verse: already on beat 1
            chord(10.0, 4, 1, "F:maj"),
        ];

        let chart = ChordChart::build(&sections, &chords, &ChartSettings::default());
        assert_eq!(chart.sections.len(), 2);

        let intro = &chart.sections[0];
        assert_eq!(intro.normalization.dominant_beat(), Some(3));
        assert_eq!(intro.bars[0].display, "C");
        assert_eq!(intro.bars[1].display, "G Am");

        let verse = &chart.sections[1];
        assert_eq!(verse.normalization.shift(), 0);
        assert_eq!(verse.bars[0].display, "F");
        assert!(chart.diagnostics.is_empty());
    }

    #[test]
    fn test_repeat_tracker_resets_per_section() {
        let sections = vec![Section::new("A", 0.0, 4.0), Section::new("B", 4.0, 8.0)];
        let chords = vec![chord(0.0, 0, 1, "C:maj"), chord(4.0, 1, 1, "C:maj")];

        let chart = ChordChart::build(&sections, &chords, &ChartSettings::default());
        assert_eq!(chart.sections[0].bars[0].display, "C");
        assert_eq!(chart.sections[1].bars[0].display, "C");
    }

    #[test]
    fn test_section_without_chords() {
        let sections = vec![Section::new("Bridge", 0.0, 4.0)];
        let chart = ChordChart::build(&sections, &[], &ChartSettings::default());
        assert!(chart.sections[0].is_empty());
        assert!(matches!(chart.diagnostics.items()[0], Anomaly::EmptySection { .. }));
    }

    #[test]
    fn test_no_beat_data_renders_on_beat_one() {
        let sections = vec![Section::new("Solo", 0.0, 4.0)];
        let chords = vec![ChordEvent::new(0.0, 1.0).at_bar(2).with_all_labels("D:min")];

        let chart = ChordChart::build(&sections, &chords, &ChartSettings::default());
        let solo = &chart.sections[0];
        assert_eq!(solo.normalization.shift(), 0);
        assert_eq!(solo.bars[0].slots.get(1), "Dm");
        assert!(chart
            .diagnostics
            .iter()
            .any(|a| matches!(a, Anomaly::NoBeatData { .. })));
    }

    #[test]
    fn test_chord_without_end_still_placed() {
        let sections = vec![Section::new("Verse", 0.0, 4.0)];
        let mut open = chord(1.0, 0, 3, "G:maj");
        open.end = None;
        let chords = vec![chord(0.0, 0, 1, "C:maj"), open];

        let chart = ChordChart::build(&sections, &chords, &ChartSettings::default());
        assert_eq!(chart.sections[0].bars[0].display, "C G");
        assert!(chart.diagnostics.is_empty());
    }

    #[test]
    fn test_chord_without_bar_skipped() {
        let sections = vec![Section::new("Verse", 0.0, 4.0)];
        let chords = vec![
            ChordEvent::new(0.0, 1.0).with_beat(1).with_all_labels("C:maj"),
            chord(1.0, 3, 1, "G:maj"),
        ];

        let chart = ChordChart::build(&sections, &chords, &ChartSettings::default());
        assert_eq!(chart.sections[0].bars.len(), 1);
        assert!(chart
            .diagnostics
            .iter()
            .any(|a| matches!(a, Anomaly::MissingBar { .. })));
    }

    #[test]
    fn test_settings_select_label() {
        let sections = vec![Section::new("Verse", 0.0, 4.0)];
        let chords = vec![ChordEvent::new(0.0, 1.0)
            .at_bar(0)
            .with_beat(1)
            .with_label(Simplification::Basic, ChordStyle::Pop, "E:min")
            .with_label(Simplification::Complex, ChordStyle::Pop, "E:min7")];

        let basic = ChartSettings::new(Simplification::Basic, ChordStyle::Pop);
        let chart = ChordChart::build(&sections, &chords, &basic);
        assert_eq!(chart.sections[0].bars[0].display, "Em");

        let complex = ChordChart::build(&sections, &chords, &ChartSettings::default());
        assert_eq!(complex.sections[0].bars[0].display, "Em7");
    }

    #[test]
    fn test_no_sections() {
        let chords = vec![chord(0.0, 0, 1, "C:maj")];
        let chart = ChordChart::build(&[], &chords, &ChartSettings::default());
        assert!(chart.is_empty());
    }

    #[test]
    fn test_every_slot_beat_in_range() {
        let sections = vec![Section::new("Verse", 0.0, 100.0)];
        let chords: Vec<ChordEvent> = (0..40)
            .map(|i| chord(i as f64, i / 3, (i * 7) % 9 - 2, "C:maj"))
            .collect();

        let chart = ChordChart::build(&sections, &chords, &ChartSettings::default());
        let normalization = chart.sections[0].normalization;
        for c in &chords {
            assert!((1..=4).contains(&normalization.adjust(c.start_beat)));
        }
    }
}
