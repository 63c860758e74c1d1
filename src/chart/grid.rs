// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Bar grid construction.
//!
//! Chords that already carry a normalized beat are spread over every bar
//! they cover, written into four beat slots per bar, collapsed into a short
//! display string and run-length compressed with the `%` repeat marker.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::beat::BEATS_PER_BAR;
use super::format::EMPTY_SLOT;
use crate::diagnostics::{Anomaly, Diagnostics};

/// Shown in place of a bar identical to the one before it
pub const REPEAT_MARKER: &str = "%";

/// Upper bound on bars rendered for one section
pub const MAX_SECTION_BARS: i64 = 1024;

/// Columns per display row
pub const BARS_PER_ROW: usize = 4;

/// A chord ready for bar placement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedChord {
    pub start_bar: i64,
    /// Inclusive, never below `start_bar`
    pub end_bar: i64,
    /// Adjusted beat in 1..=4
    pub beat: u8,
    /// Formatted label
    pub label: String,
}

impl PlacedChord {
    pub fn new(start_bar: i64, end_bar: i64, beat: u8, label: impl Into<String>) -> Self {
        Self {
            start_bar,
            end_bar: end_bar.max(start_bar),
            beat: beat.clamp(1, BEATS_PER_BAR as u8),
            label: label.into(),
        }
    }
}

/// The four beat slots of a bar.
///
/// A slot is occupied once any chord lands on it, even one whose label
/// formats to the empty marker; only labelled slots count as filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarSlots([Option<String>; 4]);

impl BarSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label at a 1-based beat
    pub fn get(&self, beat: u8) -> &str {
        self.0[Self::index(beat)].as_deref().unwrap_or(EMPTY_SLOT)
    }

    /// Write a label at a 1-based beat, returning the label of the chord it
    /// replaced when the slot was already occupied
    pub fn set(&mut self, beat: u8, label: impl Into<String>) -> Option<String> {
        self.0[Self::index(beat)].replace(label.into())
    }

    pub fn is_occupied(&self, beat: u8) -> bool {
        self.0[Self::index(beat)].is_some()
    }

    pub fn is_filled(&self, beat: u8) -> bool {
        self.get(beat) != EMPTY_SLOT
    }

    pub fn filled_count(&self) -> usize {
        (1..=BEATS_PER_BAR as u8).filter(|&beat| self.is_filled(beat)).count()
    }

    /// Slot labels in beat order, empty slots as the marker
    pub fn labels(&self) -> [&str; 4] {
        std::array::from_fn(|i| self.get(i as u8 + 1))
    }

    /// Compact display: a lone downbeat chord shows alone, chords on 1 and 3
    /// show as a pair, anything else lists all four slots.
    pub fn collapse(&self) -> String {
        let filled = self.filled_count();
        if filled == 1 && self.is_filled(1) {
            return self.get(1).to_string();
        }
        if filled == 2 && self.is_filled(1) && self.is_filled(3) {
            return format!("{} {}", self.get(1), self.get(3));
        }
        self.labels().join(" / ")
    }

    fn index(beat: u8) -> usize {
        (beat.clamp(1, BEATS_PER_BAR as u8) - 1) as usize
    }
}

impl Serialize for BarSlots {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.labels().serialize(serializer)
    }
}

/// One rendered bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarCell {
    /// Raw bar index from the analysis data
    pub number: i64,
    pub slots: BarSlots,
    /// Collapsed slot content
    pub content: String,
    /// What is shown: `content`, or the repeat marker
    pub display: String,
}

impl BarCell {
    /// 1-based bar caption
    pub fn caption(&self) -> String {
        format!("Bar {}", self.number + 1)
    }

    pub fn is_repeat(&self) -> bool {
        self.display == REPEAT_MARKER
    }
}

/// Lay placed chords onto the contiguous bar range they cover.
///
/// Bars in the range with no chord render as four empty slots. Two chords on
/// the same slot: the later one in input order wins and a collision is recorded.
pub fn build_bars(section: &str, chords: &[PlacedChord], diagnostics: &mut Diagnostics) -> Vec<BarCell> {
    let (Some(min_bar), Some(max_bar)) = (
        chords.iter().map(|c| c.start_bar).min(),
        chords.iter().map(|c| c.end_bar).max(),
    ) else {
        return Vec::new();
    };

    let span = max_bar.saturating_sub(min_bar).saturating_add(1);
    let last_bar = if span > MAX_SECTION_BARS {
        diagnostics.push(Anomaly::BarSpanTooLarge {
            section: section.to_string(),
            span,
            limit: MAX_SECTION_BARS,
        });
        min_bar + MAX_SECTION_BARS - 1
    } else {
        max_bar
    };

    let mut by_bar: BTreeMap<i64, Vec<&PlacedChord>> = BTreeMap::new();
    for chord in chords {
        for bar in chord.start_bar..=chord.end_bar.min(last_bar) {
            by_bar.entry(bar).or_default().push(chord);
        }
    }

    let bars = (min_bar..=last_bar).map(|bar| {
        let mut slots = BarSlots::new();
        for chord in by_bar.get(&bar).into_iter().flatten() {
            if let Some(replaced) = slots.set(chord.beat, chord.label.clone()) {
                diagnostics.push(Anomaly::SlotCollision {
                    section: section.to_string(),
                    bar,
                    beat: chord.beat,
                    replaced,
                    label: chord.label.clone(),
                });
            }
        }
        (bar, slots)
    });

    compress_repeats(bars)
}

/// Replace each bar equal to its predecessor with the repeat marker.
///
/// The first bar has no predecessor, so it always shows literally.
pub fn compress_repeats<I>(bars: I) -> Vec<BarCell>
where
    I: IntoIterator<Item = (i64, BarSlots)>,
{
    let (cells, _) = bars.into_iter().fold(
        (Vec::new(), None::<String>),
        |(mut cells, previous), (number, slots)| {
            let content = slots.collapse();
            let display = if previous.as_deref() == Some(content.as_str()) {
                REPEAT_MARKER.to_string()
            } else {
                content.clone()
            };
            cells.push(BarCell {
                number,
                slots,
                content: content.clone(),
                display,
            });
            (cells, Some(content))
        },
    );
    cells
}

/// Chunk bars into rows of four; the last row is padded with `None`
pub fn rows(bars: &[BarCell]) -> Vec<[Option<&BarCell>; BARS_PER_ROW]> {
    bars.chunks(BARS_PER_ROW)
        .map(|chunk| std::array::from_fn(|i| chunk.get(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(chords: &[PlacedChord]) -> (Vec<BarCell>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let bars = build_bars("Verse", chords, &mut diagnostics);
        (bars, diagnostics)
    }

    #[test]
    fn test_collapse_single_downbeat() {
        let mut slots = BarSlots::new();
        slots.set(1, "C");
        assert_eq!(slots.collapse(), "C");
    }

    #[test]
    fn test_collapse_one_and_three() {
        let mut slots = BarSlots::new();
        slots.set(1, "C");
        slots.set(3, "G");
        assert_eq!(slots.collapse(), "C G");
    }

    #[test]
    fn test_collapse_other_layouts() {
        let mut offbeat = BarSlots::new();
        offbeat.set(2, "F");
        assert_eq!(offbeat.collapse(), "– / F / – / –");

        let mut three = BarSlots::new();
        three.set(1, "C");
        three.set(2, "D");
        three.set(3, "E");
        assert_eq!(three.collapse(), "C / D / E / –");

        assert_eq!(BarSlots::new().collapse(), "– / – / – / –");
    }

    #[test]
    fn test_empty_bars_inside_range() {
        let (bars, _) = build(&[PlacedChord::new(10, 10, 1, "C"), PlacedChord::new(12, 12, 2, "F")]);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].number, 10);
        assert_eq!(bars[1].number, 11);
        assert_eq!(bars[1].content, "– / – / – / –");
        assert_eq!(bars[2].display, "– / F / – / –");
    }

    #[test]
    fn test_range_uses_end_bar() {
        let (bars, _) = build(&[PlacedChord::new(10, 12, 1, "C"), PlacedChord::new(10, 10, 3, "G")]);
        let numbers: Vec<i64> = bars.iter().map(|b| b.number).collect();
        assert_eq!(numbers, vec![10, 11, 12]);
    }

    #[test]
    fn test_multi_bar_chord_replicated() {
        let (bars, _) = build(&[PlacedChord::new(5, 7, 1, "Am")]);
        assert_eq!(bars.len(), 3);
        for bar in &bars {
            assert_eq!(bar.slots.get(1), "Am");
            assert_eq!(bar.content, "Am");
        }
        assert_eq!(bars[0].display, "Am");
        assert_eq!(bars[1].display, REPEAT_MARKER);
        assert_eq!(bars[2].display, REPEAT_MARKER);
    }

    #[test]
    fn test_repeat_after_change() {
        let (bars, _) = build(&[
            PlacedChord::new(0, 0, 1, "C"),
            PlacedChord::new(1, 1, 1, "G"),
            PlacedChord::new(2, 2, 1, "G"),
            PlacedChord::new(3, 3, 1, "C"),
        ]);
        let display: Vec<&str> = bars.iter().map(|b| b.display.as_str()).collect();
        assert_eq!(display, vec!["C", "G", REPEAT_MARKER, "C"]);
    }

    #[test]
    fn test_first_bar_never_repeat() {
        let (bars, _) = build(&[PlacedChord::new(0, 0, 1, "C")]);
        assert!(!bars[0].is_repeat());
    }

    #[test]
    fn test_slot_collision_last_write_wins() {
        let (bars, diagnostics) = build(&[PlacedChord::new(0, 0, 1, "C"), PlacedChord::new(0, 0, 1, "G")]);
        assert_eq!(bars[0].slots.get(1), "G");
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics.items()[0],
            Anomaly::SlotCollision { replaced, label, .. } if replaced == "C" && label == "G"
        ));
    }

    #[test]
    fn test_collision_over_unlabelled_chord() {
        let (bars, diagnostics) = build(&[
            PlacedChord::new(0, 0, 1, EMPTY_SLOT),
            PlacedChord::new(0, 0, 1, "G"),
        ]);
        assert_eq!(bars[0].slots.get(1), "G");
        assert!(matches!(
            &diagnostics.items()[0],
            Anomaly::SlotCollision { replaced, label, .. } if replaced == EMPTY_SLOT && label == "G"
        ));

        let (bars, diagnostics) = build(&[
            PlacedChord::new(0, 0, 1, "G"),
            PlacedChord::new(0, 0, 1, EMPTY_SLOT),
        ]);
        assert_eq!(bars[0].content, "– / – / – / –");
        assert!(bars[0].slots.is_occupied(1));
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_slots_serialize_as_labels() {
        let mut slots = BarSlots::new();
        slots.set(3, "G");
        let json = serde_json::to_value(&slots).unwrap();
        assert_eq!(json, serde_json::json!(["–", "–", "G", "–"]));
    }

    #[test]
    fn test_no_chords_no_bars() {
        let (bars, diagnostics) = build(&[]);
        assert!(bars.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_huge_span_truncated() {
        let (bars, diagnostics) = build(&[PlacedChord::new(0, 0, 1, "C"), PlacedChord::new(5_000_000, 5_000_000, 1, "D")]);
        assert_eq!(bars.len() as i64, MAX_SECTION_BARS);
        assert!(matches!(diagnostics.items()[0], Anomaly::BarSpanTooLarge { .. }));
    }

    #[test]
    fn test_rows_padded() {
        let (bars, _) = build(&[PlacedChord::new(0, 5, 1, "C")]);
        let rows = rows(&bars);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].iter().all(Option::is_some));
        assert_eq!(rows[1].iter().filter(|cell| cell.is_some()).count(), 2);
    }

    #[test]
    fn test_caption_is_one_based() {
        let (bars, _) = build(&[PlacedChord::new(0, 0, 1, "C")]);
        assert_eq!(bars[0].caption(), "Bar 1");
    }
}
