// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Lyric-to-chord alignment.
//!
//! Each lyric word is paired with the chord sounding at its onset. Lines
//! are grouped under the section they start in.

use serde::Serialize;

use crate::chart::chord_label;
use crate::model::{ChartSettings, ChordEvent, LyricLine, Section};
use crate::timeline::{first_containing, TemporalIndex, Timed};

/// Sentinel for a job without lyrics
pub const NO_LYRICS_MESSAGE: &str = "No lyrics available.";

/// A word with the chord sounding at its onset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedWord {
    pub word: String,
    /// Onset in seconds, `None` for an untimed word
    pub start: Option<f64>,
    /// Formatted chord label, `None` when no chord covers the word
    pub chord: Option<String>,
}

/// Content of one rendered lyric line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LyricRow {
    /// Word-level alignment available
    Aligned(Vec<AlignedWord>),
    /// Unaligned fallback text
    Plain(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedLine {
    pub start: f64,
    pub end: f64,
    pub row: LyricRow,
}

impl AlignedLine {
    /// Words as plain text, in order
    pub fn text(&self) -> String {
        match &self.row {
            LyricRow::Aligned(words) => words
                .iter()
                .map(|w| w.word.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            LyricRow::Plain(text) => text.clone(),
        }
    }
}

/// Lines under one section heading; `label` is `None` when the song has no sections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LyricGroup {
    pub label: Option<String>,
    pub lines: Vec<AlignedLine>,
}

/// All aligned lyrics of a song
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LyricSheet {
    pub groups: Vec<LyricGroup>,
}

impl LyricSheet {
    /// Align every line and group lines by section.
    ///
    /// Sections without lines are left out. With no sections at all, every
    /// line goes into a single unlabelled group.
    pub fn build(
        sections: &[Section],
        lines: &[LyricLine],
        chords: &[ChordEvent],
        settings: &ChartSettings,
    ) -> Self {
        let chord_index = TemporalIndex::new(chords);
        let align = |line: &LyricLine| align_line(line, &chord_index, settings);

        if lines.is_empty() {
            return Self::default();
        }

        if sections.is_empty() {
            return Self {
                groups: vec![LyricGroup {
                    label: None,
                    lines: lines.iter().map(&align).collect(),
                }],
            };
        }

        let line_index = TemporalIndex::new(lines);
        let groups = sections
            .iter()
            .filter_map(|section| {
                let in_section = line_index.starting_within(section.interval());
                if in_section.is_empty() {
                    return None;
                }
                Some(LyricGroup {
                    label: Some(section.label.clone()),
                    lines: in_section.into_iter().map(&align).collect(),
                })
            })
            .collect();

        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.lines.is_empty())
    }

    pub fn line_count(&self) -> usize {
        self.groups.iter().map(|group| group.lines.len()).sum()
    }
}

/// Align the words of one line against the chords starting within it.
///
/// A word takes the first chord, in input order, whose interval contains
/// the word's start; untimed words get no chord. Lines without words fall
/// back to their text.
pub fn align_line(
    line: &LyricLine,
    chords: &TemporalIndex<'_, ChordEvent>,
    settings: &ChartSettings,
) -> AlignedLine {
    let row = match line.aligned_words() {
        Some(words) => {
            let line_chords = chords.starting_within(line.interval());
            LyricRow::Aligned(
                words
                    .iter()
                    .map(|word| AlignedWord {
                        word: word.word.clone(),
                        start: word.start,
                        chord: word
                            .start
                            .and_then(|t| first_containing(line_chords.iter().copied(), t))
                            .map(|chord| chord_label(chord, settings)),
                    })
                    .collect(),
            )
        }
        None => LyricRow::Plain(line.text.clone().unwrap_or_default()),
    };

    AlignedLine {
        start: line.start,
        end: line.end,
        row,
    }
}
