// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Per-section beat normalization.
//!
//! Chord onsets from the analysis service are often phase-shifted: most
//! chords of a section land on, say, beat 3 instead of beat 1. The
//! normalizer finds the dominant onset beat of a section and rotates every
//! onset so that beat displays as beat 1.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::ChordEvent;

/// Beats in a bar
pub const BEATS_PER_BAR: i64 = 4;

/// Beat rotation for one section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BeatNormalizer {
    /// Most common onset beat, if any chord had one
    dominant: Option<i64>,
    /// Rotation applied to every onset, in 0..4
    shift: u8,
}

impl BeatNormalizer {
    /// Build from the onset histogram of a section's chords.
    ///
    /// Ties between equally common beats go to the lowest beat value.
    pub fn from_chords<'a, I>(chords: I) -> Self
    where
        I: IntoIterator<Item = &'a ChordEvent>,
    {
        let mut histogram: BTreeMap<i64, usize> = BTreeMap::new();
        for beat in chords.into_iter().filter_map(|chord| chord.start_beat) {
            *histogram.entry(beat).or_insert(0) += 1;
        }
        Self::from_histogram(&histogram)
    }

    fn from_histogram(histogram: &BTreeMap<i64, usize>) -> Self {
        // Ascending key order: a later beat only wins with a strictly higher count
        let dominant = histogram
            .iter()
            .fold(None, |best: Option<(i64, usize)>, (&beat, &count)| match best {
                Some((_, top)) if top >= count => best,
                _ => Some((beat, count)),
            })
            .map(|(beat, _)| beat);

        let shift = dominant
            .map(|beat| ((BEATS_PER_BAR + 1 - beat.rem_euclid(BEATS_PER_BAR)) % BEATS_PER_BAR) as u8)
            .unwrap_or(0);

        Self { dominant, shift }
    }

    /// Most common onset beat
    pub fn dominant_beat(&self) -> Option<i64> {
        self.dominant
    }

    /// Rotation offset, `(4 + 1 - dominant) % 4`
    pub fn shift(&self) -> u8 {
        self.shift
    }

    /// Whether any chord in the section carried a usable onset beat
    pub fn has_beat_data(&self) -> bool {
        self.dominant.is_some()
    }

    /// Displayed beat slot in 1..=4 for a raw onset beat.
    ///
    /// Computed as `((start_beat - 1 + shift) mod 4) + 1`. Sections without
    /// beat data, and chords without an onset, land on beat 1.
    pub fn adjust(&self, start_beat: Option<i64>) -> u8 {
        match (self.dominant, start_beat) {
            (Some(_), Some(beat)) => {
                let zero_based = (beat.rem_euclid(BEATS_PER_BAR) + BEATS_PER_BAR - 1
                    + self.shift as i64)
                    % BEATS_PER_BAR;
                zero_based as u8 + 1
            }
            _ => 1,
        }
    }
}
