// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord label formatting.

use crate::model::{ChartSettings, ChordEvent};

/// Marker for an empty beat slot or a missing label
pub const EMPTY_SLOT: &str = "–";

/// Turn a raw analysis label into a display string.
///
/// `":maj"` is dropped (major chords show the bare root) and `":min"`
/// becomes `"m"`. Rewriting repeats until no token is left, so the result
/// is always a fixed point.
pub fn format_chord(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|label| !label.is_empty()) else {
        return EMPTY_SLOT.to_string();
    };

    let mut label = raw.to_string();
    loop {
        let next = label.replace(":maj", "").replace(":min", "m");
        if next == label {
            break;
        }
        label = next;
    }

    if label.is_empty() {
        EMPTY_SLOT.to_string()
    } else {
        label
    }
}

/// Display label of `chord` under `settings`
pub fn chord_label(chord: &ChordEvent, settings: &ChartSettings) -> String {
    format_chord(chord.label(settings.simplification, settings.style))
}
