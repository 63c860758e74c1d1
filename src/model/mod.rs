// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song analysis data model.
//!
//! Sections, chord events and lyric lines exactly as the analysis service
//! delivers them, plus the settings that pick which chord label to display.
//! Upstream JSON is inconsistent, so bar and beat numbers are parsed leniently.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A labelled time span of a song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section name (e.g. "Chorus")
    #[serde(default)]
    pub label: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl Section {
    /// Create a new section
    pub fn new(label: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }
}

/// A recognised chord spanning a time range and one or more bars
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChordEvent {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds; absent means the chord has zero length
    #[serde(default, deserialize_with = "lenient_time", skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    /// First bar covered by the chord
    #[serde(default, deserialize_with = "lenient_int")]
    pub start_bar: Option<i64>,
    /// Last bar covered (inclusive); absent means `start_bar`
    #[serde(default, deserialize_with = "lenient_int")]
    pub end_bar: Option<i64>,
    /// Onset beat within the bar, 1-based
    #[serde(default, deserialize_with = "lenient_int")]
    pub start_beat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord_basic_pop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord_basic_jazz: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord_simple_pop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord_simple_jazz: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord_complex_pop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord_complex_jazz: Option<String>,
}

impl ChordEvent {
    /// Create a chord event without bar, beat or label data
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end: Some(end),
            ..Default::default()
        }
    }

    /// End time, falling back to `start` when the service left it out
    pub fn end_time(&self) -> f64 {
        self.end.unwrap_or(self.start)
    }

    /// Builder: place the chord in a single bar
    pub fn at_bar(mut self, bar: i64) -> Self {
        self.start_bar = Some(bar);
        self.end_bar = None;
        self
    }

    /// Builder: place the chord across an inclusive bar range
    pub fn with_bars(mut self, start_bar: i64, end_bar: i64) -> Self {
        self.start_bar = Some(start_bar);
        self.end_bar = Some(end_bar);
        self
    }

    /// Builder: set onset beat
    pub fn with_beat(mut self, beat: i64) -> Self {
        self.start_beat = Some(beat);
        self
    }

    /// Builder: set one label field
    pub fn with_label(
        mut self,
        simplification: Simplification,
        style: ChordStyle,
        label: impl Into<String>,
    ) -> Self {
        *self.label_slot(simplification, style) = Some(label.into());
        self
    }

    /// Builder: set the same label for every simplification and style
    pub fn with_all_labels(mut self, label: &str) -> Self {
        for simplification in Simplification::ALL {
            for style in ChordStyle::ALL {
                *self.label_slot(simplification, style) = Some(label.to_string());
            }
        }
        self
    }

    /// Raw label for a simplification level and style
    pub fn label(&self, simplification: Simplification, style: ChordStyle) -> Option<&str> {
        let field = match (simplification, style) {
            (Simplification::Basic, ChordStyle::Pop) => &self.chord_basic_pop,
            (Simplification::Basic, ChordStyle::Jazz) => &self.chord_basic_jazz,
            (Simplification::Simple, ChordStyle::Pop) => &self.chord_simple_pop,
            (Simplification::Simple, ChordStyle::Jazz) => &self.chord_simple_jazz,
            (Simplification::Complex, ChordStyle::Pop) => &self.chord_complex_pop,
            (Simplification::Complex, ChordStyle::Jazz) => &self.chord_complex_jazz,
        };
        field.as_deref()
    }

    fn label_slot(&mut self, simplification: Simplification, style: ChordStyle) -> &mut Option<String> {
        match (simplification, style) {
            (Simplification::Basic, ChordStyle::Pop) => &mut self.chord_basic_pop,
            (Simplification::Basic, ChordStyle::Jazz) => &mut self.chord_basic_jazz,
            (Simplification::Simple, ChordStyle::Pop) => &mut self.chord_simple_pop,
            (Simplification::Simple, ChordStyle::Jazz) => &mut self.chord_simple_jazz,
            (Simplification::Complex, ChordStyle::Pop) => &mut self.chord_complex_pop,
            (Simplification::Complex, ChordStyle::Jazz) => &mut self.chord_complex_jazz,
        }
    }

    /// Last bar covered by the chord, defaulting to `start_bar`
    pub fn last_bar(&self) -> Option<i64> {
        self.end_bar.or(self.start_bar)
    }
}

/// A single lyric word; timing is absent when the aligner lost track of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricWord {
    #[serde(default)]
    pub word: String,
    #[serde(default, deserialize_with = "lenient_time")]
    pub start: Option<f64>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub end: Option<f64>,
}

impl LyricWord {
    /// Create a new timed word
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start: Some(start),
            end: Some(end),
        }
    }

    /// Create a word without timing
    pub fn untimed(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            start: None,
            end: None,
        }
    }
}

/// A lyric line with optional word-level alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricLine {
    pub start: f64,
    pub end: f64,
    /// Word-level timing, when the service produced it
    #[serde(default, deserialize_with = "lenient_words")]
    pub words: Option<Vec<LyricWord>>,
    /// Whole-line text, used when `words` is unavailable
    #[serde(default)]
    pub text: Option<String>,
}

impl LyricLine {
    /// Create a line from aligned words
    pub fn from_words(start: f64, end: f64, words: Vec<LyricWord>) -> Self {
        Self {
            start,
            end,
            words: Some(words),
            text: None,
        }
    }

    /// Create a line carrying only plain text
    pub fn from_text(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            words: None,
            text: Some(text.into()),
        }
    }

    /// Aligned words, if any are present
    pub fn aligned_words(&self) -> Option<&[LyricWord]> {
        self.words.as_deref().filter(|words| !words.is_empty())
    }
}

/// Error returned when parsing a setting name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseSettingError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Chord label detail level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Simplification {
    Basic,
    Simple,
    #[default]
    Complex,
}

impl Simplification {
    pub const ALL: [Simplification; 3] = [
        Simplification::Basic,
        Simplification::Simple,
        Simplification::Complex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Simplification::Basic => "basic",
            Simplification::Simple => "simple",
            Simplification::Complex => "complex",
        }
    }

    /// Next level, wrapping around
    pub fn next(self) -> Self {
        match self {
            Simplification::Basic => Simplification::Simple,
            Simplification::Simple => Simplification::Complex,
            Simplification::Complex => Simplification::Basic,
        }
    }
}

impl fmt::Display for Simplification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Simplification {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Simplification::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSettingError {
                kind: "simplification",
                value: s.to_string(),
                expected: "basic, simple, complex",
            })
    }
}

/// Chord naming style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordStyle {
    #[default]
    Pop,
    Jazz,
}

impl ChordStyle {
    pub const ALL: [ChordStyle; 2] = [ChordStyle::Pop, ChordStyle::Jazz];

    pub fn as_str(self) -> &'static str {
        match self {
            ChordStyle::Pop => "pop",
            ChordStyle::Jazz => "jazz",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ChordStyle::Pop => ChordStyle::Jazz,
            ChordStyle::Jazz => ChordStyle::Pop,
        }
    }
}

impl fmt::Display for ChordStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChordStyle {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChordStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSettingError {
                kind: "style",
                value: s.to_string(),
                expected: "pop, jazz",
            })
    }
}

/// Which panels a job view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Lyrics with chords alongside the chord map
    #[default]
    Both,
    /// Lyrics only, without the chord row
    Lyrics,
    /// Chord map only
    Chords,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Both, ViewMode::Lyrics, ViewMode::Chords];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Both => "both",
            ViewMode::Lyrics => "lyrics",
            ViewMode::Chords => "chords",
        }
    }

    pub fn shows_lyrics(self) -> bool {
        self != ViewMode::Chords
    }

    pub fn shows_chart(self) -> bool {
        self != ViewMode::Lyrics
    }

    /// Whether lyric lines carry a chord row above the words
    pub fn shows_lyric_chords(self) -> bool {
        self != ViewMode::Lyrics
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSettingError {
                kind: "view",
                value: s.to_string(),
                expected: "both, lyrics, chords",
            })
    }
}

/// Label selection for chart and lyric rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChartSettings {
    #[serde(default)]
    pub simplification: Simplification,
    #[serde(default)]
    pub style: ChordStyle,
}

impl ChartSettings {
    pub fn new(simplification: Simplification, style: ChordStyle) -> Self {
        Self {
            simplification,
            style,
        }
    }

    /// Name of the upstream field these settings read
    pub fn label_field(&self) -> String {
        format!("chord_{}_{}", self.simplification, self.style)
    }
}

/// Accept integers, integral floats and numeric strings; anything else is absent
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(integral))
}

/// Accept finite numbers and numeric strings; anything else is absent
fn lenient_time<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let seconds = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(seconds.filter(|t| t.is_finite()))
}

/// Keep the words that parse; a non-list `words` field counts as absent
fn lenient_words<'de, D>(deserializer: D) -> Result<Option<Vec<LyricWord>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Array(items)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
    ))
}

fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
