// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Plain-text rendering of a job view, used by `--print`.

use std::fmt::Write;

use super::JobView;
use crate::chart::{BarCell, SectionChart, NO_CHORDS_MESSAGE, NO_SECTIONS_MESSAGE};
use crate::lyrics::{AlignedWord, LyricRow, LyricSheet, NO_LYRICS_MESSAGE};
use crate::model::ViewMode;

/// Minimum width of a bar cell in the chord map
const CELL_WIDTH: usize = 10;

/// Chord row and word row for one aligned line.
///
/// Each word gets a column as wide as the longer of the word and its chord,
/// so chords sit above the word they sound on. The chord row is `None` when
/// `show_chords` is off or no word has a chord.
pub fn column_rows(words: &[AlignedWord], show_chords: bool) -> (Option<String>, String) {
    let mut chord_row = String::new();
    let mut word_row = String::new();
    let mut any_chord = false;

    for (i, word) in words.iter().enumerate() {
        let chord = if show_chords { word.chord.as_deref().unwrap_or("") } else { "" };
        any_chord |= !chord.is_empty();

        let width = word.word.chars().count().max(chord.chars().count());
        if i > 0 {
            chord_row.push(' ');
            word_row.push(' ');
        }
        pad_into(&mut chord_row, chord, width);
        pad_into(&mut word_row, &word.word, width);
    }

    let chord_row = any_chord.then(|| chord_row.trim_end().to_string());
    (chord_row, word_row.trim_end().to_string())
}

fn pad_into(out: &mut String, text: &str, width: usize) {
    out.push_str(text);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(text.chars().count())));
}

/// Render the whole view as text for the given mode
pub fn render_text(view: &JobView, mode: ViewMode) -> String {
    let mut out = String::new();
    let settings = view.settings();
    let _ = writeln!(out, "Song: {}", view.title());
    let _ = writeln!(out, "Chords: {} / {}", settings.simplification, settings.style);

    if mode.shows_lyrics() {
        out.push('\n');
        render_lyrics(&mut out, view.lyrics(), mode.shows_lyric_chords());
    }

    if mode.shows_chart() {
        out.push('\n');
        render_chart(&mut out, &view.chart().sections);
    }

    out
}

fn render_lyrics(out: &mut String, sheet: &LyricSheet, show_chords: bool) {
    let _ = writeln!(out, "== Lyrics ==");
    if sheet.is_empty() {
        let _ = writeln!(out, "{}", NO_LYRICS_MESSAGE);
        return;
    }

    for group in &sheet.groups {
        if let Some(label) = &group.label {
            let _ = writeln!(out, "[{}]", label);
        }
        for line in &group.lines {
            match &line.row {
                LyricRow::Aligned(words) => {
                    let (chords, words) = column_rows(words, show_chords);
                    if let Some(chords) = chords {
                        let _ = writeln!(out, "{}", chords);
                    }
                    let _ = writeln!(out, "{}", words);
                }
                LyricRow::Plain(text) => {
                    let _ = writeln!(out, "{}", text);
                }
            }
        }
        out.push('\n');
    }
}

fn render_chart(out: &mut String, sections: &[SectionChart]) {
    let _ = writeln!(out, "== Chord Map ==");
    if sections.is_empty() {
        let _ = writeln!(out, "{}", NO_SECTIONS_MESSAGE);
        return;
    }

    for section in sections {
        let _ = writeln!(out, "[{}]", section.label);
        if section.is_empty() {
            let _ = writeln!(out, "{}", NO_CHORDS_MESSAGE);
            out.push('\n');
            continue;
        }

        for row in section.rows() {
            let width = row
                .iter()
                .flatten()
                .map(|bar| bar.display.chars().count().max(bar.caption().len()))
                .max()
                .unwrap_or(0)
                .max(CELL_WIDTH);
            let _ = writeln!(out, "{}", cell_line(&row, width, |bar| bar.display.clone()));
            let _ = writeln!(out, "{}", cell_line(&row, width, BarCell::caption));
        }
        out.push('\n');
    }
}

/// One text line across a row of four cells; missing bars become blank fillers
fn cell_line<F>(row: &[Option<&BarCell>], width: usize, text: F) -> String
where
    F: Fn(&BarCell) -> String,
{
    let mut line = String::from("|");
    for cell in row {
        let content = cell.map(|bar| text(bar)).unwrap_or_default();
        line.push(' ');
        pad_into(&mut line, &content, width);
        line.push_str(" |");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::JobSnapshot;
    use crate::model::{ChartSettings, ChordEvent, LyricLine, LyricWord, Section};

    fn word(word: &str, chord: Option<&str>) -> AlignedWord {
        AlignedWord {
            word: word.to_string(),
            start: Some(0.0),
            chord: chord.map(str::to_string),
        }
    }

    #[test]
    fn test_column_rows_align_chords_over_words() {
        let words = vec![word("let", Some("C")), word("it", Some("Cmaj7")), word("be", None)];
        let (chords, text) = column_rows(&words, true);
        assert_eq!(chords.as_deref(), Some("C   Cmaj7"));
        assert_eq!(text, "let it    be");
    }

    #[test]
    fn test_column_rows_without_chords() {
        let words = vec![word("let", Some("C")), word("it", None)];
        let (chords, text) = column_rows(&words, false);
        assert_eq!(chords, None);
        assert_eq!(text, "let it");

        let (chords, _) = column_rows(&[word("la", None)], true);
        assert_eq!(chords, None);
    }

    #[test]
    fn test_render_empty_view_sentinels() {
        let view = JobView::new(JobSnapshot::empty("job-1"), ChartSettings::default());
        let text = render_text(&view, ViewMode::Both);
        assert!(text.starts_with("Song: job-1\n"));
        assert!(text.contains(NO_LYRICS_MESSAGE));
        assert!(text.contains(NO_SECTIONS_MESSAGE));
    }

    #[test]
    fn test_render_section_without_chords() {
        let snapshot = JobSnapshot {
            sections: vec![Section::new("Intro", 0.0, 4.0)],
            ..JobSnapshot::empty("job-2")
        };
        let view = JobView::new(snapshot, ChartSettings::default());
        let text = render_text(&view, ViewMode::Chords);
        assert!(text.contains("[Intro]\nNo chords in this section."));
        assert!(!text.contains("== Lyrics =="));
    }

    #[test]
    fn test_render_bars_and_modes() {
        let snapshot = JobSnapshot {
            sections: vec![Section::new("Verse", 0.0, 16.0)],
            chords: vec![
                ChordEvent::new(0.0, 4.0).with_bars(0, 1).with_beat(1).with_all_labels("C:maj"),
                ChordEvent::new(8.0, 12.0).at_bar(2).with_beat(1).with_all_labels("G:maj"),
            ],
            lines: vec![LyricLine::from_words(
                0.0,
                4.0,
                vec![LyricWord::new("hey", 0.5, 1.0), LyricWord::new("jude", 1.0, 2.0)],
            )],
            ..JobSnapshot::empty("job-3")
        };
        let view = JobView::new(snapshot, ChartSettings::default());

        let both = render_text(&view, ViewMode::Both);
        assert!(both.contains("[Verse]\nC   C\nhey jude\n"));
        assert!(both.contains("| C          | %          | G          |            |"));
        assert!(both.contains("| Bar 1      | Bar 2      | Bar 3      |            |"));

        let lyrics_only = render_text(&view, ViewMode::Lyrics);
        assert!(lyrics_only.contains("[Verse]\nhey jude\n"));
        assert!(!lyrics_only.contains("== Chord Map =="));
    }
}
