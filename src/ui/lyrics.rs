// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Lyrics panel widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::lyrics::{LyricRow, LyricSheet, NO_LYRICS_MESSAGE};
use crate::view::column_rows;

/// Widget for lyric lines with their chords above
pub struct LyricsWidget<'a> {
    sheet: &'a LyricSheet,
    show_chords: bool,
    scroll: u16,
    block: Option<Block<'a>>,
}

impl<'a> LyricsWidget<'a> {
    /// Create a new lyrics widget
    pub fn new(sheet: &'a LyricSheet) -> Self {
        Self {
            sheet,
            show_chords: true,
            scroll: 0,
            block: None,
        }
    }

    /// Show or hide the chord row above each line
    pub fn show_chords(mut self, show: bool) -> Self {
        self.show_chords = show;
        self
    }

    /// Set the vertical scroll offset
    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for LyricsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        Paragraph::new(lyric_lines(self.sheet, self.show_chords))
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}

/// Styled lines for the lyrics panel
pub fn lyric_lines(sheet: &LyricSheet, show_chords: bool) -> Vec<Line<'static>> {
    if sheet.is_empty() {
        return vec![Line::from(Span::styled(
            NO_LYRICS_MESSAGE,
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let mut lines = Vec::new();
    for group in &sheet.groups {
        if let Some(label) = &group.label {
            lines.push(Line::from(Span::styled(
                label.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        }

        for line in &group.lines {
            match &line.row {
                LyricRow::Aligned(words) => {
                    let (chords, words) = column_rows(words, show_chords);
                    if let Some(chords) = chords {
                        lines.push(Line::from(Span::styled(
                            chords,
                            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                        )));
                    }
                    lines.push(Line::from(words));
                }
                LyricRow::Plain(text) => lines.push(Line::from(text.clone())),
            }
        }
        lines.push(Line::from(""));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChartSettings, ChordEvent, LyricLine, LyricWord, Section};

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn sheet() -> LyricSheet {
        let sections = vec![Section::new("Verse", 0.0, 10.0)];
        let lines = vec![
            LyricLine::from_words(1.0, 3.0, vec![LyricWord::new("hold", 1.0, 1.5), LyricWord::new("on", 2.0, 2.5)]),
            LyricLine::from_text(4.0, 6.0, "instrumental"),
        ];
        let chords = vec![ChordEvent::new(1.0, 3.0).at_bar(0).with_beat(1).with_all_labels("E:min")];
        LyricSheet::build(&sections, &lines, &chords, &ChartSettings::default())
    }

    #[test]
    fn test_lyric_lines_with_chords() {
        let lines: Vec<String> = lyric_lines(&sheet(), true).iter().map(plain).collect();
        assert_eq!(lines, vec!["Verse", "Em   Em", "hold on", "instrumental", ""]);
    }

    #[test]
    fn test_lyric_lines_without_chords() {
        let lines: Vec<String> = lyric_lines(&sheet(), false).iter().map(plain).collect();
        assert_eq!(lines, vec!["Verse", "hold on", "instrumental", ""]);
    }

    #[test]
    fn test_lyric_lines_empty() {
        let lines = lyric_lines(&LyricSheet::default(), true);
        assert_eq!(plain(&lines[0]), NO_LYRICS_MESSAGE);
    }

    #[test]
    fn test_lyrics_widget_options() {
        let sheet = LyricSheet::default();
        let widget = LyricsWidget::new(&sheet).show_chords(false).scroll(2);
        assert!(!widget.show_chords);
        assert_eq!(widget.scroll, 2);
    }
}
