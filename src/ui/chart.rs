// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord map widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::chart::{BarCell, SectionChart, NO_CHORDS_MESSAGE, NO_SECTIONS_MESSAGE};

/// Minimum bar cell width in columns
const CELL_WIDTH: usize = 10;

/// Widget for the per-section bar grid
pub struct ChartWidget<'a> {
    sections: &'a [SectionChart],
    scroll: u16,
    block: Option<Block<'a>>,
}

impl<'a> ChartWidget<'a> {
    /// Create a new chart widget
    pub fn new(sections: &'a [SectionChart]) -> Self {
        Self {
            sections,
            scroll: 0,
            block: None,
        }
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

impl Widget for ChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        Paragraph::new(chart_lines(self.sections))
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}

/// Styled lines for the chord map, two per row of bars
pub fn chart_lines(sections: &[SectionChart]) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);

    if sections.is_empty() {
        return vec![Line::from(Span::styled(NO_SECTIONS_MESSAGE, dim))];
    }

    let mut lines = Vec::new();
    for section in sections {
        lines.push(Line::from(Span::styled(
            section.label.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));

        if section.is_empty() {
            lines.push(Line::from(Span::styled(NO_CHORDS_MESSAGE, dim)));
        }

        for row in section.rows() {
            let width = row
                .iter()
                .flatten()
                .map(|bar| bar.display.chars().count().max(bar.caption().len()))
                .max()
                .unwrap_or(0)
                .max(CELL_WIDTH);

            lines.push(row_line(&row, width, |bar| {
                let style = if bar.is_repeat() {
                    dim
                } else {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                };
                Span::styled(pad(&bar.display, width), style)
            }));
            lines.push(row_line(&row, width, |bar| Span::styled(pad(&bar.caption(), width), dim)));
        }
        lines.push(Line::from(""));
    }
    lines
}

fn row_line<F>(row: &[Option<&BarCell>], width: usize, cell: F) -> Line<'static>
where
    F: Fn(&BarCell) -> Span<'static>,
{
    let border = Style::default().fg(Color::DarkGray);
    let mut spans = vec![Span::styled("│", border)];
    for slot in row {
        spans.push(Span::raw(" "));
        spans.push(match slot {
            Some(bar) => cell(bar),
            None => Span::raw(" ".repeat(width)),
        });
        spans.push(Span::styled(" │", border));
    }
    Line::from(spans)
}

fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}
