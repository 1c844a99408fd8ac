//! Drawing functions for the TUI
//!
//! - `mod.rs` - frame layout, header (title + description), status bar
//! - `grid` - the criteria × levels grid

mod grid;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, HitTarget, Status};
use crate::html::to_plain_text;
use crate::ui::level_card::{truncate, wrap};
use crate::ui::theme::Theme;

use grid::draw_grid;

/// Description lines shown above the grid before it is cut off
const MAX_DESCRIPTION_LINES: usize = 6;

/// Main draw function. Also records clickable areas on `app`.
pub fn draw(f: &mut Frame, app: &mut App) {
    app.clear_hit_areas();
    let theme = app.theme().clone();

    let area = f.area();
    let bg_block = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(bg_block, area);

    if app.model().has_grid() {
        let description = description_lines(app, area.width, MAX_DESCRIPTION_LINES);
        let header_height = description.len().max(1) as u16 + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_height), // Title + description
                Constraint::Min(3),                // Grid
                Constraint::Length(1),             // Status bar
            ])
            .split(area);

        draw_header(f, app, chunks[0], description, &theme);
        draw_grid(f, app, chunks[1], &theme);
        draw_status_bar(f, app, chunks[2], &theme);
    } else {
        // Description-only: no grid, no download
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let description = description_lines(app, area.width, usize::MAX);
        draw_header(f, app, chunks[0], description, &theme);
        draw_status_bar(f, app, chunks[1], &theme);
    }
}

fn description_lines(app: &App, width: u16, max_lines: usize) -> Vec<String> {
    if !app.model().has_description() {
        return Vec::new();
    }

    let width = width.saturating_sub(4) as usize;
    let mut lines = Vec::new();
    for paragraph in to_plain_text(app.model().description()).lines() {
        lines.extend(wrap(paragraph, width, usize::MAX));
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = truncate(&format!("{} …", last), width);
        }
    }
    lines
}

fn draw_header(f: &mut Frame, app: &App, area: Rect, description: Vec<String>, theme: &Theme) {
    let title = format!(" {} ", to_plain_text(app.model().title()));

    let lines: Vec<Line> = description
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.foreground))))
        .collect();

    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(Span::styled(
                title,
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(header, area);
}

/// Key hints, last download outcome, download button
fn draw_status_bar(f: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let labels = app.labels();

    let hints = if !app.can_download() {
        " q: quit".to_string()
    } else if app.is_editing() {
        format!(" {} | Enter/Esc: done | Ctrl+U: clear", labels.evidence_title)
    } else {
        let layout = app.layout();
        format!(
            " {}/{} selected | Page {}/{} | ←↑↓→: move | Enter: {} | e: {} | s: {} | q: quit",
            app.selection().selected_count(),
            layout.rows,
            layout.page(app.cursor().row),
            layout.page_count(),
            labels.click_to_select,
            labels.evidence_placeholder,
            labels.download_responses,
        )
    };

    let (message, message_color) = match app.status() {
        Some(Status::Saved(location)) => (format!(" Saved {} ", location), theme.status_ok),
        Some(Status::Failed(error)) => (format!(" {} ", error), theme.status_error),
        None => (String::new(), theme.dimmed),
    };

    let button = if app.can_download() {
        format!(" [ {} ] ", labels.download_responses)
    } else {
        String::new()
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(message.width() as u16),
            Constraint::Length(button.width() as u16),
        ])
        .split(area);

    let base = Style::default().bg(theme.background);
    let hints_width = chunks[0].width as usize;
    f.render_widget(
        Paragraph::new(truncate(&hints, hints_width)).style(base.fg(theme.dimmed)),
        chunks[0],
    );
    f.render_widget(Paragraph::new(message).style(base.fg(message_color)), chunks[1]);
    f.render_widget(
        Paragraph::new(button).style(base.fg(theme.accent).add_modifier(Modifier::BOLD)),
        chunks[2],
    );

    if app.can_download() {
        app.register_hit_area(chunks[2], HitTarget::Download);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::export::{ExportError, FileSaver, Saved};
    use crate::rubric::RubricModel;
    use ratatui::{backend::TestBackend, Terminal};

    struct NullSaver;

    impl FileSaver for NullSaver {
        fn save(&self, file_name: &str, bytes: &[u8]) -> Result<Saved, ExportError> {
            Ok(Saved {
                location: file_name.to_string(),
                bytes: bytes.len(),
            })
        }
    }

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_grid() {
        let model = RubricModel::from_json(
            r#"{
                "title": "Essay &amp; style",
                "description": "<p>Pick one level per row</p>",
                "grid": {
                    "rows": [{"rowId": 1, "rowText": "Clarity", "cells": [
                        {"columnId": 1, "text": "Clear"}
                    ]}],
                    "columns": [
                        {"columnId": 1, "columnText": "Good"},
                        {"columnId": 2, "columnText": "Poor"}
                    ]
                }
            }"#,
        )
        .unwrap();
        let mut app = App::with_saver(model, Config::default(), "1", NullSaver);
        app.activate();

        let screen = render(&mut app, 100, 20);
        assert!(screen.contains("Essay & style"));
        assert!(screen.contains("Pick one level per row"));
        assert!(screen.contains("Good"));
        assert!(screen.contains("Poor"));
        assert!(screen.contains("Clarity"));
        assert!(screen.contains("Clear"));
        assert!(screen.contains("Download responses"));
        assert!(screen.contains("1/1 selected"));
    }

    #[test]
    fn test_description_only_has_no_download() {
        let model =
            RubricModel::from_json(r#"{"title": "Guide", "description": "Read carefully"}"#)
                .unwrap();
        let mut app = App::with_saver(model, Config::default(), "1", NullSaver);

        let screen = render(&mut app, 60, 10);
        assert!(screen.contains("Guide"));
        assert!(screen.contains("Read carefully"));
        assert!(!screen.contains("Download responses"));
    }
}
