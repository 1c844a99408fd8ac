//! Criteria × levels grid
//!
//! ```text
//! │ Performance indicator │ Good          │ Poor          │
//! │───────────────────────────────────────────────────────│
//! │ Clarity               │ ● Clear       │ Vague         │
//! │ ✎ see p.3             │               │               │
//! ```
//!
//! One band per criterion: row text and the evidence line on the left,
//! one level card per column. Bands page vertically with the cursor.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, AppMode, HitTarget};
use crate::html::to_plain_text;
use crate::ui::layout::Cursor;
use crate::ui::level_card::{truncate, wrap, LevelCard};
use crate::ui::theme::Theme;

/// Lines used by the column header and the rule under it
const HEADER_LINES: u16 = 2;
/// Blank line between criterion bands
const BAND_GAP: u16 = 1;

/// Column x-offsets and widths
struct ColumnLayout {
    label_width: u16,
    levels: Vec<(u16, u16)>,
}

impl ColumnLayout {
    fn compute(inner: Rect, columns: usize) -> Self {
        let label_width = (inner.width * 3 / 10)
            .max(16)
            .min(inner.width / 2)
            .min(inner.width);
        let rest = inner.width.saturating_sub(label_width);
        let each = if columns > 0 { rest / columns as u16 } else { 0 };

        let levels = (0..columns)
            .map(|i| {
                let x = inner.x + label_width + each * i as u16;
                // Last column takes the remainder
                let width = if i + 1 == columns {
                    rest.saturating_sub(each * i as u16)
                } else {
                    each
                };
                (x, width)
            })
            .collect();

        Self {
            label_width,
            levels,
        }
    }
}

pub(crate) fn draw_grid(f: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed_alt))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if !app.is_interactive() {
        let empty = Paragraph::new("No criteria defined")
            .style(Style::default().fg(theme.dimmed).bg(theme.background));
        f.render_widget(empty, inner);
        return;
    }

    let row_height = app.config().appearance.row_height.max(2);
    let band_space = inner.height.saturating_sub(HEADER_LINES);
    app.set_visible_rows((band_space / (row_height + BAND_GAP)).max(1) as usize);

    let hits = render_bands(f, app, inner, row_height, theme);
    for (area, target) in hits {
        app.register_hit_area(area, target);
    }
}

/// Render header and visible bands; returns the clickable areas
fn render_bands(
    f: &mut Frame,
    app: &App,
    inner: Rect,
    row_height: u16,
    theme: &Theme,
) -> Vec<(Rect, HitTarget)> {
    let stride = row_height + BAND_GAP;
    let columns = app.model().grid_columns();
    let cols = ColumnLayout::compute(inner, columns.len());
    let mut hits = Vec::new();

    // Column header
    let header_style = Style::default()
        .fg(theme.accent)
        .bg(theme.background)
        .add_modifier(Modifier::BOLD);
    let buf = f.buffer_mut();
    buf.set_string(
        inner.x + 1,
        inner.y,
        truncate(
            &app.labels().performance_indicator,
            cols.label_width.saturating_sub(2) as usize,
        ),
        header_style,
    );
    for (column, &(x, width)) in columns.iter().zip(&cols.levels) {
        let text = to_plain_text(&column.column_text);
        buf.set_string(
            x + 2,
            inner.y,
            truncate(&text, width.saturating_sub(3) as usize),
            header_style,
        );
    }
    buf.set_string(
        inner.x,
        inner.y + 1,
        "─".repeat(inner.width as usize),
        Style::default().fg(theme.dimmed_alt).bg(theme.background),
    );

    // Criterion bands
    let cursor = app.cursor();
    let editing_row = match app.mode() {
        AppMode::EditingEvidence { row } => Some(row),
        AppMode::Browse => None,
    };
    let marker = app.config().appearance.selected_marker.as_str();
    let bands_top = inner.y + HEADER_LINES;
    let bottom = inner.y + inner.height;

    for (local, row_index) in app.layout().visible_range(cursor.row).enumerate() {
        let y = bands_top + local as u16 * stride;
        if y >= bottom {
            break;
        }
        let height = row_height.min(bottom - y);
        let row = &app.model().grid_rows()[row_index];

        // Row text, then the evidence line in the band's last line
        let label_width = cols.label_width.saturating_sub(2) as usize;
        let text_lines = wrap(
            &to_plain_text(&row.row_text),
            label_width,
            height.saturating_sub(1).max(1) as usize,
        );
        let row_style = Style::default()
            .fg(theme.foreground)
            .bg(theme.background)
            .add_modifier(Modifier::BOLD);
        for (i, line) in text_lines.iter().enumerate() {
            f.buffer_mut().set_string(inner.x + 1, y + i as u16, line, row_style);
        }

        if height >= 2 {
            let evidence_y = y + height - 1;
            let evidence = app.evidence_at(row_index);
            let (text, style) = if editing_row == Some(row_index) {
                (
                    tail(&format!("✎ {}▏", evidence), label_width),
                    Style::default().fg(theme.accent).bg(theme.background),
                )
            } else if evidence.is_empty() {
                (
                    truncate(&format!("✎ {}", app.labels().evidence_placeholder), label_width),
                    Style::default().fg(theme.dimmed_alt).bg(theme.background),
                )
            } else {
                (
                    truncate(&format!("✎ {}", evidence), label_width),
                    Style::default().fg(theme.dimmed).bg(theme.background),
                )
            };
            f.buffer_mut().set_string(inner.x + 1, evidence_y, text, style);
            hits.push((
                Rect::new(inner.x, evidence_y, cols.label_width, 1),
                HitTarget::Evidence(row_index),
            ));
        }

        for (col_index, (column, &(x, width))) in columns.iter().zip(&cols.levels).enumerate() {
            let card_area = Rect::new(x, y, width.saturating_sub(1), height);
            let text = to_plain_text(app.model().row_column_text(row, &column.column_id));
            let card = LevelCard::new(&text, theme)
                .selected(app.selection().is_selected(&row.row_id, &column.column_id))
                .focused(editing_row.is_none() && cursor == Cursor::new(row_index, col_index))
                .marker(marker);
            f.render_widget(card, card_area);
            hits.push((card_area, HitTarget::Cell(Cursor::new(row_index, col_index))));
        }
    }

    hits
}

/// Keep the end of `s` visible (the part being typed)
fn tail(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut width = 0;
    let mut chars: Vec<char> = Vec::new();
    for c in s.chars().rev() {
        let cw = c.width().unwrap_or(0);
        if width + cw > max_width {
            break;
        }
        width += cw;
        chars.push(c);
    }
    chars.into_iter().rev().collect()
}
