//! Level card widget
//!
//! Renders one row/column intersection of the rubric: the scoring
//! guideline text, word-wrapped into the card. The selected level of a
//! row is filled with the selection colors and prefixed with the
//! selection marker; the cursor cell gets an accent edge on the left.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;

pub struct LevelCard<'a> {
    text: &'a str,
    theme: &'a Theme,
    selected: bool,
    focused: bool,
    marker: &'a str,
}

impl<'a> LevelCard<'a> {
    pub fn new(text: &'a str, theme: &'a Theme) -> Self {
        Self {
            text,
            theme,
            selected: false,
            focused: false,
            marker: "",
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn marker(mut self, marker: &'a str) -> Self {
        self.marker = marker;
        self
    }
}

impl<'a> Widget for LevelCard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let (bg, fg) = if self.selected {
            (self.theme.selection_bg, self.theme.selection_fg)
        } else {
            (self.theme.background, self.theme.dimmed)
        };

        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(bg);
                }
            }
        }

        // Left edge: cursor indicator
        if self.focused {
            let edge = Style::default().fg(self.theme.accent).bg(bg);
            for y in area.y..area.y + area.height {
                buf.set_string(area.x, y, "▌", edge);
            }
        }

        let padding_x = 2u16;
        let inner_width = area.width.saturating_sub(padding_x + 1) as usize;
        if inner_width == 0 {
            return;
        }

        let mut style = Style::default().fg(fg).bg(bg);
        if self.selected {
            style = style.add_modifier(Modifier::BOLD);
        }

        let text = if self.selected && !self.marker.is_empty() {
            format!("{}{}", self.marker, self.text)
        } else {
            self.text.to_string()
        };

        let lines = wrap(&text, inner_width, area.height as usize);
        for (i, line) in lines.iter().enumerate() {
            buf.set_string(area.x + padding_x, area.y + i as u16, line, style);
        }
    }
}

/// Word-wrap `text` into at most `max_lines` lines of `width` columns.
///
/// Words longer than a line are split; the last line gets an ellipsis
/// when text is cut off.
pub fn wrap(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let sep = if current.is_empty() { 0 } else { 1 };
        if current.width() + sep + word.width() <= width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        // Hard-split words wider than the card
        for c in word.chars() {
            let cw = c.width().unwrap_or(0);
            if current.width() + cw > width {
                lines.push(std::mem::take(&mut current));
            }
            current.push(c);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = truncate(&format!("{} …", last), width);
            if !last.ends_with('…') {
                last.push('…');
            }
        }
    }

    lines
}

/// Truncate string to fit within max_width, adding ellipsis if needed
pub fn truncate(s: &str, max_width: usize) -> String {
    let width = s.width();
    if width <= max_width {
        s.to_string()
    } else if max_width <= 1 {
        "…".to_string()
    } else {
        let mut result = String::new();
        let mut current_width = 0;

        for c in s.chars() {
            let char_width = c.width().unwrap_or(0);
            if current_width + char_width + 1 > max_width {
                result.push('…');
                break;
            }
            result.push(c);
            current_width += char_width;
        }

        result
    }
}
