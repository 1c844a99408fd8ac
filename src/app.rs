use ratatui::layout::Rect;

use crate::config::Config;
use crate::export::{CsvWriterSerializer, DirectorySaver, ExportPipeline, FileSaver, Saved};
use crate::l10n::Labels;
use crate::rubric::{Column, Row, RubricModel};
use crate::selection::SelectionState;
use crate::ui::layout::{Cursor, GridLayout};
use crate::ui::Theme;

/// Input mode - determines how keys are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Moving the cursor and selecting levels
    Browse,
    /// Typing evidence for the row at this display index
    EditingEvidence { row: usize },
}

/// Outcome of the last download, shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Saved(String),
    Failed(String),
}

/// Something on screen that reacts to a mouse click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Cell(Cursor),
    Evidence(usize),
    Download,
}

/// Application state
pub struct App {
    model: RubricModel,
    selection: SelectionState,
    labels: Labels,
    config: Config,
    theme: Theme,
    pipeline: ExportPipeline,
    /// Names the downloaded file
    instance_id: String,
    mode: AppMode,
    cursor: Cursor,
    /// Row bands that fit on screen, updated by the renderer
    visible_rows: usize,
    /// Clickable areas from the last frame
    hit_areas: Vec<(Rect, HitTarget)>,
    status: Option<Status>,
}

impl App {
    /// App saving downloads into the configured export directory
    pub fn new(model: RubricModel, config: Config, instance_id: impl Into<String>) -> Self {
        let saver = DirectorySaver::new(config.export.directory.clone());
        Self::with_saver(model, config, instance_id, saver)
    }

    pub fn with_saver(
        model: RubricModel,
        config: Config,
        instance_id: impl Into<String>,
        saver: impl FileSaver + 'static,
    ) -> Self {
        let labels = Labels::layered([&config.l10n, &model.definition().l10n]);
        let pipeline = ExportPipeline::new(
            labels.clone(),
            CsvWriterSerializer::new(config.export.crlf),
            saver,
        );
        let theme = config.resolve_theme();

        Self {
            model,
            selection: SelectionState::new(),
            labels,
            config,
            theme,
            pipeline,
            instance_id: instance_id.into(),
            mode: AppMode::Browse,
            cursor: Cursor::default(),
            visible_rows: 1,
            hit_areas: Vec::new(),
            status: None,
        }
    }

    pub fn model(&self) -> &RubricModel {
        &self.model
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, AppMode::EditingEvidence { .. })
    }

    /// Grid present with at least one row and one column
    pub fn is_interactive(&self) -> bool {
        self.model.has_grid() && !self.layout().is_empty()
    }

    /// Downloads are only offered when there is a grid
    pub fn can_download(&self) -> bool {
        self.model.has_grid()
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout::new(
            self.model.grid_rows().len(),
            self.model.grid_columns().len(),
            self.visible_rows,
        )
    }

    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows.max(1);
    }

    /// Row and column under the cursor
    pub fn cursor_target(&self) -> Option<(&Row, &Column)> {
        let row = self.model.grid_rows().get(self.cursor.row)?;
        let column = self.model.grid_columns().get(self.cursor.column)?;
        Some((row, column))
    }

    fn navigate(&mut self, step: fn(&GridLayout, Cursor) -> Cursor) {
        if self.is_interactive() {
            let layout = self.layout();
            self.cursor = step(&layout, self.cursor);
        }
    }

    pub fn move_up(&mut self) {
        self.navigate(GridLayout::move_up);
    }

    pub fn move_down(&mut self) {
        self.navigate(GridLayout::move_down);
    }

    pub fn move_left(&mut self) {
        self.navigate(GridLayout::move_left);
    }

    pub fn move_right(&mut self) {
        self.navigate(GridLayout::move_right);
    }

    pub fn move_home(&mut self) {
        self.navigate(GridLayout::move_home);
    }

    pub fn move_end(&mut self) {
        self.navigate(GridLayout::move_end);
    }

    pub fn page_up(&mut self) {
        self.navigate(GridLayout::page_up);
    }

    pub fn page_down(&mut self) {
        self.navigate(GridLayout::page_down);
    }

    pub fn tab_next(&mut self) {
        self.navigate(GridLayout::tab_next);
    }

    pub fn tab_prev(&mut self) {
        self.navigate(GridLayout::tab_prev);
    }

    /// Select the level under the cursor
    pub fn activate(&mut self) {
        self.select_at(self.cursor);
    }

    /// Move the cursor to `cursor` and select that level
    pub fn select_at(&mut self, cursor: Cursor) {
        if !self.is_interactive() {
            return;
        }
        self.cursor = self.layout().clamp(cursor);

        let Some((row, column)) = self.cursor_target() else {
            return;
        };
        let (row_id, column_id) = (row.row_id.clone(), column.column_id.clone());
        self.selection.select(row_id, column_id);
    }

    /// Start typing evidence for the cursor row
    pub fn start_evidence(&mut self) {
        self.start_evidence_at(self.cursor.row);
    }

    pub fn start_evidence_at(&mut self, row: usize) {
        if row < self.model.grid_rows().len() {
            self.cursor.row = row;
            self.mode = AppMode::EditingEvidence { row };
        }
    }

    /// Evidence text of the row at a display index
    pub fn evidence_at(&self, row: usize) -> &str {
        match self.model.grid_rows().get(row) {
            Some(r) => self.selection.evidence(&r.row_id),
            None => "",
        }
    }

    fn edit_evidence(&mut self, edit: impl FnOnce(&mut String)) {
        let AppMode::EditingEvidence { row } = self.mode else {
            return;
        };
        let Some(row_id) = self.model.grid_rows().get(row).map(|r| r.row_id.clone()) else {
            return;
        };

        let mut text = self.selection.evidence(&row_id).to_string();
        edit(&mut text);
        self.selection.set_evidence(row_id, text);
    }

    pub fn push_evidence_char(&mut self, c: char) {
        self.edit_evidence(|text| text.push(c));
    }

    pub fn pop_evidence_char(&mut self) {
        self.edit_evidence(|text| {
            text.pop();
        });
    }

    pub fn clear_evidence(&mut self) {
        self.edit_evidence(String::clear);
    }

    pub fn finish_evidence(&mut self) {
        self.mode = AppMode::Browse;
    }

    /// Export the current responses. No-op without a grid.
    pub fn download(&mut self) -> Option<&Status> {
        if !self.can_download() {
            return None;
        }

        let status = match self
            .pipeline
            .download(&self.model, &self.selection, &self.instance_id)
        {
            Ok(Saved { location, .. }) => Status::Saved(location),
            Err(e) => {
                tracing::warn!("Download failed: {}", e);
                Status::Failed(e.to_string())
            }
        };
        self.status = Some(status);
        self.status.as_ref()
    }

    /// Forget last frame's clickable areas
    pub fn clear_hit_areas(&mut self) {
        self.hit_areas.clear();
    }

    pub fn register_hit_area(&mut self, area: Rect, target: HitTarget) {
        self.hit_areas.push((area, target));
    }

    /// Handle a left click at terminal coordinates
    pub fn click(&mut self, x: u16, y: u16) {
        let target = self
            .hit_areas
            .iter()
            .find(|(area, _)| {
                x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
            })
            .map(|(_, target)| *target);

        let Some(target) = target else {
            return;
        };

        if self.is_editing() {
            self.finish_evidence();
        }

        match target {
            HitTarget::Cell(cursor) => self.select_at(cursor),
            HitTarget::Evidence(row) => self.start_evidence_at(row),
            HitTarget::Download => {
                self.download();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportError;
    use crate::rubric::ItemId;
    use std::cell::RefCell;
    use std::rc::Rc;

    const SAMPLE: &str = r#"{
        "title": "Essay",
        "l10n": {"downloadResponses": "Export"},
        "grid": {
            "rows": [
                {"rowId": 10, "rowText": "Clarity", "cells": [
                    {"columnId": 1, "text": "Clear"}, {"columnId": 2, "text": "Vague"}
                ]},
                {"rowId": 20, "rowText": "Sources", "cells": [
                    {"columnId": 1, "text": "Cited"}, {"columnId": 2, "text": "Missing"}
                ]}
            ],
            "columns": [
                {"columnId": 1, "columnText": "Good"},
                {"columnId": 2, "columnText": "Poor"}
            ]
        }
    }"#;

    #[derive(Clone, Default)]
    struct MemorySaver {
        files: Rc<RefCell<Vec<(String, Vec<u8>)>>>,
    }

    impl FileSaver for MemorySaver {
        fn save(&self, file_name: &str, bytes: &[u8]) -> Result<Saved, ExportError> {
            self.files
                .borrow_mut()
                .push((file_name.to_string(), bytes.to_vec()));
            Ok(Saved {
                location: format!("mem://{}", file_name),
                bytes: bytes.len(),
            })
        }
    }

    fn app() -> (App, MemorySaver) {
        let saver = MemorySaver::default();
        let model = RubricModel::from_json(SAMPLE).unwrap();
        let app = App::with_saver(model, Config::default(), "essay", saver.clone());
        (app, saver)
    }

    #[test]
    fn test_content_labels_override_config() {
        let mut config = Config::default();
        config
            .l10n
            .insert("downloadResponses".to_string(), "Save".to_string());
        config
            .l10n
            .insert("clickToSelect".to_string(), "Pick".to_string());

        let model = RubricModel::from_json(SAMPLE).unwrap();
        let app = App::with_saver(model, config, "x", MemorySaver::default());
        assert_eq!(app.labels().download_responses, "Export");
        assert_eq!(app.labels().click_to_select, "Pick");
    }

    #[test]
    fn test_activate_selects_one_per_row() {
        let (mut app, _) = app();
        app.activate();
        app.move_right();
        app.activate();

        assert_eq!(app.selection().selection(10i64), Some(&ItemId::from(2i64)));
        assert_eq!(app.selection().selected_count(), 1);

        app.move_down();
        app.move_left();
        app.activate();
        assert!(app.selection().is_selected(20i64, 1i64));
        assert_eq!(app.selection().selected_count(), 2);
    }

    #[test]
    fn test_evidence_editing() {
        let (mut app, _) = app();
        app.move_down();
        app.start_evidence();
        assert_eq!(app.mode(), AppMode::EditingEvidence { row: 1 });

        for c in "p.4x".chars() {
            app.push_evidence_char(c);
        }
        app.pop_evidence_char();
        app.finish_evidence();

        assert!(!app.is_editing());
        assert_eq!(app.selection().evidence(20i64), "p.4");
        assert_eq!(app.evidence_at(0), "");

        // Typing outside edit mode does nothing
        app.push_evidence_char('!');
        assert_eq!(app.selection().evidence(20i64), "p.4");
    }

    #[test]
    fn test_click_hit_areas() {
        let (mut app, _) = app();
        app.register_hit_area(Rect::new(10, 5, 8, 3), HitTarget::Cell(Cursor::new(1, 1)));
        app.register_hit_area(Rect::new(0, 5, 10, 3), HitTarget::Evidence(1));

        app.click(12, 6);
        assert_eq!(app.cursor(), Cursor::new(1, 1));
        assert!(app.selection().is_selected(20i64, 2i64));

        app.click(3, 7);
        assert_eq!(app.mode(), AppMode::EditingEvidence { row: 1 });

        // Misses are ignored
        app.click(50, 50);
        assert_eq!(app.mode(), AppMode::EditingEvidence { row: 1 });
    }

    #[test]
    fn test_download_uses_instance_id() {
        let (mut app, saver) = app();
        app.activate();

        let status = app.download().cloned();
        assert_eq!(
            status,
            Some(Status::Saved("mem://rubric-essay-responses.csv".to_string()))
        );

        let files = saver.files.borrow();
        let text = String::from_utf8(files[0].1.clone()).unwrap();
        assert!(text.contains("Clarity,Good,Clear,"));
        assert!(text.contains("Sources,,,"));
    }

    #[test]
    fn test_download_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let model = RubricModel::from_json(SAMPLE).unwrap();
        let mut app = App::with_saver(model, Config::default(), "1", DirectorySaver::new(&blocker));
        assert!(matches!(app.download(), Some(Status::Failed(_))));
    }

    #[test]
    fn test_description_only_mode() {
        let saver = MemorySaver::default();
        let model = RubricModel::from_json(r#"{"title": "Read me", "description": "<p>x</p>"}"#)
            .unwrap();
        let mut app = App::with_saver(model, Config::default(), "1", saver.clone());

        assert!(!app.is_interactive());
        assert!(!app.can_download());
        app.move_down();
        app.activate();
        app.start_evidence();
        assert_eq!(app.cursor(), Cursor::default());
        assert_eq!(app.selection().selected_count(), 0);
        assert!(!app.is_editing());
        assert!(app.download().is_none());
        assert!(saver.files.borrow().is_empty());
    }
}
