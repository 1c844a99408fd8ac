//! Tests for the export pipeline

use super::*;
use crate::rubric::ItemId;
use std::cell::RefCell;
use std::rc::Rc;

const CLARITY: &str = r#"{
    "title": "T",
    "grid": {
        "rows": [{"rowId": 1, "rowText": "Clarity", "cells": [{"columnId": 1, "text": "Clear"}]}],
        "columns": [{"columnId": 1, "columnText": "Good"}]
    }
}"#;

const ESCAPED: &str = r#"{
    "title": "Essay",
    "grid": {
        "rows": [
            {"rowId": 1, "rowText": "Tone &amp; style", "cells": [
                {"columnId": "a", "text": "Uses &quot;voice&quot;, well"},
                {"columnId": "b", "text": "Flat"}
            ]},
            {"rowId": 2, "rowText": "Sources", "cells": []},
            {"rowId": 3, "rowText": "Structure", "cells": [{"columnId": "b", "text": "Loose"}]}
        ],
        "columns": [
            {"columnId": "a", "columnText": "Strong &lt;A&gt;"},
            {"columnId": "b", "columnText": "Weak"}
        ]
    }
}"#;

/// Saver that remembers what it was given
#[derive(Clone, Default)]
struct RecordingSaver {
    saved: Rc<RefCell<Vec<(String, Vec<u8>)>>>,
}

impl FileSaver for RecordingSaver {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<Saved, ExportError> {
        self.saved
            .borrow_mut()
            .push((file_name.to_string(), bytes.to_vec()));
        Ok(Saved {
            location: file_name.to_string(),
            bytes: bytes.len(),
        })
    }
}

/// Saver that is never available
struct FailingSaver;

impl FileSaver for FailingSaver {
    fn save(&self, file_name: &str, _bytes: &[u8]) -> Result<Saved, ExportError> {
        Err(ExportError::Delivery {
            target: file_name.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

fn pipeline() -> ExportPipeline {
    ExportPipeline::new(
        Labels::default(),
        CsvWriterSerializer::default(),
        RecordingSaver::default(),
    )
}

fn parse_csv(bytes: &[u8]) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(bytes)
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_end_to_end_single_row() {
    let model = RubricModel::from_json(CLARITY).unwrap();
    let mut state = SelectionState::new();
    state.select(1i64, 1i64);
    state.set_evidence(1i64, "see p.3");

    let bytes = pipeline().export_csv(&model, &state).unwrap();
    let records = parse_csv(&bytes);

    assert_eq!(
        records,
        vec![
            vec![
                "Performance indicator",
                "Level of achievement",
                "Scoring guidelines",
                "Evidence"
            ],
            vec!["Clarity", "Good", "Clear", "see p.3"],
        ]
    );
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "Performance indicator,Level of achievement,Scoring guidelines,Evidence\r\n\
         Clarity,Good,Clear,see p.3\r\n"
    );
}

#[test]
fn test_one_record_per_row_in_order() {
    let model = RubricModel::from_json(ESCAPED).unwrap();
    let state = SelectionState::new();

    let table = pipeline().table(&model, &state);
    assert_eq!(table.len(), 4);

    let indicators: Vec<_> = table.rows.iter().map(|r| r.indicator.as_str()).collect();
    assert_eq!(indicators, ["Tone & style", "Sources", "Structure"]);
}

#[test]
fn test_unselected_rows_keep_evidence() {
    let model = RubricModel::from_json(ESCAPED).unwrap();
    let mut state = SelectionState::new();
    state.set_evidence(2i64, "https://example.org/&amp;");

    let table = pipeline().table(&model, &state);
    let row = &table.rows[1];
    assert_eq!(row.level, "");
    assert_eq!(row.guidelines, "");
    // Evidence is raw input, not decoded
    assert_eq!(row.evidence, "https://example.org/&amp;");
}

#[test]
fn test_selected_text_is_unescaped() {
    let model = RubricModel::from_json(ESCAPED).unwrap();
    let mut state = SelectionState::new();
    state.select("1", "a");

    let row = &pipeline().table(&model, &state).rows[0];
    assert_eq!(row.level, "Strong <A>");
    assert_eq!(row.guidelines, "Uses \"voice\", well");
}

#[test]
fn test_selection_without_cell_exports_level_only() {
    let model = RubricModel::from_json(ESCAPED).unwrap();
    let mut state = SelectionState::new();
    state.select(3i64, "a");
    state.select(2i64, "zzz");

    let table = pipeline().table(&model, &state);
    assert_eq!(table.rows[2].level, "Strong <A>");
    assert_eq!(table.rows[2].guidelines, "");
    // Unknown column id degrades to empty strings
    assert_eq!(table.rows[1].level, "");
    assert_eq!(table.rows[1].guidelines, "");
}

#[test]
fn test_quoting() {
    let model = RubricModel::from_json(ESCAPED).unwrap();
    let mut state = SelectionState::new();
    state.select(1i64, "a");
    state.set_evidence(1i64, "line one\nline \"two\"");

    let bytes = pipeline().export_csv(&model, &state).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.contains("\"Uses \"\"voice\"\", well\""));
    assert!(text.contains("\"line one\nline \"\"two\"\"\""));

    // And it reads back to the same fields
    let records = parse_csv(&bytes);
    assert_eq!(records[1][2], "Uses \"voice\", well");
    assert_eq!(records[1][3], "line one\nline \"two\"");
}

#[test]
fn test_lf_terminator() {
    let model = RubricModel::from_json(CLARITY).unwrap();
    let pipeline = ExportPipeline::new(
        Labels::default(),
        CsvWriterSerializer::new(false),
        RecordingSaver::default(),
    );
    let text = String::from_utf8(
        pipeline
            .export_csv(&model, &SelectionState::new())
            .unwrap(),
    )
    .unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(!text.contains('\r'));
    assert!(text.ends_with("Clarity,,,\n"));
}

#[test]
fn test_localized_header() {
    let model = RubricModel::from_json(CLARITY).unwrap();
    let mut labels = Labels::default();
    labels.merge(
        &[("performanceIndicator".to_string(), "Kriterium".to_string())]
            .into_iter()
            .collect(),
    );
    let pipeline = ExportPipeline::new(
        labels,
        CsvWriterSerializer::default(),
        RecordingSaver::default(),
    );

    let table = pipeline.table(&model, &SelectionState::new());
    assert_eq!(table.header[0], "Kriterium");
    assert_eq!(table.header[3], "Evidence");
}

#[test]
fn test_download_names_file_by_instance() {
    let model = RubricModel::from_json(CLARITY).unwrap();
    let saver = RecordingSaver::default();
    let pipeline = ExportPipeline::new(
        Labels::default(),
        CsvWriterSerializer::default(),
        saver.clone(),
    );

    let mut state = SelectionState::new();
    state.select(ItemId::from(1i64), ItemId::from("1"));
    let saved = pipeline.download(&model, &state, "42").unwrap();

    assert_eq!(saved.location, "rubric-42-responses.csv");
    let calls = saver.saved.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "rubric-42-responses.csv");
    assert_eq!(parse_csv(&calls[0].1)[1], ["Clarity", "Good", "Clear", ""]);
}

#[test]
fn test_download_reports_delivery_failure() {
    let model = RubricModel::from_json(CLARITY).unwrap();
    let pipeline = ExportPipeline::new(
        Labels::default(),
        CsvWriterSerializer::default(),
        FailingSaver,
    );

    let err = pipeline
        .download(&model, &SelectionState::new(), "1")
        .unwrap_err();
    assert!(matches!(err, ExportError::Delivery { .. }));
}

#[test]
fn test_no_grid_exports_header_only() {
    let model = RubricModel::from_json(r#"{"title": "Text only"}"#).unwrap();
    let table = pipeline().table(&model, &SelectionState::new());
    assert_eq!(table.len(), 1);
    assert!(table.rows.is_empty());
}

#[test]
fn test_response_file_name() {
    assert_eq!(response_file_name("7"), "rubric-7-responses.csv");
    assert_eq!(response_file_name("essay draft"), "rubric-essay-draft-responses.csv");
    assert_eq!(response_file_name("../x"), "rubric-..-x-responses.csv");
}

#[test]
fn test_long_numeric_ids_stay_distinct() {
    let model = RubricModel::from_json(
        r#"{
            "title": "T",
            "grid": {
                "rows": [
                    {"rowId": "10000000000000000", "rowText": "A", "cells": [
                        {"columnId": 1, "text": "a1"}
                    ]},
                    {"rowId": "10000000000000001", "rowText": "B", "cells": [
                        {"columnId": 1, "text": "b1"}
                    ]}
                ],
                "columns": [{"columnId": 1, "columnText": "Good"}]
            }
        }"#,
    )
    .unwrap();

    let mut state = SelectionState::new();
    state.select("10000000000000001", 1i64);

    let table = pipeline().table(&model, &state);
    assert_eq!(table.rows[0].fields(), ["A", "", "", ""]);
    assert_eq!(table.rows[1].fields(), ["B", "Good", "b1", ""]);
}
