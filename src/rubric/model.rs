use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use super::id::ItemId;

/// Rubric content as authored: title, description and the optional grid
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RubricDefinition {
    #[serde(deserialize_with = "lenient_text")]
    pub title: String,
    /// HTML-formatted, may be empty
    #[serde(deserialize_with = "lenient_text")]
    pub description: String,
    /// Label overrides shipped with the content
    #[serde(deserialize_with = "lenient_labels")]
    pub l10n: HashMap<String, String>,
    /// Absent means description-only mode
    #[serde(deserialize_with = "lenient_grid")]
    pub grid: Option<Grid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Grid {
    #[serde(deserialize_with = "lenient_seq")]
    pub rows: Vec<Row>,
    #[serde(deserialize_with = "lenient_seq")]
    pub columns: Vec<Column>,
}

/// One scoring criterion
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Row {
    pub row_id: ItemId,
    #[serde(deserialize_with = "lenient_text")]
    pub row_text: String,
    /// Per-column guideline text; older content calls this `columns`
    #[serde(alias = "columns", deserialize_with = "lenient_seq")]
    pub cells: Vec<Cell>,
}

/// One achievement level
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Column {
    pub column_id: ItemId,
    #[serde(deserialize_with = "lenient_text")]
    pub column_text: String,
}

/// Guideline text at a row/column intersection
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cell {
    pub column_id: ItemId,
    #[serde(deserialize_with = "lenient_text")]
    pub text: String,
}

/// Items that expose identifier fields by their content name
pub trait Keyed {
    fn key(&self, name: &str) -> Option<&ItemId>;
}

impl Keyed for Row {
    fn key(&self, name: &str) -> Option<&ItemId> {
        match name {
            "rowId" => Some(&self.row_id),
            _ => None,
        }
    }
}

impl Keyed for Column {
    fn key(&self, name: &str) -> Option<&ItemId> {
        match name {
            "columnId" => Some(&self.column_id),
            _ => None,
        }
    }
}

impl Keyed for Cell {
    fn key(&self, name: &str) -> Option<&ItemId> {
        match name {
            "columnId" => Some(&self.column_id),
            _ => None,
        }
    }
}

/// First item whose `key` field equals `value` after id normalization
pub fn find_by_key<'a, T: Keyed>(
    items: &'a [T],
    key: &str,
    value: impl Into<ItemId>,
) -> Option<&'a T> {
    let value = value.into();
    items.iter().find(|item| item.key(key) == Some(&value))
}

/// Read-only lookups over a rubric definition.
///
/// Every accessor degrades to an empty result when the grid, row, column
/// or cell is missing; nothing here fails.
#[derive(Debug, Clone, Default)]
pub struct RubricModel {
    definition: RubricDefinition,
}

impl RubricModel {
    pub fn new(definition: RubricDefinition) -> Self {
        Self { definition }
    }

    /// Parse a definition from content JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let definition: RubricDefinition =
            serde_json::from_str(json).context("Failed to parse rubric definition")?;
        Ok(Self::new(definition))
    }

    /// Load a definition file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rubric from {}", path.display()))?;
        let model = Self::from_json(&content)
            .with_context(|| format!("Invalid rubric in {}", path.display()))?;

        tracing::info!(
            "Loaded rubric {:?}: {} rows, {} columns",
            model.title(),
            model.grid_rows().len(),
            model.grid_columns().len()
        );
        Ok(model)
    }

    pub fn definition(&self) -> &RubricDefinition {
        &self.definition
    }

    pub fn title(&self) -> &str {
        &self.definition.title
    }

    pub fn description(&self) -> &str {
        &self.definition.description
    }

    /// Description is set and not just whitespace
    pub fn has_description(&self) -> bool {
        !self.definition.description.trim().is_empty()
    }

    pub fn has_grid(&self) -> bool {
        self.definition.grid.is_some()
    }

    pub fn grid_rows(&self) -> &[Row] {
        self.definition
            .grid
            .as_ref()
            .map(|g| g.rows.as_slice())
            .unwrap_or(&[])
    }

    pub fn grid_columns(&self) -> &[Column] {
        self.definition
            .grid
            .as_ref()
            .map(|g| g.columns.as_slice())
            .unwrap_or(&[])
    }

    pub fn find_row(&self, row_id: impl Into<ItemId>) -> Option<&Row> {
        find_by_key(self.grid_rows(), "rowId", row_id)
    }

    pub fn find_column(&self, column_id: impl Into<ItemId>) -> Option<&Column> {
        find_by_key(self.grid_columns(), "columnId", column_id)
    }

    /// Cell text of `row` for the given column, or ""
    pub fn row_column_text<'a>(&self, row: &'a Row, column_id: impl Into<ItemId>) -> &'a str {
        find_by_key(&row.cells, "columnId", column_id)
            .map(|cell| cell.text.as_str())
            .unwrap_or("")
    }

    pub fn column_text(&self, column_id: impl Into<ItemId>) -> &str {
        self.find_column(column_id)
            .map(|column| column.column_text.as_str())
            .unwrap_or("")
    }

    pub fn row_text(&self, row_id: impl Into<ItemId>) -> &str {
        self.find_row(row_id)
            .map(|row| row.row_text.as_str())
            .unwrap_or("")
    }

    /// Cell text looked up by row id, then column id within that row
    pub fn selected_cell_text(
        &self,
        row_id: impl Into<ItemId>,
        column_id: impl Into<ItemId>,
    ) -> &str {
        match self.find_row(row_id) {
            Some(row) => self.row_column_text(row, column_id),
            None => "",
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Keeps every element that parses, drops the rest; non-arrays are empty
fn lenient_seq<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::warn!("Expected a list in rubric grid, got {}", type_name(&other));
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Skipping malformed rubric grid item: {}", e);
                None
            }
        })
        .collect())
}

fn lenient_grid<'de, D>(deserializer: D) -> std::result::Result<Option<Grid>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(Some(serde_json::from_value(value).unwrap_or_default())),
        Value::Null => Ok(None),
        other => {
            tracing::warn!("Ignoring rubric grid of type {}", type_name(&other));
            Ok(None)
        }
    }
}

fn lenient_labels<'de, D>(deserializer: D) -> std::result::Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(HashMap::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            _ => None,
        })
        .collect())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
