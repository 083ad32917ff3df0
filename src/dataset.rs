use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

use chrono::Local;
use serde_json::{Map, Value};

use crate::models::DatasetSummary;

/// Rows included in the upload preview.
pub const PREVIEW_ROWS: usize = 10;

/// A single parsed cell. Cells are typed individually at parse time; the
/// column type is derived from them afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Text => "text",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Narrowest type covering every non-missing cell. Mixed content
    /// degrades to text; an all-missing column is text as well.
    pub fn column_type(&self) -> ColumnType {
        let mut saw_int = false;
        let mut saw_float = false;
        let mut saw_bool = false;
        let mut saw_any = false;
        for value in &self.values {
            match value {
                CellValue::Missing => continue,
                CellValue::Int(_) => saw_int = true,
                CellValue::Float(_) => saw_float = true,
                CellValue::Bool(_) => saw_bool = true,
                CellValue::Text(_) => return ColumnType::Text,
            }
            saw_any = true;
        }
        if !saw_any {
            return ColumnType::Text;
        }
        if saw_bool {
            if saw_int || saw_float {
                return ColumnType::Text;
            }
            return ColumnType::Boolean;
        }
        if saw_float {
            ColumnType::Float
        } else {
            ColumnType::Integer
        }
    }

    pub fn missing(&self) -> u64 {
        self.values
            .iter()
            .filter(|v| matches!(v, CellValue::Missing))
            .count() as u64
    }
}

/// Column-oriented table parsed from an upload. All columns hold the same
/// number of values.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn summary(&self) -> DatasetSummary {
        self.summary_at(Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
    }

    /// Summary with a caller-provided timestamp, split out so tests can pin
    /// the upload time.
    pub fn summary_at(&self, uploaded_at: String) -> DatasetSummary {
        let mut missing_values = BTreeMap::new();
        let mut data_types = BTreeMap::new();
        for column in &self.columns {
            missing_values.insert(column.name.clone(), column.missing());
            data_types.insert(column.name.clone(), column.column_type().as_str().to_string());
        }
        let preview = (0..self.rows().min(PREVIEW_ROWS))
            .map(|row| {
                let mut record = Map::new();
                for column in &self.columns {
                    record.insert(column.name.clone(), cell_to_json(&column.values[row]));
                }
                record
            })
            .collect();
        DatasetSummary {
            columns: self.columns.iter().map(|c| c.name.clone()).collect(),
            shape: [self.rows(), self.width()],
            missing_values,
            data_types,
            preview,
            uploaded_at,
        }
    }
}

fn cell_to_json(cell: &CellValue) -> Value {
    match cell {
        CellValue::Missing => Value::Null,
        CellValue::Int(v) => Value::from(*v),
        CellValue::Float(v) => serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number),
        CellValue::Bool(v) => Value::Bool(*v),
        CellValue::Text(v) => Value::String(v.clone()),
    }
}

/// Numeric columns only, with every row that has a missing numeric cell
/// dropped. The analysis engine works on this view.
#[derive(Debug, Clone, Default)]
pub struct NumericFrame {
    pub names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl NumericFrame {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let numeric: Vec<&Column> = dataset
            .columns
            .iter()
            .filter(|c| c.column_type().is_numeric())
            .collect();
        if numeric.is_empty() {
            return Self::default();
        }
        let mut rows = Vec::new();
        'rows: for row in 0..dataset.rows() {
            let mut values = Vec::with_capacity(numeric.len());
            for column in &numeric {
                match column.values[row] {
                    CellValue::Int(v) => values.push(v as f64),
                    CellValue::Float(v) => values.push(v),
                    _ => continue 'rows,
                }
            }
            rows.push(values);
        }
        Self {
            names: numeric.iter().map(|c| c.name.clone()).collect(),
            rows,
        }
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() || self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.names.len()
    }

    pub fn column(&self, idx: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[idx]).collect()
    }

    pub fn column_means(&self) -> Vec<f64> {
        let len = self.rows.len() as f64;
        (0..self.width())
            .map(|idx| self.rows.iter().map(|r| r[idx]).sum::<f64>() / len)
            .collect()
    }
}

#[derive(Debug)]
pub enum DatasetError {
    UnsupportedFormat,
    Parse(String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat => f.write_str("Unsupported file format"),
            Self::Parse(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for DatasetError {}

/// Dispatch on the uploaded file name. Only csv and json payloads are
/// understood.
pub fn parse_upload(filename: &str, bytes: &[u8]) -> Result<Dataset, DatasetError> {
    if filename.ends_with(".csv") {
        parse_csv(bytes)
    } else if filename.ends_with(".json") {
        parse_json(bytes)
    } else {
        Err(DatasetError::UnsupportedFormat)
    }
}

fn parse_csv(bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|err| DatasetError::Parse(err.to_string()))?
        .clone();
    if headers.is_empty() {
        return Err(DatasetError::Parse("no columns to parse".into()));
    }
    let mut columns: Vec<Column> = headers
        .iter()
        .map(|name| Column {
            name: name.to_string(),
            values: Vec::new(),
        })
        .collect();
    for record in reader.records() {
        let record = record.map_err(|err| DatasetError::Parse(err.to_string()))?;
        for (idx, column) in columns.iter_mut().enumerate() {
            let cell = record.get(idx).map_or(CellValue::Missing, infer_cell);
            column.values.push(cell);
        }
    }
    Ok(Dataset { columns })
}

/// Type a raw csv field. Blank and non-finite numeric tokens count as
/// missing; anything unrecognized keeps its raw text.
fn infer_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Missing;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return CellValue::Int(v);
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        if v.is_finite() {
            return CellValue::Float(v);
        }
        return CellValue::Missing;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }
    CellValue::Text(raw.to_string())
}

fn parse_json(bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|err| DatasetError::Parse(err.to_string()))?;
    let Value::Array(records) = value else {
        return Err(DatasetError::Parse(
            "expected a top-level json array of records".into(),
        ));
    };
    let mut columns: Vec<Column> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (row, record) in records.iter().enumerate() {
        let Value::Object(fields) = record else {
            return Err(DatasetError::Parse(format!(
                "record {row} is not a json object"
            )));
        };
        for (key, value) in fields {
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                // Column first seen mid-file: backfill earlier rows.
                columns.push(Column {
                    name: key.clone(),
                    values: vec![CellValue::Missing; row],
                });
                columns.len() - 1
            });
            columns[slot].values.push(cell_from_json(value));
        }
        for column in &mut columns {
            if column.values.len() <= row {
                column.values.push(CellValue::Missing);
            }
        }
    }
    Ok(Dataset { columns })
}

fn cell_from_json(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Missing,
        Value::Bool(v) => CellValue::Bool(*v),
        Value::Number(num) => {
            if let Some(v) = num.as_i64() {
                CellValue::Int(v)
            } else if let Some(v) = num.as_f64() {
                CellValue::Float(v)
            } else {
                CellValue::Text(num.to_string())
            }
        }
        Value::String(v) => CellValue::Text(v.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> Dataset {
        parse_upload("data.csv", csv.as_bytes()).unwrap()
    }

    #[test]
    fn csv_types_are_inferred_per_column() {
        let data = parse("id,score,name,active\n1,3.5,alice,true\n2,4.0,bob,false\n");
        let summary = data.summary_at("2026-01-01 00:00:00".into());
        assert_eq!(summary.shape, [2, 4]);
        assert_eq!(summary.data_types["id"], "integer");
        assert_eq!(summary.data_types["score"], "float");
        assert_eq!(summary.data_types["name"], "text");
        assert_eq!(summary.data_types["active"], "boolean");
    }

    #[test]
    fn missing_cells_are_counted_and_previewed_as_null() {
        let data = parse("a,b\n1,\n,2\n");
        let summary = data.summary_at("2026-01-01 00:00:00".into());
        assert_eq!(summary.missing_values["a"], 1);
        assert_eq!(summary.missing_values["b"], 1);
        assert!(summary.preview[0]["b"].is_null());
        assert_eq!(summary.preview[1]["b"], serde_json::json!(2));
    }

    #[test]
    fn preview_is_capped() {
        let mut csv = String::from("n\n");
        for i in 0..25 {
            csv.push_str(&format!("{i}\n"));
        }
        let summary = parse(&csv).summary_at("2026-01-01 00:00:00".into());
        assert_eq!(summary.shape[0], 25);
        assert_eq!(summary.preview.len(), PREVIEW_ROWS);
    }

    #[test]
    fn mixed_column_degrades_to_text() {
        let data = parse("v\n1\noops\n");
        assert_eq!(data.columns[0].column_type(), ColumnType::Text);
    }

    #[test]
    fn nan_token_counts_as_missing() {
        let data = parse("v\nNaN\n2\n");
        assert_eq!(data.columns[0].missing(), 1);
        assert_eq!(data.columns[0].column_type(), ColumnType::Integer);
    }

    #[test]
    fn short_csv_records_pad_with_missing() {
        let data = parse("a,b,c\n1,2\n4,5,6\n");
        assert_eq!(data.columns[2].missing(), 1);
        assert_eq!(data.rows(), 2);
    }

    #[test]
    fn numeric_frame_drops_rows_with_missing_numerics() {
        let data = parse("x,y,label\n1,2,a\n3,,b\n5,6,c\n");
        let frame = NumericFrame::from_dataset(&data);
        assert_eq!(frame.names, vec!["x", "y"]);
        assert_eq!(frame.rows, vec![vec![1.0, 2.0], vec![5.0, 6.0]]);
    }

    #[test]
    fn numeric_frame_without_numeric_columns_is_empty() {
        let data = parse("name\nalice\nbob\n");
        let frame = NumericFrame::from_dataset(&data);
        assert!(frame.is_empty());
        assert_eq!(frame.width(), 0);
    }

    #[test]
    fn json_records_fill_absent_keys_with_missing() {
        let data = parse_upload(
            "data.json",
            br#"[{"a": 1, "b": "x"}, {"a": 2, "c": true}]"#,
        )
        .unwrap();
        let summary = data.summary_at("2026-01-01 00:00:00".into());
        assert_eq!(summary.shape, [2, 3]);
        assert_eq!(summary.missing_values["b"], 1);
        assert_eq!(summary.missing_values["c"], 1);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = parse_upload("data.parquet", b"whatever").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file format");
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(parse_upload("data.json", br#"{"a": 1}"#).is_err());
        assert!(parse_upload("data.json", b"[1, 2]").is_err());
    }
}
