//! Whitespace-delimited numeric log loading.
//!
//! A log is parsed against an ordered [`FieldSchema`]. Lines starting with `#`
//! (the column header the harness prints) and blank lines are skipped. Every
//! other line must carry exactly one value per schema field, otherwise the
//! whole file is rejected. A file with a single row still yields a `Vec`.

use std::path::Path;

use tracing::debug;

use crate::error::{ChartError, Result};
use crate::schema::{BatchBlocking, EdgeRecord, LogRecord};

/// Numeric type of one log column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericType {
    Int,
    Float,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: NumericType,
}

impl FieldSpec {
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: NumericType::Int,
        }
    }

    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: NumericType::Float,
        }
    }
}

/// Ordered list of columns in a log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Columns of `kvs_benchmark_with_*.log`.
    pub fn kvs_benchmark() -> Self {
        Self::new(vec![
            FieldSpec::int("num_elements"),
            FieldSpec::int("num_iterations"),
            FieldSpec::float("zipf_skewness"),
            FieldSpec::float("update_ratio"),
            FieldSpec::int("purely_local_capacity"),
            FieldSpec::int("buffer_page_count"),
            FieldSpec::int("batch_blocking"),
            FieldSpec::int("construction_duration_ns"),
            FieldSpec::int("query_duration_ns"),
            FieldSpec::int("query_read_count"),
            FieldSpec::int("query_write_count"),
        ])
    }

    /// Columns of `analyze_edges_of_*.log`.
    pub fn edge_composition() -> Self {
        Self::new(vec![
            FieldSpec::int("num_elements"),
            FieldSpec::int("purely_local_capacity"),
            FieldSpec::int("batch_blocking"),
            FieldSpec::int("construction_duration_ns"),
            FieldSpec::int("purely_local_edges"),
            FieldSpec::int("in_page_edges"),
            FieldSpec::int("cross_page_edges"),
        ])
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
}

/// One parsed line, values in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based line number in the source file.
    pub line: usize,
    pub values: Vec<FieldValue>,
}

impl Row {
    pub fn int(&self, index: usize) -> std::result::Result<i64, String> {
        match self.values.get(index) {
            Some(FieldValue::Int(v)) => Ok(*v),
            Some(FieldValue::Float(_)) => Err(format!("field {} is not an integer", index)),
            None => Err(format!("field {} is missing", index)),
        }
    }

    /// Integer columns widen to `f64`.
    pub fn float(&self, index: usize) -> std::result::Result<f64, String> {
        match self.values.get(index) {
            Some(FieldValue::Float(v)) => Ok(*v),
            Some(FieldValue::Int(v)) => Ok(*v as f64),
            None => Err(format!("field {} is missing", index)),
        }
    }

    fn batch_blocking(&self, index: usize) -> std::result::Result<BatchBlocking, String> {
        let code = self.int(index)?;
        BatchBlocking::from_code(code).ok_or_else(|| format!("unknown batch_blocking code {}", code))
    }
}

/// A typed record that can be built from a row of its schema.
pub trait LogSchema: Sized {
    fn schema() -> FieldSchema;
    fn from_row(row: &Row) -> std::result::Result<Self, String>;
}

impl LogSchema for LogRecord {
    fn schema() -> FieldSchema {
        FieldSchema::kvs_benchmark()
    }

    fn from_row(row: &Row) -> std::result::Result<Self, String> {
        Ok(LogRecord {
            num_elements: row.int(0)?,
            num_iterations: row.int(1)?,
            zipf_skewness: row.float(2)?,
            update_ratio: row.float(3)?,
            purely_local_capacity: row.int(4)?,
            buffer_page_count: row.int(5)?,
            batch_blocking: row.batch_blocking(6)?,
            construction_duration_ns: row.int(7)?,
            query_duration_ns: row.int(8)?,
            query_read_count: row.int(9)?,
            query_write_count: row.int(10)?,
        })
    }
}

impl LogSchema for EdgeRecord {
    fn schema() -> FieldSchema {
        FieldSchema::edge_composition()
    }

    fn from_row(row: &Row) -> std::result::Result<Self, String> {
        Ok(EdgeRecord {
            num_elements: row.int(0)?,
            purely_local_capacity: row.int(1)?,
            batch_blocking: row.batch_blocking(2)?,
            construction_duration_ns: row.int(3)?,
            purely_local_edges: row.int(4)?,
            in_page_edges: row.int(5)?,
            cross_page_edges: row.int(6)?,
        })
    }
}

/// Parse log text against `schema`. `origin` only labels errors.
pub fn parse_rows(text: &str, origin: &Path, schema: &FieldSchema) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != schema.len() {
            return Err(ChartError::parse(
                origin,
                line_no,
                format!("expected {} fields, found {}", schema.len(), tokens.len()),
            ));
        }

        let mut values = Vec::with_capacity(tokens.len());
        for (token, field) in tokens.iter().zip(schema.fields()) {
            let value = match field.kind {
                NumericType::Int => token.parse::<i64>().map(FieldValue::Int).ok(),
                NumericType::Float => token.parse::<f64>().map(FieldValue::Float).ok(),
            };
            match value {
                Some(v) => values.push(v),
                None => {
                    return Err(ChartError::parse(
                        origin,
                        line_no,
                        format!("invalid {:?} value '{}' for field {}", field.kind, token, field.name),
                    ))
                }
            }
        }
        rows.push(Row {
            line: line_no,
            values,
        });
    }
    Ok(rows)
}

/// Read and parse a whole log file.
pub fn load_rows(path: &Path, schema: &FieldSchema) -> Result<Vec<Row>> {
    // A missing log is as fatal as a malformed one.
    let text = std::fs::read_to_string(path)
        .map_err(|e| ChartError::parse(path, 0, format!("cannot read log: {}", e)))?;
    parse_rows(&text, path, schema)
}

/// Parse log text into typed records.
pub fn parse_log<T: LogSchema>(text: &str, origin: &Path) -> Result<Vec<T>> {
    parse_rows(text, origin, &T::schema())?
        .iter()
        .map(|row| T::from_row(row).map_err(|reason| ChartError::parse(origin, row.line, reason)))
        .collect()
}

/// Load a log file into typed records.
pub fn load_log<T: LogSchema>(path: &Path) -> Result<Vec<T>> {
    let rows = load_rows(path, &T::schema())?;
    let records = rows
        .iter()
        .map(|row| T::from_row(row).map_err(|reason| ChartError::parse(path, row.line, reason)))
        .collect::<Result<Vec<T>>>()?;
    debug!(path = %path.display(), rows = records.len(), "loaded log");
    Ok(records)
}

pub fn load_kvs_log(path: &Path) -> Result<Vec<LogRecord>> {
    load_log(path)
}

pub fn load_edge_log(path: &Path) -> Result<Vec<EdgeRecord>> {
    load_log(path)
}
