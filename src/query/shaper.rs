//! Turns engine output into the transport shape: ordered column names plus
//! one string-valued mapping per row.
//!
//! Every cell goes through Arrow's display formatter, so the conversion is
//! display-oriented and lossy. Nulls render as the empty string. Dates and
//! timestamps use ISO-8601, floats keep a fractional part (`15000.0`).
//! Repeated output names are made unique (`region`, `region_1`, ...) so
//! every row object carries exactly one key per column.

use std::collections::HashSet;

use datafusion::arrow::record_batch::RecordBatch;
use datafusion::arrow::util::display::{ArrayFormatter, FormatOptions};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{QueryError, QueryResult};

/// Rendering of SQL NULL in result rows.
pub const NULL_DISPLAY: &str = "";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One result row. Serializes as a JSON object whose keys follow the
/// column order of the owning [`ResultSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, column: String, value: String) {
        self.cells.push((column, value));
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Build a [`ResultSet`] from the planned output columns and the collected
/// batches. Batches are positionally aligned with `columns`.
pub fn shape(columns: Vec<String>, batches: &[RecordBatch]) -> QueryResult<ResultSet> {
    let columns = unique_column_names(columns);
    let options = FormatOptions::default().with_null(NULL_DISPLAY);
    let total_rows = batches.iter().map(|b| b.num_rows()).sum();
    let mut rows = Vec::with_capacity(total_rows);

    for batch in batches {
        if batch.num_columns() != columns.len() {
            return Err(QueryError::Execution(format!(
                "Result batch has {} columns, expected {}",
                batch.num_columns(),
                columns.len()
            )));
        }

        let formatters = batch
            .columns()
            .iter()
            .map(|array| ArrayFormatter::try_new(array.as_ref(), &options))
            .collect::<Result<Vec<_>, _>>()?;

        for idx in 0..batch.num_rows() {
            let mut row = Row::with_capacity(columns.len());
            for (name, formatter) in columns.iter().zip(&formatters) {
                row.push(name.clone(), formatter.value(idx).to_string());
            }
            rows.push(row);
        }
    }

    Ok(ResultSet { columns, rows })
}

/// Later occurrences of a name get the first free `_<n>` suffix. A suffix
/// never reuses a name that appears anywhere in the input.
fn unique_column_names(columns: Vec<String>) -> Vec<String> {
    let originals: HashSet<&str> = columns.iter().map(String::as_str).collect();
    let mut assigned: HashSet<String> = HashSet::with_capacity(columns.len());
    let mut unique = Vec::with_capacity(columns.len());

    for name in &columns {
        let mut candidate = name.clone();
        let mut suffix = 1;
        while assigned.contains(&candidate)
            || (candidate != *name && originals.contains(candidate.as_str()))
        {
            candidate = format!("{}_{}", name, suffix);
            suffix += 1;
        }
        assigned.insert(candidate.clone());
        unique.push(candidate);
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafusion::arrow::array::{
        ArrayRef, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray,
        TimestampMillisecondArray,
    };
    use datafusion::arrow::datatypes::{DataType, Field, Schema, TimeUnit};
    use std::sync::Arc;

    fn batch(fields: Vec<Field>, columns: Vec<ArrayRef>) -> RecordBatch {
        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
    }

    fn names(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_shape_mixed_types() {
        let b = batch(
            vec![
                Field::new("region", DataType::Utf8, true),
                Field::new("amount", DataType::Float64, true),
                Field::new("qty", DataType::Int64, true),
                Field::new("day", DataType::Date32, true),
                Field::new("flag", DataType::Boolean, true),
            ],
            vec![
                Arc::new(StringArray::from(vec!["North"])),
                Arc::new(Float64Array::from(vec![15000.0])),
                Arc::new(Int64Array::from(vec![100])),
                // 2024-01-15
                Arc::new(Date32Array::from(vec![19737])),
                Arc::new(BooleanArray::from(vec![true])),
            ],
        );

        let result = shape(names(&["region", "amount", "qty", "day", "flag"]), &[b]).unwrap();
        assert_eq!(result.row_count(), 1);
        let row = &result.rows[0];
        assert_eq!(row.get("region"), Some("North"));
        assert_eq!(row.get("amount"), Some("15000.0"));
        assert_eq!(row.get("qty"), Some("100"));
        assert_eq!(row.get("day"), Some("2024-01-15"));
        assert_eq!(row.get("flag"), Some("true"));
    }

    #[test]
    fn test_nulls_render_empty() {
        let b = batch(
            vec![
                Field::new("notes", DataType::Utf8, true),
                Field::new("qty", DataType::Int64, true),
            ],
            vec![
                Arc::new(StringArray::from(vec![None, Some("x")])),
                Arc::new(Int64Array::from(vec![Some(1), None])),
            ],
        );

        let result = shape(names(&["notes", "qty"]), &[b]).unwrap();
        assert_eq!(result.rows[0].get("notes"), Some(NULL_DISPLAY));
        assert_eq!(result.rows[1].get("qty"), Some(NULL_DISPLAY));
    }

    #[test]
    fn test_timestamp_rendering() {
        let b = batch(
            vec![Field::new(
                "ts",
                DataType::Timestamp(TimeUnit::Millisecond, None),
                false,
            )],
            vec![Arc::new(TimestampMillisecondArray::from(vec![1_705_320_000_000]))],
        );

        let result = shape(names(&["ts"]), &[b]).unwrap();
        assert_eq!(result.rows[0].get("ts"), Some("2024-01-15T12:00:00"));
    }

    #[test]
    fn test_no_batches_keeps_columns() {
        let result = shape(names(&["total"]), &[]).unwrap();
        assert_eq!(result.columns, vec!["total"]);
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_multiple_batches_concatenate() {
        let make = |values: Vec<i64>| {
            batch(
                vec![Field::new("n", DataType::Int64, false)],
                vec![Arc::new(Int64Array::from(values))],
            )
        };

        let result = shape(names(&["n"]), &[make(vec![1, 2]), make(vec![3])]).unwrap();
        let values: Vec<&str> = result.rows.iter().filter_map(|r| r.get("n")).collect();
        assert_eq!(values, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_unique_column_names() {
        assert_eq!(unique_column_names(names(&["a", "b"])), names(&["a", "b"]));
        assert_eq!(
            unique_column_names(names(&["region", "region", "region"])),
            names(&["region", "region_1", "region_2"])
        );
        // An existing `a_1` pushes the duplicate to `a_2`.
        assert_eq!(
            unique_column_names(names(&["a", "a", "a_1"])),
            names(&["a", "a_2", "a_1"])
        );
    }

    #[test]
    fn test_duplicate_columns_keep_every_cell() {
        let b = batch(
            vec![
                Field::new("region", DataType::Utf8, false),
                Field::new("region", DataType::Utf8, false),
            ],
            vec![
                Arc::new(StringArray::from(vec!["North"])),
                Arc::new(StringArray::from(vec!["South"])),
            ],
        );

        let result = shape(names(&["region", "region"]), &[b]).unwrap();
        assert_eq!(result.columns, vec!["region", "region_1"]);
        assert_eq!(result.rows[0].len(), 2);
        assert_eq!(result.rows[0].get("region"), Some("North"));
        assert_eq!(result.rows[0].get("region_1"), Some("South"));
        assert_eq!(
            serde_json::to_string(&result.rows[0]).unwrap(),
            r#"{"region":"North","region_1":"South"}"#
        );
    }

    #[test]
    fn test_column_count_mismatch() {
        let b = batch(
            vec![Field::new("n", DataType::Int64, false)],
            vec![Arc::new(Int64Array::from(vec![1]))],
        );

        let err = shape(names(&["n", "m"]), &[b]).unwrap_err();
        assert_eq!(err.kind(), "execution");
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let b = batch(
            vec![
                Field::new("zeta", DataType::Int64, false),
                Field::new("alpha", DataType::Int64, false),
            ],
            vec![
                Arc::new(Int64Array::from(vec![1])),
                Arc::new(Int64Array::from(vec![2])),
            ],
        );

        let result = shape(names(&["zeta", "alpha"]), &[b]).unwrap();
        let row = &result.rows[0];
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"columns":["zeta","alpha"],"rows":[{"zeta":"1","alpha":"2"}]}"#
        );
    }
}
