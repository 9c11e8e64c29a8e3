//! Chart data sources.
//!
//! Data arrives in a column-oriented JSON shape:
//!
//! ```json
//! {
//!   "columns": [["x", 1542412800000, 1542499200000], ["y0", 37, 20]],
//!   "names": {"y0": "Joined"},
//!   "colors": {"y0": "#3DC23F"},
//!   "types": {"x": "x", "y0": "line"}
//! }
//! ```
//!
//! The first column holds timestamps; every other column of type `"line"`
//! becomes a toggleable series. Columns of any other type are ignored.

mod file;

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::config::TimeUnit;
use crate::error::{ChartError, DataSourceError};
use crate::render::Color;
use crate::series::{Column, SeriesStore};

pub use file::FileDataSource;

const TIME_TYPE: &str = "x";
const LINE_TYPE: &str = "line";

/// Fallback colors for columns without a `colors` entry.
const PALETTE: [Color; 4] = [
    Color::rgba8(61, 194, 63, 1.0),
    Color::rgba8(243, 76, 68, 1.0),
    Color::rgba8(59, 130, 246, 1.0),
    Color::rgba8(245, 158, 11, 1.0),
];

/// Raw chart data as delivered by a data source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartData {
    /// Columns, each starting with its id followed by samples.
    pub columns: Vec<Vec<Value>>,
    /// Column id to display name.
    pub names: HashMap<String, String>,
    /// Column id to CSS color.
    pub colors: HashMap<String, String>,
    /// Column id to column type (`"x"`, `"line"`, ...).
    pub types: HashMap<String, String>,
}

impl ChartData {
    /// Parse chart data from JSON.
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the columns and build a [`SeriesStore`].
    pub fn into_store(self, unit: TimeUnit) -> Result<SeriesStore, ChartError> {
        let mut columns = self.columns.into_iter().enumerate();
        let (_, time_column) = columns.next().ok_or(ChartError::NoColumns)?;
        let (time_id, time_cells) = split_column(0, time_column)?;
        if let Some(kind) = self.types.get(&time_id)
            && !kind.eq_ignore_ascii_case(TIME_TYPE)
        {
            return Err(ChartError::MissingTimeColumn);
        }
        let timestamps = time_cells
            .iter()
            .enumerate()
            .map(|(position, cell)| {
                cell_to_f64(cell)
                    .map(|value| unit.to_millis(value.round() as i64))
                    .ok_or_else(|| ChartError::NonNumeric {
                        column: time_id.clone(),
                        position,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut series = Vec::new();
        for (index, raw) in columns {
            let (id, cells) = split_column(index, raw)?;
            let kind = self
                .types
                .get(&id)
                .ok_or_else(|| ChartError::MissingType(id.clone()))?;
            if kind.eq_ignore_ascii_case(TIME_TYPE) {
                return Err(ChartError::DuplicateTimeColumn {
                    first: time_id.clone(),
                    second: id,
                });
            }
            if !kind.eq_ignore_ascii_case(LINE_TYPE) {
                tracing::debug!(column = %id, kind = %kind, "skipping non-line column");
                continue;
            }
            let values = cells
                .iter()
                .enumerate()
                .map(|(position, cell)| {
                    cell_to_f64(cell).ok_or_else(|| ChartError::NonNumeric {
                        column: id.clone(),
                        position,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let color = match self.colors.get(&id) {
                Some(text) => Color::parse(text)?,
                None => PALETTE[series.len() % PALETTE.len()],
            };
            let name = self.names.get(&id).cloned().unwrap_or_else(|| id.clone());
            series.push(Column::new(id, name, color, values));
        }

        SeriesStore::new(time_id, timestamps, series)
    }
}

fn split_column(index: usize, mut column: Vec<Value>) -> Result<(String, Vec<Value>), ChartError> {
    if column.is_empty() {
        return Err(ChartError::BadColumnId { index });
    }
    let cells = column.split_off(1);
    match column.pop() {
        Some(Value::String(id)) => Ok((id, cells)),
        _ => Err(ChartError::BadColumnId { index }),
    }
}

fn cell_to_f64(cell: &Value) -> Option<f64> {
    cell.as_f64().filter(|value| value.is_finite())
}

/// Provider of overview and detail chart data.
///
/// Implementations may block; hosts that must stay responsive call them off
/// the UI thread and hand the result back to the chart.
pub trait DataSource {
    /// Fetch the full overview data set.
    fn fetch_overview(&self) -> Result<ChartData, DataSourceError>;

    /// Fetch the detail data set for the day containing `timestamp_ms`.
    fn fetch_detail(&self, timestamp_ms: i64) -> Result<ChartData, DataSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "columns": [["x", 1000, 2000, 3000], ["y0", 1, 2, 3], ["y1", 4, 5, 6], ["b0", 0, 0, 0]],
        "names": {"y0": "Joined", "y1": "Left"},
        "colors": {"y0": "#3DC23F", "y1": "#F34C44"},
        "types": {"x": "x", "y0": "line", "y1": "LINE", "b0": "bar"}
    }"##;

    #[test]
    fn parses_line_columns_and_skips_others() {
        let store = ChartData::from_json(SAMPLE)
            .expect("valid json")
            .into_store(TimeUnit::Milliseconds)
            .expect("valid store");
        assert_eq!(store.timestamps(), &[1000, 2000, 3000]);
        let ids: Vec<_> = store.columns().iter().map(Column::id).collect();
        assert_eq!(ids, vec!["y0", "y1"]);
        assert_eq!(store.column("y1").map(Column::name), Some("Left"));
    }

    #[test]
    fn converts_seconds_to_millis() {
        let store = ChartData::from_json(SAMPLE)
            .expect("valid json")
            .into_store(TimeUnit::Seconds)
            .expect("valid store");
        assert_eq!(store.timestamp(0), Some(1_000_000));
    }

    #[test]
    fn rejects_length_mismatch() {
        let json = r#"{"columns": [["x", 1, 2, 3], ["y0", 1, 2]],
            "types": {"x": "x", "y0": "line"}}"#;
        let result = ChartData::from_json(json)
            .expect("valid json")
            .into_store(TimeUnit::Milliseconds);
        assert!(matches!(result, Err(ChartError::LengthMismatch { .. })));
    }

    #[test]
    fn rejects_empty_and_non_numeric_data() {
        let empty = ChartData::default().into_store(TimeUnit::Milliseconds);
        assert!(matches!(empty, Err(ChartError::NoColumns)));

        let json = r#"{"columns": [["x", 1, 2], ["y0", 1, "two"]],
            "types": {"x": "x", "y0": "line"}}"#;
        let result = ChartData::from_json(json)
            .expect("valid json")
            .into_store(TimeUnit::Milliseconds);
        assert!(matches!(
            result,
            Err(ChartError::NonNumeric { position: 1, .. })
        ));
    }

    #[test]
    fn rejects_missing_line_columns() {
        let json = r#"{"columns": [["x", 1, 2]], "types": {"x": "x"}}"#;
        let result = ChartData::from_json(json)
            .expect("valid json")
            .into_store(TimeUnit::Milliseconds);
        assert!(matches!(result, Err(ChartError::NoLineColumns)));
    }

    #[test]
    fn rejects_unordered_time_column() {
        let json = r#"{"columns": [["x", 3000, 2000, 1000], ["y0", 1, 2, 3]],
            "types": {"x": "x", "y0": "line"}}"#;
        let result = ChartData::from_json(json)
            .expect("valid json")
            .into_store(TimeUnit::Milliseconds);
        assert!(matches!(result, Err(ChartError::UnorderedTimestamps { position: 1 })));
    }
}
