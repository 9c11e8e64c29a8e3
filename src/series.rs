//! Column storage for one chart data set.
//!
//! A [`SeriesStore`] holds the time column and every value column of a data
//! set, together with the visibility flag of each value column.

use chrono::DateTime;

use crate::error::ChartError;
use crate::render::Color;

/// One value column (a data series).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    id: String,
    name: String,
    color: Color,
    values: Vec<f64>,
    visible: bool,
}

impl Column {
    /// Create a visible column.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: Color,
        values: Vec<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            values,
            visible: true,
        }
    }

    /// Column identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Line color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Raw sample values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Check whether the column is displayed.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Outcome of a visibility change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    /// The column's visibility flipped.
    Changed,
    /// The column already had the requested visibility.
    Unchanged,
    /// Hiding was refused because the column is the last visible one.
    LastVisible,
    /// No column has the given id.
    UnknownColumn,
}

/// Time column plus aligned value columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStore {
    time_id: String,
    timestamps: Vec<i64>,
    columns: Vec<Column>,
}

impl SeriesStore {
    /// Build a store, checking that every column is aligned with the time column.
    ///
    /// `timestamps` are milliseconds since the Unix epoch. They must strictly
    /// increase and map to a calendar date.
    pub fn new(
        time_id: impl Into<String>,
        timestamps: Vec<i64>,
        columns: Vec<Column>,
    ) -> Result<Self, ChartError> {
        if timestamps.len() < 2 {
            return Err(ChartError::TooFewSamples {
                len: timestamps.len(),
            });
        }
        if let Some((position, &value)) = timestamps
            .iter()
            .enumerate()
            .find(|(_, value)| DateTime::from_timestamp_millis(**value).is_none())
        {
            return Err(ChartError::TimestampOutOfRange { position, value });
        }
        if let Some(position) = timestamps.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(ChartError::UnorderedTimestamps {
                position: position + 1,
            });
        }
        if columns.is_empty() {
            return Err(ChartError::NoLineColumns);
        }
        for column in &columns {
            if column.values.len() != timestamps.len() {
                return Err(ChartError::LengthMismatch {
                    column: column.id.clone(),
                    expected: timestamps.len(),
                    actual: column.values.len(),
                });
            }
        }
        Ok(Self {
            time_id: time_id.into(),
            timestamps,
            columns,
        })
    }

    /// Identifier of the time column.
    pub fn time_id(&self) -> &str {
        &self.time_id
    }

    /// Number of samples per column.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Always false; a store holds at least two samples.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Index of the last sample.
    pub fn last_index(&self) -> usize {
        self.timestamps.len() - 1
    }

    /// Timestamps in milliseconds.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Timestamp at an index.
    pub fn timestamp(&self, index: usize) -> Option<i64> {
        self.timestamps.get(index).copied()
    }

    /// All value columns, in input order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a value column.
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// Visible value columns, in input order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| column.visible)
    }

    /// Ids of the visible value columns.
    pub fn visible_ids(&self) -> Vec<&str> {
        self.visible_columns().map(Column::id).collect()
    }

    /// Number of visible value columns.
    pub fn visible_count(&self) -> usize {
        self.visible_columns().count()
    }

    /// Greatest visible value over `start..=end`, or 0 when nothing is visible.
    pub fn max_visible_in(&self, start: usize, end: usize) -> f64 {
        let end = end.min(self.last_index());
        if start > end {
            return 0.0;
        }
        self.visible_columns()
            .flat_map(|column| column.values[start..=end].iter().copied())
            .filter(|value| value.is_finite())
            .fold(0.0, f64::max)
    }

    /// Show or hide a column. At least one column always stays visible.
    pub fn set_visible(&mut self, id: &str, visible: bool) -> VisibilityChange {
        let visible_count = self.visible_count();
        let Some(column) = self.columns.iter_mut().find(|column| column.id == id) else {
            return VisibilityChange::UnknownColumn;
        };
        if column.visible == visible {
            return VisibilityChange::Unchanged;
        }
        if !visible && visible_count <= 1 {
            return VisibilityChange::LastVisible;
        }
        column.visible = visible;
        VisibilityChange::Changed
    }

    /// Copy the visibility of same-id columns from another store.
    pub(crate) fn inherit_visibility(&mut self, other: &SeriesStore) {
        for column in &mut self.columns {
            if let Some(source) = other.column(&column.id) {
                column.visible = source.visible;
            }
        }
        if self.visible_count() == 0
            && let Some(first) = self.columns.first_mut()
        {
            first.visible = true;
        }
    }

    /// Index of the sample whose timestamp is closest to `timestamp`.
    pub fn nearest_index(&self, timestamp: i64) -> usize {
        match self.timestamps.binary_search(&timestamp) {
            Ok(index) => index,
            Err(0) => 0,
            Err(index) if index >= self.timestamps.len() => self.last_index(),
            Err(index) => {
                let before = timestamp.saturating_sub(self.timestamps[index - 1]);
                let after = self.timestamps[index].saturating_sub(timestamp);
                if before <= after { index - 1 } else { index }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SeriesStore {
        SeriesStore::new(
            "x",
            vec![0, 10, 20, 30],
            vec![
                Column::new("y0", "Joined", Color::BLACK, vec![1.0, 5.0, 2.0, 9.0]),
                Column::new("y1", "Left", Color::WHITE, vec![3.0, 7.0, 4.0, 1.0]),
            ],
        )
        .expect("valid store")
    }

    #[test]
    fn rejects_misaligned_columns() {
        let result = SeriesStore::new(
            "x",
            vec![0, 1, 2],
            vec![Column::new("y0", "a", Color::BLACK, vec![1.0, 2.0])],
        );
        assert!(matches!(
            result,
            Err(ChartError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn rejects_descending_timestamps() {
        let timestamps: Vec<i64> = (0..60).rev().map(|day| day * 86_400_000).collect();
        let result = SeriesStore::new(
            "x",
            timestamps,
            vec![Column::new("y0", "a", Color::BLACK, vec![1.0; 60])],
        );
        assert!(matches!(result, Err(ChartError::UnorderedTimestamps { position: 1 })));

        let result = SeriesStore::new(
            "x",
            vec![0, 10, 10],
            vec![Column::new("y0", "a", Color::BLACK, vec![1.0; 3])],
        );
        assert!(matches!(result, Err(ChartError::UnorderedTimestamps { position: 2 })));
    }

    #[test]
    fn rejects_timestamps_without_a_date() {
        let result = SeriesStore::new(
            "x",
            vec![-9_000_000_000_000_000_000, 9_000_000_000_000_000_000],
            vec![Column::new("y0", "a", Color::BLACK, vec![1.0, 2.0])],
        );
        assert!(matches!(result, Err(ChartError::TimestampOutOfRange { position: 0, .. })));
    }

    #[test]
    fn max_is_inclusive_and_visible_only() {
        let mut store = store();
        assert_eq!(store.max_visible_in(0, 2), 7.0);
        assert_eq!(store.max_visible_in(0, 3), 9.0);
        assert_eq!(store.set_visible("y0", false), VisibilityChange::Changed);
        assert_eq!(store.max_visible_in(0, 3), 7.0);
    }

    #[test]
    fn last_visible_column_cannot_be_hidden() {
        let mut store = store();
        assert_eq!(store.set_visible("y1", false), VisibilityChange::Changed);
        assert_eq!(store.set_visible("y0", false), VisibilityChange::LastVisible);
        assert_eq!(store.visible_ids(), vec!["y0"]);
        assert_eq!(store.set_visible("nope", false), VisibilityChange::UnknownColumn);
    }

    #[test]
    fn nearest_index_snaps_both_ways() {
        let store = store();
        assert_eq!(store.nearest_index(-5), 0);
        assert_eq!(store.nearest_index(14), 1);
        assert_eq!(store.nearest_index(16), 2);
        assert_eq!(store.nearest_index(99), 3);
    }
}
