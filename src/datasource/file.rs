use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::DateTime;

use crate::error::DataSourceError;

use super::{ChartData, DataSource};

/// Reads chart data from a directory tree.
///
/// Layout, relative to the root:
///
/// * `<chart>/overview.json` for the overview;
/// * `<chart>/<YYYY-MM>/<DD>.json` for the detail of one UTC day.
#[derive(Debug, Clone)]
pub struct FileDataSource {
    root: PathBuf,
    chart: String,
}

impl FileDataSource {
    /// Create a source for one chart under `root`.
    pub fn new(root: impl Into<PathBuf>, chart: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            chart: chart.into(),
        }
    }

    /// Path of the overview file.
    pub fn overview_path(&self) -> PathBuf {
        self.root.join(&self.chart).join("overview.json")
    }

    /// Path of the detail file for the day containing `timestamp_ms`.
    pub fn detail_path(&self, timestamp_ms: i64) -> Result<PathBuf, DataSourceError> {
        let date = DateTime::from_timestamp_millis(timestamp_ms)
            .ok_or(DataSourceError::BadTimestamp(timestamp_ms))?;
        Ok(self
            .root
            .join(&self.chart)
            .join(date.format("%Y-%m").to_string())
            .join(format!("{}.json", date.format("%d"))))
    }
}

impl DataSource for FileDataSource {
    fn fetch_overview(&self) -> Result<ChartData, DataSourceError> {
        read_chart_data(&self.overview_path())
    }

    fn fetch_detail(&self, timestamp_ms: i64) -> Result<ChartData, DataSourceError> {
        read_chart_data(&self.detail_path(timestamp_ms)?)
    }
}

fn read_chart_data(path: &Path) -> Result<ChartData, DataSourceError> {
    let json = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            DataSourceError::NotFound(path.to_path_buf())
        } else {
            DataSourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "loaded chart data");
    Ok(ChartData::from_json(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_path_uses_utc_day() {
        let source = FileDataSource::new("/data", "1");
        // 2018-04-04T00:00:00Z
        let path = source.detail_path(1_522_800_000_000).expect("valid timestamp");
        assert_eq!(path, PathBuf::from("/data/1/2018-04/04.json"));
    }

    #[test]
    fn reads_overview_and_reports_missing_detail() {
        let dir = tempfile::tempdir().expect("temp dir");
        let chart_dir = dir.path().join("3");
        fs::create_dir_all(&chart_dir).expect("chart dir");
        fs::write(
            chart_dir.join("overview.json"),
            r#"{"columns": [["x", 1, 2]], "types": {"x": "x"}}"#,
        )
        .expect("write overview");

        let source = FileDataSource::new(dir.path(), "3");
        let data = source.fetch_overview().expect("overview");
        assert_eq!(data.columns.len(), 1);
        assert!(matches!(
            source.fetch_detail(0),
            Err(DataSourceError::NotFound(_))
        ));
    }
}
