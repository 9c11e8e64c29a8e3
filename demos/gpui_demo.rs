#[cfg(feature = "gpui")]
use std::sync::Arc;

#[cfg(feature = "gpui")]
use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};

#[cfg(feature = "gpui")]
use gpui_timechart::{Chart, ChartConfig, ChartData, DataSource, FileDataSource, GpuiChartView};

/// Usage: `gpui_demo [DATA_DIR CHART]`
///
/// With arguments, the overview is read from `DATA_DIR/CHART/overview.json`
/// and clicking the info box loads the day from `DATA_DIR/CHART/YYYY-MM/DD.json`.
/// Without arguments a synthetic data set is shown.
#[cfg(feature = "gpui")]
fn main() {
    let mut args = std::env::args().skip(1);
    let source = match (args.next(), args.next()) {
        (Some(root), Some(chart)) => Some(Arc::new(FileDataSource::new(root, chart))),
        _ => None,
    };

    let data = match &source {
        Some(source) => match source.fetch_overview() {
            Ok(data) => data,
            Err(error) => {
                eprintln!("failed to load overview: {error}");
                return;
            }
        },
        None => synthetic_data(),
    };
    let config = ChartConfig::new()
        .with_title("Followers")
        .with_zoom(source.is_some());
    let chart = match Chart::new(data, &config) {
        Ok(chart) => chart,
        Err(error) => {
            eprintln!("invalid chart data: {error}");
            return;
        }
    };

    Application::new().run(move |cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(420.0), px(560.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, move |_, cx| {
            let mut view = GpuiChartView::new(chart);
            if let Some(source) = source {
                view = view.with_data_source(source);
            }
            cx.new(|_| view)
        })
        .unwrap();
    });
}

#[cfg(feature = "gpui")]
fn synthetic_data() -> ChartData {
    const DAY_MS: i64 = 86_400_000;
    const START_MS: i64 = 1_542_412_800_000;
    let days = 112_i64;
    let mut time = vec![serde_json::json!("x")];
    let mut joined = vec![serde_json::json!("y0")];
    let mut left = vec![serde_json::json!("y1")];
    for day in 0..days {
        let phase = day as f64 / 7.0;
        time.push(serde_json::json!(START_MS + day * DAY_MS));
        joined.push(serde_json::json!((120.0 + 60.0 * phase.sin() + day as f64).round()));
        left.push(serde_json::json!((40.0 + 25.0 * (phase * 1.3).cos()).round()));
    }
    ChartData {
        columns: vec![time, joined, left],
        names: [("y0", "Joined"), ("y1", "Left")]
            .into_iter()
            .map(|(id, name)| (id.to_string(), name.to_string()))
            .collect(),
        colors: [("y0", "#3DC23F"), ("y1", "#F34C44")]
            .into_iter()
            .map(|(id, color)| (id.to_string(), color.to_string()))
            .collect(),
        types: [("x", "x"), ("y0", "line"), ("y1", "line")]
            .into_iter()
            .map(|(id, kind)| (id.to_string(), kind.to_string()))
            .collect(),
    }
}

#[cfg(not(feature = "gpui"))]
fn main() {
    eprintln!("Enable the gpui feature to run this example.");
}
