//! Chart configuration.
//!
//! [`ChartConfig`] mirrors the optional options a host may pass (usually as
//! JSON); [`ChartSettings`] is the validated, fully-defaulted form a chart
//! instance owns. Layout constants live in [`ChartStyle`].

use std::time::Duration;

use serde::Deserialize;

use crate::error::ChartError;
use crate::style::ThemeMode;

/// Unit of the timestamps stored in the time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Milliseconds since the Unix epoch (default).
    #[default]
    Milliseconds,
    /// Seconds since the Unix epoch.
    Seconds,
}

impl TimeUnit {
    /// Convert a timestamp in this unit into milliseconds.
    pub fn to_millis(self, value: i64) -> i64 {
        match self {
            Self::Milliseconds => value,
            Self::Seconds => value.saturating_mul(1000),
        }
    }
}

/// Optional chart options supplied by the host.
///
/// Every field overrides one internal default when present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    /// Title drawn above the chart.
    pub title: Option<String>,
    /// Number of Y axis tick candidates.
    pub y_labels_tick_count: Option<usize>,
    /// Minimum number of index positions the viewport must span.
    pub min_display_positions: Option<usize>,
    /// Enable fetching detail data when the info box is clicked.
    pub enable_zoom: Option<bool>,
    /// Unit of the time column.
    pub time_unit: Option<TimeUnit>,
    /// Start in night mode.
    pub night_mode: Option<bool>,
    /// Deadline for detail fetches, in milliseconds.
    pub detail_timeout_ms: Option<u64>,
    /// Initial canvas width in logical pixels.
    pub width: Option<f32>,
    /// Initial canvas height in logical pixels.
    pub height: Option<f32>,
}

impl ChartConfig {
    /// Create an empty configuration (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the chart title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the Y axis tick count.
    pub fn with_y_labels_tick_count(mut self, count: usize) -> Self {
        self.y_labels_tick_count = Some(count);
        self
    }

    /// Set the minimum viewport width in index positions.
    pub fn with_min_display_positions(mut self, positions: usize) -> Self {
        self.min_display_positions = Some(positions);
        self
    }

    /// Enable or disable zoom-on-click.
    pub fn with_zoom(mut self, enabled: bool) -> Self {
        self.enable_zoom = Some(enabled);
        self
    }

    /// Set the unit of the time column.
    pub fn with_time_unit(mut self, unit: TimeUnit) -> Self {
        self.time_unit = Some(unit);
        self
    }

    /// Set the initial canvas size.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Validate and fill in defaults.
    pub fn resolve(&self) -> Result<ChartSettings, ChartError> {
        let mut settings = ChartSettings::default();
        if let Some(title) = &self.title {
            settings.title = Some(title.clone());
        }
        if let Some(count) = self.y_labels_tick_count {
            if count < 2 {
                return Err(ChartError::InvalidConfig(format!(
                    "yLabelsTickCount must be at least 2, got {count}"
                )));
            }
            settings.y_tick_count = count;
        }
        if let Some(positions) = self.min_display_positions {
            if positions == 0 {
                return Err(ChartError::InvalidConfig(
                    "minDisplayPositions must be at least 1".to_string(),
                ));
            }
            settings.min_display_positions = positions;
        }
        if let Some(enabled) = self.enable_zoom {
            settings.enable_zoom = enabled;
        }
        if let Some(unit) = self.time_unit {
            settings.time_unit = unit;
        }
        if self.night_mode == Some(true) {
            settings.theme_mode = ThemeMode::Night;
        }
        if let Some(timeout) = self.detail_timeout_ms {
            settings.detail_timeout = Duration::from_millis(timeout);
        }
        if let Some(width) = self.width {
            settings.width = positive("width", width)?;
        }
        if let Some(height) = self.height {
            settings.height = positive("height", height)?;
        }
        Ok(settings)
    }
}

fn positive(name: &str, value: f32) -> Result<f32, ChartError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ChartError::InvalidConfig(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

/// Frame count and per-frame delay of a value-range animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSettings {
    /// Number of interpolation steps.
    pub iterations: u32,
    /// Delay between consecutive steps.
    pub step_delay: Duration,
}

impl AnimationSettings {
    /// Animation used when a series is shown or hidden.
    pub const BUTTON: Self = Self {
        iterations: 30,
        step_delay: Duration::from_millis(10),
    };

    /// Animation used while the viewport is dragged.
    pub const SCROLL: Self = Self {
        iterations: 10,
        step_delay: Duration::from_millis(5),
    };
}

/// Validated per-instance settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    /// Title drawn above the chart.
    pub title: Option<String>,
    /// Number of Y axis tick candidates.
    pub y_tick_count: usize,
    /// Minimum viewport width in index positions.
    pub min_display_positions: usize,
    /// Zoom-on-click enabled.
    pub enable_zoom: bool,
    /// Unit of the time column.
    pub time_unit: TimeUnit,
    /// Initial theme mode.
    pub theme_mode: ThemeMode,
    /// Deadline for detail fetches.
    pub detail_timeout: Duration,
    /// Canvas width until the host resizes the chart.
    pub width: f32,
    /// Canvas height until the host resizes the chart.
    pub height: f32,
    /// Animation for series toggles.
    pub button_animation: AnimationSettings,
    /// Animation for viewport drags.
    pub scroll_animation: AnimationSettings,
    /// Layout constants.
    pub style: ChartStyle,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            title: None,
            y_tick_count: 10,
            min_display_positions: 10,
            enable_zoom: false,
            time_unit: TimeUnit::Milliseconds,
            theme_mode: ThemeMode::Day,
            detail_timeout: Duration::from_secs(10),
            width: 400.0,
            height: 500.0,
            button_animation: AnimationSettings::BUTTON,
            scroll_animation: AnimationSettings::SCROLL,
            style: ChartStyle::default(),
        }
    }
}

/// Layout constants, in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Inset between the canvas left edge and the first sample.
    pub left_padding: f32,
    /// Inset between the last sample and the canvas right edge.
    pub right_padding: f32,
    /// Space kept free above the highest value.
    pub top_padding: f32,
    /// Extra top space when a title is shown.
    pub title_height: f32,
    /// Title font size.
    pub title_font_size: f32,
    /// Space between the plot baseline and the mini-map.
    pub axis_bottom_padding: f32,
    /// Axis label font size.
    pub axis_font_size: f32,
    /// Gap between a Y label and its grid line.
    pub axis_text_bottom_padding: f32,
    /// Gap between the baseline and X labels.
    pub axis_text_top_padding: f32,
    /// Shift of X labels left of their tick.
    pub axis_text_left_padding: f32,
    /// Horizontal room reserved per X label.
    pub axis_label_placeholder: f32,
    /// Grid line width.
    pub grid_line_width: f32,
    /// Chart series line width.
    pub line_width: f32,
    /// Mini-map band height.
    pub minimap_height: f32,
    /// Mini-map series line width.
    pub minimap_line_width: f32,
    /// Drag handle width.
    pub handle_width: f32,
    /// Horizontal hit slack around drag handles.
    pub drag_tolerance: f32,
    /// Frame border (top and bottom) width.
    pub frame_border_width: f32,
    /// Height of the row holding series toggle buttons.
    pub buttons_row_height: f32,
    /// Toggle button height.
    pub button_height: f32,
    /// Gap between the mini-map and the buttons.
    pub button_top_padding: f32,
    /// Gap between buttons.
    pub button_spacing: f32,
    /// Space after a button label.
    pub button_text_padding: f32,
    /// Button label font size.
    pub button_font_size: f32,
    /// Info box height.
    pub info_height: f32,
    /// Info box distance from the canvas top.
    pub info_top: f32,
    /// Info box inner left padding.
    pub info_left_padding: f32,
    /// Info box inner right padding.
    pub info_right_padding: f32,
    /// Header baseline offset inside the info box.
    pub info_header_offset: f32,
    /// Values baseline offset inside the info box.
    pub info_values_offset: f32,
    /// Names baseline offset below values.
    pub info_names_offset: f32,
    /// Header font size.
    pub info_header_font_size: f32,
    /// Value font size.
    pub info_value_font_size: f32,
    /// Name font size.
    pub info_name_font_size: f32,
    /// Info box corner radius.
    pub info_corner_radius: f32,
    /// Top of the vertical marker line.
    pub marker_top: f32,
    /// Outer radius of the marker circles.
    pub marker_radius: f32,
}

impl ChartStyle {
    /// Space below the plot baseline: axis labels, mini-map, and buttons.
    pub fn reserved_bottom(&self) -> f32 {
        self.axis_bottom_padding + self.minimap_height + self.buttons_row_height
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            left_padding: 7.0,
            right_padding: 7.0,
            top_padding: 12.0,
            title_height: 20.0,
            title_font_size: 14.0,
            axis_bottom_padding: 30.0,
            axis_font_size: 10.0,
            axis_text_bottom_padding: 5.0,
            axis_text_top_padding: 3.0,
            axis_text_left_padding: 10.0,
            axis_label_placeholder: 70.0,
            grid_line_width: 0.5,
            line_width: 1.5,
            minimap_height: 50.0,
            minimap_line_width: 1.0,
            handle_width: 10.0,
            drag_tolerance: 10.0,
            frame_border_width: 2.0,
            buttons_row_height: 50.0,
            button_height: 30.0,
            button_top_padding: 10.0,
            button_spacing: 10.0,
            button_text_padding: 5.0,
            button_font_size: 12.0,
            info_height: 65.0,
            info_top: 5.0,
            info_left_padding: 15.0,
            info_right_padding: 15.0,
            info_header_offset: 20.0,
            info_values_offset: 40.0,
            info_names_offset: 12.0,
            info_header_font_size: 12.0,
            info_value_font_size: 12.0,
            info_name_font_size: 10.0,
            info_corner_radius: 10.0,
            marker_top: 20.0,
            marker_radius: 4.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_options_override_defaults() {
        let config = ChartConfig::from_json(
            r#"{"title":"Followers","yLabelsTickCount":6,
                "minDisplayPositions":20,"enableZoom":true}"#,
        )
        .expect("valid config");
        let settings = config.resolve().expect("valid settings");
        assert_eq!(settings.title.as_deref(), Some("Followers"));
        assert_eq!(settings.y_tick_count, 6);
        assert_eq!(settings.min_display_positions, 20);
        assert!(settings.enable_zoom);
        assert_eq!(settings.time_unit, TimeUnit::Milliseconds);
    }

    #[test]
    fn missing_options_keep_defaults() {
        let settings = ChartConfig::from_json("{}")
            .expect("valid config")
            .resolve()
            .expect("valid settings");
        assert_eq!(settings, ChartSettings::default());
    }

    #[test]
    fn rejects_degenerate_tick_count() {
        let config = ChartConfig::new().with_y_labels_tick_count(1);
        assert!(matches!(config.resolve(), Err(ChartError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_non_positive_size() {
        let config = ChartConfig::new().with_size(0.0, 300.0);
        assert!(matches!(config.resolve(), Err(ChartError::InvalidConfig(_))));
        let settings = ChartConfig::new()
            .with_size(640.0, 480.0)
            .resolve()
            .expect("valid size");
        assert_eq!((settings.width, settings.height), (640.0, 480.0));
    }

    #[test]
    fn seconds_convert_to_millis() {
        let unit: TimeUnit = serde_json::from_str("\"seconds\"").expect("valid unit");
        assert_eq!(unit.to_millis(1_522_800_000), 1_522_800_000_000);
    }
}
