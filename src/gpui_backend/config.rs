/// Configuration for the GPUI chart view.
#[derive(Debug, Clone)]
pub struct ChartViewConfig {
    /// Show the day/night mode switch below the chart.
    pub show_mode_switch: bool,
    /// Height of the mode switch row.
    pub mode_switch_height: f32,
    /// Font size of the mode switch label.
    pub mode_switch_font_size: f32,
}

impl Default for ChartViewConfig {
    fn default() -> Self {
        Self {
            show_mode_switch: true,
            mode_switch_height: 36.0,
            mode_switch_font_size: 14.0,
        }
    }
}
