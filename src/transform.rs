//! Coordinate transforms between data and screen space.
//!
//! An [`AxisScaler`] maps an index range and a value maximum onto a pixel
//! band of the canvas. The main chart and the mini-map each own one, built
//! from the same canvas size but different index ranges and bands.

use crate::config::ChartStyle;
use crate::geom::ScreenPoint;
use crate::render::Color;
use crate::series::SeriesStore;

/// One mapped sample: pixel coordinate plus the value it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledPoint {
    /// Pixel coordinate along the mapped axis.
    pub scaled: f32,
    /// Domain value (timestamp in ms for X, sample value for Y).
    pub original: f64,
}

/// Pixel Y values of one visible column.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledSeries {
    /// Column id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Line color.
    pub color: Color,
    /// One point per displayed index.
    pub values: Vec<ScaledPoint>,
}

/// Mapped samples of the displayed index range.
///
/// Rebuilt wholesale on every recompute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScaledFrame {
    /// First store index covered by the frame.
    pub start: usize,
    /// One X point per displayed index.
    pub xs: Vec<ScaledPoint>,
    /// Visible columns, in input order.
    pub series: Vec<ScaledSeries>,
}

impl ScaledFrame {
    /// Screen points of one series, ready for a polyline.
    pub fn points(&self, series: &ScaledSeries) -> Vec<ScreenPoint> {
        self.xs
            .iter()
            .zip(&series.values)
            .map(|(x, y)| ScreenPoint::new(x.scaled, y.scaled))
            .collect()
    }

    /// Pixel X of a store index, if it is inside the frame.
    pub fn x_of(&self, index: usize) -> Option<f32> {
        index
            .checked_sub(self.start)
            .and_then(|offset| self.xs.get(offset))
            .map(|point| point.scaled)
    }

    /// Number of displayed indices.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Check whether the frame holds no samples.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Pure mapping from (index, value) to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScaler {
    width: f32,
    left_inset: f32,
    right_inset: f32,
    start: usize,
    end: usize,
    max: f64,
    baseline: f32,
    band_height: f32,
}

impl AxisScaler {
    /// Scaler for the main chart.
    ///
    /// `top` is the space kept free above the highest value (top padding plus
    /// title height when a title is shown).
    pub fn chart(
        width: f32,
        height: f32,
        style: &ChartStyle,
        top: f32,
        start: usize,
        end: usize,
        max: f64,
    ) -> Self {
        let baseline = height - style.reserved_bottom();
        Self {
            width,
            left_inset: style.left_padding,
            right_inset: style.right_padding,
            start,
            end,
            max: floor_max(max),
            baseline,
            band_height: (baseline - top).max(0.0),
        }
    }

    /// Scaler for the mini-map, spanning the whole series.
    pub fn minimap(
        width: f32,
        height: f32,
        style: &ChartStyle,
        last_index: usize,
        max: f64,
    ) -> Self {
        Self {
            width,
            left_inset: style.left_padding,
            right_inset: style.right_padding,
            start: 0,
            end: last_index,
            max: floor_max(max),
            baseline: height - style.buttons_row_height,
            band_height: style.minimap_height,
        }
    }

    /// First mapped index.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last mapped index.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Value mapped onto the top of the band (never below 1 for empty data).
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Pixel Y of value 0.
    pub fn baseline(&self) -> f32 {
        self.baseline
    }

    /// Pixel Y of `max`.
    pub fn top(&self) -> f32 {
        self.baseline - self.band_height
    }

    /// Pixels per index step before the edge inset.
    pub fn x_factor(&self) -> f32 {
        self.width / self.span() as f32
    }

    /// Ratio squeezing the full width between the left and right insets.
    pub fn edge_inset(&self) -> f32 {
        if self.width > 0.0 {
            (self.width - self.left_inset - self.right_inset) / self.width
        } else {
            0.0
        }
    }

    /// Pixels per value unit.
    pub fn y_factor(&self) -> f64 {
        self.band_height as f64 / self.max
    }

    /// Pixel X of a store index.
    pub fn x(&self, index: usize) -> f32 {
        let offset = index as f32 - self.start as f32;
        offset * self.x_factor() * self.edge_inset() + self.left_inset
    }

    /// Pixel Y of a value.
    pub fn y(&self, value: f64) -> f32 {
        (self.baseline as f64 - value * self.y_factor()) as f32
    }

    /// Pixel X of every mapped index, `start..=end`.
    pub fn xs(&self) -> Vec<f32> {
        (self.start..=self.end).map(|index| self.x(index)).collect()
    }

    /// Map the visible columns of `store` over `start..=end`.
    pub fn scale(&self, store: &SeriesStore) -> ScaledFrame {
        let end = self.end.min(store.last_index());
        let xs = (self.start..=end)
            .map(|index| ScaledPoint {
                scaled: self.x(index),
                original: store.timestamps()[index] as f64,
            })
            .collect();
        let series = store
            .visible_columns()
            .map(|column| ScaledSeries {
                id: column.id().to_string(),
                name: column.name().to_string(),
                color: column.color(),
                values: column.values()[self.start..=end]
                    .iter()
                    .map(|&value| ScaledPoint {
                        scaled: self.y(value),
                        original: value,
                    })
                    .collect(),
            })
            .collect();
        ScaledFrame {
            start: self.start,
            xs,
            series,
        }
    }

    fn span(&self) -> usize {
        self.end.saturating_sub(self.start).max(1)
    }
}

fn floor_max(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 { max } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Column;

    fn style() -> ChartStyle {
        ChartStyle::default()
    }

    #[test]
    fn first_and_last_samples_land_on_insets() {
        for span in [1_usize, 9, 50, 999] {
            let scaler = AxisScaler::chart(400.0, 500.0, &style(), 12.0, 10, 10 + span, 50.0);
            assert!((scaler.x(10) - 7.0).abs() < 1e-3, "span {span}");
            assert!((scaler.x(10 + span) - 393.0).abs() < 1e-2, "span {span}");
        }
    }

    #[test]
    fn chart_y_uses_plot_height_over_max() {
        let style = style();
        let scaler = AxisScaler::chart(400.0, 500.0, &style, 12.0, 0, 10, 50.0);
        let plot_height = 500.0 - style.reserved_bottom() - 12.0;
        assert!((scaler.y_factor() - plot_height as f64 / 50.0).abs() < 1e-9);
        assert!((scaler.y(0.0) - (500.0 - 130.0)).abs() < 1e-3);
        assert!((scaler.y(50.0) - 12.0).abs() < 1e-3);
    }

    #[test]
    fn non_positive_max_is_floored() {
        let scaler = AxisScaler::chart(400.0, 500.0, &style(), 12.0, 0, 10, 0.0);
        assert_eq!(scaler.max(), 1.0);
        assert!(scaler.y(0.0).is_finite());
        let scaler = AxisScaler::minimap(400.0, 500.0, &style(), 10, f64::NAN);
        assert_eq!(scaler.max(), 1.0);
    }

    #[test]
    fn minimap_band_sits_above_buttons() {
        let scaler = AxisScaler::minimap(400.0, 500.0, &style(), 99, 99.0);
        assert!((scaler.baseline() - 450.0).abs() < 1e-3);
        assert!((scaler.top() - 400.0).abs() < 1e-3);
        assert!((scaler.y(99.0) - 400.0).abs() < 1e-3);
    }

    #[test]
    fn x_is_monotonic() {
        let xs = AxisScaler::minimap(300.0, 400.0, &style(), 20, 1.0).xs();
        assert_eq!(xs.len(), 21);
        assert!(xs.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn scale_maps_visible_range() {
        let store = SeriesStore::new(
            "x",
            vec![0, 1, 2, 3],
            vec![Column::new("y0", "a", Color::BLACK, vec![1.0, 2.0, 3.0, 4.0])],
        )
        .expect("valid store");
        let scaler = AxisScaler::chart(200.0, 400.0, &style(), 12.0, 1, 3, 4.0);
        let frame = scaler.scale(&store);
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.series[0].values[0].original, 2.0);
        assert_eq!(frame.x_of(1), Some(scaler.x(1)));
        assert_eq!(frame.x_of(0), None);
    }
}
