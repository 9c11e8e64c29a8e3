//! Frame geometry: plot area, mini-map band, buttons, and info box.
//!
//! Recomputed on every pass so hit testing always sees the layout that was
//! last rendered.

use crate::config::ChartStyle;
use crate::geom::{ScreenPoint, ScreenRect};
use crate::interaction::MiniMapFrame;
use crate::render::TextMeasurer;
use crate::series::Column;

/// One series toggle button.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonLayout {
    /// Column the button toggles.
    pub id: String,
    /// Outline rectangle.
    pub rect: ScreenRect,
}

/// The info box shown for a clicked sample.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoBoxLayout {
    /// Store index of the described sample.
    pub index: usize,
    /// Pixel X of the vertical marker.
    pub marker_x: f32,
    /// Box rectangle.
    pub rect: ScreenRect,
}

/// All rectangles of one rendered frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartGeometry {
    /// Canvas width.
    pub width: f32,
    /// Canvas height.
    pub height: f32,
    /// Main plot area, from the top inset down to the baseline.
    pub plot: ScreenRect,
    /// Mini-map band.
    pub minimap: ScreenRect,
    /// Mini-map selection frame.
    pub frame: MiniMapFrame,
    /// Mini-map X of every sample of the active data set.
    pub minimap_xs: Vec<f32>,
    /// Toggle buttons, one per column in input order.
    pub buttons: Vec<ButtonLayout>,
    /// Info box, when a sample is selected.
    pub info_box: Option<InfoBoxLayout>,
}

impl ChartGeometry {
    /// Plot and mini-map rectangles for a canvas size; everything else empty.
    pub fn new(width: f32, height: f32, top: f32, style: &ChartStyle) -> Self {
        let baseline = height - style.reserved_bottom();
        let minimap_bottom = height - style.buttons_row_height;
        Self {
            width,
            height,
            plot: ScreenRect::new(ScreenPoint::new(0.0, top), ScreenPoint::new(width, baseline)),
            minimap: ScreenRect::new(
                ScreenPoint::new(style.left_padding, minimap_bottom - style.minimap_height),
                ScreenPoint::new(width - style.right_padding, minimap_bottom),
            ),
            ..Self::default()
        }
    }
}

/// Lay out one toggle button per column in a row under the mini-map.
pub fn layout_buttons(
    columns: &[Column],
    height: f32,
    style: &ChartStyle,
    measurer: &dyn TextMeasurer,
) -> Vec<ButtonLayout> {
    let y = height - style.buttons_row_height + style.button_top_padding;
    let mut x = style.left_padding;
    columns
        .iter()
        .map(|column| {
            let (text_width, _) = measurer.measure(column.name(), style.button_font_size);
            let width = style.button_height + text_width + style.button_text_padding;
            let rect = ScreenRect::from_origin_size(x, y, width, style.button_height);
            x += width + style.button_spacing;
            ButtonLayout {
                id: column.id().to_string(),
                rect,
            }
        })
        .collect()
}

/// Sample position under `x` among the chart X coordinates `xs`.
///
/// Each sample owns the span between the midpoints to its neighbours; the
/// first and last extend to the canvas edges.
pub fn position_at(xs: &[f32], x: f32, width: f32) -> Option<usize> {
    if x < 0.0 || x > width || xs.is_empty() {
        return None;
    }
    let position = xs
        .windows(2)
        .position(|pair| x < (pair[0] + pair[1]) / 2.0)
        .unwrap_or(xs.len() - 1);
    Some(position)
}

/// Place an info box of `box_width` around `marker_x`, clamped to the canvas.
pub fn info_box_rect(marker_x: f32, box_width: f32, width: f32, style: &ChartStyle) -> ScreenRect {
    let half = box_width / 2.0;
    let x = if marker_x + half >= width {
        width - box_width - style.right_padding
    } else if marker_x - half <= 0.0 {
        style.left_padding
    } else {
        marker_x - half
    };
    ScreenRect::from_origin_size(x, style.info_top, box_width, style.info_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ApproxTextMeasurer, Color};

    #[test]
    fn bands_are_stacked_from_the_bottom() {
        let style = ChartStyle::default();
        let geometry = ChartGeometry::new(400.0, 500.0, 12.0, &style);
        assert_eq!(geometry.plot.max.y, 370.0);
        assert_eq!(geometry.minimap.min.y, 400.0);
        assert_eq!(geometry.minimap.max.y, 450.0);
    }

    #[test]
    fn buttons_flow_left_to_right() {
        let style = ChartStyle::default();
        let columns = vec![
            Column::new("y0", "Joined", Color::BLACK, vec![0.0, 1.0]),
            Column::new("y1", "Left", Color::BLACK, vec![0.0, 1.0]),
        ];
        let buttons = layout_buttons(&columns, 500.0, &style, &ApproxTextMeasurer::default());
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[0].rect.min, ScreenPoint::new(7.0, 460.0));
        assert_eq!(
            buttons[1].rect.min.x,
            buttons[0].rect.max.x + style.button_spacing
        );
        assert!(buttons[0].rect.width() > buttons[1].rect.width());
    }

    #[test]
    fn position_uses_midpoints() {
        let xs = [10.0, 20.0, 30.0];
        assert_eq!(position_at(&xs, 0.0, 40.0), Some(0));
        assert_eq!(position_at(&xs, 14.9, 40.0), Some(0));
        assert_eq!(position_at(&xs, 15.0, 40.0), Some(1));
        assert_eq!(position_at(&xs, 40.0, 40.0), Some(2));
        assert_eq!(position_at(&xs, 41.0, 40.0), None);
    }

    #[test]
    fn info_box_is_clamped() {
        let style = ChartStyle::default();
        assert_eq!(info_box_rect(395.0, 100.0, 400.0, &style).min.x, 293.0);
        assert_eq!(info_box_rect(5.0, 100.0, 400.0, &style).min.x, 7.0);
        assert_eq!(info_box_rect(200.0, 100.0, 400.0, &style).min.x, 150.0);
    }
}
