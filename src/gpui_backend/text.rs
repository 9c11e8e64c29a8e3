use std::sync::Arc;

use gpui::{TextRun, Window, WindowTextSystem, px};

use crate::render::TextMeasurer;

use super::paint::ui_font;

/// Measures text with the window's shaper so layout matches what is painted.
pub(crate) struct GpuiTextMeasurer {
    text_system: Arc<WindowTextSystem>,
}

impl GpuiTextMeasurer {
    pub(crate) fn new(window: &Window) -> Self {
        Self {
            text_system: Arc::clone(window.text_system()),
        }
    }
}

impl TextMeasurer for GpuiTextMeasurer {
    fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        let run = TextRun {
            len: text.len(),
            font: ui_font(false),
            color: gpui::black(),
            background_color: None,
            underline: None,
            strikethrough: None,
        };
        let shaped = self
            .text_system
            .shape_line(text.to_string().into(), px(size), &[run], None);
        let width = f32::from(shaped.width);
        let height = f32::from(shaped.ascent + shaped.descent);
        (width, height.max(size * 1.2))
    }
}
