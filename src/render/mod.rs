//! Rendering primitives.
//!
//! These types are backend-agnostic. The chart describes each frame as a
//! [`RenderList`] of already-computed pixel-space commands; render backends
//! (such as the GPUI backend) replay the list onto their surface.

use crate::error::ChartError;
use crate::geom::{ScreenPoint, ScreenRect};

/// RGBA color.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit channels and a float alpha.
    pub const fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Parse a CSS-style color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)` or `rgba(..)`.
    pub fn parse(text: &str) -> Result<Self, ChartError> {
        let trimmed = text.trim();
        let invalid = || ChartError::InvalidColor(text.to_string());
        if let Some(hex) = trimmed.strip_prefix('#') {
            let digits: Vec<u8> = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| d as u8))
                .collect::<Option<_>>()
                .ok_or_else(invalid)?;
            return match digits.as_slice() {
                [r, g, b] => Ok(Self::rgba8(r * 17, g * 17, b * 17, 1.0)),
                [r1, r0, g1, g0, b1, b0] => {
                    Ok(Self::rgba8(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, 1.0))
                }
                [r1, r0, g1, g0, b1, b0, a1, a0] => Ok(Self::rgba8(
                    r1 * 16 + r0,
                    g1 * 16 + g0,
                    b1 * 16 + b0,
                    (a1 * 16 + a0) as f32 / 255.0,
                )),
                _ => Err(invalid()),
            };
        }
        let inner = trimmed
            .strip_prefix("rgba(")
            .or_else(|| trimmed.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let parts: Vec<f32> = inner
            .split(',')
            .map(|part| part.trim().parse::<f32>().ok())
            .collect::<Option<_>>()
            .ok_or_else(invalid)?;
        let channel = |value: f32| (value.clamp(0.0, 255.0)) / 255.0;
        match parts.as_slice() {
            [r, g, b] => Ok(Self::new(channel(*r), channel(*g), channel(*b), 1.0)),
            [r, g, b, a] => Ok(Self::new(
                channel(*r),
                channel(*g),
                channel(*b),
                a.clamp(0.0, 1.0),
            )),
            _ => Err(invalid()),
        }
    }
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl LineStyle {
    /// Create a line style.
    pub const fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Drop shadow behind a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Shadow color.
    pub color: Color,
    /// Offset in pixels.
    pub offset: ScreenPoint,
    /// Blur radius in pixels.
    pub blur: f32,
}

/// Rectangle styling.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectStyle {
    /// Fill color, if filled.
    pub fill: Option<Color>,
    /// Stroke, if outlined.
    pub stroke: Option<LineStyle>,
    /// Optional drop shadow.
    pub shadow: Option<Shadow>,
}

/// Text styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
    /// Bold weight.
    pub bold: bool,
}

impl TextStyle {
    /// Create a regular-weight text style.
    pub const fn new(color: Color, size: f32) -> Self {
        Self {
            color,
            size,
            bold: false,
        }
    }

    /// Switch to bold weight.
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A single drawing operation in canvas-local pixel space.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Fill the whole canvas with a color.
    Clear(Color),
    /// Start clipping to a rectangle.
    ClipRect(ScreenRect),
    /// End clipping.
    ClipEnd,
    /// Fill an axis-aligned rectangle.
    FillRect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Fill color.
        color: Color,
    },
    /// Draw a single straight line.
    Line {
        /// Line start.
        start: ScreenPoint,
        /// Line end.
        end: ScreenPoint,
        /// Stroke styling.
        style: LineStyle,
    },
    /// Draw a connected polyline.
    Polyline {
        /// Points in drawing order.
        points: Vec<ScreenPoint>,
        /// Stroke styling.
        style: LineStyle,
    },
    /// Fill a circle.
    Circle {
        /// Circle center.
        center: ScreenPoint,
        /// Radius in pixels.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Draw a rounded rectangle.
    RoundedRect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Corner radius in pixels.
        radius: f32,
        /// Fill/stroke styling.
        style: RectStyle,
    },
    /// Draw text with its baseline-left corner at `position`.
    Text {
        /// Text position.
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Text styling.
        style: TextStyle,
    },
}

/// Aggregated render commands for one frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate over all text commands.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            RenderCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Text measurement capability provided by the host.
pub trait TextMeasurer {
    /// Measure a single line of text, returning `(width, height)` in pixels.
    fn measure(&self, text: &str, size: f32) -> (f32, f32);
}

/// Measurer that assumes a fixed average glyph width.
///
/// Used when no backend measurement is available, such as in tests.
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMeasurer {
    /// Average glyph width as a fraction of the font size.
    pub glyph_ratio: f32,
}

impl Default for ApproxTextMeasurer {
    fn default() -> Self {
        Self { glyph_ratio: 0.6 }
    }
}

impl TextMeasurer for ApproxTextMeasurer {
    fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        let width = text.chars().count() as f32 * size * self.glyph_ratio;
        (width, size * 1.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        let color = Color::parse("#3DC23F").expect("valid hex");
        assert!((color.r - 61.0 / 255.0).abs() < 1e-6);
        assert!((color.g - 194.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.a, 1.0);
        assert_eq!(Color::parse("#fff").expect("short hex"), Color::WHITE);
    }

    #[test]
    fn parses_rgba_colors() {
        let color = Color::parse("rgba(255, 0, 0, 0.5)").expect("valid rgba");
        assert_eq!(color, Color::new(1.0, 0.0, 0.0, 0.5));
        assert!(Color::parse("teal").is_err());
        assert!(Color::parse("#12345").is_err());
    }

    #[test]
    fn approx_measurer_scales_with_length() {
        let measurer = ApproxTextMeasurer::default();
        let (short, _) = measurer.measure("ab", 10.0);
        let (long, height) = measurer.measure("abcd", 10.0);
        assert!((long - short * 2.0).abs() < 1e-6);
        assert!((height - 12.0).abs() < 1e-6);
    }
}
