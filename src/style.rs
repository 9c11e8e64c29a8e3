//! Day and night color themes.

use crate::render::Color;

/// Which palette is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    /// Light background (default).
    #[default]
    Day,
    /// Dark background.
    Night,
}

impl ThemeMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Day => Self::Night,
            Self::Night => Self::Day,
        }
    }
}

/// Visual theme for charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Canvas background.
    pub background: Color,
    /// Horizontal grid lines.
    pub grid: Color,
    /// Axis label text.
    pub axis_text: Color,
    /// Primary text (title, info box header, button labels).
    pub text: Color,
    /// Mini-map frame border and handles.
    pub frame: Color,
    /// Overlay dimming the mini-map outside the frame.
    pub fade: Color,
    /// Info box border.
    pub info_border: Color,
    /// Info box shadow.
    pub info_shadow: Color,
    /// Vertical marker line at the selected sample.
    pub marker_line: Color,
    /// Series toggle button outline.
    pub button_border: Color,
    /// Check mark inside a visible series button.
    pub check: Color,
}

impl Theme {
    /// Create the default (day) theme.
    pub fn new() -> Self {
        Self::day()
    }

    /// Light theme.
    pub fn day() -> Self {
        Self {
            background: Color::WHITE,
            grid: Color::rgba8(242, 244, 245, 1.0),
            axis_text: Color::rgba8(150, 162, 170, 1.0),
            text: Color::BLACK,
            frame: Color::rgba8(221, 234, 243, 1.0),
            fade: Color::rgba8(245, 249, 251, 0.8),
            info_border: Color::rgba8(150, 162, 170, 0.5),
            info_shadow: Color::rgba8(0, 0, 0, 0.3),
            marker_line: Color::rgba8(150, 162, 170, 0.5),
            button_border: Color::rgba8(150, 162, 170, 0.7),
            check: Color::WHITE,
        }
    }

    /// Dark theme.
    pub fn night() -> Self {
        Self {
            background: Color::rgba8(36, 47, 62, 1.0),
            grid: Color::rgba8(41, 53, 68, 1.0),
            axis_text: Color::rgba8(84, 103, 120, 1.0),
            text: Color::WHITE,
            frame: Color::rgba8(58, 78, 98, 1.0),
            fade: Color::rgba8(25, 33, 42, 0.6),
            info_border: Color::rgba8(84, 103, 120, 0.8),
            info_shadow: Color::rgba8(0, 0, 0, 1.0),
            marker_line: Color::rgba8(84, 103, 120, 0.8),
            button_border: Color::rgba8(84, 103, 120, 0.7),
            check: Color::WHITE,
        }
    }

    /// Theme for a mode.
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Day => Self::day(),
            ThemeMode::Night => Self::night(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}
