//! Viewport state: which index range of a data set is displayed.

/// Which data set the main chart displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// The full overview data set (default).
    #[default]
    Overview,
    /// A detail data set fetched for one clicked timestamp.
    Detail {
        /// Timestamp (milliseconds) the detail was requested for.
        timestamp: i64,
    },
}

impl ViewMode {
    /// Check whether a detail data set is displayed.
    pub fn is_detail(self) -> bool {
        matches!(self, Self::Detail { .. })
    }
}

/// Displayed index range of a data set.
///
/// Invariants: `start < end <= last_index` and `end - start >= min_span`,
/// where `min_span` is the configured minimum clamped to `last_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    start: usize,
    end: usize,
    last_index: usize,
    min_span: usize,
}

impl Viewport {
    /// Create a viewport spanning the whole series `0..=last_index`.
    ///
    /// `last_index` must be at least 1.
    pub fn new(last_index: usize, min_display_positions: usize) -> Self {
        let last_index = last_index.max(1);
        Self {
            start: 0,
            end: last_index,
            last_index,
            min_span: min_display_positions.clamp(1, last_index),
        }
    }

    /// First displayed index.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last displayed index (inclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Highest valid index.
    pub fn last_index(&self) -> usize {
        self.last_index
    }

    /// Minimum distance between start and end.
    pub fn min_span(&self) -> usize {
        self.min_span
    }

    /// Distance between start and end.
    pub fn span(&self) -> usize {
        self.end - self.start
    }

    /// Check whether the viewport covers the whole series.
    pub fn is_full(&self) -> bool {
        self.start == 0 && self.end == self.last_index
    }

    /// Move the start index. Returns true when the viewport changed.
    pub fn set_start(&mut self, start: usize) -> bool {
        if start == self.start || start >= self.end || self.end - start < self.min_span {
            return false;
        }
        self.start = start;
        true
    }

    /// Move the end index. Returns true when the viewport changed.
    pub fn set_end(&mut self, end: usize) -> bool {
        if end == self.end
            || end > self.last_index
            || end <= self.start
            || end - self.start < self.min_span
        {
            return false;
        }
        self.end = end;
        true
    }

    /// Shift both ends by one position, keeping the span.
    ///
    /// Shifting is refused at the edges of the series. Returns true when the
    /// viewport changed.
    pub fn step(&mut self, forward: bool) -> bool {
        if forward {
            if self.end >= self.last_index {
                return false;
            }
            self.start += 1;
            self.end += 1;
        } else {
            if self.start == 0 {
                return false;
            }
            self.start -= 1;
            self.end -= 1;
        }
        true
    }

    /// Check the viewport invariants.
    pub fn is_valid(&self) -> bool {
        self.start < self.end && self.end <= self.last_index && self.span() >= self.min_span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_full_width() {
        let viewport = Viewport::new(99, 10);
        assert_eq!((viewport.start(), viewport.end()), (0, 99));
        assert!(viewport.is_full());
    }

    #[test]
    fn min_span_is_clamped_for_short_series() {
        let viewport = Viewport::new(4, 10);
        assert_eq!(viewport.min_span(), 4);
        assert!(viewport.is_valid());
    }

    #[test]
    fn edges_respect_min_span() {
        let mut viewport = Viewport::new(99, 10);
        assert!(viewport.set_end(50));
        assert!(!viewport.set_start(41));
        assert!(viewport.set_start(40));
        assert!(!viewport.set_end(49));
        assert!(viewport.is_valid());
    }

    #[test]
    fn step_stops_at_series_edges() {
        let mut viewport = Viewport::new(20, 10);
        assert!(viewport.set_end(10));
        assert!(!viewport.step(false));
        for _ in 0..30 {
            viewport.step(true);
        }
        assert_eq!((viewport.start(), viewport.end()), (10, 20));
    }
}
