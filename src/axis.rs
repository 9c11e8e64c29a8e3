//! Axis tick planning: round-number value ticks and calendar date ticks.

use crate::calendar::{self, DAY_MS, HOUR_MS, WEEK_MS};
use crate::config::ChartStyle;
use crate::series::SeriesStore;
use crate::transform::AxisScaler;

/// Step between consecutive date ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// One hour.
    Hour,
    /// One day.
    Day,
    /// Seven days.
    Week,
    /// Fourteen days.
    TwoWeeks,
    /// One calendar month.
    Month,
    /// Two calendar months.
    TwoMonths,
    /// Three calendar months.
    ThreeMonths,
    /// Six calendar months.
    SixMonths,
    /// One or more calendar years.
    Years(u32),
}

const SEQUENCE: [Granularity; 9] = [
    Granularity::Hour,
    Granularity::Day,
    Granularity::Week,
    Granularity::TwoWeeks,
    Granularity::Month,
    Granularity::TwoMonths,
    Granularity::ThreeMonths,
    Granularity::SixMonths,
    Granularity::Years(1),
];

const NOMINAL_MONTH_MS: i64 = 29 * DAY_MS;
const NOMINAL_YEAR_MS: i64 = 365 * DAY_MS;

impl Granularity {
    /// Nominal length used for selection and snapping.
    pub fn nominal_ms(self) -> i64 {
        match self {
            Self::Hour => HOUR_MS,
            Self::Day => DAY_MS,
            Self::Week => WEEK_MS,
            Self::TwoWeeks => 2 * WEEK_MS,
            Self::Month => NOMINAL_MONTH_MS,
            Self::TwoMonths => 2 * NOMINAL_MONTH_MS,
            Self::ThreeMonths => 3 * NOMINAL_MONTH_MS,
            Self::SixMonths => 6 * NOMINAL_MONTH_MS,
            Self::Years(years) => years.max(1) as i64 * NOMINAL_YEAR_MS,
        }
    }

    /// Finest granularity yielding at most `count` steps over `range_ms`.
    pub fn select(range_ms: i64, count: usize) -> Self {
        let range_ms = range_ms.max(0);
        let count = count as i64;
        if let Some(found) = SEQUENCE
            .into_iter()
            .find(|granularity| range_ms / granularity.nominal_ms() <= count)
        {
            return found;
        }
        let years = range_ms / NOMINAL_YEAR_MS;
        let per_tick = (years + count.max(1) - 1) / count.max(1);
        Self::Years(per_tick.clamp(2, u32::MAX as i64) as u32)
    }

    /// Advance a tick timestamp by one step.
    pub fn advance(self, timestamp_ms: i64) -> Option<i64> {
        match self {
            Self::Hour | Self::Day | Self::Week | Self::TwoWeeks => {
                timestamp_ms.checked_add(self.nominal_ms())
            }
            Self::Month => calendar::add_month(timestamp_ms),
            Self::TwoMonths => repeat(timestamp_ms, 2, calendar::add_month),
            Self::ThreeMonths => repeat(timestamp_ms, 3, calendar::add_month),
            Self::SixMonths => repeat(timestamp_ms, 6, calendar::add_month),
            Self::Years(years) => repeat(timestamp_ms, years.max(1), calendar::add_year),
        }
    }

    /// Format a tick label at this granularity.
    pub fn label(self, timestamp_ms: i64) -> String {
        match self {
            Self::Hour => calendar::hour_label(timestamp_ms),
            _ => calendar::day_label(timestamp_ms),
        }
    }
}

fn repeat(timestamp_ms: i64, times: u32, step: fn(i64) -> Option<i64>) -> Option<i64> {
    (0..times).try_fold(timestamp_ms, |current, _| step(current))
}

/// A value axis tick that survived collision filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTick {
    /// Tick value.
    pub value: f64,
    /// Pixel Y of the grid line.
    pub y: f32,
    /// Formatted label.
    pub label: String,
}

/// A date axis tick matched to a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DateTick {
    /// Tick timestamp as planned.
    pub timestamp: i64,
    /// Index of the sample the tick snapped to.
    pub index: usize,
    /// Formatted label.
    pub label: String,
}

/// Plans ticks for both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlanner {
    y_tick_count: usize,
    font_height: f32,
    label_placeholder: f32,
    horizontal_insets: f32,
}

impl TickPlanner {
    /// Create a planner from the tick count and layout constants.
    pub fn new(y_tick_count: usize, style: &ChartStyle) -> Self {
        Self {
            y_tick_count: y_tick_count.max(2),
            font_height: style.axis_font_size,
            label_placeholder: style.axis_label_placeholder,
            horizontal_insets: style.left_padding + style.right_padding,
        }
    }

    /// Number of value tick candidates.
    pub fn y_tick_count(&self) -> usize {
        self.y_tick_count
    }

    /// Round step between value ticks for `max`.
    pub fn value_step(max: f64, count: usize) -> f64 {
        let raw = max / (count.max(2) - 1) as f64;
        if !raw.is_finite() || raw <= 0.0 {
            return 1.0;
        }
        let magnitude = 10_f64.powf((raw.log10() - 1.0).ceil());
        (raw / magnitude).ceil() * magnitude
    }

    /// Value ticks over the scaler's range, minus those colliding with the
    /// baseline labels or clipping at the top.
    pub fn value_ticks(&self, scaler: &AxisScaler) -> Vec<ValueTick> {
        let step = Self::value_step(scaler.max(), self.y_tick_count);
        let decimals = (-step.log10().floor()).max(0.0) as usize;
        let floor = scaler.baseline() - self.font_height;
        let ceiling = self.font_height + 1.0;
        (0..self.y_tick_count)
            .filter_map(|i| {
                let value = step * i as f64;
                let y = scaler.y(value);
                (y < floor && y > ceiling).then(|| ValueTick {
                    value,
                    y,
                    label: format_value(value, decimals),
                })
            })
            .collect()
    }

    /// Number of date labels that fit in `width`.
    pub fn x_tick_count(&self, width: f32) -> usize {
        let usable = (width - self.horizontal_insets).max(0.0);
        if self.label_placeholder <= 0.0 {
            return 1;
        }
        ((usable / self.label_placeholder).ceil() as usize).max(1)
    }

    /// Tick timestamps from `start_ms` to `end_ms`, at most `count + 1`.
    pub fn date_ticks_between(
        start_ms: i64,
        end_ms: i64,
        count: usize,
    ) -> (Granularity, Vec<i64>) {
        let granularity = Granularity::select(end_ms.saturating_sub(start_ms), count);
        let mut ticks = Vec::new();
        let mut current = Some(start_ms);
        while let Some(tick) = current
            && tick <= end_ms
            && ticks.len() <= count
        {
            ticks.push(tick);
            current = granularity.advance(tick);
        }
        (granularity, ticks)
    }

    /// Date ticks for `start..=end` of `store`, snapped to samples.
    ///
    /// A tick is dropped when its nearest sample is more than half a step
    /// away; ticks snapping to the same sample are kept once.
    pub fn date_ticks(
        &self,
        store: &SeriesStore,
        start: usize,
        end: usize,
        width: f32,
    ) -> Vec<DateTick> {
        let (Some(start_ms), Some(end_ms)) = (store.timestamp(start), store.timestamp(end)) else {
            return Vec::new();
        };
        let (granularity, timestamps) =
            Self::date_ticks_between(start_ms, end_ms, self.x_tick_count(width));
        let tolerance = granularity.nominal_ms() / 2;
        let mut ticks: Vec<DateTick> = Vec::with_capacity(timestamps.len());
        for timestamp in timestamps {
            let index = store.nearest_index(timestamp).clamp(start, end);
            let Some(sample) = store.timestamp(index) else {
                continue;
            };
            if sample.saturating_sub(timestamp).saturating_abs() > tolerance {
                continue;
            }
            if ticks.last().is_some_and(|last| last.index == index) {
                continue;
            }
            ticks.push(DateTick {
                timestamp,
                index,
                label: granularity.label(sample),
            });
        }
        ticks
    }
}

fn format_value(value: f64, decimals: usize) -> String {
    if decimals == 0 {
        return format!("{}", value.round() as i64);
    }
    let text = format!("{value:.decimals$}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Color;
    use crate::series::Column;

    fn daily_store(days: usize, start_ms: i64) -> SeriesStore {
        let timestamps = (0..days as i64).map(|day| start_ms + day * DAY_MS).collect();
        let values = (0..days).map(|value| value as f64).collect();
        SeriesStore::new("x", timestamps, vec![Column::new("y0", "a", Color::BLACK, values)])
            .expect("valid store")
    }

    #[test]
    fn value_step_is_round() {
        assert_eq!(TickPlanner::value_step(99.0, 10), 20.0);
        assert_eq!(TickPlanner::value_step(50.0, 10), 6.0);
        assert_eq!(TickPlanner::value_step(1000.0, 6), 200.0);
        assert_eq!(TickPlanner::value_step(0.0, 10), 1.0);
    }

    #[test]
    fn value_ticks_are_evenly_spaced_and_skip_baseline() {
        let style = ChartStyle::default();
        let scaler = AxisScaler::chart(400.0, 500.0, &style, 12.0, 0, 99, 99.0);
        let ticks = TickPlanner::new(10, &style).value_ticks(&scaler);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|tick| tick.value > 0.0));
        let gaps: Vec<f32> = ticks.windows(2).map(|pair| pair[0].y - pair[1].y).collect();
        assert!(gaps.windows(2).all(|pair| (pair[0] - pair[1]).abs() < 1e-3));
        assert!(ticks.iter().all(|tick| tick.y > style.axis_font_size + 1.0));
        assert_eq!(ticks[0].label, "20");
    }

    #[test]
    fn selects_granularity_by_range() {
        assert_eq!(Granularity::select(5 * HOUR_MS, 6), Granularity::Hour);
        assert_eq!(Granularity::select(5 * DAY_MS, 6), Granularity::Day);
        assert_eq!(Granularity::select(30 * DAY_MS, 6), Granularity::Week);
        assert_eq!(Granularity::select(84 * DAY_MS, 6), Granularity::TwoWeeks);
        assert_eq!(Granularity::select(180 * DAY_MS, 6), Granularity::Month);
        assert_eq!(Granularity::select(5 * 365 * DAY_MS, 6), Granularity::Years(1));
        assert_eq!(Granularity::select(20 * 365 * DAY_MS, 6), Granularity::Years(4));
    }

    #[test]
    fn date_ticks_stay_in_range_and_are_bounded() {
        let start = 1_577_836_800_000; // 2020-01-01
        let end = start + 400 * DAY_MS;
        for count in [1, 3, 6, 12] {
            let (_, ticks) = TickPlanner::date_ticks_between(start, end, count);
            assert!(ticks.len() <= count + 1);
            assert!(ticks.iter().all(|&tick| (start..=end).contains(&tick)));
            assert!(ticks.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn extreme_spans_do_not_overflow() {
        let (granularity, ticks) = TickPlanner::date_ticks_between(i64::MIN, i64::MAX, 6);
        assert!(matches!(granularity, Granularity::Years(_)));
        assert!(ticks.len() <= 7);
        let (_, ticks) = TickPlanner::date_ticks_between(10, 0, 6);
        assert!(ticks.is_empty());
    }

    #[test]
    fn monthly_ticks_follow_calendar() {
        let start = 1_577_836_800_000; // 2020-01-01
        let (granularity, ticks) = TickPlanner::date_ticks_between(start, start + 180 * DAY_MS, 6);
        assert_eq!(granularity, Granularity::Month);
        let labels: Vec<String> = ticks.iter().map(|&tick| calendar::day_label(tick)).collect();
        assert_eq!(labels, ["Jan 1", "Feb 1", "Mar 1", "Apr 1", "May 1", "Jun 1"]);
    }

    #[test]
    fn date_ticks_snap_to_samples() {
        let store = daily_store(100, 1_542_412_800_000);
        let planner = TickPlanner::new(10, &ChartStyle::default());
        let ticks = planner.date_ticks(&store, 0, 99, 500.0);
        assert!(!ticks.is_empty());
        assert_eq!(ticks[0].index, 0);
        assert!(ticks.windows(2).all(|pair| pair[0].index < pair[1].index));
        assert!(ticks.iter().all(|tick| tick.index <= 99));
    }

    #[test]
    fn formats_values_without_noise() {
        assert_eq!(format_value(40.0, 0), "40");
        assert_eq!(format_value(0.30000000000000004, 1), "0.3");
    }
}
