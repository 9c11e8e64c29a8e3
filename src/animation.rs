//! Animated interpolation of the chart and mini-map value maxima.
//!
//! The animator never sleeps or spawns timers. Starting a job returns one
//! [`FrameTicket`] per step; the host fires each ticket after its delay and
//! hands it back. Tickets carry the generation of the job that issued them,
//! so tickets of a superseded job are ignored.

use std::time::Duration;

use crate::config::AnimationSettings;

/// Value maxima of the main chart and the mini-map.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangePair {
    /// Main chart maximum.
    pub chart: f64,
    /// Mini-map maximum.
    pub minimap: f64,
}

impl RangePair {
    /// Create a pair.
    pub const fn new(chart: f64, minimap: f64) -> Self {
        Self { chart, minimap }
    }

    fn lerp(self, to: Self, t: f64) -> Self {
        Self {
            chart: self.chart + (to.chart - self.chart) * t,
            minimap: self.minimap + (to.minimap - self.minimap) * t,
        }
    }
}

/// A scheduled animation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    /// Generation of the job that issued the ticket.
    pub generation: u64,
    /// Zero-based step index.
    pub step: u32,
    /// Delay after the job started at which the step is due.
    pub delay: Duration,
}

/// An in-flight interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationJob {
    /// Values displayed when the job started.
    pub from: RangePair,
    /// Target values.
    pub to: RangePair,
    /// Number of steps.
    pub iterations: u32,
    /// Steps applied so far.
    pub elapsed: u32,
}

impl AnimationJob {
    /// Values displayed after `step`.
    pub fn value_at(&self, step: u32) -> RangePair {
        let iterations = self.iterations.max(1);
        let t = (step + 1).min(iterations) as f64 / iterations as f64;
        self.from.lerp(self.to, t)
    }
}

/// Interpolates the displayed maxima towards their targets.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeAnimator {
    generation: u64,
    displayed: RangePair,
    job: Option<AnimationJob>,
}

impl RangeAnimator {
    /// Create an animator already showing `initial`.
    pub fn new(initial: RangePair) -> Self {
        Self {
            generation: 0,
            displayed: initial,
            job: None,
        }
    }

    /// Values to draw now.
    pub fn displayed(&self) -> RangePair {
        self.displayed
    }

    /// Generation of the current (or last) job.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Job in flight, if any.
    pub fn job(&self) -> Option<&AnimationJob> {
        self.job.as_ref()
    }

    /// Check whether a job is in flight.
    pub fn is_animating(&self) -> bool {
        self.job.is_some()
    }

    /// Start animating from the displayed values towards `target`.
    ///
    /// Returns the tickets to schedule. When nothing needs to move the list
    /// is empty and the caller redraws once.
    pub fn animate_to(
        &mut self,
        target: RangePair,
        settings: AnimationSettings,
    ) -> Vec<FrameTicket> {
        self.generation = self.generation.wrapping_add(1);
        if target == self.displayed || settings.iterations == 0 {
            self.displayed = target;
            self.job = None;
            return Vec::new();
        }
        self.job = Some(AnimationJob {
            from: self.displayed,
            to: target,
            iterations: settings.iterations,
            elapsed: 0,
        });
        tracing::trace!(
            generation = self.generation,
            from = ?self.displayed,
            to = ?target,
            iterations = settings.iterations,
            "animation started"
        );
        (0..settings.iterations)
            .map(|step| FrameTicket {
                generation: self.generation,
                step,
                delay: settings.step_delay * step,
            })
            .collect()
    }

    /// Apply a due ticket. Returns true when the displayed values changed.
    pub fn on_frame(&mut self, ticket: FrameTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        let Some(job) = self.job.as_mut() else {
            return false;
        };
        if ticket.step < job.elapsed || ticket.step >= job.iterations {
            return false;
        }
        job.elapsed = ticket.step + 1;
        if job.elapsed >= job.iterations {
            self.displayed = job.to;
            self.job = None;
        } else {
            self.displayed = job.value_at(ticket.step);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: AnimationSettings = AnimationSettings {
        iterations: 4,
        step_delay: Duration::from_millis(10),
    };

    #[test]
    fn equal_target_needs_no_job() {
        let mut animator = RangeAnimator::new(RangePair::new(10.0, 20.0));
        assert!(animator.animate_to(RangePair::new(10.0, 20.0), SETTINGS).is_empty());
        assert!(!animator.is_animating());
    }

    #[test]
    fn steps_interpolate_linearly() {
        let mut animator = RangeAnimator::new(RangePair::new(0.0, 100.0));
        let tickets = animator.animate_to(RangePair::new(40.0, 100.0), SETTINGS);
        assert_eq!(tickets.len(), 4);
        assert_eq!(tickets[3].delay, Duration::from_millis(30));
        assert!(animator.on_frame(tickets[0]));
        assert_eq!(animator.displayed(), RangePair::new(10.0, 100.0));
        for ticket in &tickets[1..] {
            assert!(animator.on_frame(*ticket));
        }
        assert_eq!(animator.displayed(), RangePair::new(40.0, 100.0));
        assert!(!animator.is_animating());
    }

    #[test]
    fn stale_tickets_are_ignored() {
        let mut animator = RangeAnimator::new(RangePair::new(0.0, 0.0));
        let old = animator.animate_to(RangePair::new(100.0, 0.0), SETTINGS);
        assert!(animator.on_frame(old[0]));
        assert_eq!(animator.displayed().chart, 25.0);

        let new = animator.animate_to(RangePair::new(5.0, 0.0), SETTINGS);
        assert!(!animator.on_frame(old[1]));
        assert_eq!(animator.displayed().chart, 25.0);
        assert_eq!(animator.job().map(|job| job.from.chart), Some(25.0));
        assert!(animator.on_frame(new[0]));
        assert_eq!(animator.displayed().chart, 20.0);
    }
}
