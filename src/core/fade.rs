//! Opacity fade-out driven by the controller's frame deadlines.
//!
//! Opacity follows an accelerate-decelerate curve from 1.0 to 0.0 and is
//! never allowed to increase between frames.

use std::time::{Duration, Instant};

use crate::common::constants::FADE_FRAME_INTERVAL;
use crate::common::utils::{ease_accelerate_decelerate, interpolate_f32};

#[derive(Debug, Clone, PartialEq)]
pub struct FadeOut {
    started: Instant,
    duration: Duration,
    next_frame: Instant,
    last_opacity: f32,
}

impl FadeOut {
    pub fn start(now: Instant, duration: Duration) -> Self {
        Self {
            started: now,
            duration,
            next_frame: now,
            last_opacity: 1.0,
        }
    }

    pub fn next_frame(&self) -> Instant {
        self.next_frame
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    /// Opacity for `now`, scheduling the following frame.
    pub fn step(&mut self, now: Instant) -> f32 {
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            now.saturating_duration_since(self.started).as_secs_f32()
                / self.duration.as_secs_f32()
        };

        let opacity = if progress >= 1.0 {
            0.0
        } else {
            interpolate_f32(1.0, 0.0, ease_accelerate_decelerate(progress))
        };

        self.last_opacity = opacity.min(self.last_opacity);
        self.next_frame = now + FADE_FRAME_INTERVAL;
        self.last_opacity
    }

    pub fn is_finished(&self) -> bool {
        self.last_opacity <= 0.0
    }

    pub fn opacity(&self) -> f32 {
        self.last_opacity
    }
}
