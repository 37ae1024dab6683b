//! Per-call show parameters and dismissal outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::SizeOverride;

/// Overrides for a single `show()` call. Unset fields fall back to config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationRequest {
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl AnimationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn remote(mut self, remote: bool) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn size_override(&self) -> SizeOverride {
        SizeOverride {
            width: self.width,
            height: self.height,
        }
    }
}

/// What ended a show-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HideTrigger {
    Manual,
    Tap,
    Timeout,
    AnimationEnd,
    PageLoaded,
    Shutdown,
}

impl fmt::Display for HideTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HideTrigger::Manual => "manual hide",
            HideTrigger::Tap => "tap",
            HideTrigger::Timeout => "hide timeout",
            HideTrigger::AnimationEnd => "animation end",
            HideTrigger::PageLoaded => "page loaded",
            HideTrigger::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

/// Resolution value of a `show()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub trigger: HideTrigger,
    pub cycle: u64,
}
