//! # lottie-splash
//!
//! Lifecycle controller for a Lottie animation splash overlay.
//!
//! The library exists so the controller can be embedded in a host application
//! and driven from tests, with the `lottie-splash` binary as a thin CLI around
//! it for checking configs and previewing the lifecycle in a terminal.
//!
//! ## Architecture
//!
//! - **Entry Point**: [`Splashscreen`] and its builder own the controller thread
//! - **Configuration**: `config` loads TOML/JSON settings and resolves them per
//!   presentation mode into a [`SplashscreenConfig`]
//! - **Lifecycle**: `core` holds the state machine, timers and fade-out
//! - **Rendering**: `render` defines the adapter seam plus a headless adapter
//! - **Support**: `geometry`, `source`, `events`, `theme`, `signals`, logging

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

pub mod args;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod geometry;
pub mod render;
pub mod signals;
pub mod source;
pub mod splashscreen;
pub mod theme;

pub use config::{Config, DurationUnit, Layout, ScaleType, SplashscreenConfig};
pub use core::{AnimationRequest, CallHandle, Dismissal, HideTrigger};
pub use error::SplashError;
pub use events::{LottieEvent, LottieEventKind, SubscriptionId};
pub use splashscreen::{Splashscreen, SplashscreenBuilder};
pub use theme::PresentationMode;
