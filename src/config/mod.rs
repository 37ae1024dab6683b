//! Configuration system for the Lottie splash overlay.
//!
//! Options are read either from a TOML file in the XDG config directory or from
//! a Capacitor-style JSON document, where they live under
//! `plugins.LottieSplashscreen`. Keys use the plugin names (`LottieHideTimeout`)
//! and TOML files may use snake_case aliases (`hide_timeout`):
//!
//! ```toml
//! #[Animation]
//! animation_location = "splash/logo.json"  # Local asset path or URL
//! animation_location_dark = ""             # Dark-mode override (blank = use default)
//! remote_enabled = false                   # Treat the location as a URL
//! loop_animation = false                   # Repeat until hidden
//!
//! #[Overlay]
//! background_color = "#ffffff"             # #RRGGBB or #RRGGBBAA
//! full_screen = false
//! relative_size = false                    # Width/height are screen fractions
//! width = 200
//! height = 200
//!
//! #[Dismissal]
//! hide_timeout = 0                         # Milliseconds, 0 = never
//! fade_out_duration = 0                    # Milliseconds, 0 = instant
//! cancel_on_tap = false
//! auto_hide_splash_screen = false          # Hide on page-ready
//! hide_after_animation_end = false
//! ```
//!
//! Missing options are never an error: every option has a documented default.
//! Malformed values surface as [`SplashError::Configuration`] when the
//! per-cycle [`SplashscreenConfig`] snapshot is resolved.

pub mod builder;
pub mod color;
pub mod loading;
pub mod resolver;
pub mod validation;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::common::constants::*;
use crate::error::SplashError;

pub use builder::{ConfigBuilder, create_default_config};
pub use color::Rgba;
pub use loading::{
    from_json_str, from_toml_str, get_config_path, get_custom_config_dir, load, load_from_path,
    set_config_dir,
};
pub use resolver::ConfigResolver;

/// A dimension option that accepts both `200` and `"200"`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ConfigNumber {
    Number(f64),
    Text(String),
}

impl ConfigNumber {
    /// Numeric value, failing with a configuration error for unparseable text.
    pub fn as_f64(&self, key: &str) -> Result<f64, SplashError> {
        match self {
            ConfigNumber::Number(value) => Ok(*value),
            ConfigNumber::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| SplashError::configuration(key, format!("'{text}' is not a number"))),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, ConfigNumber::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for ConfigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigNumber::Number(value) => write!(f, "{value}"),
            ConfigNumber::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Raw plugin configuration, every option optional.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(rename = "LottieRemoteEnabled", alias = "remote_enabled")]
    pub remote_enabled: Option<bool>,

    #[serde(rename = "LottieAnimationLocation", alias = "animation_location")]
    pub animation_location: Option<String>,
    #[serde(rename = "LottieAnimationLocationLight", alias = "animation_location_light")]
    pub animation_location_light: Option<String>,
    #[serde(rename = "LottieAnimationLocationDark", alias = "animation_location_dark")]
    pub animation_location_dark: Option<String>,

    #[serde(rename = "LottieScaleType", alias = "scale_type")]
    pub scale_type: Option<String>,
    #[serde(rename = "LottieImagesLocation", alias = "images_location")]
    pub images_location: Option<String>,
    #[serde(rename = "LottieCancelOnTap", alias = "cancel_on_tap")]
    pub cancel_on_tap: Option<bool>,
    #[serde(rename = "LottieHideTimeout", alias = "hide_timeout")]
    pub hide_timeout: Option<f64>, // milliseconds unless normalized from seconds

    #[serde(rename = "LottieBackgroundColor", alias = "background_color")]
    pub background_color: Option<String>,
    #[serde(rename = "LottieBackgroundColorLight", alias = "background_color_light")]
    pub background_color_light: Option<String>,
    #[serde(rename = "LottieBackgroundColorDark", alias = "background_color_dark")]
    pub background_color_dark: Option<String>,

    #[serde(rename = "LottieWidth", alias = "width", alias = "lottieWidth")]
    pub width: Option<ConfigNumber>,
    #[serde(rename = "LottieHeight", alias = "height", alias = "lottieHeight")]
    pub height: Option<ConfigNumber>,
    #[serde(rename = "LottieRelativeSize", alias = "relative_size")]
    pub relative_size: Option<bool>,
    #[serde(rename = "LottieFullScreen", alias = "full_screen")]
    pub full_screen: Option<bool>,

    #[serde(rename = "LottieLoopAnimation", alias = "loop_animation")]
    pub loop_animation: Option<bool>,
    #[serde(rename = "LottieAutoHideSplashScreen", alias = "auto_hide_splash_screen")]
    pub auto_hide_splash_screen: Option<bool>,
    #[serde(
        rename = "LottieEnableHardwareAcceleration",
        alias = "enable_hardware_acceleration"
    )]
    pub enable_hardware_acceleration: Option<bool>,
    #[serde(rename = "LottieFadeOutDuration", alias = "fade_out_duration")]
    pub fade_out_duration: Option<f64>, // milliseconds unless normalized from seconds
    #[serde(rename = "LottieHideAfterAnimationEnd", alias = "hide_after_animation_end")]
    pub hide_after_animation_end: Option<bool>,
    #[serde(rename = "LottieCacheDisabled", alias = "cache_disabled")]
    pub cache_disabled: Option<bool>,
    #[serde(rename = "LottieEnableMergePaths", alias = "enable_merge_paths")]
    pub enable_merge_paths: Option<bool>,
}

/// Unit the host platform used for duration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Milliseconds,
    Seconds,
}

impl Config {
    /// Look up a string-valued option by its plugin name, including the
    /// `Light`/`Dark` variants of themed options.
    pub fn string_option(&self, key: &str) -> Option<String> {
        let value = match key {
            "LottieAnimationLocation" => &self.animation_location,
            "LottieAnimationLocationLight" => &self.animation_location_light,
            "LottieAnimationLocationDark" => &self.animation_location_dark,
            "LottieBackgroundColor" => &self.background_color,
            "LottieBackgroundColorLight" => &self.background_color_light,
            "LottieBackgroundColorDark" => &self.background_color_dark,
            "LottieScaleType" => &self.scale_type,
            "LottieImagesLocation" => &self.images_location,
            "LottieWidth" => return self.width.as_ref().map(ToString::to_string),
            "LottieHeight" => return self.height.as_ref().map(ToString::to_string),
            _ => return None,
        };
        value.clone()
    }

    /// Bring duration options to milliseconds.
    pub fn normalize_durations(&mut self, unit: DurationUnit) {
        if unit == DurationUnit::Seconds {
            self.hide_timeout = self.hide_timeout.map(|secs| secs * 1000.0);
            self.fade_out_duration = self.fade_out_duration.map(|secs| secs * 1000.0);
        }
    }

    /// Blank dimension strings count as unset.
    pub(crate) fn dimension(&self, key: &str) -> Option<&ConfigNumber> {
        let value = match key {
            KEY_WIDTH => self.width.as_ref(),
            KEY_HEIGHT => self.height.as_ref(),
            _ => None,
        };
        value.filter(|number| !number.is_blank())
    }

    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load from path using the module's load_from_path function
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    /// Get configuration path using the module's get_config_path function
    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    pub fn log_config(&self, source: &str) {
        log_block_start!("Loaded {}", source);

        let location = self
            .animation_location
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or("(not configured)");
        let origin = if self.remote_enabled.unwrap_or(false) {
            "remote"
        } else {
            "local"
        };
        log_indented!("Animation: {} ({})", location, origin);

        for (label, value) in [
            ("Light", &self.animation_location_light),
            ("Dark", &self.animation_location_dark),
        ] {
            if let Some(value) = value
                && !value.trim().is_empty()
            {
                log_indented!("Animation ({}): {}", label, value);
            }
        }

        log_indented!(
            "Background: {}",
            self.background_color
                .as_deref()
                .unwrap_or(DEFAULT_BACKGROUND_COLOR)
        );

        let layout = if self.full_screen.unwrap_or(false) {
            "fullscreen".to_string()
        } else if self.relative_size.unwrap_or(false) {
            format!(
                "{} x {} of the screen",
                self.width
                    .as_ref()
                    .map_or(DEFAULT_RELATIVE_WIDTH.to_string(), ToString::to_string),
                self.height
                    .as_ref()
                    .map_or(DEFAULT_RELATIVE_HEIGHT.to_string(), ToString::to_string)
            )
        } else {
            format!(
                "{} x {} px",
                self.width
                    .as_ref()
                    .map_or(DEFAULT_FIXED_WIDTH.to_string(), ToString::to_string),
                self.height
                    .as_ref()
                    .map_or(DEFAULT_FIXED_HEIGHT.to_string(), ToString::to_string)
            )
        };
        log_indented!("Layout: {}", layout);

        let hide_timeout = self.hide_timeout.unwrap_or(DEFAULT_HIDE_TIMEOUT_MS);
        if hide_timeout > 0.0 {
            log_indented!("Hide timeout: {}ms", hide_timeout);
        }
        let fade = self.fade_out_duration.unwrap_or(DEFAULT_FADE_OUT_DURATION_MS);
        if fade > 0.0 {
            log_indented!("Fade out: {}ms", fade);
        }

        let triggers: Vec<&str> = [
            (self.cancel_on_tap, "tap"),
            (self.auto_hide_splash_screen, "page ready"),
            (self.hide_after_animation_end, "animation end"),
        ]
        .iter()
        .filter(|(enabled, _)| enabled.unwrap_or(false))
        .map(|(_, name)| *name)
        .collect();
        if !triggers.is_empty() {
            log_indented!("Auto-hide on: {}", triggers.join(", "));
        }
    }
}

/// How the renderer fits the animation into the overlay frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleType {
    Matrix,
    FitXy,
    FitStart,
    #[default]
    FitCenter,
    FitEnd,
    Center,
    CenterCrop,
    CenterInside,
}

impl ScaleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleType::Matrix => "MATRIX",
            ScaleType::FitXy => "FIT_XY",
            ScaleType::FitStart => "FIT_START",
            ScaleType::FitCenter => "FIT_CENTER",
            ScaleType::FitEnd => "FIT_END",
            ScaleType::Center => "CENTER",
            ScaleType::CenterCrop => "CENTER_CROP",
            ScaleType::CenterInside => "CENTER_INSIDE",
        }
    }
}

impl FromStr for ScaleType {
    type Err = SplashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MATRIX" => Ok(ScaleType::Matrix),
            "FIT_XY" => Ok(ScaleType::FitXy),
            "FIT_START" => Ok(ScaleType::FitStart),
            "FIT_CENTER" => Ok(ScaleType::FitCenter),
            "FIT_END" => Ok(ScaleType::FitEnd),
            "CENTER" => Ok(ScaleType::Center),
            "CENTER_CROP" => Ok(ScaleType::CenterCrop),
            "CENTER_INSIDE" => Ok(ScaleType::CenterInside),
            other => Err(SplashError::configuration(
                KEY_SCALE_TYPE,
                format!("unknown scale type '{other}'"),
            )),
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overlay sizing mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    FullScreen,
    /// Explicit pixels.
    Fixed { width: f64, height: f64 },
    /// Fractions of the screen in `[0, 1]`.
    Relative { width: f64, height: f64 },
}

/// Immutable snapshot of the settings a single show-cycle runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct SplashscreenConfig {
    pub animation_location: String,
    pub remote_enabled: bool,
    pub cache_disabled: bool,
    pub background_color: Rgba,
    pub layout: Layout,
    pub loop_animation: bool,
    pub cancel_on_tap: bool,
    pub auto_hide_on_page_load: bool,
    pub hide_after_animation_end: bool,
    /// `Duration::ZERO` disables the timer.
    pub hide_timeout: Duration,
    /// `Duration::ZERO` hides without fading.
    pub fade_out_duration: Duration,
    pub scale_type: ScaleType,
    pub images_location: Option<String>,
    pub hardware_acceleration: bool,
    pub merge_paths: bool,
}
