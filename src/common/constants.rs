//! Application-wide defaults and limits.

use std::time::Duration;

// # Configuration keys
//
// Names follow the plugin configuration block (`plugins.LottieSplashscreen`)
// so capacitor.config.json files can be read unchanged.

pub const PLUGIN_CONFIG_SECTION: &str = "LottieSplashscreen";
pub const KEY_ANIMATION_LOCATION: &str = "LottieAnimationLocation";
pub const KEY_BACKGROUND_COLOR: &str = "LottieBackgroundColor";
pub const KEY_IMAGES_LOCATION: &str = "LottieImagesLocation";
pub const KEY_SCALE_TYPE: &str = "LottieScaleType";
pub const KEY_WIDTH: &str = "LottieWidth";
pub const KEY_HEIGHT: &str = "LottieHeight";
pub const KEY_HIDE_TIMEOUT: &str = "LottieHideTimeout";
pub const KEY_FADE_OUT_DURATION: &str = "LottieFadeOutDuration";

pub const LIGHT_SUFFIX: &str = "Light";
pub const DARK_SUFFIX: &str = "Dark";

// # Defaults

pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
pub const DEFAULT_SCALE_TYPE: &str = "FIT_CENTER";
pub const DEFAULT_FIXED_WIDTH: f64 = 200.0;
pub const DEFAULT_FIXED_HEIGHT: f64 = 200.0;
pub const DEFAULT_RELATIVE_WIDTH: f64 = 0.2;
pub const DEFAULT_RELATIVE_HEIGHT: f64 = 0.2;
pub const DEFAULT_HIDE_TIMEOUT_MS: f64 = 0.0;
pub const DEFAULT_FADE_OUT_DURATION_MS: f64 = 0.0;

/// Cache key prefixes handed to the renderer.
pub const REMOTE_CACHE_PREFIX: &str = "url_";
pub const LOCAL_CACHE_PREFIX: &str = "asset_";

// # Limits

/// Longest accepted hide timeout or fade duration (10 minutes).
pub const MAXIMUM_DURATION_MS: f64 = 600_000.0;
pub const MINIMUM_FRACTION: f64 = 0.0;
pub const MAXIMUM_FRACTION: f64 = 1.0;

// # Runtime

/// Interval between opacity updates while fading out (~60 fps).
pub const FADE_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Granularity of the headless renderer's playback clock.
pub const HEADLESS_TICK: Duration = Duration::from_millis(10);

/// Playback length assumed when an animation file carries no timing header.
pub const HEADLESS_FALLBACK_DURATION: Duration = Duration::from_secs(2);

pub const DEFAULT_PREVIEW_SCREEN: (f64, f64) = (1080.0, 1920.0);

/// How often `preview` checks for process signals while the splash is up.
pub const PREVIEW_POLL_INTERVAL: Duration = Duration::from_millis(50);

// # Files

pub const CONFIG_DIR_NAME: &str = "lottie-splash";
pub const CONFIG_FILE_NAME: &str = "lottie-splash.toml";
pub const ASSET_ROOT_ENV: &str = "LOTTIE_SPLASH_ASSETS";
pub const THEME_ENV: &str = "LOTTIE_SPLASH_THEME";

pub const EXIT_FAILURE: i32 = 1;
