//! Configuration validation functionality.
//!
//! Hard errors are values no show-cycle could run with (bad colors, unknown
//! scale types, out-of-range sizes or durations). Discouraged but legal
//! combinations only produce warnings.

use anyhow::Result;

use super::Config;
use super::resolver::ConfigResolver;
use crate::common::constants::*;
use crate::core::AnimationRequest;
use crate::source::is_well_formed_url;
use crate::theme::PresentationMode;

/// Validate every value a show-cycle would resolve, in both presentation modes.
pub fn validate_config(config: &Config) -> Result<()> {
    let resolver = ConfigResolver::new(config);
    let request = AnimationRequest::default();

    for mode in [PresentationMode::Light, PresentationMode::Dark] {
        resolver.resolve(mode, &request)?;
    }

    for warning in collect_warnings(config) {
        log_pipe!();
        log_warning!("{}", warning);
    }

    Ok(())
}

/// Discouraged combinations, in a stable order.
pub fn collect_warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();
    let enabled = |flag: Option<bool>| flag.unwrap_or(false);

    if enabled(config.auto_hide_splash_screen) && enabled(config.hide_after_animation_end) {
        warnings.push(
            "LottieAutoHideSplashScreen and LottieHideAfterAnimationEnd are both enabled; \
             whichever fires first hides the overlay"
                .to_string(),
        );
    }

    if enabled(config.loop_animation) && enabled(config.hide_after_animation_end) {
        warnings.push(
            "LottieHideAfterAnimationEnd has no effect while LottieLoopAnimation is enabled"
                .to_string(),
        );
    }

    let resolver = ConfigResolver::new(config);
    let locations: Vec<String> = [PresentationMode::Light, PresentationMode::Dark]
        .iter()
        .map(|mode| resolver.resolve_option(KEY_ANIMATION_LOCATION, *mode, None))
        .collect();

    if locations.iter().all(|location| location.trim().is_empty()) {
        warnings.push(format!(
            "{KEY_ANIMATION_LOCATION} has to be configured before the overlay can be shown"
        ));
    } else if enabled(config.remote_enabled) {
        for location in locations.iter().filter(|l| !l.trim().is_empty()) {
            if !is_well_formed_url(location) {
                warnings.push(format!(
                    "Remote mode is enabled but '{location}' is not a valid URL"
                ));
            }
        }
        warnings.dedup();
    }

    warnings
}
