//! Implementation of the check command.
//!
//! Loads a configuration, then resolves it for both presentation modes the
//! same way a show-cycle would: source classification and the overlay frame
//! on a preview-sized screen. Nothing is rendered.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::common::constants::DEFAULT_PREVIEW_SCREEN;
use crate::common::utils::private_path;
use crate::config::{ConfigResolver, SplashscreenConfig};
use crate::core::AnimationRequest;
use crate::geometry::{ScreenBounds, SizeOverride, compute_frame};
use crate::source;
use crate::theme::PresentationMode;

pub fn handle_check_command(file: Option<&str>, debug_enabled: bool) -> Result<()> {
    log_version!();

    let file = file.map(PathBuf::from);
    let (config, path) = super::load_target_config(file.as_deref(), false)?;
    config.log_config(&private_path(&path));

    let resolver = ConfigResolver::new(&config);
    let asset_root = std::env::var_os(crate::common::constants::ASSET_ROOT_ENV).map(PathBuf::from);

    for mode in [PresentationMode::Light, PresentationMode::Dark] {
        let resolved = resolver
            .resolve(mode, &AnimationRequest::default())
            .with_context(|| format!("Invalid configuration for {mode} mode"))?;
        log_resolved(mode, &resolved, asset_root.as_deref(), debug_enabled);
    }

    log_block_start!("Configuration is valid");
    log_end!();
    Ok(())
}

fn log_resolved(
    mode: PresentationMode,
    config: &SplashscreenConfig,
    asset_root: Option<&Path>,
    debug_enabled: bool,
) {
    log_block_start!("Resolved for {} mode", mode);

    match source::resolve(&config.animation_location, None, config, asset_root) {
        Ok(resolved) => log_indented!("Source: {}", resolved),
        // A missing location only matters once show() is called without one.
        Err(e) => log_warning!("{}", e),
    }

    log_indented!("Background: {}", config.background_color);
    log_indented!("Scale type: {}", config.scale_type);

    let screen = ScreenBounds::new(DEFAULT_PREVIEW_SCREEN.0, DEFAULT_PREVIEW_SCREEN.1);
    match compute_frame(&config.layout, SizeOverride::default(), screen, screen.orientation()) {
        Ok(frame) => log_indented!(
            "Frame on {}x{}: {}",
            DEFAULT_PREVIEW_SCREEN.0,
            DEFAULT_PREVIEW_SCREEN.1,
            frame
        ),
        Err(e) => log_warning!("{}", e),
    }

    if debug_enabled {
        log_debug!("{:?}", config);
    }
}

pub fn display_help() {
    log_version!();
    log_block_start!("check - Validate and resolve a configuration");
    log_block_start!("Usage: lottie-splash check [file]");
    log_block_start!("Arguments:");
    log_indented!("file  TOML config or capacitor.config.json to check");
    log_indented!("      Defaults to the active lottie-splash.toml");
    log_block_start!("Examples:");
    log_indented!("lottie-splash check");
    log_indented!("lottie-splash check capacitor.config.json");
    log_end!();
}
