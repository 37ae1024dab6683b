//! Implementation of the init command.
//!
//! Writes the commented default configuration to the active config path. An
//! existing file is never overwritten.

use anyhow::Result;

use crate::common::utils::private_path;
use crate::config::{self, builder};

pub fn handle_init_command(debug_enabled: bool) -> Result<()> {
    log_version!();

    let path = config::get_config_path()?;
    if debug_enabled {
        log_pipe!();
        log_debug!("Target config path: {}", private_path(&path));
    }

    if path.exists() {
        log_pipe!();
        log_warning!("Configuration already exists at {}", private_path(&path));
        log_indented!("Remove it first to regenerate the defaults");
        log_end!();
        return Ok(());
    }

    builder::create_default_config(&path)?;
    log_end!();
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("init - Write a default configuration file");
    log_block_start!("Usage: lottie-splash init");
    log_block_start!("Description:");
    log_indented!("Creates lottie-splash.toml in the config directory");
    log_indented!("(or the directory given with --config) with every option");
    log_indented!("listed and commented.");
    log_end!();
}
