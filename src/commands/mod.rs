//! Command-line command handlers for lottie-splash.
//!
//! Each command is implemented in its own submodule. Commands log through the
//! box-drawing macros and return `anyhow` errors for the binary to report.

pub mod check;
pub mod echo;
pub mod help;
pub mod init;
pub mod preview;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{self, Config};

/// Load the configuration a command operates on.
///
/// An explicit `file` is read as-is; otherwise the default location is used
/// and must already exist unless `create_missing` is set.
pub(crate) fn load_target_config(file: Option<&Path>, create_missing: bool) -> Result<(Config, PathBuf)> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => config::get_config_path()?,
    };

    let config = if file.is_none() && create_missing {
        config::load()?
    } else {
        config::load_from_path(&path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                crate::common::utils::private_path(&path)
            )
        })?
    };

    Ok((config, path))
}
