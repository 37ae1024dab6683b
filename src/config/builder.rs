//! Default configuration file creation.
//!
//! The generated file lists every option with its default and an aligned
//! comment, using snake_case keys so it reads naturally as TOML.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::common::constants::*;
use crate::common::utils::private_path;

/// Create a default config file at `path`, creating parent directories.
///
/// Refuses to overwrite an existing file.
pub fn create_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!(
            "Configuration file already exists: {}",
            private_path(path)
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content())
        .with_context(|| format!("Failed to write default config to {}", private_path(path)))?;

    log_block_start!("Created default configuration: {}", private_path(path));

    Ok(())
}

/// Render the commented default configuration.
pub fn default_config_content() -> String {
    let mut content = ConfigBuilder::new()
        .add_section("Animation")
        .add_setting(
            "animation_location",
            "\"\"",
            "Local asset path or URL of the Lottie JSON file",
        )
        .add_setting(
            "animation_location_light",
            "\"\"",
            "Light mode override (blank = use animation_location)",
        )
        .add_setting(
            "animation_location_dark",
            "\"\"",
            "Dark mode override (blank = use animation_location)",
        )
        .add_setting("remote_enabled", "false", "Load the animation from a URL")
        .add_setting("cache_disabled", "false", "Skip the renderer's composition cache")
        .add_setting("loop_animation", "false", "Repeat the animation until hidden")
        .add_setting(
            "images_location",
            "\"\"",
            "Image assets folder (blank = animation's directory)",
        )
        .add_section("Overlay")
        .add_setting(
            "background_color",
            &format!("\"{DEFAULT_BACKGROUND_COLOR}\""),
            "Background color (#RRGGBB or #RRGGBBAA)",
        )
        .add_setting(
            "scale_type",
            &format!("\"{DEFAULT_SCALE_TYPE}\""),
            "FIT_CENTER, FIT_XY, FIT_START, FIT_END, CENTER, CENTER_CROP, CENTER_INSIDE, MATRIX",
        )
        .add_setting("full_screen", "false", "Cover the whole screen")
        .add_setting(
            "relative_size",
            "false",
            "Treat width/height as screen fractions (0-1)",
        )
        .add_setting(
            "width",
            &DEFAULT_FIXED_WIDTH.to_string(),
            &format!("Overlay width in pixels (or {DEFAULT_RELATIVE_WIDTH} when relative)"),
        )
        .add_setting(
            "height",
            &DEFAULT_FIXED_HEIGHT.to_string(),
            &format!("Overlay height in pixels (or {DEFAULT_RELATIVE_HEIGHT} when relative)"),
        )
        .add_setting(
            "enable_hardware_acceleration",
            "false",
            "Ask the renderer for hardware rendering",
        )
        .add_setting("enable_merge_paths", "false", "Enable merge path support")
        .add_section("Dismissal")
        .add_setting(
            "hide_timeout",
            &DEFAULT_HIDE_TIMEOUT_MS.to_string(),
            "Hide after this many milliseconds (0 = never)",
        )
        .add_setting(
            "fade_out_duration",
            &DEFAULT_FADE_OUT_DURATION_MS.to_string(),
            "Fade-out length in milliseconds (0 = instant)",
        )
        .add_setting("cancel_on_tap", "false", "Hide when the overlay is tapped")
        .add_setting(
            "auto_hide_splash_screen",
            "false",
            "Hide once the host page reports ready",
        )
        .add_setting(
            "hide_after_animation_end",
            "false",
            "Hide when playback completes",
        )
        .build();
    content.push('\n');
    content
}

/// Builder for creating dynamically-aligned configuration files.
///
/// Comments are aligned one space past the longest setting line.
#[derive(Default)]
pub struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

#[derive(Clone)]
enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    pub fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    pub fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(title);
                    first_section = false;
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        result.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_aligns_comments() {
        let content = ConfigBuilder::new()
            .add_section("A")
            .add_setting("a", "1", "short")
            .add_setting("longer_key", "true", "long")
            .add_section("B")
            .build();

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "#[A]");
        assert_eq!(lines[1].find('#'), lines[2].find('#'));
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "#[B]");
    }

    #[test]
    fn test_default_content_parses_back() {
        let config = crate::config::from_toml_str(&default_config_content()).unwrap();
        assert_eq!(config.background_color.as_deref(), Some(DEFAULT_BACKGROUND_COLOR));
        assert_eq!(config.hide_timeout, Some(0.0));
        assert_eq!(config.full_screen, Some(false));
    }
}
