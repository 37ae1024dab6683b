//! Light/dark presentation mode and the sources that report it.
//!
//! The controller never queries global UI state directly; it asks an injected
//! [`PresentationModeSource`] once per show-cycle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::constants::{DARK_SUFFIX, LIGHT_SUFFIX, THEME_ENV};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    #[default]
    Light,
    Dark,
}

impl PresentationMode {
    /// Suffix appended to a themed option's base name.
    pub fn suffix(&self) -> &'static str {
        match self {
            PresentationMode::Light => LIGHT_SUFFIX,
            PresentationMode::Dark => DARK_SUFFIX,
        }
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationMode::Light => write!(f, "light"),
            PresentationMode::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for PresentationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" | "day" => Ok(PresentationMode::Light),
            "dark" | "night" => Ok(PresentationMode::Dark),
            other => Err(format!("unknown presentation mode '{other}'")),
        }
    }
}

/// Capability reporting the current presentation mode.
pub trait PresentationModeSource: Send {
    fn current_mode(&self) -> PresentationMode;
}

impl PresentationModeSource for PresentationMode {
    fn current_mode(&self) -> PresentationMode {
        *self
    }
}

impl<F> PresentationModeSource for F
where
    F: Fn() -> PresentationMode + Send,
{
    fn current_mode(&self) -> PresentationMode {
        self()
    }
}

/// Reads the mode from the environment on every query.
///
/// `LOTTIE_SPLASH_THEME=dark|light` wins; otherwise a `GTK_THEME` ending in
/// `:dark` selects dark mode. Anything else is light.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvironmentModeSource;

impl PresentationModeSource for EnvironmentModeSource {
    fn current_mode(&self) -> PresentationMode {
        if let Ok(value) = std::env::var(THEME_ENV)
            && let Ok(mode) = value.parse()
        {
            return mode;
        }

        match std::env::var("GTK_THEME") {
            Ok(theme) if theme.to_ascii_lowercase().ends_with(":dark") => PresentationMode::Dark,
            _ => PresentationMode::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_env<T>(vars: &[(&str, Option<&str>)], body: impl FnOnce() -> T) -> T {
        let saved: Vec<_> = vars
            .iter()
            .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
            .collect();
        unsafe {
            for (key, value) in vars {
                match value {
                    Some(v) => std::env::set_var(key, v),
                    None => std::env::remove_var(key),
                }
            }
        }
        let result = body();
        unsafe {
            for (key, value) in saved {
                match value {
                    Some(v) => std::env::set_var(&key, v),
                    None => std::env::remove_var(&key),
                }
            }
        }
        result
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("Dark".parse::<PresentationMode>(), Ok(PresentationMode::Dark));
        assert_eq!(" light ".parse::<PresentationMode>(), Ok(PresentationMode::Light));
        assert!("dim".parse::<PresentationMode>().is_err());
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(PresentationMode::Light.suffix(), "Light");
        assert_eq!(PresentationMode::Dark.suffix(), "Dark");
    }

    #[test]
    fn test_closure_source() {
        let source = || PresentationMode::Dark;
        assert_eq!(source.current_mode(), PresentationMode::Dark);
    }

    #[test]
    #[serial]
    fn test_environment_override_wins() {
        let mode = with_env(
            &[(THEME_ENV, Some("dark")), ("GTK_THEME", Some("Adwaita"))],
            || EnvironmentModeSource.current_mode(),
        );
        assert_eq!(mode, PresentationMode::Dark);
    }

    #[test]
    #[serial]
    fn test_environment_gtk_dark_variant() {
        let mode = with_env(
            &[(THEME_ENV, None), ("GTK_THEME", Some("Adwaita:dark"))],
            || EnvironmentModeSource.current_mode(),
        );
        assert_eq!(mode, PresentationMode::Dark);
    }

    #[test]
    #[serial]
    fn test_environment_defaults_to_light() {
        let mode = with_env(&[(THEME_ENV, None), ("GTK_THEME", None)], || {
            EnvironmentModeSource.current_mode()
        });
        assert_eq!(mode, PresentationMode::Light);
    }
}
