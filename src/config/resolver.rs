//! Per-cycle option resolution.
//!
//! Themed options are looked up as `<base><Light|Dark>` first, then `<base>`,
//! then the documented default. Blank strings always fall through to the next
//! candidate.

use std::time::Duration;

use super::{Config, Layout, Rgba, ScaleType, SplashscreenConfig};
use crate::common::constants::*;
use crate::core::AnimationRequest;
use crate::error::SplashError;
use crate::geometry::{validate_fraction, validate_pixels};
use crate::theme::PresentationMode;

pub struct ConfigResolver<'a> {
    config: &'a Config,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Resolve a string option for `mode`; a non-blank `override_value` wins.
    pub fn resolve_option(
        &self,
        base_name: &str,
        mode: PresentationMode,
        override_value: Option<&str>,
    ) -> String {
        let themed_name = format!("{base_name}{}", mode.suffix());

        override_value
            .map(str::to_string)
            .into_iter()
            .chain(self.config.string_option(&themed_name))
            .chain(self.config.string_option(base_name))
            .find(|value| !value.trim().is_empty())
            .unwrap_or_else(|| default_for(base_name).to_string())
    }

    /// Build the immutable snapshot a show-cycle runs with.
    pub fn resolve(
        &self,
        mode: PresentationMode,
        request: &AnimationRequest,
    ) -> Result<SplashscreenConfig, SplashError> {
        let config = self.config;
        let flag = |value: Option<bool>| value.unwrap_or(false);

        let animation_location =
            self.resolve_option(KEY_ANIMATION_LOCATION, mode, request.location.as_deref());
        let background_color = Rgba::parse(&self.resolve_option(KEY_BACKGROUND_COLOR, mode, None))?;
        let scale_type: ScaleType = self.resolve_option(KEY_SCALE_TYPE, mode, None).parse()?;

        let images_location = config
            .string_option(KEY_IMAGES_LOCATION)
            .filter(|value| !value.trim().is_empty());

        Ok(SplashscreenConfig {
            animation_location,
            remote_enabled: request.remote.unwrap_or(flag(config.remote_enabled)),
            cache_disabled: flag(config.cache_disabled),
            background_color,
            layout: self.layout()?,
            loop_animation: flag(config.loop_animation),
            cancel_on_tap: flag(config.cancel_on_tap),
            auto_hide_on_page_load: flag(config.auto_hide_splash_screen),
            hide_after_animation_end: flag(config.hide_after_animation_end),
            hide_timeout: duration_option(
                KEY_HIDE_TIMEOUT,
                config.hide_timeout.unwrap_or(DEFAULT_HIDE_TIMEOUT_MS),
            )?,
            fade_out_duration: duration_option(
                KEY_FADE_OUT_DURATION,
                config.fade_out_duration.unwrap_or(DEFAULT_FADE_OUT_DURATION_MS),
            )?,
            scale_type,
            images_location,
            hardware_acceleration: flag(config.enable_hardware_acceleration),
            merge_paths: flag(config.enable_merge_paths),
        })
    }

    /// `full_screen` wins over `relative_size`; the two numeric
    /// representations are never mixed.
    fn layout(&self) -> Result<Layout, SplashError> {
        let config = self.config;

        if config.full_screen.unwrap_or(false) {
            return Ok(Layout::FullScreen);
        }

        let number = |key: &str, default: f64| -> Result<f64, SplashError> {
            match config.dimension(key) {
                Some(value) => value.as_f64(key),
                None => Ok(default),
            }
        };

        if config.relative_size.unwrap_or(false) {
            Ok(Layout::Relative {
                width: validate_fraction(KEY_WIDTH, number(KEY_WIDTH, DEFAULT_RELATIVE_WIDTH)?)?,
                height: validate_fraction(
                    KEY_HEIGHT,
                    number(KEY_HEIGHT, DEFAULT_RELATIVE_HEIGHT)?,
                )?,
            })
        } else {
            Ok(Layout::Fixed {
                width: validate_pixels(KEY_WIDTH, number(KEY_WIDTH, DEFAULT_FIXED_WIDTH)?)?,
                height: validate_pixels(KEY_HEIGHT, number(KEY_HEIGHT, DEFAULT_FIXED_HEIGHT)?)?,
            })
        }
    }
}

fn default_for(base_name: &str) -> &'static str {
    match base_name {
        KEY_BACKGROUND_COLOR => DEFAULT_BACKGROUND_COLOR,
        KEY_SCALE_TYPE => DEFAULT_SCALE_TYPE,
        _ => "",
    }
}

fn duration_option(key: &str, millis: f64) -> Result<Duration, SplashError> {
    if !millis.is_finite() || millis < 0.0 {
        return Err(SplashError::configuration(
            key,
            format!("{millis} is not a non-negative number of milliseconds"),
        ));
    }
    if millis > MAXIMUM_DURATION_MS {
        return Err(SplashError::configuration(
            key,
            format!("{millis}ms exceeds the {MAXIMUM_DURATION_MS}ms limit"),
        ));
    }
    Ok(Duration::from_secs_f64(millis / 1000.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigNumber;

    fn themed_config() -> Config {
        Config {
            animation_location: Some("X".into()),
            animation_location_light: Some("L".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_themed_option_precedence() {
        let config = themed_config();
        let resolver = ConfigResolver::new(&config);

        assert_eq!(
            resolver.resolve_option(KEY_ANIMATION_LOCATION, PresentationMode::Dark, None),
            "X"
        );
        assert_eq!(
            resolver.resolve_option(KEY_ANIMATION_LOCATION, PresentationMode::Light, None),
            "L"
        );
    }

    #[test]
    fn test_override_wins_unless_blank() {
        let config = themed_config();
        let resolver = ConfigResolver::new(&config);

        assert_eq!(
            resolver.resolve_option(KEY_ANIMATION_LOCATION, PresentationMode::Light, Some("O")),
            "O"
        );
        assert_eq!(
            resolver.resolve_option(KEY_ANIMATION_LOCATION, PresentationMode::Light, Some("  ")),
            "L"
        );
    }

    #[test]
    fn test_blank_themed_value_falls_through_to_base() {
        let config = Config {
            background_color: Some("#000000".into()),
            background_color_dark: Some(" ".into()),
            ..Default::default()
        };
        let resolver = ConfigResolver::new(&config);
        assert_eq!(
            resolver.resolve_option(KEY_BACKGROUND_COLOR, PresentationMode::Dark, None),
            "#000000"
        );
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::default();
        let snapshot = ConfigResolver::new(&config)
            .resolve(PresentationMode::Light, &AnimationRequest::default())
            .unwrap();

        assert_eq!(snapshot.animation_location, "");
        assert_eq!(snapshot.background_color, Rgba::WHITE);
        assert_eq!(snapshot.scale_type, ScaleType::FitCenter);
        assert_eq!(
            snapshot.layout,
            Layout::Fixed {
                width: 200.0,
                height: 200.0
            }
        );
        assert_eq!(snapshot.hide_timeout, Duration::ZERO);
        assert_eq!(snapshot.fade_out_duration, Duration::ZERO);
        assert!(!snapshot.remote_enabled);
    }

    #[test]
    fn test_relative_layout_uses_fraction_defaults() {
        let config = Config {
            relative_size: Some(true),
            width: Some(ConfigNumber::Text("0.5".into())),
            ..Default::default()
        };
        let snapshot = ConfigResolver::new(&config)
            .resolve(PresentationMode::Light, &AnimationRequest::default())
            .unwrap();
        assert_eq!(
            snapshot.layout,
            Layout::Relative {
                width: 0.5,
                height: 0.2
            }
        );
    }

    #[test]
    fn test_full_screen_overrides_size_options() {
        let config = Config {
            full_screen: Some(true),
            relative_size: Some(true),
            width: Some(ConfigNumber::Number(5.0)),
            ..Default::default()
        };
        let snapshot = ConfigResolver::new(&config)
            .resolve(PresentationMode::Dark, &AnimationRequest::default())
            .unwrap();
        assert_eq!(snapshot.layout, Layout::FullScreen);
    }

    #[test]
    fn test_request_remote_overrides_config() {
        let config = Config {
            remote_enabled: Some(true),
            ..Default::default()
        };
        let request = AnimationRequest::new().remote(false);
        let snapshot = ConfigResolver::new(&config)
            .resolve(PresentationMode::Light, &request)
            .unwrap();
        assert!(!snapshot.remote_enabled);
    }

    #[test]
    fn test_malformed_values_are_configuration_errors() {
        let cases = [
            Config {
                relative_size: Some(true),
                height: Some(ConfigNumber::Number(1.5)),
                ..Default::default()
            },
            Config {
                width: Some(ConfigNumber::Text("wide".into())),
                ..Default::default()
            },
            Config {
                hide_timeout: Some(-1.0),
                ..Default::default()
            },
            Config {
                background_color_dark: Some("#12".into()),
                ..Default::default()
            },
            Config {
                scale_type: Some("STRETCH".into()),
                ..Default::default()
            },
        ];

        for config in cases {
            let err = ConfigResolver::new(&config)
                .resolve(PresentationMode::Dark, &AnimationRequest::default())
                .unwrap_err();
            assert_eq!(err.code(), "ConfigurationError", "{config:?}");
        }
    }

    #[test]
    fn test_duration_limit() {
        assert!(duration_option(KEY_HIDE_TIMEOUT, MAXIMUM_DURATION_MS).is_ok());
        assert!(duration_option(KEY_HIDE_TIMEOUT, MAXIMUM_DURATION_MS + 1.0).is_err());
        assert!(duration_option(KEY_HIDE_TIMEOUT, f64::NAN).is_err());
        assert_eq!(
            duration_option(KEY_HIDE_TIMEOUT, 1500.0).unwrap(),
            Duration::from_millis(1500)
        );
    }
}
