//! Overlay placement.
//!
//! Turns a resolved [`Layout`] plus the current screen into a centered frame.
//! Relative sizes are truncated to whole pixels.

use std::fmt;

use crate::common::constants::{KEY_HEIGHT, KEY_WIDTH, MAXIMUM_FRACTION, MINIMUM_FRACTION};
use crate::config::Layout;
use crate::error::SplashError;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenBounds {
    pub width: f64,
    pub height: f64,
}

impl ScreenBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Landscape only when strictly wider than tall.
    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
        }
    }
}

/// Which axis the renderer may stretch to follow the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexibleDimension {
    #[default]
    None,
    Width,
    Height,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub rect: Rect,
    pub flexible: FlexibleDimension,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.rect.width, self.rect.height, self.rect.x, self.rect.y
        )
    }
}

/// Per-call width/height, in the unit of the active layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeOverride {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Compute the overlay frame for the current screen.
pub fn compute_frame(
    layout: &Layout,
    size_override: SizeOverride,
    screen: ScreenBounds,
    orientation: Orientation,
) -> Result<Frame, SplashError> {
    if !screen.width.is_finite()
        || !screen.height.is_finite()
        || screen.width < 0.0
        || screen.height < 0.0
    {
        return Err(SplashError::Render(format!(
            "invalid screen bounds {}x{}",
            screen.width, screen.height
        )));
    }

    let (width, height, flexible) = match *layout {
        Layout::FullScreen => {
            let flexible = match orientation {
                Orientation::Portrait => FlexibleDimension::Width,
                Orientation::Landscape => FlexibleDimension::Height,
            };
            (screen.width, screen.height, flexible)
        }
        Layout::Relative { width, height } => {
            let width_fraction =
                validate_fraction(KEY_WIDTH, size_override.width.unwrap_or(width))?;
            let height_fraction =
                validate_fraction(KEY_HEIGHT, size_override.height.unwrap_or(height))?;
            (
                (screen.width * width_fraction).trunc(),
                (screen.height * height_fraction).trunc(),
                FlexibleDimension::None,
            )
        }
        Layout::Fixed { width, height } => (
            validate_pixels(KEY_WIDTH, size_override.width.unwrap_or(width))?,
            validate_pixels(KEY_HEIGHT, size_override.height.unwrap_or(height))?,
            FlexibleDimension::None,
        ),
    };

    Ok(Frame {
        rect: Rect {
            x: (screen.width - width) / 2.0,
            y: (screen.height - height) / 2.0,
            width,
            height,
        },
        flexible,
    })
}

/// A screen fraction in `[0, 1]`.
pub fn validate_fraction(key: &str, value: f64) -> Result<f64, SplashError> {
    if value.is_finite() && (MINIMUM_FRACTION..=MAXIMUM_FRACTION).contains(&value) {
        Ok(value)
    } else {
        Err(SplashError::configuration(
            key,
            format!("relative size {value} must be between {MINIMUM_FRACTION} and {MAXIMUM_FRACTION}"),
        ))
    }
}

/// A non-negative pixel size.
pub fn validate_pixels(key: &str, value: f64) -> Result<f64, SplashError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SplashError::configuration(
            key,
            format!("{value} is not a valid pixel size"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORTRAIT: ScreenBounds = ScreenBounds {
        width: 1000.0,
        height: 2000.0,
    };

    #[test]
    fn test_relative_half_width() {
        let layout = Layout::Relative {
            width: 0.5,
            height: 0.2,
        };
        let frame =
            compute_frame(&layout, SizeOverride::default(), PORTRAIT, Orientation::Portrait)
                .unwrap();
        assert_eq!(frame.rect.width, 500.0);
        assert_eq!(frame.rect.height, 400.0);
        assert_eq!(frame.rect.center(), (500.0, 1000.0));
    }

    #[test]
    fn test_relative_sizes_truncate() {
        let layout = Layout::Relative {
            width: 0.333,
            height: 0.333,
        };
        let frame = compute_frame(
            &layout,
            SizeOverride::default(),
            ScreenBounds::new(100.0, 100.0),
            Orientation::Portrait,
        )
        .unwrap();
        assert_eq!(frame.rect.width, 33.0);
    }

    #[test]
    fn test_fixed_ignores_screen() {
        let layout = Layout::Fixed {
            width: 50.0,
            height: 50.0,
        };
        for screen in [PORTRAIT, ScreenBounds::new(320.0, 240.0)] {
            let frame = compute_frame(
                &layout,
                SizeOverride::default(),
                screen,
                screen.orientation(),
            )
            .unwrap();
            assert_eq!((frame.rect.width, frame.rect.height), (50.0, 50.0));
        }
    }

    #[test]
    fn test_override_takes_precedence() {
        let layout = Layout::Fixed {
            width: 200.0,
            height: 200.0,
        };
        let size = SizeOverride {
            width: Some(120.0),
            height: None,
        };
        let frame = compute_frame(&layout, size, PORTRAIT, Orientation::Portrait).unwrap();
        assert_eq!((frame.rect.width, frame.rect.height), (120.0, 200.0));
    }

    #[test]
    fn test_full_screen_flexible_axis_follows_orientation() {
        let portrait =
            compute_frame(&Layout::FullScreen, SizeOverride::default(), PORTRAIT, Orientation::Portrait)
                .unwrap();
        assert_eq!(portrait.flexible, FlexibleDimension::Width);
        assert_eq!(portrait.rect.x, 0.0);

        let landscape = compute_frame(
            &Layout::FullScreen,
            SizeOverride::default(),
            ScreenBounds::new(2000.0, 1000.0),
            Orientation::Landscape,
        )
        .unwrap();
        assert_eq!(landscape.flexible, FlexibleDimension::Height);
        assert_eq!(landscape.rect.width, 2000.0);
    }

    #[test]
    fn test_invalid_overrides_rejected() {
        let relative = Layout::Relative {
            width: 0.2,
            height: 0.2,
        };
        let too_wide = SizeOverride {
            width: Some(1.01),
            height: None,
        };
        let err = compute_frame(&relative, too_wide, PORTRAIT, Orientation::Portrait).unwrap_err();
        assert_eq!(err.code(), "ConfigurationError");

        let fixed = Layout::Fixed {
            width: 200.0,
            height: 200.0,
        };
        let negative = SizeOverride {
            width: None,
            height: Some(-1.0),
        };
        assert!(compute_frame(&fixed, negative, PORTRAIT, Orientation::Portrait).is_err());
    }

    #[test]
    fn test_orientation_from_bounds() {
        assert_eq!(PORTRAIT.orientation(), Orientation::Portrait);
        assert_eq!(ScreenBounds::new(10.0, 10.0).orientation(), Orientation::Portrait);
        assert_eq!(ScreenBounds::new(11.0, 10.0).orientation(), Orientation::Landscape);
    }
}
