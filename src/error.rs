//! Error kinds surfaced to callers of the splashscreen.
//!
//! None of these is fatal to the host: the worst case is an overlay that never
//! displays while the application carries on.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplashError {
    /// The animation location is blank, not a well-formed URL in remote mode,
    /// or the renderer could not load it.
    #[error("The provided animation is invalid: {0}")]
    InvalidUrl(String),

    /// `show()` was called while an overlay is already attached.
    #[error("An animation is already playing, please first hide the current one")]
    AnimationAlreadyPlaying,

    /// A configuration value could not be interpreted.
    #[error("Invalid value for {key}: {reason}")]
    Configuration { key: String, reason: String },

    /// The rendering adapter failed to attach or start the overlay.
    #[error("Rendering adapter failed: {0}")]
    Render(String),

    /// The controller thread has shut down before answering.
    #[error("Splashscreen controller is no longer running")]
    Stopped,
}

impl SplashError {
    pub fn configuration(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SplashError::Configuration {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Stable identifier matching the plugin's rejection codes.
    pub fn code(&self) -> &'static str {
        match self {
            SplashError::InvalidUrl(_) => "InvalidURL",
            SplashError::AnimationAlreadyPlaying => "AnimationAlreadyPlaying",
            SplashError::Configuration { .. } => "ConfigurationError",
            SplashError::Render(_) => "RenderError",
            SplashError::Stopped => "Stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_codes() {
        let err = SplashError::configuration("LottieWidth", "not a number");
        assert_eq!(err.to_string(), "Invalid value for LottieWidth: not a number");
        assert_eq!(err.code(), "ConfigurationError");
        assert_eq!(SplashError::InvalidUrl("x".into()).code(), "InvalidURL");
    }

    #[test]
    fn test_converts_into_anyhow_and_back() {
        let err: anyhow::Error = SplashError::AnimationAlreadyPlaying.into();
        assert_eq!(
            err.downcast_ref::<SplashError>(),
            Some(&SplashError::AnimationAlreadyPlaying)
        );
    }
}
