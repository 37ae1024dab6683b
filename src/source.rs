//! Animation source classification.
//!
//! Decides whether a location is a bundled asset or a URL, validates it, and
//! derives the renderer's cache key and image-assets folder.

use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::constants::{LOCAL_CACHE_PREFIX, REMOTE_CACHE_PREFIX};
use crate::config::SplashscreenConfig;
use crate::error::SplashError;

static ABSOLUTE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#@]+(?:@[^\s/?#]+)?(?:[/?#]\S*)?$")
        .expect("URL pattern is valid")
});

/// `scheme://host[...]` with no whitespace.
pub fn is_well_formed_url(location: &str) -> bool {
    ABSOLUTE_URL.is_match(location.trim())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimationSource {
    Local { path: PathBuf },
    Remote { url: String },
}

impl AnimationSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, AnimationSource::Remote { .. })
    }
}

impl fmt::Display for AnimationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationSource::Local { path } => write!(f, "{} (local)", path.display()),
            AnimationSource::Remote { url } => write!(f, "{url} (remote)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachePolicy {
    Enabled { key: String },
    Disabled,
}

/// Everything the renderer needs to fetch an animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub source: AnimationSource,
    pub cache: CachePolicy,
    pub images_folder: Option<PathBuf>,
}

impl fmt::Display for ResolvedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = match self.cache {
            CachePolicy::Enabled { .. } => "cached",
            CachePolicy::Disabled => "uncached",
        };
        write!(f, "{}, {}", self.source, cache)
    }
}

/// Classify `location`.
///
/// `remote_override` takes precedence over `config.remote_enabled`. Relative
/// local paths are joined onto `asset_root` when one is given.
pub fn resolve(
    location: &str,
    remote_override: Option<bool>,
    config: &SplashscreenConfig,
    asset_root: Option<&Path>,
) -> Result<ResolvedSource, SplashError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(SplashError::InvalidUrl(
            "animation location has to be configured".to_string(),
        ));
    }

    let remote = remote_override.unwrap_or(config.remote_enabled);
    let configured_images = config
        .images_location
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let cache = if config.cache_disabled {
        CachePolicy::Disabled
    } else {
        let prefix = if remote {
            REMOTE_CACHE_PREFIX
        } else {
            LOCAL_CACHE_PREFIX
        };
        CachePolicy::Enabled {
            key: format!("{prefix}{location}"),
        }
    };

    if remote {
        if !is_well_formed_url(location) {
            return Err(SplashError::InvalidUrl(format!(
                "'{location}' is not a well-formed URL"
            )));
        }
        return Ok(ResolvedSource {
            source: AnimationSource::Remote {
                url: location.to_string(),
            },
            cache,
            images_folder: configured_images.map(PathBuf::from),
        });
    }

    let under_root = |relative: &str| match asset_root {
        Some(root) if Path::new(relative).is_relative() => root.join(relative),
        _ => PathBuf::from(relative),
    };

    let path = under_root(location);
    let images_folder = match configured_images {
        Some(folder) => Some(under_root(folder)),
        None => path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf),
    };

    Ok(ResolvedSource {
        source: AnimationSource::Local { path },
        cache,
        images_folder,
    })
}
