//! Small numeric and path helpers shared by the controller, the fade-out and
//! the CLI.

use std::f32::consts::PI;
use std::path::Path;

/// Linear interpolation between `start` and `end` at `progress` (clamped to 0..=1).
pub fn interpolate_f32(start: f32, end: f32, progress: f32) -> f32 {
    let progress = progress.clamp(0.0, 1.0);
    start + (end - start) * progress
}

/// Accelerate-decelerate easing: slow at both ends, fastest in the middle.
pub fn ease_accelerate_decelerate(progress: f32) -> f32 {
    let progress = progress.clamp(0.0, 1.0);
    ((progress + 1.0) * PI).cos() / 2.0 + 0.5
}

/// Render a path relative to the home directory as `~/...` for log output.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}
