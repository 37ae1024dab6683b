//! Terminal-only renderer.
//!
//! Reads the composition's timing header (`fr`, `ip`, `op`) and simulates
//! playback on a background thread, reporting completion and repeats through
//! the notifier like a real renderer would. Remote sources are not fetched;
//! they play for a fixed fallback length.

use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{
    AnimationHandle, OverlayView, PlaybackNotifier, PlaybackOptions, RenderAdapter,
};
use crate::common::constants::{
    DEFAULT_PREVIEW_SCREEN, HEADLESS_FALLBACK_DURATION, HEADLESS_TICK,
};
use crate::common::utils::private_path;
use crate::geometry::{Frame, ScreenBounds};
use crate::source::{AnimationSource, CachePolicy, ResolvedSource};

/// The subset of a Lottie document needed for timing.
#[derive(Debug, Deserialize)]
struct LottieHeader {
    #[serde(rename = "fr")]
    frame_rate: Option<f64>,
    #[serde(rename = "ip")]
    in_point: Option<f64>,
    #[serde(rename = "op")]
    out_point: Option<f64>,
    #[serde(rename = "nm")]
    name: Option<String>,
}

impl LottieHeader {
    fn duration(&self) -> Option<Duration> {
        let frame_rate = self.frame_rate.filter(|fr| fr.is_finite() && *fr > 0.0)?;
        let frames = self.out_point? - self.in_point.unwrap_or(0.0);
        (frames.is_finite() && frames > 0.0).then(|| Duration::from_secs_f64(frames / frame_rate))
    }
}

/// What the simulated surface currently shows. Shared so callers can inspect
/// it after the adapter has moved onto the controller thread.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceState {
    pub screen: ScreenBounds,
    pub attached: Option<OverlayView>,
    pub opacity: f32,
    pub attach_count: usize,
    pub detach_count: usize,
    pub opacity_history: Vec<f32>,
    pub loads: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SurfaceProbe(Arc<Mutex<SurfaceState>>);

impl SurfaceProbe {
    pub fn snapshot(&self) -> SurfaceState {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Simulate a device rotation or window resize. The controller picks it
    /// up on the next orientation change.
    pub fn set_screen_bounds(&self, screen: ScreenBounds) {
        self.update(|surface| surface.screen = screen);
    }

    fn update(&self, f: impl FnOnce(&mut SurfaceState)) {
        f(&mut self.0.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

struct Playback {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct HeadlessAdapter {
    debug_enabled: bool,
    duration_override: Option<Duration>,
    cache: HashMap<String, AnimationHandle>,
    playback: Option<Playback>,
    probe: SurfaceProbe,
}

impl Default for HeadlessAdapter {
    fn default() -> Self {
        let (width, height) = DEFAULT_PREVIEW_SCREEN;
        Self::new(ScreenBounds::new(width, height))
    }
}

impl HeadlessAdapter {
    pub fn new(screen: ScreenBounds) -> Self {
        let probe = SurfaceProbe::default();
        probe.set_screen_bounds(screen);
        Self {
            debug_enabled: false,
            duration_override: None,
            cache: HashMap::new(),
            playback: None,
            probe,
        }
    }

    pub fn with_debug(mut self, debug_enabled: bool) -> Self {
        self.debug_enabled = debug_enabled;
        self
    }

    /// Play every animation for `duration` regardless of its header.
    pub fn with_playback_duration(mut self, duration: Duration) -> Self {
        self.duration_override = Some(duration);
        self
    }

    pub fn probe(&self) -> SurfaceProbe {
        self.probe.clone()
    }

    fn read_local(&self, source: &ResolvedSource) -> Result<AnimationHandle> {
        match &source.source {
            AnimationSource::Local { path } => {
                let content = fs::read_to_string(path).with_context(|| {
                    format!("Failed to read animation {}", private_path(path))
                })?;
                let header: LottieHeader = serde_json::from_str(&content).with_context(|| {
                    format!("{} is not a Lottie composition", private_path(path))
                })?;

                let name = header.name.clone().unwrap_or_else(|| {
                    path.file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                        .unwrap_or_default()
                });

                Ok(AnimationHandle {
                    name,
                    duration: header.duration(),
                })
            }
            AnimationSource::Remote { url } => {
                if self.debug_enabled {
                    log_debug!("Remote animation not fetched in headless mode: {}", url);
                }
                Ok(AnimationHandle {
                    name: url.clone(),
                    duration: None,
                })
            }
        }
    }

    fn stop_playback(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.stop.store(true, Ordering::SeqCst);
            let _ = playback.handle.join();
        }
    }
}

impl RenderAdapter for HeadlessAdapter {
    fn load_animation(
        &mut self,
        source: &ResolvedSource,
        _notifier: PlaybackNotifier,
    ) -> Result<AnimationHandle> {
        if let CachePolicy::Enabled { key } = &source.cache
            && let Some(cached) = self.cache.get(key)
        {
            if self.debug_enabled {
                log_debug!("Composition cache hit: {}", key);
            }
            return Ok(cached.clone());
        }

        let handle = self.read_local(source)?;
        self.probe.update(|surface| surface.loads += 1);

        if let CachePolicy::Enabled { key } = &source.cache {
            self.cache.insert(key.clone(), handle.clone());
        }

        Ok(handle)
    }

    fn attach(&mut self, view: &OverlayView) -> Result<()> {
        if self.debug_enabled {
            log_debug!(
                "Overlay attached: {} on {} ({})",
                view.frame,
                view.background,
                view.scale_type
            );
        }
        self.probe.update(|surface| {
            surface.attached = Some(view.clone());
            surface.opacity = 1.0;
            surface.attach_count += 1;
        });
        Ok(())
    }

    fn play(
        &mut self,
        handle: &AnimationHandle,
        options: &PlaybackOptions,
        notifier: PlaybackNotifier,
    ) -> Result<()> {
        self.stop_playback();

        let duration = self
            .duration_override
            .or(handle.duration)
            .unwrap_or(HEADLESS_FALLBACK_DURATION);
        let looping = options.loop_animation;
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        if self.debug_enabled {
            log_debug!(
                "Playing '{}' for {:.2}s{}",
                handle.name,
                duration.as_secs_f64(),
                if looping { " (looping)" } else { "" }
            );
        }

        let handle = thread::Builder::new()
            .name("headless-playback".to_string())
            .spawn(move || {
                let mut started = Instant::now();
                loop {
                    if thread_stop.load(Ordering::SeqCst) {
                        notifier.finished(false);
                        return;
                    }

                    let elapsed = started.elapsed();
                    if elapsed >= duration {
                        if looping {
                            notifier.repeated();
                            started = Instant::now();
                            continue;
                        }
                        notifier.finished(true);
                        return;
                    }

                    thread::sleep(HEADLESS_TICK.min(duration - elapsed));
                }
            })
            .context("Failed to spawn playback thread")?;

        self.playback = Some(Playback { stop, handle });
        Ok(())
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.probe.update(|surface| {
            surface.opacity = opacity;
            surface.opacity_history.push(opacity);
        });
    }

    fn set_frame(&mut self, frame: &Frame) {
        if self.debug_enabled {
            log_debug!("Overlay moved to {}", frame);
        }
        self.probe.update(|surface| {
            if let Some(view) = surface.attached.as_mut() {
                view.frame = *frame;
            }
        });
    }

    fn detach(&mut self) {
        self.stop_playback();
        self.probe.update(|surface| {
            surface.attached = None;
            surface.detach_count += 1;
        });
    }

    fn screen_bounds(&self) -> ScreenBounds {
        self.probe.snapshot().screen
    }

    fn adapter_name(&self) -> &'static str {
        "headless"
    }
}

impl Drop for HeadlessAdapter {
    fn drop(&mut self) {
        self.stop_playback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Command, PlaybackEvent};
    use std::path::PathBuf;
    use std::sync::mpsc::channel;

    fn local(path: PathBuf, cache: CachePolicy) -> ResolvedSource {
        ResolvedSource {
            source: AnimationSource::Local { path },
            cache,
            images_folder: None,
        }
    }

    #[test]
    fn test_header_duration() {
        let header: LottieHeader =
            serde_json::from_str(r#"{"fr": 30, "ip": 0, "op": 45, "nm": "logo"}"#).unwrap();
        assert_eq!(header.duration(), Some(Duration::from_millis(1500)));

        let missing: LottieHeader = serde_json::from_str(r#"{"nm": "x"}"#).unwrap();
        assert_eq!(missing.duration(), None);
    }

    #[test]
    fn test_load_reads_header_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.json");
        fs::write(&path, r#"{"v":"5.7.4","fr":60,"ip":0,"op":30,"layers":[]}"#).unwrap();

        let (tx, _rx) = channel();
        let mut adapter = HeadlessAdapter::default();
        let probe = adapter.probe();
        let cached = CachePolicy::Enabled {
            key: "asset_logo.json".into(),
        };

        let handle = adapter
            .load_animation(&local(path.clone(), cached.clone()), PlaybackNotifier::new(tx.clone(), 1))
            .unwrap();
        assert_eq!(handle.name, "logo");
        assert_eq!(handle.duration, Some(Duration::from_millis(500)));

        adapter
            .load_animation(&local(path, cached), PlaybackNotifier::new(tx, 2))
            .unwrap();
        assert_eq!(probe.snapshot().loads, 1);
    }

    #[test]
    fn test_load_rejects_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "not json").unwrap();

        let (tx, _rx) = channel();
        let mut adapter = HeadlessAdapter::default();
        assert!(
            adapter
                .load_animation(
                    &local(dir.path().join("missing.json"), CachePolicy::Disabled),
                    PlaybackNotifier::new(tx.clone(), 1)
                )
                .is_err()
        );
        assert!(
            adapter
                .load_animation(&local(bad, CachePolicy::Disabled), PlaybackNotifier::new(tx, 1))
                .is_err()
        );
    }

    #[test]
    fn test_playback_reports_completion() {
        let (tx, rx) = channel();
        let mut adapter = HeadlessAdapter::default().with_playback_duration(Duration::from_millis(20));
        let handle = AnimationHandle {
            name: "x".into(),
            duration: None,
        };

        adapter
            .play(
                &handle,
                &PlaybackOptions {
                    loop_animation: false,
                },
                PlaybackNotifier::new(tx, 7),
            )
            .unwrap();

        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            Command::Playback { cycle, event } => {
                assert_eq!(cycle, 7);
                assert_eq!(event, PlaybackEvent::Finished { normally: true });
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_detach_cancels_looping_playback() {
        let (tx, rx) = channel();
        let mut adapter = HeadlessAdapter::default().with_playback_duration(Duration::from_millis(10));
        let probe = adapter.probe();
        let handle = AnimationHandle {
            name: "x".into(),
            duration: None,
        };

        adapter
            .play(
                &handle,
                &PlaybackOptions {
                    loop_animation: true,
                },
                PlaybackNotifier::new(tx, 1),
            )
            .unwrap();

        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            Command::Playback { event, .. } => assert_eq!(event, PlaybackEvent::Repeated),
            other => panic!("unexpected command {other:?}"),
        }

        adapter.detach();
        let events: Vec<PlaybackEvent> = rx
            .try_iter()
            .filter_map(|command| match command {
                Command::Playback { event, .. } => Some(event),
                _ => None,
            })
            .collect();
        assert_eq!(
            events.last(),
            Some(&PlaybackEvent::Finished { normally: false })
        );
        assert_eq!(probe.snapshot().detach_count, 1);
    }
}
