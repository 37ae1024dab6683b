//! Implementation of the preview command.
//!
//! Runs a full show-cycle against the headless renderer so a configuration's
//! lifecycle (events, timers, fade-out) can be watched from a terminal.
//! Process signals stand in for device input:
//!
//! - `SIGUSR1`: tap on the overlay
//! - `SIGUSR2`: host page finished loading
//! - `SIGINT` / `SIGTERM`: hide and exit

use anyhow::Result;
use std::sync::mpsc::RecvTimeoutError;

use crate::common::constants::PREVIEW_POLL_INTERVAL;
use crate::common::logger::Log;
use crate::common::utils::private_path;
use crate::core::{AnimationRequest, Dismissal};
use crate::error::SplashError;
use crate::events::LottieEventKind;
use crate::signals::{ProcessSignal, setup_signal_handler};
use crate::splashscreen::Splashscreen;
use crate::theme::PresentationMode;

/// Options collected from the command line.
#[derive(Debug, Default)]
pub struct PreviewOptions {
    pub debug_enabled: bool,
    pub location: Option<String>,
    pub mode: Option<PresentationMode>,
    pub log_file: Option<String>,
}

pub fn handle_preview_command(options: PreviewOptions) -> Result<()> {
    let _log_guard = match &options.log_file {
        Some(path) => {
            let guard = Log::start_file_logging(path.clone())?;
            Log::set_timestamps(true);
            Some(guard)
        }
        None => None,
    };

    log_version!();
    if options.debug_enabled {
        log_pipe!();
        log_debug!("Debug mode enabled - showing controller operations");
    }

    let signal_state = setup_signal_handler(options.debug_enabled)?;

    let (config, path) = super::load_target_config(None, true)?;
    config.log_config(&private_path(&path));

    let mut builder = Splashscreen::builder(config).debug(options.debug_enabled);
    if let Some(mode) = options.mode {
        builder = builder.mode_source(mode);
    }
    let mut splash = builder.spawn()?;

    for kind in LottieEventKind::ALL {
        splash.on(kind, |event| {
            log_decorated!("Event: {} (cycle {})", event.kind, event.cycle);
        });
    }

    let mut request = AnimationRequest::new();
    if let Some(location) = options.location {
        request = request.location(location);
    }
    let shown = splash.show(request);

    log_block_start!("Splash is up");
    log_indented!("SIGUSR1 taps, SIGUSR2 reports page ready, Ctrl+C hides");

    let outcome = loop {
        if let Some(result) = shown.try_result() {
            break result;
        }

        match signal_state.receiver.recv_timeout(PREVIEW_POLL_INTERVAL) {
            Ok(ProcessSignal::Shutdown) => {
                log_block_start!("Hiding splash...");
                splash.hide().wait()?;
            }
            Ok(ProcessSignal::Tap) => splash.signals().tap()?,
            Ok(ProcessSignal::PageReady) => splash.signals().page_ready()?,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {}
        }
    };

    let result = report_outcome(outcome);
    splash.shutdown();
    log_end!();
    result
}

fn report_outcome(outcome: Result<Dismissal, SplashError>) -> Result<()> {
    match outcome {
        Ok(dismissal) => {
            log_block_start!(
                "Splash hidden by {} (cycle {})",
                dismissal.trigger,
                dismissal.cycle
            );
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context("Splash could not be shown")),
    }
}

pub fn display_help() {
    log_version!();
    log_block_start!("preview - Show the splash headlessly until it hides");
    log_block_start!("Usage: lottie-splash preview [OPTIONS] [location]");
    log_block_start!("Arguments:");
    log_indented!("location  Animation file or URL overriding the configured one");
    log_block_start!("Options:");
    log_indented!("-t, --theme <mode>  Force light or dark presentation mode");
    log_indented!("-l, --log <file>    Write timestamped output to a file");
    log_block_start!("Signals:");
    log_indented!("SIGUSR1             Tap on the overlay");
    log_indented!("SIGUSR2             Host page finished loading");
    log_indented!("SIGINT, SIGTERM     Hide the splash and exit");
    log_block_start!("Examples:");
    log_indented!("lottie-splash preview splash/logo.json");
    log_indented!("lottie-splash --theme dark preview");
    log_end!();
}
