//! Main application entry point.
//!
//! Parses the command line and dispatches to the command handlers in the
//! library. All real work lives in `lottie_splash`; this file only maps a
//! [`CliAction`] to the handler and turns errors into an exit code.

use anyhow::Result;

use lottie_splash::args::{self, CliAction, ParsedArgs};
use lottie_splash::commands;
use lottie_splash::commands::preview::PreviewOptions;
use lottie_splash::common::constants::EXIT_FAILURE;
use lottie_splash::config;
use lottie_splash::{log_end, log_error_exit, log_pipe};

fn main() {
    let parsed_args = ParsedArgs::from_env();

    if let Err(e) = run(parsed_args.action) {
        log_pipe!();
        log_error_exit!("{:#}", e);
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }
}

fn run(action: CliAction) -> Result<()> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp | CliAction::ShowHelpDueToError => {
            args::display_help();
            Ok(())
        }
        CliAction::Help { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::Echo { value } => commands::echo::handle_echo_command(&value),
        CliAction::Init {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::init::handle_init_command(debug_enabled)
        }
        CliAction::Check {
            debug_enabled,
            config_dir,
            file,
        } => {
            config::set_config_dir(config_dir)?;
            commands::check::handle_check_command(file.as_deref(), debug_enabled)
        }
        CliAction::Preview {
            debug_enabled,
            config_dir,
            location,
            mode,
            log_file,
        } => {
            config::set_config_dir(config_dir)?;
            commands::preview::handle_preview_command(PreviewOptions {
                debug_enabled,
                location,
                mode,
                log_file,
            })
        }
    }
}
