//! Help command implementation for lottie-splash.
//!
//! This module provides a dispatcher for the help command that shows
//! command-specific help or general help based on the arguments provided.

use anyhow::Result;

/// Show brief usage for a command (used for error messages)
pub fn show_command_usage(command: &str) {
    match command {
        "preview" | "p" => log_block_start!("Usage: lottie-splash preview [OPTIONS] [location]"),
        "check" | "c" => log_block_start!("Usage: lottie-splash check [file]"),
        "init" | "i" => log_block_start!("Usage: lottie-splash init"),
        "echo" | "e" => log_block_start!("Usage: lottie-splash echo <value>"),
        "help" | "h" => log_block_start!("Usage: lottie-splash help [COMMAND]"),
        _ => log_block_start!("Usage: lottie-splash [OPTIONS] [COMMAND]"),
    }
}

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("preview" | "p") => super::preview::display_help(),
        Some("check" | "c") => super::check::display_help(),
        Some("init" | "i") => super::init::display_help(),
        Some("echo" | "e") => super::echo::display_help(),
        Some("help" | "h") => display_help_help(),
        Some(unknown) => {
            log_warning!("Unknown command: {}", unknown);
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("preview, p [location]  Show the splash headlessly until it hides");
    log_indented!("check, c [file]        Validate and resolve a configuration");
    log_indented!("init, i                Write a default configuration file");
    log_indented!("echo, e <value>        Print the value back");
    log_indented!("help, h [COMMAND]      Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'lottie-splash help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'lottie-splash --help' to see all options and general usage.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: lottie-splash help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("# Show general help");
    log_indented!("lottie-splash help");
    log_pipe!();
    log_indented!("# Show help for specific commands");
    log_indented!("lottie-splash help preview");
    log_indented!("lottie-splash help check");
    log_end!();
}
