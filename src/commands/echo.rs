//! Implementation of the echo command.

use anyhow::Result;

use crate::config::Config;
use crate::splashscreen::Splashscreen;

/// Round-trip `value` through a splash controller and print it.
pub fn handle_echo_command(value: &str) -> Result<()> {
    let splash = Splashscreen::builder(Config::default()).spawn()?;
    println!("{}", splash.echo(value));
    Ok(())
}

pub fn display_help() {
    log_version!();
    log_block_start!("echo - Print a value back");
    log_block_start!("Usage: lottie-splash echo <value>");
    log_block_start!("Description:");
    log_indented!("Checks that a controller can be started and answers calls.");
    log_indented!("The value is printed unchanged without any decoration.");
    log_end!();
}
