//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the binary. It supports the standard help, version, debug and
//! config-directory flags, plus the `preview`, `check`, `init`, `echo` and
//! `help` commands. Unknown options fall back to showing help.

use crate::theme::PresentationMode;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Show the configured splash in the headless renderer until it hides
    Preview {
        debug_enabled: bool,
        config_dir: Option<String>,
        /// Animation location overriding the configured one
        location: Option<String>,
        /// Presentation mode overriding the environment
        mode: Option<PresentationMode>,
        /// Write log output to this file instead of stdout
        log_file: Option<String>,
    },
    /// Load, validate and resolve the configuration without showing anything
    Check {
        debug_enabled: bool,
        config_dir: Option<String>,
        /// Explicit config file (TOML or capacitor-style JSON)
        file: Option<String>,
    },
    /// Write a default configuration file
    Init {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Print the value back, as the bridge echo call does
    Echo { value: String },
    /// Command-specific help
    Help { command: Option<String> },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Flags that consume the following argument.
fn takes_value(flag: &str) -> bool {
    matches!(flag, "--config" | "-c" | "--theme" | "-t" | "--log" | "-l")
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// The first element is the program name and is skipped. Version beats
    /// help, which beats everything else.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
        {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let mut debug_enabled = false;
        let mut config_dir: Option<String> = None;
        let mut theme: Option<String> = None;
        let mut log_file: Option<String> = None;
        let mut positional: Vec<String> = Vec::new();

        let mut idx = 0;
        while idx < args_vec.len() {
            let arg = args_vec[idx].as_str();
            if takes_value(arg) {
                let Some(value) = args_vec.get(idx + 1) else {
                    log_warning!("Missing value for {}", arg);
                    return ParsedArgs {
                        action: CliAction::ShowHelpDueToError,
                    };
                };
                match arg {
                    "--config" | "-c" => config_dir = Some(value.clone()),
                    "--theme" | "-t" => theme = Some(value.clone()),
                    _ => log_file = Some(value.clone()),
                }
                idx += 2;
                continue;
            }

            let in_echo = matches!(positional.first().map(String::as_str), Some("echo" | "e"));
            match arg {
                "--debug" | "-d" => debug_enabled = true,
                flag if flag.starts_with('-') && !in_echo => {
                    log_warning!("Unknown argument: {}", flag);
                    return ParsedArgs {
                        action: CliAction::ShowHelpDueToError,
                    };
                }
                other => positional.push(other.to_string()),
            }
            idx += 1;
        }

        let mode = match theme.as_deref().map(str::parse::<PresentationMode>) {
            None => None,
            Some(Ok(mode)) => Some(mode),
            Some(Err(_)) => {
                log_warning!(
                    "Unknown theme '{}', expected light or dark",
                    theme.as_deref().unwrap_or_default()
                );
                return ParsedArgs {
                    action: CliAction::ShowHelpDueToError,
                };
            }
        };

        let command = positional.first().map(String::as_str);
        let rest = positional.get(1..).unwrap_or(&[]);

        let action = match command {
            None => CliAction::Preview {
                debug_enabled,
                config_dir,
                location: None,
                mode,
                log_file,
            },
            Some("preview" | "p") if rest.len() <= 1 => CliAction::Preview {
                debug_enabled,
                config_dir,
                location: rest.first().cloned(),
                mode,
                log_file,
            },
            Some("check" | "c") if rest.len() <= 1 => CliAction::Check {
                debug_enabled,
                config_dir,
                file: rest.first().cloned(),
            },
            Some("init" | "i") if rest.is_empty() => CliAction::Init {
                debug_enabled,
                config_dir,
            },
            Some("echo" | "e") => CliAction::Echo {
                value: rest.join(" "),
            },
            Some("help" | "h") if rest.len() <= 1 => CliAction::Help {
                command: rest.first().cloned(),
            },
            Some(cmd @ ("preview" | "p" | "check" | "c" | "init" | "i" | "help" | "h")) => {
                log_error!("Too many arguments for '{}'", cmd);
                crate::commands::help::show_command_usage(cmd);
                CliAction::ShowHelpDueToError
            }
            Some(unknown) => {
                log_warning!("Unknown command: {}", unknown);
                CliAction::ShowHelpDueToError
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("lottie-splash [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-t, --theme <mode>     Force light or dark presentation mode");
    log_indented!("-l, --log <file>       Write preview output to a file");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("preview, p [location]  Show the splash headlessly (default)");
    log_indented!("check, c [file]        Validate and resolve a configuration");
    log_indented!("init, i                Write a default configuration file");
    log_indented!("echo, e <value>        Print the value back");
    log_indented!("help, h [COMMAND]      Show detailed help for a command");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        ParsedArgs::parse(args.iter().copied()).action
    }

    #[test]
    fn test_parse_no_args_previews() {
        assert_eq!(
            parse(&["lottie-splash"]),
            CliAction::Preview {
                debug_enabled: false,
                config_dir: None,
                location: None,
                mode: None,
                log_file: None,
            }
        );
    }

    #[test]
    fn test_parse_preview_with_options() {
        assert_eq!(
            parse(&[
                "lottie-splash",
                "-d",
                "preview",
                "splash/logo.json",
                "--theme",
                "dark",
                "--config",
                "/tmp/cfg",
            ]),
            CliAction::Preview {
                debug_enabled: true,
                config_dir: Some("/tmp/cfg".to_string()),
                location: Some("splash/logo.json".to_string()),
                mode: Some(PresentationMode::Dark),
                log_file: None,
            }
        );
    }

    #[test]
    fn test_parse_check_with_file() {
        assert_eq!(
            parse(&["lottie-splash", "check", "capacitor.config.json"]),
            CliAction::Check {
                debug_enabled: false,
                config_dir: None,
                file: Some("capacitor.config.json".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_init() {
        assert_eq!(
            parse(&["lottie-splash", "init", "-c", "/tmp/x"]),
            CliAction::Init {
                debug_enabled: false,
                config_dir: Some("/tmp/x".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_echo_keeps_dashes() {
        assert_eq!(
            parse(&["lottie-splash", "echo", "hello", "-world"]),
            CliAction::Echo {
                value: "hello -world".to_string()
            }
        );
    }

    #[test]
    fn test_parse_help_command() {
        assert_eq!(
            parse(&["lottie-splash", "help", "preview"]),
            CliAction::Help {
                command: Some("preview".to_string())
            }
        );
    }

    #[test]
    fn test_version_takes_precedence() {
        assert_eq!(
            parse(&["lottie-splash", "--version", "--help", "--debug"]),
            CliAction::ShowVersion
        );
        assert_eq!(parse(&["lottie-splash", "-d", "--help"]), CliAction::ShowHelp);
    }

    #[test]
    fn test_errors_show_help() {
        assert_eq!(
            parse(&["lottie-splash", "--unknown"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            parse(&["lottie-splash", "frobnicate"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            parse(&["lottie-splash", "init", "extra"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            parse(&["lottie-splash", "--config"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            parse(&["lottie-splash", "--theme", "sepia"]),
            CliAction::ShowHelpDueToError
        );
    }
}
