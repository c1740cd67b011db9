//! # Svein CLI Library
//!
//! Command-line tools around the Svein rule engine: inspect a deal, run
//! bot-only simulations, and show the layered configuration.
//!
//! ## Main Entry Point
//!
//! [`run`] parses the arguments and executes the subcommand, writing to the
//! streams it is given so tests can drive it in-process.
//!
//! ## Available Subcommands
//!
//! - `deal`: Deal one round and print every hand
//! - `sim`: Play complete games with bots and optionally record them as JSONL
//! - `cfg`: Display the resolved configuration and its sources

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
mod macros;
pub mod ui;

use cli::{Commands, SveinCli};
use commands::{handle_cfg_command, handle_deal_command, handle_sim_command};
use config::CliOverrides;

pub use error::CliError;

/// Main entry point for the CLI application.
///
/// Returns the process exit code: [`exit_code::SUCCESS`] or [`exit_code::ERROR`].
///
/// ```
/// use std::io;
/// let args = vec!["svein", "deal", "--players", "2", "--cards", "5", "--seed", "42"];
/// let code = svein_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    const COMMANDS: &[&str] = &["deal", "sim", "cfg"];
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match SveinCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                if write!(out, "{}", e).is_err() {
                    return exit_code::ERROR;
                }
                return exit_code::SUCCESS;
            }
            write_or_exit!(err, "{}", e);
            write_or_exit!(err, "Svein CLI");
            write_or_exit!(err, "Usage: svein <command> [options]\n");
            write_or_exit!(err, "Commands:");
            for c in COMMANDS {
                write_or_exit!(err, "  {}", c);
            }
            write_or_exit!(err, "\nFor full help, run: svein --help");
            return exit_code::ERROR;
        }
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Deal {
            players,
            cards,
            seed,
        } => handle_deal_command(players, cards, seed, out),
        Commands::Sim {
            games,
            players,
            rounds,
            seed,
            bot,
            output,
        } => {
            let overrides = CliOverrides {
                players,
                total_rounds: rounds,
                games,
                seed,
                bot,
            };
            handle_sim_command(overrides, output, out, err)
        }
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}
