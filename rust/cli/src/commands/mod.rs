//! Command handler modules for the Svein CLI.
//!
//! Each command lives in its own module and exposes one
//! `handle_COMMAND_command(...) -> Result<(), CliError>` function that writes
//! to the output streams it is given.

pub mod cfg;
pub mod deal;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use deal::handle_deal_command;
pub use sim::handle_sim_command;
