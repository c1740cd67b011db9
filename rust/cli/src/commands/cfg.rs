//! Configuration command handler.
//!
//! Prints the resolved configuration as JSON, each value paired with the
//! layer it came from:
//!
//! ```json
//! {
//!   "players": {
//!     "value": 4,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "players": {
            "value": config.players,
            "source": sources.players,
        },
        "total_rounds": {
            "value": config.total_rounds,
            "source": sources.total_rounds,
        },
        "games": {
            "value": config.games,
            "source": sources.games,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "bot": {
            "value": config.bot,
            "source": sources.bot,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
