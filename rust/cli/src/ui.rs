//! Terminal output helpers shared by the commands.

use std::io::Write;
use svein_engine::cards::{cards_to_string, Card};

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// `label: 2♥, 7♣, K♠` or `label: (none)`.
pub fn format_cards(label: &str, cards: &[Card]) -> String {
    if cards.is_empty() {
        format!("{}: (none)", label)
    } else {
        format!("{}: {}", label, cards_to_string(cards))
    }
}
