//! Deal command: one round's hands from a fresh deck, for inspection.

use crate::config;
use crate::error::CliError;
use crate::ui;
use rand::SeedableRng;
use std::io::Write;
use svein_engine::cards::DECK_SIZE;
use svein_engine::deck::{Deck, GameRng};

/// Handle the deal command.
///
/// `players` and `cards` fall back to the configured player count and round
/// count, since a game's first round deals one card per round.
pub fn handle_deal_command(
    players: Option<u8>,
    cards: Option<u8>,
    seed: Option<u64>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let defaults = config::load_with_sources()?.config;
    let players = players.map(usize::from).unwrap_or(defaults.players);
    let cards = cards
        .map(usize::from)
        .unwrap_or(defaults.total_rounds as usize);
    if players * cards > DECK_SIZE {
        return Err(CliError::InvalidInput(format!(
            "{} hands of {} cards need more than {} cards",
            players, cards, DECK_SIZE
        )));
    }

    let seed = seed.or(defaults.seed).unwrap_or_else(rand::random);
    let mut rng = GameRng::seed_from_u64(seed);
    let deck = Deck::generate(&mut rng);
    let dealt = deck.deal(cards, players, &mut rng);

    writeln!(out, "Seed: {}", seed)?;
    for (seat, hand) in dealt.hands.iter().enumerate() {
        writeln!(out, "{}", ui::format_cards(&format!("Player {}", seat + 1), hand))?;
    }
    writeln!(out, "Deck: {} cards left", dealt.remaining.len())?;
    Ok(())
}
