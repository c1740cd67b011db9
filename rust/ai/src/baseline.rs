//! Baseline bot for Svein.
//!
//! Plays cheaply and predictably, which makes it useful for simulations and
//! as a reference opponent.

use crate::SveinBot;
use svein_engine::cards::{Card, Rank};
use svein_engine::room::Room;
use svein_engine::rules::{PlayerMove, legal_single_plays};

/// Cheapest legal single play costing at least this much is worth swapping
/// a pair for instead.
const SWAP_THRESHOLD: Rank = Rank::Ten;

/// Last-round picks below this rank are thrown back for another draw.
const KEEP_THRESHOLD: Rank = Rank::Jack;

/// Simple rule-based bot.
///
/// # Strategy
///
/// **Trick rounds:**
/// - Play the lowest card the rules allow
/// - When that card would be a Ten or better and the hand holds a pair, swap
///   the lowest pair for a fresh card instead
///
/// **Last round:**
/// - Keep drawing while the newest pick is below a Jack
#[derive(Debug, Clone, Default)]
pub struct BaselineBot;

impl BaselineBot {
    pub fn new() -> Self {
        Self
    }

    /// Lowest pair in a rank-sorted hand.
    fn lowest_pair(hand: &[Card]) -> Option<(&Card, &Card)> {
        hand.windows(2)
            .find(|w| w[0].rank == w[1].rank)
            .map(|w| (&w[0], &w[1]))
    }
}

impl SveinBot for BaselineBot {
    fn choose_play(&self, room: &Room, player_id: &str) -> Option<PlayerMove> {
        let hand = &room.player(player_id)?.hand;
        let cheapest = *legal_single_plays(hand, room.last_played_card()).first()?;

        if cheapest.rank >= SWAP_THRESHOLD {
            if let Some((a, b)) = Self::lowest_pair(hand) {
                return Some(PlayerMove::TwoForOne(a.id, b.id));
            }
        }
        Some(PlayerMove::Single(cheapest.id))
    }

    fn wants_new_card(&self, room: &Room, player_id: &str) -> bool {
        let Some(player) = room.player(player_id) else {
            return false;
        };
        match player.last_round_cards.last() {
            Some(newest) => newest.rank < KEEP_THRESHOLD,
            None => true,
        }
    }

    fn name(&self) -> &str {
        "BaselineBot"
    }
}
