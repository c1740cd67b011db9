//! # svein-ai: Bot Players for Svein
//!
//! Provides bot implementations that can sit at a Svein table in place of a
//! human player. Every bot answers the same two questions: which cards to play
//! in a trick round, and whether to draw again in the last-round picking phase.
//!
//! ## Core Components
//!
//! - [`SveinBot`] - Trait defining the interface for bot decision-making
//! - [`baseline`] - Rule-based bot used by the simulator
//! - [`random`] - Bot choosing uniformly among legal moves
//! - [`create_bot`] - Factory function for creating bots by name
//!
//! ## Quick Start
//!
//! ```rust
//! use svein_ai::{create_bot, SveinBot};
//! use svein_engine::room::{Room, RoomConfig};
//!
//! let bot = create_bot("baseline").expect("known bot");
//!
//! let mut room = Room::new("demo", RoomConfig::new(2, 5).with_seed(42));
//! room.join("Ann", "p1").unwrap();
//! room.join("Bob", "p2").unwrap();
//! room.start().unwrap();
//!
//! let on_turn = room.current_player().unwrap().id.clone();
//! let mv = bot.choose_play(&room, &on_turn).expect("cards in hand");
//! room.play_move(&on_turn, mv).expect("bots only choose legal moves");
//! ```
//!
//! ## Bot Types
//!
//! - `"baseline"` - Cheapest legal card, pair swaps for expensive tricks
//! - `"random"` - Uniform choice among legal moves

use svein_engine::room::Room;
use svein_engine::rules::PlayerMove;
use thiserror::Error;

pub mod baseline;
pub mod random;

/// Trait defining the interface for bot players.
///
/// Bots only ever propose moves; the room validates and applies them, so a
/// buggy bot is rejected like any other player.
pub trait SveinBot: Send + Sync {
    /// Picks a legal move for `player_id` in a trick round.
    ///
    /// Returns `None` when the player is not seated or holds no cards.
    fn choose_play(&self, room: &Room, player_id: &str) -> Option<PlayerMove>;

    /// Last-round decision: draw another card (`true`) or bank the newest pick.
    fn wants_new_card(&self, room: &Room, player_id: &str) -> bool;

    /// Return the name/identifier of this bot implementation.
    fn name(&self) -> &str;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BotError {
    #[error("Unknown bot type: {0}")]
    UnknownBot(String),
}

/// Factory function to create bots by type string.
///
/// ```rust
/// use svein_ai::{create_bot, BotError};
///
/// let bot = create_bot("baseline").unwrap();
/// assert_eq!(bot.name(), "BaselineBot");
/// assert!(matches!(create_bot("shark"), Err(BotError::UnknownBot(_))));
/// ```
pub fn create_bot(bot_type: &str) -> Result<Box<dyn SveinBot>, BotError> {
    match bot_type {
        "baseline" => Ok(Box::new(baseline::BaselineBot::new())),
        "random" => Ok(Box::new(random::RandomBot::new(rand::random()))),
        other => Err(BotError::UnknownBot(other.to_string())),
    }
}

/// Like [`create_bot`], but bots that use randomness are seeded for replays.
pub fn create_seeded_bot(bot_type: &str, seed: u64) -> Result<Box<dyn SveinBot>, BotError> {
    match bot_type {
        "random" => Ok(Box::new(random::RandomBot::new(seed))),
        other => create_bot(other),
    }
}

/// Names accepted by [`create_bot`].
pub fn available_bots() -> &'static [&'static str] {
    &["baseline", "random"]
}
