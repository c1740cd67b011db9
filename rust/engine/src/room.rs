//! Room state, membership, and the turn tracker.
//!
//! A [`Room`] owns every pile of one game. All mutation goes through methods on
//! the room (this module and the rule modules next to it), so the turn-index and
//! card-conservation invariants are enforced in one place.

use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::deck::{Deck, GameRng};
use crate::errors::GameError;
use crate::player::Player;

pub type RoomId = String;
pub type PlayerId = String;

/// Minimum seated players for a game to start.
pub const MIN_PLAYERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    Started,
    Finished,
}

/// Parameters fixed at room creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub max_players: usize,
    pub total_rounds: u32,
    #[serde(default)]
    pub creator_id: Option<PlayerId>,
    /// Seed for shuffles, card ids, and the starting player
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RoomConfig {
    pub fn new(max_players: usize, total_rounds: u32) -> Self {
        Self {
            max_players,
            total_rounds,
            creator_id: None,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_creator(mut self, creator_id: impl Into<PlayerId>) -> Self {
        self.creator_id = Some(creator_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.max_players < MIN_PLAYERS {
            return Err(GameError::InvalidRoomConfig(format!(
                "max_players must be at least {}",
                MIN_PLAYERS
            )));
        }
        if self.total_rounds == 0 {
            return Err(GameError::InvalidRoomConfig(
                "total_rounds must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub(crate) id: RoomId,
    pub(crate) creator_id: Option<PlayerId>,
    pub(crate) players: Vec<Player>,
    pub(crate) max_players: usize,
    pub(crate) status: RoomStatus,
    /// Counts down from `total_rounds`; 1 is the last (picking) round
    pub(crate) round: u32,
    pub(crate) total_rounds: u32,
    pub(crate) deck: Deck,
    pub(crate) discard_pile: Vec<Card>,
    /// Single plays of the current round, oldest first
    pub(crate) played_cards: Vec<Card>,
    pub(crate) player_turn_index: usize,
    pub(crate) starting_player_index: usize,
    pub(crate) last_played_card: Option<Card>,
    pub(crate) seed: u64,
    #[serde(skip)]
    pub(crate) rng: GameRng,
}

/// Post-start snapshot returned by [`Room::start`].
#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub players: Vec<Player>,
    pub next_player: Player,
    pub status: RoomStatus,
    pub round: u32,
}

/// Lobby view of a room, used for status broadcasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub creator_id: Option<PlayerId>,
    pub players: Vec<String>,
    pub max_players: usize,
    pub status: RoomStatus,
    pub round: u32,
    pub total_rounds: u32,
}

/// What happened when a player was removed from a room.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    pub player: Player,
    /// Player now on turn, if the game is still running
    pub next_player: Option<Player>,
    /// The removal completed the current round
    pub round_finished: bool,
    /// The game was force-finished because too few players remain
    pub terminated: bool,
    /// Nobody is left in the room
    pub empty: bool,
}

impl Room {
    pub fn new(id: impl Into<RoomId>, config: RoomConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            id: id.into(),
            creator_id: config.creator_id,
            players: Vec::new(),
            max_players: config.max_players,
            status: RoomStatus::Waiting,
            round: config.total_rounds,
            total_rounds: config.total_rounds,
            deck: Deck::default(),
            discard_pile: Vec::new(),
            played_cards: Vec::new(),
            player_turn_index: 0,
            starting_player_index: 0,
            last_played_card: None,
            seed,
            rng: GameRng::seed_from_u64(seed),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }
    pub fn creator_id(&self) -> Option<&PlayerId> {
        self.creator_id.as_ref()
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn max_players(&self) -> usize {
        self.max_players
    }
    pub fn status(&self) -> RoomStatus {
        self.status
    }
    pub fn round(&self) -> u32 {
        self.round
    }
    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }
    pub fn deck(&self) -> &Deck {
        &self.deck
    }
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }
    pub fn played_cards(&self) -> &[Card] {
        &self.played_cards
    }
    pub fn player_turn_index(&self) -> usize {
        self.player_turn_index
    }
    pub fn starting_player_index(&self) -> usize {
        self.starting_player_index
    }
    pub fn last_played_card(&self) -> Option<&Card> {
        self.last_played_card.as_ref()
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            creator_id: self.creator_id.clone(),
            players: self.players.iter().map(|p| p.name.clone()).collect(),
            max_players: self.max_players,
            status: self.status,
            round: self.round,
            total_rounds: self.total_rounds,
        }
    }

    /// Ids of every card in every pile of the room. A healthy room never
    /// reports the same id twice.
    pub fn card_census(&self) -> Vec<CardId> {
        self.deck
            .cards()
            .iter()
            .chain(self.discard_pile.iter())
            .chain(self.played_cards.iter())
            .chain(self.players.iter().flat_map(|p| p.all_cards()))
            .map(|c| c.id)
            .collect()
    }

    // ---- turn tracker ----

    /// The player on turn, or `None` when the room has no players.
    pub fn current_player(&self) -> Option<&Player> {
        self.current_index().map(|idx| &self.players[idx])
    }

    /// Moves the turn to the next seat and returns the player now on turn.
    pub fn advance_turn(&mut self) -> Option<&Player> {
        if self.players.is_empty() {
            return None;
        }
        self.player_turn_index = (self.player_turn_index + 1) % self.players.len();
        self.current_player()
    }

    pub(crate) fn current_index(&self) -> Option<usize> {
        if self.players.is_empty() {
            None
        } else {
            Some(self.player_turn_index % self.players.len())
        }
    }

    /// Current seat in a room that must have players.
    pub(crate) fn require_current(&self) -> Result<usize, GameError> {
        self.current_index()
            .ok_or_else(|| GameError::NoPlayers(self.id.clone()))
    }

    pub(crate) fn advance_turn_index(&mut self) -> Result<usize, GameError> {
        if self.advance_turn().is_none() {
            tracing::error!(room_id = %self.id, "advanced turn in a room with no players");
            return Err(GameError::NoPlayers(self.id.clone()));
        }
        Ok(self.player_turn_index)
    }

    pub(crate) fn player_index(&self, player_id: &str) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))
    }

    pub(crate) fn ensure_in_progress(&self) -> Result<(), GameError> {
        if self.status == RoomStatus::Started {
            Ok(())
        } else {
            Err(GameError::GameNotInProgress)
        }
    }

    pub(crate) fn ensure_turn(&self, seat: usize) -> Result<(), GameError> {
        match self.current_index() {
            Some(current) if current == seat => Ok(()),
            _ => Err(GameError::NotYourTurn),
        }
    }

    pub(crate) fn snapshot(&self, seat: usize) -> Player {
        self.players[seat].clone()
    }

    // ---- membership ----

    /// Seats a new player at the end of the turn order.
    pub fn join(&mut self, player_name: &str, player_id: &str) -> Result<(), GameError> {
        if self.is_full() {
            return Err(GameError::RoomFull(self.id.clone()));
        }
        let name = player_name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyName);
        }
        if self.status != RoomStatus::Waiting {
            return Err(GameError::AlreadyStarted(self.id.clone()));
        }
        if self.player(player_id).is_some() {
            return Err(GameError::DuplicatePlayer(player_id.to_string()));
        }
        self.players.push(Player::new(player_id, name));
        tracing::info!(room_id = %self.id, player_id, player_name = name, "player joined room");
        Ok(())
    }

    /// Deals the first round from a fresh deck and picks a random starting player.
    /// A one-round game goes straight into the picking phase.
    pub fn start(&mut self) -> Result<StartOutcome, GameError> {
        if self.status != RoomStatus::Waiting {
            return Err(GameError::AlreadyStarted(self.id.clone()));
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers {
                found: self.players.len(),
            });
        }

        self.played_cards.clear();
        self.discard_pile.clear();
        self.last_played_card = None;
        self.starting_player_index = self.rng.random_range(0..self.players.len());
        self.player_turn_index = self.starting_player_index;
        self.status = RoomStatus::Started;

        let mut deck = Deck::generate(&mut self.rng);
        deck.shuffle(&mut self.rng);
        self.open_round(deck)?;

        let seat = self.require_current()?;
        tracing::info!(
            room_id = %self.id,
            players = self.players.len(),
            round = self.round,
            first_player = %self.players[seat].name,
            "game started"
        );

        Ok(StartOutcome {
            players: self.players.clone(),
            next_player: self.snapshot(seat),
            status: self.status,
            round: self.round,
        })
    }

    /// Removes a player and every card they hold from the room.
    ///
    /// In a running game the turn stays with whoever was on turn; if the leaver
    /// was on turn it passes to the next seat. Fewer than two remaining players
    /// force-finish the game.
    pub fn remove_player(&mut self, player_id: &str) -> Result<LeaveOutcome, GameError> {
        let seat = self.player_index(player_id)?;
        let player = self.players.remove(seat);
        let remaining = self.players.len();

        if remaining == 0 {
            self.player_turn_index = 0;
            self.starting_player_index = 0;
        } else {
            self.player_turn_index = reseat_index(self.player_turn_index, seat, remaining);
            self.starting_player_index = reseat_index(self.starting_player_index, seat, remaining);
        }

        tracing::info!(room_id = %self.id, player_id, remaining, "player left room");

        let mut outcome = LeaveOutcome {
            room_id: self.id.clone(),
            player,
            next_player: None,
            round_finished: false,
            terminated: false,
            empty: remaining == 0,
        };

        if self.status != RoomStatus::Started {
            return Ok(outcome);
        }

        if remaining < MIN_PLAYERS {
            self.status = RoomStatus::Finished;
            outcome.terminated = true;
            tracing::warn!(room_id = %self.id, remaining, "game terminated: not enough players left");
            return Ok(outcome);
        }

        let current = self.require_current()?;
        if self.round == 1 {
            let total = self.total_rounds;
            let needs_opening = {
                let p = &self.players[current];
                p.last_round_cards.is_empty() && !p.done_picking(total)
            };
            if needs_opening {
                let card = self.deck.draw().ok_or(GameError::NoCardsLeft)?;
                self.players[current].last_round_cards.push(card);
            }
        }
        outcome.round_finished = self.check_round_finished();
        outcome.next_player = Some(self.snapshot(current));
        Ok(outcome)
    }
}

/// Index fix-up after the seat `removed` disappears from a table that now has
/// `remaining` seats. Seats after the removed one shift down by one; a pointer
/// at the removed seat lands on its successor.
fn reseat_index(index: usize, removed: usize, remaining: usize) -> usize {
    let index = if index > removed { index - 1 } else { index };
    index % remaining
}
