//! Owned registry of game rooms keyed by id.
//!
//! The repository is a plain value: callers create one, pass it by reference to
//! every operation, and decide how to share it. Concurrent access is the
//! server's concern (see `svein_server::rooms`).

use std::collections::HashMap;

use crate::cards::CardId;
use crate::errors::GameError;
use crate::last_round::PickOutcome;
use crate::play::PlayOutcome;
use crate::room::{LeaveOutcome, Room, RoomConfig, RoomId, RoomSummary, StartOutcome};
use crate::round::NewRoundOutcome;
use crate::scoring::GameResult;

#[derive(Debug, Default)]
pub struct RoomRepository {
    rooms: HashMap<RoomId, Room>,
}

impl RoomRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty waiting room.
    pub fn create(
        &mut self,
        room_id: &str,
        max_players: usize,
        total_rounds: u32,
    ) -> Result<&Room, GameError> {
        self.create_with_config(room_id, RoomConfig::new(max_players, total_rounds))
    }

    pub fn create_with_config(
        &mut self,
        room_id: &str,
        config: RoomConfig,
    ) -> Result<&Room, GameError> {
        if self.rooms.contains_key(room_id) {
            return Err(GameError::RoomAlreadyExists(room_id.to_string()));
        }
        config.validate()?;
        tracing::info!(
            room_id,
            max_players = config.max_players,
            total_rounds = config.total_rounds,
            "room created"
        );
        let room = self
            .rooms
            .entry(room_id.to_string())
            .or_insert_with(|| Room::new(room_id, config));
        Ok(room)
    }

    pub fn get(&self, room_id: &str) -> Result<&Room, GameError> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| GameError::RoomNotFound(room_id.to_string()))
    }

    pub fn get_mut(&mut self, room_id: &str) -> Result<&mut Room, GameError> {
        self.rooms
            .get_mut(room_id)
            .ok_or_else(|| GameError::RoomNotFound(room_id.to_string()))
    }

    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn join(&mut self, room_id: &str, player_name: &str, player_id: &str) -> Result<(), GameError> {
        self.get_mut(room_id)?.join(player_name, player_id)
    }

    pub fn start(&mut self, room_id: &str) -> Result<StartOutcome, GameError> {
        self.get_mut(room_id)?.start()
    }

    pub fn play_cards(
        &mut self,
        room_id: &str,
        player_id: &str,
        cards: &[CardId],
    ) -> Result<PlayOutcome, GameError> {
        self.get_mut(room_id)?.play_cards(player_id, cards)
    }

    pub fn start_new_round(&mut self, room_id: &str) -> Result<NewRoundOutcome, GameError> {
        self.get_mut(room_id)?.start_new_round()
    }

    pub fn last_round_pick(
        &mut self,
        room_id: &str,
        player_id: &str,
        wants_new_card: bool,
    ) -> Result<PickOutcome, GameError> {
        self.get_mut(room_id)?.last_round_pick(player_id, wants_new_card)
    }

    pub fn result(&mut self, room_id: &str) -> Result<GameResult, GameError> {
        Ok(self.get_mut(room_id)?.result())
    }

    /// Id of the room the player is seated in. A player sits in at most one room.
    pub fn find_room_of(&self, player_id: &str) -> Option<&RoomId> {
        self.rooms
            .iter()
            .find(|(_, room)| room.player(player_id).is_some())
            .map(|(id, _)| id)
    }

    /// Removes the player from whichever room holds them. A room left empty is
    /// deleted.
    pub fn leave(&mut self, player_id: &str) -> Result<LeaveOutcome, GameError> {
        let room_id = self
            .find_room_of(player_id)
            .cloned()
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))?;
        let outcome = self.get_mut(&room_id)?.remove_player(player_id)?;
        if outcome.empty {
            self.rooms.remove(&room_id);
            tracing::info!(room_id = %room_id, "empty room removed");
        }
        Ok(outcome)
    }

    pub fn delete(&mut self, room_id: &str) -> Result<Room, GameError> {
        let room = self
            .rooms
            .remove(room_id)
            .ok_or_else(|| GameError::RoomNotFound(room_id.to_string()))?;
        tracing::info!(room_id, "room deleted");
        Ok(room)
    }

    /// Lobby summaries of every room, ordered by id.
    pub fn list(&self) -> Vec<RoomSummary> {
        let mut rooms: Vec<RoomSummary> = self.rooms.values().map(Room::summary).collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
