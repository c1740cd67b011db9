//! Concurrent room service.
//!
//! Each room sits behind its own mutex, so operations on one room run one at a
//! time while different rooms proceed in parallel. The service also chains the
//! follow-up steps of a turn (next round, results, cleanup) and publishes
//! events for every state change.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use svein_engine::cards::{Card, CardId};
use svein_engine::errors::GameError;
use svein_engine::last_round::PickOutcome;
use svein_engine::play::PlayOutcome;
use svein_engine::room::{
    LeaveOutcome, PlayerId, Room, RoomConfig, RoomId, RoomSummary, StartOutcome,
};
use svein_engine::round::NewRoundOutcome;
use svein_engine::scoring::GameResult;
use uuid::Uuid;

use crate::errors::{ErrorSeverity, IntoErrorResponse, ServiceError};
use crate::events::{EventBus, GameEvent, PlayerInfo, Standing, LOBBY_CHANNEL};
use crate::settings::SettingsStore;

/// Parameters for [`RoomService::create_room`]. Omitted limits fall back to
/// the configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    /// Generated when absent
    #[serde(default)]
    pub room_id: Option<RoomId>,
    #[serde(default)]
    pub creator_id: Option<PlayerId>,
    #[serde(default)]
    pub max_players: Option<usize>,
    #[serde(default)]
    pub total_rounds: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Everything that happened because of one play.
#[derive(Debug, Clone, Serialize)]
pub struct PlayReport {
    pub play: PlayOutcome,
    /// Present when the play finished the round
    pub new_round: Option<NewRoundOutcome>,
    /// Present when the game ended; the room has been deleted
    pub result: Option<GameResult>,
}

/// Everything that happened because of one last-round pick.
#[derive(Debug, Clone, Serialize)]
pub struct PickReport {
    pub pick: PickOutcome,
    /// Present when the pick ended the game; the room has been deleted
    pub result: Option<GameResult>,
}

/// Everything that happened because a player left.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveReport {
    pub leave: LeaveOutcome,
    pub new_round: Option<NewRoundOutcome>,
    pub result: Option<GameResult>,
    /// The room no longer exists
    pub room_closed: bool,
}

/// How a room update ended, as far as orchestration is concerned.
struct Continuation {
    new_round: Option<NewRoundOutcome>,
    result: Option<GameResult>,
}

#[derive(Debug)]
pub struct RoomService {
    rooms: RwLock<HashMap<RoomId, Arc<Mutex<Room>>>>,
    /// Which room each connected player sits in
    seats: RwLock<HashMap<PlayerId, RoomId>>,
    event_bus: Arc<EventBus>,
    settings: Arc<SettingsStore>,
}

impl RoomService {
    pub fn new(event_bus: Arc<EventBus>, settings: Arc<SettingsStore>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            seats: RwLock::new(HashMap::new()),
            event_bus,
            settings,
        }
    }

    pub fn create_room(&self, request: CreateRoomRequest) -> Result<RoomSummary, ServiceError> {
        let settings = self.settings.get()?;
        let max_players = request.max_players.unwrap_or(settings.default_max_players);
        let total_rounds = request.total_rounds.unwrap_or(settings.default_total_rounds);
        if max_players > settings.max_players_limit {
            return Err(GameError::InvalidRoomConfig(format!(
                "max_players must be at most {}",
                settings.max_players_limit
            ))
            .into());
        }
        if total_rounds > settings.max_total_rounds {
            return Err(GameError::InvalidRoomConfig(format!(
                "total_rounds must be at most {}",
                settings.max_total_rounds
            ))
            .into());
        }

        let mut config = RoomConfig::new(max_players, total_rounds);
        config.creator_id = request.creator_id;
        config.seed = request.seed;
        config.validate()?;

        let room_id = request
            .room_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let room = Room::new(room_id.clone(), config);
        let summary = room.summary();
        {
            let mut guard = self
                .rooms
                .write()
                .map_err(|_| ServiceError::StoragePoisoned)?;
            if guard.contains_key(&room_id) {
                return Err(GameError::RoomAlreadyExists(room_id).into());
            }
            guard.insert(room_id.clone(), Arc::new(Mutex::new(room)));
        }

        tracing::info!(
            room_id = %room_id,
            max_players,
            total_rounds,
            "room created"
        );
        self.event_bus.broadcast(
            LOBBY_CHANNEL,
            GameEvent::RoomCreated {
                room: summary.clone(),
            },
        );
        self.publish_rooms();
        Ok(summary)
    }

    pub fn join_room(
        &self,
        room_id: &str,
        player_name: &str,
        player_id: &str,
    ) -> Result<RoomSummary, ServiceError> {
        // seats before room: the only order in which both locks are held
        let mut seats = self
            .seats
            .write()
            .map_err(|_| ServiceError::StoragePoisoned)?;
        let handle = self.room_handle(room_id)?;
        let summary = {
            let mut room = lock_room(&handle)?;
            if let Some(other) = seats.get(player_id) {
                if other != room_id {
                    tracing::info!(player_id, seated_in = %other, "player already seated elsewhere");
                }
                return Err(GameError::DuplicatePlayer(player_id.to_string()).into());
            }
            room.join(player_name, player_id)
                .map_err(|e| rejected(room_id, Some(player_id), e))?;
            room.summary()
        };
        seats.insert(player_id.to_string(), room_id.to_string());
        drop(seats);

        self.event_bus.broadcast(
            room_id,
            GameEvent::PlayerJoined {
                room_id: room_id.to_string(),
                player_id: player_id.to_string(),
                player_name: player_name.trim().to_string(),
            },
        );
        self.publish_rooms();
        Ok(summary)
    }

    pub fn start_room(&self, room_id: &str) -> Result<StartOutcome, ServiceError> {
        let handle = self.room_handle(room_id)?;
        let outcome = lock_room(&handle)?
            .start()
            .map_err(|e| rejected(room_id, None, e))?;

        for player in &outcome.players {
            self.event_bus.broadcast(
                &player.id,
                GameEvent::NewHand {
                    room_id: room_id.to_string(),
                    round: outcome.round,
                    cards: player.hand.clone(),
                    saved_cards: player.saved_cards.clone(),
                },
            );
        }
        self.event_bus.broadcast(
            room_id,
            GameEvent::GameStarted {
                room_id: room_id.to_string(),
                players: outcome.players.iter().map(PlayerInfo::from).collect(),
                first_player: outcome.next_player.name.clone(),
                round: outcome.round,
                status: outcome.status,
            },
        );
        if outcome.round == 1 {
            self.announce_last_round(
                room_id,
                &outcome.next_player.name,
                &outcome.next_player.last_round_cards,
            );
        }
        self.prompt_turn(room_id, &outcome.next_player.id);
        self.publish_rooms();
        Ok(outcome)
    }

    /// Plays cards and runs whatever the play set in motion: a finished round
    /// starts the next one, and a finished game is scored and its room deleted.
    pub fn play_cards(
        &self,
        room_id: &str,
        player_id: &str,
        cards: &[CardId],
    ) -> Result<PlayReport, ServiceError> {
        let handle = self.room_handle(room_id)?;
        let (play, table_event, cont) = {
            let mut room = lock_room(&handle)?;
            let play = room
                .play_cards(player_id, cards)
                .map_err(|e| rejected(room_id, Some(player_id), e))?;
            // read the table before a new round clears it
            let table_event = if cards.len() == 1 {
                room.last_played_card()
                    .copied()
                    .map(|card| GameEvent::CardsPlayed {
                        room_id: room_id.to_string(),
                        player_name: play.current_player.name.clone(),
                        card,
                        next_player: play.next_player.name.clone(),
                    })
            } else {
                let discard = room.discard_pile();
                Some(GameEvent::TwoForOne {
                    room_id: room_id.to_string(),
                    player_name: play.current_player.name.clone(),
                    discarded: discard[discard.len().saturating_sub(2)..].to_vec(),
                    next_player: play.next_player.name.clone(),
                })
            };
            let cont = continue_after(&mut room, play.round_finished)
                .map_err(|e| rejected(room_id, Some(player_id), e))?;
            (play, table_event, cont)
        };

        if let Some(event) = table_event {
            self.event_bus.broadcast(room_id, event);
        }

        let next_player = &play.next_player;
        self.finish_turn(room_id, &cont, Some(&next_player.id))?;
        Ok(PlayReport {
            play,
            new_round: cont.new_round,
            result: cont.result,
        })
    }

    /// Draws or banks in the last round; a finished picking phase ends the game.
    pub fn last_round_pick(
        &self,
        room_id: &str,
        player_id: &str,
        wants_new_card: bool,
    ) -> Result<PickReport, ServiceError> {
        let handle = self.room_handle(room_id)?;
        let (pick, cont) = {
            let mut room = lock_room(&handle)?;
            let pick = room
                .last_round_pick(player_id, wants_new_card)
                .map_err(|e| rejected(room_id, Some(player_id), e))?;
            let cont = continue_after(&mut room, pick.round_finished)
                .map_err(|e| rejected(room_id, Some(player_id), e))?;
            (pick, cont)
        };

        self.event_bus.broadcast(
            room_id,
            GameEvent::LastRoundPicked {
                room_id: room_id.to_string(),
                player_name: pick.current_player.name.clone(),
                pick_pile: pick.pick_pile.clone(),
                next_player: pick.next_player.name.clone(),
            },
        );
        if pick.next_player.id != pick.current_player.id {
            self.event_bus.broadcast(
                &pick.current_player.id,
                GameEvent::SavedCards {
                    room_id: room_id.to_string(),
                    saved_cards: pick.current_player.saved_cards.clone(),
                },
            );
        }

        self.finish_turn(room_id, &cont, Some(&pick.next_player.id))?;
        Ok(PickReport {
            pick,
            result: cont.result,
        })
    }

    /// Removes a disconnected player from their room.
    pub fn leave(&self, player_id: &str) -> Result<LeaveReport, ServiceError> {
        let mut seats = self
            .seats
            .write()
            .map_err(|_| ServiceError::StoragePoisoned)?;
        let room_id = seats
            .get(player_id)
            .cloned()
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))?;
        let handle = self.room_handle(&room_id)?;
        let (leave, cont) = {
            let mut room = lock_room(&handle)?;
            let leave = room.remove_player(player_id)?;
            let cont = if leave.terminated {
                Continuation {
                    new_round: None,
                    result: Some(room.result()),
                }
            } else {
                continue_after(&mut room, leave.round_finished)?
            };
            (leave, cont)
        };
        seats.remove(player_id);
        drop(seats);

        self.event_bus.broadcast(
            &room_id,
            GameEvent::PlayerLeft {
                room_id: room_id.clone(),
                player_id: player_id.to_string(),
                terminated: leave.terminated,
            },
        );

        let next = leave.next_player.as_ref().map(|p| p.id.as_str());
        self.finish_turn(&room_id, &cont, next)?;

        let room_closed = if cont.result.is_some() {
            true
        } else if leave.empty {
            self.delete_room(&room_id)?;
            true
        } else {
            self.publish_rooms();
            false
        };

        Ok(LeaveReport {
            leave,
            new_round: cont.new_round,
            result: cont.result,
            room_closed,
        })
    }

    pub fn delete_room(&self, room_id: &str) -> Result<(), ServiceError> {
        let removed = {
            let mut guard = self
                .rooms
                .write()
                .map_err(|_| ServiceError::StoragePoisoned)?;
            guard.remove(room_id)
        };
        if removed.is_none() {
            return Err(GameError::RoomNotFound(room_id.to_string()).into());
        }
        {
            let mut seats = self
                .seats
                .write()
                .map_err(|_| ServiceError::StoragePoisoned)?;
            seats.retain(|_, seated_in| seated_in != room_id);
        }

        tracing::info!(room_id, "room deleted");
        self.event_bus.broadcast(
            room_id,
            GameEvent::RoomClosed {
                room_id: room_id.to_string(),
            },
        );
        self.event_bus.drop_channel(room_id);
        self.publish_rooms();
        Ok(())
    }

    /// Scores the game without deleting the room.
    pub fn result(&self, room_id: &str) -> Result<GameResult, ServiceError> {
        let handle = self.room_handle(room_id)?;
        let result = lock_room(&handle)?.result();
        Ok(result)
    }

    /// Copy of the room as it is right now.
    pub fn room(&self, room_id: &str) -> Result<Room, ServiceError> {
        let handle = self.room_handle(room_id)?;
        let room = lock_room(&handle)?.clone();
        Ok(room)
    }

    pub fn list_rooms(&self) -> Result<Vec<RoomSummary>, ServiceError> {
        let handles: Vec<Arc<Mutex<Room>>> = {
            let guard = self
                .rooms
                .read()
                .map_err(|_| ServiceError::StoragePoisoned)?;
            guard.values().cloned().collect()
        };
        let mut rooms = Vec::with_capacity(handles.len());
        for handle in handles {
            rooms.push(lock_room(&handle)?.summary());
        }
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rooms)
    }

    pub fn room_of(&self, player_id: &str) -> Result<Option<RoomId>, ServiceError> {
        let seats = self
            .seats
            .read()
            .map_err(|_| ServiceError::StoragePoisoned)?;
        Ok(seats.get(player_id).cloned())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.read().map(|guard| guard.len()).unwrap_or(0)
    }

    fn room_handle(&self, room_id: &str) -> Result<Arc<Mutex<Room>>, ServiceError> {
        let guard = self
            .rooms
            .read()
            .map_err(|_| ServiceError::StoragePoisoned)?;
        guard
            .get(room_id)
            .cloned()
            .ok_or_else(|| GameError::RoomNotFound(room_id.to_string()).into())
    }

    /// Publishes the follow-up of a turn and closes finished games.
    fn finish_turn(
        &self,
        room_id: &str,
        cont: &Continuation,
        next_player: Option<&str>,
    ) -> Result<(), ServiceError> {
        if let Some(result) = &cont.result {
            let standings: Vec<Standing> = result.players.iter().map(Standing::from).collect();
            tracing::info!(room_id, players = standings.len(), "game finished");
            self.event_bus.broadcast(
                room_id,
                GameEvent::GameFinished {
                    room_id: room_id.to_string(),
                    standings,
                },
            );
            return self.delete_room(room_id);
        }

        if let Some(round) = &cont.new_round {
            for player in &round.players {
                self.event_bus.broadcast(
                    &player.id,
                    GameEvent::NewHand {
                        room_id: room_id.to_string(),
                        round: round.next_round,
                        cards: player.hand.clone(),
                        saved_cards: player.saved_cards.clone(),
                    },
                );
            }
            if round.next_round == 1 {
                self.announce_last_round(
                    room_id,
                    &round.next_player.name,
                    &round.next_player.last_round_cards,
                );
            } else {
                self.event_bus.broadcast(
                    room_id,
                    GameEvent::RoundStarted {
                        room_id: room_id.to_string(),
                        round: round.next_round,
                        first_player: round.next_player.name.clone(),
                    },
                );
            }
            self.prompt_turn(room_id, &round.next_player.id);
        } else if let Some(next) = next_player {
            self.prompt_turn(room_id, next);
        }
        Ok(())
    }

    fn announce_last_round(&self, room_id: &str, first_player: &str, pick_pile: &[Card]) {
        self.event_bus.broadcast(
            room_id,
            GameEvent::LastRoundStarted {
                room_id: room_id.to_string(),
                first_player: first_player.to_string(),
                pick_pile: pick_pile.to_vec(),
            },
        );
    }

    fn prompt_turn(&self, room_id: &str, player_id: &str) {
        self.event_bus.broadcast(
            player_id,
            GameEvent::YourTurn {
                room_id: room_id.to_string(),
            },
        );
    }

    fn publish_rooms(&self) {
        match self.list_rooms() {
            Ok(rooms) => self
                .event_bus
                .broadcast(LOBBY_CHANNEL, GameEvent::RoomsUpdated { rooms }),
            Err(err) => tracing::error!(error = %err, "failed to list rooms for lobby update"),
        }
    }
}

/// Logs an engine error by severity: a bad request at `info`, a broken room
/// invariant at `error`.
fn rejected(room_id: &str, player_id: Option<&str>, err: GameError) -> ServiceError {
    let response = err.to_error_response();
    let player_id = player_id.unwrap_or("-");
    match err.severity() {
        ErrorSeverity::Critical => tracing::error!(
            room_id,
            player_id,
            error = %response.error,
            critical = true,
            "{}",
            response.message
        ),
        _ => tracing::info!(
            room_id,
            player_id,
            error = %response.error,
            "request rejected: {}",
            response.message
        ),
    }
    ServiceError::Game(err)
}

fn lock_room(handle: &Arc<Mutex<Room>>) -> Result<MutexGuard<'_, Room>, ServiceError> {
    handle.lock().map_err(|_| ServiceError::StoragePoisoned)
}

/// Advances a room past a finished round while its lock is held, so no other
/// operation can observe the in-between state.
fn continue_after(room: &mut Room, round_finished: bool) -> Result<Continuation, GameError> {
    if !round_finished {
        return Ok(Continuation {
            new_round: None,
            result: None,
        });
    }
    let new_round = room.start_new_round()?;
    if new_round.game_over {
        return Ok(Continuation {
            new_round: None,
            result: Some(room.result()),
        });
    }
    Ok(Continuation {
        new_round: Some(new_round),
        result: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogCapture;
    use tracing::Level;

    #[test]
    fn broken_invariant_is_logged_at_error() {
        let capture = LogCapture::new();
        let err = capture.during(|| rejected("g1", Some("p1"), GameError::NoCardsToRestock));

        assert!(matches!(err, ServiceError::Game(GameError::NoCardsToRestock)));
        let logged = capture.with_error_code(Level::ERROR, "no_cards_to_restock");
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].field("critical"), Some("true"));
        assert!(capture.with_error_code(Level::INFO, "no_cards_to_restock").is_empty());
    }

    #[test]
    fn request_error_is_logged_at_info() {
        let capture = LogCapture::new();
        capture.during(|| rejected("g1", None, GameError::CardsNotOwned));

        let logged = capture.with_error_code(Level::INFO, "cards_not_owned");
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].field("player_id"), Some("-"));
    }
}
