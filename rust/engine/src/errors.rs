use thiserror::Error;

use crate::cards::Rank;
use crate::room::{PlayerId, RoomId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Room with ID {0} already exists")]
    RoomAlreadyExists(RoomId),
    #[error("Room with ID {0} does not exist")]
    RoomNotFound(RoomId),
    #[error("Invalid room configuration: {0}")]
    InvalidRoomConfig(String),
    #[error("Room with ID {0} is full")]
    RoomFull(RoomId),
    #[error("Player name cannot be empty")]
    EmptyName,
    #[error("Room with ID {0} has already started")]
    AlreadyStarted(RoomId),
    #[error("Player {0} is already in the room")]
    DuplicatePlayer(PlayerId),
    #[error("Not enough players to start the game: {found} joined, at least 2 required")]
    NotEnoughPlayers { found: usize },
    #[error("Player {0} not found in the room")]
    PlayerNotFound(PlayerId),
    #[error("Game is not in progress")]
    GameNotInProgress,
    #[error("It's not your turn")]
    NotYourTurn,
    #[error("You do not have these cards")]
    CardsNotOwned,
    #[error("You can only play one or two cards at a time (got {0})")]
    InvalidCardCount(usize),
    #[error("The same card was named twice")]
    DuplicateCard,
    #[error("You must play a higher card than {last:?}")]
    MustPlayHigher { last: Rank },
    #[error("You must play your smallest card")]
    MustPlaySmallest,
    #[error("You must play two cards of the same rank for a two-for-one")]
    MismatchedRank,
    #[error("Cards cannot be played during the last round")]
    LastRoundInProgress,
    #[error("Picking is only allowed during the last round")]
    NotLastRound,
    #[error("You have already saved your cards for the last round")]
    AlreadyDonePicking,
    #[error("You have already picked the maximum number of cards this turn")]
    PickPileFull,
    #[error("There is no picked card to save")]
    NothingToBank,
    #[error("No cards left to restock the deck")]
    NoCardsToRestock,
    #[error("No cards left in the deck")]
    NoCardsLeft,
    #[error("No player found in room {0}")]
    NoPlayers(RoomId),
}

impl GameError {
    /// Fatal errors mean a room invariant is broken; the room cannot continue.
    /// Everything else is a request error that left the room untouched.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameError::NoCardsToRestock | GameError::NoCardsLeft | GameError::NoPlayers(_)
        )
    }

    /// Stable machine-readable name of the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::RoomAlreadyExists(_) => "room_already_exists",
            GameError::RoomNotFound(_) => "room_not_found",
            GameError::InvalidRoomConfig(_) => "invalid_room_config",
            GameError::RoomFull(_) => "room_full",
            GameError::EmptyName => "empty_name",
            GameError::AlreadyStarted(_) => "already_started",
            GameError::DuplicatePlayer(_) => "duplicate_player",
            GameError::NotEnoughPlayers { .. } => "not_enough_players",
            GameError::PlayerNotFound(_) => "player_not_found",
            GameError::GameNotInProgress => "game_not_in_progress",
            GameError::NotYourTurn => "not_your_turn",
            GameError::CardsNotOwned => "cards_not_owned",
            GameError::InvalidCardCount(_) => "invalid_card_count",
            GameError::DuplicateCard => "duplicate_card",
            GameError::MustPlayHigher { .. } => "must_play_higher",
            GameError::MustPlaySmallest => "must_play_smallest",
            GameError::MismatchedRank => "mismatched_rank",
            GameError::LastRoundInProgress => "last_round_in_progress",
            GameError::NotLastRound => "not_last_round",
            GameError::AlreadyDonePicking => "already_done_picking",
            GameError::PickPileFull => "pick_pile_full",
            GameError::NothingToBank => "nothing_to_bank",
            GameError::NoCardsToRestock => "no_cards_to_restock",
            GameError::NoCardsLeft => "no_cards_left",
            GameError::NoPlayers(_) => "no_players",
        }
    }
}
