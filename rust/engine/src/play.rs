//! Move validation and application for trick rounds.

use serde::Serialize;

use crate::cards::{cards_to_string, Card, CardId};
use crate::errors::GameError;
use crate::player::Player;
use crate::room::Room;
use crate::rules::{validate_single_play, validate_two_for_one, PlayerMove};

/// Result of an accepted play.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayOutcome {
    /// The acting player after the play
    pub current_player: Player,
    /// The player now on turn
    pub next_player: Player,
    /// The play completed the round; the caller should start the next one
    pub round_finished: bool,
    /// The acting player's hand after the play
    pub new_hand: Vec<Card>,
}

impl Room {
    /// Validates and applies a play given as raw card ids.
    ///
    /// Checks run in a fixed order and every check happens before any pile is
    /// touched, so a rejected play leaves the room exactly as it was:
    /// player seated, game running, player on turn, not the picking round,
    /// cards owned, one or two distinct cards, then the rank rules.
    pub fn play_cards(
        &mut self,
        player_id: &str,
        cards: &[CardId],
    ) -> Result<PlayOutcome, GameError> {
        let seat = self.player_index(player_id)?;
        self.ensure_in_progress()?;
        self.ensure_turn(seat)?;
        if self.round == 1 {
            return Err(GameError::LastRoundInProgress);
        }
        if !self.players[seat].holds_all(cards) {
            return Err(GameError::CardsNotOwned);
        }
        let mv = PlayerMove::from_cards(cards)?;
        self.apply_move(seat, mv)
    }

    /// Applies an already-parsed move for `player_id`.
    pub fn play_move(&mut self, player_id: &str, mv: PlayerMove) -> Result<PlayOutcome, GameError> {
        self.play_cards(player_id, &mv.card_ids())
    }

    fn apply_move(&mut self, seat: usize, mv: PlayerMove) -> Result<PlayOutcome, GameError> {
        match mv {
            PlayerMove::Single(id) => self.play_single(seat, id)?,
            PlayerMove::TwoForOne(a, b) => self.play_two_for_one(seat, a, b)?,
        }

        let next = self.advance_turn_index()?;
        let round_finished = self.check_round_finished();
        let current_player = self.snapshot(seat);
        Ok(PlayOutcome {
            new_hand: current_player.hand.clone(),
            current_player,
            next_player: self.snapshot(next),
            round_finished,
        })
    }

    fn play_single(&mut self, seat: usize, id: CardId) -> Result<(), GameError> {
        let player = &self.players[seat];
        let card = *player.card_in_hand(&id).ok_or(GameError::CardsNotOwned)?;
        validate_single_play(&player.hand, &card, self.last_played_card.as_ref())?;

        self.players[seat].take_from_hand(&[id]);
        self.played_cards.push(card);
        self.last_played_card = Some(card);

        tracing::debug!(
            room_id = %self.id,
            player = %self.players[seat].name,
            card = %card,
            "card played"
        );
        Ok(())
    }

    fn play_two_for_one(&mut self, seat: usize, a: CardId, b: CardId) -> Result<(), GameError> {
        let player = &self.players[seat];
        let first = *player.card_in_hand(&a).ok_or(GameError::CardsNotOwned)?;
        let second = *player.card_in_hand(&b).ok_or(GameError::CardsNotOwned)?;
        validate_two_for_one(&first, &second)?;
        if self.deck.is_empty() && self.restock_pool_size() == 0 {
            tracing::error!(room_id = %self.id, "deck exhausted with nothing to restock");
            return Err(GameError::NoCardsToRestock);
        }

        let pair = self.players[seat].take_from_hand(&[a, b]);
        if self.deck.is_empty() {
            self.restock()?;
        }
        let drawn = self.deck.draw().ok_or(GameError::NoCardsToRestock)?;
        self.players[seat].receive(drawn);
        self.discard_pile.extend(pair.iter().copied());

        tracing::debug!(
            room_id = %self.id,
            player = %self.players[seat].name,
            discarded = %cards_to_string(&pair),
            drawn = %drawn,
            "two-for-one"
        );
        Ok(())
    }
}
