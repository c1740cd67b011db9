//! The last-round picking phase.
//!
//! In round 1 nobody plays tricks. On their turn a player draws cards into a
//! pick pile of at most [`LAST_ROUND_PICK_LIMIT`] cards and banks one of them:
//! either the newest pick when they decline to draw again, or the third pick
//! when the pile fills up. Banking moves the card into `saved_cards`; the other
//! picks stay in the pick pile until the game ends.

use serde::Serialize;

use crate::cards::Card;
use crate::errors::GameError;
use crate::player::{Player, LAST_ROUND_PICK_LIMIT};
use crate::room::Room;

/// Result of [`Room::last_round_pick`].
#[derive(Debug, Clone, Serialize)]
pub struct PickOutcome {
    /// The acting player after the pick
    pub current_player: Player,
    /// The player on turn now; the actor again if they keep picking
    pub next_player: Player,
    pub round_finished: bool,
    /// `next_player`'s pick pile
    pub pick_pile: Vec<Card>,
}

impl Room {
    /// Draws another card (`wants_new_card`) or stops and banks the newest pick.
    ///
    /// A stop, or a draw that fills the pick pile, ends the player's turn. The
    /// next player is then dealt their opening pick, unless they are already
    /// done. Every draw the call needs is checked against the deck up front,
    /// so `NoCardsLeft` leaves the room untouched.
    pub fn last_round_pick(
        &mut self,
        player_id: &str,
        wants_new_card: bool,
    ) -> Result<PickOutcome, GameError> {
        let seat = self.player_index(player_id)?;
        self.ensure_in_progress()?;
        if self.round != 1 {
            return Err(GameError::NotLastRound);
        }
        self.ensure_turn(seat)?;

        let player = &self.players[seat];
        if player.done_picking(self.total_rounds) {
            return Err(GameError::AlreadyDonePicking);
        }
        if player.pick_pile_full() {
            return Err(GameError::PickPileFull);
        }
        if !wants_new_card && player.last_round_cards.is_empty() {
            return Err(GameError::NothingToBank);
        }

        let ends_turn =
            !wants_new_card || player.last_round_cards.len() + 1 >= LAST_ROUND_PICK_LIMIT;
        let next_seat = (seat + 1) % self.players.len();
        let next_needs_opening = ends_turn && self.needs_opening_pick(next_seat, seat);
        let draws = usize::from(wants_new_card) + usize::from(next_needs_opening);
        if self.deck.len() < draws {
            tracing::error!(room_id = %self.id, needed = draws, left = self.deck.len(), "deck exhausted during last round");
            return Err(GameError::NoCardsLeft);
        }

        if wants_new_card {
            let card = self.deck.draw().ok_or(GameError::NoCardsLeft)?;
            self.players[seat].last_round_cards.push(card);
        }

        let next = if ends_turn {
            let banked = self.players[seat]
                .last_round_cards
                .pop()
                .ok_or(GameError::NothingToBank)?;
            self.players[seat].saved_cards.push(banked);
            tracing::debug!(
                room_id = %self.id,
                player = %self.players[seat].name,
                card = %banked,
                "last-round card banked"
            );

            let next = self.advance_turn_index()?;
            if next_needs_opening {
                let card = self.deck.draw().ok_or(GameError::NoCardsLeft)?;
                self.players[next].last_round_cards.push(card);
            }
            next
        } else {
            seat
        };

        let round_finished = self.check_round_finished();
        let next_player = self.snapshot(next);
        Ok(PickOutcome {
            current_player: self.snapshot(seat),
            pick_pile: next_player.last_round_cards.clone(),
            next_player,
            round_finished,
        })
    }

    /// True when the player on `seat` still has to pick and holds no opening
    /// card. `actor` is about to bank one card, which counts toward their total.
    fn needs_opening_pick(&self, seat: usize, actor: usize) -> bool {
        let player = &self.players[seat];
        let banked_after = player.saved_cards.len() + usize::from(seat == actor);
        player.last_round_cards.is_empty() && banked_after < self.total_rounds as usize
    }
}
