//! Round lifecycle: finish detection, restocking, and the transition into the
//! next round (including the last-round picking phase and game end).

use serde::Serialize;

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::player::Player;
use crate::room::{Room, RoomStatus};

/// Result of [`Room::start_new_round`].
#[derive(Debug, Clone, Serialize)]
pub struct NewRoundOutcome {
    pub game_over: bool,
    pub players: Vec<Player>,
    /// Player opening the new round
    pub next_player: Player,
    pub next_round: u32,
}

impl Room {
    /// Evaluates the finish condition for the current round, banking the last
    /// hand card of every player when a trick round completes.
    ///
    /// - round 2 and above: finished once every hand holds exactly one card
    /// - round 1: finished once everybody has banked `total_rounds` cards
    /// - round 0: always finished
    pub(crate) fn check_round_finished(&mut self) -> bool {
        match self.round {
            0 => true,
            1 => {
                let total = self.total_rounds;
                self.players.iter().all(|p| p.done_picking(total))
            }
            _ => {
                if !self.players.iter().all(|p| p.hand.len() == 1) {
                    return false;
                }
                for player in &mut self.players {
                    let banked: Vec<Card> = player.hand.drain(..).collect();
                    player.saved_cards.extend(banked);
                }
                tracing::debug!(room_id = %self.id, round = self.round, "round finished, last cards banked");
                true
            }
        }
    }

    /// Cards a restock could put back into the deck.
    pub(crate) fn restock_pool_size(&self) -> usize {
        let live_in_play = self
            .last_played_card
            .is_some_and(|live| self.played_cards.iter().any(|c| c.id == live.id));
        self.deck.len() + self.discard_pile.len() + self.played_cards.len()
            - usize::from(live_in_play)
    }

    /// Rebuilds the deck from every spent card except the one live on the
    /// table, which stays in the played pile.
    pub(crate) fn restock(&mut self) -> Result<(), GameError> {
        if self.restock_pool_size() == 0 {
            tracing::error!(room_id = %self.id, "no cards left to restock the deck");
            return Err(GameError::NoCardsToRestock);
        }
        let live = self.last_played_card;
        let mut pool = std::mem::take(&mut self.deck).into_cards();
        pool.append(&mut self.discard_pile);
        for card in self.played_cards.drain(..) {
            if live.is_some_and(|l| l.id == card.id) {
                continue;
            }
            pool.push(card);
        }
        if let Some(live) = live {
            self.played_cards.push(live);
        }

        let mut deck = Deck::new(pool);
        deck.shuffle(&mut self.rng);
        tracing::info!(room_id = %self.id, cards = deck.len(), "deck restocked");
        self.deck = deck;
        Ok(())
    }

    /// Moves the room into the next round.
    ///
    /// Every loose card (deck, played, discards, and anything still in hand)
    /// is shuffled back into one deck, the round counter drops by one, and the
    /// starting seat rotates forward. Round 0 ends the game; round 1 opens the
    /// picking phase; anything higher deals fresh hands of `round` cards.
    pub fn start_new_round(&mut self) -> Result<NewRoundOutcome, GameError> {
        self.ensure_in_progress()?;
        self.require_current()?;

        let mut pool = std::mem::take(&mut self.deck).into_cards();
        pool.append(&mut self.played_cards);
        pool.append(&mut self.discard_pile);
        for player in &mut self.players {
            pool.append(&mut player.hand);
        }
        self.last_played_card = None;
        self.round = self.round.saturating_sub(1);
        self.starting_player_index = (self.starting_player_index + 1) % self.players.len();
        self.player_turn_index = self.starting_player_index;

        let mut deck = Deck::new(pool);
        deck.shuffle(&mut self.rng);
        self.open_round(deck)?;

        let seat = self.require_current()?;
        let game_over = self.round == 0;
        if game_over {
            tracing::info!(room_id = %self.id, "game finished");
        } else {
            tracing::info!(
                room_id = %self.id,
                round = self.round,
                first_player = %self.players[seat].name,
                "round started"
            );
        }

        Ok(NewRoundOutcome {
            game_over,
            players: self.players.clone(),
            next_player: self.snapshot(seat),
            next_round: self.round,
        })
    }

    /// Puts `deck` on the table for the current round number. The turn must
    /// already point at the round's starting player.
    pub(crate) fn open_round(&mut self, deck: Deck) -> Result<(), GameError> {
        match self.round {
            0 => {
                self.deck = deck;
                self.status = RoomStatus::Finished;
            }
            1 => {
                self.deck = deck;
                let seat = self.require_current()?;
                if !self.players[seat].done_picking(self.total_rounds) {
                    let card = self.deck.draw().ok_or(GameError::NoCardsLeft)?;
                    self.players[seat].last_round_cards.push(card);
                }
                tracing::debug!(room_id = %self.id, "last round opened");
            }
            round => {
                let dealt = deck.deal(round as usize, self.players.len(), &mut self.rng);
                for (player, hand) in self.players.iter_mut().zip(dealt.hands) {
                    player.set_hand(hand);
                }
                self.deck = dealt.remaining;
            }
        }
        Ok(())
    }
}
