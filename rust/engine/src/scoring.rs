//! End-of-game scoring.
//!
//! Each rank held three or more times in the saved pile cancels one of the
//! player's highest cards; the rest count at face value (Two = 2 .. Ace = 14).

use std::collections::HashMap;

use serde::Serialize;

use crate::cards::{Card, Rank};
use crate::player::Player;
use crate::room::Room;

/// Final standings, best score first.
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub players: Vec<Player>,
}

impl GameResult {
    pub fn winner(&self) -> Option<&Player> {
        self.players.first()
    }
}

/// Score of a saved pile.
///
/// ```
/// use svein_engine::cards::{Card, CardId, Rank, Suit};
/// use svein_engine::scoring::score_cards;
/// use uuid::Uuid;
///
/// let saved: Vec<Card> = [Rank::Two, Rank::Two, Rank::Two, Rank::Five]
///     .iter()
///     .enumerate()
///     .map(|(i, &rank)| Card { id: CardId::from(Uuid::from_u128(i as u128)), suit: Suit::Spades, rank })
///     .collect();
/// // one triple: the Five is dropped, the three Twos remain
/// assert_eq!(score_cards(&saved), 6);
/// ```
pub fn score_cards(cards: &[Card]) -> u32 {
    let mut counts: HashMap<Rank, usize> = HashMap::new();
    for card in cards {
        *counts.entry(card.rank).or_default() += 1;
    }
    let triples = counts.values().filter(|&&n| n >= 3).count();

    let mut values: Vec<u32> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));
    values.into_iter().skip(triples).sum()
}

pub fn compute_score(player: &Player) -> u32 {
    score_cards(&player.saved_cards)
}

impl Room {
    /// Scores every player and assigns finishing positions.
    ///
    /// Scores and positions are written onto the room's players in place; the
    /// returned standings are sorted by score, highest first, with ties in turn
    /// order. The room's own seating is left alone.
    pub fn result(&mut self) -> GameResult {
        for player in &mut self.players {
            player.score = Some(compute_score(player));
        }

        let mut order: Vec<usize> = (0..self.players.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(self.players[i].score.unwrap_or(0)));
        for (position, &seat) in order.iter().enumerate() {
            self.players[seat].position = Some(position + 1);
        }

        let players: Vec<Player> = order.iter().map(|&seat| self.players[seat].clone()).collect();
        if let Some(winner) = players.first() {
            tracing::info!(
                room_id = %self.id,
                winner = %winner.name,
                score = winner.score.unwrap_or(0),
                "game result computed"
            );
        }
        GameResult { players }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, Suit};
    use crate::room::RoomConfig;
    use uuid::Uuid;

    fn pile(ranks: &[Rank]) -> Vec<Card> {
        ranks
            .iter()
            .enumerate()
            .map(|(i, &rank)| Card {
                id: CardId::from(Uuid::from_u128(i as u128 + 1)),
                suit: Suit::Hearts,
                rank,
            })
            .collect()
    }

    #[test]
    fn plain_pile_sums_face_values() {
        assert_eq!(score_cards(&pile(&[Rank::Ace, Rank::Ten, Rank::Two])), 26);
        assert_eq!(score_cards(&[]), 0);
    }

    #[test]
    fn each_triple_drops_one_highest_card() {
        let saved = pile(&[
            Rank::Three,
            Rank::Three,
            Rank::Three,
            Rank::Nine,
            Rank::Nine,
            Rank::Nine,
            Rank::King,
        ]);
        // King and one Nine dropped: 9 + 9 + 3 + 3 + 3
        assert_eq!(score_cards(&saved), 27);
    }

    #[test]
    fn four_of_a_kind_counts_as_one_triple() {
        let saved = pile(&[Rank::Four, Rank::Four, Rank::Four, Rank::Four]);
        assert_eq!(score_cards(&saved), 12);
    }

    #[test]
    fn result_sets_positions_without_reseating() {
        let mut room = Room::new("s", RoomConfig::new(3, 2));
        for (i, name) in ["Ann", "Bob", "Cid"].iter().enumerate() {
            room.join(name, &format!("p{}", i)).unwrap();
        }
        room.players[0].saved_cards = pile(&[Rank::Two, Rank::Three]);
        room.players[1].saved_cards = pile(&[Rank::Ace, Rank::King]);
        room.players[2].saved_cards = pile(&[Rank::Two, Rank::Three]);

        let result = room.result();
        let ids: Vec<&str> = result.players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p0", "p2"]);
        assert_eq!(result.winner().and_then(|p| p.score), Some(27));
        assert_eq!(room.players()[0].id, "p0");
        assert_eq!(room.players()[0].position, Some(2));
        assert_eq!(room.players()[2].position, Some(3));
        assert_eq!(room.players()[1].position, Some(1));
    }
}
