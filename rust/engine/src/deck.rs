use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{all_ranks, all_suits, sort_by_rank, Card, CardId, DECK_SIZE};

/// Random source owned by every room. Seedable for reproducible games.
pub type GameRng = ChaCha20Rng;

/// Draw pile. The top of the deck is the end of the vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Card>,
}

/// Hands produced by [`Deck::deal`], in player order, plus what is left of the deck.
#[derive(Debug, Clone)]
pub struct Dealt {
    pub hands: Vec<Vec<Card>>,
    pub remaining: Deck,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// The 52-card cross product of suits and ranks, each card with a fresh id.
    /// Cards come out in suit-major order; call [`Deck::shuffle`] before use.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for &suit in &all_suits() {
            for &rank in &all_ranks() {
                cards.push(Card {
                    id: CardId::random(rng),
                    suit,
                    rank,
                });
            }
        }
        Self { cards }
    }

    /// Uniform Fisher-Yates permutation of the current cards.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn peek(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn extend<I: IntoIterator<Item = Card>>(&mut self, cards: I) {
        self.cards.extend(cards);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    /// Shuffles, then fills `num_players` hands of up to `cards_per_player`
    /// cards each, hand by hand, popping from the top.
    ///
    /// Running out of cards is not an error: the hand being dealt stops early
    /// and every later hand stays short. Each hand is returned sorted by rank.
    pub fn deal<R: Rng + ?Sized>(
        mut self,
        cards_per_player: usize,
        num_players: usize,
        rng: &mut R,
    ) -> Dealt {
        self.shuffle(rng);
        let mut hands = Vec::with_capacity(num_players);
        for seat in 0..num_players {
            let mut hand = Vec::with_capacity(cards_per_player);
            for _ in 0..cards_per_player {
                match self.draw() {
                    Some(card) => hand.push(card),
                    None => {
                        tracing::warn!(seat, dealt = hand.len(), "deck ran out of cards while dealing");
                        break;
                    }
                }
            }
            sort_by_rank(&mut hand);
            hands.push(hand);
        }
        Dealt {
            hands,
            remaining: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn draw_takes_from_the_top() {
        let mut rng = GameRng::seed_from_u64(3);
        let mut deck = Deck::generate(&mut rng);
        let top = *deck.peek().expect("non-empty");
        assert_eq!(deck.draw(), Some(top));
        assert_eq!(deck.len(), 51);
    }

    #[test]
    fn short_deck_leaves_later_hands_short() {
        let mut rng = GameRng::seed_from_u64(11);
        let mut cards = Deck::generate(&mut rng).into_cards();
        cards.truncate(5);
        let dealt = Deck::new(cards).deal(3, 3, &mut rng);
        let sizes: Vec<usize> = dealt.hands.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 2, 0]);
        assert!(dealt.remaining.is_empty());
    }

    #[test]
    fn dealt_hands_are_rank_ascending() {
        let mut rng = GameRng::seed_from_u64(5);
        let deck = Deck::generate(&mut rng);
        let dealt = deck.deal(10, 4, &mut rng);
        for hand in &dealt.hands {
            assert!(hand.windows(2).all(|w| w[0].rank <= w[1].rank));
        }
        assert_eq!(dealt.remaining.len(), 12);
    }
}
