use crate::cards::{sort_by_rank, Card, CardId, Rank};
use crate::room::PlayerId;
use serde::{Deserialize, Serialize};

/// Cap on the per-turn pick pile during the last round.
pub const LAST_ROUND_PICK_LIMIT: usize = 3;

/// A seated player and the three card piles they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable external identity (typically the connection id)
    pub id: PlayerId,
    pub name: String,
    /// Cards in hand for the current round, kept rank-ascending
    pub hand: Vec<Card>,
    /// Permanent scoring pile
    pub saved_cards: Vec<Card>,
    /// Temporary pick pile, used only during the last round
    pub last_round_cards: Vec<Card>,
    /// Filled in by the final result
    #[serde(default)]
    pub score: Option<u32>,
    /// 1-based finishing position, filled in by the final result
    #[serde(default)]
    pub position: Option<usize>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hand: Vec::new(),
            saved_cards: Vec::new(),
            last_round_cards: Vec::new(),
            score: None,
            position: None,
        }
    }

    pub fn holds(&self, id: &CardId) -> bool {
        self.hand.iter().any(|c| &c.id == id)
    }

    pub fn holds_all(&self, ids: &[CardId]) -> bool {
        ids.iter().all(|id| self.holds(id))
    }

    pub fn card_in_hand(&self, id: &CardId) -> Option<&Card> {
        self.hand.iter().find(|c| &c.id == id)
    }

    pub fn smallest_rank(&self) -> Option<Rank> {
        self.hand.iter().map(|c| c.rank).min()
    }

    pub fn largest_rank(&self) -> Option<Rank> {
        self.hand.iter().map(|c| c.rank).max()
    }

    /// Removes and returns the named cards from the hand, in the given order.
    /// Ids that are not held are skipped; callers check ownership first.
    pub fn take_from_hand(&mut self, ids: &[CardId]) -> Vec<Card> {
        let mut taken = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(idx) = self.hand.iter().position(|c| &c.id == id) {
                taken.push(self.hand.remove(idx));
            }
        }
        taken
    }

    pub fn receive(&mut self, card: Card) {
        self.hand.push(card);
        sort_by_rank(&mut self.hand);
    }

    pub fn set_hand(&mut self, mut cards: Vec<Card>) {
        sort_by_rank(&mut cards);
        self.hand = cards;
    }

    /// True once the player has banked every card the game asks for.
    pub fn done_picking(&self, total_rounds: u32) -> bool {
        self.saved_cards.len() >= total_rounds as usize
    }

    pub fn pick_pile_full(&self) -> bool {
        self.last_round_cards.len() >= LAST_ROUND_PICK_LIMIT
    }

    /// Every card this player currently owns, across all three piles.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.hand
            .iter()
            .chain(self.saved_cards.iter())
            .chain(self.last_round_cards.iter())
    }
}
