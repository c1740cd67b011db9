use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::errors::GameError;

/// One play in a trick round, parsed from the raw list of card ids a client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerMove {
    /// Play one card onto the table
    Single(CardId),
    /// Discard a pair of equal rank and draw one replacement
    TwoForOne(CardId, CardId),
}

impl PlayerMove {
    /// Parses a card list into a move.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidCardCount`] - anything other than one or two cards
    /// - [`GameError::DuplicateCard`] - the same card named twice
    ///
    /// # Examples
    ///
    /// ```
    /// use svein_engine::cards::CardId;
    /// use svein_engine::errors::GameError;
    /// use svein_engine::rules::PlayerMove;
    /// use uuid::Uuid;
    ///
    /// let a = CardId::from(Uuid::from_u128(1));
    /// let b = CardId::from(Uuid::from_u128(2));
    /// assert_eq!(PlayerMove::from_cards(&[a]), Ok(PlayerMove::Single(a)));
    /// assert_eq!(PlayerMove::from_cards(&[a, b]), Ok(PlayerMove::TwoForOne(a, b)));
    /// assert_eq!(PlayerMove::from_cards(&[a, a]), Err(GameError::DuplicateCard));
    /// assert_eq!(PlayerMove::from_cards(&[]), Err(GameError::InvalidCardCount(0)));
    /// ```
    pub fn from_cards(cards: &[CardId]) -> Result<Self, GameError> {
        match *cards {
            [card] => Ok(PlayerMove::Single(card)),
            [a, b] if a == b => Err(GameError::DuplicateCard),
            [a, b] => Ok(PlayerMove::TwoForOne(a, b)),
            _ => Err(GameError::InvalidCardCount(cards.len())),
        }
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        match *self {
            PlayerMove::Single(c) => vec![c],
            PlayerMove::TwoForOne(a, b) => vec![a, b],
        }
    }
}

/// Checks a single play against the last card on the table.
///
/// With nothing on the table any card is legal. Otherwise a card lower than the
/// last play is only allowed when the player cannot match or beat it with
/// anything in hand, and then it must be their smallest card.
///
/// `hand` is the player's hand before the card leaves it.
///
/// # Errors
///
/// - [`GameError::MustPlayHigher`] - a lower card while holding something that matches or beats the table
/// - [`GameError::MustPlaySmallest`] - unable to beat the table but not dumping the weakest card
pub fn validate_single_play(
    hand: &[Card],
    card: &Card,
    last_played: Option<&Card>,
) -> Result<(), GameError> {
    let Some(last) = last_played else {
        return Ok(());
    };
    if card.rank >= last.rank {
        return Ok(());
    }
    let smallest = hand.iter().map(|c| c.rank).min().unwrap_or(card.rank);
    let largest = hand.iter().map(|c| c.rank).max().unwrap_or(card.rank);

    if largest >= last.rank {
        return Err(GameError::MustPlayHigher { last: last.rank });
    }
    if card.rank != smallest {
        return Err(GameError::MustPlaySmallest);
    }
    Ok(())
}

/// Both halves of a two-for-one must share a rank.
pub fn validate_two_for_one(first: &Card, second: &Card) -> Result<(), GameError> {
    if first.rank == second.rank {
        Ok(())
    } else {
        Err(GameError::MismatchedRank)
    }
}

/// Every card of `hand` that [`validate_single_play`] accepts, in hand order.
pub fn legal_single_plays<'a>(hand: &'a [Card], last_played: Option<&Card>) -> Vec<&'a Card> {
    hand.iter()
        .filter(|c| validate_single_play(hand, c, last_played).is_ok())
        .collect()
}
