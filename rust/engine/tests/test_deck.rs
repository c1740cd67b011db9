use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use svein_engine::cards::{all_ranks, all_suits, CardId};
use svein_engine::deck::{Deck, GameRng};

#[test]
fn generated_deck_covers_every_suit_and_rank_once() {
    let mut rng = GameRng::seed_from_u64(42);
    let deck = Deck::generate(&mut rng);
    assert_eq!(deck.len(), 52);

    let ids: HashSet<CardId> = deck.cards().iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), 52, "card ids must be unique");

    for suit in all_suits() {
        for rank in all_ranks() {
            let n = deck
                .cards()
                .iter()
                .filter(|c| c.suit == suit && c.rank == rank)
                .count();
            assert_eq!(n, 1, "{:?} of {:?} should appear once", rank, suit);
        }
    }
}

#[test]
fn shuffle_is_deterministic_with_same_seed() {
    let mut r1 = GameRng::seed_from_u64(12345);
    let mut r2 = GameRng::seed_from_u64(12345);
    let mut d1 = Deck::generate(&mut r1);
    let mut d2 = Deck::generate(&mut r2);
    d1.shuffle(&mut r1);
    d2.shuffle(&mut r2);
    assert_eq!(d1, d2, "same seed must yield identical order");
}

#[test]
fn shuffle_differs_with_different_seed() {
    let mut rng = GameRng::seed_from_u64(1);
    let base = Deck::generate(&mut rng);
    let (mut d1, mut d2) = (base.clone(), base);
    d1.shuffle(&mut GameRng::seed_from_u64(1));
    d2.shuffle(&mut GameRng::seed_from_u64(2));
    assert_ne!(
        d1, d2,
        "different seeds should produce different orders (high probability)"
    );
}

proptest! {
    /// Shuffling only permutes the deck.
    #[test]
    fn prop_shuffle_preserves_ids(seed in any::<u64>()) {
        let mut rng = GameRng::seed_from_u64(seed);
        let deck = Deck::generate(&mut rng);
        let before: HashSet<CardId> = deck.cards().iter().map(|c| c.id).collect();
        let mut shuffled = deck.clone();
        shuffled.shuffle(&mut rng);
        let after: HashSet<CardId> = shuffled.cards().iter().map(|c| c.id).collect();
        prop_assert_eq!(shuffled.len(), 52);
        prop_assert_eq!(before, after);
    }

    /// Dealing removes min(k * n, 52) cards, never duplicates one, and sorts hands.
    #[test]
    fn prop_deal_conserves_cards(
        seed in any::<u64>(),
        cards_per_player in 0usize..=20,
        players in 1usize..=8,
    ) {
        let mut rng = GameRng::seed_from_u64(seed);
        let deck = Deck::generate(&mut rng);
        let dealt = deck.deal(cards_per_player, players, &mut rng);

        prop_assert_eq!(dealt.hands.len(), players);
        let in_hands: usize = dealt.hands.iter().map(Vec::len).sum();
        prop_assert_eq!(in_hands, (cards_per_player * players).min(52));
        prop_assert_eq!(in_hands + dealt.remaining.len(), 52);

        let mut seen = HashSet::new();
        for card in dealt.hands.iter().flatten().chain(dealt.remaining.cards()) {
            prop_assert!(seen.insert(card.id), "card {} dealt twice", card);
        }
        for hand in &dealt.hands {
            prop_assert!(hand.windows(2).all(|w| w[0].rank <= w[1].rank));
        }
    }
}
