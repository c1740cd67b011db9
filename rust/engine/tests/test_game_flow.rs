use std::collections::HashSet;

use proptest::prelude::*;
use svein_engine::cards::CardId;
use svein_engine::errors::GameError;
use svein_engine::repository::RoomRepository;
use svein_engine::room::{Room, RoomConfig, RoomStatus};
use svein_engine::rules::legal_single_plays;
use svein_engine::scoring::GameResult;

const MAX_STEPS: usize = 5_000;

fn seated_room(repo: &mut RoomRepository, players: usize, rounds: u32, seed: u64) {
    repo.create_with_config("g", RoomConfig::new(players, rounds).with_seed(seed))
        .expect("create");
    for i in 0..players {
        repo.join("g", &format!("Player {}", i), &format!("p{}", i))
            .expect("join");
    }
}

fn assert_room_invariants(room: &Room) {
    let census = room.card_census();
    let unique: HashSet<CardId> = census.iter().copied().collect();
    assert_eq!(unique.len(), census.len(), "a card appears in two piles");
    assert_eq!(census.len(), 52, "a card left the game");
    assert!(room.player_turn_index() < room.players().len());
    for p in room.players() {
        assert!(p.hand.windows(2).all(|w| w[0].rank <= w[1].rank));
    }
}

/// First pair in hand, if any.
fn pair_in(room: &Room, player_id: &str) -> Option<[CardId; 2]> {
    let hand = &room.player(player_id)?.hand;
    hand.windows(2)
        .find(|w| w[0].rank == w[1].rank)
        .map(|w| [w[0].id, w[1].id])
}

/// Plays a whole game: lowest legal card each turn, a two-for-one on every
/// other turn when a pair is in hand, and the opening pick banked at once in
/// the last round.
fn play_out(players: usize, rounds: u32, seed: u64) -> (RoomRepository, GameResult) {
    let mut repo = RoomRepository::new();
    seated_room(&mut repo, players, rounds, seed);
    repo.start("g").expect("start");

    for step in 0..MAX_STEPS {
        let room = repo.get("g").expect("room");
        assert_room_invariants(room);
        if room.status() == RoomStatus::Finished {
            let result = repo.result("g").expect("result");
            return (repo, result);
        }
        let actor = room.current_player().expect("player on turn").id.clone();

        let finished = if room.round() == 1 {
            repo.last_round_pick("g", &actor, false)
                .expect("pick")
                .round_finished
        } else {
            let saved_before: Vec<usize> =
                room.players().iter().map(|p| p.saved_cards.len()).collect();
            let pair = if step % 2 == 1 { pair_in(room, &actor) } else { None };
            let single = {
                let p = room.player(&actor).expect("actor");
                legal_single_plays(&p.hand, room.last_played_card())
                    .first()
                    .map(|c| c.id)
                    .expect("a legal single play")
            };
            let out = match pair {
                Some(pair) => match repo.play_cards("g", &actor, &pair) {
                    Err(GameError::NoCardsToRestock) => repo.play_cards("g", &actor, &[single]),
                    other => other,
                },
                None => repo.play_cards("g", &actor, &[single]),
            }
            .expect("play");

            if out.round_finished {
                let room = repo.get("g").expect("room");
                for (p, before) in room.players().iter().zip(saved_before) {
                    assert!(p.hand.is_empty());
                    assert_eq!(p.saved_cards.len(), before + 1);
                }
            }
            out.round_finished
        };

        if finished {
            repo.start_new_round("g").expect("next round");
        }
    }
    panic!("game did not finish within {} steps", MAX_STEPS);
}

#[test]
fn four_player_ten_round_game_runs_to_completion() {
    let (repo, result) = play_out(4, 10, 2024);
    let room = repo.get("g").expect("room");
    assert_eq!(room.round(), 0);
    assert_eq!(room.status(), RoomStatus::Finished);
    assert_eq!(result.players.len(), 4);
    for p in &result.players {
        assert_eq!(p.saved_cards.len(), 10);
        assert!(p.score.is_some());
    }
    let positions: Vec<usize> = result.players.iter().filter_map(|p| p.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
    assert!(result
        .players
        .windows(2)
        .all(|w| w[0].score >= w[1].score));
}

#[test]
fn same_seed_replays_identically() {
    let (_, a) = play_out(3, 5, 99);
    let (_, b) = play_out(3, 5, 99);
    let scores = |r: &GameResult| -> Vec<(String, Option<u32>)> {
        r.players.iter().map(|p| (p.id.clone(), p.score)).collect()
    };
    assert_eq!(scores(&a), scores(&b));
}

#[test]
fn not_your_turn_regardless_of_card() {
    let mut repo = RoomRepository::new();
    seated_room(&mut repo, 3, 4, 5);
    repo.start("g").unwrap();
    let room = repo.get("g").unwrap();
    let on_turn = room.player_turn_index();
    let waiting = &room.players()[(on_turn + 1) % 3];
    let id = waiting.id.clone();
    let card = waiting.hand[0].id;
    assert_eq!(
        repo.play_cards("g", &id, &[card]).unwrap_err(),
        GameError::NotYourTurn
    );
}

#[test]
fn leaving_mid_game_keeps_turn_valid_and_game_playable() {
    let mut repo = RoomRepository::new();
    seated_room(&mut repo, 3, 3, 17);
    repo.start("g").unwrap();
    let actor = repo.get("g").unwrap().current_player().unwrap().id.clone();

    let out = repo.leave(&actor).unwrap();
    assert!(!out.terminated);
    let room = repo.get("g").unwrap();
    assert_eq!(room.players().len(), 2);
    assert!(room.player_turn_index() < 2);
    assert_eq!(out.next_player.map(|p| p.id), room.current_player().map(|p| p.id.clone()));

    let next = room.current_player().unwrap().id.clone();
    let out = repo.leave(&next).unwrap();
    assert!(out.terminated);
    assert_eq!(repo.get("g").unwrap().status(), RoomStatus::Finished);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_games_finish_with_every_card_accounted_for(
        seed in any::<u64>(),
        players in 2usize..=5,
        rounds in 1u32..=10,
    ) {
        let (repo, result) = play_out(players, rounds, seed);
        let room = repo.get("g").expect("room");
        prop_assert_eq!(room.card_census().len(), 52);
        for p in &result.players {
            prop_assert_eq!(p.saved_cards.len(), rounds as usize);
        }
    }
}
