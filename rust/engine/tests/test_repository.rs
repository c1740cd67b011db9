use svein_engine::cards::{Card, CardId, Rank, Suit};
use svein_engine::errors::GameError;
use svein_engine::player::Player;
use svein_engine::repository::RoomRepository;
use svein_engine::room::RoomStatus;
use svein_engine::scoring::compute_score;
use uuid::Uuid;

#[test]
fn start_without_players_is_not_enough_players() {
    let mut repo = RoomRepository::new();
    repo.create("g1", 4, 10).unwrap();
    assert_eq!(
        repo.start("g1").unwrap_err(),
        GameError::NotEnoughPlayers { found: 0 }
    );
    assert_eq!(repo.get("g1").unwrap().status(), RoomStatus::Waiting);
}

#[test]
fn joining_twice_with_same_id_is_duplicate_player() {
    let mut repo = RoomRepository::new();
    repo.create("g1", 4, 10).unwrap();
    repo.join("g1", "Ann", "p1").unwrap();
    assert_eq!(
        repo.join("g1", "Ann", "p1").unwrap_err(),
        GameError::DuplicatePlayer("p1".into())
    );
    assert_eq!(repo.get("g1").unwrap().players().len(), 1);
}

#[test]
fn join_after_start_is_rejected() {
    let mut repo = RoomRepository::new();
    repo.create("g1", 4, 3).unwrap();
    repo.join("g1", "Ann", "p1").unwrap();
    repo.join("g1", "Bob", "p2").unwrap();
    repo.start("g1").unwrap();
    assert_eq!(
        repo.join("g1", "Cid", "p3").unwrap_err(),
        GameError::AlreadyStarted("g1".into())
    );
    assert_eq!(
        repo.start("g1").unwrap_err(),
        GameError::AlreadyStarted("g1".into())
    );
}

#[test]
fn first_play_of_a_round_accepts_any_rank() {
    let mut repo = RoomRepository::new();
    repo.create("g1", 2, 5).unwrap();
    repo.join("g1", "Ann", "p1").unwrap();
    repo.join("g1", "Bob", "p2").unwrap();
    repo.start("g1").unwrap();

    let room = repo.get("g1").unwrap();
    assert!(room.last_played_card().is_none());
    let actor = room.current_player().unwrap();
    let id = actor.id.clone();
    let highest = actor.hand.last().unwrap().id;
    let out = repo.play_cards("g1", &id, &[highest]).unwrap();
    assert_eq!(out.new_hand.len(), 4);
    assert_ne!(out.next_player.id, id);
}

#[test]
fn saved_triple_of_twos_with_five_scores_six() {
    let mut player = Player::new("p1", "Ann");
    player.saved_cards = [Rank::Two, Rank::Two, Rank::Two, Rank::Five]
        .iter()
        .zip([Suit::Hearts, Suit::Clubs, Suit::Spades, Suit::Hearts])
        .enumerate()
        .map(|(i, (&rank, suit))| Card {
            id: CardId::from(Uuid::from_u128(i as u128 + 1)),
            suit,
            rank,
        })
        .collect();
    assert_eq!(compute_score(&player), 6);
}

#[test]
fn result_of_unknown_room_is_room_not_found() {
    let mut repo = RoomRepository::new();
    assert_eq!(
        repo.result("missing").unwrap_err(),
        GameError::RoomNotFound("missing".into())
    );
}

#[test]
fn delete_removes_room_from_listing() {
    let mut repo = RoomRepository::new();
    repo.create("a", 2, 2).unwrap();
    repo.create("b", 3, 4).unwrap();
    repo.join("b", "Ann", "p1").unwrap();
    let removed = repo.delete("a").unwrap();
    assert_eq!(removed.id(), "a");

    let listing = repo.list();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].id, "b");
    assert_eq!(listing[0].players, vec!["Ann".to_string()]);
    assert_eq!(listing[0].max_players, 3);
}
