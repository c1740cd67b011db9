use svein_engine::errors::GameError;
use svein_server::{AppContext, CreateRoomRequest, LogCapture, ServiceError};
use tracing::Level;

fn started_room(ctx: &AppContext, room_id: &str, rounds: u32) {
    let rooms = ctx.rooms();
    rooms
        .create_room(CreateRoomRequest {
            room_id: Some(room_id.to_string()),
            max_players: Some(3),
            total_rounds: Some(rounds),
            seed: Some(5),
            ..CreateRoomRequest::default()
        })
        .expect("create");
    for i in 0..3 {
        rooms
            .join_room(room_id, &format!("Player {}", i), &format!("p{}", i))
            .expect("join");
    }
    rooms.start_room(room_id).expect("start");
}

fn off_turn_player(ctx: &AppContext, room_id: &str) -> String {
    let room = ctx.rooms().room(room_id).expect("room");
    let on_turn = room.current_player().expect("player on turn").id.clone();
    room.players()
        .iter()
        .find(|p| p.id != on_turn)
        .map(|p| p.id.clone())
        .expect("another player")
}

#[test]
fn rejected_play_is_logged_at_info() {
    let ctx = AppContext::new_for_tests();
    started_room(&ctx, "g1", 4);
    let other = off_turn_player(&ctx, "g1");
    let card = ctx.rooms().room("g1").unwrap().player(&other).unwrap().hand[0].id;

    let capture = LogCapture::new();
    let result = capture.during(|| ctx.rooms().play_cards("g1", &other, &[card]));

    assert!(matches!(
        result,
        Err(ServiceError::Game(GameError::NotYourTurn))
    ));
    let logged = capture.with_error_code(Level::INFO, "not_your_turn");
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].field("room_id"), Some("g1"));
    assert_eq!(logged[0].field("player_id"), Some(other.as_str()));
    assert!(capture.entries().iter().all(|e| e.level != Level::ERROR));
}

#[test]
fn rejected_pick_is_logged_at_info() {
    let ctx = AppContext::new_for_tests();
    started_room(&ctx, "g2", 3);
    let on_turn = ctx
        .rooms()
        .room("g2")
        .unwrap()
        .current_player()
        .unwrap()
        .id
        .clone();

    let capture = LogCapture::new();
    let result = capture.during(|| ctx.rooms().last_round_pick("g2", &on_turn, true));

    assert!(matches!(
        result,
        Err(ServiceError::Game(GameError::NotLastRound))
    ));
    assert_eq!(capture.with_error_code(Level::INFO, "not_last_round").len(), 1);
}

#[test]
fn successful_requests_log_no_rejection() {
    let ctx = AppContext::new_for_tests();
    let capture = LogCapture::new();
    capture.during(|| started_room(&ctx, "g3", 4));
    assert!(capture.entries().iter().all(|e| e.field("error").is_none()));
}
