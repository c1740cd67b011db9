use std::fs;
use std::path::PathBuf;

use svein_engine::logger::{GameLogger, GameRecord};
use svein_engine::repository::RoomRepository;
use svein_engine::room::RoomConfig;

fn tmp_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("target");
    p.push(format!("{}_{}.jsonl", name, std::process::id()));
    p
}

fn finished_record(game_id: &str) -> GameRecord {
    let mut repo = RoomRepository::new();
    repo.create_with_config("g", RoomConfig::new(2, 1).with_seed(3))
        .unwrap();
    repo.join("g", "Ann", "p1").unwrap();
    repo.join("g", "Bob", "p2").unwrap();
    repo.start("g").unwrap();
    for _ in 0..2 {
        let actor = repo.get("g").unwrap().current_player().unwrap().id.clone();
        repo.last_round_pick("g", &actor, false).unwrap();
    }
    repo.start_new_round("g").unwrap();
    let result = repo.result("g").unwrap();
    GameRecord::from_result(game_id.to_string(), repo.get("g").unwrap(), &result)
}

#[test]
fn writes_jsonl_with_lf_only() {
    let path = tmp_path("gamelog");
    let mut logger = GameLogger::create(&path).expect("create logger");
    logger.write(&finished_record("20250102-000001")).expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
    let _ = fs::remove_file(&path);
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let path = tmp_path("gamelog_ts");
    let mut logger = GameLogger::create(&path).expect("create logger");
    logger.write(&finished_record("20250102-000010")).expect("write");

    let mut stamped = finished_record("20250102-000011");
    stamped.ts = Some("2025-01-02T03:04:05Z".to_string());
    logger.write(&stamped).expect("write");

    let content = fs::read_to_string(&path).expect("read");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: GameRecord = serde_json::from_str(lines[0]).expect("parse first");
    let second: GameRecord = serde_json::from_str(lines[1]).expect("parse second");
    assert!(first.ts.is_some());
    assert_eq!(second.ts.as_deref(), Some("2025-01-02T03:04:05Z"));
    let _ = fs::remove_file(&path);
}

#[test]
fn record_lists_standings_with_saved_cards() {
    let rec = finished_record("20250102-000002");
    assert_eq!(rec.seed, Some(3));
    assert_eq!(rec.total_rounds, 1);
    assert_eq!(rec.players.len(), 2);
    assert_eq!(rec.players[0].position, 1);
    assert!(rec.players[0].score >= rec.players[1].score);
    assert!(rec.players.iter().all(|p| p.saved_cards.len() == 1));
}

#[test]
fn append_keeps_existing_records() {
    let path = tmp_path("gamelog_append");
    {
        let mut logger = GameLogger::create(&path).expect("create");
        logger.write(&finished_record("20250102-000001")).unwrap();
    }
    {
        let mut logger = GameLogger::append(&path).expect("append");
        logger.write(&finished_record("20250102-000002")).unwrap();
    }
    let content = fs::read_to_string(&path).expect("read");
    assert_eq!(content.lines().count(), 2);
    let _ = fs::remove_file(&path);
}
