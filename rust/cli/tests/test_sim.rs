use std::fs;
use svein_cli::run;
use svein_engine::logger::GameRecord;

fn sim(args: &[&str]) -> (i32, String, String) {
    let mut argv = vec!["svein", "sim"];
    argv.extend_from_slice(args);
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
fn sim_runs_n_games_and_writes_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("games.jsonl");
    let path_str = path.to_string_lossy().into_owned();

    let (code, stdout, stderr) = sim(&[
        "--games", "5", "--players", "3", "--rounds", "4", "--seed", "1", "--output", &path_str,
    ]);
    assert_eq!(code, 0, "{}", stderr);
    assert!(stdout.contains("Simulated: 5 games"));

    let contents = fs::read_to_string(&path).unwrap();
    let records: Vec<GameRecord> = contents
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(records.len(), 5);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.seed, Some(1 + i as u64));
        assert_eq!(record.total_rounds, 4);
        assert!(record.ts.is_some());
        assert_eq!(record.players.len(), 3);
        assert_eq!(record.players[0].position, 1);
        assert!(record.players.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(record.players.iter().all(|p| p.saved_cards.len() == 4));
    }
}

#[test]
fn sim_appends_and_continues_game_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("games.jsonl");
    let path_str = path.to_string_lossy().into_owned();
    let args = ["--games", "2", "--players", "2", "--rounds", "3", "--output", &path_str];

    assert_eq!(sim(&args).0, 0);
    assert_eq!(sim(&args).0, 0);

    let ids: Vec<String> = fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<GameRecord>(l).unwrap().game_id)
        .collect();
    assert_eq!(ids.len(), 4);
    let suffixes: Vec<&str> = ids.iter().map(|id| &id[id.len() - 6..]).collect();
    assert_eq!(suffixes, vec!["000001", "000002", "000003", "000004"]);
}

#[test]
fn sim_with_random_bot_finishes() {
    let (code, stdout, _) = sim(&["--games", "3", "--players", "4", "--rounds", "5", "--bot", "random", "--seed", "9"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.lines().filter(|l| l.starts_with("Game ")).count(), 3);
}

#[test]
fn sim_rejects_unknown_bot() {
    let (code, _, stderr) = sim(&["--bot", "shark", "--seed", "1"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("unknown bot 'shark'"));
}

#[test]
fn sim_rejects_a_table_the_deck_cannot_serve() {
    let (code, _, stderr) = sim(&["--players", "6", "--rounds", "8", "--seed", "1"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("the deck has 52"));
}
