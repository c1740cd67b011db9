use serde_json::Value;
use serial_test::serial;
use std::fs;
use svein_cli::run;

const VARS: &[&str] = &[
    "SVEIN_CONFIG",
    "SVEIN_SEED",
    "SVEIN_PLAYERS",
    "SVEIN_ROUNDS",
    "SVEIN_BOT",
];

fn clear_env() {
    for key in VARS {
        unsafe {
            std::env::remove_var(key);
        }
    }
}

fn set_env(key: &str, value: &str) {
    unsafe {
        std::env::set_var(key, value);
    }
}

fn cfg() -> (i32, Value, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(["svein", "cfg"], &mut out, &mut err);
    let json = serde_json::from_slice(&out).unwrap_or(Value::Null);
    (code, json, String::from_utf8_lossy(&err).into_owned())
}

#[test]
#[serial]
fn cfg_shows_defaults() {
    clear_env();
    let (code, json, _) = cfg();
    assert_eq!(code, 0);

    assert_eq!(json["players"]["value"].as_u64(), Some(4));
    assert_eq!(json["players"]["source"].as_str(), Some("default"));
    assert_eq!(json["total_rounds"]["value"].as_u64(), Some(10));
    assert_eq!(json["bot"]["value"].as_str(), Some("baseline"));
    assert!(json["seed"]["value"].is_null());
}

#[test]
#[serial]
fn env_overrides_file() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("svein.toml");
    fs::write(&path, "players = 3\ntotal_rounds = 6\nseed = 5\n").unwrap();
    set_env("SVEIN_CONFIG", path.to_str().unwrap());
    set_env("SVEIN_SEED", "99");

    let (code, json, _) = cfg();
    clear_env();
    assert_eq!(code, 0);

    assert_eq!(json["players"]["value"].as_u64(), Some(3));
    assert_eq!(json["players"]["source"].as_str(), Some("file"));
    assert_eq!(json["total_rounds"]["source"].as_str(), Some("file"));
    assert_eq!(json["seed"]["value"].as_u64(), Some(99));
    assert_eq!(json["seed"]["source"].as_str(), Some("env"));
    assert_eq!(json["bot"]["source"].as_str(), Some("default"));
}

#[test]
#[serial]
fn command_line_overrides_env() {
    clear_env();
    set_env("SVEIN_PLAYERS", "5");
    set_env("SVEIN_ROUNDS", "3");

    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(
        ["svein", "sim", "--players", "2", "--seed", "4"],
        &mut out,
        &mut err,
    );
    clear_env();
    assert_eq!(code, 0, "{}", String::from_utf8_lossy(&err));
    let stdout = String::from_utf8_lossy(&out);
    let first_game = stdout.lines().next().unwrap();
    assert!(first_game.contains("Bot 2"));
    assert!(!first_game.contains("Bot 3"));
}

#[test]
#[serial]
fn invalid_env_value_fails() {
    clear_env();
    set_env("SVEIN_PLAYERS", "many");
    let (code, _, stderr) = cfg();
    clear_env();
    assert_eq!(code, 2);
    assert!(stderr.contains("Invalid players"));
}

#[test]
#[serial]
fn malformed_config_file_fails() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "players = \"three\"\n").unwrap();
    set_env("SVEIN_CONFIG", path.to_str().unwrap());

    let (code, _, stderr) = cfg();
    clear_env();
    assert_eq!(code, 2);
    assert!(stderr.contains("Invalid configuration"));
}
