//! Simulation command: complete bot-only games.
//!
//! Every chair gets the same bot. Game `i` of a run is seeded with
//! `seed + i`, so a run can be replayed exactly from its base seed.
//!
//! # Examples
//!
//! ```no_run
//! use std::io;
//!
//! let code = svein_cli::run(
//!     ["svein", "sim", "--games", "100", "--seed", "42", "--output", "data/games.jsonl"],
//!     &mut io::stdout(),
//!     &mut io::stderr(),
//! );
//! assert_eq!(code, 0);
//! ```

use crate::config::{self, CliOverrides, Config};
use crate::error::CliError;
use crate::io_utils::{ensure_parent_dir, read_game_records};
use crate::ui;
use std::io::Write;
use std::path::Path;
use svein_ai::{create_seeded_bot, SveinBot};
use svein_engine::errors::GameError;
use svein_engine::logger::{GameLogger, GameRecord};
use svein_engine::repository::RoomRepository;
use svein_engine::room::{RoomConfig, RoomStatus};
use svein_engine::rules::{legal_single_plays, PlayerMove};
use svein_engine::scoring::GameResult;

/// Upper bound on turns in one game; a well-formed game needs far fewer.
const MAX_TURNS: usize = 10_000;

/// Handle the sim command.
pub fn handle_sim_command(
    overrides: CliOverrides,
    output: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let resolved = match config::load_with_overrides(&overrides) {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &e.to_string())?;
            return Err(e.into());
        }
    };
    let cfg = resolved.config;
    let base_seed = cfg.seed.unwrap_or_else(rand::random);

    let mut logger = match output.as_deref() {
        Some(path) => Some(open_logger(Path::new(path), err)?),
        None => None,
    };

    for game in 0..cfg.games {
        let seed = base_seed.wrapping_add(u64::from(game));
        let (record, result) = play_game(&cfg, seed, logger.as_mut())?;
        let standings: Vec<String> = result
            .players
            .iter()
            .map(|p| {
                format!(
                    "{}. {} ({})",
                    p.position.unwrap_or(0),
                    p.name,
                    p.score.unwrap_or(0)
                )
            })
            .collect();
        writeln!(out, "Game {} (seed {}): {}", record.game_id, seed, standings.join(", "))?;

        if let Some(logger) = logger.as_mut() {
            logger.write(&record)?;
        }
    }

    writeln!(out, "Simulated: {} games", cfg.games)?;
    Ok(())
}

fn open_logger(path: &Path, err: &mut dyn Write) -> Result<GameLogger, CliError> {
    if let Err(e) = ensure_parent_dir(path) {
        ui::write_error(err, &e)?;
        return Err(CliError::Io(std::io::Error::other(e)));
    }
    let existing = match read_game_records(path) {
        Ok(records) => records.len(),
        Err(e) => {
            ui::display_warning(err, &format!("existing records unreadable: {}", e))?;
            0
        }
    };
    let mut logger = match GameLogger::append(path) {
        Ok(logger) => logger,
        Err(e) => {
            ui::write_error(err, &format!("Failed to open {}: {}", path.display(), e))?;
            return Err(CliError::Io(e));
        }
    };
    logger.resume_after(u32::try_from(existing).unwrap_or(u32::MAX));
    Ok(logger)
}

/// Plays one game to the end and returns its record and standings.
fn play_game(
    cfg: &Config,
    seed: u64,
    logger: Option<&mut GameLogger>,
) -> Result<(GameRecord, GameResult), CliError> {
    let bot = create_seeded_bot(&cfg.bot, seed)?;
    let mut repo = RoomRepository::new();
    let room_id = format!("sim-{}", seed);
    repo.create_with_config(
        &room_id,
        RoomConfig::new(cfg.players, cfg.total_rounds).with_seed(seed),
    )?;
    for seat in 0..cfg.players {
        repo.join(&room_id, &format!("Bot {}", seat + 1), &format!("bot-{}", seat + 1))?;
    }
    repo.start(&room_id)?;

    for _ in 0..MAX_TURNS {
        let room = repo.get(&room_id)?;
        if room.status() == RoomStatus::Finished {
            let result = repo.result(&room_id)?;
            let room = repo.get(&room_id)?;
            let game_id = match logger {
                Some(logger) => logger.next_id(),
                None => room_id.clone(),
            };
            let record = GameRecord::from_result(game_id, room, &result);
            return Ok((record, result));
        }

        let actor = room
            .current_player()
            .map(|p| p.id.clone())
            .ok_or_else(|| CliError::Engine(format!("no player on turn in {}", room_id)))?;
        let round_finished = if room.round() == 1 {
            let draw = bot.wants_new_card(room, &actor);
            repo.last_round_pick(&room_id, &actor, draw)?.round_finished
        } else {
            play_turn(&mut repo, &room_id, &actor, bot.as_ref())?
        };
        if round_finished {
            repo.start_new_round(&room_id)?;
        }
    }

    Err(CliError::Engine(format!(
        "game {} did not finish within {} turns",
        room_id, MAX_TURNS
    )))
}

/// One trick-round turn. A swap that finds nothing to restock falls back to
/// the cheapest single play.
fn play_turn(
    repo: &mut RoomRepository,
    room_id: &str,
    actor: &str,
    bot: &dyn SveinBot,
) -> Result<bool, CliError> {
    let room = repo.get(room_id)?;
    let mv = bot
        .choose_play(room, actor)
        .ok_or_else(|| CliError::Engine(format!("{} has no move", actor)))?;
    let fallback = room
        .player(actor)
        .and_then(|p| legal_single_plays(&p.hand, room.last_played_card()).first().map(|c| c.id));

    let is_swap = matches!(mv, PlayerMove::TwoForOne(_, _));

    match repo.play_cards(room_id, actor, &mv.card_ids()) {
        Ok(outcome) => Ok(outcome.round_finished),
        Err(GameError::NoCardsToRestock) if is_swap => {
            let card = fallback.ok_or(GameError::NoCardsToRestock)?;
            Ok(repo.play_cards(room_id, actor, &[card])?.round_finished)
        }
        Err(e) => Err(e.into()),
    }
}
