use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::room::{PlayerId, Room};
use crate::scoring::GameResult;

/// One player's line in a finished game record.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    /// Cards banked over the whole game
    pub saved_cards: Vec<Card>,
    pub score: u32,
    /// 1-based finishing position
    pub position: usize,
}

/// Complete record of a finished game.
/// Serialized to JSONL format for game history storage and replay.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Unique identifier for this game (format: YYYYMMDD-NNNNNN)
    pub game_id: String,
    /// RNG seed the room was created with (enables deterministic replay)
    pub seed: Option<u64>,
    pub total_rounds: u32,
    /// Standings, best score first
    pub players: Vec<PlayerRecord>,
    /// Timestamp when the game finished (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    /// Additional metadata (extensible JSON object)
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

impl GameRecord {
    pub fn from_result(game_id: String, room: &Room, result: &GameResult) -> Self {
        Self {
            game_id,
            seed: Some(room.seed()),
            total_rounds: room.total_rounds(),
            players: result
                .players
                .iter()
                .map(|p| PlayerRecord {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    saved_cards: p.saved_cards.clone(),
                    score: p.score.unwrap_or(0),
                    position: p.position.unwrap_or(0),
                })
                .collect(),
            ts: None,
            meta: None,
        }
    }
}

pub fn format_game_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct GameLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl GameLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::open(path, false)
    }

    /// Opens `path` for appending, keeping records already written there.
    pub fn append<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Self::open(path, true)
    }

    fn open<P: AsRef<Path>>(path: P, append: bool) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                let _ = create_dir_all(parent);
            }
        }
        let f = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    /// Continues numbering after `count` records already in the file.
    pub fn resume_after(&mut self, count: u32) {
        self.seq = self.seq.max(count);
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_game_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &GameRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_per_logger() {
        let mut logger = GameLogger::with_seq_for_test("20261016");
        assert_eq!(logger.next_id(), "20261016-000001");
        assert_eq!(logger.next_id(), "20261016-000002");
    }

    #[test]
    fn resumed_logger_continues_numbering() {
        let mut logger = GameLogger::with_seq_for_test("20261016");
        logger.resume_after(7);
        assert_eq!(logger.next_id(), "20261016-000008");
        logger.resume_after(3);
        assert_eq!(logger.next_id(), "20261016-000009");
    }

    #[test]
    fn game_id_is_zero_padded() {
        assert_eq!(format_game_id("20250102", 42), "20250102-000042");
    }
}
