//! File helpers for the commands that read or write game records.

use std::path::Path;
use svein_engine::logger::GameRecord;

/// Ensure parent directory exists for given path, creating if needed.
///
/// ```rust,no_run
/// use std::path::Path;
/// # use svein_cli::io_utils::ensure_parent_dir;
///
/// ensure_parent_dir(Path::new("output/data/games.jsonl")).unwrap();
/// ```
pub fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create directory {}: {}", parent.display(), e))?;
        }
    }
    Ok(())
}

/// Reads a JSONL file of game records. A missing file reads as empty;
/// blank lines are skipped and a malformed line is an error naming its line.
pub fn read_game_records(path: &Path) -> Result<Vec<GameRecord>, String> {
    let mut content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(format!("Failed to read {}: {}", path.display(), e)),
    };
    strip_utf8_bom(&mut content);

    let mut records = Vec::new();
    for (n, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str::<GameRecord>(line)
            .map_err(|e| format!("{}:{}: {}", path.display(), n + 1, e))?;
        records.push(record);
    }
    Ok(records)
}

/// Strip UTF-8 BOM (Byte Order Mark) from the beginning of a string if present.
fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}
