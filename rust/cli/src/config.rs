use serde::{Deserialize, Serialize};
use std::fs;
use svein_engine::cards::DECK_SIZE;
use svein_engine::player::LAST_ROUND_PICK_LIMIT;
use svein_engine::room::MIN_PLAYERS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub players: usize,
    pub total_rounds: u32,
    pub games: u32,
    pub seed: Option<u64>,
    pub bot: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Cli,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub players: ValueSource,
    pub total_rounds: ValueSource,
    pub games: ValueSource,
    pub seed: ValueSource,
    pub bot: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            players: ValueSource::Default,
            total_rounds: ValueSource::Default,
            games: ValueSource::Default,
            seed: ValueSource::Default,
            bot: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            players: 4,
            total_rounds: 10,
            games: 1,
            seed: None,
            bot: "baseline".into(),
        }
    }
}

/// Values given on the command line; they override every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub players: Option<usize>,
    pub total_rounds: Option<u32>,
    pub games: Option<u32>,
    pub seed: Option<u64>,
    pub bot: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Default → `SVEIN_CONFIG` file → `SVEIN_*` environment.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    load_with_overrides(&CliOverrides::default())
}

/// All layers, with command-line values applied last.
pub fn load_with_overrides(overrides: &CliOverrides) -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("SVEIN_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = f.total_rounds {
            cfg.total_rounds = v;
            sources.total_rounds = ValueSource::File;
        }
        if let Some(v) = f.games {
            cfg.games = v;
            sources.games = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.bot {
            cfg.bot = v;
            sources.bot = ValueSource::File;
        }
    }

    if let Some(seed) = env_value("SVEIN_SEED") {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(players) = env_value("SVEIN_PLAYERS") {
        cfg.players = players
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid players".into()))?;
        sources.players = ValueSource::Env;
    }
    if let Some(rounds) = env_value("SVEIN_ROUNDS") {
        cfg.total_rounds = rounds
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid rounds".into()))?;
        sources.total_rounds = ValueSource::Env;
    }
    if let Some(bot) = env_value("SVEIN_BOT") {
        cfg.bot = bot;
        sources.bot = ValueSource::Env;
    }

    if let Some(v) = overrides.players {
        cfg.players = v;
        sources.players = ValueSource::Cli;
    }
    if let Some(v) = overrides.total_rounds {
        cfg.total_rounds = v;
        sources.total_rounds = ValueSource::Cli;
    }
    if let Some(v) = overrides.games {
        cfg.games = v;
        sources.games = ValueSource::Cli;
    }
    if let Some(v) = overrides.seed {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Cli;
    }
    if let Some(v) = &overrides.bot {
        cfg.bot = v.clone();
        sources.bot = ValueSource::Cli;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    players: Option<usize>,
    #[serde(default)]
    total_rounds: Option<u32>,
    #[serde(default)]
    games: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    bot: Option<String>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.players < MIN_PLAYERS {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: players must be >={}",
            MIN_PLAYERS
        )));
    }
    if cfg.total_rounds == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: total_rounds must be >=1".into(),
        ));
    }
    if cfg.games == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: games must be >=1".into(),
        ));
    }
    // every trick round deals one card per round left, and the last round can
    // draw up to a full pick pile per player
    let needed = cfg.players * (cfg.total_rounds as usize - 1 + LAST_ROUND_PICK_LIMIT);
    if needed > DECK_SIZE {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: {} players x {} rounds needs up to {} cards, the deck has {}",
            cfg.players, cfg.total_rounds, needed, DECK_SIZE
        )));
    }
    if !svein_ai::available_bots().contains(&cfg.bot.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: unknown bot '{}' (available: {})",
            cfg.bot,
            svein_ai::available_bots().join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fit_in_one_deck() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn too_many_rounds_for_the_table_is_invalid() {
        let cfg = Config {
            players: 5,
            total_rounds: 10,
            ..Config::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_bot_is_invalid() {
        let cfg = Config {
            bot: "shark".into(),
            ..Config::default()
        };
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("shark"));
    }

    #[test]
    fn file_values_parse_from_toml() {
        let f: FileConfig = toml::from_str("players = 3\ntotal_rounds = 6\n").unwrap();
        assert_eq!(f.players, Some(3));
        assert_eq!(f.total_rounds, Some(6));
        assert!(f.bot.is_none());
    }
}
