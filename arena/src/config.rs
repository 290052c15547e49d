//! Command line configuration.
//!
//! Two positional counts, plus the diagnostic log level. The level can also come from
//! `TICTACTOE_LOG_LEVEL`; `RUST_LOG`, when set, overrides both.

use clap::Parser;

use crate::error::ConfigError;

#[derive(Parser, Debug, Clone)]
#[command(name = "tictactoe", version)]
#[command(about = "Plays many games of tic-tac-toe at once, one thread per player")]
pub struct Config {
    /// Number of games
    #[arg(allow_negative_numbers = true)]
    pub game_count: i64,

    /// Number of players (at least two)
    #[arg(allow_negative_numbers = true)]
    pub player_count: i64,

    /// Diagnostic log level (trace, debug, info, warn, error), written to stderr
    #[arg(long, env = "TICTACTOE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

/// Validated counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub games: u32,
    pub players: u32,
}

fn count(name: &'static str, value: i64) -> Result<u32, ConfigError> {
    if value < 0 {
        return Err(ConfigError::NegativeCount { name, value });
    }
    u32::try_from(value).map_err(|_| ConfigError::TooLarge { name, value })
}

impl Config {
    pub fn validate(&self) -> Result<Settings, ConfigError> {
        let games = count("game count", self.game_count)?;
        let players = count("player count", self.player_count)?;
        if players < 2 {
            return Err(ConfigError::TooFewPlayers(self.player_count));
        }
        Ok(Settings { games, players })
    }
}
