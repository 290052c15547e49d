//! Error types for the arena.
//!
//! There are no retryable errors here. Configuration problems are caught once at startup,
//! and everything else is a broken invariant on shared game state that takes the whole
//! process down.

use game::Seat;
use thiserror::Error;
use tracing::error;

use crate::player::PlayerId;

/// Bad command line input. Reported before any thread is started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A count argument was below zero.
    #[error("all arguments must be positive integer values ({name} was {value})")]
    NegativeCount {
        /// Which argument.
        name: &'static str,
        /// What was supplied.
        value: i64,
    },

    /// A count that doesn't fit in 32 bits.
    #[error("{name} {value} is too large")]
    TooLarge {
        /// Which argument.
        name: &'static str,
        /// What was supplied.
        value: i64,
    },

    /// Fewer than two players can never finish a game.
    #[error("requires at least two players (got {0})")]
    TooFewPlayers(i64),
}

/// Internal consistency faults.
#[derive(Error, Debug)]
pub enum ArenaError {
    /// A game reached the driving phase with a seat still empty.
    #[error("game {game}: playing with only one player present, seat {seat} is empty")]
    MissingOccupant { game: u32, seat: Seat },

    /// A thread tried to move while it was the other seat's turn.
    #[error("game {game}: player {player} moved out of turn")]
    OutOfTurn { game: u32, player: PlayerId },

    /// A third thread got past the seat registry.
    #[error("game {game}: player {player} joined but both seats are taken")]
    SeatConflict { game: u32, player: PlayerId },

    /// The board refused a move the arbiter believed was legal.
    #[error("game {game}: player {player} made an illegal move: {reason}")]
    IllegalMove {
        game: u32,
        player: PlayerId,
        reason: tic_tac_toe::IllegalMove,
    },

    /// An OS thread for a player could not be created.
    #[error("failed to spawn player thread")]
    Spawn(#[source] std::io::Error),
}

impl ArenaError {
    /// Reports the fault and terminates the process with status 1.
    ///
    /// Game and board state is shared between threads, so a fault in one cannot be
    /// contained to the thread that found it.
    pub fn abort(self) -> ! {
        error!(error = %self, "internal consistency fault");
        eprintln!("ERROR: {}", self);
        std::process::exit(1)
    }
}
