//! The orchestrator: owns every game for the whole run and drives the player threads.

use std::io::Write;
use std::thread;

use rand::Rng;
use tracing::{debug, info};

use crate::barrier::StartBarrier;
use crate::error::ArenaError;
use crate::player::Player;
use crate::report::Report;
use crate::sync_log::SyncLog;
use crate::table::Game;
use crate::worker;

/// All the games, allocated once up front and never resized. Player threads borrow them
/// for the duration of [`GamePool::run`].
#[derive(Debug)]
pub struct GamePool {
    games: Vec<Game>,
    barrier: StartBarrier,
}

impl GamePool {
    /// Games are numbered from 1.
    pub fn new(game_count: u32) -> Self {
        GamePool {
            games: (1..=game_count).map(Game::new).collect(),
            barrier: StartBarrier::new(),
        }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Runs one OS thread per player until every game that can be played has been.
    ///
    /// Each thread gets exclusive use of its `Player`. The pool waits for all of them to
    /// register, releases them together, then waits for all of them to finish.
    pub fn run<R, W>(self, players: &mut [Player<R>], log: &SyncLog<W>) -> Report
    where
        R: Rng + Send,
        W: Write + Send,
    {
        let expected = players.len();
        let games = &self.games;
        let barrier = &self.barrier;

        thread::scope(|s| {
            for player in players.iter_mut() {
                let spawned = thread::Builder::new()
                    .name(format!("player-{}", player.id()))
                    .spawn_scoped(s, move || {
                        if let Err(e) = worker::run(player, games, barrier, log) {
                            e.abort();
                        }
                    });
                if let Err(e) = spawned {
                    // Threads already spawned are parked on the barrier and would never be
                    // joined.
                    ArenaError::Spawn(e).abort();
                }
            }

            barrier.wait_for_registrations(expected);
            debug!(players = expected, "all players registered");
            barrier.release_all();
            barrier.wait_for_completion();
        });
        info!(players = expected, games = self.games.len(), "all players done");

        Report::new(players, &self.games)
    }
}
