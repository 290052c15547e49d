//! What each player thread does from start to finish.

use std::io::Write;

use rand::Rng;
use tracing::{debug, info};

use crate::barrier::StartBarrier;
use crate::error::ArenaError;
use crate::log_line;
use crate::player::Player;
use crate::seats::Claim;
use crate::sync_log::SyncLog;
use crate::table::Game;

/// Registers, waits for the gun, then walks `games` in order playing every game it can get
/// a seat in. Full games are skipped and never revisited.
///
/// `mark_done` is only reached on success. A fault is fatal to the process, so the caller
/// is expected to abort rather than carry on with the barrier still counting this worker.
pub fn run<R: Rng, W: Write>(
    player: &mut Player<R>,
    games: &[Game],
    barrier: &StartBarrier,
    log: &SyncLog<W>,
) -> Result<(), ArenaError> {
    let me = player.id();
    log_line!(log, "Player {} waiting on starting gun", me);
    barrier.register();
    barrier.wait_for_release();

    log_line!(log, "Player {} running", me);
    play_each_game(player, games, log)?;

    info!(player = %me, stats = ?player.stats(), "finished");
    barrier.mark_done();
    Ok(())
}

fn play_each_game<R: Rng, W: Write>(
    player: &mut Player<R>,
    games: &[Game],
    log: &SyncLog<W>,
) -> Result<(), ArenaError> {
    log_line!(log, "Player {} starting to play games...", player.id());
    for game in games {
        let claim = match game.try_claim_seat() {
            Claim::Seat(claim) => claim,
            Claim::Full => {
                debug!(game = game.id(), player = %player.id(), "full, skipping");
                continue;
            }
        };
        let outcome = game.play(claim, player, log)?;
        player.stats.games_played += 1;
        debug!(game = game.id(), player = %player.id(), ?outcome, "game over");
    }
    Ok(())
}
