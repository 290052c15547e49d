use std::fmt;

use game::{RandomPlayer, Seat};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player ids as printed, with -1 standing in for an empty seat.
pub(crate) fn id_or_unset(id: Option<PlayerId>) -> i64 {
    id.map_or(-1, |id| i64::from(id.0))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

/// One worker identity.
///
/// Only the thread playing as this player ever touches it (it is lent to that thread as
/// `&mut`), so the counters need no lock.
pub struct Player<R: Rng> {
    id: PlayerId,
    /// Seat in the game currently being played, if any.
    pub(crate) seat: Option<Seat>,
    pub(crate) stats: Stats,
    pub(crate) mover: RandomPlayer<R>,
}

impl<R: Rng> Player<R> {
    /// `rng` must belong to this player alone.
    pub fn new(id: u32, rng: R) -> Self {
        Player {
            id: PlayerId(id),
            seat: None,
            stats: Stats::default(),
            mover: RandomPlayer::new(rng),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn seat(&self) -> Option<Seat> {
        self.seat
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
}

impl<R: Rng> fmt::Debug for Player<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("seat", &self.seat)
            .field("stats", &self.stats)
            .finish()
    }
}
