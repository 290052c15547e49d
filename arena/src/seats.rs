//! Two-seat admission control for a single game.
//!
//! The seat counter has its own lock, separate from the turn lock, so claiming (or being
//! refused) a seat never waits on a game that is mid-turn.

use parking_lot::Mutex;

pub const SEATS_PER_GAME: u8 = 2;

/// Proof that the holder was admitted to a game. Only [`SlotRegistry::try_claim_seat`]
/// makes these.
#[derive(Debug)]
pub struct SeatClaim {
    game: u32,
    order: u8,
}

impl SeatClaim {
    pub fn game(&self) -> u32 {
        self.game
    }

    /// 0 for the first thread admitted, 1 for the second.
    pub fn order(&self) -> u8 {
        self.order
    }
}

#[derive(Debug)]
pub enum Claim {
    Seat(SeatClaim),
    Full,
}

#[derive(Debug)]
pub struct SlotRegistry {
    game: u32,
    claimed: Mutex<u8>,
}

impl SlotRegistry {
    pub fn new(game: u32) -> Self {
        SlotRegistry { game, claimed: Mutex::new(0) }
    }

    /// Checks and increments the seat count as one step.
    pub fn try_claim_seat(&self) -> Claim {
        let mut claimed = self.claimed.lock();
        if *claimed >= SEATS_PER_GAME {
            return Claim::Full;
        }
        let order = *claimed;
        *claimed += 1;
        Claim::Seat(SeatClaim { game: self.game, order })
    }

    #[cfg(test)]
    pub(crate) fn claimed(&self) -> u8 {
        *self.claimed.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn third_claim_is_refused() {
        let seats = SlotRegistry::new(3);
        let first = match seats.try_claim_seat() {
            Claim::Seat(c) => c,
            Claim::Full => panic!("empty game refused a seat"),
        };
        assert_eq!((first.game(), first.order()), (3, 0));
        assert!(matches!(seats.try_claim_seat(), Claim::Seat(ref c) if c.order() == 1));
        assert!(matches!(seats.try_claim_seat(), Claim::Full));
        assert!(matches!(seats.try_claim_seat(), Claim::Full));
        assert_eq!(seats.claimed(), 2);
    }

    #[test]
    fn racing_claims_admit_exactly_two() {
        for _ in 0..100 {
            let seats = SlotRegistry::new(1);
            let admitted = AtomicUsize::new(0);
            thread::scope(|s| {
                for _ in 0..8 {
                    s.spawn(|| {
                        if let Claim::Seat(_) = seats.try_claim_seat() {
                            admitted.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
            });
            assert_eq!(admitted.load(Ordering::SeqCst), 2);
            assert_eq!(seats.claimed(), 2);
        }
    }
}
