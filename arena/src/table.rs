//! A single game and the turn handoff between its two occupants.
//!
//! Board, turn and status live together behind one lock. Whoever holds it and has the
//! turn moves; the other occupant sleeps on `turn_changed`. Every change a sleeper could
//! be waiting for (second player seated, turn flipped, game over) is followed by a
//! `notify_all` while the lock is still held, and every wait is a predicate loop, so a
//! wake can't be lost to a waiter that hasn't gone to sleep yet.

use std::fmt;
use std::io::Write;

use game::{Conclusion, GameState, Player as _, Seat};
use parking_lot::{Condvar, Mutex};
use rand::Rng;
use tic_tac_toe::TicTacToe;
use tracing::{debug, trace, warn};

use crate::error::ArenaError;
use crate::log_line;
use crate::player::{id_or_unset, Player, PlayerId};
use crate::seats::{Claim, SeatClaim, SlotRegistry};
use crate::sync_log::SyncLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Won(Seat),
    Draw,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        *self != Status::InProgress
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Status::InProgress => "Unplayed",
            Status::Won(_) => "Won",
            Status::Draw => "Draw",
        })
    }
}

/// How a game ended for one occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub seat: Seat,
    pub player: PlayerId,
    pub row: usize,
    pub col: usize,
}

/// A copy of a game's final (or current) state.
#[derive(Debug, Clone)]
pub struct GameSummary {
    pub id: u32,
    pub player_x: Option<PlayerId>,
    pub player_o: Option<PlayerId>,
    pub status: Status,
    pub moves: Vec<PlayedMove>,
    pub board: TicTacToe,
}

impl GameSummary {
    /// The occupant credited with the win, if any.
    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            Status::Won(Seat::X) => self.player_x,
            Status::Won(Seat::O) => self.player_o,
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Table {
    board: TicTacToe,
    turn: Seat,
    status: Status,
    player_x: Option<PlayerId>,
    player_o: Option<PlayerId>,
    moves: Vec<PlayedMove>,
}

impl Table {
    fn new() -> Self {
        Table {
            board: TicTacToe::new(),
            turn: Seat::X,
            status: Status::InProgress,
            player_x: None,
            player_o: None,
            moves: Vec::with_capacity(9),
        }
    }

    /// First in takes O, second takes X.
    fn sit(&mut self, game: u32, player: PlayerId) -> Result<Seat, ArenaError> {
        if self.player_o.is_none() {
            self.player_o = Some(player);
            Ok(Seat::O)
        } else if self.player_x.is_none() {
            self.player_x = Some(player);
            Ok(Seat::X)
        } else {
            Err(ArenaError::SeatConflict { game, player })
        }
    }

    fn check_occupants(&self, game: u32) -> Result<(), ArenaError> {
        if self.player_x.is_none() {
            return Err(ArenaError::MissingOccupant { game, seat: Seat::X });
        }
        if self.player_o.is_none() {
            return Err(ArenaError::MissingOccupant { game, seat: Seat::O });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Game {
    id: u32,
    seats: SlotRegistry,
    table: Mutex<Table>,
    turn_changed: Condvar,
}

impl Game {
    pub fn new(id: u32) -> Self {
        Game {
            id,
            seats: SlotRegistry::new(id),
            table: Mutex::new(Table::new()),
            turn_changed: Condvar::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn try_claim_seat(&self) -> Claim {
        self.seats.try_claim_seat()
    }

    #[cfg(test)]
    pub(crate) fn seats_claimed(&self) -> u8 {
        self.seats.claimed()
    }

    pub fn summary(&self) -> GameSummary {
        let table = self.table.lock();
        GameSummary {
            id: self.id,
            player_x: table.player_x,
            player_o: table.player_o,
            status: table.status,
            moves: table.moves.clone(),
            board: table.board.clone(),
        }
    }

    /// Plays this game to the end as `player`.
    ///
    /// The first occupant in is seated as O and sleeps until the second arrives. The second
    /// is seated as X and opens. Both return once the game is over, with their own win, loss
    /// or draw counter already bumped. The turn lock is held for the whole call except while
    /// waiting.
    pub fn play<R: Rng, W: Write>(
        &self,
        claim: SeatClaim,
        player: &mut Player<R>,
        log: &SyncLog<W>,
    ) -> Result<Outcome, ArenaError> {
        debug_assert_eq!(claim.game(), self.id);
        let me = player.id();
        let mut table = self.table.lock();

        let seat = table.sit(self.id, me)?;
        player.seat = Some(seat);
        debug!(game = self.id, player = %me, %seat, order = claim.order(), "seated");
        log_line!(log, "Player {} joining game {} as '{}'", me, self.id, seat);

        match seat {
            Seat::O => {
                while table.player_x.is_none() {
                    trace!(game = self.id, player = %me, "waiting for second player");
                    self.turn_changed.wait(&mut table);
                }
            }
            Seat::X => {
                self.turn_changed.notify_all();
            }
        }

        log_line!(
            log,
            "Game {}:Player {} vs Player {} (Player {}) starting",
            self.id,
            id_or_unset(table.player_x),
            id_or_unset(table.player_o),
            me
        );
        table.check_occupants(self.id)?;

        loop {
            while table.status == Status::InProgress && table.turn != seat {
                self.turn_changed.wait(&mut table);
            }

            let outcome = match table.status {
                Status::InProgress => match self.take_turn(&mut table, seat, player, log)? {
                    Some(outcome) => return Ok(outcome),
                    None => continue,
                },
                Status::Won(winner) if winner == seat => Outcome::Won,
                Status::Won(_) => {
                    log_line!(log, "Game {}:Player {} - Lost", self.id, me);
                    player.stats.losses += 1;
                    Outcome::Lost
                }
                Status::Draw => {
                    log_line!(log, "Game {}:Player {} - Draw", self.id, me);
                    player.stats.draws += 1;
                    Outcome::Draw
                }
            };
            debug!(game = self.id, player = %me, ?outcome, "woken after game over");
            return Ok(outcome);
        }
    }

    /// Makes one move for `seat`. Returns the outcome if the move ended the game.
    fn take_turn<R: Rng, W: Write>(
        &self,
        table: &mut Table,
        seat: Seat,
        player: &mut Player<R>,
        log: &SyncLog<W>,
    ) -> Result<Option<Outcome>, ArenaError> {
        let me = player.id();
        if table.turn != seat || table.status.is_terminal() {
            return Err(ArenaError::OutOfTurn { game: self.id, player: me });
        }

        let game_move = match player.mover.choose_move(&table.board, seat) {
            Some(game_move) => game_move,
            None => {
                // Nowhere left to play.
                table.status = Status::Draw;
                log_line!(log, "Game {}:Player {} - Draw", self.id, me);
                player.stats.draws += 1;
                self.turn_changed.notify_all();
                return Ok(Some(Outcome::Draw));
            }
        };

        table
            .board
            .apply(game_move, seat)
            .map_err(|reason| ArenaError::IllegalMove { game: self.id, player: me, reason })?;
        table.moves.push(PlayedMove {
            seat,
            player: me,
            row: game_move.row(),
            col: game_move.col(),
        });
        trace!(game = self.id, player = %me, %seat, row = game_move.row(), col = game_move.col(), "moved");

        {
            let mut out = log.begin_atomic_output();
            out.line(format_args!(
                "Game {}: Player {}: Picked [Row: {}, Col: {}]",
                self.id,
                me,
                game_move.row(),
                game_move.col()
            ));
            if let Err(e) = write!(out, "{}", table.board) {
                warn!(error = %e, game = self.id, "dropped board");
            }
        }

        let outcome = match table.board.conclude_after(game_move, seat) {
            Some(Conclusion::Win(_)) => {
                table.status = Status::Won(seat);
                log_line!(log, "Game {}:Player {} - Won", self.id, me);
                player.stats.wins += 1;
                Some(Outcome::Won)
            }
            Some(Conclusion::Draw) => {
                table.status = Status::Draw;
                log_line!(log, "Game {}:Player {} - Draw", self.id, me);
                player.stats.draws += 1;
                Some(Outcome::Draw)
            }
            None => {
                table.turn = seat.other();
                None
            }
        };
        self.turn_changed.notify_all();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::thread;

    fn claim(game: &Game) -> SeatClaim {
        match game.try_claim_seat() {
            Claim::Seat(c) => c,
            Claim::Full => panic!("game {} full", game.id()),
        }
    }

    fn play_pair(seed: u64) -> (GameSummary, [Player<StdRng>; 2], String) {
        let game = Game::new(1);
        let log = SyncLog::new(Vec::new());
        let mut a = Player::new(0, StdRng::seed_from_u64(seed));
        let mut b = Player::new(1, StdRng::seed_from_u64(seed + 1000));
        let (ca, cb) = (claim(&game), claim(&game));
        thread::scope(|s| {
            s.spawn(|| game.play(ca, &mut a, &log).unwrap());
            s.spawn(|| game.play(cb, &mut b, &log).unwrap());
        });
        let summary = game.summary();
        let text = String::from_utf8(log.into_inner()).unwrap();
        (summary, [a, b], text)
    }

    #[test]
    fn two_players_finish_a_game() {
        for seed in 0..50 {
            let (summary, players, _) = play_pair(seed);
            assert!(summary.status.is_terminal());
            assert_ne!(summary.player_x, summary.player_o);
            assert!(summary.player_x.is_some() && summary.player_o.is_some());

            let [a, b] = players;
            let (sa, sb) = (a.stats(), b.stats());
            match summary.status {
                Status::Won(_) => {
                    assert_eq!(sa.wins + sb.wins, 1);
                    assert_eq!(sa.losses + sb.losses, 1);
                    assert_eq!(sa.draws + sb.draws, 0);
                    let winner = summary.winner().unwrap();
                    let winner_stats = if winner == a.id() { sa } else { sb };
                    assert_eq!(winner_stats.wins, 1);
                }
                Status::Draw => {
                    assert_eq!((sa.draws, sb.draws), (1, 1));
                    assert_eq!(sa.wins + sb.wins + sa.losses + sb.losses, 0);
                    assert_eq!(summary.moves.len(), 9);
                }
                Status::InProgress => unreachable!(),
            }
        }
    }

    #[test]
    fn moves_alternate_starting_with_x() {
        for seed in 100..150 {
            let (summary, players, _) = play_pair(seed);
            assert!(!summary.moves.is_empty() && summary.moves.len() <= 9);
            assert_eq!(summary.board.moves_played() as usize, summary.moves.len());
            let mut expected = Seat::X;
            for m in &summary.moves {
                assert_eq!(m.seat, expected);
                let occupant = if m.seat == Seat::X { summary.player_x } else { summary.player_o };
                assert_eq!(Some(m.player), occupant);
                expected = expected.other();
            }
            for p in players.iter() {
                let seated = if Some(p.id()) == summary.player_x { Seat::X } else { Seat::O };
                assert_eq!(p.seat(), Some(seated));
            }
        }
    }

    #[test]
    fn every_move_is_followed_by_its_board() {
        let (summary, _, text) = play_pair(7);
        let lines: Vec<&str> = text.lines().collect();
        let picks: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.contains(": Picked [Row: "))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(picks.len(), summary.moves.len());
        for i in picks {
            for row in &lines[i + 1..i + 4] {
                assert_eq!(row.len(), 9, "not a board row: {:?}", row);
                assert!(row.chars().all(|c| "[] XO".contains(c)));
            }
        }
        assert!(text.contains("Player 0 joining game 1 as '") && text.contains("Player 1 joining game 1 as '"));
    }

    #[test]
    fn driving_with_an_empty_seat_is_a_fault() {
        let mut table = Table::new();
        assert!(matches!(table.check_occupants(9), Err(ArenaError::MissingOccupant { game: 9, seat: Seat::X })));
        assert_eq!(table.sit(9, PlayerId(4)).unwrap(), Seat::O);
        assert!(matches!(table.check_occupants(9), Err(ArenaError::MissingOccupant { seat: Seat::X, .. })));
        assert_eq!(table.sit(9, PlayerId(5)).unwrap(), Seat::X);
        assert!(table.check_occupants(9).is_ok());
        assert!(matches!(table.sit(9, PlayerId(6)), Err(ArenaError::SeatConflict { player: PlayerId(6), .. })));
    }

    #[test]
    fn moving_out_of_turn_is_a_fault() {
        let game = Game::new(2);
        let log = SyncLog::new(Vec::new());
        let mut player = Player::new(0, StdRng::seed_from_u64(1));
        let mut table = game.table.lock();
        let result = game.take_turn(&mut table, Seat::O, &mut player, &log);
        assert!(matches!(result, Err(ArenaError::OutOfTurn { game: 2, .. })));
        assert!(table.moves.is_empty());
    }
}
