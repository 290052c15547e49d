use std::fmt;
use std::ops::Deref;

use game::{Conclusion, Seat};
use ndarray::prelude::*;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Piece {
    Nought,
    Cross,
}

impl From<Seat> for Piece {
    fn from(seat: Seat) -> Self {
        match seat {
            Seat::X => Piece::Cross,
            Seat::O => Piece::Nought,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct OptionalPiece(Option<Piece>);

impl From<Option<Piece>> for OptionalPiece {
    fn from(t: Option<Piece>) -> Self {
        OptionalPiece(t)
    }
}

impl Deref for OptionalPiece {
    type Target = Option<Piece>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for OptionalPiece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self.0 {
            Some(Piece::Nought) => "[O]",
            Some(Piece::Cross) => "[X]",
            None => "[ ]",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    WrongPiece { seat: Seat, piece: Piece },
    Occupied { row: usize, col: usize },
    OutOfTurn(Piece),
}

impl fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            IllegalMove::WrongPiece { seat, piece } => write!(f, "Player {} tried to place {:?}", seat, piece),
            IllegalMove::Occupied { row, col } => write!(f, "Trying to override the piece at [{}, {}]", row, col),
            IllegalMove::OutOfTurn(piece) => write!(f, "{:?} playing out of turn", piece),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct TicTacToe {
    state: Array2<OptionalPiece>
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            state: Array::from_elem((3, 3), None.into())
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Piece> {
        *self.state[[row, col]]
    }

    fn count(&self, piece: OptionalPiece) -> u8 {
        self.state.iter().fold(0u8, |n, x| {
            if *x == piece {
                n + 1
            } else {
                n
            }
        })
    }

    /// Number of pieces on the board.
    pub fn moves_played(&self) -> u8 {
        9 - self.count(None.into())
    }

    pub fn is_full(&self) -> bool {
        self.state.iter().all(|x| x.is_some())
    }

    /// Does `piece` own a full line through `[row, col]`?
    ///
    /// Only the played row, the played column and the two diagonals are scanned: a winning
    /// line made by the last move has to pass through the cell it was played in.
    pub fn wins_through(&self, row: usize, col: usize, piece: Piece) -> bool {
        let owned = |x: &OptionalPiece| *x == Some(piece).into();

        if self.state.row(row).iter().all(owned) {
            return true;
        }
        if self.state.column(col).iter().all(owned) {
            return true;
        }
        if self.state.diag().iter().all(owned) {
            return true;
        }
        // Anti-diagonal: invert one of the axes and take a look at the diag again.
        let mut view = self.state.view();
        view.invert_axis(Axis(0));
        view.diag().iter().all(owned)
    }

    fn is_legal(&self, game_move: Move, seat: Seat) -> Result<(), IllegalMove> {
        let Move {
            coordinates: (row, col),
            piece,
        } = game_move;

        if Piece::from(seat) != piece {
            return Err(IllegalMove::WrongPiece { seat, piece });
        }

        if self.state[[row, col]].is_some() {
            return Err(IllegalMove::Occupied { row, col });
        }

        let count_noughts = self.count(Some(Piece::Nought).into());
        let count_crosses = self.count(Some(Piece::Cross).into());
        let in_turn = match piece {
            // Crosses open, so noughts always trail by exactly one when it's their go
            Piece::Nought => count_noughts + 1 == count_crosses,
            Piece::Cross => count_noughts == count_crosses,
        };
        if !in_turn {
            return Err(IllegalMove::OutOfTurn(piece));
        }

        Ok(())
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.state.rows() {
            for cell in row.iter() {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TicTacToe {{\n{}}}", self)
    }
}

/// Coordinates are guaranteed to be 0,1,2
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Move {
    coordinates: (usize, usize),
    piece: Piece,
}

impl Move {
    pub fn new(row: usize, col: usize, piece: Piece) -> Move {
        if row > 2 || col > 2 {
            panic!("Coordinates were out of bounds.")
        }
        Move {
            coordinates: (row, col),
            piece
        }
    }

    pub fn row(&self) -> usize {
        self.coordinates.0
    }

    pub fn col(&self) -> usize {
        self.coordinates.1
    }

    pub fn piece(&self) -> Piece {
        self.piece
    }
}

impl game::GameState for TicTacToe {
    type Move = Move;
    type Error = IllegalMove;

    fn apply(&mut self, game_move: Move, seat: Seat) -> Result<(), IllegalMove> {
        self.is_legal(game_move, seat)?;

        let Move {
            coordinates: (row, col),
            piece,
        } = game_move;

        self.state[[row, col]] = Some(piece).into();
        Ok(())
    }

    fn legal_moves<'a>(&'a self, seat: Seat) -> Box<dyn Iterator<Item = Move> + 'a> {
        let closure = move |((row, col), _): ((usize, usize), &OptionalPiece)| {
            let game_move = Move::new(row, col, Piece::from(seat));
            self.is_legal(game_move, seat).ok().map(|_| game_move)
        };
        Box::new(self.state.indexed_iter().filter_map(closure))
    }

    fn conclude_after(&self, game_move: Move, seat: Seat) -> Option<Conclusion> {
        if self.wins_through(game_move.row(), game_move.col(), game_move.piece()) {
            return Some(Conclusion::Win(seat))
        }

        // Otherwise, if the board has filled up, draw
        if self.is_full() {
            return Some(Conclusion::Draw)
        }

        // Otherwise, the game goes on
        None
    }
}
