use rand::Rng;

/// Something which picks the next move for whichever seat it is playing.
pub trait Player<Game: GameState> {
    fn choose_move(&mut self, game: &Game, seat: Seat) -> Option<<Game as GameState>::Move>;
}

/// Picks uniformly among the legal moves using its own random source.
///
/// Every thread that plays should own one of these; the generator is not shared.
pub struct RandomPlayer<R: Rng>(pub R);

impl<R: Rng> RandomPlayer<R> {
    pub fn new(rng: R) -> Self {
        RandomPlayer(rng)
    }
}

impl<Game: GameState, R: Rng> Player<Game> for RandomPlayer<R> {
    fn choose_move(&mut self, game: &Game, seat: Seat) -> Option<<Game as GameState>::Move> {
        random_sample(&mut self.0, game.legal_moves(seat))
    }
}

/// Returns None only if the iterator is empty.
///
/// Suppose there are N elements in the iterator.
/// Generate N bernoulli random variables, X~n~ with probability of success (1/n).
///
/// The chosen element is the n^th^ element, iff X~n~ && !X~n+1~ && ... && !X~N~. This has
/// probability of 1/n * (1-1/(n+1)) * ... * (1-1/N)) = 1/N for all n, so no position is
/// favoured and N need not be known up front.
pub fn random_sample<T, R: Rng, I: Iterator<Item = T>>(rng: &mut R, iter: I) -> Option<T> {
    let mut elem = None;
    for (n, new_item) in iter.enumerate() {
        // gen_range(0..n+1) == 0 with probability 1/(n+1)
        if rng.gen_range(0..n + 1) == 0 {
            elem = Some(new_item);
        }
    }
    elem
}

/// One of the two fixed roles in a two-party game. X always opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Seat {
    X,
    O,
}

impl Seat {
    pub fn other(&self) -> Seat {
        match *self {
            Seat::X => Seat::O,
            Seat::O => Seat::X,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", match *self {
            Seat::X => "X",
            Seat::O => "O",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conclusion {
    Win(Seat),
    Draw,
}

pub trait GameState: std::fmt::Debug + Clone + 'static {
    type Move: Copy;
    type Error: std::fmt::Debug;

    /// Places `game_move` for `seat`, refusing anything illegal.
    fn apply(&mut self, game_move: Self::Move, seat: Seat) -> Result<(), Self::Error>;

    fn legal_moves<'a>(&'a self, seat: Seat) -> Box<dyn Iterator<Item = Self::Move> + 'a>;

    /// Decides the game given that `game_move` by `seat` was the last move played.
    ///
    /// Implementations only need to look at lines through the last move, since any
    /// earlier winning line would already have concluded the game.
    fn conclude_after(&self, game_move: Self::Move, seat: Seat) -> Option<Conclusion>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// A row of cells; whoever fills the last free cell wins.
    #[derive(Debug, Clone)]
    struct Strip(Vec<Option<Seat>>);

    impl GameState for Strip {
        type Move = usize;
        type Error = String;

        fn apply(&mut self, game_move: usize, seat: Seat) -> Result<(), String> {
            match self.0.get_mut(game_move) {
                Some(cell) if cell.is_none() => {
                    *cell = Some(seat);
                    Ok(())
                }
                _ => Err(format!("cell {} not free", game_move)),
            }
        }

        fn legal_moves<'a>(&'a self, _seat: Seat) -> Box<dyn Iterator<Item = usize> + 'a> {
            Box::new(self.0.iter().enumerate().filter(|(_, c)| c.is_none()).map(|(i, _)| i))
        }

        fn conclude_after(&self, _game_move: usize, seat: Seat) -> Option<Conclusion> {
            if self.0.iter().all(Option::is_some) {
                Some(Conclusion::Win(seat))
            } else {
                None
            }
        }
    }

    #[test]
    fn other_seat_flips() {
        assert_eq!(Seat::X.other(), Seat::O);
        assert_eq!(Seat::O.other(), Seat::X);
        assert_eq!(Seat::X.other().other(), Seat::X);
    }

    #[test]
    fn random_sample_of_empty_is_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_sample(&mut rng, std::iter::empty::<u8>()), None);
    }

    #[test]
    fn random_sample_reaches_every_element() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut hits = [0u32; 5];
        for _ in 0..5000 {
            let i = random_sample(&mut rng, 0..5usize).unwrap();
            hits[i] += 1;
        }
        // Expected 1000 each; a biased sampler would starve the early elements.
        for h in hits.iter() {
            assert!(*h > 800 && *h < 1200, "skewed sample: {:?}", hits);
        }
    }

    #[test]
    fn random_player_only_picks_free_cells() {
        let mut strip = Strip(vec![Some(Seat::X), None, Some(Seat::O), None]);
        let mut player = RandomPlayer::new(StdRng::seed_from_u64(3));
        for _ in 0..50 {
            let m = player.choose_move(&strip, Seat::X).unwrap();
            assert!(m == 1 || m == 3);
        }
        strip.apply(1, Seat::X).unwrap();
        strip.apply(3, Seat::O).unwrap();
        assert_eq!(player.choose_move(&strip, Seat::X), None);
        assert_eq!(strip.conclude_after(3, Seat::O), Some(Conclusion::Win(Seat::O)));
    }
}
