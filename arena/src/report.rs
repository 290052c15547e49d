//! Final results, built once every player thread has finished.

use std::fmt;

use rand::Rng;

use crate::player::{id_or_unset, Player, PlayerId, Stats};
use crate::table::{Game, GameSummary, Status};

#[derive(Debug, Clone)]
pub struct Report {
    pub players: Vec<(PlayerId, Stats)>,
    pub games: Vec<GameSummary>,
}

impl Report {
    pub fn new<R: Rng>(players: &[Player<R>], games: &[Game]) -> Self {
        Report {
            players: players.iter().map(|p| (p.id(), p.stats())).collect(),
            games: games.iter().map(Game::summary).collect(),
        }
    }

    /// Sum of every player's counters.
    pub fn totals(&self) -> Stats {
        self.players.iter().fold(Stats::default(), |mut t, (_, s)| {
            t.games_played += s.games_played;
            t.wins += s.wins;
            t.losses += s.losses;
            t.draws += s.draws;
            t
        })
    }

    pub fn games_won(&self) -> usize {
        self.games.iter().filter(|g| matches!(g.status, Status::Won(_))).count()
    }

    pub fn games_drawn(&self) -> usize {
        self.games.iter().filter(|g| g.status == Status::Draw).count()
    }

    /// Games that got two occupants.
    pub fn games_started(&self) -> usize {
        self.games.iter().filter(|g| g.player_x.is_some() && g.player_o.is_some()).count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "********* Player Results **********")?;
        for (id, s) in &self.players {
            writeln!(
                f,
                "Player {}, Played {} game(s), Won {}, Lost {}, Draw {}",
                id, s.games_played, s.wins, s.losses, s.draws
            )?;
        }
        let t = self.totals();
        // Both sides of a drawn game count it.
        writeln!(
            f,
            "Total Players {}, Wins {}, Losses {}, Draws {}\n\n",
            self.players.len(),
            t.wins,
            t.losses,
            t.draws / 2
        )?;

        writeln!(f, "********* Game Results **********")?;
        for g in &self.games {
            writeln!(
                f,
                "Game {} - 'X' player {}, 'O' player {}, game result {}",
                g.id,
                id_or_unset(g.player_x),
                id_or_unset(g.player_o),
                g.status
            )?;
        }
        writeln!(
            f,
            "Total Games = {}, {} Games Won, {} Games were a Draw\n\n",
            self.games.len(),
            self.games_won(),
            self.games_drawn()
        )
    }
}
