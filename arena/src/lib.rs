//! Many games of tic-tac-toe played at once, one OS thread per player.
//!
//! Every player thread walks the same list of games in order, taking a seat wherever one
//! is free. The first thread into a game waits as O for a second to arrive as X, and the
//! two then hand the board back and forth until somebody wins or it fills up. A start
//! barrier makes all players begin together, and all output goes through one
//! serialized sink so boards are never torn.

pub mod barrier;
pub mod config;
pub mod error;
pub mod player;
pub mod pool;
pub mod report;
pub mod seats;
pub mod sync_log;
pub mod table;
pub mod worker;

pub use barrier::StartBarrier;
pub use config::{Config, Settings};
pub use error::{ArenaError, ConfigError};
pub use player::{Player, PlayerId, Stats};
pub use pool::GamePool;
pub use report::Report;
pub use seats::{Claim, SeatClaim, SlotRegistry};
pub use sync_log::SyncLog;
pub use table::{Game, GameSummary, Outcome, PlayedMove, Status};
