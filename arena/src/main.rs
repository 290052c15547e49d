use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use arena::{log_line, sync_log, Config, ConfigError, GamePool, Player};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;

    Ok(())
}

fn usage_error(error: ConfigError) -> ! {
    eprintln!("Error: {}\n", error);
    eprintln!("{}", Config::command().render_help());
    std::process::exit(1)
}

fn main() -> Result<()> {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1)
        }
    };
    let settings = match config.validate() {
        Ok(settings) => settings,
        Err(e) => usage_error(e),
    };

    init_tracing(&config.log_level)?;
    info!(games = settings.games, players = settings.players, "configuration accepted");

    let log = sync_log::stdout();
    let program = std::env::args().next().unwrap_or_else(|| "tictactoe".to_string());
    log_line!(log, "{} starting {} player(s) for {} game(s)", program, settings.players, settings.games);

    let mut players: Vec<_> = (0..settings.players)
        .map(|id| Player::new(id, StdRng::from_entropy()))
        .collect();
    let report = GamePool::new(settings.games).run(&mut players, log);

    log.log(format_args!("{}", report));
    Ok(())
}
