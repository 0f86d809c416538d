use clap::Parser;
use fenboard::console::{ConsoleConfig, ConsoleHandler};
use fenboard::game::GameState;
use log::warn;

#[derive(Parser, Debug)]
#[command(name = "fenboard", about = "Play chess positions from the terminal")]
struct Args {
    /// Starting position in FEN (defaults to the standard start)
    #[arg(long)]
    fen: Option<String>,

    /// Draw pieces with Unicode chess symbols
    #[arg(long)]
    unicode: bool,

    /// Hide file and rank labels
    #[arg(long)]
    no_coordinates: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let game = match args.fen.as_deref() {
        Some(fen) => GameState::from_fen(fen).unwrap_or_else(|e| {
            warn!("invalid --fen ({}), starting from the standard position", e);
            GameState::new()
        }),
        None => GameState::new(),
    };

    let config = ConsoleConfig {
        unicode: args.unicode,
        coordinates: !args.no_coordinates,
    };
    ConsoleHandler::with_game(game, config).run()
}
