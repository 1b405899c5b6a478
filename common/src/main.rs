use clap::Parser;
use minesweeper_ai::{Board, Game, GameState, MoveKind, Outcome};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::thread;
use std::time::Duration;

/// Autonomous minesweeper bot: plays safe moves it can prove, guesses otherwise.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of rows on the board
    #[arg(long, default_value_t = 8)]
    height: usize,

    /// Number of columns on the board
    #[arg(long, default_value_t = 8)]
    width: usize,

    /// Number of mines to place
    #[arg(long, default_value_t = 8)]
    mines: usize,

    /// Seed for mine placement and guesses, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between moves, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    // --- 1. Initialization ---
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let board = Board::new(args.height, args.width, args.mines, &mut rng)?;
    let mut game = Game::new(board);

    println!("--- Autonomous Minesweeper Bot ---");
    println!("Strategy: Prioritize logically safe moves, guess randomly otherwise.");
    println!("Initial Board:");
    println!("{}", game.board());

    // --- 2. Game Loop ---
    while game.state() == GameState::Playing {
        let Some(turn) = game.play_turn(&mut rng)? else {
            println!("No valid moves left for the bot to make.");
            break;
        };

        println!("\n--- Move #{} ---", game.turns());
        match turn.kind {
            MoveKind::Deduced => println!("Logic found a guaranteed safe cell."),
            MoveKind::Guessed => {
                println!("No logically safe move found. Making a random guess...")
            }
        }
        match turn.outcome {
            Outcome::Revealed(count) => println!("Bot reveals {}: {count}", turn.cell),
            Outcome::Detonated => println!("Bot reveals {}: mine!", turn.cell),
        }
        println!("{}", game.board());

        if args.delay_ms > 0 {
            thread::sleep(Duration::from_millis(args.delay_ms));
        }
    }

    // --- 3. Final Result ---
    println!("\n--- Game Over ---");
    let player = game.player();
    println!(
        "Known safe cells: {}, known mines: {}",
        player.safes().len(),
        player.mines().len()
    );

    match game.state() {
        GameState::Won => println!("Result: The bot won!"),
        GameState::Lost => {
            println!("Result: The bot hit a mine and lost.");
            println!("Mine layout:");
            println!("{}", game.board().layout());
        }
        GameState::Playing => println!("Result: The game ended unexpectedly."),
    }
    Ok(())
}
