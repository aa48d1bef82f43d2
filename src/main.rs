use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use sudoku_astar::{Board, Search, SearchBudget, SolveError};

/// Solve a 9x9 sudoku puzzle with a best-first search.
#[derive(Parser, Debug)]
#[command(name = "sudoku-astar", version, about)]
struct Args {
    /// Path to the puzzle file: 81 cells in reading order, whitespace
    /// ignored, with 0, _ or . marking empty cells.
    puzzle: PathBuf,

    /// Where to write the solved grid. Defaults to the puzzle path with an
    /// `.out` extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Give up after this many frontier expansions.
    #[arg(long)]
    max_expansions: Option<u64>,

    /// Give up once the frontier holds more than this many states.
    #[arg(long)]
    max_frontier: Option<usize>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let text = match fs::read_to_string(&args.puzzle) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cannot read {}: {}", args.puzzle.display(), err);
            return ExitCode::FAILURE;
        }
    };
    let board: Board = match text.parse() {
        Ok(board) => board,
        Err(err) => {
            eprintln!("cannot parse {}: {}", args.puzzle.display(), err);
            return ExitCode::FAILURE;
        }
    };

    println!("initial state:");
    println!("{}", board);

    if board.has_conflicts() {
        eprintln!("{}", SolveError::Conflicting);
        return ExitCode::FAILURE;
    }

    let budget = SearchBudget {
        max_expansions: args.max_expansions,
        max_frontier: args.max_frontier,
    };

    let start = Instant::now();
    let mut search = Search::new(board, budget);
    let result = search.run();
    let elapsed = start.elapsed();

    let exit_code = match result {
        Ok(solution) => {
            println!("solution:");
            println!("{}", solution);
            let output = args
                .output
                .unwrap_or_else(|| args.puzzle.with_extension("out"));
            if let Err(err) = fs::write(&output, solution.to_grid_string()) {
                eprintln!("cannot write {}: {}", output.display(), err);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    };

    println!(
        "expanded {} states in {:.7} seconds.",
        search.expansions(),
        elapsed.as_secs_f64()
    );
    exit_code
}
