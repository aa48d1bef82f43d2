mod board;
mod candidates;
mod solver;
mod utils;

pub use board::{Board, ParseBoardError};
pub use candidates::CandidateSet;
pub use solver::{solve, solve_with_budget, Search, SearchBudget, SolveError};
