use thiserror::Error;

use crate::board::Board;

mod search;

pub use search::Search;

/// Limits on how much work a search may do before giving up.
///
/// The expansion limit is checked once per frontier pop and the frontier
/// limit after each expansion, so a runaway search is cut off promptly.
/// `None` means unlimited. Without a limit the frontier can grow without
/// bound on adversarial boards, since expanded states are never deduplicated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchBudget {
    /// Maximum number of frontier expansions.
    pub max_expansions: Option<u64>,
    /// Maximum number of states the frontier may hold at once.
    pub max_frontier: Option<usize>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// The search space is exhausted; the puzzle has no solution.
    #[error("Sudoku is not solvable")]
    NotSolvable,

    /// The starting board already violates row/column/block uniqueness.
    #[error("Sudoku clues conflict with each other")]
    Conflicting,

    /// The configured [SearchBudget] ran out before the search finished,
    /// so nothing is known about whether a solution exists.
    #[error("search budget exhausted after {expansions} expansions")]
    BudgetExceeded { expansions: u64 },
}

/// Solves `board` with an unlimited search budget.
pub fn solve(board: Board) -> Result<Board, SolveError> {
    solve_with_budget(board, SearchBudget::default())
}

/// Solves `board`, giving up with [SolveError::BudgetExceeded] if `budget`
/// runs out first.
///
/// A board whose givens already conflict is rejected up front: the search
/// itself never re-verifies constraints on a filled board, so feeding it a
/// conflicting board could otherwise "complete" an invalid grid.
pub fn solve_with_budget(board: Board, budget: SearchBudget) -> Result<Board, SolveError> {
    if board.has_conflicts() {
        return Err(SolveError::Conflicting);
    }
    let solution = Search::new(board, budget).run()?;
    assert!(solution.is_filled());
    assert!(!solution.has_conflicts());
    Ok(solution)
}
