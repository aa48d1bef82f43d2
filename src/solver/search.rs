use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::{SearchBudget, SolveError};
use crate::board::Board;

/// One node of the search tree: a board snapshot plus path-cost bookkeeping.
///
/// `g` counts the cells filled since the root, `h` the cells still empty.
/// `h` is set once on construction and decremented when a child fills a
/// cell; it is never recomputed from the board.
#[derive(Clone, Copy)]
struct SearchState {
    board: Board,
    g: u32,
    h: u32,
}

impl SearchState {
    fn root(board: Board) -> Self {
        let h = board.num_empty() as u32;
        SearchState { board, g: 0, h }
    }

    fn f(&self) -> u32 {
        self.g + self.h
    }

    fn child(&self, row: usize, col: usize, value: u8) -> Self {
        debug_assert!(self.h > 0);
        debug_assert_eq!(self.board.get(row, col), 0);
        SearchState {
            board: self.board.with_cell(row, col, value),
            g: self.g + 1,
            h: self.h - 1,
        }
    }
}

struct FrontierEntry {
    state: SearchState,
    seq: u64,
}

impl Ord for FrontierEntry {
    // BinaryHeap pops the greatest entry, so "greater" must mean "expand
    // first": smaller f wins, and among equal f the most recently pushed
    // entry wins (same order as a stable descending sort popped from the
    // back).
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .state
            .f()
            .cmp(&self.state.f())
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Cost-ordered multiset of not-yet-expanded search states.
struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
}

impl Frontier {
    fn new() -> Self {
        Frontier {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn push(&mut self, state: SearchState) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(FrontierEntry { state, seq });
    }

    fn pop(&mut self) -> Option<SearchState> {
        self.heap.pop().map(|entry| entry.state)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// A running best-first search over partial boards.
///
/// Expects a conflict-free starting board; [super::solve] checks that
/// precondition. On a board whose givens already conflict, the search still
/// terminates (candidates never reintroduce a clashing digit, so the
/// frontier drains), but the result is unspecified between `Ok` and
/// `NotSolvable`.
pub struct Search {
    frontier: Frontier,
    budget: SearchBudget,
    expansions: u64,
}

impl Search {
    pub fn new(board: Board, budget: SearchBudget) -> Self {
        let mut frontier = Frontier::new();
        frontier.push(SearchState::root(board));
        Search {
            frontier,
            budget,
            expansions: 0,
        }
    }

    /// Number of states popped and branched on so far.
    pub fn expansions(&self) -> u64 {
        self.expansions
    }

    /// Runs the search until a filled board is popped, the frontier is
    /// exhausted, or the budget runs out.
    pub fn run(&mut self) -> Result<Board, SolveError> {
        while let Some(state) = self.frontier.pop() {
            if state.board.is_filled() {
                return Ok(state.board);
            }
            if let Some(max) = self.budget.max_expansions {
                if self.expansions >= max {
                    return Err(SolveError::BudgetExceeded {
                        expansions: self.expansions,
                    });
                }
            }
            self.expansions += 1;

            // The board is not filled, so there is an empty cell to branch on.
            // A cell with zero candidates produces no children and the branch
            // dies here.
            if let Some((row, col)) = most_constrained_cell(&state.board) {
                let candidates = state.board.candidates(row, col);
                for value in candidates.iter() {
                    self.frontier.push(state.child(row, col, value));
                }
            }

            if let Some(max) = self.budget.max_frontier {
                if self.frontier.len() > max {
                    return Err(SolveError::BudgetExceeded {
                        expansions: self.expansions,
                    });
                }
            }
        }
        Err(SolveError::NotSolvable)
    }
}

/// The empty cell with the fewest legal candidates, ties broken by row-major
/// enumeration order (first such cell wins). `None` iff the board is filled.
fn most_constrained_cell(board: &Board) -> Option<(usize, usize)> {
    let mut best: Option<((usize, usize), usize)> = None;
    for (row, col) in board.empty_cells() {
        let count = board.candidates(row, col).len();
        match best {
            Some((_, best_count)) if count >= best_count => {}
            _ => best = Some(((row, col), count)),
        }
    }
    best.map(|(cell, _)| cell)
}
