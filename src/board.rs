use std::fmt;
use std::str::FromStr;

use itertools::iproduct;
use thiserror::Error;

use crate::candidates::CandidateSet;
use crate::utils::div_ceil;

const WIDTH: usize = 9;
const HEIGHT: usize = 9;
const NUM_CELLS: usize = WIDTH * HEIGHT;

const NUM_BYTES: usize = div_ceil(NUM_CELLS, 2);

/// A [Board] is a 9x9 sudoku board.
/// Each cell can contain a value in 0..=9 where 0 means the cell is empty.
///
/// Boards are small `Copy` values and are never mutated in place: the only
/// way to change a cell is [Board::with_cell], which returns a fresh board,
/// so two boards can never alias the same grid storage.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    // Every byte stores two cells. The first 4 bits the first cell, the second 4 bits the second cell.
    // Cells are ordered by rows, first left-to-right, then top-to-bottom.
    compressed_board: [u8; NUM_BYTES],
}

/// Error for [Board::from_str]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseBoardError {
    /// Input does not describe exactly 81 cells
    #[error("board should have 81 cells, found {0}")]
    WrongLength(usize),
    /// Input contains a character that is not a digit or an empty-cell marker
    #[error("invalid character {0:?} in board")]
    InvalidCharacter(char),
}

impl Board {
    #[inline]
    pub fn new_empty() -> Self {
        Board {
            compressed_board: [0; NUM_BYTES],
        }
    }

    fn index(row: usize, col: usize) -> (usize, bool) {
        assert!(row < HEIGHT && col < WIDTH);
        let index = row * WIDTH + col;
        (index / 2, index % 2 == 0)
    }

    /// Returns the value of the cell at (row, col), 0 meaning empty.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        let (byte, first_half) = Self::index(row, col);
        let value = if first_half {
            self.compressed_board[byte] & 0x0F
        } else {
            self.compressed_board[byte] >> 4
        };
        assert!(value <= 9);
        value
    }

    fn set(&mut self, row: usize, col: usize, value: u8) {
        assert!(value <= 9);
        let (byte, first_half) = Self::index(row, col);
        if first_half {
            self.compressed_board[byte] = (self.compressed_board[byte] & 0xF0) | value;
        } else {
            self.compressed_board[byte] = (self.compressed_board[byte] & 0x0F) | (value << 4);
        }
    }

    /// Returns a new board equal to this one except that the cell at
    /// (row, col) holds `value`. The receiver is left untouched.
    #[inline]
    pub fn with_cell(&self, row: usize, col: usize, value: u8) -> Self {
        let mut board = *self;
        board.set(row, col, value);
        board
    }

    /// The nine values of row `row`, left to right.
    pub fn row(&self, row: usize) -> [u8; WIDTH] {
        let mut values = [0; WIDTH];
        for (col, value) in values.iter_mut().enumerate() {
            *value = self.get(row, col);
        }
        values
    }

    /// The nine values of column `col`, top to bottom.
    pub fn col(&self, col: usize) -> [u8; HEIGHT] {
        let mut values = [0; HEIGHT];
        for (row, value) in values.iter_mut().enumerate() {
            *value = self.get(row, col);
        }
        values
    }

    /// The nine values of the 3x3 block `block`, row-major. Blocks are
    /// numbered row-major over the 3x3 grid of blocks, i.e. the block
    /// containing (row, col) is `(row / 3) * 3 + col / 3`.
    pub fn block(&self, block: usize) -> [u8; 9] {
        assert!(block < 9);
        let base_row = (block / 3) * 3;
        let base_col = (block % 3) * 3;
        let mut values = [0; 9];
        for (i, (row, col)) in iproduct!(0..3, 0..3).enumerate() {
            values[i] = self.get(base_row + row, base_col + col);
        }
        values
    }

    /// Iterates the coordinates of all empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        iproduct!(0..HEIGHT, 0..WIDTH).filter(move |&(row, col)| self.get(row, col) == 0)
    }

    #[inline]
    pub fn num_empty(&self) -> usize {
        self.empty_cells().count()
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.empty_cells().next().is_none()
    }

    /// The digits that can be placed at (row, col) without clashing with a
    /// value already present in the same row, column or block. This is the
    /// only legality check the solver performs; the value currently at
    /// (row, col) is not consulted.
    pub fn candidates(&self, row: usize, col: usize) -> CandidateSet {
        let block = (row / 3) * 3 + col / 3;
        let mut set = CandidateSet::all();
        for value in self
            .row(row)
            .into_iter()
            .chain(self.col(col))
            .chain(self.block(block))
        {
            set.remove(value);
        }
        set
    }

    /// True iff some row, column or block contains the same non-zero value twice.
    pub fn has_conflicts(&self) -> bool {
        (0..9).any(|i| {
            has_duplicate(self.row(i)) || has_duplicate(self.col(i)) || has_duplicate(self.block(i))
        })
    }

    /// Plain nine-row digit rendition that [Board::from_str] can read back.
    pub fn to_grid_string(&self) -> String {
        let mut out = String::with_capacity(NUM_CELLS * 2);
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                if col > 0 {
                    out.push(' ');
                }
                out.push(char::from(b'0' + self.get(row, col)));
            }
            out.push('\n');
        }
        out
    }
}

fn has_duplicate(values: [u8; 9]) -> bool {
    let mut seen = 0u16;
    for value in values {
        if value != 0 {
            let bit = 1u16 << value;
            if seen & bit != 0 {
                return true;
            }
            seen |= bit;
        }
    }
    false
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Parses a board from 81 cell characters, ignoring whitespace.
    /// `0`, `_` and `.` stand for an empty cell.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Board::new_empty();
        let mut count = 0;
        for c in s.chars().filter(|c| !c.is_whitespace()) {
            let value = match c {
                '0' | '_' | '.' => 0,
                '1'..='9' => c as u8 - b'0',
                other => return Err(ParseBoardError::InvalidCharacter(other)),
            };
            if count < NUM_CELLS {
                board.set(count / WIDTH, count % WIDTH, value);
            }
            count += 1;
        }
        if count != NUM_CELLS {
            return Err(ParseBoardError::WrongLength(count));
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    /// Boxed terminal layout, empty cells left blank.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "┏━━━━━━━┳━━━━━━━┳━━━━━━━┓")?;
        for row in 0..HEIGHT {
            if row == 3 || row == 6 {
                writeln!(f, "┣━━━━━━━╋━━━━━━━╋━━━━━━━┫")?;
            }
            for col in 0..WIDTH {
                if col % 3 == 0 {
                    write!(f, "┃ ")?;
                }
                match self.get(row, col) {
                    0 => write!(f, "  ")?,
                    value => write!(f, "{} ", value)?,
                }
            }
            writeln!(f, "┃")?;
        }
        writeln!(f, "┗━━━━━━━┻━━━━━━━┻━━━━━━━┛")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                match self.get(row, col) {
                    0 => write!(f, "_")?,
                    value => write!(f, "{}", value)?,
                }
                if col == 2 || col == 5 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let board = Board::new_empty();
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                assert_eq!(board.get(row, col), 0);
            }
        }
        assert_eq!(board.num_empty(), NUM_CELLS);
        assert!(!board.is_filled());
        assert!(!board.has_conflicts());
    }

    #[test]
    fn random_roundtrip() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0);
        let mut board = Board::new_empty();
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                board = board.with_cell(row, col, rng.gen_range(0..=9));
            }
        }

        let mut rng = StdRng::seed_from_u64(0);
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                let expected = rng.gen_range(0..=9);
                assert_eq!(expected, board.get(row, col));
            }
        }
    }

    #[test]
    #[should_panic = "assertion failed: value <= 9"]
    fn invalid_value() {
        Board::new_empty().with_cell(0, 0, 10);
    }

    #[test]
    fn with_cell_leaves_receiver_unchanged() {
        let board = Board::new_empty();
        let changed = board.with_cell(4, 7, 3);
        assert_eq!(board.get(4, 7), 0);
        assert_eq!(changed.get(4, 7), 3);
        assert_ne!(board, changed);
    }

    #[test]
    fn regions() {
        let board: Board = "
            123 456 789
            ___ ___ ___
            ___ ___ ___

            4__ ___ ___
            5__ ___ ___
            6__ ___ ___

            ___ ___ __1
            ___ ___ __2
            ___ ___ _93
        "
        .parse()
        .unwrap();
        assert_eq!(board.row(0), [1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(board.row(1), [0; 9]);
        assert_eq!(board.col(0), [1, 0, 0, 4, 5, 6, 0, 0, 0]);
        assert_eq!(board.block(0), [1, 2, 3, 0, 0, 0, 0, 0, 0]);
        assert_eq!(board.block(3), [4, 0, 0, 5, 0, 0, 6, 0, 0]);
        assert_eq!(board.block(8), [0, 0, 1, 0, 0, 2, 0, 9, 3]);
    }

    #[test]
    fn empty_cells_are_row_major() {
        let board = Board::new_empty()
            .with_cell(0, 0, 1)
            .with_cell(0, 2, 2)
            .with_cell(1, 1, 3);
        let empty: Vec<_> = board.empty_cells().take(3).collect();
        assert_eq!(empty, vec![(0, 1), (0, 3), (0, 4)]);
        assert_eq!(board.num_empty(), NUM_CELLS - 3);
    }

    #[test]
    fn candidates_exclude_row_col_and_block() {
        let board = Board::new_empty()
            .with_cell(0, 5, 1) // same row
            .with_cell(7, 0, 2) // same column
            .with_cell(1, 1, 3); // same block
        let candidates = board.candidates(0, 0);
        assert!(!candidates.contains(1));
        assert!(!candidates.contains(2));
        assert!(!candidates.contains(3));
        assert_eq!(candidates.len(), 6);
        // Recomputing on an unchanged board yields the same set.
        assert_eq!(candidates, board.candidates(0, 0));
    }

    #[test]
    fn conflict_detection() {
        assert!(Board::new_empty()
            .with_cell(0, 0, 5)
            .with_cell(0, 4, 5)
            .has_conflicts());
        assert!(Board::new_empty()
            .with_cell(1, 3, 7)
            .with_cell(8, 3, 7)
            .has_conflicts());
        assert!(Board::new_empty()
            .with_cell(0, 0, 9)
            .with_cell(2, 2, 9)
            .has_conflicts());
        assert!(!Board::new_empty()
            .with_cell(0, 0, 5)
            .with_cell(1, 4, 5)
            .has_conflicts());
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(
            "123".parse::<Board>(),
            Err(ParseBoardError::WrongLength(3))
        );
    }

    #[test]
    fn parse_rejects_invalid_characters() {
        let mut input = "0 ".repeat(80);
        input.push('x');
        assert_eq!(
            input.parse::<Board>(),
            Err(ParseBoardError::InvalidCharacter('x'))
        );
    }

    #[test]
    fn grid_string_roundtrip() {
        let board = Board::new_empty()
            .with_cell(0, 0, 1)
            .with_cell(4, 4, 5)
            .with_cell(8, 8, 9);
        let reparsed: Board = board.to_grid_string().parse().unwrap();
        assert_eq!(board, reparsed);
    }
}
