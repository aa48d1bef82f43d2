use bitvec::prelude::*;

const NUM_DIGITS: usize = 9;

/// The set of digits 1..=9 that may legally be placed in a single cell.
/// Bit `i` represents the digit `i + 1`.
///
/// The backing `BitArr!` rounds up to a whole storage element, so every
/// operation below stays within the first `NUM_DIGITS` bits; the padding
/// bits must never be read or written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateSet {
    bits: BitArr!(for NUM_DIGITS),
}

impl CandidateSet {
    #[inline]
    pub fn all() -> Self {
        let mut bits = bitarr![0; NUM_DIGITS];
        bits[..NUM_DIGITS].fill(true);
        Self { bits }
    }

    /// Removes `digit` from the set. A `0` (empty cell marker) is ignored so
    /// that whole board regions can be fed through unchanged.
    #[inline]
    pub fn remove(&mut self, digit: u8) {
        if digit != 0 {
            assert!(digit <= 9);
            self.bits.set(usize::from(digit) - 1, false);
        }
    }

    #[inline]
    pub fn contains(&self, digit: u8) -> bool {
        (1..=9).contains(&digit) && self.bits[usize::from(digit) - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits[..NUM_DIGITS].count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the candidate digits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.bits[..NUM_DIGITS]
            .iter_ones()
            .map(|index| index as u8 + 1)
    }
}
