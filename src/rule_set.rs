use std::str::FromStr;

use thiserror::Error;

/// Moore neighbourhood of the cell at bit 5 of a packed 4x4 block.
const NBHD_MASK: u16 = 0b0000_0111_0101_0111;
const CELL_MASK: u16 = 0b0000_0000_0010_0000;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
/// b36s23:               0000_0000_0100_1000_0000_0000_0000_1100
/// ```
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = |mask: u16| -> String {
            (0u8..=8)
                .filter(|&i| mask & (1u16 << i) != 0)
                .map(|i| char::from(b'0' + i))
                .collect()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// Next state of a single cell with `neighbours` live Moore neighbours.
    pub fn step_cell(&self, alive: bool, neighbours: u32) -> bool {
        let mask = if alive {
            self.survivals()
        } else {
            self.births()
        };

        mask & (1 << neighbours) != 0
    }

    /// Compute game rules for the current `RuleSet`.
    ///
    /// More specifically, this returns the next state of every possible 4x4
    /// block, each stored using the bits of a `u16` (bit `row * 4 + col`, row 0
    /// being the northern row). Only the four centre cells of a result are
    /// meaningful: they sit on bits 5, 6, 9 and 10.
    ///
    /// The table is built in a way that indexing into it with a block returns
    /// the result of that block.
    pub fn compute_rules(&self) -> Vec<u16> {
        let mut rules = vec![0; (u16::MAX as usize) + 1];

        for block in 0..=u16::MAX {
            rules[block as usize] = self.next(block);
        }

        rules
    }

    fn next(&self, block: u16) -> u16 {
        let mut res: u16 = 0;

        // centre cells: (1, 1), (1, 2), (2, 1), (2, 2)
        let shifts = [0, 1, 4, 5];

        for shift in shifts {
            let nbhd_mask = NBHD_MASK << shift;
            let cell_mask = CELL_MASK << shift;

            let alive = block & cell_mask != 0;
            let neighbours = (block & nbhd_mask).count_ones();

            if self.step_cell(alive, neighbours) {
                res |= cell_mask;
            }
        }

        res
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Empty rulestring")]
    Empty,

    #[error("Invalid neighbour count '{got}', expected a digit in 0..=8")]
    InvalidDigit { got: char },

    #[error("Expected '/' between births and survivals")]
    MissingSeparator,

    #[error("Rules with birth on 0 neighbours are not supported")]
    BirthOnZero,
}

/// Parses `B3/S23`, `b3s23` and the nameless `3/23` form of RLE `#r` lines.
impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RuleError::Empty);
        }

        let (b, s) = match s.strip_prefix(['b', 'B']) {
            Some(rest) => {
                let Some(i) = rest.find(['s', 'S']) else {
                    return Err(RuleError::MissingSeparator);
                };

                let b = rest[..i].strip_suffix('/').unwrap_or(&rest[..i]);
                (b, &rest[i + 1..])
            }
            None => s.split_once('/').ok_or(RuleError::MissingSeparator)?,
        };

        let b = digits_to_mask(b)?;
        let s = digits_to_mask(s)?;

        if b & 1 != 0 {
            return Err(RuleError::BirthOnZero);
        }

        Ok(RuleSet::new(b, s))
    }
}

/// Convert the human readable birth/survival digits to a packed bit representation
fn digits_to_mask(digits: &str) -> Result<u16, RuleError> {
    let mut n = 0;

    for c in digits.chars() {
        match c.to_digit(10) {
            Some(d) if d <= 8 => n |= 1 << d,
            _ => return Err(RuleError::InvalidDigit { got: c }),
        }
    }

    Ok(n)
}
