use thiserror::Error;

use crate::library::Library;
use crate::library::MAX_LEVEL;
use crate::node::NodeId;
use crate::node::Quad;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArrayError {
    #[error("An array of {len} cells is not a square")]
    NotSquare { len: usize },

    #[error("Side length {side} is not a power of two")]
    NotPowerOfTwo { side: usize },

    #[error("Side length {side} is too small, nodes are at least 2x2")]
    TooSmall { side: usize },
}

impl Library {
    /// Build a node from a flat, row-major square of cells. Row 0 is the northern row and any
    /// non-zero value is a live cell.
    pub fn from_array(&mut self, cells: &[u8]) -> Result<NodeId, ArrayError> {
        let side = cells.len().isqrt();
        if side * side != cells.len() {
            return Err(ArrayError::NotSquare { len: cells.len() });
        }

        if side < 2 {
            return Err(ArrayError::TooSmall { side });
        }

        if !side.is_power_of_two() || side.trailing_zeros() > MAX_LEVEL as u32 {
            return Err(ArrayError::NotPowerOfTwo { side });
        }

        Ok(self.from_rows(cells, side, 0, 0, side))
    }

    /// Build the node covering the `size` square whose north-west corner is `(row, col)`.
    fn from_rows(&mut self, cells: &[u8], side: usize, row: usize, col: usize, size: usize) -> NodeId {
        if size == 2 {
            let at = |r: usize, c: usize| cells[(row + r) * side + col + c] != 0;

            return self.leaf([at(0, 0), at(0, 1), at(1, 0), at(1, 1)]);
        }

        let h = size / 2;

        let nw = self.from_rows(cells, side, row, col, h);
        let ne = self.from_rows(cells, side, row, col + h, h);
        let sw = self.from_rows(cells, side, row + h, col, h);
        let se = self.from_rows(cells, side, row + h, col + h, h);

        self.branch([nw, ne, sw, se])
    }

    /// Flatten a node back into a row-major square of `0`s and `1`s, northern row first.
    pub fn to_array(&self, id: NodeId) -> Vec<u8> {
        let side = self.node(id).size() as usize;
        let mut cells = vec![0; side * side];

        self.to_rows(id, &mut cells, side, 0, 0);

        cells
    }

    fn to_rows(&self, id: NodeId, cells: &mut [u8], side: usize, row: usize, col: usize) {
        let node = self.node(id);
        if node.is_empty() {
            return;
        }

        match node.quad() {
            Quad::Leaf([nw, ne, sw, se]) => {
                cells[row * side + col] = nw as u8;
                cells[row * side + col + 1] = ne as u8;
                cells[(row + 1) * side + col] = sw as u8;
                cells[(row + 1) * side + col + 1] = se as u8;
            }
            Quad::Branch([nw, ne, sw, se]) => {
                let h = node.size() as usize / 2;

                self.to_rows(nw, cells, side, row, col);
                self.to_rows(ne, cells, side, row, col + h);
                self.to_rows(sw, cells, side, row + h, col);
                self.to_rows(se, cells, side, row + h, col + h);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::ArrayError;
    use crate::library::Library;

    #[rustfmt::skip]
    const GLIDER: [u8; 16] = [
        0, 1, 0, 0,
        0, 0, 1, 0,
        1, 1, 1, 0,
        0, 0, 0, 0,
    ];

    #[test]
    fn round_trip() {
        let mut lib = Library::new();

        let node = lib.from_array(&GLIDER).unwrap();

        assert_eq!(lib.node(node).level(), 2);
        assert_eq!(lib.node(node).population(), 5);
        assert_eq!(lib.to_array(node), GLIDER);
        assert_eq!(lib.from_array(&lib.to_array(node)), Ok(node));
    }

    #[test]
    fn quadrants_follow_rows() {
        let mut lib = Library::new();

        let node = lib.from_array(&GLIDER).unwrap();
        let [nw, ne, sw, se] = lib.node(node).children().unwrap();

        assert_eq!(lib.node(nw).cells(), Some([false, true, false, false]));
        assert_eq!(lib.node(ne).cells(), Some([false, false, true, false]));
        assert_eq!(lib.node(sw).cells(), Some([true, true, false, false]));
        assert_eq!(lib.node(se).cells(), Some([true, false, false, false]));
    }

    #[test]
    fn rejects_bad_shapes() {
        let mut lib = Library::new();

        assert_eq!(lib.from_array(&[0; 5]), Err(ArrayError::NotSquare { len: 5 }));
        assert_eq!(lib.from_array(&[1]), Err(ArrayError::TooSmall { side: 1 }));
        assert_eq!(lib.from_array(&[]), Err(ArrayError::TooSmall { side: 0 }));
        assert_eq!(lib.from_array(&[0; 36]), Err(ArrayError::NotPowerOfTwo { side: 6 }));
    }
}
