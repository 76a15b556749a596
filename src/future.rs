use crate::library::Library;
use crate::node::Neighbours;
use crate::node::NodeId;
use crate::node::Quad;
use crate::node::Quadrant;

/// Bits of the four centre cells of a packed 4x4 block, in `[nw, ne, sw, se]` order.
const CENTRE_BITS: [u16; 4] = [5, 6, 9, 10];

impl Library {
    /// The result of a node: its centre, `step_size()` generations into the future.
    ///
    /// The result of a `2^n` node is a `2^(n - 1)` node. It is computed once and cached, so
    /// calling this again returns the same id.
    ///
    /// Panics on a level 1 node, which has no future.
    pub fn future(&mut self, id: NodeId) -> NodeId {
        let node = self.node(id);
        if let Some(result) = node.result {
            return result;
        }

        let Quad::Branch(children) = node.quad() else {
            panic!("Level 1 node {:?} has no future", id)
        };

        let result = match (node.population(), node.level()) {
            // the nw child of a 4x4 block is a cell, not a 2x2 node
            (0, 2) => self.leaf([false; 4]),
            (0, _) => children[Quadrant::Nw.index()],
            (_, 2) => self.base_case(children),
            (_, _) => self.recursive_case(id, children),
        };

        self.node_mut(id).result = Some(result);

        result
    }

    /// A 4x4 block, stepped once by looking up the rule table.
    ///
    ///   nw.nw nw.ne | ne.nw ne.ne
    ///   nw.sw nw.se | ne.sw ne.se
    ///   ------------+------------
    ///   sw.nw sw.ne | se.nw se.ne
    ///   sw.sw sw.se | se.sw se.se
    ///
    fn base_case(&mut self, children: [NodeId; 4]) -> NodeId {
        let mut block: u16 = 0;

        for (quadrant, child) in Quadrant::ALL.into_iter().zip(children) {
            let Some(cells) = self.node(child).cells() else {
                unreachable!("The children of a level 2 node are leaves")
            };

            let (row, col) = match quadrant {
                Quadrant::Nw => (0, 0),
                Quadrant::Ne => (0, 2),
                Quadrant::Sw => (2, 0),
                Quadrant::Se => (2, 2),
            };

            for (i, alive) in cells.into_iter().enumerate() {
                if alive {
                    block |= 1 << ((row + i / 2) * 4 + col + i % 2);
                }
            }
        }

        let next = self.rules[block as usize];

        self.leaf(CENTRE_BITS.map(|bit| next & (1 << bit) != 0))
    }

    /// Advance a level `n > 2` node twice by `2^(n - 3)` generations.
    ///
    ///   n00 n01 n02
    ///   n10 n11 n12
    ///   n20 n21 n22
    ///
    /// First the nine overlapping `n - 1` nodes are stepped, then the four `n - 1` nodes
    /// composed out of those results are stepped again.
    fn recursive_case(&mut self, id: NodeId, [nw, ne, sw, se]: [NodeId; 4]) -> NodeId {
        let Neighbours { n, s, e, w, c } = self.neighbours(id);

        let [n00, n01, n02, n10, n11, n12, n20, n21, n22] =
            [nw, n, ne, w, c, e, sw, s, se].map(|node| self.future(node));

        let nw = self.branch([n00, n01, n10, n11]);
        let ne = self.branch([n01, n02, n11, n12]);
        let sw = self.branch([n10, n11, n20, n21]);
        let se = self.branch([n11, n12, n21, n22]);

        let quad = [nw, ne, sw, se].map(|node| self.future(node));

        self.branch(quad)
    }
}

#[cfg(test)]
mod test {
    use crate::library::Library;

    #[test]
    fn block_is_still() {
        let mut lib = Library::new();

        let off = lib.leaf([false; 4]);
        let nw = lib.leaf([false, false, false, true]);
        let ne = lib.leaf([false, false, true, false]);
        let sw = lib.leaf([false, true, false, false]);
        let se = lib.leaf([true, false, false, false]);
        let block = lib.branch([nw, ne, sw, se]);

        let on = lib.leaf([true; 4]);
        assert_eq!(lib.future(block), on);

        // a block centred in an 8x8 node
        let nw = lib.branch([off, off, off, nw]);
        let ne = lib.branch([off, off, ne, off]);
        let sw = lib.branch([off, sw, off, off]);
        let se = lib.branch([se, off, off, off]);
        let node = lib.branch([nw, ne, sw, se]);

        assert_eq!(lib.future(node), block);
    }

    #[test]
    fn lonely_cell_dies() {
        let mut lib = Library::new();

        let nw = lib.leaf([false, false, false, true]);
        let off = lib.leaf([false; 4]);
        let node = lib.branch([nw, off, off, off]);

        assert_eq!(lib.future(node), off);
    }

    #[test]
    fn blinker_flips() {
        let mut lib = Library::new();

        // horizontal bar across the second row of a 4x4 block
        let nw = lib.leaf([false, false, true, true]);
        let ne = lib.leaf([false, false, true, false]);
        let off = lib.leaf([false; 4]);
        let node = lib.branch([nw, ne, off, off]);

        let next = lib.future(node);

        // (1, 1) survives, (1, 2) dies, (2, 1) is born, (2, 2) stays dead
        assert_eq!(lib.node(next).cells(), Some([true, false, true, false]));
    }

    #[test]
    fn empty_future_is_nw() {
        let mut lib = Library::new();

        let e4 = lib.empty(4);
        let e3 = lib.empty(3);
        let e2 = lib.empty(2);
        let e1 = lib.empty(1);

        assert_eq!(lib.future(e4), e3);
        assert_eq!(lib.future(e3), e2);
        assert_eq!(lib.future(e2), e1);
    }

    #[test]
    fn future_is_memoized() {
        let mut lib = Library::new();

        let nw = lib.leaf([true, false, true, true]);
        let ne = lib.leaf([false, true, true, false]);
        let sw = lib.leaf([true, true, false, false]);
        let se = lib.leaf([false, false, true, true]);
        let a = lib.branch([nw, ne, sw, se]);
        let b = lib.branch([se, sw, ne, nw]);
        let node = lib.branch([a, b, b, a]);

        let first = lib.future(node);
        let size = lib.size();
        let second = lib.future(node);

        assert_eq!(first, second);
        assert_eq!(lib.size(), size);
        assert_eq!(lib.node(first).level(), 2);
    }

    #[test]
    #[should_panic]
    fn leaf_has_no_future() {
        let mut lib = Library::new();

        let leaf = lib.leaf([true; 4]);
        lib.future(leaf);
    }
}
