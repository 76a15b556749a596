use std::fmt::Debug;

/// Handle of a [`Node`] inside the [`Library`](crate::library::Library) that created it.
///
/// Ids are handed out sequentially, so a handle doubles as the node's stable id
/// and as its index in the library's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the four quadrants of a node. `y` grows northwards, so the north
/// quadrants hold the non-negative `y` half.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Quadrant {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::Nw, Quadrant::Ne, Quadrant::Sw, Quadrant::Se];

    /// Position of this quadrant in a `[nw, ne, sw, se]` array.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The quadrant containing `(x, y)`, relative to the centre of a node.
    pub const fn containing(x: i64, y: i64) -> Self {
        match (x < 0, y < 0) {
            (true, false) => Quadrant::Nw,
            (false, false) => Quadrant::Ne,
            (true, true) => Quadrant::Sw,
            (false, true) => Quadrant::Se,
        }
    }

    /// Direction of this quadrant's centre from its parent's centre, as `(dx, dy)` signs.
    pub const fn direction(self) -> (i64, i64) {
        match self {
            Quadrant::Nw => (-1, 1),
            Quadrant::Ne => (1, 1),
            Quadrant::Sw => (-1, -1),
            Quadrant::Se => (1, -1),
        }
    }
}

/// The four children of a node, in `[nw, ne, sw, se]` order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Quad {
    /// A level 1 node: four raw cells.
    Leaf([bool; 4]),

    /// A level `n > 1` node: four nodes of level `n - 1`.
    Branch([NodeId; 4]),
}

/// Something that can fill a quadrant: a raw cell at level 1, a node above.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Child {
    Cell(bool),
    Node(NodeId),
}

impl From<bool> for Child {
    fn from(alive: bool) -> Self {
        Child::Cell(alive)
    }
}

impl From<NodeId> for Child {
    fn from(id: NodeId) -> Self {
        Child::Node(id)
    }
}

/// The five half-shifted nodes of a node of level `n > 1`, each of level `n - 1`.
///
/// ```notrust
///  +----+----+
///  |  n n    |
///  |w  c c  e|
///  |w  c c  e|
///  |  s s    |
///  +----+----+
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Neighbours {
    pub n: NodeId,
    pub s: NodeId,
    pub e: NodeId,
    pub w: NodeId,
    pub c: NodeId,
}

/// A macro-cell: an immutable square region of side `2^level`.
///
/// Nodes are only ever created by a [`Library`](crate::library::Library), which
/// guarantees that two nodes with the same children are the same node.
#[derive(Clone)]
pub struct Node {
    id: NodeId,
    level: u8,
    population: u128,
    quad: Quad,

    /// Write-once. Filled the first time the library needs the half-shifted nodes.
    pub(crate) neighbours: Option<Neighbours>,

    /// Write-once. The centre of this node, `step_size()` generations ahead.
    pub(crate) result: Option<NodeId>,
}

impl Node {
    pub(crate) fn leaf(id: NodeId, cells: [bool; 4]) -> Self {
        Self {
            id,
            level: 1,
            population: cells.iter().filter(|&&alive| alive).count() as u128,
            quad: Quad::Leaf(cells),
            neighbours: None,
            result: None,
        }
    }

    pub(crate) fn branch(id: NodeId, level: u8, population: u128, children: [NodeId; 4]) -> Self {
        debug_assert!(level > 1);

        Self {
            id,
            level,
            population,
            quad: Quad::Branch(children),
            neighbours: None,
            result: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Side length, `2^level`.
    pub fn size(&self) -> u64 {
        1 << self.level
    }

    /// Number of generations [`Library::future`](crate::library::Library::future)
    /// advances this node by, `2^(level - 2)`. Level 1 nodes have no future and
    /// a step size of 0.
    pub fn step_size(&self) -> u64 {
        match self.level {
            0 | 1 => 0,
            level => 1 << (level - 2),
        }
    }

    pub fn population(&self) -> u128 {
        self.population
    }

    pub fn is_empty(&self) -> bool {
        self.population == 0
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.quad, Quad::Leaf(_))
    }

    pub fn quad(&self) -> Quad {
        self.quad
    }

    /// Children of a node above level 1.
    pub fn children(&self) -> Option<[NodeId; 4]> {
        match self.quad {
            Quad::Leaf(_) => None,
            Quad::Branch(children) => Some(children),
        }
    }

    /// Cells of a level 1 node.
    pub fn cells(&self) -> Option<[bool; 4]> {
        match self.quad {
            Quad::Leaf(cells) => Some(cells),
            Quad::Branch(_) => None,
        }
    }

    pub fn child(&self, quadrant: Quadrant) -> Child {
        match self.quad {
            Quad::Leaf(cells) => Child::Cell(cells[quadrant.index()]),
            Quad::Branch(children) => Child::Node(children[quadrant.index()]),
        }
    }

    /// The four children as [`Child`]ren, in `[nw, ne, sw, se]` order.
    pub fn quadrants(&self) -> [Child; 4] {
        Quadrant::ALL.map(|q| self.child(q))
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.quad {
            Quad::Leaf([nw, ne, sw, se]) => {
                let g = |alive: bool| -> u8 { alive as u8 };

                write!(
                    f,
                    "{:?} L1 [nw: {}, ne: {}, sw: {}, se: {}]",
                    self.id,
                    g(nw),
                    g(ne),
                    g(sw),
                    g(se)
                )
            }
            Quad::Branch([nw, ne, sw, se]) => write!(
                f,
                "{:?} L{} pop {} [nw: {:?}, ne: {:?}, sw: {:?}, se: {:?}]",
                self.id, self.level, self.population, nw, ne, sw, se
            ),
        }
    }
}
