use ahash::AHashMap;
use tracing::trace;

use crate::node::Child;
use crate::node::Neighbours;
use crate::node::Node;
use crate::node::NodeId;
use crate::rule_set::RuleSet;

/// Deepest node a library will build. Side lengths must fit in a `u64`.
pub const MAX_LEVEL: u8 = 63;

/// Structural identity of a node: what its four children are.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeKey {
    /// Four cells packed as `nw << 3 | ne << 2 | sw << 1 | se`.
    Leaf(u8),

    /// Ids of the four children.
    Branch([NodeId; 4]),
}

impl NodeKey {
    fn leaf([nw, ne, sw, se]: [bool; 4]) -> Self {
        NodeKey::Leaf((nw as u8) << 3 | (ne as u8) << 2 | (sw as u8) << 1 | se as u8)
    }
}

/// The hashlife algorithm takes advantage of redundancy in a pattern by reusing nodes. Every node
/// is requested from the library, which hands back the existing instance whenever one with the
/// same children was already built.
///
/// Nodes live in an arena and refer to each other through [`NodeId`]s. Nothing is ever evicted.
pub struct Library {
    /// This is where all of our memory goes
    nodes: Vec<Node>,

    /// Maps the children of every node ever built to that node
    map: AHashMap<NodeKey, NodeId>,

    rule: RuleSet,

    /// Indexing into this array with a packed 4x4 block yields its next generation.
    pub(crate) rules: Vec<u16>,
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("rule", &self.rule)
            .field("size", &self.size())
            .finish()
    }
}

impl Library {
    /// Create an empty library running Conway's Game of Life.
    pub fn new() -> Self {
        Self::with_rule(RuleSet::default())
    }

    /// Create an empty library for the given rule. Memoized futures depend on the rule, so it
    /// cannot change afterwards.
    pub fn with_rule(rule: RuleSet) -> Self {
        Self {
            nodes: Vec::new(),
            map: AHashMap::new(),
            rule,
            rules: rule.compute_rules(),
        }
    }

    pub fn rule(&self) -> RuleSet {
        self.rule
    }

    /// Number of distinct nodes created so far. Never decreases.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node.
    ///
    /// Panics if `id` was not created by this library.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Every node built so far, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Return the canonical node for the given children, creating it if needed.
    ///
    /// All four children are either cells or nodes of the same level. Anything else is a caller
    /// bug.
    pub fn get(&mut self, nw: Child, ne: Child, sw: Child, se: Child) -> NodeId {
        match (nw, ne, sw, se) {
            (Child::Cell(nw), Child::Cell(ne), Child::Cell(sw), Child::Cell(se)) => {
                self.leaf([nw, ne, sw, se])
            }
            (Child::Node(nw), Child::Node(ne), Child::Node(sw), Child::Node(se)) => {
                self.branch([nw, ne, sw, se])
            }
            quad => panic!("Cannot mix cells and nodes in one quad: {:?}", quad),
        }
    }

    /// Canonical level 1 node for four cells, in `[nw, ne, sw, se]` order.
    pub fn leaf(&mut self, cells: [bool; 4]) -> NodeId {
        let key = NodeKey::leaf(cells);

        self.intern(key, |id| Node::leaf(id, cells))
    }

    /// Canonical node for four nodes of equal level, in `[nw, ne, sw, se]` order.
    pub fn branch(&mut self, children: [NodeId; 4]) -> NodeId {
        let key = NodeKey::Branch(children);
        if let Some(&id) = self.map.get(&key) {
            return id;
        }

        let [nw, ne, sw, se] = children.map(|c| {
            let node = self.node(c);
            (node.level(), node.population())
        });
        debug_assert!(
            nw.0 == ne.0 && nw.0 == sw.0 && nw.0 == se.0,
            "Children of unequal level: {:?}",
            children
        );

        let level = nw.0 + 1;
        assert!(level <= MAX_LEVEL, "Node level {} is too deep", level);

        let population = nw.1 + ne.1 + sw.1 + se.1;

        self.intern(key, |id| Node::branch(id, level, population, children))
    }

    /// The canonical all-dead node of `level`, built by repeated self-doubling.
    pub fn empty(&mut self, level: u8) -> NodeId {
        assert!(level >= 1, "There are no nodes below level 1");

        let mut node = self.leaf([false; 4]);
        for _ in 1..level {
            node = self.branch([node; 4]);
        }

        node
    }

    /// The five half-shifted nodes of a node above level 1, computed on first use.
    pub fn neighbours(&mut self, id: NodeId) -> Neighbours {
        if let Some(neighbours) = self.node(id).neighbours {
            return neighbours;
        }

        let Some(children) = self.node(id).children() else {
            panic!("Level 1 node {:?} has no neighbours", id)
        };

        // the outer corner grandchildren never take part
        let [
            [_, nw_ne, nw_sw, nw_se],
            [ne_nw, _, ne_sw, ne_se],
            [sw_nw, sw_ne, _, sw_se],
            [se_nw, se_ne, se_sw, _],
        ] = children.map(|c| self.node(c).quadrants());

        let neighbours = Neighbours {
            n: self.get(nw_ne, ne_nw, nw_se, ne_sw),
            s: self.get(sw_ne, se_nw, sw_se, se_sw),
            w: self.get(nw_sw, nw_se, sw_nw, sw_ne),
            e: self.get(ne_sw, ne_se, se_nw, se_ne),
            c: self.get(nw_se, ne_sw, sw_ne, se_nw),
        };

        self.node_mut(id).neighbours = Some(neighbours);

        neighbours
    }

    fn intern<F>(&mut self, key: NodeKey, build: F) -> NodeId
    where
        F: FnOnce(NodeId) -> Node,
    {
        if let Some(&id) = self.map.get(&key) {
            return id;
        }

        assert!(self.nodes.len() < u32::MAX as usize, "Out of memory!");

        let id = NodeId(self.nodes.len() as u32);
        let node = build(id);
        trace!(?id, level = node.level(), population = %node.population(), "new node");

        self.nodes.push(node);
        self.map.insert(key, id);

        id
    }
}
