use ahash::AHashSet;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::WorldOffset;
use crate::library::Library;
use crate::node::Child;
use crate::node::Neighbours;
use crate::node::NodeId;
use crate::node::Quad;
use crate::node::Quadrant;
use crate::point::Point;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

/// Largest universe exponent. Coordinates of a `2^62` universe still fit a [`WorldOffset`].
pub const MAX_EXP: u32 = 62;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Universe exponent {exp} is outside 1..=62")]
    InvalidExponent { exp: u32 },

    #[error("Coordinate ({x}, {y}) is outside [-{half}, {half})")]
    CoordinateOutOfRange {
        x: WorldOffset,
        y: WorldOffset,
        half: WorldOffset,
    },

    #[error("Invalid rule: {0}")]
    Rule(#[from] RuleError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    /// The universe has a side length of `2^exp`
    pub exp: u32,

    /// Life rules
    pub rule: RuleSet,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            exp: 8,
            rule: RuleSet::default(),
        }
    }
}

impl SimulationConfig {
    pub fn new(exp: u32) -> Self {
        Self {
            exp,
            ..Self::default()
        }
    }

    /// Like `new`, with the rule given as a rulestring such as `B36/S23`.
    pub fn with_rule_str(exp: u32, rule: &str) -> Result<Self, SimulationError> {
        Ok(Self {
            exp,
            rule: rule.parse()?,
        })
    }
}

/// Simulates a cell grid running a Life-like rule, Conway's Game of Life by default.
///
/// Hashlife is not suited to following a pattern one generation at a time, but it is extremely
/// efficient at computing its state a power of two generations ahead. A universe of side `2^k`
/// can look up to `2^(k - 2)` generations into the future, so to see generation `2^n` use a
/// universe with `k = n + 2` or more.
///
/// Coordinates are centred: both axes range over `[-2^(k - 1), 2^(k - 1))` and `y` grows
/// northwards.
#[derive(Debug)]
pub struct Simulation {
    /// World depth: the universe has a side length of `2^exp`
    exp: u32,

    /// Every node reachable from `root` was built here
    library: Library,

    /// The universe at generation 0
    root: NodeId,
}

impl Simulation {
    /// Create an empty universe of side `2^exp`.
    ///
    /// Panics unless `1 <= exp <= MAX_EXP`, see [`Simulation::try_new`].
    pub fn new(exp: u32) -> Self {
        match Self::try_new(exp) {
            Ok(sim) => sim,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(exp: u32) -> Result<Self, SimulationError> {
        Self::with_config(SimulationConfig::new(exp))
    }

    pub fn with_config(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::with_library(config.exp, Library::with_rule(config.rule))
    }

    /// Create an empty universe on top of an existing library, so that everything it already
    /// memoized is reused. See [`Simulation::into_library`].
    pub fn with_library(exp: u32, mut library: Library) -> Result<Self, SimulationError> {
        if !(1..=MAX_EXP).contains(&exp) {
            return Err(SimulationError::InvalidExponent { exp });
        }

        let root = library.empty(exp as u8);
        debug!(exp, rule = ?library.rule(), "new universe");

        Ok(Self { exp, library, root })
    }

    /// Give up the universe, keeping the library for another simulation.
    pub fn into_library(self) -> Library {
        self.library
    }

    /// Side length of the universe.
    pub fn size(&self) -> u64 {
        1 << self.exp
    }

    pub fn level(&self) -> u8 {
        self.exp as u8
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Live cells at generation 0.
    pub fn population(&self) -> u128 {
        self.library.node(self.root).population()
    }

    fn half(&self) -> WorldOffset {
        1 << (self.exp - 1)
    }

    fn contains(&self, x: WorldOffset, y: WorldOffset) -> bool {
        let h = self.half();

        (-h..h).contains(&x) && (-h..h).contains(&y)
    }

    /// Bring cell `(x, y)` to life. Coordinates outside the universe are ignored.
    pub fn set(&mut self, x: WorldOffset, y: WorldOffset) {
        if let Err(e) = self.try_set(x, y) {
            debug!("{}, ignoring", e);
        }
    }

    /// Like `set`, but reports coordinates outside the universe.
    pub fn try_set(&mut self, x: WorldOffset, y: WorldOffset) -> Result<(), SimulationError> {
        if !self.contains(x, y) {
            return Err(SimulationError::CoordinateOutOfRange {
                x,
                y,
                half: self.half(),
            });
        }

        // Nodes are immutable, so every ancestor of the cell is rebuilt, bottom up. Quadrants off
        // the path are reused as they are.
        let mut replacement = Child::Cell(true);

        for (parent, quadrant) in self.trace_to_base(x, y).into_iter().rev() {
            let mut quads = self.library.node(parent).quadrants();
            quads[quadrant.index()] = replacement;

            let [nw, ne, sw, se] = quads;
            replacement = Child::Node(self.library.get(nw, ne, sw, se));
        }

        let Child::Node(root) = replacement else {
            unreachable!("The root is never a cell")
        };

        debug!(x, y, ?root, "replaced root");
        self.root = root;

        Ok(())
    }

    /// Whether cell `(x, y)` is alive at generation 0. Cells outside the universe are dead.
    pub fn is_alive(&self, x: WorldOffset, y: WorldOffset) -> bool {
        if !self.contains(x, y) {
            return false;
        }

        let trace = self.trace_to_base(x, y);
        let Some(&(base, quadrant)) = trace.last() else {
            unreachable!("The root is never a cell")
        };

        self.library.node(base).child(quadrant) == Child::Cell(true)
    }

    /// Walk from the root down to the level 1 node holding `(x, y)`, recording each node visited
    /// and the quadrant taken out of it.
    fn trace_to_base(&self, mut x: WorldOffset, mut y: WorldOffset) -> Vec<(NodeId, Quadrant)> {
        let mut trace = Vec::with_capacity(self.exp as usize);
        let mut id = self.root;

        loop {
            let node = self.library.node(id);
            let quadrant = Quadrant::containing(x, y);
            trace.push((id, quadrant));

            let Child::Node(child) = node.child(quadrant) else {
                break;
            };

            // re-centre on the child
            let h = (node.size() / 4) as WorldOffset;
            let (dx, dy) = quadrant.direction();
            x -= dx * h;
            y -= dy * h;

            id = child;
        }

        trace
    }

    /// Live cells at generation `2^exp`, or at generation 0 if `exp` is negative.
    ///
    /// Only the centre of the universe is known that far ahead: cells within `2^exp` of the
    /// border are not reported. The stored universe is left at generation 0.
    pub fn get(&mut self, exp: i32) -> Vec<Point> {
        let t = match u32::try_from(exp) {
            Ok(exp) => 1u64.checked_shl(exp).unwrap_or(u64::MAX),
            Err(_) => 0,
        };

        if exp > self.exp as i32 - 2 {
            warn!(exp, universe = self.exp, "generation is past the universe's horizon");
        }

        let mut living = Vec::new();
        self.collect(t, self.root, 0, 0, &mut living);

        // sub-results overlap, so the same cell can be reported more than once
        let mut seen = AHashSet::with_capacity(living.len());
        living.retain(|p| seen.insert(*p));

        debug!(
            generation = t,
            cells = living.len(),
            nodes = self.library.size(),
            "query"
        );

        living
    }

    /// Push the live cells of node `id`, centred on `(tx, ty)`, `t` generations ahead.
    fn collect(
        &mut self,
        t: u64,
        id: NodeId,
        tx: WorldOffset,
        ty: WorldOffset,
        living: &mut Vec<Point>,
    ) {
        let node = self.library.node(id);
        if node.is_empty() {
            return;
        }

        let step = node.step_size();

        match node.quad() {
            Quad::Leaf([nw, ne, sw, se]) => {
                let cells = [(nw, -1, 0), (ne, 0, 0), (sw, -1, -1), (se, 0, -1)];

                for (alive, dx, dy) in cells {
                    if alive {
                        living.push(Point::new(tx + dx, ty + dy));
                    }
                }
            }
            Quad::Branch(_) if t >= step => {
                let future = self.library.future(id);

                self.collect(t - step, future, tx, ty, living);
            }
            Quad::Branch([nw, ne, sw, se]) => {
                let h = step as WorldOffset;

                if t > 0 {
                    let Neighbours { n, s, e, w, c } = self.library.neighbours(id);

                    self.collect(t, n, tx, ty + h, living);
                    self.collect(t, s, tx, ty - h, living);
                    self.collect(t, e, tx + h, ty, living);
                    self.collect(t, w, tx - h, ty, living);
                    self.collect(t, c, tx, ty, living);
                }

                self.collect(t, nw, tx - h, ty + h, living);
                self.collect(t, ne, tx + h, ty + h, living);
                self.collect(t, sw, tx - h, ty - h, living);
                self.collect(t, se, tx + h, ty - h, living);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sorted(mut points: Vec<Point>) -> Vec<Point> {
        points.sort();
        points
    }

    #[test]
    fn new_universe_is_empty() {
        let mut sim = Simulation::new(4);

        assert_eq!(sim.size(), 16);
        assert_eq!(sim.level(), 4);
        assert_eq!(sim.population(), 0);
        assert!(sim.get(-1).is_empty());
        assert!(sim.get(2).is_empty());
    }

    #[test]
    fn set_then_read() {
        let mut sim = Simulation::new(3);

        sim.set(0, 0);
        sim.set(-4, -4);
        sim.set(3, 3);
        sim.set(-1, 2);

        let want = vec![
            Point::new(-4, -4),
            Point::new(-1, 2),
            Point::new(0, 0),
            Point::new(3, 3),
        ];

        assert_eq!(sorted(sim.get(-1)), want);
        assert_eq!(sorted(sim.get(i32::MIN)), want);
        assert_eq!(sim.population(), 4);
        assert!(sim.is_alive(-1, 2));
        assert!(!sim.is_alive(2, -1));
    }

    #[test]
    fn set_twice_is_idempotent() {
        let mut sim = Simulation::new(3);

        sim.set(1, 1);
        let root = sim.root();
        sim.set(1, 1);

        assert_eq!(sim.root(), root);
        assert_eq!(sim.population(), 1);
    }

    #[test]
    fn out_of_range() {
        let mut sim = Simulation::new(3);
        sim.set(0, 0);
        let root = sim.root();

        for (x, y) in [(4, 0), (0, 4), (-5, 0), (0, -5), (100, -100)] {
            sim.set(x, y);
            assert!(!sim.is_alive(x, y));
        }

        assert_eq!(sim.root(), root);
        assert_eq!(
            sim.try_set(4, 0),
            Err(SimulationError::CoordinateOutOfRange { x: 4, y: 0, half: 4 })
        );
    }

    #[test]
    fn invalid_exponent() {
        assert_eq!(
            Simulation::try_new(0).unwrap_err(),
            SimulationError::InvalidExponent { exp: 0 }
        );
        assert!(Simulation::try_new(MAX_EXP + 1).is_err());
        assert!(Simulation::try_new(MAX_EXP).is_ok());
    }

    #[test]
    fn set_on_huge_universe() {
        let mut sim = Simulation::new(MAX_EXP);
        let h = 1 << (MAX_EXP - 1);

        sim.set(-h, h - 1);
        sim.set(h - 1, -h);

        assert!(sim.is_alive(-h, h - 1));
        assert!(sim.is_alive(h - 1, -h));
        assert_eq!(
            sorted(sim.get(-1)),
            vec![Point::new(-h, h - 1), Point::new(h - 1, -h)]
        );
    }

    #[test]
    fn rule_from_config() {
        let config = SimulationConfig::with_rule_str(5, "B36/S23").unwrap();
        let sim = Simulation::with_config(config).unwrap();

        assert_eq!(sim.library().rule(), RuleSet::new(0b100_1000, 0b1100));
        assert_eq!(
            SimulationConfig::with_rule_str(5, "B9/S23"),
            Err(SimulationError::Rule(RuleError::InvalidDigit { got: '9' }))
        );
    }
}
