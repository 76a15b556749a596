pub mod array;
pub mod future;
pub mod library;
pub mod node;
pub mod point;
pub mod rule_set;
pub mod simulation;

pub use array::ArrayError;
pub use library::Library;
pub use node::Child;
pub use node::Node;
pub use node::NodeId;
pub use point::Point;
pub use rule_set::B3S23;
pub use rule_set::RuleSet;
pub use simulation::Simulation;
pub use simulation::SimulationConfig;
pub use simulation::SimulationError;

pub type WorldOffset = i64;
