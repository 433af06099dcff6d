pub mod destination;
pub mod edge;
pub mod query;

pub use destination::{Destination, Direction};
pub use edge::{AdjacencyEntry, ClosureEdge};
pub use query::{ChildPick, FindRequest, NodeQuery, Pick, Scope};
