pub mod edge_builder;
pub mod import;
pub mod order_ops;
pub mod reparent;

pub use edge_builder::insert_node;
pub use import::{export_adjacency, plan_rows, rebuild};
pub use order_ops::move_node;
pub use reparent::reparent;
