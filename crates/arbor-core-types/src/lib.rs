//! Core types shared across arbor facilities
//!
//! This crate provides foundational types used by the engine, the error
//! facility and the logging facility:
//!
//! - **Node identity**: [`NodeId`], the host's opaque primary key
//! - **Schema constants**: Canonical field keys and event names

pub mod node_id;
pub mod schema;

pub use node_id::NodeId;
