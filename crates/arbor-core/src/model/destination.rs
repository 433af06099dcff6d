//! Move destinations and sibling directions

use std::str::FromStr;

use arbor_core_types::NodeId;

use crate::errors::ArborError;

/// Where a node lands among its siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// One rank earlier
    Up,
    /// One rank later
    Down,
    /// Rank 1
    Top,
    /// Last rank
    Bottom,
    /// Absolute 1-based rank
    To(u32),
    /// Immediately before a sibling
    Before(NodeId),
    /// Immediately after a sibling
    After(NodeId),
}

impl FromStr for Destination {
    type Err = ArborError;

    /// Parses the keyword destinations; positional and relative ones are
    /// built directly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Destination::Up),
            "down" => Ok(Destination::Down),
            "top" => Ok(Destination::Top),
            "bottom" => Ok(Destination::Bottom),
            other => Err(ArborError::InvalidVariant {
                selector: "destination".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Rank direction relative to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl FromStr for Direction {
    type Err = ArborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prev" => Ok(Direction::Prev),
            "next" => Ok(Direction::Next),
            other => Err(ArborError::InvalidVariant {
                selector: "direction".to_string(),
                value: other.to_string(),
            }),
        }
    }
}
