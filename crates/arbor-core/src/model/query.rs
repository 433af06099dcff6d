//! Query requests
//!
//! [`NodeQuery`] is the closed set of read requests the traversal engine
//! answers. [`FindRequest`] is its loosely-typed wire form (finder name plus
//! selector strings); converting it validates everything up front.

use std::str::FromStr;

use arbor_core_types::NodeId;
use serde::Deserialize;

use crate::errors::ArborError;
use crate::model::Direction;

/// Which children of a node, or which siblings of it, to consider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Children of the node
    Children,
    /// Siblings ranked before the node
    Prev,
    /// Siblings ranked after the node
    Next,
    /// All siblings except the node
    Siblings,
}

impl FromStr for Scope {
    type Err = ArborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prev" => Ok(Scope::Prev),
            "next" => Ok(Scope::Next),
            "siblings" => Ok(Scope::Siblings),
            other => Err(invalid("scope", other)),
        }
    }
}

/// Single-result selector for branches, leaves and siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    First,
    Last,
    /// Nearest earlier sibling
    Prev,
    /// Nearest later sibling
    Next,
}

impl FromStr for Pick {
    type Err = ArborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Pick::First),
            "last" => Ok(Pick::Last),
            "prev" => Ok(Pick::Prev),
            "next" => Ok(Pick::Next),
            other => Err(invalid("pick", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildPick {
    First,
    Last,
    At(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeQuery {
    Ancestors {
        node: NodeId,
        include_self: bool,
    },
    Descendants {
        node: NodeId,
        include_self: bool,
    },
    Children {
        node: NodeId,
    },
    ChildrenInRange {
        node: NodeId,
        from: Option<u32>,
        to: Option<u32>,
    },
    Child {
        node: NodeId,
        pick: ChildPick,
    },
    Branches {
        node: NodeId,
        scope: Scope,
    },
    Branch {
        node: NodeId,
        pick: Pick,
    },
    Leaves {
        node: NodeId,
        scope: Scope,
    },
    Leaf {
        node: NodeId,
        pick: Pick,
    },
    Siblings {
        node: NodeId,
        direction: Option<Direction>,
        include_self: bool,
    },
    Sibling {
        node: NodeId,
        pick: Pick,
    },
}

impl NodeQuery {
    /// The node the query is anchored at
    pub fn node(&self) -> NodeId {
        match *self {
            NodeQuery::Ancestors { node, .. }
            | NodeQuery::Descendants { node, .. }
            | NodeQuery::Children { node }
            | NodeQuery::ChildrenInRange { node, .. }
            | NodeQuery::Child { node, .. }
            | NodeQuery::Branches { node, .. }
            | NodeQuery::Branch { node, .. }
            | NodeQuery::Leaves { node, .. }
            | NodeQuery::Leaf { node, .. }
            | NodeQuery::Siblings { node, .. }
            | NodeQuery::Sibling { node, .. } => node,
        }
    }

    /// Parse the selector pair used by counts and `has` predicates
    ///
    /// `kind` is one of `children`, `branches`, `leaves`, `siblings`;
    /// `variant` is `prev`, `next` or (for branches and leaves) `siblings`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidVariant` for an unknown kind, or for a variant the
    /// kind does not support.
    pub fn tally(kind: &str, node: NodeId, variant: Option<&str>) -> Result<Self, ArborError> {
        match kind {
            "children" => match variant {
                None => Ok(NodeQuery::Children { node }),
                Some(other) => Err(invalid("children", other)),
            },
            "branches" => Ok(NodeQuery::Branches {
                node,
                scope: parse_scope(variant)?,
            }),
            "leaves" => Ok(NodeQuery::Leaves {
                node,
                scope: parse_scope(variant)?,
            }),
            "siblings" => Ok(NodeQuery::Siblings {
                node,
                direction: variant.map(str::parse::<Direction>).transpose()?,
                include_self: false,
            }),
            other => Err(invalid("count", other)),
        }
    }
}

/// Loosely-typed finder request
///
/// ```
/// use arbor_core::model::{FindRequest, NodeQuery, Scope};
/// use arbor_core_types::NodeId;
///
/// let request: FindRequest =
///     serde_json::from_str(r#"{"finder": "branches", "for": 16, "get": "prev"}"#).unwrap();
/// let query = NodeQuery::try_from(request).unwrap();
/// assert_eq!(query, NodeQuery::Branches { node: NodeId::new(16), scope: Scope::Prev });
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FindRequest {
    pub finder: String,
    #[serde(rename = "for")]
    pub target: Option<NodeId>,
    pub get: Option<String>,
    pub position: Option<u32>,
    pub from: Option<u32>,
    pub to: Option<u32>,
    #[serde(default)]
    pub with_self: bool,
}

impl TryFrom<FindRequest> for NodeQuery {
    type Error = ArborError;

    fn try_from(request: FindRequest) -> Result<Self, Self::Error> {
        let get = request.get.as_deref();
        let node = || {
            request.target.ok_or_else(|| ArborError::MissingTarget {
                field: "for".to_string(),
            })
        };

        match request.finder.as_str() {
            "ancestors" | "path" => Ok(NodeQuery::Ancestors {
                node: node()?,
                include_self: request.with_self,
            }),
            "descendants" => Ok(NodeQuery::Descendants {
                node: node()?,
                include_self: request.with_self,
            }),
            "children" => {
                let node = node()?;
                if request.from.is_some() || request.to.is_some() {
                    Ok(NodeQuery::ChildrenInRange {
                        node,
                        from: request.from,
                        to: request.to,
                    })
                } else {
                    Ok(NodeQuery::Children { node })
                }
            }
            "child" => {
                let node = node()?;
                let pick = match (get, request.position) {
                    (Some("first"), _) => ChildPick::First,
                    (Some("last"), _) => ChildPick::Last,
                    (Some(other), _) => return Err(invalid("child", other)),
                    (None, Some(position)) => ChildPick::At(position),
                    (None, None) => return Err(missing("position")),
                };
                Ok(NodeQuery::Child { node, pick })
            }
            "branches" => Ok(NodeQuery::Branches {
                node: node()?,
                scope: parse_scope(get)?,
            }),
            "branch" => Ok(NodeQuery::Branch {
                node: node()?,
                pick: require_pick(get)?,
            }),
            "leaves" => Ok(NodeQuery::Leaves {
                node: node()?,
                scope: parse_scope(get)?,
            }),
            "leaf" => Ok(NodeQuery::Leaf {
                node: node()?,
                pick: require_pick(get)?,
            }),
            "siblings" => Ok(NodeQuery::Siblings {
                node: node()?,
                direction: get.map(str::parse::<Direction>).transpose()?,
                include_self: request.with_self,
            }),
            "sibling" => Ok(NodeQuery::Sibling {
                node: node()?,
                pick: require_pick(get)?,
            }),
            other => Err(invalid("finder", other)),
        }
    }
}

fn parse_scope(raw: Option<&str>) -> Result<Scope, ArborError> {
    raw.map_or(Ok(Scope::Children), str::parse::<Scope>)
}

fn require_pick(raw: Option<&str>) -> Result<Pick, ArborError> {
    raw.ok_or_else(|| missing("get"))?.parse()
}

fn missing(field: &str) -> ArborError {
    ArborError::MissingTarget {
        field: field.to_string(),
    }
}

fn invalid(selector: &str, value: &str) -> ArborError {
    ArborError::InvalidVariant {
        selector: selector.to_string(),
        value: value.to_string(),
    }
}
