//! Whole-table invariant checks
//!
//! Recomputes what the closure rows must be from the parent relation the
//! rank rows induce, and reports every disagreement. Used by
//! `ClosureTable::verify` and by the property tests.

use std::collections::{BTreeMap, HashMap, HashSet};

use arbor_core_types::NodeId;
use thiserror::Error;

use crate::model::ClosureEdge;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("node {node} has no self edge")]
    MissingSelfEdge { node: NodeId },

    #[error("node {node} has {count} rank rows")]
    RankRowCount { node: NodeId, count: usize },

    #[error("node {node} is on a parent cycle")]
    Cycle { node: NodeId },

    #[error("missing edge {ancestor:?} -> {descendant} at depth {depth}")]
    MissingEdge {
        ancestor: Option<NodeId>,
        descendant: NodeId,
        depth: u32,
    },

    #[error("unexpected edge {ancestor:?} -> {descendant} at depth {depth}")]
    UnexpectedEdge {
        ancestor: Option<NodeId>,
        descendant: NodeId,
        depth: u32,
    },

    #[error("edge {ancestor:?} -> {descendant} has order {order:?} at depth {depth}")]
    OrderPlacement {
        ancestor: Option<NodeId>,
        descendant: NodeId,
        depth: u32,
        order: Option<u32>,
    },

    #[error("ranks under {parent:?} are {ranks:?}, expected 1..={}", .ranks.len())]
    SparseRanks {
        parent: Option<NodeId>,
        ranks: Vec<u32>,
    },
}

/// Check invariants over a complete row set
///
/// Returns an empty list when the rows describe a valid forest.
pub fn check(rows: &[ClosureEdge]) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let nodes: HashSet<NodeId> = rows.iter().map(|row| row.descendant).collect();
    let mut by_node: HashMap<NodeId, Vec<&ClosureEdge>> = HashMap::new();
    for row in rows {
        by_node.entry(row.descendant).or_default().push(row);
    }

    // order is present exactly on rank rows
    for row in rows {
        if row.order.is_some() != (row.depth == 1) {
            violations.push(InvariantViolation::OrderPlacement {
                ancestor: row.ancestor,
                descendant: row.descendant,
                depth: row.depth,
                order: row.order,
            });
        }
    }

    // parent relation from rank rows
    let mut parent: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    for node in &nodes {
        let rank_rows: Vec<&&ClosureEdge> = by_node[node].iter().filter(|r| r.depth == 1).collect();
        if rank_rows.len() == 1 {
            parent.insert(*node, rank_rows[0].ancestor);
        } else {
            violations.push(InvariantViolation::RankRowCount {
                node: *node,
                count: rank_rows.len(),
            });
        }
    }

    let mut sorted: Vec<NodeId> = nodes.iter().copied().collect();
    sorted.sort();

    for node in sorted {
        if !parent.contains_key(&node) {
            continue;
        }
        let Some(chain) = chain_of(node, &parent, nodes.len()) else {
            violations.push(InvariantViolation::Cycle { node });
            continue;
        };

        let mut expected: Vec<(Option<NodeId>, u32)> = Vec::with_capacity(chain.len() + 2);
        expected.push((Some(node), 0));
        for (k, ancestor) in chain.iter().enumerate() {
            expected.push((Some(*ancestor), k as u32 + 1));
        }
        expected.push((None, chain.len() as u32 + 1));

        let actual = &by_node[&node];
        if !actual.iter().any(|r| r.is_self_edge()) {
            violations.push(InvariantViolation::MissingSelfEdge { node });
        }

        let mut unmatched: Vec<&ClosureEdge> = actual.to_vec();
        for (ancestor, depth) in expected {
            match unmatched
                .iter()
                .position(|r| r.ancestor == ancestor && r.depth == depth)
            {
                Some(found) => {
                    unmatched.swap_remove(found);
                }
                None => {
                    if ancestor != Some(node) {
                        violations.push(InvariantViolation::MissingEdge {
                            ancestor,
                            descendant: node,
                            depth,
                        });
                    }
                }
            }
        }
        for extra in unmatched {
            violations.push(InvariantViolation::UnexpectedEdge {
                ancestor: extra.ancestor,
                descendant: node,
                depth: extra.depth,
            });
        }
    }

    // dense ranks per group
    let mut groups: BTreeMap<Option<NodeId>, Vec<u32>> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.depth == 1) {
        if let Some(rank) = row.order {
            groups.entry(row.ancestor).or_default().push(rank);
        }
    }
    for (parent, mut ranks) in groups {
        ranks.sort_unstable();
        let dense = ranks.iter().enumerate().all(|(i, rank)| *rank == i as u32 + 1);
        if !dense {
            violations.push(InvariantViolation::SparseRanks { parent, ranks });
        }
    }

    violations
}

/// Ancestors of `node`, nearest first; `None` on a cycle or a broken chain
fn chain_of(
    node: NodeId,
    parent: &HashMap<NodeId, Option<NodeId>>,
    limit: usize,
) -> Option<Vec<NodeId>> {
    let mut chain = Vec::new();
    let mut current = node;
    loop {
        match parent.get(&current) {
            Some(Some(up)) => {
                if *up == node || chain.len() >= limit {
                    return None;
                }
                chain.push(*up);
                current = *up;
            }
            Some(None) => return Some(chain),
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: i64) -> NodeId {
        NodeId::new(raw)
    }

    fn two_level() -> Vec<ClosureEdge> {
        vec![
            ClosureEdge::marker(id(1), 1, Some(1)),
            ClosureEdge::self_edge(id(1)),
            ClosureEdge::marker(id(2), 2, None),
            ClosureEdge::ancestor_edge(id(1), id(2), 1, Some(1)),
            ClosureEdge::self_edge(id(2)),
        ]
    }

    #[test]
    fn test_valid_rows_pass() {
        assert!(check(&two_level()).is_empty());
    }

    #[test]
    fn test_missing_marker_detected() {
        let mut rows = two_level();
        rows.retain(|r| *r != ClosureEdge::marker(id(2), 2, None));
        assert_eq!(
            check(&rows),
            vec![InvariantViolation::MissingEdge {
                ancestor: None,
                descendant: id(2),
                depth: 2
            }]
        );
    }

    #[test]
    fn test_rank_gap_detected() {
        let mut rows = two_level();
        rows[3].order = Some(2);
        assert!(check(&rows).contains(&InvariantViolation::SparseRanks {
            parent: Some(id(1)),
            ranks: vec![2]
        }));
    }

    #[test]
    fn test_cycle_detected() {
        let rows = vec![
            ClosureEdge::ancestor_edge(id(2), id(1), 1, Some(1)),
            ClosureEdge::self_edge(id(1)),
            ClosureEdge::ancestor_edge(id(1), id(2), 1, Some(1)),
            ClosureEdge::self_edge(id(2)),
        ];
        let violations = check(&rows);
        assert!(violations.contains(&InvariantViolation::Cycle { node: id(1) }));
        assert!(violations.contains(&InvariantViolation::Cycle { node: id(2) }));
    }
}
