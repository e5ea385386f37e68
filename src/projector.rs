use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::hierarchy::ScaffoldHierarchy;
use crate::validity::is_valid;

/// Scaffolds found for one input molecule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldRecord {
    /// Canonical aromatic SMILES of the input molecule.
    pub canonical_structure: String,
    /// Valid scaffold identifiers, top-level scaffold first, then each
    /// layer of parents in breadth-first order.
    pub scaffolds: Vec<String>,
}

/// Collect the scaffolds reachable from `molecule`.
///
/// Returns `None` when `molecule` is not a molecule node of `hierarchy`.
pub fn project(hierarchy: &ScaffoldHierarchy, molecule: NodeIndex) -> Option<ScaffoldRecord> {
    let node = hierarchy.molecule(molecule)?;

    let mut seen = vec![false; hierarchy.graph().node_count()];
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();
    for top in hierarchy.parents(molecule) {
        if !seen[top.index()] {
            seen[top.index()] = true;
            queue.push_back(top);
        }
    }

    let mut scaffolds = Vec::new();
    while let Some(idx) = queue.pop_front() {
        let Some(scaffold) = hierarchy.scaffold(idx) else {
            continue;
        };
        if is_valid(&scaffold.identifier) {
            scaffolds.push(scaffold.identifier.clone());
        }
        for parent in hierarchy.parents(idx) {
            if !seen[parent.index()] {
                seen[parent.index()] = true;
                queue.push_back(parent);
            }
        }
    }

    Some(ScaffoldRecord {
        canonical_structure: node.canonical_structure.clone(),
        scaffolds,
    })
}
