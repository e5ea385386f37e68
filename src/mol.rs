use std::fmt;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

use crate::atom::Atom;
use crate::bond::Bond;

/// A molecular graph: atoms are the nodes and bonds the edges of an
/// undirected petgraph graph.
#[derive(Clone, Default)]
pub struct Mol {
    graph: UnGraph<Atom, Bond>,
}

impl Mol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &UnGraph<Atom, Bond> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &Atom {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut Atom {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &Bond {
        &self.graph[idx]
    }

    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut Bond {
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: Atom) -> NodeIndex {
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: Bond) -> EdgeIndex {
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).count()
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// The atom across `edge` from `from`.
    pub fn other_end(&self, edge: EdgeIndex, from: NodeIndex) -> Option<NodeIndex> {
        let (a, b) = self.graph.edge_endpoints(edge)?;
        Some(if a == from { b } else { a })
    }

    /// Sum of the Kekulé orders of the bonds at `idx`, hydrogens excluded.
    pub fn bond_order_sum(&self, idx: NodeIndex) -> u8 {
        self.graph
            .edges(idx)
            .map(|e| e.weight().order.valence())
            .fold(0, u8::saturating_add)
    }

    /// Connected components, each sorted by atom index and listed in the
    /// order of their lowest atom.
    pub fn components(&self) -> Vec<Vec<NodeIndex>> {
        let n = self.atom_count();
        let mut sets = UnionFind::<usize>::new(n);
        for edge in self.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }
        let mut slot_of_root = vec![usize::MAX; n];
        let mut components: Vec<Vec<NodeIndex>> = Vec::new();
        for i in 0..n {
            let root = sets.find_mut(i);
            if slot_of_root[root] == usize::MAX {
                slot_of_root[root] = components.len();
                components.push(Vec::new());
            }
            components[slot_of_root[root]].push(NodeIndex::new(i));
        }
        components
    }

    pub fn num_components(&self) -> usize {
        self.components().len()
    }

    /// Copy of the atoms flagged in `keep` and the bonds between them.
    ///
    /// Relative atom order is preserved. The second value maps every old
    /// atom index to its new index, if it was kept.
    pub fn subgraph(&self, keep: &[bool]) -> (Mol, Vec<Option<NodeIndex>>) {
        let mut sub = Mol::new();
        let map: Vec<Option<NodeIndex>> = self
            .atoms()
            .map(|idx| keep[idx.index()].then(|| sub.add_atom(self.atom(idx).clone())))
            .collect();
        for edge in self.graph.edge_references() {
            if let (Some(a), Some(b)) = (map[edge.source().index()], map[edge.target().index()]) {
                sub.add_bond(a, b, *edge.weight());
            }
        }
        (sub, map)
    }
}

impl PartialEq for Mol {
    /// Same atoms and same bonds under the same indices.
    fn eq(&self, other: &Self) -> bool {
        self.atom_count() == other.atom_count()
            && self.bond_count() == other.bond_count()
            && self.atoms().all(|idx| self.atom(idx) == other.atom(idx))
            && self.graph.edge_references().all(|edge| {
                other
                    .bond_between(edge.source(), edge.target())
                    .is_some_and(|e| other.bond(e) == edge.weight())
            })
    }
}

impl fmt::Debug for Mol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mol")
            .field("atoms", &self.atom_count())
            .field("bonds", &self.bond_count())
            .finish()
    }
}
