//! Ring perception and ring systems.
//!
//! The ring set holds every shortest cycle through every ring bond. For
//! fused and bridged systems that is the union of all smallest sets of
//! smallest rings, so it does not depend on atom order.

use std::collections::{HashSet, VecDeque};

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::unionfind::UnionFind;

use crate::mol::Mol;

/// Cap on the shortest cycles collected through a single bond.
const MAX_CYCLES_PER_BOND: usize = 32;

/// A ring as sorted atom and bond lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ring {
    atoms: Vec<NodeIndex>,
    bonds: Vec<EdgeIndex>,
}

impl Ring {
    fn from_bonds(mol: &Mol, mut bonds: Vec<EdgeIndex>) -> Self {
        bonds.sort_unstable();
        let mut atoms: Vec<NodeIndex> = bonds
            .iter()
            .filter_map(|&e| mol.bond_endpoints(e))
            .flat_map(|(a, b)| [a, b])
            .collect();
        atoms.sort_unstable();
        atoms.dedup();
        Self { atoms, bonds }
    }

    pub fn atoms(&self) -> &[NodeIndex] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[EdgeIndex] {
        &self.bonds
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    fn shares_bond(&self, other: &Ring) -> bool {
        self.bonds.iter().any(|e| other.bonds.binary_search(e).is_ok())
    }
}

#[derive(Debug, Clone)]
pub struct RingInfo {
    rings: Vec<Ring>,
    ring_atoms: Vec<bool>,
    ring_bonds: Vec<bool>,
}

impl RingInfo {
    pub fn new(mol: &Mol) -> Self {
        let mut ring_atoms = vec![false; mol.atom_count()];
        let mut ring_bonds = vec![false; mol.bond_count()];
        let mut seen: HashSet<Vec<EdgeIndex>> = HashSet::new();
        let mut rings = Vec::new();

        for e in mol.bonds() {
            let Some((u, v)) = mol.bond_endpoints(e) else {
                continue;
            };
            for mut path in shortest_paths_avoiding(mol, u, v, e) {
                path.push(e);
                let ring = Ring::from_bonds(mol, path);
                if seen.insert(ring.bonds.clone()) {
                    rings.push(ring);
                }
            }
        }

        for ring in &rings {
            for atom in &ring.atoms {
                ring_atoms[atom.index()] = true;
            }
            for bond in &ring.bonds {
                ring_bonds[bond.index()] = true;
            }
        }
        rings.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.bonds.cmp(&b.bonds)));

        Self {
            rings,
            ring_atoms,
            ring_bonds,
        }
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.ring_atoms[atom.index()]
    }

    pub fn is_ring_bond(&self, bond: EdgeIndex) -> bool {
        self.ring_bonds[bond.index()]
    }

    /// Envelopes of pairs of rings fused along one path: the symmetric
    /// difference of their bonds, kept when it is a single cycle. Naphthalene
    /// has one, of ten atoms.
    pub fn fused_envelopes(&self, mol: &Mol) -> Vec<Ring> {
        let mut envelopes = Vec::new();
        let mut seen: HashSet<Vec<EdgeIndex>> = HashSet::new();
        for (i, a) in self.rings.iter().enumerate() {
            for b in &self.rings[i + 1..] {
                if !a.shares_bond(b) {
                    continue;
                }
                let bonds: Vec<EdgeIndex> = a
                    .bonds
                    .iter()
                    .chain(&b.bonds)
                    .copied()
                    .filter(|e| a.bonds.binary_search(e).is_err() || b.bonds.binary_search(e).is_err())
                    .collect();
                if !is_single_cycle(mol, &bonds) {
                    continue;
                }
                let ring = Ring::from_bonds(mol, bonds);
                if seen.insert(ring.bonds.clone()) {
                    envelopes.push(ring);
                }
            }
        }
        envelopes
    }
}

/// Every shortest path from `from` to `to` that does not use `skip`, as
/// bond lists, up to the per-bond cap. Empty when `skip` is a bridge.
fn shortest_paths_avoiding(
    mol: &Mol,
    from: NodeIndex,
    to: NodeIndex,
    skip: EdgeIndex,
) -> Vec<Vec<EdgeIndex>> {
    let mut dist: Vec<Option<usize>> = vec![None; mol.atom_count()];
    dist[from.index()] = Some(0);
    let mut queue = VecDeque::from([from]);
    while let Some(u) = queue.pop_front() {
        if u == to {
            break;
        }
        let du = dist[u.index()].unwrap_or(0);
        for e in mol.bonds_of(u).filter(|&e| e != skip) {
            let Some(v) = mol.other_end(e, u) else {
                continue;
            };
            if dist[v.index()].is_none() {
                dist[v.index()] = Some(du + 1);
                queue.push_back(v);
            }
        }
    }
    if dist[to.index()].is_none() {
        return Vec::new();
    }

    let mut paths = Vec::new();
    let mut path = Vec::new();
    walk_back(mol, &dist, from, to, skip, &mut path, &mut paths);
    paths
}

fn walk_back(
    mol: &Mol,
    dist: &[Option<usize>],
    from: NodeIndex,
    cur: NodeIndex,
    skip: EdgeIndex,
    path: &mut Vec<EdgeIndex>,
    paths: &mut Vec<Vec<EdgeIndex>>,
) {
    if cur == from {
        paths.push(path.clone());
        return;
    }
    let Some(d) = dist[cur.index()] else {
        return;
    };
    for e in mol.bonds_of(cur).filter(|&e| e != skip) {
        if paths.len() >= MAX_CYCLES_PER_BOND {
            return;
        }
        let Some(prev) = mol.other_end(e, cur) else {
            continue;
        };
        if dist[prev.index()].is_some_and(|dp| dp + 1 == d) {
            path.push(e);
            walk_back(mol, dist, from, prev, skip, path, paths);
            path.pop();
        }
    }
}

fn is_single_cycle(mol: &Mol, bonds: &[EdgeIndex]) -> bool {
    if bonds.len() < 3 {
        return false;
    }
    let mut degree = vec![0usize; mol.atom_count()];
    let mut sets = UnionFind::<usize>::new(mol.atom_count());
    for &e in bonds {
        let Some((a, b)) = mol.bond_endpoints(e) else {
            return false;
        };
        degree[a.index()] += 1;
        degree[b.index()] += 1;
        sets.union(a.index(), b.index());
    }
    let atoms: Vec<usize> = (0..degree.len()).filter(|&i| degree[i] > 0).collect();
    atoms.iter().all(|&i| degree[i] == 2)
        && atoms.len() == bonds.len()
        && atoms.iter().all(|&i| sets.equiv(i, atoms[0]))
}

/// Atoms of each ring system, sorted, in order of their lowest atom.
///
/// Rings sharing a bond belong to one system. With `merge_spiro`, rings
/// sharing only an atom are merged as well; otherwise a spiro atom belongs
/// to both of its systems.
pub fn ring_systems(mol: &Mol, merge_spiro: bool) -> Vec<Vec<NodeIndex>> {
    let info = RingInfo::new(mol);
    let rings = info.rings();
    let mut sets = UnionFind::<usize>::new(rings.len());
    for (i, a) in rings.iter().enumerate() {
        for (j, b) in rings.iter().enumerate().skip(i + 1) {
            let joined = if merge_spiro {
                a.atoms.iter().any(|x| b.atoms.binary_search(x).is_ok())
            } else {
                a.shares_bond(b)
            };
            if joined {
                sets.union(i, j);
            }
        }
    }

    let mut systems: Vec<Vec<NodeIndex>> = Vec::new();
    let mut slot_of_root: Vec<Option<usize>> = vec![None; rings.len()];
    for (i, ring) in rings.iter().enumerate() {
        let root = sets.find_mut(i);
        let slot = *slot_of_root[root].get_or_insert_with(|| {
            systems.push(Vec::new());
            systems.len() - 1
        });
        systems[slot].extend_from_slice(&ring.atoms);
    }
    for system in &mut systems {
        system.sort_unstable();
        system.dedup();
    }
    systems.sort();
    systems
}

pub fn ring_system_count(mol: &Mol, merge_spiro: bool) -> usize {
    ring_systems(mol, merge_spiro).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::from_smiles;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn ring_sizes(smiles: &str) -> Vec<usize> {
        let mol = from_smiles(smiles).unwrap();
        RingInfo::new(&mol).rings().iter().map(Ring::len).collect()
    }

    #[test]
    fn simple_rings() {
        assert_eq!(ring_sizes("C1CC1"), vec![3]);
        assert_eq!(ring_sizes("C1CCCCC1"), vec![6]);
        assert_eq!(ring_sizes("c1ccccc1"), vec![6]);
        assert!(ring_sizes("CCCC").is_empty());
    }

    #[test]
    fn fused_rings() {
        assert_eq!(ring_sizes("c1ccc2ccccc2c1"), vec![6, 6]);
        assert_eq!(ring_sizes("C1CCC2CCCCC2C1"), vec![6, 6]);
        assert_eq!(ring_sizes("c1ccc2cc3ccccc3cc2c1"), vec![6, 6, 6]);
        assert_eq!(ring_sizes("c1cccc2cccc2c1"), vec![5, 7]);
    }

    #[test]
    fn bridged_and_spiro_rings() {
        assert_eq!(ring_sizes("C1CC2CC1CC2"), vec![5, 5]);
        assert_eq!(ring_sizes("C1CCC2(CC1)CCC2"), vec![4, 6]);
        // All six faces of cubane are shortest cycles.
        assert_eq!(ring_sizes("C12C3C4C1C5C3C4C25"), vec![4; 6]);
    }

    #[test]
    fn ring_membership() {
        let mol = from_smiles("Cc1ccccc1CC=O").unwrap();
        let info = RingInfo::new(&mol);
        assert!(!info.is_ring_atom(n(0)));
        assert!((1..=6).all(|i| info.is_ring_atom(n(i))));
        assert!(!info.is_ring_atom(n(7)));
        let ring_bonds = mol.bonds().filter(|&e| info.is_ring_bond(e)).count();
        assert_eq!(ring_bonds, 6);
    }

    #[test]
    fn ring_set_ignores_atom_order() {
        let a = from_smiles("C1CC2CCC1C2").unwrap();
        let b = from_smiles("C1CC2CC1CC2").unwrap();
        assert_eq!(RingInfo::new(&a).num_rings(), RingInfo::new(&b).num_rings());
    }

    #[test]
    fn envelopes() {
        let mol = from_smiles("c1ccc2ccccc2c1").unwrap();
        let info = RingInfo::new(&mol);
        let sizes: Vec<usize> = info.fused_envelopes(&mol).iter().map(Ring::len).collect();
        assert_eq!(sizes, vec![10]);

        let mol = from_smiles("C1CCC2(CC1)CCC2").unwrap();
        assert!(RingInfo::new(&mol).fused_envelopes(&mol).is_empty());
    }

    #[test]
    fn systems_of_linked_rings() {
        let mol = from_smiles("c1ccccc1Cc1ccc2ccccc2c1").unwrap();
        let systems = ring_systems(&mol, true);
        assert_eq!(systems.len(), 2);
        assert_eq!(systems[0].len(), 6);
        assert_eq!(systems[1].len(), 10);
        assert_eq!(systems[0][0], n(0));
    }

    #[test]
    fn spiro_merging() {
        let mol = from_smiles("C1CCC2(CC1)CCC2").unwrap();
        assert_eq!(ring_system_count(&mol, true), 1);
        let systems = ring_systems(&mol, false);
        assert_eq!(systems.len(), 2);
        let spiro = n(3);
        assert!(systems.iter().all(|s| s.contains(&spiro)));
    }

    #[test]
    fn bridged_rings_are_one_system() {
        let mol = from_smiles("C1CC2CC1CC2").unwrap();
        assert_eq!(ring_system_count(&mol, false), 1);
    }

    #[test]
    fn acyclic_has_no_systems() {
        let mol = from_smiles("CCN(CC)CC").unwrap();
        assert!(ring_systems(&mol, true).is_empty());
    }
}
