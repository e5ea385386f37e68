use petgraph::graph::NodeIndex;

use crate::aromaticity::perceive_aromaticity;
use crate::bond::BondOrder;
use crate::mol::Mol;
use crate::rings::RingInfo;

/// Bemis-Murcko framework of `mol`.
///
/// Side chains are pruned leaf by leaf until only ring atoms and the linker
/// atoms between them remain; atoms double-bonded to a survivor are then put
/// back. The result is empty for acyclic molecules.
pub fn murcko_scaffold(mol: &Mol) -> Mol {
    let keep = framework_atoms(mol);
    extract(mol, &keep)
}

fn framework_atoms(mol: &Mol) -> Vec<bool> {
    let n = mol.atom_count();
    let rings = RingInfo::new(mol);
    if rings.num_rings() == 0 {
        return vec![false; n];
    }
    let in_ring: Vec<bool> = mol.atoms().map(|a| rings.is_ring_atom(a)).collect();

    let mut keep = vec![true; n];
    let mut degree: Vec<usize> = mol.atoms().map(|a| mol.degree(a)).collect();
    let mut leaves: Vec<NodeIndex> = mol
        .atoms()
        .filter(|a| !in_ring[a.index()] && degree[a.index()] <= 1)
        .collect();

    while let Some(atom) = leaves.pop() {
        if !keep[atom.index()] {
            continue;
        }
        keep[atom.index()] = false;
        for neighbor in mol.neighbors(atom) {
            let i = neighbor.index();
            if !keep[i] {
                continue;
            }
            degree[i] = degree[i].saturating_sub(1);
            if !in_ring[i] && degree[i] <= 1 {
                leaves.push(neighbor);
            }
        }
    }

    let mut pendant = Vec::new();
    for edge in mol.bonds() {
        if mol.bond(edge).order != BondOrder::Double {
            continue;
        }
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        match (keep[a.index()], keep[b.index()]) {
            (true, false) => pendant.push(b),
            (false, true) => pendant.push(a),
            _ => {}
        }
    }
    for atom in pendant {
        keep[atom.index()] = true;
    }

    keep
}

/// Copy the atoms flagged in `keep` into a new molecule.
///
/// Every bond cut between a kept and a dropped atom is replaced by hydrogens
/// on the kept atom, one per unit of bond order, and aromaticity is perceived
/// again on the result.
pub(crate) fn extract(mol: &Mol, keep: &[bool]) -> Mol {
    let mut hydrogens: Vec<u8> = mol
        .atoms()
        .map(|a| mol.atom(a).hydrogen_count)
        .collect();
    for edge in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        let order = mol.bond(edge).order.valence();
        match (keep[a.index()], keep[b.index()]) {
            (true, false) => hydrogens[a.index()] = hydrogens[a.index()].saturating_add(order),
            (false, true) => hydrogens[b.index()] = hydrogens[b.index()].saturating_add(order),
            _ => {}
        }
    }

    let (mut sub, index_map) = mol.subgraph(keep);
    for (old, new) in index_map.iter().enumerate() {
        if let Some(new) = new {
            sub.atom_mut(*new).hydrogen_count = hydrogens[old];
        }
    }
    perceive_aromaticity(&mut sub);
    sub
}
