//! Kekulé structures for aromatic bonds.
//!
//! Every aromatic atom that still lacks a π bond must get exactly one
//! double bond to an aromatic neighbour. That is a perfect matching on the
//! atoms that need one, found greedily and completed with augmenting paths.

use std::collections::{HashSet, VecDeque};

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

use crate::bond::BondOrder;
use crate::mol::Mol;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KekulizeError {
    /// No double bond could be placed on these atoms.
    #[error("cannot kekulize aromatic system: unmatched atoms {}", format_atoms(.0))]
    Unkekulizable(Vec<NodeIndex>),
}

fn format_atoms(atoms: &[NodeIndex]) -> String {
    let indices: Vec<String> = atoms.iter().map(|a| a.index().to_string()).collect();
    format!("[{}]", indices.join(", "))
}

type Adjacency = Vec<Vec<(NodeIndex, EdgeIndex)>>;

fn aromatic_adjacency(mol: &Mol) -> Adjacency {
    let mut adj: Adjacency = vec![Vec::new(); mol.atom_count()];
    for e in mol.bonds().filter(|&e| mol.bond(e).is_aromatic) {
        if let Some((a, b)) = mol.bond_endpoints(e) {
            adj[a.index()].push((b, e));
            adj[b.index()].push((a, e));
        }
    }
    adj
}

/// Whether an aromatic atom has exactly one unit of valence left for a
/// double bond, counting each aromatic bond as single. A bare charged atom
/// two short (a pyridinium-like nitrogen written without hydrogens) also
/// takes one.
fn needs_double_bond(mol: &Mol, idx: NodeIndex) -> bool {
    let atom = mol.atom(idx);
    let Some(element) = atom.element() else {
        return false;
    };
    let used = i16::from(mol.bond_order_sum(idx)) + i16::from(atom.hydrogen_count);
    let charge = i16::from(atom.formal_charge);
    let target = element
        .default_valences()
        .iter()
        .map(|&v| i16::from(v) + charge)
        .filter(|&v| v > 0)
        .find(|&v| v >= used);
    match target.map(|t| t - used) {
        Some(1) => true,
        Some(2) => atom.hydrogen_count == 0 && atom.formal_charge != 0,
        _ => false,
    }
}

struct Pairing {
    partner: Vec<Option<(NodeIndex, EdgeIndex)>>,
}

impl Pairing {
    fn new(n: usize) -> Self {
        Self {
            partner: vec![None; n],
        }
    }

    fn is_paired(&self, v: NodeIndex) -> bool {
        self.partner[v.index()].is_some()
    }

    fn pair(&mut self, a: NodeIndex, b: NodeIndex, e: EdgeIndex) {
        self.partner[a.index()] = Some((b, e));
        self.partner[b.index()] = Some((a, e));
    }

    /// Pair `start` by flipping the shortest alternating path from it to
    /// an unpaired eligible atom.
    fn augment(&mut self, adj: &Adjacency, eligible: &[bool], start: NodeIndex) -> bool {
        let n = self.partner.len();
        let mut came_from: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; n];
        let mut seen = vec![false; n];
        seen[start.index()] = true;
        let mut queue = VecDeque::from([start]);

        while let Some(u) = queue.pop_front() {
            for &(v, e) in &adj[u.index()] {
                if !eligible[v.index()] || seen[v.index()] {
                    continue;
                }
                seen[v.index()] = true;
                came_from[v.index()] = Some((u, e));
                let Some((w, paired_by)) = self.partner[v.index()] else {
                    self.flip(&came_from, start, v);
                    return true;
                };
                if !seen[w.index()] {
                    seen[w.index()] = true;
                    came_from[w.index()] = Some((v, paired_by));
                    queue.push_back(w);
                }
            }
        }
        false
    }

    fn flip(&mut self, came_from: &[Option<(NodeIndex, EdgeIndex)>], start: NodeIndex, end: NodeIndex) {
        let mut cur = end;
        let mut unpaired_step = true;
        while cur != start {
            let Some((prev, e)) = came_from[cur.index()] else {
                return;
            };
            if unpaired_step {
                self.pair(cur, prev, e);
            }
            unpaired_step = !unpaired_step;
            cur = prev;
        }
    }

    fn double_bonds(&self) -> HashSet<EdgeIndex> {
        self.partner.iter().flatten().map(|&(_, e)| e).collect()
    }

    /// Write the pairing into the Kekulé orders of the aromatic bonds.
    fn apply(&self, mol: &mut Mol) {
        let doubles = self.double_bonds();
        let aromatic: Vec<EdgeIndex> = mol.bonds().filter(|&e| mol.bond(e).is_aromatic).collect();
        for e in aromatic {
            mol.bond_mut(e).order = if doubles.contains(&e) {
                BondOrder::Double
            } else {
                BondOrder::Single
            };
        }
    }
}

/// Pair the atoms of `order`, in that order, first greedily and then by
/// augmenting paths. Returns the atoms left over on failure.
fn solve(adj: &Adjacency, eligible: &[bool], order: &[NodeIndex]) -> Result<Pairing, Vec<NodeIndex>> {
    let mut pairing = Pairing::new(adj.len());
    for &u in order {
        if pairing.is_paired(u) {
            continue;
        }
        let free = adj[u.index()]
            .iter()
            .find(|&&(v, _)| eligible[v.index()] && !pairing.is_paired(v))
            .copied();
        if let Some((v, e)) = free {
            pairing.pair(u, v, e);
        }
    }

    let mut stuck = Vec::new();
    for &u in order {
        if !pairing.is_paired(u) && !pairing.augment(adj, eligible, u) {
            stuck.push(u);
        }
    }
    if stuck.is_empty() {
        Ok(pairing)
    } else {
        Err(stuck)
    }
}

/// Give every aromatic bond of a freshly read molecule a Kekulé order.
///
/// Aromatic flags are left as they were; non-aromatic bonds are untouched.
pub fn kekulize(mol: &mut Mol) -> Result<(), KekulizeError> {
    let adj = aromatic_adjacency(mol);
    let eligible: Vec<bool> = mol
        .atoms()
        .map(|a| !adj[a.index()].is_empty() && needs_double_bond(mol, a))
        .collect();
    let order: Vec<NodeIndex> = mol.atoms().filter(|a| eligible[a.index()]).collect();
    let pairing = solve(&adj, &eligible, &order).map_err(KekulizeError::Unkekulizable)?;
    pairing.apply(mol);
    Ok(())
}

/// The same molecule with the double bonds of its aromatic rings moved to
/// the positions preferred by an output order, where `position[atom]` is
/// the atom's place in that order.
///
/// Atoms are paired in position order with their earliest free aromatic
/// neighbour, so two Kekulé forms of one structure come out identical
/// under the same order. The molecule is returned unchanged if no pairing
/// is found.
pub fn rekekulize_in_order(mol: &Mol, position: &[usize]) -> Mol {
    let mut adj = aromatic_adjacency(mol);
    for neighbors in &mut adj {
        neighbors.sort_by_key(|&(v, _)| position[v.index()]);
    }
    let mut eligible = vec![false; mol.atom_count()];
    for e in mol.bonds() {
        let bond = mol.bond(e);
        if !bond.is_aromatic || bond.order != BondOrder::Double {
            continue;
        }
        if let Some((a, b)) = mol.bond_endpoints(e) {
            eligible[a.index()] = true;
            eligible[b.index()] = true;
        }
    }
    let mut order: Vec<NodeIndex> = mol.atoms().filter(|a| eligible[a.index()]).collect();
    order.sort_by_key(|a| position[a.index()]);

    let mut out = mol.clone();
    if let Ok(pairing) = solve(&adj, &eligible, &order) {
        pairing.apply(&mut out);
    }
    out
}
