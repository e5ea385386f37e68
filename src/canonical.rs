//! Canonical atom ranks.
//!
//! Atoms are first split into classes by their own invariants, then the
//! classes are refined by the classes of their neighbours until they stop
//! splitting. Remaining ties are broken by individualizing one atom of
//! the first tied class at a time, following only the choices whose
//! refined partitions look best, and keeping the finished ordering whose
//! bond list is smallest.

use crate::mol::Mol;

/// Bound on finished orderings compared for one molecule.
const MAX_LEAVES: usize = 512;

type Adjacency = Vec<Vec<(usize, u8)>>;

/// An atom's class key: its current class and the sorted bond codes and
/// classes of its neighbours.
type Key = (usize, Vec<(u8, usize)>);

fn adjacency(mol: &Mol) -> Adjacency {
    let mut adj: Adjacency = vec![Vec::new(); mol.atom_count()];
    for e in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(e) else {
            continue;
        };
        let bond = mol.bond(e);
        let code = if bond.is_aromatic { 4 } else { bond.order.valence() };
        adj[a.index()].push((b.index(), code));
        adj[b.index()].push((a.index(), code));
    }
    adj
}

/// Dense classes numbered in key order.
fn classes_by_key<K: Ord>(keys: &[K]) -> (Vec<usize>, usize) {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    let mut classes = vec![0; keys.len()];
    let mut next = 0;
    for (i, &atom) in order.iter().enumerate() {
        if i > 0 && keys[atom] != keys[order[i - 1]] {
            next += 1;
        }
        classes[atom] = next;
    }
    let count = if keys.is_empty() { 0 } else { next + 1 };
    (classes, count)
}

fn keys(adj: &Adjacency, classes: &[usize]) -> Vec<Key> {
    adj.iter()
        .enumerate()
        .map(|(i, neighbors)| {
            let mut around: Vec<(u8, usize)> =
                neighbors.iter().map(|&(j, code)| (code, classes[j])).collect();
            around.sort_unstable();
            (classes[i], around)
        })
        .collect()
}

fn refine(adj: &Adjacency, classes: Vec<usize>) -> Vec<usize> {
    let mut classes = classes;
    let mut count = classes.iter().max().map_or(0, |&m| m + 1);
    loop {
        let (next, next_count) = classes_by_key(&keys(adj, &classes));
        if next_count == count {
            return next;
        }
        classes = next;
        count = next_count;
    }
}

/// Put `atom` in a class of its own, just ahead of the rest of its class.
fn individualize(classes: &[usize], atom: usize) -> Vec<usize> {
    let keys: Vec<(usize, bool)> = classes
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i != atom))
        .collect();
    classes_by_key(&keys).0
}

/// Sorted class keys: a numbering-independent summary of a partition.
fn trace(adj: &Adjacency, classes: &[usize]) -> Vec<Key> {
    let mut keys = keys(adj, classes);
    keys.sort_unstable();
    keys
}

fn first_tied_class(classes: &[usize]) -> Option<usize> {
    let mut sizes = vec![0usize; classes.len()];
    for &c in classes {
        sizes[c] += 1;
    }
    sizes.iter().position(|&size| size > 1)
}

struct Search<'a> {
    adj: &'a Adjacency,
    leaves: usize,
    best: Option<(Vec<(usize, usize, u8)>, Vec<usize>)>,
}

impl Search<'_> {
    fn descend(&mut self, classes: Vec<usize>) {
        if self.leaves >= MAX_LEAVES {
            return;
        }
        let Some(tied) = first_tied_class(&classes) else {
            self.leaves += 1;
            let bonds = self.bond_list(&classes);
            if self.best.as_ref().map_or(true, |(best, _)| bonds < *best) {
                self.best = Some((bonds, classes));
            }
            return;
        };

        let trials: Vec<(Vec<Key>, Vec<usize>)> = (0..classes.len())
            .filter(|&i| classes[i] == tied)
            .map(|i| {
                let trial = refine(self.adj, individualize(&classes, i));
                (trace(self.adj, &trial), trial)
            })
            .collect();
        let Some(lowest) = trials.iter().map(|(t, _)| t).min().cloned() else {
            return;
        };
        for (t, trial) in trials {
            if t == lowest {
                self.descend(trial);
            }
        }
    }

    /// Bonds as sorted `(rank, rank, code)` triples under a full ordering.
    fn bond_list(&self, ranks: &[usize]) -> Vec<(usize, usize, u8)> {
        let mut bonds: Vec<(usize, usize, u8)> = self
            .adj
            .iter()
            .enumerate()
            .flat_map(|(i, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |&&(j, _)| i < j)
                    .map(move |&(j, code)| {
                        let (a, b) = (ranks[i], ranks[j]);
                        (a.min(b), a.max(b), code)
                    })
            })
            .collect();
        bonds.sort_unstable();
        bonds
    }
}

/// Rank of every atom in a canonical order: a permutation of
/// `0..atom_count` that is the same for every numbering of the molecule.
///
/// Atoms are compared first by element, degree, hydrogens, charge,
/// aromaticity and isotope, so rank 0 goes to a terminal atom of the
/// lightest element where there is one.
pub fn canonical_ordering(mol: &Mol) -> Vec<usize> {
    let n = mol.atom_count();
    if n == 0 {
        return Vec::new();
    }
    let invariants: Vec<(u8, usize, u8, i8, bool, u16)> = mol
        .atoms()
        .map(|idx| {
            let atom = mol.atom(idx);
            (
                atom.atomic_num,
                mol.degree(idx),
                atom.hydrogen_count,
                atom.formal_charge,
                atom.is_aromatic,
                atom.isotope,
            )
        })
        .collect();

    let adj = adjacency(mol);
    let initial = refine(&adj, classes_by_key(&invariants).0);
    let mut search = Search {
        adj: &adj,
        leaves: 0,
        best: None,
    };
    search.descend(initial);
    search
        .best
        .map(|(_, ranks)| ranks)
        .unwrap_or_else(|| (0..n).collect())
}
