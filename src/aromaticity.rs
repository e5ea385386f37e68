//! Hückel aromaticity over Kekulé structures.
//!
//! Each ring atom donates a fixed number of π electrons, or rules out every
//! ring it sits in. A candidate ring whose atoms all donate, with a total
//! of `4n + 2` and no triple bond, is aromatic. Candidates are the rings
//! of [`RingInfo`] plus their two-ring envelopes, which is what makes
//! azulene aromatic even though neither of its rings is.

use petgraph::graph::NodeIndex;

use crate::bond::BondOrder;
use crate::mol::Mol;
use crate::rings::{Ring, RingInfo};

/// Atoms and bonds found aromatic, indexed by node and edge index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aromaticity {
    pub atoms: Vec<bool>,
    pub bonds: Vec<bool>,
}

pub fn find_aromaticity(mol: &Mol) -> Aromaticity {
    let mut found = Aromaticity {
        atoms: vec![false; mol.atom_count()],
        bonds: vec![false; mol.bond_count()],
    };
    let info = RingInfo::new(mol);
    if info.num_rings() == 0 {
        return found;
    }

    let donation: Vec<Option<u8>> = mol
        .atoms()
        .map(|atom| pi_electrons(mol, atom, &info))
        .collect();
    let envelopes = info.fused_envelopes(mol);

    for ring in info.rings().iter().chain(&envelopes) {
        if is_aromatic_ring(mol, ring, &donation) {
            for atom in ring.atoms() {
                found.atoms[atom.index()] = true;
            }
            for bond in ring.bonds() {
                found.bonds[bond.index()] = true;
            }
        }
    }
    found
}

/// Overwrite every aromatic flag with what the Kekulé bonds support.
pub fn perceive_aromaticity(mol: &mut Mol) {
    let found = find_aromaticity(mol);
    for idx in mol.atoms().collect::<Vec<_>>() {
        mol.atom_mut(idx).is_aromatic = found.atoms[idx.index()];
    }
    for idx in mol.bonds().collect::<Vec<_>>() {
        mol.bond_mut(idx).is_aromatic = found.bonds[idx.index()];
    }
}

fn is_aromatic_ring(mol: &Mol, ring: &Ring, donation: &[Option<u8>]) -> bool {
    if ring
        .bonds()
        .iter()
        .any(|&e| mol.bond(e).order == BondOrder::Triple)
    {
        return false;
    }
    let total: Option<u32> = ring
        .atoms()
        .iter()
        .map(|a| donation[a.index()].map(u32::from))
        .sum();
    total.is_some_and(is_huckel)
}

/// π electrons `idx` gives to a ring, `None` if it cannot be aromatic.
fn pi_electrons(mol: &Mol, idx: NodeIndex, info: &RingInfo) -> Option<u8> {
    if !info.is_ring_atom(idx) {
        return None;
    }
    let atom = mol.atom(idx);
    if !atom.element()?.has_aromatic_form() {
        return None;
    }

    let mut ring_double = false;
    let mut exocyclic_partner = None;
    for e in mol.bonds_of(idx) {
        match mol.bond(e).order {
            BondOrder::Triple => return None,
            BondOrder::Double if info.is_ring_bond(e) => ring_double = true,
            BondOrder::Double => exocyclic_partner = mol.other_end(e, idx),
            BondOrder::Single => {}
        }
    }
    if ring_double {
        return Some(1);
    }
    if let Some(partner) = exocyclic_partner {
        // A carbonyl-like carbon leaves its p orbital empty.
        let polar = matches!(mol.atom(partner).atomic_num, 7 | 8 | 16);
        return (atom.atomic_num == 6 && polar).then_some(0);
    }

    let connections = mol.degree(idx) + usize::from(atom.hydrogen_count);
    match (atom.atomic_num, atom.formal_charge) {
        (6, -1) => Some(2),
        (6, 1) => Some(0),
        (7 | 15 | 33, 0) if connections <= 3 => Some(2),
        (7, -1) if connections <= 2 => Some(2),
        (8 | 16 | 34 | 52, 0) if connections == 2 => Some(2),
        (5, 0) if connections <= 3 => Some(0),
        _ => None,
    }
}

fn is_huckel(electrons: u32) -> bool {
    electrons >= 2 && (electrons - 2) % 4 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::from_smiles;

    fn aromatic_atoms(smiles: &str) -> Vec<bool> {
        find_aromaticity(&from_smiles(smiles).unwrap()).atoms
    }

    fn all(flags: &[bool]) -> bool {
        flags.iter().all(|&a| a)
    }

    fn none(flags: &[bool]) -> bool {
        flags.iter().all(|&a| !a)
    }

    #[test]
    fn kekule_benzene() {
        let found = find_aromaticity(&from_smiles("C1=CC=CC=C1").unwrap());
        assert!(all(&found.atoms));
        assert!(all(&found.bonds));
        assert!(none(&aromatic_atoms("C1CCCCC1")));
    }

    #[test]
    fn heteroaromatics() {
        for smiles in ["c1ccncc1", "[nH]1cccc1", "o1cccc1", "s1cccc1", "c1c[nH]cn1", "c1cc[se]c1"] {
            assert!(all(&aromatic_atoms(smiles)), "{smiles}");
        }
    }

    #[test]
    fn fused_systems() {
        assert!(all(&aromatic_atoms("C1=CC=C2C=CC=CC2=C1")));
        assert!(all(&aromatic_atoms("c1ccc2c(c1)[nH]c1ccccc12")));
    }

    #[test]
    fn azulene_is_aromatic_through_its_envelope() {
        assert!(all(&aromatic_atoms("C1=CC2=CC=CC=CC2=C1")));
    }

    #[test]
    fn charged_carbons() {
        assert!(all(&aromatic_atoms("[CH-]1C=CC=C1")));
        assert!(all(&aromatic_atoms("[CH+]1C=CC=CC=C1")));
        assert!(none(&aromatic_atoms("[CH+]1C=CC=C1")));
    }

    #[test]
    fn substituents_stay_out() {
        let atoms = aromatic_atoms("Oc1ccccc1");
        assert!(!atoms[0]);
        assert!(all(&atoms[1..]));

        let mol = from_smiles("c1ccccc1-c1ccccc1").unwrap();
        let found = find_aromaticity(&mol);
        let link = mol.bond_between(NodeIndex::new(5), NodeIndex::new(6)).unwrap();
        assert!(!found.bonds[link.index()]);
        assert!(all(&found.atoms));
    }

    #[test]
    fn pyridone_carbonyl_carbon_donates_nothing() {
        let atoms = aromatic_atoms("O=C1C=CNC=C1");
        assert!(!atoms[0]);
        assert!(all(&atoms[1..]));
    }

    #[test]
    fn exocyclic_methylidene_breaks_the_ring() {
        let atoms = aromatic_atoms("C=C1C(=O)Nc2ccccc21");
        assert!(!atoms[1], "methylidene carbon");
        assert!(!atoms[4], "amide nitrogen");
        assert!(all(&atoms[5..]));
    }

    #[test]
    fn non_aromatic_rings() {
        for smiles in ["O=C1C=CC(=O)N1", "C1=CCC=C1", "C1=CC=CC=CC=C1", "C1=CC#CC=C1"] {
            assert!(none(&aromatic_atoms(smiles)), "{smiles}");
        }
    }

    #[test]
    fn perceive_resets_stale_flags() {
        let mut mol = from_smiles("C1CCCCC1").unwrap();
        let first = NodeIndex::new(0);
        mol.atom_mut(first).is_aromatic = true;
        perceive_aromaticity(&mut mol);
        assert!(!mol.atom(first).is_aromatic);
    }

    #[test]
    fn huckel_counts() {
        let aromatic: Vec<u32> = (0..20).filter(|&n| is_huckel(n)).collect();
        assert_eq!(aromatic, vec![2, 6, 10, 14, 18]);
    }
}
