use serde::{Deserialize, Serialize};

use crate::aromaticity::perceive_aromaticity;
use crate::mol::Mol;

/// Clean-up steps applied to a top-level scaffold before it is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Reset every isotope label to natural abundance.
    pub flatten_isotopes: bool,
    /// Keep only the connected component with the most atoms.
    pub keep_largest_fragment: bool,
    /// Neutralize charged atoms, adjusting their hydrogens.
    pub discharge: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            flatten_isotopes: true,
            keep_largest_fragment: true,
            discharge: true,
        }
    }
}

pub fn preprocess(mol: Mol, options: &PreprocessOptions) -> Mol {
    let mut mol = if options.keep_largest_fragment {
        largest_fragment(mol)
    } else {
        mol
    };
    if options.flatten_isotopes {
        flatten_isotopes(&mut mol);
    }
    if options.discharge {
        discharge(&mut mol);
        perceive_aromaticity(&mut mol);
    }
    mol
}

fn flatten_isotopes(mol: &mut Mol) {
    for idx in mol.atoms().collect::<Vec<_>>() {
        mol.atom_mut(idx).isotope = 0;
    }
}

/// The component with the most atoms; the first one wins a tie.
fn largest_fragment(mol: Mol) -> Mol {
    let components = mol.components();
    if components.len() <= 1 {
        return mol;
    }
    let mut largest = &components[0];
    for component in &components[1..] {
        if component.len() > largest.len() {
            largest = component;
        }
    }
    let mut keep = vec![false; mol.atom_count()];
    for atom in largest {
        keep[atom.index()] = true;
    }
    mol.subgraph(&keep).0
}

/// Zero every formal charge. Hydrogens are recomputed from the lowest
/// default valence that fits the bonds; atoms without one keep theirs.
fn discharge(mol: &mut Mol) {
    for idx in mol.atoms().collect::<Vec<_>>() {
        if mol.atom(idx).formal_charge == 0 {
            continue;
        }
        let bond_sum = mol.bond_order_sum(idx);
        let target = mol
            .atom(idx)
            .element()
            .and_then(|e| e.default_valences().iter().find(|&&v| v >= bond_sum).copied());

        let atom = mol.atom_mut(idx);
        atom.formal_charge = 0;
        if let Some(valence) = target {
            atom.hydrogen_count = valence - bond_sum;
        }
    }
}
