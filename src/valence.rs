use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::element::Element;
use crate::mol::Mol;

/// An uncharged atom carrying more bonds and hydrogens than its element's
/// highest default valence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("atom {} ({element}) has valence {valence}, above {max}", .atom.index())]
pub struct ValenceError {
    pub atom: NodeIndex,
    pub element: Element,
    pub valence: u8,
    pub max: u8,
}

/// Kekulé bond orders plus hydrogens.
pub fn total_valence(mol: &Mol, atom: NodeIndex) -> u8 {
    mol.bond_order_sum(atom)
        .saturating_add(mol.atom(atom).hydrogen_count)
}

/// The first uncharged atom above its highest default valence, if any.
///
/// Charged atoms and elements without default valences are not checked.
/// Anything at or below the maximum passes, so carbenes and other
/// low-valent atoms are accepted.
pub fn check_valence(mol: &Mol) -> Result<(), ValenceError> {
    for idx in mol.atoms() {
        let atom = mol.atom(idx);
        if atom.formal_charge != 0 {
            continue;
        }
        let Some(element) = atom.element() else {
            continue;
        };
        let Some(&max) = element.default_valences().last() else {
            continue;
        };
        let valence = total_valence(mol, idx);
        if valence > max {
            return Err(ValenceError {
                atom: idx,
                element,
                valence,
                max,
            });
        }
    }
    Ok(())
}
