//! Reading and writing SMILES.

pub mod error;
mod reader;
mod writer;

use crate::aromaticity::perceive_aromaticity;
use crate::kekulize::kekulize;
use crate::mol::Mol;
use crate::valence::check_valence;
pub use error::SmilesError;
pub(crate) use reader::implicit_hydrogens;
pub use writer::{to_canonical_kekule_smiles, to_canonical_smiles, to_smiles};

/// Read SMILES without sanitizing: lowercase atoms and the bonds between
/// them stay aromatic, and aromatic bonds have no Kekulé order yet.
///
/// Leading whitespace is ignored and anything after the first whitespace
/// following the structure (a name column, say) is discarded.
pub fn parse_smiles(s: &str) -> Result<Mol, SmilesError> {
    reader::read(s)
}

/// Read SMILES into a sanitized molecule: Kekulé bond orders assigned,
/// valences checked and aromatic flags perceived from the rings.
pub fn from_smiles(s: &str) -> Result<Mol, SmilesError> {
    let mut mol = reader::read(s)?;
    kekulize(&mut mol)?;
    check_valence(&mol)?;
    perceive_aromaticity(&mut mol);
    Ok(mol)
}
