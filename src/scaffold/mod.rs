//! Ring-system scaffolds.
//!
//! A scaffold is what is left of a molecule once every side chain has been
//! pruned: the ring atoms, the linker atoms joining ring systems, and atoms
//! attached to either by a double bond. HierS parents of a scaffold are
//! obtained by removing one terminal ring system at a time.

mod fragment;
mod murcko;
mod preprocess;

pub use fragment::fragment;
pub use murcko::murcko_scaffold;
pub use preprocess::{preprocess, PreprocessOptions};

use crate::mol::Mol;
use crate::rings::ring_system_count;

/// A scaffold molecule together with its ring-system count.
#[derive(Debug, Clone)]
pub struct Scaffold {
    mol: Mol,
    ring_systems: usize,
}

impl Scaffold {
    pub fn new(mol: Mol, merge_spiro: bool) -> Self {
        let ring_systems = ring_system_count(&mol, merge_spiro);
        Self { mol, ring_systems }
    }

    pub fn mol(&self) -> &Mol {
        &self.mol
    }

    pub fn into_mol(self) -> Mol {
        self.mol
    }

    pub fn ring_system_count(&self) -> usize {
        self.ring_systems
    }

    pub fn is_empty(&self) -> bool {
        self.mol.is_empty()
    }
}
