//! HierS scaffold hierarchies for small molecules.
//!
//! Molecules are read from SMILES, reduced to their ring-system framework and
//! broken down one terminal ring system at a time. Every scaffold met on the
//! way is named by a canonical identifier, and each input gets back the list
//! of valid scaffolds above it.
//!
//! ```
//! use hiers::ScaffoldEngine;
//!
//! let engine = ScaffoldEngine::default();
//! let record = engine
//!     .get_scaffolds(r"CCN(CC)CCNC(=O)c1c(C)[nH]c(/C=C2\C(=O)Nc3ccc(F)cc32)c1C", "", 10)
//!     .unwrap();
//! assert_eq!(record.scaffolds.len(), 3);
//! ```

pub mod aromaticity;
pub mod atom;
pub mod bond;
pub mod canonical;
pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod gate;
pub mod hierarchy;
pub mod identity;
pub mod kekulize;
pub mod mol;
pub mod projector;
pub mod rings;
pub mod scaffold;
pub mod smiles;
pub mod validity;
pub mod valence;

pub use atom::Atom;
pub use bond::{Bond, BondOrder};
pub use config::EngineConfig;
pub use element::Element;
pub use engine::{BatchResult, ScaffoldEngine};
pub use error::ConfigError;
pub use hierarchy::{BuildStats, MoleculeState, ScaffoldHierarchy};
pub use identity::{canonicalize, IdentifierScheme};
pub use kekulize::{kekulize, KekulizeError};
pub use mol::Mol;
pub use projector::ScaffoldRecord;
pub use rings::{Ring, RingInfo};
pub use scaffold::{PreprocessOptions, Scaffold};
pub use smiles::{
    from_smiles, parse_smiles, to_canonical_kekule_smiles, to_canonical_smiles, to_smiles,
    SmilesError,
};
pub use validity::is_valid;
pub use valence::{check_valence, ValenceError};
