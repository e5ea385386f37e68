//! Stable identifiers for scaffolds.
//!
//! Every scaffold node in a hierarchy is keyed by the string produced here,
//! so two scaffolds are the same node exactly when their identifiers match.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ConfigError;
use crate::mol::Mol;
use crate::smiles::{from_smiles, to_canonical_kekule_smiles, to_canonical_smiles};

/// How a scaffold is turned into its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IdentifierScheme {
    /// Canonical SMILES with lowercase aromatic atoms.
    #[default]
    CanonicalSmiles,
    /// Canonical SMILES with explicit Kekulé double bonds.
    KekuleSmiles,
    /// `{formula}/{sha256 of the canonical SMILES identifier}`.
    StructureHash,
}

impl IdentifierScheme {
    pub fn name(self) -> &'static str {
        match self {
            IdentifierScheme::CanonicalSmiles => "canon_smiles",
            IdentifierScheme::KekuleSmiles => "kekule_smiles",
            IdentifierScheme::StructureHash => "structure_hash",
        }
    }
}

impl fmt::Display for IdentifierScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IdentifierScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "canon_smiles" => Ok(IdentifierScheme::CanonicalSmiles),
            "kekule_smiles" => Ok(IdentifierScheme::KekuleSmiles),
            "structure_hash" | "inchi" => Ok(IdentifierScheme::StructureHash),
            other => Err(ConfigError::UnknownScheme(other.to_string())),
        }
    }
}

impl TryFrom<String> for IdentifierScheme {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IdentifierScheme> for String {
    fn from(scheme: IdentifierScheme) -> Self {
        scheme.name().to_string()
    }
}

/// Identifier of `mol` under `scheme`.
///
/// String schemes render, re-read and render again so that the result is a
/// fixed point of the writer. When the first rendering cannot be read back
/// the single-pass string is returned instead.
pub fn canonicalize(mol: &Mol, scheme: IdentifierScheme) -> String {
    let render: fn(&Mol) -> String = match scheme {
        IdentifierScheme::CanonicalSmiles => to_canonical_smiles,
        IdentifierScheme::KekuleSmiles => to_canonical_kekule_smiles,
        IdentifierScheme::StructureHash => return structure_hash(mol),
    };

    let first = render(mol);
    if first.is_empty() {
        return first;
    }
    match from_smiles(&first) {
        Ok(reparsed) => render(&reparsed),
        Err(e) => {
            debug!("keeping single-pass {scheme} identifier {first}: {e}");
            first
        }
    }
}

/// Hill formula and SHA-256 digest of the canonical SMILES identifier,
/// joined by `/`. The digest covers the same double-pass string that the
/// `canon_smiles` scheme returns, so both schemes agree on identity.
pub fn structure_hash(mol: &Mol) -> String {
    let smiles = canonicalize(mol, IdentifierScheme::CanonicalSmiles);
    let digest = Sha256::digest(smiles.as_bytes());
    format!("{}/{}", hill_formula(mol), hex::encode(digest))
}

/// Molecular formula in Hill order: carbon, then hydrogen, then the rest
/// alphabetically, or everything alphabetically when there is no carbon.
/// A net charge is appended as `+`, `2+`, `-`, `2-` and so on.
pub fn hill_formula(mol: &Mol) -> String {
    let mut counts: BTreeMap<&'static str, u32> = BTreeMap::new();
    let mut charge: i32 = 0;
    for idx in mol.atoms() {
        let atom = mol.atom(idx);
        let symbol = atom.element().map_or("*", |e| e.symbol());
        *counts.entry(symbol).or_default() += 1;
        if atom.hydrogen_count > 0 {
            *counts.entry("H").or_default() += u32::from(atom.hydrogen_count);
        }
        charge += i32::from(atom.formal_charge);
    }

    let mut formula = String::new();
    let mut push = |symbol: &str, count: u32| {
        formula.push_str(symbol);
        if count > 1 {
            formula.push_str(&count.to_string());
        }
    };
    if let Some(carbons) = counts.remove("C") {
        push("C", carbons);
        if let Some(hydrogens) = counts.remove("H") {
            push("H", hydrogens);
        }
    }
    for (symbol, count) in counts {
        push(symbol, count);
    }

    match charge {
        0 => {}
        1 => formula.push('+'),
        -1 => formula.push('-'),
        q if q > 0 => formula.push_str(&format!("{q}+")),
        q => formula.push_str(&format!("{}-", q.unsigned_abs())),
    }
    formula
}
