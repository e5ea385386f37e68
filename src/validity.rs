use crate::identity::IdentifierScheme;

/// Benzene as each scheme spells it, plus the standard InChI so that
/// identifiers produced by external InChI tooling are caught as well.
const BENZENE: [&str; 4] = [
    "c1ccccc1",
    "C1=CC=CC=C1",
    "C6H6/13cad05ca8f49c509e5b7be8c67668484344ebf2b2d12b03b295f14d4b1c32d1",
    "InChI=1S/C6H6/c1-2-4-6-5-3-1/h1-6H",
];

/// Benzene identifier under `scheme`.
pub fn benzene_literal(scheme: IdentifierScheme) -> &'static str {
    match scheme {
        IdentifierScheme::CanonicalSmiles => BENZENE[0],
        IdentifierScheme::KekuleSmiles => BENZENE[1],
        IdentifierScheme::StructureHash => BENZENE[2],
    }
}

/// Whether `identifier` names a real scaffold. Empty identifiers and benzene
/// are degenerate whatever the scheme.
pub fn is_valid(identifier: &str) -> bool {
    !identifier.is_empty() && !BENZENE.contains(&identifier)
}
