use hiers::{
    canonicalize, from_smiles, to_canonical_kekule_smiles, to_canonical_smiles, IdentifierScheme,
    Mol,
};
use petgraph::graph::NodeIndex;

/// The same molecule with new atom `i` taken from old atom `order[i]`.
fn renumbered(mol: &Mol, order: &[usize]) -> Mol {
    let mut position = vec![0; order.len()];
    for (new, &old) in order.iter().enumerate() {
        position[old] = new;
    }
    let mut out = Mol::new();
    for &old in order {
        out.add_atom(mol.atom(NodeIndex::new(old)).clone());
    }
    for e in mol.bonds() {
        let (a, b) = mol.bond_endpoints(e).unwrap();
        out.add_bond(
            NodeIndex::new(position[a.index()]),
            NodeIndex::new(position[b.index()]),
            *mol.bond(e),
        );
    }
    out
}

const MOLECULES: &[&str] = &[
    // Simple
    "C",
    "CC",
    "C=C",
    "C#C",
    "C=O",
    "O",
    "N",
    "[H][H]",
    // Heteroatoms
    "CCO",
    "CCN",
    "CCS",
    "CCF",
    "CCCl",
    "CCBr",
    // Branching
    "CC(C)C",
    "CC(C)(C)C",
    "CC(=O)O",
    "CC(=O)N",
    // Rings
    "C1CC1",
    "C1CCC1",
    "C1CCCCC1",
    "c1ccccc1",
    "c1ccncc1",
    "c1ccoc1",
    "c1ccsc1",
    "c1ccc2ccccc2c1",
    "C1CC2CCCC(C1)C2",
    // Charged
    "[NH4+]",
    "[O-]",
    "[Na+].[Cl-]",
    // Functional groups
    "CC(=O)OC",
    "c1ccc(cc1)O",
    "c1ccc(cc1)N",
    "CC(=O)Nc1ccccc1",
    "c1ccc2c(c1)[nH]cc2",
    // Multi-component
    "C.C",
    "[Na+].[Cl-].O",
    // Isotopes
    "[2H]C([2H])([2H])[2H]",
    "[13C]c1ccccc1",
    // Larger / drug-like
    "CN1C=NC2=C1C(=O)N(C(=O)N2C)C",
    "CC12CCC3C(C1CCC2O)CCC4=CC(=O)CCC34C",
    "CC(=O)OC1=CC=CC=C1C(=O)O",
    "O=C(O)c1ccccc1O",
    "Nc1ccc(cc1)S(=O)(=O)Nc1ccccn1",
    "CC(C)Cc1ccc(cc1)C(C)C(=O)O",
    "OC(=O)CC(O)(CC(=O)O)C(=O)O",
    // Scaffold-like frameworks
    "c1ccc(cc1)-c1ccccc1",
    "c1ccc(cc1)CC1CCNCC1",
    "C1CCC2(CC1)CCNCC2",
    "c1ccc2c(c1)C1CCN2CC1",
    "O=C1NC(=O)C(c2c[nH]c3ccccc23)=C1c1c[nH]c2ccccc12",
    // Additional edge cases
    "C#N",
    "[Cu+2]",
    "c1cc[nH]c1",
    "C1=CC=CC=C1",
    "c1cnc2ccccc2n1",
    "[O-][N+](=O)c1ccccc1",
    "c1cc2ccc3cccc4ccc(c1)c2c34",
    "C1CC(CC1)C1CCCC1",
    "C1CCC(CC1)C1CCC(CC1)C1CCCC1",
];

fn canonical(smiles: &str) -> String {
    let mol = from_smiles(smiles).unwrap_or_else(|e| panic!("parse failed for '{smiles}': {e}"));
    to_canonical_smiles(&mol)
}

fn all_permutations(n: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    let mut state: Vec<usize> = (0..n).collect();
    result.push(state.clone());
    if n <= 1 {
        return result;
    }
    let mut c = vec![0usize; n];
    let mut i = 1;
    while i < n {
        if c[i] < i {
            if i % 2 == 0 {
                state.swap(0, i);
            } else {
                state.swap(c[i], i);
            }
            result.push(state.clone());
            c[i] += 1;
            i = 1;
        } else {
            c[i] = 0;
            i += 1;
        }
    }
    result
}

struct Xorshift64(u64);

impl Xorshift64 {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn shuffle(&mut self, slice: &mut [usize]) {
        for i in (1..slice.len()).rev() {
            let j = (self.next() % (i as u64 + 1)) as usize;
            slice.swap(i, j);
        }
    }
}

fn random_permutations(n: usize, count: usize) -> Vec<Vec<usize>> {
    let mut rng = Xorshift64(0xDEAD_BEEF_CAFE_BABE);
    (0..count)
        .map(|_| {
            let mut perm: Vec<usize> = (0..n).collect();
            rng.shuffle(&mut perm);
            perm
        })
        .collect()
}

const EXHAUSTIVE_THRESHOLD: usize = 8;
const RANDOM_SAMPLE_COUNT: usize = 100;

fn permutations_for(n: usize) -> Vec<Vec<usize>> {
    if n <= EXHAUSTIVE_THRESHOLD {
        all_permutations(n)
    } else {
        random_permutations(n, RANDOM_SAMPLE_COUNT)
    }
}

#[test]
fn determinism() {
    for &smiles in MOLECULES {
        let mol =
            from_smiles(smiles).unwrap_or_else(|e| panic!("parse failed for '{smiles}': {e}"));
        let a = to_canonical_smiles(&mol);
        let b = to_canonical_smiles(&mol);
        assert_eq!(a, b, "determinism failed for '{smiles}': '{a}' vs '{b}'");
    }
}

#[test]
fn round_trip_idempotence() {
    for &smiles in MOLECULES {
        let first = canonical(smiles);
        let reparsed = from_smiles(&first)
            .unwrap_or_else(|e| panic!("reparse failed for '{first}' (from '{smiles}'): {e}"));
        let second = to_canonical_smiles(&reparsed);
        assert_eq!(
            first, second,
            "round-trip failed for '{smiles}': first='{first}', second='{second}'"
        );
    }
}

#[test]
fn identifiers_are_fixed_points() {
    for scheme in [
        IdentifierScheme::CanonicalSmiles,
        IdentifierScheme::KekuleSmiles,
    ] {
        for &smiles in MOLECULES {
            let first = canonicalize(&from_smiles(smiles).unwrap(), scheme);
            let reparsed = from_smiles(&first)
                .unwrap_or_else(|e| panic!("{scheme} reparse failed for '{first}': {e}"));
            let second = canonicalize(&reparsed, scheme);
            assert_eq!(first, second, "{scheme} is not a fixed point for '{smiles}'");
        }
    }
}

#[test]
fn permutation_invariance() {
    for &smiles in MOLECULES {
        let mol =
            from_smiles(smiles).unwrap_or_else(|e| panic!("parse failed for '{smiles}': {e}"));
        let expected = to_canonical_smiles(&mol);
        let n = mol.atom_count();
        for perm in permutations_for(n) {
            let renum = renumbered(&mol, &perm);
            let got = to_canonical_smiles(&renum);
            assert_eq!(
                expected, got,
                "permutation invariance failed for '{smiles}' with perm {perm:?}: \
                 expected='{expected}', got='{got}'"
            );
        }
    }
}

#[test]
fn kekule_permutation_invariance() {
    for &smiles in MOLECULES {
        let mol = from_smiles(smiles).unwrap();
        let expected = to_canonical_kekule_smiles(&mol);
        for perm in random_permutations(mol.atom_count(), 20) {
            let renum = renumbered(&mol, &perm);
            let got = to_canonical_kekule_smiles(&renum);
            assert_eq!(
                expected, got,
                "kekule invariance failed for '{smiles}' with perm {perm:?}"
            );
        }
    }
}
