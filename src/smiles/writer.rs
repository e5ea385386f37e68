use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Atom;
use crate::bond::BondOrder;
use crate::canonical::canonical_ordering;
use crate::element::Element;
use crate::kekulize::rekekulize_in_order;
use crate::mol::Mol;

use super::implicit_hydrogens;

/// How aromatic systems are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Lowercase aromatic atoms, aromatic bonds implicit.
    Aromatic,
    /// Uppercase atoms with every double and triple bond written out.
    Kekule,
}

/// Write SMILES in input atom order.
pub fn to_smiles(mol: &Mol) -> String {
    let plan = Plan::new(mol, None);
    plan.write(mol, Mode::Aromatic)
}

/// Canonical SMILES with aromatic atoms written in lowercase.
pub fn to_canonical_smiles(mol: &Mol) -> String {
    let ranks = canonical_ordering(mol);
    let plan = Plan::new(mol, Some(&ranks));
    plan.write(mol, Mode::Aromatic)
}

/// Canonical SMILES in Kekulé form.
///
/// The double bonds of aromatic rings are redistributed along the canonical
/// traversal before writing, so the output does not depend on which Kekulé
/// structure the molecule happened to carry.
pub fn to_canonical_kekule_smiles(mol: &Mol) -> String {
    let ranks = canonical_ordering(mol);
    let plan = Plan::new(mol, Some(&ranks));
    let mut position = vec![0usize; mol.atom_count()];
    for (i, node) in plan.preorder.iter().enumerate() {
        position[node.index()] = i;
    }
    let kekule = rekekulize_in_order(mol, &position);
    plan.write(&kekule, Mode::Kekule)
}

/// Spanning forest and ring closures of one depth-first traversal.
struct Plan {
    starts: Vec<NodeIndex>,
    preorder: Vec<NodeIndex>,
    children: Vec<Vec<NodeIndex>>,
    ring_opens: Vec<Vec<EdgeIndex>>,
    ring_closes: Vec<Vec<EdgeIndex>>,
}

impl Plan {
    fn new(mol: &Mol, ranks: Option<&[usize]>) -> Self {
        let n = mol.atom_count();
        let mut components = mol.components();
        let mut starts: Vec<NodeIndex> = Vec::with_capacity(components.len());
        match ranks {
            Some(r) => {
                components.sort_by_key(|c| c.iter().map(|a| r[a.index()]).min());
                for component in &components {
                    if let Some(&start) = component.iter().min_by_key(|a| r[a.index()]) {
                        starts.push(start);
                    }
                }
            }
            None => starts.extend(components.iter().filter_map(|c| c.first().copied())),
        }

        let neighbor_lists: Vec<Vec<NodeIndex>> = (0..n)
            .map(|i| {
                let mut neighbors: Vec<NodeIndex> = mol.neighbors(NodeIndex::new(i)).collect();
                match ranks {
                    Some(r) => neighbors.sort_by_key(|nb| r[nb.index()]),
                    None => neighbors.sort(),
                }
                neighbors
            })
            .collect();

        let mut plan = Plan {
            starts: Vec::new(),
            preorder: Vec::with_capacity(n),
            children: vec![Vec::new(); n],
            ring_opens: vec![Vec::new(); n],
            ring_closes: vec![Vec::new(); n],
        };
        let mut visited = vec![false; n];
        let mut parent: Vec<Option<NodeIndex>> = vec![None; n];
        let mut is_closure: Vec<bool> = vec![false; mol.bond_count()];

        for &start in &starts {
            let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];
            visited[start.index()] = true;
            plan.preorder.push(start);

            while let Some((node, next)) = stack.last_mut() {
                let node = *node;
                let neighbors = &neighbor_lists[node.index()];
                if *next >= neighbors.len() {
                    stack.pop();
                    continue;
                }
                let neighbor = neighbors[*next];
                *next += 1;

                if !visited[neighbor.index()] {
                    visited[neighbor.index()] = true;
                    parent[neighbor.index()] = Some(node);
                    plan.children[node.index()].push(neighbor);
                    plan.preorder.push(neighbor);
                    stack.push((neighbor, 0));
                } else if parent[node.index()] != Some(neighbor) {
                    let Some(edge) = mol.bond_between(node, neighbor) else {
                        continue;
                    };
                    if !is_closure[edge.index()] {
                        is_closure[edge.index()] = true;
                        plan.ring_opens[neighbor.index()].push(edge);
                        plan.ring_closes[node.index()].push(edge);
                    }
                }
            }
        }

        plan.starts = starts;
        plan
    }

    fn write(&self, mol: &Mol, mode: Mode) -> String {
        let mut out = String::new();
        let mut digits = RingDigits::default();
        for (i, &start) in self.starts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            self.write_node(mol, start, mode, &mut digits, &mut out);
        }
        out
    }

    fn write_node(
        &self,
        mol: &Mol,
        node: NodeIndex,
        mode: Mode,
        digits: &mut RingDigits,
        out: &mut String,
    ) {
        write_atom_symbol(mol, node, mode, out);

        let mut released = Vec::new();
        for &edge in &self.ring_closes[node.index()] {
            if let Some(digit) = digits.close(edge) {
                write_ring_digit(digit, out);
                released.push(digit);
            }
        }
        for &edge in &self.ring_opens[node.index()] {
            if let Some(symbol) = bond_symbol(mol, edge, mode) {
                out.push(symbol);
            }
            write_ring_digit(digits.open(edge), out);
        }
        digits.release(&released);

        let kids = &self.children[node.index()];
        let Some(last) = kids.len().checked_sub(1) else {
            return;
        };
        for (i, &child) in kids.iter().enumerate() {
            let is_branch = i < last;
            if is_branch {
                out.push('(');
            }
            if let Some(symbol) = mol
                .bond_between(node, child)
                .and_then(|edge| bond_symbol(mol, edge, mode))
            {
                out.push(symbol);
            }
            self.write_node(mol, child, mode, digits, out);
            if is_branch {
                out.push(')');
            }
        }
    }
}

/// Ring-closure digits currently open, reused lowest-first once closed.
#[derive(Default)]
struct RingDigits {
    in_use: BTreeSet<u16>,
    by_edge: HashMap<EdgeIndex, u16>,
}

impl RingDigits {
    fn open(&mut self, edge: EdgeIndex) -> u16 {
        let digit = (1..)
            .find(|d| !self.in_use.contains(d))
            .unwrap_or(u16::MAX);
        self.in_use.insert(digit);
        self.by_edge.insert(edge, digit);
        digit
    }

    fn close(&mut self, edge: EdgeIndex) -> Option<u16> {
        self.by_edge.remove(&edge)
    }

    /// Digits closed at an atom become free only after that atom's own
    /// openings are assigned, so no atom closes and reopens the same digit.
    fn release(&mut self, closed: &[u16]) {
        for digit in closed {
            self.in_use.remove(digit);
        }
    }
}

fn bond_symbol(mol: &Mol, edge: EdgeIndex, mode: Mode) -> Option<char> {
    let bond = mol.bond(edge);
    match (mode, bond.order) {
        (Mode::Aromatic, _) if bond.is_aromatic => None,
        (_, BondOrder::Double) => Some('='),
        (_, BondOrder::Triple) => Some('#'),
        (Mode::Kekule, BondOrder::Single) => None,
        (Mode::Aromatic, BondOrder::Single) => {
            let (a, b) = mol.bond_endpoints(edge)?;
            (mol.atom(a).is_aromatic && mol.atom(b).is_aromatic).then_some('-')
        }
    }
}

fn write_ring_digit(digit: u16, out: &mut String) {
    if digit <= 9 {
        out.push(char::from(b'0' + digit as u8));
    } else {
        out.push('%');
        out.push_str(&digit.to_string());
    }
}

fn writes_lowercase(atom: &Atom, mode: Mode) -> bool {
    mode == Mode::Aromatic && atom.is_aromatic
}

fn write_atom_symbol(mol: &Mol, node: NodeIndex, mode: Mode, out: &mut String) {
    let atom = mol.atom(node);
    let elem = Element::from_atomic_num(atom.atomic_num);
    let lowercase = writes_lowercase(atom, mode);

    match elem {
        Some(e) if can_write_bare(mol, node, e, mode) => push_symbol(e, lowercase, out),
        _ => write_bracket_atom(atom, elem, lowercase, out),
    }
}

fn push_symbol(elem: Element, lowercase: bool, out: &mut String) {
    if lowercase {
        out.extend(elem.symbol().chars().map(|c| c.to_ascii_lowercase()));
    } else {
        out.push_str(elem.symbol());
    }
}

fn can_write_bare(mol: &Mol, node: NodeIndex, elem: Element, mode: Mode) -> bool {
    let atom = mol.atom(node);
    if !elem.is_organic_subset() || atom.isotope != 0 || atom.formal_charge != 0 {
        return false;
    }
    let lowercase = writes_lowercase(atom, mode);
    let bond_sum = reader_bond_order_sum(mol, node, mode);
    atom.hydrogen_count == implicit_hydrogens(elem, lowercase, bond_sum)
}

/// Bond order sum as the reader will compute it from the written bonds:
/// implicit aromatic bonds count 1, everything else its Kekulé order.
fn reader_bond_order_sum(mol: &Mol, node: NodeIndex, mode: Mode) -> u8 {
    mol.bonds_of(node)
        .map(|edge| {
            let bond = mol.bond(edge);
            if mode == Mode::Aromatic && bond.is_aromatic {
                1
            } else {
                bond.order.valence()
            }
        })
        .fold(0u8, u8::saturating_add)
}

fn write_bracket_atom(atom: &Atom, elem: Option<Element>, lowercase: bool, out: &mut String) {
    out.push('[');

    if atom.isotope != 0 {
        out.push_str(&atom.isotope.to_string());
    }

    match elem {
        Some(e) => push_symbol(e, lowercase, out),
        None => out.push('*'),
    }

    if atom.hydrogen_count > 0 {
        out.push('H');
        if atom.hydrogen_count > 1 {
            out.push_str(&atom.hydrogen_count.to_string());
        }
    }

    if atom.formal_charge > 0 {
        out.push('+');
        if atom.formal_charge > 1 {
            out.push_str(&atom.formal_charge.to_string());
        }
    } else if atom.formal_charge < 0 {
        out.push('-');
        if atom.formal_charge < -1 {
            out.push_str(&atom.formal_charge.unsigned_abs().to_string());
        }
    }

    out.push(']');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::from_smiles;

    fn round_trip(smiles: &str) -> (Mol, Mol, String) {
        let mol1 = from_smiles(smiles).unwrap();
        let written = to_smiles(&mol1);
        let mol2 = from_smiles(&written).unwrap_or_else(|e| {
            panic!("Failed to re-parse '{written}' (from '{smiles}'): {e}");
        });
        (mol1, mol2, written)
    }

    fn assert_same_structure(mol1: &Mol, mol2: &Mol, ctx: &str) {
        assert_eq!(mol1.atom_count(), mol2.atom_count(), "{ctx}: atom count");
        assert_eq!(mol1.bond_count(), mol2.bond_count(), "{ctx}: bond count");

        let mut e1: Vec<(u8, u8)> = mol1
            .atoms()
            .map(|n| (mol1.atom(n).atomic_num, mol1.atom(n).hydrogen_count))
            .collect();
        let mut e2: Vec<(u8, u8)> = mol2
            .atoms()
            .map(|n| (mol2.atom(n).atomic_num, mol2.atom(n).hydrogen_count))
            .collect();
        e1.sort();
        e2.sort();
        assert_eq!(e1, e2, "{ctx}: elements and hydrogens");
    }

    fn canon(smiles: &str) -> String {
        to_canonical_smiles(&from_smiles(smiles).unwrap())
    }

    fn canon_kekule(smiles: &str) -> String {
        to_canonical_kekule_smiles(&from_smiles(smiles).unwrap())
    }

    #[test]
    fn simple_chains() {
        for (input, expected) in [("C", "C"), ("CC", "CC"), ("O", "O"), ("[Fe]", "[Fe]")] {
            let (m1, m2, s) = round_trip(input);
            assert_eq!(s, expected);
            assert_same_structure(&m1, &m2, input);
        }
    }

    #[test]
    fn multiple_bonds_are_written() {
        let (m1, m2, s) = round_trip("CC(=O)O");
        assert!(s.contains('='));
        assert_same_structure(&m1, &m2, "acetic acid");
        let (_, _, s) = round_trip("C#C");
        assert!(s.contains('#'));
    }

    #[test]
    fn bracket_atoms_round_trip() {
        for input in ["[13C]", "[NH4+]", "[O-2]", "[Na+].[Cl-].O", "[CH2]"] {
            let (m1, m2, _) = round_trip(input);
            assert_same_structure(&m1, &m2, input);
        }
    }

    #[test]
    fn aromatic_round_trips() {
        for input in [
            "c1ccccc1",
            "c1ccncc1",
            "c1ccc2ccccc2c1",
            "Oc1ccccc1",
            "c1cc[nH]c1",
            "O=c1cc[nH]cc1",
            "c1ccc(-c2ccccc2)cc1",
        ] {
            let (m1, m2, s) = round_trip(input);
            assert_same_structure(&m1, &m2, input);
            assert!(s.contains('c'), "expected lowercase aromatic: {s}");
        }
    }

    #[test]
    fn branch_opening_with_a_bond_reads_back() {
        let input = "c1ccc(-c2ccccc2)cc1";
        let mol = from_smiles(input).unwrap();
        assert_eq!(to_smiles(&mol), input);

        for smiles in ["c1ccc(-c2ccccc2)cc1", "C1=CC=C(C=C1)C1=CC=NC=C1", "c1ccc(cc1)-c1ccc(cc1)-c1ccccc1"] {
            let written = canon(smiles);
            let reparsed = from_smiles(&written)
                .unwrap_or_else(|e| panic!("cannot re-read '{written}': {e}"));
            assert_eq!(to_canonical_smiles(&reparsed), written);
        }
    }

    #[test]
    fn empty_mol() {
        let mol = Mol::new();
        assert_eq!(to_smiles(&mol), "");
        assert_eq!(to_canonical_smiles(&mol), "");
    }

    #[test]
    fn benzene_literals() {
        assert_eq!(canon("C1=CC=CC=C1"), "c1ccccc1");
        assert_eq!(canon_kekule("c1ccccc1"), "C1=CC=CC=C1");
    }

    #[test]
    fn pyrrole_keeps_bracket_hydrogen() {
        assert!(canon("C1=CNC=C1").contains("[nH]"));
        assert!(!canon_kekule("c1cc[nH]c1").contains('['));
    }

    #[test]
    fn biphenyl_link_written_explicitly() {
        let s = canon("c1ccccc1-c1ccccc1");
        assert!(s.contains('-'), "{s}");
        assert_eq!(from_smiles(&s).unwrap().bond_count(), 13);
    }

    #[test]
    fn ring_digits_are_reused() {
        let s = canon("C1CC1.C1CCC1");
        assert!(!s.contains('2'), "{s}");
        let mol = from_smiles("C1CC1CC1CC1").unwrap();
        assert!(!to_smiles(&mol).contains('2'));
        let s = canon("c1ccc2ccccc2c1");
        assert!(s.contains('2'), "{s}");
    }

    #[test]
    fn canonical_is_atom_order_independent() {
        let pairs = [
            ("OCC", "CCO"),
            ("c1ccccc1C", "Cc1ccccc1"),
            ("C1=CC=C2C=CC=CC2=C1", "c1ccc2ccccc2c1"),
            ("Oc1ccncc1", "n1ccc(O)cc1"),
        ];
        for (a, b) in pairs {
            assert_eq!(canon(a), canon(b), "{a} vs {b}");
            assert_eq!(canon_kekule(a), canon_kekule(b), "{a} vs {b}");
        }
    }

    #[test]
    fn components_ordered_canonically() {
        assert_eq!(canon("O.CC"), canon("CC.O"));
    }

    #[test]
    fn kekule_output_round_trips() {
        for input in ["c1ccc2ccccc2c1", "Cn1cnc2c1c(=O)n(C)c(=O)n2C", "c1ccc2[nH]ccc2c1"] {
            let k = canon_kekule(input);
            assert!(!k.chars().any(|c| c.is_ascii_lowercase() && c != 'l' && c != 'r'), "{k}");
            let reparsed = from_smiles(&k).unwrap();
            assert_eq!(to_canonical_smiles(&reparsed), canon(input));
            assert_eq!(to_canonical_kekule_smiles(&reparsed), k);
        }
    }
}
