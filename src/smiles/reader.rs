//! Single-pass SMILES reader.
//!
//! Atoms and bonds are added to the molecule as they are met. Aromatic
//! input is kept as written (lowercase atoms, aromatic bonds with an
//! unassigned Kekulé order); [`crate::kekulize`] resolves it afterwards.
//! Stereo marks are read and dropped.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;

use super::error::SmilesError;
use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::mol::Mol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BondSymbol {
    Single,
    Double,
    Triple,
    Aromatic,
}

struct RingOpening {
    atom: NodeIndex,
    bond: Option<BondSymbol>,
}

struct Reader<'a> {
    text: &'a str,
    pos: usize,
    mol: Mol,
    bare: Vec<bool>,
    prev: Option<NodeIndex>,
    branches: Vec<(NodeIndex, usize)>,
    pending: Option<(BondSymbol, usize)>,
    rings: BTreeMap<u16, RingOpening>,
}

/// Read the structure column of `line` into a molecule.
///
/// Leading whitespace is skipped and everything after the next run of
/// whitespace is ignored.
pub(crate) fn read(line: &str) -> Result<Mol, SmilesError> {
    let text = line
        .split_whitespace()
        .next()
        .ok_or(SmilesError::EmptyInput)?;
    let mol = Reader::new(text).run()?;
    if mol.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    Ok(mol)
}

/// Hydrogens implied on an atom written without brackets: the lowest
/// default valence that holds its bonds, less one more for aromatic atoms.
pub(crate) fn implicit_hydrogens(element: Element, is_aromatic: bool, bond_sum: u8) -> u8 {
    let Some(valence) = element
        .default_valences()
        .iter()
        .copied()
        .find(|&v| v >= bond_sum)
    else {
        return 0;
    };
    let hydrogens = valence - bond_sum;
    if is_aromatic && hydrogens > 0 {
        hydrogens - 1
    } else {
        hydrogens
    }
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            mol: Mol::new(),
            bare: Vec::new(),
            prev: None,
            branches: Vec::new(),
            pending: None,
            rings: BTreeMap::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn unexpected(&self, pos: usize) -> SmilesError {
        let ch = self.text[pos..].chars().next().unwrap_or('\0');
        SmilesError::UnexpectedChar { pos, ch }
    }

    fn run(mut self) -> Result<Mol, SmilesError> {
        while let Some(b) = self.peek() {
            match b {
                b'(' => self.open_branch()?,
                b')' => self.close_branch()?,
                b'.' => {
                    self.no_dangling_bond()?;
                    self.prev = None;
                    self.pos += 1;
                }
                b'-' | b'=' | b'#' | b':' | b'/' | b'\\' => self.bond_symbol(b)?,
                b'0'..=b'9' | b'%' => self.ring_bond()?,
                b'[' => self.bracket_atom()?,
                _ => self.bare_atom()?,
            }
        }

        self.no_dangling_bond()?;
        if let Some(&(_, pos)) = self.branches.last() {
            return Err(SmilesError::UnmatchedParen { pos });
        }
        if let Some(&digit) = self.rings.keys().next() {
            return Err(SmilesError::UnclosedRing { digit });
        }

        for idx in self.mol.atoms().collect::<Vec<_>>() {
            if !self.bare[idx.index()] {
                continue;
            }
            let atom = self.mol.atom(idx);
            let Some(element) = atom.element() else {
                continue;
            };
            let hydrogens =
                implicit_hydrogens(element, atom.is_aromatic, self.mol.bond_order_sum(idx));
            self.mol.atom_mut(idx).hydrogen_count = hydrogens;
        }
        Ok(self.mol)
    }

    fn no_dangling_bond(&self) -> Result<(), SmilesError> {
        match self.pending {
            Some((_, pos)) => Err(SmilesError::DanglingBond { pos }),
            None => Ok(()),
        }
    }

    fn open_branch(&mut self) -> Result<(), SmilesError> {
        self.no_dangling_bond()?;
        let Some(atom) = self.prev else {
            return Err(self.unexpected(self.pos));
        };
        self.branches.push((atom, self.pos));
        self.pos += 1;
        Ok(())
    }

    fn close_branch(&mut self) -> Result<(), SmilesError> {
        self.no_dangling_bond()?;
        let Some((atom, _)) = self.branches.pop() else {
            return Err(SmilesError::UnmatchedParen { pos: self.pos });
        };
        self.prev = Some(atom);
        self.pos += 1;
        Ok(())
    }

    fn bond_symbol(&mut self, b: u8) -> Result<(), SmilesError> {
        if self.pending.is_some() {
            return Err(self.unexpected(self.pos));
        }
        let symbol = match b {
            b'=' => BondSymbol::Double,
            b'#' => BondSymbol::Triple,
            b':' => BondSymbol::Aromatic,
            _ => BondSymbol::Single,
        };
        self.pending = Some((symbol, self.pos));
        self.pos += 1;
        Ok(())
    }

    fn ring_bond(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let text = self.text;
        let digit = if self.peek() == Some(b'%') {
            let digits = text
                .get(start + 1..start + 3)
                .filter(|d| d.bytes().all(|b| b.is_ascii_digit()))
                .ok_or_else(|| self.unexpected(start))?;
            self.pos += 3;
            digits.parse::<u16>().map_err(|_| self.unexpected(start))?
        } else {
            self.pos += 1;
            u16::from(text.as_bytes()[start] - b'0')
        };

        let Some(atom) = self.prev else {
            return Err(SmilesError::InvalidRingBond { digit, pos: start });
        };
        let bond = self.pending.take().map(|(symbol, _)| symbol);

        let Some(opening) = self.rings.remove(&digit) else {
            self.rings.insert(digit, RingOpening { atom, bond });
            return Ok(());
        };
        if opening.atom == atom {
            return Err(SmilesError::SelfBond { digit });
        }
        if self.mol.bond_between(opening.atom, atom).is_some() {
            return Err(SmilesError::DuplicateBond { digit });
        }
        let symbol = match (opening.bond, bond) {
            (Some(a), Some(b)) if a != b => return Err(SmilesError::RingBondConflict { digit }),
            (a, b) => a.or(b),
        };
        self.connect(opening.atom, atom, symbol);
        Ok(())
    }

    fn connect(&mut self, a: NodeIndex, b: NodeIndex, symbol: Option<BondSymbol>) {
        let bond = match symbol {
            Some(BondSymbol::Single) => Bond::new(BondOrder::Single),
            Some(BondSymbol::Double) => Bond::new(BondOrder::Double),
            Some(BondSymbol::Triple) => Bond::new(BondOrder::Triple),
            Some(BondSymbol::Aromatic) => Bond::aromatic(),
            None if self.mol.atom(a).is_aromatic && self.mol.atom(b).is_aromatic => {
                Bond::aromatic()
            }
            None => Bond::default(),
        };
        self.mol.add_bond(a, b, bond);
    }

    fn push_atom(&mut self, atom: Atom, bare: bool) -> Result<(), SmilesError> {
        let idx = self.mol.add_atom(atom);
        self.bare.push(bare);
        let symbol = self.pending.take();
        match (self.prev, symbol) {
            (Some(prev), symbol) => self.connect(prev, idx, symbol.map(|(s, _)| s)),
            (None, Some((_, pos))) => return Err(SmilesError::DanglingBond { pos }),
            (None, None) => {}
        }
        self.prev = Some(idx);
        Ok(())
    }

    fn bare_atom(&mut self) -> Result<(), SmilesError> {
        let rest = &self.text.as_bytes()[self.pos..];
        let (element, aromatic, len) = match rest {
            [b'C', b'l', ..] => (Element::CL, false, 2),
            [b'B', b'r', ..] => (Element::BR, false, 2),
            [b'B', ..] => (Element::B, false, 1),
            [b'C', ..] => (Element::C, false, 1),
            [b'N', ..] => (Element::N, false, 1),
            [b'O', ..] => (Element::O, false, 1),
            [b'P', ..] => (Element::P, false, 1),
            [b'S', ..] => (Element::S, false, 1),
            [b'F', ..] => (Element::F, false, 1),
            [b'I', ..] => (Element::I, false, 1),
            [b'b', ..] => (Element::B, true, 1),
            [b'c', ..] => (Element::C, true, 1),
            [b'n', ..] => (Element::N, true, 1),
            [b'o', ..] => (Element::O, true, 1),
            [b'p', ..] => (Element::P, true, 1),
            [b's', ..] => (Element::S, true, 1),
            _ => return Err(self.unexpected(self.pos)),
        };
        self.pos += len;
        let mut atom = Atom::new(element);
        atom.is_aromatic = aromatic;
        self.push_atom(atom, true)
    }

    fn bracket_atom(&mut self) -> Result<(), SmilesError> {
        let start = self.pos;
        let Some(len) = self.text[start..].find(']') else {
            return Err(SmilesError::UnclosedBracket { pos: start });
        };
        let atom = parse_bracket(&self.text[start + 1..start + len], start + 1)?;
        self.pos = start + len + 1;
        self.push_atom(atom, false)
    }
}

const AROMATIC_BRACKET_SYMBOLS: [(&str, Element); 9] = [
    ("se", Element::SE),
    ("as", Element::AS),
    ("te", Element::TE),
    ("b", Element::B),
    ("c", Element::C),
    ("n", Element::N),
    ("o", Element::O),
    ("p", Element::P),
    ("s", Element::S),
];

const CHIRAL_CLASSES: [&str; 5] = ["TH", "AL", "SP", "TB", "OH"];

fn digits_at(s: &str, from: usize) -> usize {
    s[from..].bytes().take_while(u8::is_ascii_digit).count()
}

/// `isotope? symbol chirality? hcount? charge? class?`, the text between
/// the brackets. `offset` is the position of that text in the input.
fn parse_bracket(body: &str, offset: usize) -> Result<Atom, SmilesError> {
    let bytes = body.as_bytes();
    let mut i = digits_at(body, 0);
    let isotope = if i > 0 {
        body[..i]
            .parse::<u16>()
            .map_err(|_| SmilesError::InvalidElement {
                pos: offset,
                text: body[..i].to_string(),
            })?
    } else {
        0
    };

    let (element, aromatic, len) =
        bracket_symbol(&body[i..]).ok_or_else(|| SmilesError::InvalidElement {
            pos: offset + i,
            text: body[i..].chars().take(2).collect(),
        })?;
    i += len;

    while bytes.get(i) == Some(&b'@') {
        i += 1;
    }
    if let Some(class) = CHIRAL_CLASSES.iter().find(|c| body[i..].starts_with(*c)) {
        i += class.len();
        i += digits_at(body, i);
    }

    let mut hydrogens = 0;
    if bytes.get(i) == Some(&b'H') {
        i += 1;
        let n = digits_at(body, i);
        hydrogens = if n == 0 {
            1
        } else {
            body[i..i + n]
                .parse::<u8>()
                .map_err(|_| SmilesError::InvalidCharge { pos: offset + i })?
        };
        i += n;
    }

    let mut charge: i8 = 0;
    if let Some(&sign @ (b'+' | b'-')) = bytes.get(i) {
        let unit: i8 = if sign == b'+' { 1 } else { -1 };
        let charge_pos = offset + i;
        i += 1;
        let n = digits_at(body, i);
        if n > 0 {
            let magnitude = body[i..i + n]
                .parse::<i8>()
                .map_err(|_| SmilesError::InvalidCharge { pos: charge_pos })?;
            charge = unit * magnitude;
            i += n;
        } else {
            charge = unit;
            while bytes.get(i) == Some(&sign) {
                charge = charge
                    .checked_add(unit)
                    .ok_or(SmilesError::InvalidCharge { pos: charge_pos })?;
                i += 1;
            }
        }
    }

    if bytes.get(i) == Some(&b':') {
        let n = digits_at(body, i + 1);
        if n == 0 {
            return Err(SmilesError::UnexpectedChar {
                pos: offset + i,
                ch: ':',
            });
        }
        i += 1 + n;
    }

    if let Some(ch) = body[i..].chars().next() {
        return Err(SmilesError::UnexpectedChar {
            pos: offset + i,
            ch,
        });
    }

    Ok(Atom {
        atomic_num: element.atomic_num(),
        formal_charge: charge,
        isotope,
        hydrogen_count: hydrogens,
        is_aromatic: aromatic,
    })
}

fn bracket_symbol(s: &str) -> Option<(Element, bool, usize)> {
    if s.starts_with(|c: char| c.is_ascii_lowercase()) {
        return AROMATIC_BRACKET_SYMBOLS
            .iter()
            .find(|(sym, _)| s.starts_with(sym))
            .map(|&(sym, elem)| (elem, true, sym.len()));
    }
    let two = s
        .get(..2)
        .filter(|t| t.as_bytes()[1].is_ascii_lowercase())
        .and_then(Element::from_symbol);
    if let Some(elem) = two {
        return Some((elem, false, 2));
    }
    s.get(..1)
        .and_then(Element::from_symbol)
        .map(|elem| (elem, false, 1))
}
