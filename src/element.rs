//! Periodic table lookups needed to read and write SMILES.

use std::fmt;

/// A chemical element, stored as its atomic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Element(u8);

static SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

impl Element {
    pub const H: Element = Element(1);
    pub const B: Element = Element(5);
    pub const C: Element = Element(6);
    pub const N: Element = Element(7);
    pub const O: Element = Element(8);
    pub const F: Element = Element(9);
    pub const NA: Element = Element(11);
    pub const SI: Element = Element(14);
    pub const P: Element = Element(15);
    pub const S: Element = Element(16);
    pub const CL: Element = Element(17);
    pub const FE: Element = Element(26);
    pub const AS: Element = Element(33);
    pub const SE: Element = Element(34);
    pub const BR: Element = Element(35);
    pub const TE: Element = Element(52);
    pub const I: Element = Element(53);

    pub fn from_atomic_num(n: u8) -> Option<Element> {
        (1..=SYMBOLS.len() as u8).contains(&n).then_some(Element(n))
    }

    pub fn from_symbol(s: &str) -> Option<Element> {
        SYMBOLS
            .iter()
            .position(|&sym| sym == s)
            .map(|i| Element(i as u8 + 1))
    }

    pub fn atomic_num(self) -> u8 {
        self.0
    }

    pub fn symbol(self) -> &'static str {
        SYMBOLS[usize::from(self.0) - 1]
    }

    /// Valences used to fill implicit hydrogens, lowest first.
    ///
    /// Empty for everything a bare SMILES atom cannot name; such atoms get
    /// no implicit hydrogens and are not valence checked.
    pub fn default_valences(self) -> &'static [u8] {
        match self.0 {
            1 | 9 | 17 | 35 | 85 => &[1],
            5 => &[3],
            6 | 14 | 32 => &[4],
            7 | 15 | 33 => &[3, 5],
            8 => &[2],
            16 | 34 | 52 => &[2, 4, 6],
            53 => &[1, 3, 5, 7],
            _ => &[],
        }
    }

    /// Whether the element may be written without brackets.
    pub fn is_organic_subset(self) -> bool {
        matches!(self.0, 5..=9 | 15..=17 | 35 | 53)
    }

    /// Whether a lowercase (aromatic) spelling exists for the element.
    pub fn has_aromatic_form(self) -> bool {
        matches!(self.0, 5..=8 | 15 | 16 | 33 | 34 | 52)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_and_numbers_agree() {
        for n in 1..=118u8 {
            let elem = Element::from_atomic_num(n).unwrap();
            assert_eq!(Element::from_symbol(elem.symbol()), Some(elem));
        }
        assert_eq!(Element::from_atomic_num(0), None);
        assert_eq!(Element::from_atomic_num(119), None);
        assert_eq!(Element::from_symbol("Xx"), None);
    }

    #[test]
    fn named_constants() {
        assert_eq!(Element::C.symbol(), "C");
        assert_eq!(Element::CL.symbol(), "Cl");
        assert_eq!(Element::SE.atomic_num(), 34);
        assert_eq!(Element::FE.to_string(), "Fe");
    }

    #[test]
    fn valences() {
        assert_eq!(Element::C.default_valences(), &[4]);
        assert_eq!(Element::N.default_valences(), &[3, 5]);
        assert_eq!(Element::S.default_valences(), &[2, 4, 6]);
        assert!(Element::FE.default_valences().is_empty());
    }

    #[test]
    fn organic_subset() {
        for elem in [Element::B, Element::C, Element::N, Element::O, Element::F] {
            assert!(elem.is_organic_subset());
        }
        assert!(Element::CL.is_organic_subset());
        assert!(Element::I.is_organic_subset());
        assert!(!Element::SE.is_organic_subset());
        assert!(!Element::NA.is_organic_subset());
        assert!(Element::SE.has_aromatic_form());
        assert!(!Element::CL.has_aromatic_form());
    }
}
