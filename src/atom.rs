use crate::element::Element;

/// A heavy atom. Hydrogens are folded into `hydrogen_count` and never
/// appear as nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Atom {
    pub atomic_num: u8,
    pub formal_charge: i8,
    /// Mass number, 0 for natural abundance.
    pub isotope: u16,
    pub hydrogen_count: u8,
    pub is_aromatic: bool,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            atomic_num: element.atomic_num(),
            ..Self::default()
        }
    }

    pub fn with_hydrogens(mut self, hydrogen_count: u8) -> Self {
        self.hydrogen_count = hydrogen_count;
        self
    }

    pub fn with_charge(mut self, formal_charge: i8) -> Self {
        self.formal_charge = formal_charge;
        self
    }

    pub fn element(&self) -> Option<Element> {
        Element::from_atomic_num(self.atomic_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods() {
        let atom = Atom::new(Element::N).with_hydrogens(1).with_charge(1);
        assert_eq!(atom.atomic_num, 7);
        assert_eq!(atom.hydrogen_count, 1);
        assert_eq!(atom.formal_charge, 1);
        assert_eq!(atom.isotope, 0);
        assert!(!atom.is_aromatic);
        assert_eq!(atom.element(), Some(Element::N));
    }

    #[test]
    fn unknown_element() {
        assert_eq!(Atom::default().element(), None);
    }
}
