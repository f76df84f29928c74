use super::ids::AtomId;

/// One molecule instance inside a [`MolecularGraph`](super::graph::MolecularGraph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    /// Template name shared by all instances of the same molecule.
    pub name: String,
    pub(crate) atoms: Vec<AtomId>,
}

impl Residue {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            atoms: Vec::new(),
        }
    }

    /// Atom IDs in template order.
    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub(crate) fn remove_atom(&mut self, atom_id: AtomId) {
        self.atoms.retain(|&id| id != atom_id);
    }
}
