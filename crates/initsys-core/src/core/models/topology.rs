use super::ids::AtomId;
use serde::Deserialize;

/// Bond multiplicity as written in molecule templates (`"1"`, `"2"`, `"3"`, `"ar"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum BondOrder {
    #[default]
    #[serde(rename = "1", alias = "single")]
    Single,
    #[serde(rename = "2", alias = "double")]
    Double,
    #[serde(rename = "3", alias = "triple")]
    Triple,
    #[serde(rename = "ar", alias = "aromatic")]
    Aromatic,
}

impl BondOrder {
    /// Valence consumed on each end of the bond.
    pub fn multiplicity(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    ends: [AtomId; 2],
    pub order: BondOrder,
}

impl Bond {
    pub fn new(a: AtomId, b: AtomId, order: BondOrder) -> Self {
        Self { ends: [a, b], order }
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.ends.contains(&atom_id)
    }

    pub fn atoms(&self) -> [AtomId; 2] {
        self.ends
    }
}

/// Three atoms `a-b-c` where `b` is bonded to both `a` and `c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Angle {
    pub atoms: [AtomId; 3],
}

impl Angle {
    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atoms.contains(&atom_id)
    }
}

/// A proper dihedral `a-b-c-d` around the central bond `b-c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dihedral {
    pub atoms: [AtomId; 4],
}

impl Dihedral {
    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atoms.contains(&atom_id)
    }
}
