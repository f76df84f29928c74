use super::element::{self, ElementInfo};
use super::ids::ResidueId;
use nalgebra::Point3;

/// Atomic number used for particles without a chemical element, such as coarse-grained beads.
pub const NO_ELEMENT: u8 = 0;

/// A particle of a molecule template, before it is placed in a topology.
///
/// Positions are in nanometers, masses in amu and charges in elementary charge units.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// The name of the particle (e.g., "C1", "H3", "_B").
    pub name: String,
    /// The atomic number, or [`NO_ELEMENT`] for beads.
    pub atomic_number: u8,
    pub position: Point3<f64>,
    pub mass: f64,
    pub charge: f64,
}

impl Particle {
    /// Creates a particle for a known element, taking the element's standard mass.
    ///
    /// Returns `None` if the symbol is not a known element.
    pub fn from_element(name: &str, symbol: &str, position: Point3<f64>) -> Option<Self> {
        let info = element::lookup(symbol)?;
        Some(Self {
            name: name.to_string(),
            atomic_number: info.atomic_number,
            position,
            mass: info.mass,
            charge: 0.0,
        })
    }

    /// Creates an element-less bead with an explicit mass.
    pub fn bead(name: &str, mass: f64, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            atomic_number: NO_ELEMENT,
            position,
            mass,
            charge: 0.0,
        }
    }

    pub fn with_charge(mut self, charge: f64) -> Self {
        self.charge = charge;
        self
    }

    pub fn element(&self) -> Option<&'static ElementInfo> {
        element::by_atomic_number(self.atomic_number)
    }
}

/// An atom inside a [`MolecularGraph`](super::graph::MolecularGraph).
///
/// Carries the particle data plus its owning residue and, once a force field
/// has been applied, its force field type.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub name: String,
    /// The ID of the residue (molecule instance) this atom belongs to.
    pub residue_id: ResidueId,
    pub atomic_number: u8,
    /// Position in nanometers.
    pub position: Point3<f64>,
    /// Mass in amu.
    pub mass: f64,
    /// Partial charge in elementary charge units.
    pub charge: f64,
    /// The force field atom type (e.g., "opls_145"), set by typing.
    pub force_field_type: Option<String>,
}

impl Atom {
    pub fn from_particle(particle: &Particle, residue_id: ResidueId) -> Self {
        Self {
            name: particle.name.clone(),
            residue_id,
            atomic_number: particle.atomic_number,
            position: particle.position,
            mass: particle.mass,
            charge: particle.charge,
            force_field_type: None,
        }
    }

    pub fn element(&self) -> Option<&'static ElementInfo> {
        element::by_atomic_number(self.atomic_number)
    }

    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == 1
    }

    /// The type name used in snapshots: the force field type if typed, else the atom name.
    pub fn type_name(&self) -> &str {
        self.force_field_type.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_element_uses_standard_mass() {
        let p = Particle::from_element("C1", "c", Point3::new(0.1, 0.2, 0.3)).unwrap();
        assert_eq!(p.atomic_number, 6);
        assert_eq!(p.mass, 12.011);
        assert_eq!(p.charge, 0.0);
        assert_eq!(p.position, Point3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn from_element_rejects_unknown_symbol() {
        assert!(Particle::from_element("X", "Qq", Point3::origin()).is_none());
    }

    #[test]
    fn bead_has_no_element() {
        let bead = Particle::bead("_B", 78.11, Point3::origin()).with_charge(0.5);
        assert_eq!(bead.atomic_number, NO_ELEMENT);
        assert!(bead.element().is_none());
        assert_eq!(bead.charge, 0.5);
    }

    #[test]
    fn atom_from_particle_copies_fields_and_is_untyped() {
        let residue_id = ResidueId::default();
        let p = Particle::from_element("H1", "H", Point3::new(1.0, 0.0, 0.0))
            .unwrap()
            .with_charge(0.1);
        let atom = Atom::from_particle(&p, residue_id);

        assert_eq!(atom.name, "H1");
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.mass, 1.008);
        assert_eq!(atom.charge, 0.1);
        assert!(atom.is_hydrogen());
        assert_eq!(atom.force_field_type, None);
        assert_eq!(atom.type_name(), "H1");
    }

    #[test]
    fn type_name_prefers_force_field_type() {
        let p = Particle::from_element("C1", "C", Point3::origin()).unwrap();
        let mut atom = Atom::from_particle(&p, ResidueId::default());
        atom.force_field_type = Some("opls_145".to_string());
        assert_eq!(atom.type_name(), "opls_145");
    }
}
