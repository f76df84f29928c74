use super::molecule::Molecule;
use nalgebra::Vector3;

/// An orthorhombic simulation box with edge lengths in nanometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimBox {
    lengths: Vector3<f64>,
}

impl SimBox {
    /// Returns `None` unless every edge is finite and strictly positive.
    pub fn new(lx: f64, ly: f64, lz: f64) -> Option<Self> {
        let lengths = Vector3::new(lx, ly, lz);
        lengths
            .iter()
            .all(|l| l.is_finite() && *l > 0.0)
            .then_some(Self { lengths })
    }

    pub fn cubic(edge: f64) -> Option<Self> {
        Self::new(edge, edge, edge)
    }

    pub fn lengths(&self) -> [f64; 3] {
        [self.lengths.x, self.lengths.y, self.lengths.z]
    }

    pub fn center(&self) -> Vector3<f64> {
        self.lengths / 2.0
    }
}

/// The untyped geometric assembly produced by an assembler.
///
/// Each entry of `molecules` is a placed copy of a template with positions in the
/// box frame (origin at a corner).
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    molecules: Vec<Molecule>,
    sim_box: SimBox,
}

impl Structure {
    pub fn new(molecules: Vec<Molecule>, sim_box: SimBox) -> Self {
        Self { molecules, sim_box }
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn sim_box(&self) -> &SimBox {
        &self.sim_box
    }

    pub fn n_particles(&self) -> usize {
        self.molecules.iter().map(Molecule::n_particles).sum()
    }

    /// Total mass in amu.
    pub fn mass(&self) -> f64 {
        self.molecules.iter().map(Molecule::mass).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Particle;
    use nalgebra::Point3;

    #[test]
    fn sim_box_rejects_non_positive_edges() {
        assert!(SimBox::new(1.0, 0.0, 1.0).is_none());
        assert!(SimBox::new(1.0, -2.0, 1.0).is_none());
        assert!(SimBox::new(f64::NAN, 1.0, 1.0).is_none());
        assert!(SimBox::new(f64::INFINITY, 1.0, 1.0).is_none());
    }

    #[test]
    fn sim_box_lengths_and_center() {
        let b = SimBox::new(2.0, 3.0, 4.0).unwrap();
        assert_eq!(b.lengths(), [2.0, 3.0, 4.0]);
        assert_eq!(b.center(), Vector3::new(1.0, 1.5, 2.0));
        assert_eq!(SimBox::cubic(2.0).unwrap().lengths(), [2.0; 3]);
    }

    #[test]
    fn structure_sums_molecule_mass_and_particles() {
        let mut a = Molecule::new("A");
        a.add_particle(Particle::bead("A", 10.0, Point3::origin()));
        let mut b = Molecule::new("B");
        b.add_particle(Particle::bead("B", 2.5, Point3::origin()));
        b.add_particle(Particle::bead("B", 2.5, Point3::origin()));

        let s = Structure::new(vec![a, b], SimBox::cubic(1.0).unwrap());
        assert_eq!(s.n_particles(), 3);
        assert_eq!(s.mass(), 15.0);
        assert_eq!(s.molecules().len(), 2);
    }
}
