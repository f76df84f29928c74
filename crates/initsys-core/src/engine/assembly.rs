//! Strategies that place molecule copies into a simulation box.

use crate::core::models::molecule::Molecule;
use crate::core::models::structure::{SimBox, Structure};
use nalgebra::Vector3;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum AssemblyError {
    #[error("Nothing to assemble: the molecule list is empty")]
    NoMolecules,
    #[error("Invalid lattice spacing {0} nm: must be positive and finite")]
    InvalidSpacing(f64),
    #[error("Assembly failed: {0}")]
    Failed(String),
}

/// Builds an untyped geometric assembly from an ordered list of molecules.
///
/// The returned [`Structure`] holds one placed copy per input molecule, in input order.
pub trait Assembler {
    fn assemble(&self, molecules: &[Arc<Molecule>]) -> Result<Structure, AssemblyError>;
}

impl<F> Assembler for F
where
    F: Fn(&[Arc<Molecule>]) -> Result<Structure, AssemblyError>,
{
    fn assemble(&self, molecules: &[Arc<Molecule>]) -> Result<Structure, AssemblyError> {
        self(molecules)
    }
}

/// Centers each molecule on a site of a simple cubic lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeAssembler {
    /// Distance between neighboring lattice sites in nm.
    pub spacing: f64,
}

impl LatticeAssembler {
    pub fn new(spacing: f64) -> Self {
        Self { spacing }
    }
}

impl Assembler for LatticeAssembler {
    fn assemble(&self, molecules: &[Arc<Molecule>]) -> Result<Structure, AssemblyError> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(AssemblyError::InvalidSpacing(self.spacing));
        }
        if molecules.is_empty() {
            return Err(AssemblyError::NoMolecules);
        }

        let n_side = sites_per_side(molecules.len());
        let edge = n_side as f64 * self.spacing;
        let sim_box = SimBox::cubic(edge)
            .ok_or_else(|| AssemblyError::Failed(format!("invalid box edge {edge}")))?;

        let placed = molecules
            .iter()
            .enumerate()
            .map(|(i, molecule)| {
                let (ix, iy, iz) = (i % n_side, (i / n_side) % n_side, i / (n_side * n_side));
                let site = Vector3::new(ix as f64, iy as f64, iz as f64).add_scalar(0.5)
                    * self.spacing;
                molecule.translated(&(site - molecule.center().coords))
            })
            .collect();

        debug!(
            molecules = molecules.len(),
            n_side, edge, "Placed molecules on a cubic lattice."
        );
        Ok(Structure::new(placed, sim_box))
    }
}

/// Smallest `n` with `n³ >= count`.
fn sites_per_side(count: usize) -> usize {
    let mut n = 1;
    while n * n * n < count {
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn sites_per_side_is_ceiling_cube_root() {
        assert_eq!(sites_per_side(1), 1);
        assert_eq!(sites_per_side(8), 2);
        assert_eq!(sites_per_side(9), 3);
        assert_eq!(sites_per_side(27), 3);
        assert_eq!(sites_per_side(28), 4);
    }

    #[test]
    fn lattice_places_every_molecule_inside_the_box() {
        let methane = Arc::new(testing::methane());
        let molecules = vec![methane; 10];
        let structure = LatticeAssembler::new(1.0).assemble(&molecules).unwrap();

        assert_eq!(structure.molecules().len(), 10);
        assert_eq!(structure.sim_box().lengths(), [3.0, 3.0, 3.0]);
        for molecule in structure.molecules() {
            for particle in molecule.particles() {
                assert!(particle.position.iter().all(|&c| (0.0..3.0).contains(&c)));
            }
        }
        let first = structure.molecules()[0].center();
        assert!((first - nalgebra::Point3::new(0.5, 0.5, 0.5)).norm() < 1e-12);
        let second = structure.molecules()[1].center();
        assert!((second - nalgebra::Point3::new(1.5, 0.5, 0.5)).norm() < 1e-12);
    }

    #[test]
    fn assembly_preserves_mass_and_particle_count() {
        let water = Arc::new(testing::water());
        let molecules = vec![Arc::clone(&water); 5];
        let structure = LatticeAssembler::new(0.5).assemble(&molecules).unwrap();
        assert_eq!(structure.n_particles(), 15);
        assert!((structure.mass() - 5.0 * water.mass()).abs() < 1e-9);
    }

    #[test]
    fn invalid_spacing_and_empty_input_are_rejected() {
        let methane = Arc::new(testing::methane());
        assert_eq!(
            LatticeAssembler::new(0.0).assemble(&[methane]),
            Err(AssemblyError::InvalidSpacing(0.0))
        );
        assert_eq!(
            LatticeAssembler::new(1.0).assemble(&[]),
            Err(AssemblyError::NoMolecules)
        );
    }

    #[test]
    fn closures_are_assemblers() {
        let fixed_box = |molecules: &[Arc<Molecule>]| -> Result<Structure, AssemblyError> {
            let placed = molecules.iter().map(|m| (**m).clone()).collect();
            Ok(Structure::new(placed, SimBox::cubic(4.0).unwrap()))
        };
        let structure = fixed_box
            .assemble(&[Arc::new(testing::methane())])
            .unwrap();
        assert_eq!(structure.sim_box().lengths(), [4.0; 3]);
    }
}
