use super::atom::Particle;
use super::topology::BondOrder;
use nalgebra::{Point3, Vector3};
use std::sync::Arc;

/// An explicit bond between two particles of a template, by particle index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateBond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
}

/// A molecule template: particles in a local frame plus the bonds known up front.
///
/// Templates are owned by the caller and shared with a system through `Arc`,
/// so replicating a template never copies its particles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Molecule {
    pub name: String,
    particles: Vec<Particle>,
    bonds: Vec<TemplateBond>,
}

impl Molecule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn add_particle(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    /// Adds a bond between two particle indices.
    ///
    /// Returns `None` if either index is out of range or both indices are equal.
    /// Adding an existing bond is a no-op.
    pub fn add_bond(&mut self, i: usize, j: usize, order: BondOrder) -> Option<()> {
        if i == j || i >= self.particles.len() || j >= self.particles.len() {
            return None;
        }
        let exists = self
            .bonds
            .iter()
            .any(|b| (b.i == i && b.j == j) || (b.i == j && b.j == i));
        if !exists {
            self.bonds.push(TemplateBond { i, j, order });
        }
        Some(())
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bonds(&self) -> &[TemplateBond] {
        &self.bonds
    }

    pub fn n_particles(&self) -> usize {
        self.particles.len()
    }

    /// Total mass in amu.
    pub fn mass(&self) -> f64 {
        self.particles.iter().map(|p| p.mass).sum()
    }

    pub fn net_charge(&self) -> f64 {
        self.particles.iter().map(|p| p.charge).sum()
    }

    /// Geometric center of the particles, or the origin for an empty template.
    pub fn center(&self) -> Point3<f64> {
        if self.particles.is_empty() {
            return Point3::origin();
        }
        let sum: Vector3<f64> = self.particles.iter().map(|p| p.position.coords).sum();
        Point3::from(sum / self.particles.len() as f64)
    }

    /// A copy of this template with every particle shifted by `offset` (nm).
    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        let mut copy = self.clone();
        for particle in &mut copy.particles {
            particle.position += offset;
        }
        copy
    }
}

/// A molecule-like collection exposing its sub-molecules, e.g. `n` replicas of one template.
#[derive(Debug, Clone, Default)]
pub struct MoleculeSet {
    molecules: Vec<Arc<Molecule>>,
}

impl MoleculeSet {
    pub fn replicate(template: Arc<Molecule>, count: usize) -> Self {
        Self {
            molecules: std::iter::repeat_n(template, count).collect(),
        }
    }

    pub fn from_molecules(molecules: Vec<Arc<Molecule>>) -> Self {
        Self { molecules }
    }

    pub fn molecules(&self) -> &[Arc<Molecule>] {
        &self.molecules
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }
}
