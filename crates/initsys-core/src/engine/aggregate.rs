use super::error::SystemError;
use crate::core::models::molecule::{Molecule, MoleculeSet};
use std::sync::Arc;

/// The shapes of molecule input a system accepts.
#[derive(Debug, Clone)]
pub enum MoleculeInput {
    /// One molecule-like object exposing its sub-molecules.
    Single(MoleculeSet),
    /// A list of molecule sets, flattened in order.
    Nested(Vec<MoleculeSet>),
}

impl From<MoleculeSet> for MoleculeInput {
    fn from(set: MoleculeSet) -> Self {
        MoleculeInput::Single(set)
    }
}

impl From<Vec<MoleculeSet>> for MoleculeInput {
    fn from(sets: Vec<MoleculeSet>) -> Self {
        MoleculeInput::Nested(sets)
    }
}

/// A flat, ordered collection of molecule instances.
#[derive(Debug, Clone)]
pub struct AggregatedMolecules {
    molecules: Vec<Arc<Molecule>>,
}

impl AggregatedMolecules {
    pub fn molecules(&self) -> &[Arc<Molecule>] {
        &self.molecules
    }

    pub fn n_molecules(&self) -> usize {
        self.molecules.len()
    }

    pub fn n_particles(&self) -> usize {
        self.molecules.iter().map(|m| m.n_particles()).sum()
    }

    /// Sum of template masses in amu.
    pub fn mass(&self) -> f64 {
        self.molecules.iter().map(|m| m.mass()).sum()
    }
}

/// Flattens molecule input into one ordered sequence.
///
/// Fails with [`SystemError::InvalidInput`] for an empty nested list, an input
/// yielding no molecules, or a molecule without particles.
pub fn aggregate(input: MoleculeInput) -> Result<AggregatedMolecules, SystemError> {
    let molecules: Vec<Arc<Molecule>> = match input {
        MoleculeInput::Single(set) => set.molecules().to_vec(),
        MoleculeInput::Nested(sets) => {
            if sets.is_empty() {
                return Err(SystemError::InvalidInput(
                    "nested molecule input is empty".to_string(),
                ));
            }
            sets.iter()
                .flat_map(|set| set.molecules().iter().cloned())
                .collect()
        }
    };

    if molecules.is_empty() {
        return Err(SystemError::InvalidInput(
            "molecule input contains no molecules".to_string(),
        ));
    }
    if let Some(empty) = molecules.iter().find(|m| m.n_particles() == 0) {
        return Err(SystemError::InvalidInput(format!(
            "molecule '{}' has no particles",
            empty.name
        )));
    }

    Ok(AggregatedMolecules { molecules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn single_set_is_flattened_in_order() {
        let methane = Arc::new(testing::methane());
        let aggregated = aggregate(MoleculeSet::replicate(methane, 3).into()).unwrap();
        assert_eq!(aggregated.n_molecules(), 3);
        assert_eq!(aggregated.n_particles(), 15);
    }

    #[test]
    fn nested_sets_preserve_order_and_sum_counts() {
        let methane = Arc::new(testing::methane());
        let water = Arc::new(testing::water());
        let input = vec![
            MoleculeSet::replicate(Arc::clone(&methane), 2),
            MoleculeSet::replicate(Arc::clone(&water), 3),
        ];
        let aggregated = aggregate(input.into()).unwrap();

        let names: Vec<_> = aggregated
            .molecules()
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["CH4", "CH4", "HOH", "HOH", "HOH"]);
        assert_eq!(aggregated.n_particles(), 2 * 5 + 3 * 3);
        let expected_mass = 2.0 * methane.mass() + 3.0 * water.mass();
        assert!((aggregated.mass() - expected_mass).abs() < 1e-9);
    }

    #[test]
    fn empty_inputs_are_invalid() {
        assert!(matches!(
            aggregate(MoleculeInput::Nested(Vec::new())),
            Err(SystemError::InvalidInput(_))
        ));
        assert!(matches!(
            aggregate(MoleculeSet::default().into()),
            Err(SystemError::InvalidInput(_))
        ));
    }

    #[test]
    fn molecule_without_particles_is_invalid() {
        let empty = Arc::new(Molecule::new("NIL"));
        let result = aggregate(MoleculeSet::replicate(empty, 1).into());
        assert!(matches!(result, Err(SystemError::InvalidInput(msg)) if msg.contains("NIL")));
    }
}
