use serde::{Deserialize, Serialize};

/// Grams per atomic mass unit.
pub const AMU_TO_GRAMS: f64 = 1.66054e-24;
pub const NM_TO_CM: f64 = 1e-7;
pub const CM_TO_NM: f64 = 1e7;
pub const ANGSTROMS_PER_NM: f64 = 10.0;
/// Mass used to recognise hydrogens that carry no element information.
pub const HYDROGEN_MASS_AMU: f64 = 1.008;
/// Coulomb constant in kcal·Å/(mol·e²).
pub const COULOMB_CONSTANT: f64 = 332.06371;

/// Scale factors that map real units onto the dimensionless units of a snapshot.
///
/// `distance` is in Å, `mass` in amu and `energy` in kcal/mol. A value of 1 in
/// every field means the snapshot is in real units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceValues {
    pub distance: f64,
    pub mass: f64,
    pub energy: f64,
}

impl Default for ReferenceValues {
    fn default() -> Self {
        Self {
            distance: 1.0,
            mass: 1.0,
            energy: 1.0,
        }
    }
}

impl ReferenceValues {
    /// Factor converting a charge in e to reduced units.
    pub fn charge_factor(&self) -> f64 {
        (COULOMB_CONSTANT / (self.distance * self.energy)).sqrt()
    }

    pub fn is_valid(&self) -> bool {
        [self.distance, self.mass, self.energy]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reference_values_are_unity() {
        let r = ReferenceValues::default();
        assert_eq!((r.distance, r.mass, r.energy), (1.0, 1.0, 1.0));
        assert!(r.is_valid());
    }

    #[test]
    fn charge_factor_uses_coulomb_constant() {
        let r = ReferenceValues {
            distance: 3.5,
            mass: 12.011,
            energy: 0.066,
        };
        let expected = (332.06371f64 / (3.5 * 0.066)).sqrt();
        assert!((r.charge_factor() - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_or_negative_values_are_invalid() {
        let r = ReferenceValues {
            distance: 0.0,
            ..Default::default()
        };
        assert!(!r.is_valid());
        let r = ReferenceValues {
            energy: -1.0,
            ..Default::default()
        };
        assert!(!r.is_valid());
    }
}
