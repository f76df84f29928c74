use super::error::SystemError;
use super::export::{ForceTerm, Snapshot};
use crate::core::forcefield::typed::TypedTopology;
use crate::core::units::ReferenceValues;

/// Everything a successful force-field application produces, kept together.
#[derive(Debug, Clone)]
pub struct AppliedForcefield {
    pub typed_system: TypedTopology,
    pub snapshot: Snapshot,
    pub forcefield: Vec<ForceTerm>,
    pub reference_values: ReferenceValues,
}

#[derive(Debug, Clone, Default)]
pub enum ForcefieldState {
    #[default]
    Unapplied,
    Applied(Box<AppliedForcefield>),
}

impl ForcefieldState {
    pub fn is_applied(&self) -> bool {
        matches!(self, ForcefieldState::Applied(_))
    }

    pub fn applied(&self) -> Result<&AppliedForcefield, SystemError> {
        match self {
            ForcefieldState::Applied(applied) => Ok(applied),
            ForcefieldState::Unapplied => Err(SystemError::UnappliedForceField),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unapplied_state_refuses_access() {
        let state = ForcefieldState::default();
        assert!(!state.is_applied());
        assert!(matches!(
            state.applied(),
            Err(SystemError::UnappliedForceField)
        ));
    }
}
