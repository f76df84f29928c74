//! Density-driven box sizing.
//!
//! Given a total mass and a target density, solves for the box edge lengths that
//! reproduce the density, optionally holding one or two edges fixed.

use super::config::BoxConstraints;
use crate::core::units::{AMU_TO_GRAMS, CM_TO_NM, NM_TO_CM};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum BoxError {
    #[error("Invalid box sizing input: {0}")]
    InvalidInput(String),
    #[error("All three box edges are fixed; the density cannot be matched independently")]
    OverConstrained,
}

/// Required volume in cm³ for `mass_amu` at `density` g/cm³.
pub fn required_volume(mass_amu: f64, density: f64) -> Result<f64, BoxError> {
    ensure_positive("mass", mass_amu)?;
    ensure_positive("density", density)?;
    Ok(mass_amu * AMU_TO_GRAMS / density)
}

/// Length (nm) of each free edge, given the fixed edges in nm.
///
/// With no fixed edge the result is the edge of a cube; with one fixed edge it is
/// the edge of the square cross-section; with two it is the remaining edge.
pub fn calculate_free_length(
    mass_amu: f64,
    density: f64,
    fixed_edges_nm: &[f64],
) -> Result<f64, BoxError> {
    let volume = required_volume(mass_amu, density)?;
    for &edge in fixed_edges_nm {
        ensure_positive("fixed edge", edge)?;
    }

    let fixed_cm: Vec<f64> = fixed_edges_nm.iter().map(|l| l * NM_TO_CM).collect();
    let length_cm = match fixed_cm.as_slice() {
        [] => volume.cbrt(),
        [f] => (volume / f).sqrt(),
        [f1, f2] => volume / (f1 * f2),
        _ => return Err(BoxError::OverConstrained),
    };
    Ok(length_cm * CM_TO_NM)
}

/// Edge lengths `[Lx, Ly, Lz]` in nm; constrained axes keep their value.
pub fn calculate_edge_lengths(
    mass_amu: f64,
    density: f64,
    constraints: &BoxConstraints,
) -> Result<[f64; 3], BoxError> {
    let free = calculate_free_length(mass_amu, density, &constraints.fixed())?;
    Ok(constraints.as_array().map(|fixed| fixed.unwrap_or(free)))
}

fn ensure_positive(name: &str, value: f64) -> Result<(), BoxError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BoxError::InvalidInput(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}
