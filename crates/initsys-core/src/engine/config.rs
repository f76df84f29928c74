use crate::core::units::ReferenceValues;
use thiserror::Error;

pub const DEFAULT_R_CUT: f64 = 2.5;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Settings fixed when a [`System`](crate::workflows::system::System) is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    /// Target density in g/cm³.
    pub density: f64,
    /// Default interaction cutoff, carried into [`SystemConfig::forcefield_options`].
    pub r_cut: f64,
    /// Non-dimensionalize the untyped snapshot.
    pub auto_scale: bool,
    /// Explicit reference values overriding `auto_scale`.
    pub base_units: Option<ReferenceValues>,
}

impl SystemConfig {
    /// Default force-field options with this system's cutoff.
    pub fn forcefield_options(&self) -> ForcefieldOptions {
        ForcefieldOptions {
            r_cut: self.r_cut,
            ..Default::default()
        }
    }
}

#[derive(Default)]
pub struct SystemConfigBuilder {
    density: Option<f64>,
    r_cut: Option<f64>,
    auto_scale: Option<bool>,
    base_units: Option<ReferenceValues>,
}

impl SystemConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }
    pub fn r_cut(mut self, r_cut: f64) -> Self {
        self.r_cut = Some(r_cut);
        self
    }
    pub fn auto_scale(mut self, auto_scale: bool) -> Self {
        self.auto_scale = Some(auto_scale);
        self
    }
    pub fn base_units(mut self, base_units: ReferenceValues) -> Self {
        self.base_units = Some(base_units);
        self
    }

    pub fn build(self) -> Result<SystemConfig, ConfigError> {
        let density = self
            .density
            .ok_or(ConfigError::MissingParameter("density"))?;
        if !(density.is_finite() && density > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "density",
                reason: format!("must be a positive number, got {density}"),
            });
        }
        let r_cut = self.r_cut.unwrap_or(DEFAULT_R_CUT);
        if !(r_cut.is_finite() && r_cut > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "r_cut",
                reason: format!("must be a positive number, got {r_cut}"),
            });
        }
        if let Some(units) = &self.base_units {
            if !units.is_valid() {
                return Err(ConfigError::InvalidParameter {
                    name: "base_units",
                    reason: "reference values must be positive".to_string(),
                });
            }
        }
        Ok(SystemConfig {
            density,
            r_cut,
            auto_scale: self.auto_scale.unwrap_or(false),
            base_units: self.base_units,
        })
    }
}

/// Whether typing may reuse per-residue assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResidueMapPolicy {
    /// Use the residue map only when the system holds exactly one molecule.
    #[default]
    Auto,
    Always,
    Never,
}

impl ResidueMapPolicy {
    pub fn resolve(&self, n_molecules: usize) -> bool {
        match self {
            ResidueMapPolicy::Auto => n_molecules == 1,
            ResidueMapPolicy::Always => true,
            ResidueMapPolicy::Never => false,
        }
    }
}

/// Options for [`System::apply_forcefield`](crate::workflows::system::System::apply_forcefield).
#[derive(Debug, Clone, PartialEq)]
pub struct ForcefieldOptions {
    pub remove_hydrogens: bool,
    pub scale_parameters: bool,
    pub remove_charges: bool,
    pub make_charge_neutral: bool,
    pub r_cut: f64,
    pub residue_map: ResidueMapPolicy,
}

impl Default for ForcefieldOptions {
    fn default() -> Self {
        Self {
            remove_hydrogens: false,
            scale_parameters: true,
            remove_charges: false,
            make_charge_neutral: false,
            r_cut: DEFAULT_R_CUT,
            residue_map: ResidueMapPolicy::default(),
        }
    }
}

/// Box edges (nm) to hold fixed when sizing the target box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxConstraints {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl BoxConstraints {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn as_array(&self) -> [Option<f64>; 3] {
        [self.x, self.y, self.z]
    }

    pub fn fixed(&self) -> Vec<f64> {
        self.as_array().into_iter().flatten().collect()
    }
}
