use thiserror::Error;

use super::assembly::AssemblyError;
use super::box_sizer::BoxError;
use super::config::ConfigError;
use super::typify::TypifyError;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Invalid molecule input: {0}")]
    InvalidInput(String),

    #[error("The force field has not been applied; call `apply_forcefield` first")]
    UnappliedForceField,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Box(#[from] BoxError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Typify(#[from] TypifyError),
}
