//! # Engine Module
//!
//! The stateful stages that turn molecule templates into a simulation-ready system.
//!
//! ## Pipeline
//!
//! Molecule input is flattened by [`aggregate`], placed into a box by an
//! [`assembly::Assembler`], converted into a bonded topology by [`convert`], and, on
//! demand, typed and exported by [`typify`] and [`export`]. [`box_sizer`] derives target
//! box dimensions from a mass and a density at any point after aggregation.
//!
//! - **Configuration** ([`config`]) - System settings, force-field options, box constraints
//! - **State** ([`state`]) - The applied/unapplied force-field state
//! - **Diagnostics** ([`diagnostics`]) - Non-fatal warnings delivered to an optional callback
//! - **Error Handling** ([`error`]) - The system-level error type

pub mod aggregate;
pub mod assembly;
pub mod box_sizer;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod state;
pub mod typify;
