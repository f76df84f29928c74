//! # initsys Core Library
//!
//! Builds initial configurations for molecular simulations: molecule templates are
//! replicated into a simulation box, converted into a bonded topology, typed with a
//! force field, and exported as a particle snapshot plus a set of interaction
//! parameters in reduced units. A target box size can be derived from a density.
//!
//! ## Layers
//!
//! - **[`core`]: The Foundation.** Stateless models (molecule templates, topologies,
//!   elements), force field descriptors and typing, units, and template I/O.
//!
//! - **[`engine`]: The Pipeline.** Aggregation, assembly strategies, topology conversion,
//!   force-field application with hydrogen removal and charge post-processing, snapshot
//!   export, and density-driven box sizing.
//!
//! - **[`workflows`]: The Public API.** [`workflows::system::System`] ties the stages
//!   together behind a small, state-checked interface.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;
