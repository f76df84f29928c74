//! # Core Module
//!
//! Stateless building blocks for preparing a simulation system: molecule and topology
//! models, force field descriptors and typing, unit conventions, and template I/O.
//!
//! - **Molecular Representation** ([`models`]) - Templates, assembled structures and topologies
//! - **Force Fields** ([`forcefield`]) - Typing rules, parameters, typed topologies, charges
//! - **Units** ([`units`]) - Conversion constants and snapshot reference values
//! - **File I/O** ([`io`]) - Molecule template loading

pub mod forcefield;
pub mod io;
pub mod models;
pub mod units;
