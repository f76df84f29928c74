//! # Core I/O Module
//!
//! Reading molecule templates from TOML files. Force field descriptors are read by
//! [`Forcefield::load`](crate::core::forcefield::params::Forcefield::load).

pub mod template;
