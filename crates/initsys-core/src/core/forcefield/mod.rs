//! # Force Field Module
//!
//! Rule-based force field descriptors and the machinery to apply them to a
//! [`MolecularGraph`](crate::core::models::graph::MolecularGraph).
//!
//! - [`params`] - Loading typing rules, Lennard-Jones tables and bonded parameters
//! - [`typing`] - The [`ForcefieldApplicator`](typing::ForcefieldApplicator) seam and its
//!   rule-based implementation
//! - [`typed`] - The typed topology produced by typing, including hydrogen stripping
//! - [`charges`] - Charge neutralization

pub mod charges;
pub mod params;
pub mod typed;
pub mod typing;
