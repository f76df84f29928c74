//! # Workflows Module
//!
//! The user-facing entry point: [`system::System`] runs aggregation, assembly and
//! topology conversion on construction, then applies force fields and sizes target
//! boxes on request.

pub mod system;
