//! Heat-layer assembly.
//!
//! This module turns selected uploads into renderable heat data: per-row
//! aggregation of the survey columns, batch min-max normalization, the
//! row-keyed join against location geometry, and site classification, all
//! orchestrated by [`pipeline::generate`].

pub mod aggregate;
pub mod build;
pub mod classify;
pub mod normalize;
pub mod pipeline;
pub mod types;
