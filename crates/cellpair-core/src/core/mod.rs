//! # Core Module
//!
//! Stateless building blocks: how displacements are measured, what a pair of particles
//! contributes at a given separation, how configurations are read and written, and how
//! sampled configurations are analysed.
//!
//! - **Geometry** ([`distance`]) - box geometry and the cartesian and periodic
//!   minimum-image distance policies
//! - **Interaction Laws** ([`interactions`]) - radial pair potentials with closed-form
//!   derivatives
//! - **File I/O** ([`io`]) - multi-frame coordinate files
//! - **Analysis** ([`analysis`]) - histograms and radial distribution functions

pub mod analysis;
pub mod distance;
pub mod interactions;
pub mod io;
