//! # Engine Module
//!
//! The stateful evaluation machinery: turning a configuration into an energy, a gradient and
//! a Hessian by summing an interaction law over particle pairs.
//!
//! ## Architecture
//!
//! - **Spatial Decomposition** ([`cell_index`]) - uniform grid and the cell pairs a cutoff
//!   can reach, rebuilt per configuration
//! - **Pair Enumeration** ([`pairs`]) - the [`pairs::PairSource`] seam shared by the cell
//!   index and exhaustive all-pairs enumeration
//! - **Accumulation** ([`accumulator`]) - energy, gradient and Hessian partial sums
//! - **Orchestration** ([`pairwise`]) - the generic pairwise potential, sequential or
//!   parallel
//! - **Contract** ([`potential`]) - the [`potential::Potential`] trait with finite-difference
//!   fallbacks, and the null potential
//! - **Coordinate Reduction** ([`frozen`]) - decorator holding chosen coordinates fixed
//! - **Configuration** ([`config`], [`builder`]) - declarative settings and runtime
//!   construction of a boxed potential
//! - **Progress Monitoring** ([`progress`]) - callback-based progress events
//! - **Error Handling** ([`error`]) - construction and evaluation errors

pub mod accumulator;
pub mod builder;
pub mod cell_index;
pub mod config;
pub mod error;
pub mod frozen;
pub mod pairs;
pub mod pairwise;
pub mod potential;
pub mod progress;
