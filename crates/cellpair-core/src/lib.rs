//! # cellpair
//!
//! Pairwise interaction potentials for particle systems, accelerated by a cell-list spatial
//! decomposition and exposing energy, gradient and Hessian through one evaluation contract.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless geometry (`distance`), the interaction-law
//!   family (`interactions`), coordinate I/O and structural analysis.
//!
//! - **[`engine`]: The Logic Core.** The cell index, candidate pair sources, the generic
//!   pairwise orchestrator, the `Potential` contract with its frozen-coordinate decorator,
//!   and configuration-driven construction of boxed potentials.
//!
//! - **[`workflows`]: The Public API.** Evaluation of coordinate frames and pair
//!   distribution analysis, ready for command-line or scripted use.
//!
//! ## Example
//!
//! ```
//! use cellpair::core::interactions::lennard_jones::LennardJones;
//! use cellpair::engine::pairwise::PeriodicCellList;
//! use cellpair::engine::potential::Potential;
//!
//! let law = LennardJones::new(1.0, 1.0)?.with_cutoff(2.5)?;
//! let mut potential = PeriodicCellList::<_, 3>::new(law, &[10.0, 10.0, 10.0], 1.0)?;
//! let energy = potential.energy(&[0.0, 0.0, 0.0, 9.5, 0.0, 0.0])?;
//! assert!((energy - 16128.0).abs() < 1e-8);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
