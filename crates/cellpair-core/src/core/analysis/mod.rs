//! Structural analysis of sampled configurations.

pub mod histogram;
pub mod pair_distribution;

pub use histogram::Histogram;
pub use pair_distribution::PairDistanceHistogram;
