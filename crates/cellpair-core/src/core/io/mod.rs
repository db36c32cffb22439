//! Provides input/output functionality for coordinate files.
//!
//! Configurations are exchanged as [`frame::Frame`] values: per-particle labels plus the flat
//! coordinate layout every potential consumes. Formats implement the
//! [`traits::CoordinateFile`] trait.

pub mod frame;
pub mod traits;
pub mod xyz;
