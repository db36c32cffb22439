use crate::engine::error::ConfigError;
use nalgebra::SVector;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Boundary {
    #[default]
    Open,
    Periodic,
}

/// Simulation box: one edge length per dimension plus a boundary mode shared by all dimensions.
///
/// Open boxes span `[0, L)` along each axis and only bound the cell grid; particles may sit
/// outside them. Periodic boxes are tiled infinitely.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxGeometry<const D: usize> {
    lengths: SVector<f64, D>,
    boundary: Boundary,
}

impl<const D: usize> BoxGeometry<D> {
    pub fn new(lengths: &[f64], boundary: Boundary) -> Result<Self, ConfigError> {
        if lengths.len() != D {
            return Err(ConfigError::BoxDimensionMismatch {
                expected: D,
                found: lengths.len(),
            });
        }
        for (dim, &length) in lengths.iter().enumerate() {
            if !(length > 0.0) || !length.is_finite() {
                return Err(ConfigError::NonPositiveBoxLength { dim, length });
            }
        }
        Ok(Self {
            lengths: SVector::from_column_slice(lengths),
            boundary,
        })
    }

    pub fn cube(length: f64, boundary: Boundary) -> Result<Self, ConfigError> {
        Self::new(&[length; D], boundary)
    }

    #[inline]
    pub fn lengths(&self) -> &SVector<f64, D> {
        &self.lengths
    }

    #[inline]
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.boundary == Boundary::Periodic
    }

    pub fn min_length(&self) -> f64 {
        self.lengths.min()
    }

    pub fn diagonal(&self) -> f64 {
        self.lengths.norm()
    }

    pub fn volume(&self) -> f64 {
        self.lengths.product()
    }

    /// Checks that `cutoff` leaves the minimum image unambiguous.
    pub fn check_cutoff(&self, cutoff: f64) -> Result<(), ConfigError> {
        if !(cutoff > 0.0) || cutoff.is_nan() {
            return Err(ConfigError::InvalidCutoff(cutoff));
        }
        if self.is_periodic() {
            let half_box = 0.5 * self.min_length();
            if cutoff > half_box {
                return Err(ConfigError::CutoffExceedsHalfBox { cutoff, half_box });
            }
        }
        Ok(())
    }
}

#[inline]
pub fn position<const D: usize>(coords: &[f64], index: usize) -> SVector<f64, D> {
    SVector::from_column_slice(&coords[index * D..(index + 1) * D])
}

/// Computes inter-particle displacement vectors under a boundary geometry.
pub trait DistancePolicy<const D: usize>: Clone + Send + Sync {
    /// Displacement `r1 - r2`, corrected for the boundary. Both slices hold `D` components.
    fn displacement(&self, r1: &[f64], r2: &[f64]) -> SVector<f64, D>;

    #[inline]
    fn separation_squared(&self, delta: &SVector<f64, D>) -> f64 {
        delta.norm_squared()
    }

    /// Maps a position into the primary image of the box, if the geometry has one.
    fn wrap(&self, _position: &mut SVector<f64, D>) {}

    /// Rejects cutoffs for which this policy cannot find the unique nearest image.
    fn check_cutoff(&self, _cutoff: f64) -> Result<(), ConfigError> {
        Ok(())
    }

    fn boundary(&self) -> Boundary;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cartesian<const D: usize>;

impl<const D: usize> DistancePolicy<D> for Cartesian<D> {
    #[inline]
    fn displacement(&self, r1: &[f64], r2: &[f64]) -> SVector<f64, D> {
        SVector::<f64, D>::from_fn(|k, _| r1[k] - r2[k])
    }

    fn boundary(&self) -> Boundary {
        Boundary::Open
    }
}

/// Minimum-image displacement in a periodic box.
#[derive(Debug, Clone, PartialEq)]
pub struct Periodic<const D: usize> {
    lengths: SVector<f64, D>,
    inv_lengths: SVector<f64, D>,
}

impl<const D: usize> Periodic<D> {
    pub fn new(lengths: &[f64]) -> Result<Self, ConfigError> {
        let geometry = BoxGeometry::<D>::new(lengths, Boundary::Periodic)?;
        Ok(Self::from_geometry(&geometry))
    }

    pub fn from_geometry(geometry: &BoxGeometry<D>) -> Self {
        let lengths = *geometry.lengths();
        Self {
            lengths,
            inv_lengths: lengths.map(|l| 1.0 / l),
        }
    }

    pub fn lengths(&self) -> &SVector<f64, D> {
        &self.lengths
    }
}

impl<const D: usize> DistancePolicy<D> for Periodic<D> {
    #[inline]
    fn displacement(&self, r1: &[f64], r2: &[f64]) -> SVector<f64, D> {
        SVector::<f64, D>::from_fn(|k, _| {
            let dx = r1[k] - r2[k];
            dx - self.lengths[k] * (dx * self.inv_lengths[k]).round()
        })
    }

    fn wrap(&self, position: &mut SVector<f64, D>) {
        for k in 0..D {
            let l = self.lengths[k];
            position[k] -= l * (position[k] * self.inv_lengths[k]).floor();
            // floor can leave exactly L behind for tiny negative inputs
            if position[k] >= l {
                position[k] -= l;
            }
        }
    }

    fn check_cutoff(&self, cutoff: f64) -> Result<(), ConfigError> {
        let half_box = 0.5 * self.lengths.min();
        if cutoff > half_box {
            return Err(ConfigError::CutoffExceedsHalfBox { cutoff, half_box });
        }
        Ok(())
    }

    fn boundary(&self) -> Boundary {
        Boundary::Periodic
    }
}
