use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Box length along dimension {dim} must be positive, got {length}")]
    NonPositiveBoxLength { dim: usize, length: f64 },

    #[error("Expected {expected} box lengths, got {found}")]
    BoxDimensionMismatch { expected: usize, found: usize },

    #[error("Only 2 and 3 dimensional systems are supported, got {0}")]
    DimensionUnsupported(usize),

    #[error("Cutoff radius must be positive and finite, got {0}")]
    InvalidCutoff(f64),

    #[error(
        "Cutoff radius {cutoff} exceeds half the smallest periodic box length ({half_box}); the minimum image is ambiguous"
    )]
    CutoffExceedsHalfBox { cutoff: f64, half_box: f64 },

    #[error(
        "Cutoff radius {cutoff} exceeds the box diagonal ({diagonal}); use the all-pairs strategy instead"
    )]
    CutoffExceedsBoxDiagonal { cutoff: f64, diagonal: f64 },

    #[error(
        "Periodic dimension {dim} holds only {cells} cell(s), but neighbor search needs at least {required}"
    )]
    DomainTooSmall {
        dim: usize,
        cells: usize,
        required: usize,
    },

    #[error("Cell scale must be positive and finite, got {0}")]
    InvalidCellScale(f64),

    #[error("Invalid parameter '{name}' for {law}: {value}")]
    InvalidParameter {
        law: &'static str,
        name: &'static str,
        value: f64,
    },

    #[error("Frozen degree of freedom {dof} is out of range for {ndof} degrees of freedom")]
    InvalidFrozenDof { dof: usize, ndof: usize },

    #[error("Histogram needs at least one bin over a non-empty range, got {bins} bin(s) over [{min}, {max})")]
    InvalidHistogram { min: f64, max: f64, bins: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PotentialError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error(
        "Particles {i} and {j} are at separation {separation:e}, where the interaction is singular"
    )]
    NumericalDegeneracy { i: usize, j: usize, separation: f64 },

    #[error("Interaction between particles {i} and {j} at separation {separation} is not finite")]
    NonFiniteEnergy { i: usize, j: usize, separation: f64 },

    #[error("Coordinate {dof} of particle {particle} is not finite: {value}")]
    NonFiniteCoordinate {
        particle: usize,
        dof: usize,
        value: f64,
    },

    #[error("Coordinate array of length {len} is not a multiple of dimension {ndim}")]
    DimensionMismatch { len: usize, ndim: usize },

    #[error("Expected {expected} particles, coordinate array holds {found}")]
    ParticleCountMismatch { expected: usize, found: usize },

    #[error("Reduced coordinate array should hold {expected} values, got {found}")]
    ReducedLengthMismatch { expected: usize, found: usize },

    #[error("Full coordinate array should hold {expected} values, got {found}")]
    FullLengthMismatch { expected: usize, found: usize },
}

impl PotentialError {
    /// Whether the failure is a geometric degeneracy that samplers usually treat as a rejected move.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            PotentialError::NumericalDegeneracy { .. }
                | PotentialError::NonFiniteEnergy { .. }
                | PotentialError::NonFiniteCoordinate { .. }
        )
    }
}

pub(crate) fn particle_count(
    coords: &[f64],
    ndim: usize,
    expected: Option<usize>,
) -> Result<usize, PotentialError> {
    if coords.len() % ndim != 0 {
        return Err(PotentialError::DimensionMismatch {
            len: coords.len(),
            ndim,
        });
    }
    let found = coords.len() / ndim;
    match expected {
        Some(expected) if expected != found => {
            Err(PotentialError::ParticleCountMismatch { expected, found })
        }
        _ => Ok(found),
    }
}

/// Rejects NaN or infinite entries, which would otherwise be binned into an arbitrary cell.
pub(crate) fn require_finite(coords: &[f64], ndim: usize) -> Result<(), PotentialError> {
    match coords.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(PotentialError::NonFiniteCoordinate {
            particle: index / ndim,
            dof: index,
            value: coords[index],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_count_accepts_whole_particles() {
        assert_eq!(particle_count(&[0.0; 9], 3, None), Ok(3));
        assert_eq!(particle_count(&[0.0; 8], 2, Some(4)), Ok(4));
    }

    #[test]
    fn particle_count_rejects_partial_particles() {
        let result = particle_count(&[0.0; 7], 3, None);
        assert_eq!(
            result,
            Err(PotentialError::DimensionMismatch { len: 7, ndim: 3 })
        );
    }

    #[test]
    fn particle_count_rejects_unexpected_particle_number() {
        let result = particle_count(&[0.0; 6], 3, Some(3));
        assert_eq!(
            result,
            Err(PotentialError::ParticleCountMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn require_finite_names_the_offending_particle() {
        assert_eq!(require_finite(&[0.0, 1.0, 2.0, 3.0], 2), Ok(()));
        let err = require_finite(&[0.0, 1.0, f64::INFINITY, 3.0], 2).unwrap_err();
        assert!(matches!(
            err,
            PotentialError::NonFiniteCoordinate {
                particle: 1,
                dof: 2,
                ..
            }
        ));
        assert!(err.is_degenerate());
    }

    #[test]
    fn degeneracy_errors_are_flagged_as_degenerate() {
        let err = PotentialError::NumericalDegeneracy {
            i: 0,
            j: 1,
            separation: 0.0,
        };
        assert!(err.is_degenerate());
        let err = PotentialError::DimensionMismatch { len: 1, ndim: 3 };
        assert!(!err.is_degenerate());
    }

    #[test]
    fn config_errors_convert_into_potential_errors() {
        let err: PotentialError = ConfigError::InvalidCutoff(-1.0).into();
        assert!(matches!(
            err,
            PotentialError::Configuration(ConfigError::InvalidCutoff(_))
        ));
    }
}
