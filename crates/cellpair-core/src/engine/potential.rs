use super::error::{PotentialError, particle_count};
use nalgebra::DMatrix;

/// Default finite-difference step for numerical derivatives.
pub const NUMERICAL_STEP: f64 = 1e-6;

/// Evaluation contract shared by every potential.
///
/// Coordinates are flat `[x0, y0, z0, x1, ...]` arrays owned by the caller; implementations
/// never modify them. Gradient and Hessian have one entry (row/column) per degree of freedom.
///
/// Only [`Potential::energy`] is mandatory. Gradient and Hessian default to central finite
/// differences, which is also how analytic implementations are cross-checked in tests.
pub trait Potential {
    fn energy(&mut self, coords: &[f64]) -> Result<f64, PotentialError>;

    fn energy_gradient(&mut self, coords: &[f64]) -> Result<(f64, Vec<f64>), PotentialError> {
        let energy = self.energy(coords)?;
        let gradient = self.numerical_gradient(coords, NUMERICAL_STEP)?;
        Ok((energy, gradient))
    }

    fn energy_gradient_hessian(
        &mut self,
        coords: &[f64],
    ) -> Result<(f64, Vec<f64>, DMatrix<f64>), PotentialError> {
        let (energy, gradient) = self.energy_gradient(coords)?;
        let hessian = self.numerical_hessian(coords, NUMERICAL_STEP)?;
        Ok((energy, gradient, hessian))
    }

    fn numerical_gradient(&mut self, coords: &[f64], step: f64) -> Result<Vec<f64>, PotentialError> {
        let mut x = coords.to_vec();
        let mut gradient = vec![0.0; coords.len()];
        for k in 0..x.len() {
            let original = x[k];
            x[k] = original + step;
            let forward = self.energy(&x)?;
            x[k] = original - step;
            let backward = self.energy(&x)?;
            x[k] = original;
            gradient[k] = (forward - backward) / (2.0 * step);
        }
        Ok(gradient)
    }

    /// Central differences of the gradient, symmetrized.
    fn numerical_hessian(
        &mut self,
        coords: &[f64],
        step: f64,
    ) -> Result<DMatrix<f64>, PotentialError> {
        let ndof = coords.len();
        let mut x = coords.to_vec();
        let mut hessian = DMatrix::zeros(ndof, ndof);
        for k in 0..ndof {
            let original = x[k];
            x[k] = original + step;
            let (_, forward) = self.energy_gradient(&x)?;
            x[k] = original - step;
            let (_, backward) = self.energy_gradient(&x)?;
            x[k] = original;
            for row in 0..ndof {
                hessian[(row, k)] = (forward[row] - backward[row]) / (2.0 * step);
            }
        }
        Ok((&hessian + hessian.transpose()) * 0.5)
    }
}

impl<P: Potential + ?Sized> Potential for Box<P> {
    fn energy(&mut self, coords: &[f64]) -> Result<f64, PotentialError> {
        (**self).energy(coords)
    }

    fn energy_gradient(&mut self, coords: &[f64]) -> Result<(f64, Vec<f64>), PotentialError> {
        (**self).energy_gradient(coords)
    }

    fn energy_gradient_hessian(
        &mut self,
        coords: &[f64],
    ) -> Result<(f64, Vec<f64>, DMatrix<f64>), PotentialError> {
        (**self).energy_gradient_hessian(coords)
    }
}

impl<P: Potential + ?Sized> Potential for &mut P {
    fn energy(&mut self, coords: &[f64]) -> Result<f64, PotentialError> {
        (**self).energy(coords)
    }

    fn energy_gradient(&mut self, coords: &[f64]) -> Result<(f64, Vec<f64>), PotentialError> {
        (**self).energy_gradient(coords)
    }

    fn energy_gradient_hessian(
        &mut self,
        coords: &[f64],
    ) -> Result<(f64, Vec<f64>, DMatrix<f64>), PotentialError> {
        (**self).energy_gradient_hessian(coords)
    }
}

/// Potential that is identically zero.
#[derive(Debug, Clone, Copy)]
pub struct NullPotential {
    ndim: usize,
}

impl NullPotential {
    pub fn new(ndim: usize) -> Self {
        Self { ndim: ndim.max(1) }
    }
}

impl Potential for NullPotential {
    fn energy(&mut self, coords: &[f64]) -> Result<f64, PotentialError> {
        particle_count(coords, self.ndim, None)?;
        Ok(0.0)
    }

    fn energy_gradient(&mut self, coords: &[f64]) -> Result<(f64, Vec<f64>), PotentialError> {
        particle_count(coords, self.ndim, None)?;
        Ok((0.0, vec![0.0; coords.len()]))
    }

    fn energy_gradient_hessian(
        &mut self,
        coords: &[f64],
    ) -> Result<(f64, Vec<f64>, DMatrix<f64>), PotentialError> {
        particle_count(coords, self.ndim, None)?;
        let ndof = coords.len();
        Ok((0.0, vec![0.0; ndof], DMatrix::zeros(ndof, ndof)))
    }
}
