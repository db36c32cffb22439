use super::error::{ConfigError, PotentialError};
use super::potential::Potential;
use nalgebra::DMatrix;
use std::collections::BTreeSet;

/// Holds a subset of degrees of freedom fixed while another potential is evaluated.
///
/// Callers work with *reduced* coordinates containing only the mobile degrees of freedom,
/// in ascending full-index order. Frozen values come from a reference configuration. The
/// wrapped potential always sees full configurations and is otherwise untouched.
#[derive(Debug, Clone)]
pub struct FrozenPotential<P> {
    inner: P,
    reference: Vec<f64>,
    frozen: Vec<usize>,
    mobile: Vec<usize>,
}

impl<P: Potential> FrozenPotential<P> {
    /// Freezes the listed degrees of freedom. Duplicates are ignored.
    pub fn new(
        inner: P,
        reference: Vec<f64>,
        frozen_dofs: impl IntoIterator<Item = usize>,
    ) -> Result<Self, ConfigError> {
        let ndof = reference.len();
        let frozen: BTreeSet<usize> = frozen_dofs.into_iter().collect();
        if let Some(&dof) = frozen.iter().find(|&&dof| dof >= ndof) {
            return Err(ConfigError::InvalidFrozenDof { dof, ndof });
        }
        let mobile = (0..ndof).filter(|dof| !frozen.contains(dof)).collect();
        Ok(Self {
            inner,
            reference,
            frozen: frozen.into_iter().collect(),
            mobile,
        })
    }

    /// Freezes every coordinate of the listed particles.
    pub fn from_particles(
        inner: P,
        reference: Vec<f64>,
        particles: &[usize],
        ndim: usize,
    ) -> Result<Self, ConfigError> {
        let dofs = particles.iter().flat_map(|&p| p * ndim..(p + 1) * ndim);
        Self::new(inner, reference, dofs)
    }

    pub fn ndof(&self) -> usize {
        self.reference.len()
    }

    pub fn reduced_ndof(&self) -> usize {
        self.mobile.len()
    }

    pub fn frozen_dofs(&self) -> &[usize] {
        &self.frozen
    }

    pub fn mobile_dofs(&self) -> &[usize] {
        &self.mobile
    }

    pub fn reference(&self) -> &[f64] {
        &self.reference
    }

    /// Replaces the configuration frozen values are taken from.
    pub fn set_reference(&mut self, full: &[f64]) -> Result<(), PotentialError> {
        self.check_full(full)?;
        self.reference.copy_from_slice(full);
        Ok(())
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }

    pub fn reduce(&self, full: &[f64]) -> Result<Vec<f64>, PotentialError> {
        self.check_full(full)?;
        Ok(self.mobile.iter().map(|&dof| full[dof]).collect())
    }

    pub fn expand(&self, reduced: &[f64]) -> Result<Vec<f64>, PotentialError> {
        if reduced.len() != self.mobile.len() {
            return Err(PotentialError::ReducedLengthMismatch {
                expected: self.mobile.len(),
                found: reduced.len(),
            });
        }
        let mut full = self.reference.clone();
        for (&dof, &value) in self.mobile.iter().zip(reduced) {
            full[dof] = value;
        }
        Ok(full)
    }

    /// Scatters a reduced gradient into a full-length one with zeros at frozen entries.
    pub fn expand_gradient(&self, reduced: &[f64]) -> Result<Vec<f64>, PotentialError> {
        if reduced.len() != self.mobile.len() {
            return Err(PotentialError::ReducedLengthMismatch {
                expected: self.mobile.len(),
                found: reduced.len(),
            });
        }
        let mut full = vec![0.0; self.reference.len()];
        for (&dof, &value) in self.mobile.iter().zip(reduced) {
            full[dof] = value;
        }
        Ok(full)
    }

    fn check_full(&self, full: &[f64]) -> Result<(), PotentialError> {
        if full.len() != self.reference.len() {
            return Err(PotentialError::FullLengthMismatch {
                expected: self.reference.len(),
                found: full.len(),
            });
        }
        Ok(())
    }

    fn gather(&self, full_gradient: &[f64]) -> Vec<f64> {
        self.mobile.iter().map(|&dof| full_gradient[dof]).collect()
    }
}

impl<P: Potential> Potential for FrozenPotential<P> {
    fn energy(&mut self, reduced: &[f64]) -> Result<f64, PotentialError> {
        let full = self.expand(reduced)?;
        self.inner.energy(&full)
    }

    fn energy_gradient(&mut self, reduced: &[f64]) -> Result<(f64, Vec<f64>), PotentialError> {
        let full = self.expand(reduced)?;
        let (energy, gradient) = self.inner.energy_gradient(&full)?;
        Ok((energy, self.gather(&gradient)))
    }

    fn energy_gradient_hessian(
        &mut self,
        reduced: &[f64],
    ) -> Result<(f64, Vec<f64>, DMatrix<f64>), PotentialError> {
        let full = self.expand(reduced)?;
        let (energy, gradient, hessian) = self.inner.energy_gradient_hessian(&full)?;
        let reduced_hessian = hessian
            .select_rows(self.mobile.iter())
            .select_columns(self.mobile.iter());
        Ok((energy, self.gather(&gradient), reduced_hessian))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interactions::lennard_jones::LennardJones;
    use crate::engine::pairwise::OpenAllPairs;

    fn lj_pair() -> OpenAllPairs<LennardJones, 3> {
        OpenAllPairs::new(LennardJones::new(1.0, 1.0).unwrap())
    }

    fn three_particles() -> Vec<f64> {
        vec![0.0, 0.0, 0.0, 1.1, 0.0, 0.0, 0.3, 1.2, 0.1]
    }

    #[test]
    fn reduced_coordinates_round_trip_through_full_layout() {
        let frozen = FrozenPotential::new(lj_pair(), three_particles(), [4, 0, 4]).unwrap();
        assert_eq!(frozen.frozen_dofs(), &[0, 4]);
        assert_eq!(frozen.reduced_ndof(), 7);
        let reduced = frozen.reduce(&three_particles()).unwrap();
        assert_eq!(reduced, vec![0.0, 0.0, 1.1, 0.0, 0.3, 1.2, 0.1]);
        assert_eq!(frozen.expand(&reduced).unwrap(), three_particles());
    }

    #[test]
    fn frozen_values_come_from_the_reference() {
        let frozen = FrozenPotential::from_particles(lj_pair(), three_particles(), &[0], 3).unwrap();
        let full = frozen.expand(&[2.0, 0.0, 0.0, 0.3, 1.2, 0.1]).unwrap();
        assert_eq!(&full[..3], &[0.0, 0.0, 0.0]);
        assert_eq!(full[3], 2.0);
    }

    #[test]
    fn energy_matches_the_wrapped_potential() {
        let mut full = lj_pair();
        let mut frozen =
            FrozenPotential::from_particles(lj_pair(), three_particles(), &[1], 3).unwrap();
        let reduced = frozen.reduce(&three_particles()).unwrap();
        let e = frozen.energy(&reduced).unwrap();
        let e_full = full.energy(&three_particles()).unwrap();
        assert!((e - e_full).abs() <= 1e-12 * e_full.abs().max(1.0));
    }

    #[test]
    fn gradient_is_the_mobile_part_of_the_full_gradient() {
        let mut full = lj_pair();
        let mut frozen = FrozenPotential::new(lj_pair(), three_particles(), [1, 5, 8]).unwrap();
        let reduced = frozen.reduce(&three_particles()).unwrap();
        let (_, g_full) = full.energy_gradient(&three_particles()).unwrap();
        let (_, g) = frozen.energy_gradient(&reduced).unwrap();
        let expected: Vec<f64> = frozen.mobile_dofs().iter().map(|&d| g_full[d]).collect();
        assert_eq!(g, expected);
        let scattered = frozen.expand_gradient(&g).unwrap();
        assert_eq!(scattered[1], 0.0);
        assert_eq!(scattered[0], g_full[0]);
    }

    #[test]
    fn hessian_is_the_mobile_submatrix() {
        let mut full = lj_pair();
        let mut frozen =
            FrozenPotential::from_particles(lj_pair(), three_particles(), &[2], 3).unwrap();
        let reduced = frozen.reduce(&three_particles()).unwrap();
        let (_, _, h_full) = full.energy_gradient_hessian(&three_particles()).unwrap();
        let (_, _, h) = frozen.energy_gradient_hessian(&reduced).unwrap();
        assert_eq!(h.shape(), (6, 6));
        for r in 0..6 {
            for c in 0..6 {
                assert_eq!(h[(r, c)], h_full[(r, c)]);
            }
        }
    }

    #[test]
    fn out_of_range_dofs_are_rejected() {
        let result = FrozenPotential::new(lj_pair(), three_particles(), [9]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidFrozenDof { dof: 9, ndof: 9 })
        ));
    }

    #[test]
    fn wrong_length_inputs_are_rejected() {
        let mut frozen = FrozenPotential::new(lj_pair(), three_particles(), [0]).unwrap();
        assert!(matches!(
            frozen.energy(&[0.0; 9]),
            Err(PotentialError::ReducedLengthMismatch {
                expected: 8,
                found: 9
            })
        ));
        assert!(matches!(
            frozen.set_reference(&[0.0; 6]),
            Err(PotentialError::FullLengthMismatch {
                expected: 9,
                found: 6
            })
        ));
    }
}
