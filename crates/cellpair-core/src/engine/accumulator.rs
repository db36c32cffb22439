use crate::core::interactions::RadialTerms;
use nalgebra::{DMatrix, SMatrix, SVector};
use std::ops::{Add, AddAssign};

/// Which derivatives an evaluation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationMode {
    #[default]
    Energy,
    Gradient,
    Hessian,
}

impl EvaluationMode {
    #[inline]
    pub fn wants_gradient(self) -> bool {
        !matches!(self, Self::Energy)
    }

    #[inline]
    pub fn wants_hessian(self) -> bool {
        matches!(self, Self::Hessian)
    }
}

/// Running energy, gradient and Hessian totals over the pairs of one configuration.
///
/// Partial accumulators from independent work units are combined with `+`.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    pub energy: f64,
    pub gradient: Option<Vec<f64>>,
    pub hessian: Option<DMatrix<f64>>,
}

impl Accumulator {
    pub fn new(mode: EvaluationMode, ndof: usize) -> Self {
        Self {
            energy: 0.0,
            gradient: mode.wants_gradient().then(|| vec![0.0; ndof]),
            hessian: mode.wants_hessian().then(|| DMatrix::zeros(ndof, ndof)),
        }
    }

    /// Adds one pair with displacement `delta = r_i - r_j` and separation `r`.
    ///
    /// Particle `i` receives `e'(r) delta / r`, particle `j` the exact negation. Coincident
    /// particles (`r == 0`) have no direction, so they contribute energy and an isotropic
    /// `e''(0) I` Hessian block but no gradient.
    #[inline]
    pub fn add_pair<const D: usize>(
        &mut self,
        i: usize,
        j: usize,
        delta: &SVector<f64, D>,
        r: f64,
        terms: &RadialTerms,
    ) {
        self.energy += terms.energy;

        if let Some(gradient) = self.gradient.as_mut() {
            if r > 0.0 {
                let scale = terms.first / r;
                for k in 0..D {
                    let component = scale * delta[k];
                    gradient[i * D + k] += component;
                    gradient[j * D + k] -= component;
                }
            }
        }

        if let Some(hessian) = self.hessian.as_mut() {
            let block = if r > 0.0 {
                let unit = delta / r;
                let radial = unit * unit.transpose();
                let tangential = terms.first / r;
                radial * (terms.second - tangential) + SMatrix::<f64, D, D>::identity() * tangential
            } else {
                SMatrix::<f64, D, D>::identity() * terms.second
            };
            for a in 0..D {
                for b in 0..D {
                    let value = block[(a, b)];
                    hessian[(i * D + a, i * D + b)] += value;
                    hessian[(j * D + a, j * D + b)] += value;
                    hessian[(i * D + a, j * D + b)] -= value;
                    hessian[(j * D + a, i * D + b)] -= value;
                }
            }
        }
    }

    pub fn gradient_or_zeros(&self, ndof: usize) -> Vec<f64> {
        self.gradient.clone().unwrap_or_else(|| vec![0.0; ndof])
    }
}

fn merge_vec(lhs: &mut Option<Vec<f64>>, rhs: Option<Vec<f64>>) {
    match (lhs.as_mut(), rhs) {
        (Some(a), Some(b)) => a.iter_mut().zip(b).for_each(|(x, y)| *x += y),
        (None, Some(b)) => *lhs = Some(b),
        _ => {}
    }
}

fn merge_matrix(lhs: &mut Option<DMatrix<f64>>, rhs: Option<DMatrix<f64>>) {
    match (lhs.as_mut(), rhs) {
        (Some(a), Some(b)) => *a += b,
        (None, Some(b)) => *lhs = Some(b),
        _ => {}
    }
}

impl Add for Accumulator {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for Accumulator {
    fn add_assign(&mut self, rhs: Self) {
        self.energy += rhs.energy;
        merge_vec(&mut self.gradient, rhs.gradient);
        merge_matrix(&mut self.hessian, rhs.hessian);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn terms(energy: f64, first: f64, second: f64) -> RadialTerms {
        RadialTerms {
            energy,
            first,
            second,
        }
    }

    #[test]
    fn new_allocates_only_requested_derivatives() {
        let energy_only = Accumulator::new(EvaluationMode::Energy, 6);
        assert!(energy_only.gradient.is_none());
        assert!(energy_only.hessian.is_none());

        let gradient = Accumulator::new(EvaluationMode::Gradient, 6);
        assert_eq!(gradient.gradient.as_deref(), Some(&[0.0; 6][..]));
        assert!(gradient.hessian.is_none());

        let hessian = Accumulator::new(EvaluationMode::Hessian, 6);
        assert_eq!(hessian.hessian.as_ref().map(|h| h.shape()), Some((6, 6)));
    }

    #[test]
    fn add_pair_applies_equal_and_opposite_gradients() {
        let mut acc = Accumulator::new(EvaluationMode::Gradient, 4);
        acc.add_pair::<2>(0, 1, &Vector2::new(3.0, 4.0), 5.0, &terms(1.5, 10.0, 0.0));
        assert_eq!(acc.energy, 1.5);
        let g = acc.gradient.unwrap();
        assert_eq!(g, vec![6.0, 8.0, -6.0, -8.0]);
    }

    #[test]
    fn add_pair_builds_symmetric_translation_invariant_hessian() {
        let mut acc = Accumulator::new(EvaluationMode::Hessian, 4);
        acc.add_pair::<2>(0, 1, &Vector2::new(1.0, 0.0), 1.0, &terms(0.0, 2.0, 5.0));
        let h = acc.hessian.unwrap();
        assert_eq!(h, h.transpose());
        assert_eq!(h[(0, 0)], 5.0);
        assert_eq!(h[(1, 1)], 2.0);
        assert_eq!(h[(0, 2)], -5.0);
        assert_eq!(h[(1, 3)], -2.0);
        for row in 0..4 {
            let sum: f64 = h.row(row).iter().sum();
            assert_eq!(sum, 0.0);
        }
    }

    #[test]
    fn coincident_pair_contributes_energy_and_isotropic_curvature_only() {
        let mut acc = Accumulator::new(EvaluationMode::Hessian, 4);
        acc.add_pair::<2>(0, 1, &Vector2::zeros(), 0.0, &terms(-1.0, 0.0, 4.0));
        assert_eq!(acc.energy, -1.0);
        assert_eq!(acc.gradient.as_deref(), Some(&[0.0; 4][..]));
        let h = acc.hessian.unwrap();
        assert_eq!(h[(0, 0)], 4.0);
        assert_eq!(h[(1, 1)], 4.0);
        assert_eq!(h[(0, 1)], 0.0);
        assert_eq!(h[(0, 2)], -4.0);
    }

    #[test]
    fn add_combines_partial_results() {
        let mut a = Accumulator::new(EvaluationMode::Gradient, 2);
        a.energy = 1.0;
        a.gradient = Some(vec![1.0, 2.0]);
        let mut b = Accumulator::new(EvaluationMode::Gradient, 2);
        b.energy = 2.0;
        b.gradient = Some(vec![-1.0, 0.5]);
        let sum = a + b;
        assert_eq!(sum.energy, 3.0);
        assert_eq!(sum.gradient, Some(vec![0.0, 2.5]));
    }

    #[test]
    fn add_assign_adopts_missing_parts() {
        let mut a = Accumulator::new(EvaluationMode::Energy, 2);
        let mut b = Accumulator::new(EvaluationMode::Gradient, 2);
        b.gradient = Some(vec![1.0, -1.0]);
        a += b;
        assert_eq!(a.gradient, Some(vec![1.0, -1.0]));
    }
}
