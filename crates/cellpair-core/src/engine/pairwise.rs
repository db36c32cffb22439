use super::accumulator::{Accumulator, EvaluationMode};
use super::cell_index::CellIndex;
use super::error::{ConfigError, PotentialError, particle_count, require_finite};
use super::pairs::{AllPairs, PairSource};
use super::potential::Potential;
use crate::core::distance::{Boundary, BoxGeometry, Cartesian, DistancePolicy, Periodic};
use crate::core::interactions::{InteractionLaw, RadialTerms};
use nalgebra::{DMatrix, SVector};
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Separations within this distance of a law's singular radius are treated as degenerate.
const DEGENERACY_TOLERANCE: f64 = 1e-10;

/// Step for the radial second derivative of laws without a closed form.
const RADIAL_STEP: f64 = 1e-6;

/// Sum of one radial interaction law over the particle pairs of a configuration.
///
/// The three type parameters fix, at compile time, which law is evaluated, how displacements
/// are measured and how candidate pairs are found. The aliases [`OpenAllPairs`],
/// [`PeriodicAllPairs`], [`OpenCellList`] and [`PeriodicCellList`] name the four useful
/// combinations and carry their constructors.
///
/// Pairs at or beyond the law's cutoff contribute nothing. Every evaluation rebuilds the
/// pair source from the coordinates passed in, so no state carries over between calls.
#[derive(Debug, Clone)]
pub struct PairwisePotential<L, P, S, const D: usize> {
    law: L,
    policy: P,
    source: S,
    cutoff_squared: f64,
    particle_count: Option<usize>,
    parallel: bool,
}

pub type OpenAllPairs<L, const D: usize> = PairwisePotential<L, Cartesian<D>, AllPairs, D>;
pub type PeriodicAllPairs<L, const D: usize> = PairwisePotential<L, Periodic<D>, AllPairs, D>;
pub type OpenCellList<L, const D: usize> = PairwisePotential<L, Cartesian<D>, CellIndex<D>, D>;
pub type PeriodicCellList<L, const D: usize> =
    PairwisePotential<L, Periodic<D>, CellIndex<D>, D>;

impl<L: InteractionLaw, const D: usize> OpenAllPairs<L, D> {
    pub fn new(law: L) -> Self {
        let cutoff = law.cutoff();
        Self::assemble(law, Cartesian, AllPairs::new(D), cutoff)
    }
}

impl<L: InteractionLaw, const D: usize> PeriodicAllPairs<L, D> {
    pub fn new(law: L, box_lengths: &[f64]) -> Result<Self, ConfigError> {
        let policy = Periodic::new(box_lengths)?;
        let cutoff = law.cutoff();
        policy.check_cutoff(cutoff)?;
        Ok(Self::assemble(law, policy, AllPairs::new(D), cutoff))
    }
}

impl<L: InteractionLaw, const D: usize> OpenCellList<L, D> {
    /// Cell list over an open box. Particles outside the box are binned into the boundary
    /// cells, which keeps results correct at the cost of crowding those cells.
    pub fn new(law: L, box_lengths: &[f64], cell_scale: f64) -> Result<Self, ConfigError> {
        let geometry = BoxGeometry::new(box_lengths, Boundary::Open)?;
        let cutoff = law.cutoff();
        let index = CellIndex::new(&geometry, cutoff, cell_scale, 0)?;
        Ok(Self::assemble(law, Cartesian, index, cutoff))
    }
}

impl<L: InteractionLaw, const D: usize> PeriodicCellList<L, D> {
    pub fn new(law: L, box_lengths: &[f64], cell_scale: f64) -> Result<Self, ConfigError> {
        let geometry = BoxGeometry::new(box_lengths, Boundary::Periodic)?;
        let cutoff = law.cutoff();
        let index = CellIndex::new(&geometry, cutoff, cell_scale, 0)?;
        Ok(Self::assemble(
            law,
            Periodic::from_geometry(&geometry),
            index,
            cutoff,
        ))
    }
}

impl<L, P, S, const D: usize> PairwisePotential<L, P, S, D>
where
    L: InteractionLaw,
    P: DistancePolicy<D>,
    S: PairSource,
{
    fn assemble(law: L, policy: P, source: S, cutoff: f64) -> Self {
        Self {
            law,
            policy,
            source,
            cutoff_squared: cutoff * cutoff,
            particle_count: None,
            parallel: cfg!(feature = "parallel"),
        }
    }

    /// Fixes the number of particles every configuration must contain.
    pub fn with_particle_count(mut self, particles: usize) -> Self {
        self.particle_count = Some(particles);
        self
    }

    /// Enables or disables parallel accumulation. Has no effect without the `parallel`
    /// feature.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel && cfg!(feature = "parallel");
        self
    }

    pub fn law(&self) -> &L {
        &self.law
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Energy and requested derivatives of one configuration.
    pub fn evaluate(
        &mut self,
        coords: &[f64],
        mode: EvaluationMode,
    ) -> Result<Accumulator, PotentialError> {
        particle_count(coords, D, self.particle_count)?;
        require_finite(coords, D)?;
        self.source.rebuild(coords);
        let this = &*self;
        let units = this.source.work_units();
        trace!(
            law = this.law.name(),
            units,
            ?mode,
            "Accumulating pair contributions."
        );

        #[cfg(feature = "parallel")]
        if this.parallel && !mode.wants_hessian() {
            let ndof = coords.len();
            return (0..units)
                .into_par_iter()
                .try_fold(
                    || Accumulator::new(mode, ndof),
                    |mut acc, unit| {
                        this.accumulate_unit(coords, unit, mode, &mut acc)?;
                        Ok::<_, PotentialError>(acc)
                    },
                )
                .try_reduce(|| Accumulator::new(mode, ndof), |a, b| Ok(a + b));
        }

        let mut acc = Accumulator::new(mode, coords.len());
        for unit in 0..units {
            this.accumulate_unit(coords, unit, mode, &mut acc)?;
        }
        Ok(acc)
    }

    fn accumulate_unit(
        &self,
        coords: &[f64],
        unit: usize,
        mode: EvaluationMode,
        acc: &mut Accumulator,
    ) -> Result<(), PotentialError> {
        self.source.try_for_each_in_unit(unit, |i, j| {
            let delta = self
                .policy
                .displacement(&coords[i * D..(i + 1) * D], &coords[j * D..(j + 1) * D]);
            if let Some((r, terms)) = self.pair_terms(i, j, &delta, mode)? {
                acc.add_pair(i, j, &delta, r, &terms);
            }
            Ok::<(), PotentialError>(())
        })
    }

    /// Radial terms for one pair, or `None` when the pair is beyond the cutoff.
    #[inline]
    fn pair_terms(
        &self,
        i: usize,
        j: usize,
        delta: &SVector<f64, D>,
        mode: EvaluationMode,
    ) -> Result<Option<(f64, RadialTerms)>, PotentialError> {
        let r2 = self.policy.separation_squared(delta);
        if r2 >= self.cutoff_squared {
            return Ok(None);
        }
        let r = r2.sqrt();
        if let Some(singular) = self.law.singular_radius() {
            if r <= singular + DEGENERACY_TOLERANCE {
                return Err(PotentialError::NumericalDegeneracy {
                    i,
                    j,
                    separation: r,
                });
            }
        }

        let terms = match mode {
            EvaluationMode::Energy => RadialTerms {
                energy: self.law.energy(r),
                ..RadialTerms::default()
            },
            EvaluationMode::Gradient => {
                let (energy, first) = self.law.energy_derivative(r);
                RadialTerms {
                    energy,
                    first,
                    second: 0.0,
                }
            }
            EvaluationMode::Hessian => radial_terms(&self.law, r),
        };
        if !(terms.energy.is_finite() && terms.first.is_finite() && terms.second.is_finite()) {
            return Err(PotentialError::NonFiniteEnergy {
                i,
                j,
                separation: r,
            });
        }
        Ok(Some((r, terms)))
    }
}

/// Closed-form terms when the law has them, otherwise a central difference of `e'(r)`.
fn radial_terms<L: InteractionLaw>(law: &L, r: f64) -> RadialTerms {
    law.energy_derivatives(r).unwrap_or_else(|| {
        let (energy, first) = law.energy_derivative(r);
        let h = RADIAL_STEP * r.max(1.0);
        let forward = law.energy_derivative(r + h).1;
        let backward = law.energy_derivative((r - h).max(0.0)).1;
        let span = r + h - (r - h).max(0.0);
        RadialTerms {
            energy,
            first,
            second: (forward - backward) / span,
        }
    })
}

impl<L, P, S, const D: usize> Potential for PairwisePotential<L, P, S, D>
where
    L: InteractionLaw,
    P: DistancePolicy<D>,
    S: PairSource,
{
    fn energy(&mut self, coords: &[f64]) -> Result<f64, PotentialError> {
        Ok(self.evaluate(coords, EvaluationMode::Energy)?.energy)
    }

    fn energy_gradient(&mut self, coords: &[f64]) -> Result<(f64, Vec<f64>), PotentialError> {
        let acc = self.evaluate(coords, EvaluationMode::Gradient)?;
        let gradient = acc.gradient_or_zeros(coords.len());
        Ok((acc.energy, gradient))
    }

    fn energy_gradient_hessian(
        &mut self,
        coords: &[f64],
    ) -> Result<(f64, Vec<f64>, DMatrix<f64>), PotentialError> {
        let ndof = coords.len();
        let acc = self.evaluate(coords, EvaluationMode::Hessian)?;
        let gradient = acc.gradient_or_zeros(ndof);
        let hessian = acc.hessian.unwrap_or_else(|| DMatrix::zeros(ndof, ndof));
        Ok((acc.energy, gradient, hessian))
    }
}
