use super::cell_index::CellIndex;
use itertools::Itertools;
use std::convert::Infallible;

/// Supplies the candidate particle pairs of one configuration.
///
/// Candidates are partitioned into independent work units (outer particle indices for
/// [`AllPairs`], cell pairs for [`CellIndex`]); every candidate `(i, j)`, `i < j`, belongs to
/// exactly one unit, which lets units be evaluated in any order or in parallel.
pub trait PairSource: Send + Sync {
    /// Prepares the source for a new configuration.
    fn rebuild(&mut self, coords: &[f64]);

    fn work_units(&self) -> usize;

    fn try_for_each_in_unit<E, F>(&self, unit: usize, f: F) -> Result<(), E>
    where
        F: FnMut(usize, usize) -> Result<(), E>;

    fn candidate_count(&self) -> usize {
        let mut count = 0usize;
        for unit in 0..self.work_units() {
            self.try_for_each_in_unit(unit, |_, _| {
                count += 1;
                Ok::<(), Infallible>(())
            })
            .unwrap_or_else(|never| match never {});
        }
        count
    }
}

/// Exhaustive enumeration of all `N (N - 1) / 2` pairs.
#[derive(Debug, Clone)]
pub struct AllPairs {
    ndim: usize,
    particles: usize,
}

impl AllPairs {
    pub fn new(ndim: usize) -> Self {
        Self { ndim, particles: 0 }
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        (0..self.particles).tuple_combinations()
    }
}

impl PairSource for AllPairs {
    fn rebuild(&mut self, coords: &[f64]) {
        self.particles = coords.len() / self.ndim;
    }

    fn work_units(&self) -> usize {
        self.particles
    }

    fn try_for_each_in_unit<E, F>(&self, unit: usize, mut f: F) -> Result<(), E>
    where
        F: FnMut(usize, usize) -> Result<(), E>,
    {
        for j in unit + 1..self.particles {
            f(unit, j)?;
        }
        Ok(())
    }

    fn candidate_count(&self) -> usize {
        self.particles * self.particles.saturating_sub(1) / 2
    }
}

impl<const D: usize> PairSource for CellIndex<D> {
    fn rebuild(&mut self, coords: &[f64]) {
        CellIndex::rebuild(self, coords);
    }

    fn work_units(&self) -> usize {
        self.cell_pairs().len()
    }

    fn try_for_each_in_unit<E, F>(&self, unit: usize, f: F) -> Result<(), E>
    where
        F: FnMut(usize, usize) -> Result<(), E>,
    {
        self.try_for_each_pair_in(self.cell_pairs()[unit], f)
    }
}
