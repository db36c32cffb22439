use super::histogram::Histogram;
use crate::core::distance::{DistancePolicy, Periodic};
use crate::engine::error::{ConfigError, PotentialError, particle_count};
use itertools::Itertools;
use std::f64::consts::PI;

/// Volume of a `d`-dimensional ball, `pi^{d/2} r^d / Gamma(d/2 + 1)`.
pub fn ball_volume(radius: f64, d: usize) -> f64 {
    match d {
        0 => 1.0,
        1 => 2.0 * radius,
        _ => ball_volume(radius, d - 2) * 2.0 * PI * radius * radius / d as f64,
    }
}

/// Radial distribution function of a periodic system, accumulated over configurations.
///
/// Minimum-image separations up to half the smallest box length are binned. Every
/// configuration must hold the same number of particles.
#[derive(Debug, Clone)]
pub struct PairDistanceHistogram<const D: usize> {
    distance: Periodic<D>,
    histogram: Histogram,
    configurations: usize,
    particles: Option<usize>,
}

impl<const D: usize> PairDistanceHistogram<D> {
    pub fn new(box_lengths: &[f64], bins: usize) -> Result<Self, ConfigError> {
        let distance = Periodic::<D>::new(box_lengths)?;
        let max = 0.5 * distance.lengths().min();
        Ok(Self {
            distance,
            histogram: Histogram::new(0.0, max, bins)?,
            configurations: 0,
            particles: None,
        })
    }

    pub fn add_configuration(&mut self, coords: &[f64]) -> Result<(), PotentialError> {
        let n = particle_count(coords, D, self.particles)?;
        self.particles = Some(n);
        self.configurations += 1;
        for (i, j) in (0..n).tuple_combinations() {
            let delta = self
                .distance
                .displacement(&coords[i * D..(i + 1) * D], &coords[j * D..(j + 1) * D]);
            self.histogram.add(delta.norm());
        }
        Ok(())
    }

    pub fn configurations(&self) -> usize {
        self.configurations
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Bin centers.
    pub fn radii(&self) -> Vec<f64> {
        self.histogram.centers()
    }

    /// `g(r) = 2 n(r) / (configs N rho V_shell(r))` at each bin center. All zeros before the
    /// first configuration.
    pub fn distribution(&self) -> Vec<f64> {
        let (Some(n), true) = (self.particles, self.configurations > 0) else {
            return vec![0.0; self.histogram.bins()];
        };
        let density = n as f64 / self.distance.lengths().product();
        let half_width = 0.5 * self.histogram.bin_width();
        self.histogram
            .counts()
            .iter()
            .enumerate()
            .map(|(bin, &count)| {
                let r = self.histogram.center(bin);
                let shell = ball_volume(r + half_width, D) - ball_volume(r - half_width, D);
                let ideal = self.configurations as f64 * n as f64 * density * shell;
                if ideal > 0.0 {
                    2.0 * count as f64 / ideal
                } else {
                    0.0
                }
            })
            .collect()
    }
}
