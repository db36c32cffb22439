use super::{InteractionLaw, RadialTerms, require_cutoff, require_non_negative, require_positive};
use crate::engine::error::ConfigError;

/// Spring `½ k (r - r0)²` between every pair inside the cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    k: f64,
    r0: f64,
    cutoff: f64,
}

impl Harmonic {
    pub fn new(k: f64, r0: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            k: require_non_negative("harmonic", "k", k)?,
            r0: require_non_negative("harmonic", "r0", r0)?,
            cutoff: f64::INFINITY,
        })
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Result<Self, ConfigError> {
        self.cutoff = require_cutoff("harmonic", cutoff)?;
        Ok(self)
    }
}

impl InteractionLaw for Harmonic {
    fn name(&self) -> &'static str {
        "harmonic"
    }

    fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[inline]
    fn energy(&self, r: f64) -> f64 {
        let dr = r - self.r0;
        0.5 * self.k * dr * dr
    }

    #[inline]
    fn energy_derivative(&self, r: f64) -> (f64, f64) {
        let dr = r - self.r0;
        (0.5 * self.k * dr * dr, self.k * dr)
    }

    fn energy_derivatives(&self, r: f64) -> Option<RadialTerms> {
        let (energy, first) = self.energy_derivative(r);
        Some(RadialTerms {
            energy,
            first,
            second: self.k,
        })
    }
}

/// One-sided spring: `½ k (r - r0)²` for `r < r0`, zero beyond. The contact distance `r0`
/// doubles as the cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepulsiveHarmonic {
    inner: Harmonic,
}

impl RepulsiveHarmonic {
    pub fn new(k: f64, r0: f64) -> Result<Self, ConfigError> {
        let r0 = require_positive("repulsive-harmonic", "r0", r0)?;
        Ok(Self {
            inner: Harmonic::new(k, r0)?.with_cutoff(r0)?,
        })
    }
}

impl InteractionLaw for RepulsiveHarmonic {
    fn name(&self) -> &'static str {
        "repulsive-harmonic"
    }

    fn cutoff(&self) -> f64 {
        self.inner.r0
    }

    fn energy(&self, r: f64) -> f64 {
        self.inner.energy(r)
    }

    fn energy_derivative(&self, r: f64) -> (f64, f64) {
        self.inner.energy_derivative(r)
    }

    fn energy_derivatives(&self, r: f64) -> Option<RadialTerms> {
        self.inner.energy_derivatives(r)
    }
}
