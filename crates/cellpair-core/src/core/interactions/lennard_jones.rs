use super::{InteractionLaw, RadialTerms, require_cutoff, require_non_negative, require_positive};
use crate::engine::error::ConfigError;

/// `4ε [(σ/r)^12 - (σ/r)^6]`, truncated (not shifted) at the cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LennardJones {
    epsilon: f64,
    sigma: f64,
    c6: f64,
    c12: f64,
    cutoff: f64,
}

impl LennardJones {
    pub fn new(epsilon: f64, sigma: f64) -> Result<Self, ConfigError> {
        let epsilon = require_non_negative("lennard-jones", "epsilon", epsilon)?;
        let sigma = require_positive("lennard-jones", "sigma", sigma)?;
        let sigma6 = sigma.powi(6);
        Ok(Self {
            epsilon,
            sigma,
            c6: 4.0 * epsilon * sigma6,
            c12: 4.0 * epsilon * sigma6 * sigma6,
            cutoff: f64::INFINITY,
        })
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Result<Self, ConfigError> {
        self.cutoff = require_cutoff("lennard-jones", cutoff)?;
        Ok(self)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    #[inline]
    fn terms(&self, r: f64) -> RadialTerms {
        let ir = 1.0 / r;
        let ir2 = ir * ir;
        let ir6 = ir2 * ir2 * ir2;
        let rep = self.c12 * ir6 * ir6;
        let att = self.c6 * ir6;
        RadialTerms {
            energy: rep - att,
            first: (-12.0 * rep + 6.0 * att) * ir,
            second: (156.0 * rep - 42.0 * att) * ir2,
        }
    }
}

impl InteractionLaw for LennardJones {
    fn name(&self) -> &'static str {
        "lennard-jones"
    }

    fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[inline]
    fn energy(&self, r: f64) -> f64 {
        let ir6 = 1.0 / r.powi(6);
        (self.c12 * ir6 - self.c6) * ir6
    }

    #[inline]
    fn energy_derivative(&self, r: f64) -> (f64, f64) {
        let t = self.terms(r);
        (t.energy, t.first)
    }

    fn energy_derivatives(&self, r: f64) -> Option<RadialTerms> {
        Some(self.terms(r))
    }

    fn singular_radius(&self) -> Option<f64> {
        Some(0.0)
    }
}

/// Lennard-Jones plus a quadratic blend `A + B r²` chosen so that both the energy and the
/// force vanish at the cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothCutLennardJones {
    lj: LennardJones,
    a0: f64,
    a2: f64,
}

impl SmoothCutLennardJones {
    pub fn new(epsilon: f64, sigma: f64, cutoff: f64) -> Result<Self, ConfigError> {
        let cutoff = require_positive("lennard-jones-smooth", "cutoff", cutoff)?;
        let lj = LennardJones::new(epsilon, sigma)?.with_cutoff(cutoff)?;
        let at_cutoff = lj.terms(cutoff);
        let a2 = -at_cutoff.first / (2.0 * cutoff);
        let a0 = -at_cutoff.energy - a2 * cutoff * cutoff;
        Ok(Self { lj, a0, a2 })
    }
}

impl InteractionLaw for SmoothCutLennardJones {
    fn name(&self) -> &'static str {
        "lennard-jones-smooth"
    }

    fn cutoff(&self) -> f64 {
        self.lj.cutoff
    }

    fn energy(&self, r: f64) -> f64 {
        self.lj.energy(r) + self.a0 + self.a2 * r * r
    }

    fn energy_derivative(&self, r: f64) -> (f64, f64) {
        let t = self.lj.terms(r);
        (
            t.energy + self.a0 + self.a2 * r * r,
            t.first + 2.0 * self.a2 * r,
        )
    }

    fn energy_derivatives(&self, r: f64) -> Option<RadialTerms> {
        let t = self.lj.terms(r);
        Some(RadialTerms {
            energy: t.energy + self.a0 + self.a2 * r * r,
            first: t.first + 2.0 * self.a2 * r,
            second: t.second + 2.0 * self.a2,
        })
    }

    fn singular_radius(&self) -> Option<f64> {
        Some(0.0)
    }
}

/// Weeks-Chandler-Andersen: the repulsive branch of Lennard-Jones, shifted up by `ε` and cut
/// at its minimum `2^(1/6) σ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wca {
    lj: LennardJones,
}

impl Wca {
    pub fn new(epsilon: f64, sigma: f64) -> Result<Self, ConfigError> {
        let lj = LennardJones::new(epsilon, sigma)?;
        let cutoff = 2f64.powf(1.0 / 6.0) * lj.sigma;
        Ok(Self {
            lj: lj.with_cutoff(cutoff)?,
        })
    }
}

impl InteractionLaw for Wca {
    fn name(&self) -> &'static str {
        "wca"
    }

    fn cutoff(&self) -> f64 {
        self.lj.cutoff
    }

    fn energy(&self, r: f64) -> f64 {
        self.lj.energy(r) + self.lj.epsilon
    }

    fn energy_derivative(&self, r: f64) -> (f64, f64) {
        let (e, de) = self.lj.energy_derivative(r);
        (e + self.lj.epsilon, de)
    }

    fn energy_derivatives(&self, r: f64) -> Option<RadialTerms> {
        let mut t = self.lj.terms(r);
        t.energy += self.lj.epsilon;
        Some(t)
    }

    fn singular_radius(&self) -> Option<f64> {
        Some(0.0)
    }
}
