use super::{InteractionLaw, RadialTerms, require_cutoff, require_non_negative, require_positive};
use crate::engine::error::ConfigError;

/// `ε e^{-ρ(r - r0)} (e^{-ρ(r - r0)} - 2)`: well depth `ε` at `r0`, range set by `ρ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Morse {
    epsilon: f64,
    rho: f64,
    r0: f64,
    cutoff: f64,
}

impl Morse {
    pub fn new(epsilon: f64, rho: f64, r0: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            epsilon: require_non_negative("morse", "epsilon", epsilon)?,
            rho: require_positive("morse", "rho", rho)?,
            r0: require_non_negative("morse", "r0", r0)?,
            cutoff: f64::INFINITY,
        })
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Result<Self, ConfigError> {
        self.cutoff = require_cutoff("morse", cutoff)?;
        Ok(self)
    }

    #[inline]
    fn terms(&self, r: f64) -> RadialTerms {
        let g = (-self.rho * (r - self.r0)).exp();
        let g2 = g * g;
        RadialTerms {
            energy: self.epsilon * (g2 - 2.0 * g),
            first: 2.0 * self.epsilon * self.rho * (g - g2),
            second: 2.0 * self.epsilon * self.rho * self.rho * (2.0 * g2 - g),
        }
    }
}

impl InteractionLaw for Morse {
    fn name(&self) -> &'static str {
        "morse"
    }

    fn cutoff(&self) -> f64 {
        self.cutoff
    }

    fn energy(&self, r: f64) -> f64 {
        self.terms(r).energy
    }

    fn energy_derivative(&self, r: f64) -> (f64, f64) {
        let t = self.terms(r);
        (t.energy, t.first)
    }

    fn energy_derivatives(&self, r: f64) -> Option<RadialTerms> {
        Some(self.terms(r))
    }
}
