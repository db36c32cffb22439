use super::{InteractionLaw, RadialTerms, require_non_negative, require_positive};
use crate::engine::error::ConfigError;

/// Hard core of diameter `a` dressed with a WCA shell. With `d² = r² - a²`,
/// `e = 4ε [(σ²/d²)^6 - (σ²/d²)^3] + ε` for `d² < 2^(1/3) σ²`, diverging as `r → a`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsWca {
    epsilon: f64,
    sigma2: f64,
    diameter: f64,
    cutoff: f64,
}

impl HsWca {
    pub fn new(epsilon: f64, sigma: f64, diameter: f64) -> Result<Self, ConfigError> {
        let epsilon = require_non_negative("hs-wca", "epsilon", epsilon)?;
        let sigma = require_positive("hs-wca", "sigma", sigma)?;
        let diameter = require_non_negative("hs-wca", "diameter", diameter)?;
        let sigma2 = sigma * sigma;
        let cutoff = (diameter * diameter + 2f64.powf(1.0 / 3.0) * sigma2).sqrt();
        Ok(Self {
            epsilon,
            sigma2,
            diameter,
            cutoff,
        })
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    #[inline]
    fn terms(&self, r: f64) -> RadialTerms {
        let d2 = r * r - self.diameter * self.diameter;
        if d2 <= 0.0 {
            return RadialTerms {
                energy: f64::INFINITY,
                first: f64::NEG_INFINITY,
                second: f64::INFINITY,
            };
        }
        let x = self.sigma2 / d2;
        let x3 = x * x * x;
        let x6 = x3 * x3;
        let eps4 = 4.0 * self.epsilon;
        // derivatives with respect to d², then chained through d(d²)/dr = 2r
        let g = -eps4 * (6.0 * x6 - 3.0 * x3) / d2;
        let h = eps4 * (42.0 * x6 - 12.0 * x3) / (d2 * d2);
        RadialTerms {
            energy: eps4 * (x6 - x3) + self.epsilon,
            first: 2.0 * r * g,
            second: 2.0 * g + 4.0 * r * r * h,
        }
    }
}

impl InteractionLaw for HsWca {
    fn name(&self) -> &'static str {
        "hs-wca"
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

    fn singular_radius(&self) -> Option<f64> {
        Some(self.diameter)
    }
}

/// [`HsWca`] minus `½ e''(r_c) (r - r_c)²`, so that energy, force and force derivative all
/// vanish continuously at the cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothForceHsWca {
    inner: HsWca,
    curvature_at_cutoff: f64,
}

impl SmoothForceHsWca {
    pub fn new(epsilon: f64, sigma: f64, diameter: f64) -> Result<Self, ConfigError> {
        let inner = HsWca::new(epsilon, sigma, diameter)?;
        let curvature_at_cutoff = inner.terms(inner.cutoff).second;
        Ok(Self {
            inner,
            curvature_at_cutoff,
        })
    }
}

impl InteractionLaw for SmoothForceHsWca {
    fn name(&self) -> &'static str {
        "sf-hs-wca"
    }

    fn cutoff(&self) -> f64 {
        self.inner.cutoff
    }

    fn energy(&self, r: f64) -> f64 {
        let dr = r - self.inner.cutoff;
        self.inner.energy(r) - 0.5 * self.curvature_at_cutoff * dr * dr
    }

    fn energy_derivative(&self, r: f64) -> (f64, f64) {
        let t = self.energy_derivatives_unchecked(r);
        (t.energy, t.first)
    }

    fn energy_derivatives(&self, r: f64) -> Option<RadialTerms> {
        Some(self.energy_derivatives_unchecked(r))
    }

    fn singular_radius(&self) -> Option<f64> {
        Some(self.inner.diameter)
    }
}

impl SmoothForceHsWca {
    #[inline]
    fn energy_derivatives_unchecked(&self, r: f64) -> RadialTerms {
        let t = self.inner.terms(r);
        let dr = r - self.inner.cutoff;
        RadialTerms {
            energy: t.energy - 0.5 * self.curvature_at_cutoff * dr * dr,
            first: t.first - self.curvature_at_cutoff * dr,
            second: t.second - self.curvature_at_cutoff,
        }
    }
}
