//! # Interaction Laws
//!
//! Pure radial pair potentials `e(r)` together with their first and second derivatives.
//! Every law is immutable after construction: parameters are validated once and each
//! evaluation depends only on the separation passed in.
//!
//! ## Sign Conventions
//!
//! For a pair `(i, j)` with displacement `Δ = r_i - r_j` and separation `r = |Δ|`, the
//! gradient contribution on particle `i` is `e'(r) Δ / r` and the contribution on `j` is its
//! exact negation. Forces are the negated gradients.
//!
//! ## Laws
//!
//! - [`lennard_jones`] - Lennard-Jones 12-6, its smoothly truncated variant, and WCA
//! - [`inverse_power`] - `ε (σ / r)^n` with integer or half-integer `n`
//! - [`harmonic`] - harmonic springs and one-sided harmonic repulsion
//! - [`morse`] - Morse bond potential
//! - [`hard_sphere`] - hard-sphere-plus-WCA composites, plain and smooth-force
//! - [`law`] - tagged-variant dispatch over all of the above, for runtime configuration

pub mod hard_sphere;
pub mod harmonic;
pub mod inverse_power;
pub mod law;
pub mod lennard_jones;
pub mod morse;

use crate::engine::error::ConfigError;

/// Energy and its radial derivatives at one separation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RadialTerms {
    pub energy: f64,
    pub first: f64,
    pub second: f64,
}

pub trait InteractionLaw: Send + Sync {
    fn name(&self) -> &'static str;

    /// Separation at and beyond which the law contributes exactly zero.
    fn cutoff(&self) -> f64;

    fn energy(&self, r: f64) -> f64;

    /// Returns `(e(r), de/dr)`.
    fn energy_derivative(&self, r: f64) -> (f64, f64);

    /// Closed-form second derivative, when the law provides one.
    fn energy_derivatives(&self, _r: f64) -> Option<RadialTerms> {
        None
    }

    /// Separation at or below which the law diverges, if it diverges at all.
    fn singular_radius(&self) -> Option<f64> {
        None
    }
}

pub(crate) fn require_positive(
    law: &'static str,
    name: &'static str,
    value: f64,
) -> Result<f64, ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { law, name, value })
    }
}

pub(crate) fn require_non_negative(
    law: &'static str,
    name: &'static str,
    value: f64,
) -> Result<f64, ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter { law, name, value })
    }
}

/// Cutoffs may be infinite (no truncation) but never zero, negative or NaN.
pub(crate) fn require_cutoff(law: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            law,
            name: "cutoff",
            value,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::InteractionLaw;

    /// Asserts that analytic derivatives agree with central finite differences at `r`.
    pub fn assert_derivatives_match<L: InteractionLaw + ?Sized>(law: &L, r: f64) {
        let h = 1e-6 * r.max(1.0);
        let (e, de) = law.energy_derivative(r);
        assert!(
            (e - law.energy(r)).abs() <= 1e-12 * e.abs().max(1.0),
            "{}: energy mismatch at r = {}",
            law.name(),
            r
        );
        let numeric = (law.energy(r + h) - law.energy(r - h)) / (2.0 * h);
        assert!(
            (numeric - de).abs() <= 1e-5 * de.abs().max(1.0),
            "{}: first derivative {} vs numeric {} at r = {}",
            law.name(),
            de,
            numeric,
            r
        );
        if let Some(terms) = law.energy_derivatives(r) {
            assert!((terms.energy - e).abs() <= 1e-12 * e.abs().max(1.0));
            assert!((terms.first - de).abs() <= 1e-12 * de.abs().max(1.0));
            let numeric = (law.energy_derivative(r + h).1 - law.energy_derivative(r - h).1)
                / (2.0 * h);
            assert!(
                (numeric - terms.second).abs() <= 1e-5 * terms.second.abs().max(1.0),
                "{}: second derivative {} vs numeric {} at r = {}",
                law.name(),
                terms.second,
                numeric,
                r
            );
        }
    }
}
