use super::{InteractionLaw, RadialTerms, require_cutoff, require_non_negative, require_positive};
use crate::engine::error::ConfigError;

/// Exponent of an inverse-power law, restricted to integers and half-integers so the power
/// can be evaluated with `powi` and at most one square root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exponent {
    Integer(u32),
    /// `HalfInteger(k)` is the exponent `k + 1/2`.
    HalfInteger(u32),
}

impl Exponent {
    pub fn from_f64(value: f64) -> Result<Self, ConfigError> {
        let twice = 2.0 * value;
        if !(value > 0.0) || twice.fract() != 0.0 || twice > f64::from(u32::MAX) {
            return Err(ConfigError::InvalidParameter {
                law: "inverse-power",
                name: "exponent",
                value,
            });
        }
        let twice = twice as u32;
        Ok(if twice % 2 == 0 {
            Exponent::Integer(twice / 2)
        } else {
            Exponent::HalfInteger(twice / 2)
        })
    }

    pub fn value(&self) -> f64 {
        match *self {
            Exponent::Integer(n) => f64::from(n),
            Exponent::HalfInteger(k) => f64::from(k) + 0.5,
        }
    }

    #[inline]
    pub fn pow(&self, x: f64) -> f64 {
        match *self {
            Exponent::Integer(n) => x.powi(n as i32),
            Exponent::HalfInteger(k) => x.powi(k as i32) * x.sqrt(),
        }
    }
}

/// `ε (σ / r)^n`, singular at `r = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InversePower {
    epsilon: f64,
    sigma: f64,
    exponent: Exponent,
    cutoff: f64,
}

impl InversePower {
    pub fn new(epsilon: f64, sigma: f64, exponent: Exponent) -> Result<Self, ConfigError> {
        Ok(Self {
            epsilon: require_non_negative("inverse-power", "epsilon", epsilon)?,
            sigma: require_positive("inverse-power", "sigma", sigma)?,
            exponent,
            cutoff: f64::INFINITY,
        })
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Result<Self, ConfigError> {
        self.cutoff = require_cutoff("inverse-power", cutoff)?;
        Ok(self)
    }

    pub fn exponent(&self) -> Exponent {
        self.exponent
    }
}

impl InteractionLaw for InversePower {
    fn name(&self) -> &'static str {
        "inverse-power"
    }

    fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[inline]
    fn energy(&self, r: f64) -> f64 {
        self.epsilon * self.exponent.pow(self.sigma / r)
    }

    #[inline]
    fn energy_derivative(&self, r: f64) -> (f64, f64) {
        let e = self.energy(r);
        (e, -self.exponent.value() * e / r)
    }

    fn energy_derivatives(&self, r: f64) -> Option<RadialTerms> {
        let n = self.exponent.value();
        let e = self.energy(r);
        Some(RadialTerms {
            energy: e,
            first: -n * e / r,
            second: n * (n + 1.0) * e / (r * r),
        })
    }

    fn singular_radius(&self) -> Option<f64> {
        Some(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interactions::testing::assert_derivatives_match;

    #[test]
    fn exponent_parses_integers_and_half_integers() {
        assert_eq!(Exponent::from_f64(12.0), Ok(Exponent::Integer(12)));
        assert_eq!(Exponent::from_f64(2.5), Ok(Exponent::HalfInteger(2)));
        assert_eq!(Exponent::HalfInteger(2).value(), 2.5);
    }

    #[test]
    fn exponent_rejects_other_values() {
        assert!(Exponent::from_f64(2.3).is_err());
        assert!(Exponent::from_f64(0.0).is_err());
        assert!(Exponent::from_f64(-1.0).is_err());
        assert!(Exponent::from_f64(f64::NAN).is_err());
    }

    #[test]
    fn half_integer_power_matches_powf() {
        let e = Exponent::HalfInteger(3);
        assert!((e.pow(1.7) - 1.7f64.powf(3.5)).abs() < 1e-12);
    }

    #[test]
    fn inverse_power_equals_epsilon_at_sigma() {
        let law = InversePower::new(2.0, 1.5, Exponent::Integer(12)).unwrap();
        assert!((law.energy(1.5) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn inverse_power_derivatives_match_finite_differences() {
        for exponent in [Exponent::Integer(6), Exponent::HalfInteger(2), Exponent::Integer(1)] {
            let law = InversePower::new(1.0, 1.0, exponent).unwrap();
            for r in [0.8, 1.0, 1.9] {
                assert_derivatives_match(&law, r);
            }
        }
    }

    #[test]
    fn inverse_power_diverges_at_contact() {
        let law = InversePower::new(1.0, 1.0, Exponent::Integer(4)).unwrap();
        assert_eq!(law.singular_radius(), Some(0.0));
        assert!(law.energy(0.0).is_infinite());
    }
}
