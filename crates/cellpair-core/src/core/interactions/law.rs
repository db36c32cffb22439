use super::InteractionLaw;
use super::RadialTerms;
use super::hard_sphere::{HsWca, SmoothForceHsWca};
use super::harmonic::{Harmonic, RepulsiveHarmonic};
use super::inverse_power::{Exponent, InversePower};
use super::lennard_jones::{LennardJones, SmoothCutLennardJones, Wca};
use super::morse::Morse;
use crate::engine::error::ConfigError;
use serde::Deserialize;

/// Declarative description of an interaction law, as read from configuration files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LawSpec {
    LennardJones {
        epsilon: f64,
        sigma: f64,
        cutoff: Option<f64>,
    },
    LennardJonesSmooth {
        epsilon: f64,
        sigma: f64,
        cutoff: f64,
    },
    Wca {
        epsilon: f64,
        sigma: f64,
    },
    InversePower {
        epsilon: f64,
        sigma: f64,
        exponent: f64,
        cutoff: Option<f64>,
    },
    Harmonic {
        k: f64,
        #[serde(default)]
        r0: f64,
        cutoff: Option<f64>,
    },
    RepulsiveHarmonic {
        k: f64,
        r0: f64,
    },
    Morse {
        epsilon: f64,
        rho: f64,
        r0: f64,
        cutoff: Option<f64>,
    },
    HsWca {
        epsilon: f64,
        sigma: f64,
        diameter: f64,
    },
    SfHsWca {
        epsilon: f64,
        sigma: f64,
        diameter: f64,
    },
}

impl LawSpec {
    pub fn build(&self) -> Result<Law, ConfigError> {
        let law = match *self {
            LawSpec::LennardJones {
                epsilon,
                sigma,
                cutoff,
            } => {
                let lj = LennardJones::new(epsilon, sigma)?;
                match cutoff {
                    Some(cutoff) => lj.with_cutoff(cutoff)?,
                    None => lj,
                }
                .into()
            }
            LawSpec::LennardJonesSmooth {
                epsilon,
                sigma,
                cutoff,
            } => SmoothCutLennardJones::new(epsilon, sigma, cutoff)?.into(),
            LawSpec::Wca { epsilon, sigma } => Wca::new(epsilon, sigma)?.into(),
            LawSpec::InversePower {
                epsilon,
                sigma,
                exponent,
                cutoff,
            } => {
                let law = InversePower::new(epsilon, sigma, Exponent::from_f64(exponent)?)?;
                match cutoff {
                    Some(cutoff) => law.with_cutoff(cutoff)?,
                    None => law,
                }
                .into()
            }
            LawSpec::Harmonic { k, r0, cutoff } => {
                let law = Harmonic::new(k, r0)?;
                match cutoff {
                    Some(cutoff) => law.with_cutoff(cutoff)?,
                    None => law,
                }
                .into()
            }
            LawSpec::RepulsiveHarmonic { k, r0 } => RepulsiveHarmonic::new(k, r0)?.into(),
            LawSpec::Morse {
                epsilon,
                rho,
                r0,
                cutoff,
            } => {
                let law = Morse::new(epsilon, rho, r0)?;
                match cutoff {
                    Some(cutoff) => law.with_cutoff(cutoff)?,
                    None => law,
                }
                .into()
            }
            LawSpec::HsWca {
                epsilon,
                sigma,
                diameter,
            } => HsWca::new(epsilon, sigma, diameter)?.into(),
            LawSpec::SfHsWca {
                epsilon,
                sigma,
                diameter,
            } => SmoothForceHsWca::new(epsilon, sigma, diameter)?.into(),
        };
        Ok(law)
    }
}

/// Runtime-selected interaction law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Law {
    LennardJones(LennardJones),
    SmoothCutLennardJones(SmoothCutLennardJones),
    Wca(Wca),
    InversePower(InversePower),
    Harmonic(Harmonic),
    RepulsiveHarmonic(RepulsiveHarmonic),
    Morse(Morse),
    HsWca(HsWca),
    SmoothForceHsWca(SmoothForceHsWca),
}

macro_rules! dispatch {
    ($self:ident, $law:ident => $body:expr) => {
        match $self {
            Law::LennardJones($law) => $body,
            Law::SmoothCutLennardJones($law) => $body,
            Law::Wca($law) => $body,
            Law::InversePower($law) => $body,
            Law::Harmonic($law) => $body,
            Law::RepulsiveHarmonic($law) => $body,
            Law::Morse($law) => $body,
            Law::HsWca($law) => $body,
            Law::SmoothForceHsWca($law) => $body,
        }
    };
}

macro_rules! impl_from_law {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Law {
                fn from(law: $variant) -> Self {
                    Law::$variant(law)
                }
            }
        )*
    };
}

impl_from_law!(
    LennardJones,
    SmoothCutLennardJones,
    Wca,
    InversePower,
    Harmonic,
    RepulsiveHarmonic,
    Morse,
    HsWca,
    SmoothForceHsWca,
);

impl InteractionLaw for Law {
    fn name(&self) -> &'static str {
        dispatch!(self, law => law.name())
    }

    fn cutoff(&self) -> f64 {
        dispatch!(self, law => law.cutoff())
    }

    #[inline]
    fn energy(&self, r: f64) -> f64 {
        dispatch!(self, law => law.energy(r))
    }

    #[inline]
    fn energy_derivative(&self, r: f64) -> (f64, f64) {
        dispatch!(self, law => law.energy_derivative(r))
    }

    fn energy_derivatives(&self, r: f64) -> Option<RadialTerms> {
        dispatch!(self, law => law.energy_derivatives(r))
    }

    fn singular_radius(&self) -> Option<f64> {
        dispatch!(self, law => law.singular_radius())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interactions::testing::assert_derivatives_match;

    fn every_law() -> Vec<LawSpec> {
        vec![
            LawSpec::LennardJones {
                epsilon: 1.0,
                sigma: 1.0,
                cutoff: Some(2.5),
            },
            LawSpec::LennardJonesSmooth {
                epsilon: 1.0,
                sigma: 1.0,
                cutoff: 2.5,
            },
            LawSpec::Wca {
                epsilon: 1.0,
                sigma: 1.0,
            },
            LawSpec::InversePower {
                epsilon: 1.0,
                sigma: 1.0,
                exponent: 4.5,
                cutoff: Some(2.0),
            },
            LawSpec::Harmonic {
                k: 2.0,
                r0: 1.0,
                cutoff: None,
            },
            LawSpec::RepulsiveHarmonic { k: 5.0, r0: 1.2 },
            LawSpec::Morse {
                epsilon: 1.0,
                rho: 4.0,
                r0: 1.0,
                cutoff: Some(2.0),
            },
            LawSpec::HsWca {
                epsilon: 1.0,
                sigma: 0.3,
                diameter: 0.9,
            },
            LawSpec::SfHsWca {
                epsilon: 1.0,
                sigma: 0.3,
                diameter: 0.9,
            },
        ]
    }

    #[test]
    fn every_law_builds_and_matches_finite_differences_inside_its_cutoff() {
        for spec in every_law() {
            let law = spec.build().unwrap();
            let lower = law.singular_radius().unwrap_or(0.0) + 0.02;
            let upper = law.cutoff().min(2.0);
            for step in 1..5 {
                let r = lower + (upper - lower) * f64::from(step) / 5.0;
                assert_derivatives_match(&law, r);
            }
        }
    }

    #[test]
    fn dispatch_agrees_with_concrete_law() {
        let concrete = Morse::new(1.0, 2.0, 1.5).unwrap();
        let law = Law::from(concrete);
        assert_eq!(law.name(), "morse");
        assert_eq!(law.energy(1.3), concrete.energy(1.3));
        assert_eq!(law.energy_derivative(1.3), concrete.energy_derivative(1.3));
    }

    #[test]
    fn law_spec_deserializes_from_toml() {
        let spec: LawSpec = toml::from_str(
            r#"
            kind = "lennard-jones"
            epsilon = 1.0
            sigma = 1.0
            cutoff = 2.5
            "#,
        )
        .unwrap();
        assert_eq!(
            spec,
            LawSpec::LennardJones {
                epsilon: 1.0,
                sigma: 1.0,
                cutoff: Some(2.5)
            }
        );
        assert_eq!(spec.build().unwrap().cutoff(), 2.5);
    }

    #[test]
    fn law_spec_defaults_harmonic_rest_length_to_zero() {
        let spec: LawSpec = toml::from_str("kind = \"harmonic\"\nk = 3.0").unwrap();
        assert_eq!(
            spec,
            LawSpec::Harmonic {
                k: 3.0,
                r0: 0.0,
                cutoff: None
            }
        );
    }

    #[test]
    fn law_spec_reports_invalid_parameters() {
        let spec = LawSpec::InversePower {
            epsilon: 1.0,
            sigma: 1.0,
            exponent: 3.3,
            cutoff: None,
        };
        assert!(matches!(
            spec.build(),
            Err(ConfigError::InvalidParameter {
                name: "exponent",
                ..
            })
        ));
    }
}
