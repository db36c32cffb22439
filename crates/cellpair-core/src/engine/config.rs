use super::error::ConfigError;
use crate::core::distance::Boundary;
use crate::core::interactions::law::LawSpec;
use serde::Deserialize;

pub const DEFAULT_CELL_SCALE: f64 = 1.0;

/// How candidate pairs are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairStrategy {
    AllPairs,
    CellList,
    /// Cell list when the box admits a valid grid, all pairs otherwise.
    #[default]
    Auto,
}

/// Degrees of freedom to hold fixed during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrozenSelection {
    /// Every coordinate of these particles.
    Particles(Vec<usize>),
    /// Individual flat coordinate indices.
    Dofs(Vec<usize>),
}

impl FrozenSelection {
    pub fn dofs(&self, ndim: usize) -> Vec<usize> {
        match self {
            Self::Particles(particles) => particles
                .iter()
                .flat_map(|&p| p * ndim..(p + 1) * ndim)
                .collect(),
            Self::Dofs(dofs) => dofs.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Particles(list) | Self::Dofs(list) => list.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryConfig {
    pub box_lengths: Vec<f64>,
    pub boundary: Boundary,
}

impl GeometryConfig {
    pub fn ndim(&self) -> usize {
        self.box_lengths.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PotentialConfig {
    pub law: LawSpec,
    pub geometry: GeometryConfig,
    pub strategy: PairStrategy,
    pub cell_scale: f64,
    pub particle_count: Option<usize>,
    pub frozen: Option<FrozenSelection>,
    pub parallel: bool,
}

impl PotentialConfig {
    pub fn ndim(&self) -> usize {
        self.geometry.ndim()
    }
}

#[derive(Default)]
pub struct PotentialConfigBuilder {
    law: Option<LawSpec>,
    box_lengths: Option<Vec<f64>>,
    boundary: Option<Boundary>,
    strategy: Option<PairStrategy>,
    cell_scale: Option<f64>,
    particle_count: Option<usize>,
    frozen: Option<FrozenSelection>,
    parallel: Option<bool>,
}

impl PotentialConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn law(mut self, law: LawSpec) -> Self {
        self.law = Some(law);
        self
    }
    pub fn box_lengths(mut self, lengths: Vec<f64>) -> Self {
        self.box_lengths = Some(lengths);
        self
    }
    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = Some(boundary);
        self
    }
    pub fn strategy(mut self, strategy: PairStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
    pub fn cell_scale(mut self, scale: f64) -> Self {
        self.cell_scale = Some(scale);
        self
    }
    pub fn particle_count(mut self, count: usize) -> Self {
        self.particle_count = Some(count);
        self
    }
    pub fn frozen(mut self, selection: FrozenSelection) -> Self {
        self.frozen = Some(selection);
        self
    }
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    pub fn build(self) -> Result<PotentialConfig, ConfigError> {
        let geometry = GeometryConfig {
            box_lengths: self
                .box_lengths
                .ok_or(ConfigError::MissingParameter("box_lengths"))?,
            boundary: self.boundary.unwrap_or_default(),
        };
        if !matches!(geometry.ndim(), 2 | 3) {
            return Err(ConfigError::DimensionUnsupported(geometry.ndim()));
        }
        if let Some((dim, &length)) = geometry
            .box_lengths
            .iter()
            .enumerate()
            .find(|(_, l)| !(**l > 0.0) || !l.is_finite())
        {
            return Err(ConfigError::NonPositiveBoxLength { dim, length });
        }
        let cell_scale = self.cell_scale.unwrap_or(DEFAULT_CELL_SCALE);
        if !(cell_scale > 0.0) || !cell_scale.is_finite() {
            return Err(ConfigError::InvalidCellScale(cell_scale));
        }
        Ok(PotentialConfig {
            law: self.law.ok_or(ConfigError::MissingParameter("law"))?,
            geometry,
            strategy: self.strategy.unwrap_or_default(),
            cell_scale,
            particle_count: self.particle_count,
            frozen: self.frozen.filter(|selection| !selection.is_empty()),
            parallel: self.parallel.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lj() -> LawSpec {
        LawSpec::LennardJones {
            epsilon: 1.0,
            sigma: 1.0,
            cutoff: Some(2.5),
        }
    }

    #[test]
    fn build_applies_defaults_for_optional_settings() {
        let config = PotentialConfigBuilder::new()
            .law(lj())
            .box_lengths(vec![10.0, 10.0, 10.0])
            .build()
            .unwrap();
        assert_eq!(config.geometry.boundary, Boundary::Open);
        assert_eq!(config.strategy, PairStrategy::Auto);
        assert_eq!(config.cell_scale, DEFAULT_CELL_SCALE);
        assert!(config.parallel);
        assert!(config.frozen.is_none());
        assert_eq!(config.ndim(), 3);
    }

    #[test]
    fn build_fails_without_law_or_box() {
        let missing_law = PotentialConfigBuilder::new()
            .box_lengths(vec![5.0, 5.0])
            .build();
        assert_eq!(missing_law, Err(ConfigError::MissingParameter("law")));

        let missing_box = PotentialConfigBuilder::new().law(lj()).build();
        assert_eq!(missing_box, Err(ConfigError::MissingParameter("box_lengths")));
    }

    #[test]
    fn build_rejects_unsupported_dimensions_and_bad_lengths() {
        let one_d = PotentialConfigBuilder::new()
            .law(lj())
            .box_lengths(vec![5.0])
            .build();
        assert_eq!(one_d, Err(ConfigError::DimensionUnsupported(1)));

        let negative = PotentialConfigBuilder::new()
            .law(lj())
            .box_lengths(vec![5.0, -1.0])
            .build();
        assert_eq!(
            negative,
            Err(ConfigError::NonPositiveBoxLength {
                dim: 1,
                length: -1.0
            })
        );

        let scale = PotentialConfigBuilder::new()
            .law(lj())
            .box_lengths(vec![5.0, 5.0])
            .cell_scale(0.0)
            .build();
        assert_eq!(scale, Err(ConfigError::InvalidCellScale(0.0)));
    }

    #[test]
    fn empty_frozen_selection_is_dropped() {
        let config = PotentialConfigBuilder::new()
            .law(lj())
            .box_lengths(vec![5.0, 5.0])
            .frozen(FrozenSelection::Particles(vec![]))
            .build()
            .unwrap();
        assert!(config.frozen.is_none());
    }

    #[test]
    fn frozen_particles_expand_to_their_coordinates() {
        let selection = FrozenSelection::Particles(vec![0, 2]);
        assert_eq!(selection.dofs(2), vec![0, 1, 4, 5]);
        assert_eq!(FrozenSelection::Dofs(vec![3]).dofs(3), vec![3]);
    }

    #[test]
    fn strategy_and_selection_deserialize_from_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: PairStrategy,
            frozen: FrozenSelection,
        }
        let parsed: Wrapper = toml::from_str(
            r#"
            strategy = "cell-list"
            frozen = { particles = [1, 4] }
            "#,
        )
        .unwrap();
        assert_eq!(parsed.strategy, PairStrategy::CellList);
        assert_eq!(parsed.frozen, FrozenSelection::Particles(vec![1, 4]));
    }
}
