use super::config::{PairStrategy, PotentialConfig};
use super::error::ConfigError;
use super::frozen::FrozenPotential;
use super::pairs::PairSource;
use super::pairwise::{
    OpenAllPairs, OpenCellList, PairwisePotential, PeriodicAllPairs, PeriodicCellList,
};
use super::potential::Potential;
use crate::core::distance::{Boundary, BoxGeometry, DistancePolicy};
use crate::core::interactions::InteractionLaw;
use crate::core::interactions::law::Law;
use tracing::{debug, instrument, warn};

pub type DynPotential = Box<dyn Potential + Send>;

/// Builds the potential described by `config`, choosing the dimension, distance policy and
/// pair strategy at runtime.
#[instrument(skip_all, name = "build_potential", fields(ndim = config.ndim()))]
pub fn build_potential(config: &PotentialConfig) -> Result<DynPotential, ConfigError> {
    let law = config.law.build()?;
    match config.ndim() {
        2 => build_with_dimension::<2>(config, law),
        3 => build_with_dimension::<3>(config, law),
        n => Err(ConfigError::DimensionUnsupported(n)),
    }
}

/// Like [`build_potential`], wrapped in a [`FrozenPotential`] when the configuration freezes
/// any degrees of freedom. `reference` supplies the frozen values.
pub fn build_with_reference(
    config: &PotentialConfig,
    reference: &[f64],
) -> Result<DynPotential, ConfigError> {
    let potential = build_potential(config)?;
    match &config.frozen {
        Some(selection) => {
            let dofs = selection.dofs(config.ndim());
            let frozen = FrozenPotential::new(potential, reference.to_vec(), dofs)?;
            debug!(
                frozen = frozen.frozen_dofs().len(),
                mobile = frozen.reduced_ndof(),
                "Wrapped potential with frozen coordinates."
            );
            Ok(Box::new(frozen))
        }
        None => Ok(potential),
    }
}

fn build_with_dimension<const D: usize>(
    config: &PotentialConfig,
    law: Law,
) -> Result<DynPotential, ConfigError> {
    let lengths = config.geometry.box_lengths.as_slice();
    let geometry = BoxGeometry::<D>::new(lengths, config.geometry.boundary)?;
    let scale = config.cell_scale;

    match geometry.boundary() {
        Boundary::Open => {
            if config.strategy != PairStrategy::AllPairs {
                let attempt = OpenCellList::<Law, D>::new(law, lengths, scale);
                if let Some(potential) = cell_list_or_fallback(attempt, config.strategy)? {
                    return Ok(finish(potential, config));
                }
            }
            Ok(finish(OpenAllPairs::<Law, D>::new(law), config))
        }
        Boundary::Periodic => {
            if config.strategy != PairStrategy::AllPairs {
                let attempt = PeriodicCellList::<Law, D>::new(law, lengths, scale);
                if let Some(potential) = cell_list_or_fallback(attempt, config.strategy)? {
                    return Ok(finish(potential, config));
                }
            }
            let potential = PeriodicAllPairs::<Law, D>::new(law, lengths)?;
            Ok(finish(potential, config))
        }
    }
}

/// Under [`PairStrategy::Auto`], grid failures that all-pairs evaluation does not share
/// become `None`.
fn cell_list_or_fallback<T>(
    attempt: Result<T, ConfigError>,
    strategy: PairStrategy,
) -> Result<Option<T>, ConfigError> {
    match attempt {
        Ok(potential) => Ok(Some(potential)),
        Err(
            err @ (ConfigError::DomainTooSmall { .. }
            | ConfigError::CutoffExceedsBoxDiagonal { .. }
            | ConfigError::InvalidCutoff(_)),
        ) if strategy == PairStrategy::Auto => {
            warn!(reason = %err, "Cell list unavailable, falling back to all-pairs evaluation.");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn finish<L, P, S, const D: usize>(
    potential: PairwisePotential<L, P, S, D>,
    config: &PotentialConfig,
) -> DynPotential
where
    L: InteractionLaw + 'static,
    P: DistancePolicy<D> + 'static,
    S: PairSource + 'static,
{
    let potential = potential.with_parallel(config.parallel);
    match config.particle_count {
        Some(count) => Box::new(potential.with_particle_count(count)),
        None => Box::new(potential),
    }
}
