use super::{WorkflowError, check_frame_dimension};
use crate::core::analysis::PairDistanceHistogram;
use crate::core::io::frame::Frame;
use crate::engine::error::ConfigError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct PairDistribution {
    /// Bin centers.
    pub radii: Vec<f64>,
    pub g: Vec<f64>,
    pub configurations: usize,
}

/// Radial distribution function of `frames` in a periodic box with the given lengths.
#[instrument(skip_all, name = "pair_distribution_workflow", fields(frames = frames.len(), bins = bins))]
pub fn run(
    box_lengths: &[f64],
    bins: usize,
    frames: &[Frame],
    reporter: &ProgressReporter,
) -> Result<PairDistribution, WorkflowError> {
    check_frame_dimension(frames, box_lengths.len())?;
    let distribution = match box_lengths.len() {
        2 => accumulate::<2>(box_lengths, bins, frames, reporter)?,
        3 => accumulate::<3>(box_lengths, bins, frames, reporter)?,
        n => return Err(ConfigError::DimensionUnsupported(n).into()),
    };
    info!(
        configurations = distribution.configurations,
        "Computed pair distribution."
    );
    Ok(distribution)
}

fn accumulate<const D: usize>(
    box_lengths: &[f64],
    bins: usize,
    frames: &[Frame],
    reporter: &ProgressReporter,
) -> Result<PairDistribution, WorkflowError> {
    let mut histogram = PairDistanceHistogram::<D>::new(box_lengths, bins)?;
    reporter.report(Progress::PhaseStart {
        name: "Pair distances",
    });
    reporter.start_task(frames.len());
    for (index, frame) in frames.iter().enumerate() {
        histogram
            .add_configuration(&frame.coords)
            .map_err(WorkflowError::at_frame(index))?;
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    Ok(PairDistribution {
        radii: histogram.radii(),
        g: histogram.distribution(),
        configurations: histogram.configurations(),
    })
}
