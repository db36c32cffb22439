use super::{WorkflowError, check_frame_dimension};
use crate::core::io::frame::Frame;
use crate::engine::accumulator::EvaluationMode;
use crate::engine::builder::{DynPotential, build_potential};
use crate::engine::config::PotentialConfig;
use crate::engine::error::PotentialError;
use crate::engine::frozen::FrozenPotential;
use crate::engine::potential::{NUMERICAL_STEP, Potential};
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::DMatrix;
use tracing::{debug, info, instrument};

/// Energy and derivatives of one frame.
///
/// The gradient always has one entry per coordinate of the frame, with zeros at frozen
/// coordinates. The Hessian covers only mobile coordinates when some are frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    pub index: usize,
    pub energy: f64,
    pub gradient: Option<Vec<f64>>,
    pub hessian: Option<DMatrix<f64>>,
}

/// Agreement between analytic and finite-difference gradients of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientCheck {
    pub index: usize,
    pub max_abs_deviation: f64,
    pub max_abs_gradient: f64,
}

impl GradientCheck {
    /// Deviation relative to the largest gradient component, floored at one.
    pub fn relative_deviation(&self) -> f64 {
        self.max_abs_deviation / self.max_abs_gradient.max(1.0)
    }
}

#[instrument(skip_all, name = "evaluate_workflow", fields(frames = frames.len(), mode = ?mode))]
pub fn run(
    config: &PotentialConfig,
    frames: &[Frame],
    mode: EvaluationMode,
    reporter: &ProgressReporter,
) -> Result<Vec<FrameResult>, WorkflowError> {
    check_frame_dimension(frames, config.ndim())?;

    reporter.report(Progress::PhaseStart { name: "Setup" });
    let mut potential = build_potential(config)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Evaluation" });
    reporter.start_task(frames.len());
    let mut results = Vec::with_capacity(frames.len());
    for (index, frame) in frames.iter().enumerate() {
        let result = evaluate_frame(&mut potential, config, frame, mode)
            .map_err(WorkflowError::at_frame(index))?;
        debug!(frame = index, energy = result.0, "Evaluated frame.");
        reporter.report(Progress::FrameEvaluated {
            index,
            energy: result.0,
        });
        reporter.report(Progress::TaskIncrement);
        results.push(FrameResult {
            index,
            energy: result.0,
            gradient: result.1,
            hessian: result.2,
        });
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    info!("Evaluated {} frame(s).", results.len());
    Ok(results)
}

type Evaluation = (f64, Option<Vec<f64>>, Option<DMatrix<f64>>);

fn evaluate_frame(
    potential: &mut DynPotential,
    config: &PotentialConfig,
    frame: &Frame,
    mode: EvaluationMode,
) -> Result<Evaluation, PotentialError> {
    let Some(selection) = &config.frozen else {
        return evaluate_mode(potential, &frame.coords, mode);
    };

    let dofs = selection.dofs(config.ndim());
    let mut frozen = FrozenPotential::new(&mut **potential, frame.coords.clone(), dofs)?;
    let reduced = frozen.reduce(&frame.coords)?;
    let (energy, gradient, hessian) = evaluate_mode(&mut frozen, &reduced, mode)?;
    let gradient = gradient
        .map(|g| frozen.expand_gradient(&g))
        .transpose()?;
    Ok((energy, gradient, hessian))
}

fn evaluate_mode<P: Potential + ?Sized>(
    potential: &mut P,
    coords: &[f64],
    mode: EvaluationMode,
) -> Result<Evaluation, PotentialError> {
    Ok(match mode {
        EvaluationMode::Energy => (potential.energy(coords)?, None, None),
        EvaluationMode::Gradient => {
            let (energy, gradient) = potential.energy_gradient(coords)?;
            (energy, Some(gradient), None)
        }
        EvaluationMode::Hessian => {
            let (energy, gradient, hessian) = potential.energy_gradient_hessian(coords)?;
            (energy, Some(gradient), Some(hessian))
        }
    })
}

/// Compares analytic gradients with central finite differences of the energy for every
/// frame. Frozen coordinates are ignored.
#[instrument(skip_all, name = "gradient_check_workflow", fields(frames = frames.len()))]
pub fn check_gradients(
    config: &PotentialConfig,
    frames: &[Frame],
    reporter: &ProgressReporter,
) -> Result<Vec<GradientCheck>, WorkflowError> {
    check_frame_dimension(frames, config.ndim())?;
    let mut potential = build_potential(config)?;

    reporter.report(Progress::PhaseStart {
        name: "Gradient check",
    });
    reporter.start_task(frames.len());
    let mut checks = Vec::with_capacity(frames.len());
    for (index, frame) in frames.iter().enumerate() {
        let check = check_frame(&mut potential, config, frame, index)
            .map_err(WorkflowError::at_frame(index))?;
        debug!(
            frame = index,
            deviation = check.max_abs_deviation,
            "Checked gradient."
        );
        reporter.report(Progress::TaskIncrement);
        checks.push(check);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    Ok(checks)
}

fn check_frame(
    potential: &mut DynPotential,
    config: &PotentialConfig,
    frame: &Frame,
    index: usize,
) -> Result<GradientCheck, PotentialError> {
    let (analytic, numeric) = match &config.frozen {
        Some(selection) => {
            let dofs = selection.dofs(config.ndim());
            let mut frozen = FrozenPotential::new(&mut **potential, frame.coords.clone(), dofs)?;
            let reduced = frozen.reduce(&frame.coords)?;
            let (_, analytic) = frozen.energy_gradient(&reduced)?;
            let numeric = frozen.numerical_gradient(&reduced, NUMERICAL_STEP)?;
            (analytic, numeric)
        }
        None => {
            let (_, analytic) = potential.energy_gradient(&frame.coords)?;
            let numeric = potential.numerical_gradient(&frame.coords, NUMERICAL_STEP)?;
            (analytic, numeric)
        }
    };
    let max_abs_deviation = analytic
        .iter()
        .zip(&numeric)
        .map(|(a, n)| (a - n).abs())
        .fold(0.0, f64::max);
    let max_abs_gradient = analytic.iter().map(|g| g.abs()).fold(0.0, f64::max);
    Ok(GradientCheck {
        index,
        max_abs_deviation,
        max_abs_gradient,
    })
}
