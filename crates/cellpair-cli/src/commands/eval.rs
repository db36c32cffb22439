use crate::cli::EvalArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use cellpair::core::io::frame::Frame;
use cellpair::core::io::traits::CoordinateFile;
use cellpair::core::io::xyz::XyzFile;
use cellpair::engine::progress::ProgressReporter;
use cellpair::workflows::{self, WorkflowError, evaluate};
use std::io::Write;
use tracing::{info, warn};

/// Relative gradient deviation above which the check is flagged.
const GRADIENT_TOLERANCE: f64 = 1e-4;

pub fn run(args: EvalArgs, progress: &CliProgressHandler) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;

    let frames = workflows::load_frames(&app.input_path, app.core_config.ndim())?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());

    let results = evaluate::run(&app.core_config, &frames, app.mode, &reporter)?;
    print_results(&results, &mut std::io::stdout().lock())?;

    if app.check_gradient {
        let checks = evaluate::check_gradients(&app.core_config, &frames, &reporter)?;
        report_checks(&checks, &mut std::io::stdout().lock())?;
    }

    if let Some(path) = &app.gradient_output {
        write_gradients(&frames, &results, path)?;
        println!("✓ Gradients written to: {}", path.display());
    }

    Ok(())
}

fn print_results(results: &[evaluate::FrameResult], out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{:>6}  {:>22}  {:>16}", "frame", "energy", "min eigenvalue")?;
    for result in results {
        let lowest = result
            .hessian
            .as_ref()
            .map(|h| h.symmetric_eigenvalues().min());
        match lowest {
            Some(value) => writeln!(
                out,
                "{:>6}  {:>22.12}  {:>16.6e}",
                result.index, result.energy, value
            )?,
            None => writeln!(out, "{:>6}  {:>22.12}  {:>16}", result.index, result.energy, "-")?,
        }
    }
    Ok(())
}

fn report_checks(checks: &[evaluate::GradientCheck], out: &mut impl Write) -> std::io::Result<()> {
    for check in checks {
        let relative = check.relative_deviation();
        let flag = if relative <= GRADIENT_TOLERANCE {
            "ok"
        } else {
            warn!(
                frame = check.index,
                relative, "Analytic gradient disagrees with finite differences."
            );
            "MISMATCH"
        };
        writeln!(
            out,
            "gradient check frame {:>4}: max |dg| = {:.3e} (relative {:.3e}) {}",
            check.index, check.max_abs_deviation, relative, flag
        )?;
    }
    Ok(())
}

fn write_gradients(
    frames: &[Frame],
    results: &[evaluate::FrameResult],
    path: &std::path::Path,
) -> Result<()> {
    let gradient_frames: Vec<Frame> = results
        .iter()
        .filter_map(|result| {
            let gradient = result.gradient.clone()?;
            let frame = frames.get(result.index)?;
            Some(frame.with_values(
                format!("gradient frame={} energy={:.12}", result.index, result.energy),
                gradient,
            ))
        })
        .collect();
    if gradient_frames.len() != results.len() {
        warn!("Some frames produced no gradient; writing the remainder.");
    }
    XyzFile::write_to_path(&gradient_frames, path).map_err(WorkflowError::from)?;
    Ok(())
}
