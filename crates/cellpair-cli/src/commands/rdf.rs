use crate::cli::RdfArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use cellpair::engine::progress::ProgressReporter;
use cellpair::workflows::{self, pair_distribution};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::info;

pub fn run(args: RdfArgs, progress: &CliProgressHandler) -> Result<()> {
    let frames = workflows::load_frames(&args.input, args.box_lengths.len())?;

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let distribution = pair_distribution::run(&args.box_lengths, args.bins, &frames, &reporter)?;

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_table(&distribution, &mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), "Wrote pair distribution.");
            println!(
                "✓ g(r) over {} configuration(s) written to: {}",
                distribution.configurations,
                path.display()
            );
        }
        None => write_table(&distribution, &mut io::stdout().lock())?,
    }
    Ok(())
}

fn write_table(
    distribution: &pair_distribution::PairDistribution,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "r,g")?;
    for (r, g) in distribution.radii.iter().zip(&distribution.g) {
        writeln!(out, "{},{}", r, g)?;
    }
    Ok(())
}
