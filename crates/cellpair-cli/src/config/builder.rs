use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::EvalArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use cellpair::engine::accumulator::EvaluationMode;
use cellpair::engine::config::{FrozenSelection, PotentialConfigBuilder};
use tracing::debug;

/// Merges command-line arguments, the configuration file and defaults, in that order of
/// precedence.
pub fn build_config(args: &EvalArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = FileConfig::from_file(&args.config)?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let law = file_config.interaction.take().ok_or_else(|| {
        CliError::Config("An `[interaction]` table is required in the config file.".to_string())
    })?;

    let box_file = file_config.box_config.take().unwrap_or_default();
    let box_lengths = args
        .box_lengths
        .clone()
        .or(box_file.lengths)
        .ok_or_else(|| {
            CliError::Config(
                "Box lengths are required either as `box.lengths` in the config file or via --box."
                    .to_string(),
            )
        })?;
    let boundary = box_file.boundary.unwrap_or(defaults.boundary);

    let eval_file = file_config.evaluation.take().unwrap_or_default();
    let cell_scale = args
        .cell_scale
        .or(eval_file.cell_scale)
        .unwrap_or(defaults.cell_scale);
    let parallel = if args.no_parallel {
        false
    } else {
        eval_file.parallel.unwrap_or(defaults.parallel)
    };

    let mut builder = PotentialConfigBuilder::new()
        .law(law)
        .box_lengths(box_lengths)
        .boundary(boundary)
        .strategy(eval_file.strategy.unwrap_or(defaults.strategy))
        .cell_scale(cell_scale)
        .parallel(parallel);
    if let Some(count) = eval_file.particle_count {
        builder = builder.particle_count(count);
    }
    if let Some(selection) = eval_file.frozen {
        builder = builder.frozen(selection);
    }
    let core_config = builder.build()?;
    debug!("Merged potential configuration: {:?}", core_config);

    let mode = if args.hessian {
        EvaluationMode::Hessian
    } else if args.gradient_output.is_some() {
        EvaluationMode::Gradient
    } else {
        EvaluationMode::Energy
    };

    Ok(AppConfig {
        input_path: args.input.clone(),
        gradient_output: args.gradient_output.clone(),
        check_gradient: args.check_gradient,
        mode,
        core_config,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Argument(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let invalid = |e: parser::ParseError| CliError::Argument(format!("{}: {}", key, e));

        match key {
            "box.lengths" => {
                config.box_config.get_or_insert_with(Default::default).lengths =
                    Some(parser::parse_float_list(value_str).map_err(invalid)?);
            }
            "box.boundary" => {
                config.box_config.get_or_insert_with(Default::default).boundary =
                    Some(parser::parse_boundary(value_str).map_err(invalid)?);
            }
            "evaluation.strategy" => {
                config.evaluation.get_or_insert_with(Default::default).strategy =
                    Some(parser::parse_strategy(value_str).map_err(invalid)?);
            }
            "evaluation.cell-scale" => {
                config.evaluation.get_or_insert_with(Default::default).cell_scale =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Argument(format!("Invalid float value for {}: {}", key, value_str))
                    })?);
            }
            "evaluation.particle-count" => {
                config
                    .evaluation
                    .get_or_insert_with(Default::default)
                    .particle_count = Some(value_str.parse().map_err(|_| {
                    CliError::Argument(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            "evaluation.parallel" => {
                config.evaluation.get_or_insert_with(Default::default).parallel =
                    Some(value_str.parse().map_err(|_| {
                        CliError::Argument(format!("Invalid boolean value for {}: {}", key, value_str))
                    })?);
            }
            "evaluation.frozen-particles" => {
                config.evaluation.get_or_insert_with(Default::default).frozen = Some(
                    FrozenSelection::Particles(parser::parse_index_list(value_str).map_err(invalid)?),
                );
            }
            "evaluation.frozen-dofs" => {
                config.evaluation.get_or_insert_with(Default::default).frozen = Some(
                    FrozenSelection::Dofs(parser::parse_index_list(value_str).map_err(invalid)?),
                );
            }
            _ => {
                return Err(CliError::Argument(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use cellpair::core::distance::Boundary;
    use cellpair::engine::config::PairStrategy;
    use cellpair::engine::error::ConfigError;
    use clap::Parser;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const LJ_CONFIG: &str = r#"
        [interaction]
        kind = "lennard-jones"
        epsilon = 1.0
        sigma = 1.0
        cutoff = 2.5

        [box]
        lengths = [10.0, 10.0, 10.0]

        [evaluation]
        strategy = "cell-list"
        parallel = true
    "#;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn eval_args(config: &Path, extra: &[&str]) -> EvalArgs {
        let mut argv = vec![
            "cellpair",
            "eval",
            "-c",
            config.to_str().unwrap(),
            "-i",
            "frames.xyz",
        ];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Eval(args) => args,
            _ => panic!("Expected 'eval' subcommand"),
        }
    }

    #[test]
    fn file_values_fill_in_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, LJ_CONFIG);
        let app = build_config(&eval_args(&path, &[])).unwrap();

        let config = &app.core_config;
        assert_eq!(config.geometry.box_lengths, vec![10.0; 3]);
        assert_eq!(config.geometry.boundary, Boundary::Periodic);
        assert_eq!(config.strategy, PairStrategy::CellList);
        assert_eq!(config.cell_scale, 1.0);
        assert!(config.parallel);
        assert!(config.frozen.is_none());
        assert_eq!(app.mode, EvaluationMode::Energy);
    }

    #[test]
    fn cli_arguments_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, LJ_CONFIG);
        let args = eval_args(
            &path,
            &[
                "--box",
                "12,12",
                "--cell-scale",
                "2",
                "--no-parallel",
                "--gradient-output",
                "g.xyz",
            ],
        );
        let app = build_config(&args).unwrap();

        assert_eq!(app.core_config.geometry.box_lengths, vec![12.0, 12.0]);
        assert_eq!(app.core_config.cell_scale, 2.0);
        assert!(!app.core_config.parallel);
        assert_eq!(app.mode, EvaluationMode::Gradient);
    }

    #[test]
    fn set_values_override_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, LJ_CONFIG);
        let args = eval_args(
            &path,
            &[
                "--hessian",
                "-S",
                "evaluation.strategy=all-pairs",
                "-S",
                "box.boundary=open",
                "-S",
                "evaluation.frozen-particles=0,2",
                "-S",
                "evaluation.particle-count=3",
            ],
        );
        let app = build_config(&args).unwrap();

        assert_eq!(app.core_config.strategy, PairStrategy::AllPairs);
        assert_eq!(app.core_config.geometry.boundary, Boundary::Open);
        assert_eq!(
            app.core_config.frozen,
            Some(FrozenSelection::Particles(vec![0, 2]))
        );
        assert_eq!(app.core_config.particle_count, Some(3));
        assert_eq!(app.mode, EvaluationMode::Hessian);
    }

    #[test]
    fn unsupported_or_malformed_set_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, LJ_CONFIG);

        let unknown = build_config(&eval_args(&path, &["-S", "interaction.sigma=2"]));
        assert!(matches!(unknown, Err(CliError::Argument(msg)) if msg.contains("Unsupported")));

        let malformed = build_config(&eval_args(&path, &["-S", "evaluation.parallel"]));
        assert!(matches!(malformed, Err(CliError::Argument(msg)) if msg.contains("KEY=VALUE")));

        let bad_value = build_config(&eval_args(&path, &["-S", "box.lengths=1,a"]));
        assert!(matches!(bad_value, Err(CliError::Argument(msg)) if msg.contains("box.lengths")));
    }

    #[test]
    fn missing_interaction_or_box_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[box]\nlengths = [5.0, 5.0]\n");
        let result = build_config(&eval_args(&path, &[]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("interaction")));

        let path = write_config(
            &dir,
            "[interaction]\nkind = \"wca\"\nepsilon = 1.0\nsigma = 1.0\n",
        );
        let result = build_config(&eval_args(&path, &[]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("--box")));
    }

    #[test]
    fn invalid_geometry_surfaces_core_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, LJ_CONFIG);
        let result = build_config(&eval_args(&path, &["--box", "10,-1,10"]));
        assert!(matches!(
            result,
            Err(CliError::Potential(ConfigError::NonPositiveBoxLength { dim: 1, .. }))
        ));
    }
}
