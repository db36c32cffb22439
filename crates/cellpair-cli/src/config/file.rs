use crate::error::{CliError, Result};
use cellpair::core::distance::Boundary;
use cellpair::core::interactions::law::LawSpec;
use cellpair::engine::config::{FrozenSelection, PairStrategy};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// On-disk configuration. Every table is optional so that command-line values can fill
/// the gaps.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub interaction: Option<LawSpec>,
    #[serde(rename = "box")]
    pub box_config: Option<FileBoxConfig>,
    pub evaluation: Option<FileEvaluationConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileBoxConfig {
    pub lengths: Option<Vec<f64>>,
    pub boundary: Option<Boundary>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileEvaluationConfig {
    pub strategy: Option<PairStrategy>,
    pub cell_scale: Option<f64>,
    pub particle_count: Option<usize>,
    pub parallel: Option<bool>,
    pub frozen: Option<FrozenSelection>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
