use cellpair::engine::accumulator::EvaluationMode;
use cellpair::engine::config::PotentialConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub gradient_output: Option<PathBuf>,
    pub check_gradient: bool,
    pub mode: EvaluationMode,
    pub core_config: PotentialConfig,
}
