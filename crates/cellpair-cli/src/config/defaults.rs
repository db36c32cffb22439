use cellpair::core::distance::Boundary;
use cellpair::engine::config::{DEFAULT_CELL_SCALE, PairStrategy};

pub struct DefaultsConfig {
    pub boundary: Boundary,
    pub strategy: PairStrategy,
    pub cell_scale: f64,
    pub parallel: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            boundary: Boundary::Periodic,
            strategy: PairStrategy::Auto,
            cell_scale: DEFAULT_CELL_SCALE,
            parallel: true,
        }
    }
}
