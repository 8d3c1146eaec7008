//! Example data configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_SEED: u64 = 2026;
const DEFAULT_COUNT: usize = 25;

/// Configuration values controlling example account seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXAMPLE_DATA")]
pub struct ExampleDataSettings {
    /// Enable example account seeding on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Random seed for the generator.
    pub seed: Option<u64>,
    /// Number of accounts to generate.
    pub count: Option<usize>,
}

impl ExampleDataSettings {
    /// Configured seed, falling back to the default.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Configured account count, falling back to the default.
    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_COUNT)
    }
}
