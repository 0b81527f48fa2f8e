use crate::buffer_diff::ROW_BYTES;
use crate::comparison::DiffSettings;
use crate::float::Float;
use crate::random::TestRng;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct RandomSettings {
    /// Seed for every generator built from this configuration. When absent,
    /// the wall clock is used and the chosen seed is logged.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct FloatSettings {
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

pub fn default_epsilon() -> f64 {
    <f64 as Float>::DEFAULT_EPSILON
}

impl Default for FloatSettings {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ProbityConfig {
    #[serde(default)]
    pub random: RandomSettings,
    #[serde(default)]
    pub diff: DiffSettings,
    #[serde(default)]
    pub float: FloatSettings,
}

impl ProbityConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file at {:?}: {}", path, e))?;

        Self::from_toml_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from config file {:?}: {}", path, e)
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, anyhow::Error> {
        let config: ProbityConfig = toml::from_str(content)?;
        if config.float.epsilon.is_nan() || config.float.epsilon < 0.0 {
            anyhow::bail!(
                "float.epsilon must be a non-negative number, got {}",
                config.float.epsilon
            );
        }
        let diff = &config.diff;
        if diff.window_bytes < diff.context_bytes.saturating_add(ROW_BYTES) {
            anyhow::bail!(
                "diff.window-bytes ({}) must cover diff.context-bytes ({}) plus one {}-byte row",
                diff.window_bytes,
                diff.context_bytes,
                ROW_BYTES
            );
        }
        Ok(config)
    }

    /// Builds a generator from the configured seed, or from the wall clock
    /// when none is set.
    pub fn make_rng(&self) -> TestRng {
        match self.random.seed {
            Some(seed) => TestRng::from_seed(seed),
            None => TestRng::from_time(),
        }
    }

    pub fn diff_settings(&self) -> DiffSettings {
        self.diff
    }
}
