//! YAML configuration for fixture runs.
//!
//! Every field is optional. Resolution order is: command-line flags, then the
//! config file, then the scale preset.

use anyhow::Context;
use fixture_gen::{FixturePlan, Scale, DEFAULT_BATCH_SIZE, DEFAULT_SEED};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "fixtures";
pub const DEFAULT_SCALE: Scale = Scale::Full;

/// Per-kind row count overrides applied on top of the preset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CountOverrides {
    pub members: Option<u64>,
    pub root_categories: Option<u64>,
    pub child_categories: Option<u64>,
    pub boards: Option<u64>,
    pub reviews: Option<u64>,
    pub root_replies: Option<u64>,
    pub depth1_replies: Option<u64>,
    pub depth2_replies: Option<u64>,
    pub likes: Option<u64>,
    pub hot_boards: Option<u64>,
    pub hot_reviews: Option<u64>,
}

/// Like candidate pool cap overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LikePoolOverrides {
    pub boards: Option<u64>,
    pub reviews: Option<u64>,
    pub replies: Option<u64>,
}

/// Complete YAML configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureConfig {
    /// Preset the overrides apply on top of
    pub scale: Option<String>,
    pub seed: Option<u64>,
    pub batch_size: Option<usize>,
    pub output: Option<PathBuf>,
    pub counts: CountOverrides,
    pub like_pool: LikePoolOverrides,
}

impl FixtureConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    fn apply(&self, plan: &mut FixturePlan) {
        let c = &self.counts;
        let fields = [
            (&mut plan.members, c.members),
            (&mut plan.root_categories, c.root_categories),
            (&mut plan.child_categories, c.child_categories),
            (&mut plan.boards, c.boards),
            (&mut plan.reviews, c.reviews),
            (&mut plan.root_replies, c.root_replies),
            (&mut plan.depth1_replies, c.depth1_replies),
            (&mut plan.depth2_replies, c.depth2_replies),
            (&mut plan.likes, c.likes),
            (&mut plan.hot_boards, c.hot_boards),
            (&mut plan.hot_reviews, c.hot_reviews),
            (&mut plan.like_pool.boards, self.like_pool.boards),
            (&mut plan.like_pool.reviews, self.like_pool.reviews),
            (&mut plan.like_pool.replies, self.like_pool.replies),
        ];
        for (field, value) in fields {
            if let Some(v) = value {
                *field = v;
            }
        }
    }
}

/// Settings given on the command line; `None` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub scale: Option<Scale>,
    pub seed: Option<u64>,
    pub batch_size: Option<usize>,
    pub output: Option<PathBuf>,
}

/// Fully resolved run settings
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub scale: Scale,
    pub seed: u64,
    pub batch_size: usize,
    pub output: PathBuf,
    pub plan: FixturePlan,
}

impl RunSettings {
    pub fn resolve(config: Option<&FixtureConfig>, cli: &CliOverrides) -> anyhow::Result<Self> {
        let file = config.cloned().unwrap_or_default();

        let scale = match (cli.scale, file.scale.as_deref()) {
            (Some(scale), _) => scale,
            (None, Some(name)) => name
                .parse::<Scale>()
                .map_err(|e| anyhow::anyhow!("{}", e))?,
            (None, None) => DEFAULT_SCALE,
        };

        let batch_size = cli
            .batch_size
            .or(file.batch_size)
            .unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            anyhow::bail!("batch size must be greater than 0");
        }

        let mut plan = scale.plan();
        file.apply(&mut plan);

        Ok(Self {
            scale,
            seed: cli.seed.or(file.seed).unwrap_or(DEFAULT_SEED),
            batch_size,
            output: cli
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            plan,
        })
    }

    /// Load the optional config file and resolve against CLI flags
    pub fn load(config: Option<&Path>, cli: &CliOverrides) -> anyhow::Result<Self> {
        let file = config.map(FixtureConfig::load).transpose()?;
        Self::resolve(file.as_ref(), cli)
    }
}
