//! Shared configuration flags for CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{config::TwixtConfig, twixt::ConnectionRule};

/// Config file plus the flags every command can override it with
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Board side length
    #[arg(long)]
    pub board_size: Option<usize>,

    /// Connection rule (adjacency or bridge)
    #[arg(long)]
    pub rule: Option<ConnectionRule>,

    /// Minimax search depth
    #[arg(long)]
    pub depth: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl CommonArgs {
    /// Load the config file, if any, then apply flag overrides and validate.
    pub fn resolve(&self) -> Result<TwixtConfig> {
        let mut config = match &self.config {
            Some(path) => TwixtConfig::load_or_default(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => TwixtConfig::default(),
        };

        if let Some(size) = self.board_size {
            config.game.board_size = size;
        }
        if let Some(rule) = self.rule {
            config.game.rule = rule;
        }
        if let Some(depth) = self.depth {
            config.minimax.depth = depth;
        }
        if self.seed.is_some() {
            config.training.seed = self.seed;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}
