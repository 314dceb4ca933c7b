//! Train command - Train the Q-learning agent against minimax or random play

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    adapters::MsgPackRepository,
    cli::{
        config::CommonArgs,
        output::{format_number, format_percent, print_kv, print_section, print_stats_table},
    },
    config::TwixtConfig,
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, OpponentKind, ProgressObserver,
        SharedObserver, TrainingPipeline, TrainingResult, resume_agent,
    },
    q_learning::QLearningAgent,
    twixt::Player,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    metrics: MetricsSummary,
    config: &'a TwixtConfig,
    q_table_entries: usize,
    checkpoint: &'a Path,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: treat as a directory.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learning agent")]
pub struct TrainArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Opponent to train against (minimax or random)
    #[arg(long, short = 'o')]
    pub opponent: Option<OpponentKind>,

    /// Side the agent plays (x or o)
    #[arg(long)]
    pub agent_player: Option<Player>,

    /// Report, evaluate and checkpoint every this many episodes
    #[arg(long)]
    pub save_interval: Option<usize>,

    /// Games against minimax at each interval (0 disables)
    #[arg(long)]
    pub eval_games: Option<usize>,

    /// Learning rate α
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Initial exploration rate ε
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Floor ε decays towards
    #[arg(long)]
    pub min_epsilon: Option<f64>,

    /// Multiplicative ε decay per episode
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Checkpoint file, resumed from if it exists
    #[arg(long, default_value = "twixt_q_learning.msgpack")]
    pub checkpoint: PathBuf,

    /// Ignore any existing checkpoint and start from an empty table
    #[arg(long, default_value_t = false)]
    pub fresh: bool,

    /// Write interval checkpoints on a background thread
    #[arg(long, default_value_t = false)]
    pub background_saves: bool,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,
}

impl TrainArgs {
    fn resolve_config(&self) -> Result<TwixtConfig> {
        let mut config = self.common.resolve()?;
        let training = &mut config.training;
        if let Some(episodes) = self.episodes {
            training.episodes = episodes;
        }
        if let Some(opponent) = self.opponent {
            training.opponent = opponent;
        }
        if let Some(player) = self.agent_player {
            training.agent_player = player;
        }
        if let Some(interval) = self.save_interval {
            training.save_interval = interval;
        }
        if let Some(games) = self.eval_games {
            training.eval_games = games;
        }

        let q = &mut config.q_learning;
        if let Some(alpha) = self.alpha {
            q.alpha = alpha;
        }
        if let Some(gamma) = self.gamma {
            q.gamma = gamma;
        }
        if let Some(epsilon) = self.epsilon {
            q.epsilon = epsilon;
        }
        if let Some(floor) = self.min_epsilon {
            q.min_epsilon = floor;
        }
        if let Some(decay) = self.epsilon_decay {
            q.decay = decay;
        }

        config.validate().context("invalid training configuration")?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let repository = Arc::new(MsgPackRepository::new());

    let mut agent = if args.fresh {
        QLearningAgent::new(config.q_learning)
    } else {
        resume_agent(&*repository, &args.checkpoint, config.q_learning)
            .with_context(|| format!("resuming from {}", args.checkpoint.display()))?
    };
    let resumed_episodes = agent.training_rewards().len();

    print_section("Training Q-learning agent");
    print_stats_table(&[
        (
            "Board",
            format!(
                "{n}x{n} ({rule})",
                n = config.game.board_size,
                rule = config.game.rule
            ),
        ),
        ("Agent plays", config.training.agent_player.to_string()),
        ("Opponent", config.training.opponent.to_string()),
        ("Minimax depth", config.minimax.depth.to_string()),
        ("Episodes", format_number(config.training.episodes)),
        ("Resumed episodes", format_number(resumed_episodes)),
        ("Starting epsilon", format!("{:.4}", agent.epsilon())),
    ]);

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut pipeline = TrainingPipeline::new(config.clone())
        .with_checkpoints(repository, args.checkpoint.clone())
        .with_background_saves(args.background_saves)
        .with_observer(Box::new(SharedObserver::new(Arc::clone(&metrics))));
    if !args.quiet {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("creating observation log {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut agent)?;
    let metrics = metrics
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .summary();

    print_section("Training Results");
    print_stats_table(&[
        ("Episodes", format_number(result.total_episodes)),
        (
            "Wins",
            format!("{} ({})", result.wins, format_percent(result.win_rate)),
        ),
        (
            "Draws",
            format!("{} ({})", result.draws, format_percent(result.draw_rate)),
        ),
        (
            "Losses",
            format!("{} ({})", result.losses, format_percent(result.loss_rate)),
        ),
        ("Avg game length", format!("{:.1}", metrics.avg_game_length)),
        ("Mean reward", format!("{:.2}", result.mean_reward)),
        ("Final epsilon", format!("{:.4}", result.final_epsilon)),
        ("Q-table entries", format_number(agent.q_table().len())),
    ]);
    if let Some(last) = result.evaluations.last() {
        print_kv("Last vs minimax", &format_percent(*last));
    }
    print_kv("Checkpoint", &args.checkpoint.display().to_string());

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if summary_path != *raw {
            println!("\nNormalizing summary path to {}", summary_path.display());
        }
        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            training: &result,
            metrics,
            config: &config,
            q_table_entries: agent.q_table().len(),
            checkpoint: &args.checkpoint,
        };
        let file = File::create(&summary_path)
            .with_context(|| format!("creating {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.json")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        let dir = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&dir)),
            PathBuf::from("out").join("training_summary.json")
        );
    }

    #[test]
    fn test_flags_override_config() {
        let args = TrainArgs::parse_from([
            "train",
            "--episodes",
            "7",
            "--opponent",
            "random",
            "--agent-player",
            "o",
            "--alpha",
            "0.5",
            "--board-size",
            "4",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.training.episodes, 7);
        assert_eq!(config.training.opponent, OpponentKind::Random);
        assert_eq!(config.training.agent_player, Player::O);
        assert_eq!(config.q_learning.alpha, 0.5);
        assert_eq!(config.game.board_size, 4);
    }

    #[test]
    fn test_all_q_learning_parameters_have_flags() {
        let args = TrainArgs::parse_from([
            "train",
            "--alpha",
            "0.3",
            "--gamma",
            "0.8",
            "--epsilon",
            "0.6",
            "--min-epsilon",
            "0.05",
            "--epsilon-decay",
            "0.99",
        ]);
        let q = args.resolve_config().unwrap().q_learning;
        assert_eq!(q.alpha, 0.3);
        assert_eq!(q.gamma, 0.8);
        assert_eq!(q.epsilon, 0.6);
        assert_eq!(q.min_epsilon, 0.05);
        assert_eq!(q.decay, 0.99);
    }

    #[test]
    fn test_min_epsilon_above_epsilon_is_rejected() {
        let args = TrainArgs::parse_from(["train", "--epsilon", "0.2", "--min-epsilon", "0.5"]);
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn test_invalid_flag_value_is_rejected() {
        let args = TrainArgs::parse_from(["train", "--alpha", "0"]);
        assert!(args.resolve_config().is_err());
    }
}
