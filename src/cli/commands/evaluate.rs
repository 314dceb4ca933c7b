//! Evaluate command - Measure a trained agent against random play and minimax

use std::{
    fmt::{self, Write as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::{
    adapters::MsgPackRepository,
    cli::{
        config::CommonArgs,
        output::{format_number, format_percent, print_section, print_stats_table},
    },
    pipeline::{ComparisonReport, EvaluationReport, compare_vs_minimax, evaluate_agent, resume_agent},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
    Both,
}

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained agent")]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Checkpoint to evaluate
    #[arg(long, default_value = "twixt_q_learning.msgpack")]
    pub agent: PathBuf,

    /// Games against the random baseline
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Games per seat against minimax (0 skips the comparison)
    #[arg(long, default_value_t = 10)]
    pub minimax_games: usize,

    /// Write the final metrics to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Everything the evaluate command measures
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummary {
    pub agent: PathBuf,
    pub episodes_trained: usize,
    pub q_table_entries: usize,
    pub epsilon: f64,
    pub random: EvaluationReport,
    pub minimax_depth: usize,
    pub minimax: Option<ComparisonReport>,
}

pub fn render_text_report(summary: &EvaluationSummary) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    write_text_report(&mut out, summary).map(|()| out).unwrap_or_default()
}

fn write_text_report(out: &mut String, summary: &EvaluationSummary) -> fmt::Result {
    writeln!(out, "Twixt Q-learning evaluation")?;
    writeln!(out, "agent: {}", summary.agent.display())?;
    writeln!(out, "episodes trained: {}", summary.episodes_trained)?;
    writeln!(out, "q-table entries: {}", summary.q_table_entries)?;
    writeln!(out, "epsilon: {:.4}", summary.epsilon)?;
    writeln!(out)?;
    writeln!(out, "vs random ({} games)", summary.random.games)?;
    writeln!(out, "  win rate: {:.3}", summary.random.win_rate)?;
    writeln!(out, "  avg score: {:.3}", summary.random.avg_score)?;
    writeln!(out, "  avg moves: {:.2}", summary.random.avg_moves)?;
    if let Some(cmp) = &summary.minimax {
        writeln!(out)?;
        writeln!(
            out,
            "vs minimax depth {} ({} games per seat)",
            summary.minimax_depth, cmp.games_per_seat
        )?;
        writeln!(out, "  q-learning win rate: {:.3}", cmp.q_win_rate)?;
        writeln!(out, "  minimax win rate: {:.3}", cmp.minimax_win_rate)?;
        writeln!(out, "  draw rate: {:.3}", cmp.draw_rate)?;
    }
    Ok(())
}

/// Write the report in the requested format(s), returning the files written.
///
/// With [`ReportFormat::Both`] the extension of `path` is replaced by `txt`
/// and `json`.
pub fn write_report(
    summary: &EvaluationSummary,
    path: &Path,
    format: ReportFormat,
) -> Result<Vec<PathBuf>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let targets = match format {
        ReportFormat::Text => vec![(path.to_path_buf(), ReportFormat::Text)],
        ReportFormat::Json => vec![(path.to_path_buf(), ReportFormat::Json)],
        ReportFormat::Both => vec![
            (path.with_extension("txt"), ReportFormat::Text),
            (path.with_extension("json"), ReportFormat::Json),
        ],
    };

    let mut written = Vec::with_capacity(targets.len());
    for (target, kind) in targets {
        let content = match kind {
            ReportFormat::Json => serde_json::to_string_pretty(summary)?,
            _ => render_text_report(summary),
        };
        std::fs::write(&target, content)
            .with_context(|| format!("writing report {}", target.display()))?;
        written.push(target);
    }
    Ok(written)
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let config = args.common.resolve()?;
    let evaluator = config.evaluator();

    println!("Loading trained agent from: {}", args.agent.display());
    let mut agent = resume_agent(&MsgPackRepository::new(), &args.agent, config.q_learning)
        .with_context(|| format!("loading agent from {}", args.agent.display()))?;
    if let Some(seed) = config.training.seed {
        agent = agent.with_seed(seed);
    }

    let random = evaluate_agent(
        &mut agent,
        args.games,
        &config.game,
        &evaluator,
        config.training.seed,
    )?;
    let minimax = if args.minimax_games > 0 {
        Some(compare_vs_minimax(
            &mut agent,
            config.minimax.depth,
            args.minimax_games,
            &config.game,
            &evaluator,
        )?)
    } else {
        None
    };

    let summary = EvaluationSummary {
        agent: args.agent.clone(),
        episodes_trained: agent.training_rewards().len(),
        q_table_entries: agent.q_table().len(),
        epsilon: agent.epsilon(),
        random,
        minimax_depth: config.minimax.depth,
        minimax,
    };

    print_section("Agent");
    print_stats_table(&[
        ("Episodes trained", format_number(summary.episodes_trained)),
        ("Q-table entries", format_number(summary.q_table_entries)),
        ("Epsilon", format!("{:.4}", summary.epsilon)),
    ]);

    print_section(&format!("vs Random ({} games)", summary.random.games));
    print_stats_table(&[
        ("Win rate", format_percent(summary.random.win_rate)),
        ("Avg score", format!("{:.3}", summary.random.avg_score)),
        ("Avg moves", format!("{:.2}", summary.random.avg_moves)),
    ]);

    if let Some(cmp) = &summary.minimax {
        print_section(&format!(
            "vs Minimax depth {} ({} games per seat)",
            summary.minimax_depth, cmp.games_per_seat
        ));
        print_stats_table(&[
            ("Q-learning wins", format_percent(cmp.q_win_rate)),
            ("Minimax wins", format_percent(cmp.minimax_win_rate)),
            ("Draws", format_percent(cmp.draw_rate)),
        ]);
    }

    if let Some(path) = &args.report {
        for written in write_report(&summary, path, args.format)? {
            println!("\nReport written to {}", written.display());
        }
    }

    Ok(())
}
