//! Play command - Interactive game against a human, minimax or a trained agent

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};

use crate::{
    adapters::MsgPackRepository,
    cli::{
        config::CommonArgs,
        render::{render_board, render_status},
    },
    config::TwixtConfig,
    pipeline::{Learner, MinimaxLearner, resume_agent},
    twixt::{GameOutcome, GameState, Move, Player},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayOpponent {
    /// Two people sharing the terminal
    Human,
    /// Alpha-beta search
    Minimax,
    /// A trained Q-learning checkpoint
    QLearning,
}

#[derive(Parser, Debug)]
#[command(about = "Play an interactive game")]
pub struct PlayArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Who plays against you
    #[arg(long, short = 'o', value_enum, default_value_t = PlayOpponent::Minimax)]
    pub opponent: PlayOpponent,

    /// Your side (x moves first and connects top to bottom)
    #[arg(long, default_value = "x")]
    pub human: Player,

    /// Checkpoint for the Q-learning opponent
    #[arg(long, default_value = "twixt_q_learning.msgpack")]
    pub agent: PathBuf,
}

/// Parse `row col`, `row,col` or `(row, col)` into an on-board coordinate.
pub fn parse_coordinates(input: &str, size: usize) -> Result<Move> {
    let cleaned: String = input
        .chars()
        .map(|c| if matches!(c, '(' | ')' | ',') { ' ' } else { c })
        .collect();
    let parts: Vec<&str> = cleaned.split_whitespace().collect();
    let [row, col] = parts.as_slice() else {
        return Err(anyhow!("expected two numbers, e.g. `2 3`"));
    };

    let row: usize = row
        .parse()
        .map_err(|_| anyhow!("invalid row '{row}'"))?;
    let col: usize = col
        .parse()
        .map_err(|_| anyhow!("invalid column '{col}'"))?;
    if row >= size || col >= size {
        return Err(anyhow!(
            "({row}, {col}) is off the board (0..{size} in each direction)"
        ));
    }
    Ok(Move::new(row, col))
}

/// Prompt until the human enters a legal move; `None` on `quit` or end of input.
pub fn read_move<R: BufRead, W: Write>(
    state: &GameState,
    input: &mut R,
    output: &mut W,
) -> Result<Option<Move>> {
    loop {
        write!(output, "{} (row col, or quit): ", state.to_move())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("reading move")? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if matches!(line, "q" | "quit" | "exit") {
            return Ok(None);
        }

        match parse_coordinates(line, state.size()) {
            Ok(mv) if state.is_valid_move(mv) => return Ok(Some(mv)),
            Ok(mv) => writeln!(output, "Cell {mv} is already taken, try again.")?,
            Err(err) => writeln!(output, "{err}, try again.")?,
        }
    }
}

/// Play one game; `opponent` moves for the side not in `humans`.
///
/// Returns `None` if a human quit before the game ended.
pub fn run_game<R: BufRead, W: Write>(
    mut state: GameState,
    humans: &[Player],
    mut opponent: Option<&mut dyn Learner>,
    input: &mut R,
    output: &mut W,
) -> Result<Option<GameOutcome>> {
    while !state.is_terminal() {
        writeln!(output, "\n{}", render_board(&state))?;
        writeln!(output, "{}", render_status(&state))?;

        let mover = state.to_move();
        let mv = if humans.contains(&mover) {
            match read_move(&state, input, output)? {
                Some(mv) => mv,
                None => return Ok(None),
            }
        } else {
            let learner = opponent
                .as_deref_mut()
                .ok_or_else(|| anyhow!("no player for {mover}"))?;
            let mv = learner.select_move(&state)?;
            writeln!(output, "{} plays {mv}", learner.name())?;
            mv
        };
        state.apply_move(mv)?;
    }

    writeln!(output, "\n{}", render_board(&state))?;
    writeln!(output, "{}", render_status(&state))?;
    Ok(state.outcome())
}

fn build_opponent(args: &PlayArgs, config: &TwixtConfig) -> Result<Option<Box<dyn Learner>>> {
    let opponent: Box<dyn Learner> = match args.opponent {
        PlayOpponent::Human => return Ok(None),
        PlayOpponent::Minimax => Box::new(MinimaxLearner::new(
            config.minimax.depth,
            config.evaluator(),
        )),
        PlayOpponent::QLearning => {
            let agent = resume_agent(&MsgPackRepository::new(), &args.agent, config.q_learning)
                .with_context(|| format!("loading agent from {}", args.agent.display()))?;
            Box::new(agent)
        }
    };
    Ok(Some(opponent))
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let config = args.common.resolve()?;
    let mut opponent = build_opponent(&args, &config)?;
    let humans: Vec<Player> = match opponent {
        None => vec![Player::X, Player::O],
        Some(_) => vec![args.human],
    };

    println!(
        "Twixt {n}x{n}, {rule} rule. X connects top to bottom, O left to right.",
        n = config.game.board_size,
        rule = config.game.rule
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let outcome = run_game(
        config.game.initial_state()?,
        &humans,
        opponent.as_mut().map(|o| o.as_mut() as &mut dyn Learner),
        &mut input,
        &mut output,
    )?;

    if outcome.is_none() {
        println!("Game abandoned.");
    }
    Ok(())
}
