//! Play command - a human (Red) against the machine (Blue) over stdin

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use pasture_core::{Adjust, AlphaBetaAI, Match, MatchConfig, SelectOutcome, Side};

use crate::render::{render_board, render_status};
use crate::simulate::{load_config, machine_move};

const HELP: &str = "\
Commands:
  s COL ROW   select a cell (place, choose a herd, or pick a target)
  +           move one more sheep to the target
  -           move one fewer sheep to the target
  c           confirm the staged move
  x           clear the selection
  h           show this help
  q           quit";

#[derive(Args, Debug, Default)]
pub struct PlayArgs {
    /// Match configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Board width in cells
    #[arg(long)]
    pub width: Option<u16>,

    /// Board height in cells
    #[arg(long)]
    pub height: Option<u16>,

    /// Search depth of the machine
    #[arg(long)]
    pub depth: Option<u32>,

    /// Minimum wall-clock time per machine move, in milliseconds
    #[arg(long, default_value = "1000")]
    pub min_move_ms: u64,
}

/// One line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Select { col: i16, row: i16 },
    Adjust(Adjust),
    Confirm,
    Clear,
    Help,
    Quit,
}

pub fn run(args: PlayArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(depth) = args.depth {
        config.blue.depth = depth;
    }
    config.validate().context("Invalid match configuration")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    play(&config, args.min_move_ms, stdin.lock(), stdout.lock())
}

/// Drive a match from `input` until it ends, the player quits or input runs out
fn play<R: BufRead, W: Write>(
    config: &MatchConfig,
    min_move_ms: u64,
    mut input: R,
    mut out: W,
) -> Result<()> {
    let mut game = config.new_match().context("Failed to set up the board")?;
    let mut machine = AlphaBetaAI::from_config(&config.blue);
    let min_move = Duration::from_millis(min_move_ms);

    writeln!(out, "{}\n", HELP)?;
    show(&mut out, &game)?;

    let mut line = String::new();
    while !game.is_over() {
        if game.side_to_move() == Side::Blue {
            if let Some(action) = machine_move(&mut game, &mut machine, min_move)? {
                writeln!(out, "Blue plays {:?}", action)?;
            }
            show(&mut out, &game)?;
            continue;
        }

        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        match parse_command(&line) {
            Ok(Command::Quit) => return Ok(()),
            Ok(Command::Help) => writeln!(out, "{}", HELP)?,
            Ok(command) => {
                let message = execute(&mut game, command);
                writeln!(out, "{}", message)?;
                show(&mut out, &game)?;
            }
            Err(message) => writeln!(out, "{}", message)?,
        }
    }

    Ok(())
}

/// Apply a board command, returning what happened in words
fn execute(game: &mut Match, command: Command) -> String {
    match command {
        Command::Select { col, row } => {
            let cell = game.grid().cell_at_offset(col, row);
            match game.select(cell) {
                SelectOutcome::Placed(_) => "Herd placed".to_string(),
                SelectOutcome::Chosen(_) => "Herd chosen, pick a target".to_string(),
                SelectOutcome::Targeted(_) => "Target set, adjust with +/- then confirm".to_string(),
                SelectOutcome::Cleared => "Selection cleared".to_string(),
                SelectOutcome::Ignored => format!("Cell {} {} cannot be selected now", col, row),
            }
        }
        Command::Adjust(adjust) => {
            if game.adjust(adjust) {
                "Adjusted".to_string()
            } else {
                "Nothing to adjust".to_string()
            }
        }
        Command::Confirm => match game.confirm() {
            Some(action) => format!("Red plays {:?}", action),
            None => "No move staged".to_string(),
        },
        Command::Clear => {
            game.clear_selection();
            "Selection cleared".to_string()
        }
        Command::Help | Command::Quit => String::new(),
    }
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let command = match words.next() {
        Some("s") => {
            let mut coord = |name: &str| -> Result<i16, String> {
                words
                    .next()
                    .ok_or_else(|| format!("Missing {}", name))?
                    .parse()
                    .map_err(|_| format!("Bad {}", name))
            };
            let col = coord("column")?;
            let row = coord("row")?;
            Command::Select { col, row }
        }
        Some("+") => Command::Adjust(Adjust::More),
        Some("-") => Command::Adjust(Adjust::Less),
        Some("c") => Command::Confirm,
        Some("x") => Command::Clear,
        Some("h") | Some("?") => Command::Help,
        Some("q") => Command::Quit,
        Some(other) => return Err(format!("Unknown command '{}', try h", other)),
        None => return Err("Empty command, try h".to_string()),
    };

    if words.next().is_some() {
        return Err("Too many arguments".to_string());
    }
    Ok(command)
}

fn show<W: Write>(out: &mut W, game: &Match) -> io::Result<()> {
    writeln!(out, "{}", render_status(game))?;
    writeln!(out, "{}", render_board(game))
}
