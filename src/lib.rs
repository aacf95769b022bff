pub mod card;
pub mod pile;
pub mod stock;
pub mod rules;
pub mod descriptor;
pub mod board;
pub mod shuffle;
pub mod pysol;
pub mod display;
pub mod config;

use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use log::{info, warn};

pub use crate::board::{Board, DrawOutcome, Layout, MoveError, MoveResult, MoveSummary, PileId};
pub use crate::card::{Card, Colour, Rank, Suit};
pub use crate::config::{Config, ConfigError, DealSource};
pub use crate::descriptor::{InvalidMove, MoveRequest};
pub use crate::pile::{Pile, PileRole};
pub use crate::rules::IllegalMove;
pub use crate::shuffle::{FixedDeck, SeededShuffler, Shuffler};
pub use crate::pysol::PysolDeal;

use crate::display::{ANSI_CLEAR, Style, render_board};

const HELP: &str = "\
Commands:
  draw (or d)      turn the next stock card onto the waste
  quit (or q)      leave the game
  help (or h)      show this text
Moves are two tokens, source then destination:
  C4 A   column C from its 4th card down onto column A
  *2 A   top of foundation 2 onto column A
  W A    waste onto column A
  W *    waste onto its foundation
  C *    top of column C onto its foundation
";

/// How an interactive session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Won,
    Quit,
    /// Input closed before the game was won.
    EndOfInput,
}

/// Drive one game from line-based input.
///
/// Each line is a command (`draw`, `quit`, `help`) or a move. The board is
/// re-rendered after every line; with colour on, the screen is cleared
/// first.
pub fn play<R: BufRead, W: Write>(
    board: &mut Board,
    input: R,
    out: &mut W,
    style: Style,
) -> io::Result<SessionEnd> {
    show(board, out, style, None)?;

    for line in input.lines() {
        let line = line?;
        let command = line.trim();

        let message = match command.to_ascii_lowercase().as_str() {
            "" => None,
            "q" | "quit" => {
                info!("player quit");
                return Ok(SessionEnd::Quit);
            }
            "h" | "help" => Some(HELP.to_string()),
            "d" | "draw" => match board.draw() {
                Ok(DrawOutcome::Drawn(_)) => None,
                Ok(DrawOutcome::RecycledAndDrawn(_)) => Some("Waste turned over.".to_string()),
                Ok(DrawOutcome::Exhausted) => Some("No cards left to draw.".to_string()),
                Err(e) => {
                    warn!("draw failed: {e}");
                    Some(format!("Could not draw: {e}"))
                }
            },
            _ => match board.move_line(command) {
                MoveResult::Applied => None,
                MoveResult::Illegal => Some(format!("'{command}' is not allowed here.")),
                MoveResult::Invalid => Some(format!("Could not understand '{command}'; type 'help'.")),
            },
        };

        show(board, out, style, message.as_deref())?;
        if board.is_won() {
            info!("game won");
            writeln!(out, "You won!")?;
            return Ok(SessionEnd::Won);
        }
    }

    Ok(SessionEnd::EndOfInput)
}

fn show<W: Write>(board: &Board, out: &mut W, style: Style, message: Option<&str>) -> io::Result<()> {
    if style.colour {
        write!(out, "{ANSI_CLEAR}")?;
    }
    write!(out, "{}", render_board(board, style))?;
    if let Some(message) = message {
        writeln!(out, "{message}")?;
    }
    write!(out, "> ")?;
    out.flush()
}

/// Entry point for the `klondike` binary.
///
/// Parses `--seed=<u64>`, `--deal=<game>`, `--deck=[...]` and
/// `--no-colour`, deals a board and plays it on stdin/stdout.
///
/// Example:
///   cargo run -- --deal=ms12345 --no-colour
pub fn run() -> ExitCode {
    let config = match Config::from_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("klondike: {e}");
            return ExitCode::from(2);
        }
    };

    info!("starting klondike ({})", config.deal.describe());
    let mut board = match Board::dealt(config.deal.shuffler().as_mut()) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("klondike: could not deal: {e}");
            return ExitCode::FAILURE;
        }
    };
    let style = Style {
        colour: config.colour,
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match play(&mut board, stdin.lock(), &mut stdout, style) {
        Ok(end) => {
            info!("session ended: {end:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            warn!("terminal I/O failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    fn session(board: &mut Board, script: &str) -> (SessionEnd, String) {
        let mut out = Vec::new();
        let end = play(board, script.as_bytes(), &mut out, Style::PLAIN).unwrap();
        (end, String::from_utf8(out).unwrap())
    }

    #[test]
    fn quit_ends_the_session() {
        let mut board = Board::dealt(&mut SeededShuffler::new(3)).unwrap();
        let (end, out) = session(&mut board, "help\nq\n");
        assert_eq!(end, SessionEnd::Quit);
        assert!(out.contains("Commands:"));
        assert!(!out.contains(ANSI_CLEAR));
    }

    #[test]
    fn draw_and_bad_input_are_reported() {
        let mut board = Board::dealt(&mut SeededShuffler::new(3)).unwrap();
        let (end, out) = session(&mut board, "draw\nZ9 A\n");
        assert_eq!(end, SessionEnd::EndOfInput);
        assert_eq!(board.waste().size(), 1);
        assert!(out.contains("Could not understand 'Z9 A'"));
    }

    #[test]
    fn last_foundation_move_wins() {
        let mut layout = Layout::default();
        for (f, suit) in Suit::ALL.iter().enumerate() {
            let ranks = if *suit == Suit::Diamonds {
                &Rank::ALL[..12]
            } else {
                &Rank::ALL[..]
            };
            layout.foundations[f] = ranks.iter().map(|&r| Card::face_up(*suit, r)).collect();
        }
        layout.waste = vec![Card::face_up(Suit::Diamonds, Rank::King)];
        let mut board = Board::from_layout(layout).unwrap();

        let (end, out) = session(&mut board, "W *\nq\n");
        assert_eq!(end, SessionEnd::Won);
        assert!(out.ends_with("You won!\n"));
    }
}
