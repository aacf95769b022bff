//! Move descriptors: the two short tokens a player types to name a move.
//!
//! Five shapes are understood, tried in this order:
//!
//! ```text
//! C4 A     tableau column C, 4th card from the bottom, onto column A
//! *2 A     top of foundation 2 onto column A
//! W A      top of the waste onto column A
//! W *      top of the waste onto its foundation
//! C *      top of column C onto its foundation
//! ```
//!
//! Column letters are `A`..`G` and foundations are numbered `1`..`4` in suit
//! order (clubs, spades, hearts, diamonds). Letters are case-insensitive.
//! Row numbers are range-checked later, against the actual column.

use core::fmt;

use log::trace;
use thiserror::Error;

use crate::card::NUM_SUITS;
use crate::board::NUM_COLS;

/// Why a descriptor pair could not be turned into a concrete move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMove {
    #[error("expected two tokens like \"C4 A\" or \"W *\", got {0:?}")]
    WrongTokenCount(String),
    #[error("\"{from} {to}\" is not a recognised move")]
    Unrecognised { from: String, to: String },
    #[error("there is no column {0}")]
    UnknownColumn(char),
    #[error("row {0:?} is not a number")]
    BadRow(String),
    #[error("there is no foundation {0:?}; use *1 to *4")]
    UnknownFoundation(String),
    #[error("column {column} has no row {row}")]
    RowOutOfRange { column: char, row: usize },
    #[error("the {0} is empty")]
    EmptySource(&'static str),
    #[error("row {row} of column {column} is face-down")]
    FaceDownSource { column: char, row: usize },
}

/// A syntactically valid move, with columns and foundations already mapped
/// to 0-based indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveRequest {
    /// Move the cascade starting at `index` (0 = bottom card) of column
    /// `src` onto column `dst`.
    ColumnToColumn { src: usize, index: usize, dst: usize },
    /// Move the top card of foundation `foundation` onto column `dst`.
    FoundationToColumn { foundation: usize, dst: usize },
    /// Move the top card of the waste onto column `dst`.
    WasteToColumn { dst: usize },
    /// Move the top card of the waste onto the foundation of its suit.
    WasteToFoundation,
    /// Move the top card of column `src` onto the foundation of its suit.
    ColumnToFoundation { src: usize },
}

impl MoveRequest {
    /// Parse a whole input line holding both tokens.
    pub fn parse_line(line: &str) -> Result<Self, InvalidMove> {
        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(source), Some(dest), None) => MoveRequest::parse(source, dest),
            _ => Err(InvalidMove::WrongTokenCount(line.trim().to_string())),
        }
    }

    /// Parse a source/destination token pair.
    pub fn parse(source: &str, dest: &str) -> Result<Self, InvalidMove> {
        let (source, dest) = (source.trim(), dest.trim());
        let request = match (classify(source), classify(dest)) {
            (Some(Token::ColumnRow(col, row)), Some(Token::Column(dst))) => {
                let src = column_index(col)?;
                let dst = column_index(dst)?;
                let row: usize = row.parse().map_err(|_| InvalidMove::BadRow(row.to_string()))?;
                if row == 0 {
                    return Err(InvalidMove::RowOutOfRange {
                        column: col.to_ascii_uppercase(),
                        row,
                    });
                }
                MoveRequest::ColumnToColumn {
                    src,
                    index: row - 1,
                    dst,
                }
            }
            (Some(Token::Foundation(n)), Some(Token::Column(dst))) => MoveRequest::FoundationToColumn {
                foundation: foundation_index(n)?,
                dst: column_index(dst)?,
            },
            (Some(Token::Waste), Some(Token::Column(dst))) => MoveRequest::WasteToColumn {
                dst: column_index(dst)?,
            },
            (Some(Token::Waste), Some(Token::Star)) => MoveRequest::WasteToFoundation,
            (Some(Token::Column(src)), Some(Token::Star)) => MoveRequest::ColumnToFoundation {
                src: column_index(src)?,
            },
            _ => {
                return Err(InvalidMove::Unrecognised {
                    from: source.to_string(),
                    to: dest.to_string(),
                });
            }
        };
        trace!("parsed {source:?} {dest:?} as {request:?}");
        Ok(request)
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MoveRequest::ColumnToColumn { src, index, dst } => {
                write!(f, "{}{} {}", column_letter(src), index + 1, column_letter(dst))
            }
            MoveRequest::FoundationToColumn { foundation, dst } => {
                write!(f, "*{} {}", foundation + 1, column_letter(dst))
            }
            MoveRequest::WasteToColumn { dst } => write!(f, "W {}", column_letter(dst)),
            MoveRequest::WasteToFoundation => f.write_str("W *"),
            MoveRequest::ColumnToFoundation { src } => write!(f, "{} *", column_letter(src)),
        }
    }
}

/// Letter naming tableau column `index` (0 → 'A').
pub fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// The lexical shape of one token, before any range checks.
#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    /// A lone letter other than `W`.
    Column(char),
    /// A letter followed by digits, e.g. `C4`.
    ColumnRow(char, &'a str),
    /// `*` followed by digits, e.g. `*2`.
    Foundation(&'a str),
    Waste,
    Star,
}

fn classify(token: &str) -> Option<Token<'_>> {
    if token == "*" {
        return Some(Token::Star);
    }
    if let Some(n) = token.strip_prefix('*') {
        return (!n.is_empty() && n.chars().all(|c| c.is_ascii_digit())).then_some(Token::Foundation(n));
    }

    let mut chars = token.chars();
    let letter = chars.next().filter(|c| c.is_ascii_alphabetic())?;
    let rest = chars.as_str();
    if rest.is_empty() {
        if letter.eq_ignore_ascii_case(&'W') {
            return Some(Token::Waste);
        }
        return Some(Token::Column(letter));
    }
    rest.chars()
        .all(|c| c.is_ascii_digit())
        .then_some(Token::ColumnRow(letter, rest))
}

fn column_index(letter: char) -> Result<usize, InvalidMove> {
    let upper = letter.to_ascii_uppercase();
    let index = (upper as u32).wrapping_sub('A' as u32) as usize;
    if index < NUM_COLS {
        Ok(index)
    } else {
        Err(InvalidMove::UnknownColumn(upper))
    }
}

fn foundation_index(n: &str) -> Result<usize, InvalidMove> {
    match n.parse::<usize>() {
        Ok(v) if (1..=NUM_SUITS as usize).contains(&v) => Ok(v - 1),
        _ => Err(InvalidMove::UnknownFoundation(n.to_string())),
    }
}
