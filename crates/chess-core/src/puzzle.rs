//! Puzzle records built from rows of the Lichess puzzle dataset.
//!
//! The dataset is a headerless CSV in the Lichess export layout:
//! `PuzzleId,FEN,Moves,Rating,RatingDeviation,Popularity,NbPlays,Themes,GameUrl,OpeningTags`.

use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use thiserror::Error;

/// Column positions in a dataset row.
pub mod columns {
    pub const PUZZLE_ID: usize = 0;
    pub const FEN: usize = 1;
    pub const MOVES: usize = 2;
    pub const RATING: usize = 3;
    pub const RATING_DEVIATION: usize = 4;
    pub const POPULARITY: usize = 5;
    pub const NB_PLAYS: usize = 6;
    pub const THEMES: usize = 7;
    pub const GAME_URL: usize = 8;
    pub const OPENING_TAGS: usize = 9;

    /// Rows shorter than this cannot produce a record. `OPENING_TAGS` is optional.
    pub const REQUIRED: usize = GAME_URL + 1;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("Row has {found} columns, need at least {required}")]
    TooFewColumns { found: usize, required: usize },

    #[error("Puzzle {0} has no moves")]
    NoMoves(String),

    #[error("Puzzle {id} has a malformed FEN: {fen:?}")]
    MalformedFen { id: String, fen: String },
}

/// A player, as shown in captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Side> for Color {
    fn from(side: Side) -> Color {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

/// Everything the poster needs to know about one puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleRecord {
    pub id: String,
    /// Position before the setup move.
    pub fen: String,
    /// Opponent move that leads into the puzzle, in UCI notation.
    pub setup_move: String,
    /// Side the solver plays, i.e. the side to move after `setup_move`.
    pub first_to_move: Side,
    pub rating: String,
    pub url: String,
}

impl PuzzleRecord {
    /// Build a record from a raw dataset row.
    pub fn from_row<S: AsRef<str>>(row: &[S]) -> Result<Self, PuzzleError> {
        if row.len() < columns::REQUIRED {
            return Err(PuzzleError::TooFewColumns {
                found: row.len(),
                required: columns::REQUIRED,
            });
        }

        let id = field(row, columns::PUZZLE_ID).to_string();
        let fen = field(row, columns::FEN).to_string();

        let setup_move = field(row, columns::MOVES)
            .split_whitespace()
            .next()
            .ok_or_else(|| PuzzleError::NoMoves(id.clone()))?
            .to_string();

        let first_to_move = solver_side(&fen).ok_or_else(|| PuzzleError::MalformedFen {
            id: id.clone(),
            fen: fen.clone(),
        })?;

        Ok(Self {
            id,
            fen,
            setup_move,
            first_to_move,
            rating: field(row, columns::RATING).to_string(),
            url: field(row, columns::GAME_URL).to_string(),
        })
    }

    /// Shared file stem for every rendered artifact of this puzzle.
    pub fn base_name(&self) -> String {
        format!("{}_{}", self.id, self.rating)
    }
}

fn field<S: AsRef<str>>(row: &[S], idx: usize) -> &str {
    row[idx].as_ref()
}

/// The FEN records the side to move before the setup move, so the solver is
/// the other side. The turn field is located counting from the end.
fn solver_side(fen: &str) -> Option<Side> {
    let tokens: Vec<&str> = fen.split_whitespace().collect();
    let turn = tokens.len().checked_sub(5).map(|idx| tokens[idx])?;
    Some(if turn == "b" { Side::White } else { Side::Black })
}
