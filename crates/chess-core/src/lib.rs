//! Chess building blocks for the puzzle poster.
//!
//! Everything here is pure: a dataset row goes in, a puzzle record, the
//! position to solve and its SVG rendering come out. File and network work
//! lives in the `puzzle-bot` crate.

pub mod board_svg;
pub mod pieces;
pub mod puzzle;
pub mod setup;

pub use board_svg::{orientation_flipped, render_board, BoardStyle};
pub use puzzle::{PuzzleError, PuzzleRecord, Side};
pub use setup::{play_setup_move, LastMove, PuzzlePosition, SetupError};
