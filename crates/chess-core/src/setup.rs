//! Plays the dataset's setup move to reach the position the solver faces.

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, Position, Square};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Invalid FEN {fen:?}: {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Illegal position {fen:?}: {reason}")]
    IllegalPosition { fen: String, reason: String },

    #[error("Invalid UCI move {0:?}")]
    InvalidMove(String),

    #[error("Move {uci} is not legal in {fen:?}")]
    IllegalMove { uci: String, fen: String },
}

/// Origin and destination of the move that was just played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastMove {
    pub from: Square,
    pub to: Square,
}

impl LastMove {
    pub fn touches(&self, sq: Square) -> bool {
        self.from == sq || self.to == sq
    }
}

/// Position after the setup move, ready to be rendered.
#[derive(Debug, Clone)]
pub struct PuzzlePosition {
    pub position: Chess,
    pub last_move: LastMove,
}

impl PuzzlePosition {
    pub fn turn(&self) -> Color {
        self.position.turn()
    }
}

/// Parse `fen`, apply the UCI move `uci` and return the resulting position.
pub fn play_setup_move(fen: &str, uci: &str) -> Result<PuzzlePosition, SetupError> {
    let parsed: Fen = fen.parse().map_err(|e| SetupError::InvalidFen {
        fen: fen.to_string(),
        reason: format!("{e}"),
    })?;

    let mut position: Chess = parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| SetupError::IllegalPosition {
            fen: fen.to_string(),
            reason: format!("{e}"),
        })?;

    let uci_move: UciMove = uci
        .parse()
        .map_err(|_| SetupError::InvalidMove(uci.to_string()))?;

    // Highlight squares come from the move text itself, so castling shows the
    // king's path (e1g1) rather than the king-takes-rook encoding.
    let last_move = match uci_move {
        UciMove::Normal { from, to, .. } => LastMove { from, to },
        _ => return Err(SetupError::InvalidMove(uci.to_string())),
    };

    let legal = uci_move
        .to_move(&position)
        .map_err(|_| SetupError::IllegalMove {
            uci: uci.to_string(),
            fen: fen.to_string(),
        })?;
    position.play_unchecked(legal);

    Ok(PuzzlePosition { position, last_move })
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_setup_move_flips_turn() {
        let setup = play_setup_move(START_FEN, "e2e4").unwrap();
        assert_eq!(setup.turn(), Color::Black);
        assert_eq!(setup.last_move, LastMove { from: Square::E2, to: Square::E4 });

        let fen = "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2";
        let setup = play_setup_move(fen, "b8c6").unwrap();
        assert_eq!(setup.turn(), Color::White);
    }

    #[test]
    fn test_piece_lands_on_destination() {
        let setup = play_setup_move(START_FEN, "g1f3").unwrap();
        let piece = setup.position.board().piece_at(Square::F3).unwrap();
        assert_eq!(piece.role, shakmaty::Role::Knight);
        assert!(setup.position.board().piece_at(Square::G1).is_none());
    }

    #[test]
    fn test_castling_highlights_king_squares() {
        let fen = "r3k2r/pppqbppp/2npbn2/4p3/4P3/2NPBN2/PPPQBPPP/R3K2R w KQkq - 4 8";
        let setup = play_setup_move(fen, "e1g1").unwrap();
        assert_eq!(setup.last_move, LastMove { from: Square::E1, to: Square::G1 });
        let king = setup.position.board().piece_at(Square::G1).unwrap();
        assert_eq!(king.role, shakmaty::Role::King);
    }

    #[test]
    fn test_promotion_move() {
        let fen = "8/4P1k1/8/8/8/8/8/4K3 w - - 0 1";
        let setup = play_setup_move(fen, "e7e8q").unwrap();
        let piece = setup.position.board().piece_at(Square::E8).unwrap();
        assert_eq!(piece.role, shakmaty::Role::Queen);
    }

    #[test]
    fn test_invalid_fen() {
        let err = play_setup_move("not a fen", "e2e4").unwrap_err();
        assert!(matches!(err, SetupError::InvalidFen { .. }));
    }

    #[test]
    fn test_illegal_position() {
        // No kings on the board.
        let err = play_setup_move("8/8/8/8/8/8/8/8 w - - 0 1", "a1a2").unwrap_err();
        assert!(matches!(err, SetupError::IllegalPosition { .. }));
    }

    #[test]
    fn test_malformed_move() {
        let err = play_setup_move(START_FEN, "e2-e4").unwrap_err();
        assert_eq!(err, SetupError::InvalidMove("e2-e4".into()));
    }

    #[test]
    fn test_illegal_move() {
        let err = play_setup_move(START_FEN, "e2e5").unwrap_err();
        assert!(matches!(err, SetupError::IllegalMove { .. }));
    }

    #[test]
    fn test_null_move_rejected() {
        let err = play_setup_move(START_FEN, "0000").unwrap_err();
        assert_eq!(err, SetupError::InvalidMove("0000".into()));
    }
}
