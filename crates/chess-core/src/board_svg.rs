//! SVG board rendering.
//!
//! Produces a self-contained SVG document: 8x8 squares on a 45-unit grid, the
//! last move highlighted, pieces referenced from `<defs>`. No coordinates are
//! drawn. The output is meant to be rasterized, so it avoids text and CSS.

use std::collections::BTreeMap;

use shakmaty::{Chess, File, Position, Rank, Square};

use crate::pieces::{glyph_id, glyph_markup};
use crate::setup::LastMove;

/// Side length of one square in SVG user units.
pub const SQUARE_SIZE: u32 = 45;

const BOARD_UNITS: u32 = SQUARE_SIZE * 8;

/// Fixed visual configuration of the board image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardStyle {
    /// Rendered width and height in pixels.
    pub size: u32,
    pub light: String,
    pub dark: String,
    pub light_lastmove: String,
    pub dark_lastmove: String,
}

impl BoardStyle {
    /// Palette modelled on the Lichess blue board.
    pub fn lichess() -> Self {
        Self {
            size: 900,
            light: "#DFE3E6".to_string(),
            dark: "#90A2AC".to_string(),
            light_lastmove: "#C7D7A0".to_string(),
            dark_lastmove: "#99B07E".to_string(),
        }
    }
}

impl Default for BoardStyle {
    fn default() -> Self {
        Self::lichess()
    }
}

/// Whether the board is drawn from Black's side: the negation of the
/// position's "White to move" flag.
pub fn orientation_flipped(position: &Chess) -> bool {
    !position.turn().is_white()
}

/// Render `position` as an SVG document.
pub fn render_board(
    position: &Chess,
    last_move: Option<LastMove>,
    flipped: bool,
    style: &BoardStyle,
) -> String {
    let board = position.board();

    let mut squares = String::new();
    let mut pieces = String::new();
    let mut glyphs: BTreeMap<String, &'static str> = BTreeMap::new();

    for rank in 0..8u32 {
        for file in 0..8u32 {
            let sq = Square::from_coords(File::new(file), Rank::new(rank));
            let (x, y) = square_origin(file, rank, flipped);

            let shade = if (file + rank) % 2 == 1 { "light" } else { "dark" };
            let highlighted = last_move.is_some_and(|m| m.touches(sq));
            let fill = match (shade, highlighted) {
                ("light", false) => &style.light,
                ("light", true) => &style.light_lastmove,
                (_, false) => &style.dark,
                (_, true) => &style.dark_lastmove,
            };
            let class = if highlighted {
                format!("square {shade} lastmove {sq}")
            } else {
                format!("square {shade} {sq}")
            };

            squares.push_str(&format!(
                r#"<rect x="{x}" y="{y}" width="{SQUARE_SIZE}" height="{SQUARE_SIZE}" class="{class}" stroke="none" fill="{fill}"/>"#,
            ));

            if let Some(piece) = board.piece_at(sq) {
                let id = glyph_id(piece);
                pieces.push_str(&format!(
                    r##"<use href="#{id}" xlink:href="#{id}" transform="translate({x}, {y})"/>"##,
                ));
                glyphs.insert(id, glyph_markup(piece));
            }
        }
    }

    let mut svg = String::with_capacity(squares.len() + pieces.len() + 8 * 1024);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.2" baseProfile="tiny" viewBox="0 0 {BOARD_UNITS} {BOARD_UNITS}" width="{size}" height="{size}">"#,
        size = style.size,
    ));
    if !glyphs.is_empty() {
        svg.push_str("<defs>");
        for (id, markup) in &glyphs {
            svg.push_str(&format!(r#"<g id="{id}">{markup}</g>"#));
        }
        svg.push_str("</defs>");
    }
    svg.push_str(&squares);
    svg.push_str(&pieces);
    svg.push_str("</svg>");
    svg
}

/// Top-left corner of a square in user units.
fn square_origin(file: u32, rank: u32, flipped: bool) -> (u32, u32) {
    let (col, row) = if flipped {
        (7 - file, rank)
    } else {
        (file, 7 - rank)
    };
    (col * SQUARE_SIZE, row * SQUARE_SIZE)
}
