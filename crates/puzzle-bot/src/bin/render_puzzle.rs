//! Render a single puzzle from the dataset to PNG without posting it.
//!
//! Usage: cargo run --bin render-puzzle -- <puzzle-id>
//!
//! Reads PUZZLE_CSV_PATH, PUZZLE_CSV_HAS_HEADERS, WORK_DIR and RENDER_SCALE
//! like the bot does. Prints the puzzle record as JSON.

use chess_core::puzzle::columns;
use chess_core::PuzzleRecord;
use puzzle_bot::config::RenderSettings;
use puzzle_bot::dataset;
use puzzle_bot::pipeline::render_puzzle;
use puzzle_bot::publisher::compose_caption;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let puzzle_id = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: render-puzzle <puzzle-id>"))?;

    let settings = RenderSettings::load()?;
    let rows = dataset::load_rows(&settings.dataset_path, settings.dataset_has_headers)?;
    println!("Loaded {} puzzles from {}", rows.len(), settings.dataset_path.display());

    let row = rows
        .iter()
        .find(|row| row.get(columns::PUZZLE_ID).map(String::as_str) == Some(puzzle_id.as_str()))
        .ok_or_else(|| anyhow::anyhow!("puzzle {puzzle_id} not found"))?;

    let record = PuzzleRecord::from_row(row)?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    let png = render_puzzle(&record, &settings.work_dir, settings.render_scale)?;

    println!();
    println!("Caption:");
    println!("{}", compose_caption(&record));
    println!();
    println!("Rendered {}", png.display());

    Ok(())
}
