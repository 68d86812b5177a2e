//! Puzzle dataset loading and random selection.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::error::BotError;

/// One dataset row, fields in file order.
pub type Row = Vec<String>;

/// Read every row of the CSV at `path` into memory.
///
/// Rows may differ in width; shape problems surface when the row is turned
/// into a puzzle record.
pub fn load_rows(path: &Path, has_headers: bool) -> Result<Vec<Row>, BotError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(path = %path.display(), rows = rows.len(), "Dataset loaded");
    Ok(rows)
}

/// Pick one row uniformly at random.
pub fn choose_row<'a, R: Rng + ?Sized>(
    rows: &'a [Row],
    rng: &mut R,
    path: &Path,
) -> Result<&'a Row, BotError> {
    rows.choose(rng)
        .ok_or_else(|| BotError::EmptyDataset(path.to_path_buf()))
}

/// Load the dataset and return a random row from it.
pub fn choose_puzzle<R: Rng + ?Sized>(
    path: &Path,
    has_headers: bool,
    rng: &mut R,
) -> Result<Row, BotError> {
    info!(path = %path.display(), "Choosing puzzle...");
    let rows = load_rows(path, has_headers)?;
    let row = choose_row(&rows, rng, path)?;
    Ok(row.clone())
}
