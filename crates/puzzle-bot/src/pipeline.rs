//! One run of the bot, start to finish.
//!
//! Stages run strictly in order and any error ends the run. Everything up to
//! the bitmap happens locally, so a bad dataset or a rendering failure never
//! reaches the network.

use std::path::{Path, PathBuf};

use chess_core::{orientation_flipped, play_setup_move, render_board, BoardStyle, PuzzleRecord};
use rand::Rng;
use tracing::info;

use crate::clients::twitter::TwitterClient;
use crate::config::{BotConfig, RenderSettings};
use crate::dataset;
use crate::error::BotError;
use crate::publisher::Publisher;
use crate::render::RenderedAsset;

/// A puzzle rendered and waiting in the working directory.
#[derive(Debug, Clone)]
pub struct PreparedPuzzle {
    pub record: PuzzleRecord,
    pub bitmap: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub puzzle_id: String,
    pub post_id: String,
    pub media_id: String,
    pub archived: PathBuf,
}

/// Render the board for `record` into `{work_dir}/{id}_{rating}.png`.
pub fn render_puzzle(
    record: &PuzzleRecord,
    work_dir: &Path,
    scale: f32,
) -> Result<PathBuf, BotError> {
    let setup = play_setup_move(&record.fen, &record.setup_move)?;
    let flipped = orientation_flipped(&setup.position);
    let svg = render_board(
        &setup.position,
        Some(setup.last_move),
        flipped,
        &BoardStyle::lichess(),
    );

    RenderedAsset::new(work_dir, record.base_name()).render(&svg, scale)
}

/// Choose a puzzle and render it. No network access.
pub fn prepare<R: Rng + ?Sized>(
    settings: &RenderSettings,
    rng: &mut R,
) -> Result<PreparedPuzzle, BotError> {
    let row = dataset::choose_puzzle(&settings.dataset_path, settings.dataset_has_headers, rng)?;
    let record = PuzzleRecord::from_row(&row)?;
    info!(
        puzzle_id = %record.id,
        rating = %record.rating,
        setup_move = %record.setup_move,
        first_to_move = %record.first_to_move,
        "Puzzle chosen"
    );

    let bitmap = render_puzzle(&record, &settings.work_dir, settings.render_scale)?;
    Ok(PreparedPuzzle { record, bitmap })
}

/// Full run: prepare, authenticate, post, archive.
pub async fn run(config: &BotConfig) -> Result<RunReport, BotError> {
    let prepared = prepare(&config.render, &mut rand::thread_rng())?;

    let client = TwitterClient::new(config)?;
    let publisher = Publisher::connect(client, config.archive_dir.clone()).await?;
    let post = publisher.publish(&prepared.bitmap, &prepared.record).await?;

    Ok(RunReport {
        puzzle_id: prepared.record.id,
        post_id: post.post_id,
        media_id: post.media_id,
        archived: post.archived,
    })
}
