//! Chess puzzle poster
//!
//! Posts one random Lichess puzzle per invocation. Scheduling is left to an
//! external trigger (cron, systemd timer, CI schedule).

use puzzle_bot::config::BotConfig;
use puzzle_bot::pipeline;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (credentials live there in local setups)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = BotConfig::load()?;
    info!(
        dataset = %config.render.dataset_path.display(),
        work_dir = %config.render.work_dir.display(),
        archive_dir = %config.archive_dir.display(),
        "Bot config loaded"
    );

    match pipeline::run(&config).await {
        Ok(report) => {
            info!(
                puzzle_id = %report.puzzle_id,
                post_id = %report.post_id,
                media_id = %report.media_id,
                archived = %report.archived.display(),
                "Run complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            Err(e.into())
        }
    }
}
