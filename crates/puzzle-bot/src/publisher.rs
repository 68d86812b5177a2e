//! Posting a rendered puzzle and archiving its image.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chess_core::PuzzleRecord;
use tracing::{error, info, warn};

use crate::clients::twitter::TwitterClient;
use crate::error::BotError;

/// Result of a successful post.
#[derive(Debug, Clone)]
pub struct PublishedPost {
    pub post_id: String,
    pub media_id: String,
    pub archived: PathBuf,
}

/// Caption text for a puzzle post.
pub fn compose_caption(record: &PuzzleRecord) -> String {
    format!(
        "{side} to move. This puzzle is rated {rating} on Lichess.org.\n\
         Thank you to Lichess for providing the puzzle database.\n\
         Puzzle Details: {url}",
        side = record.first_to_move,
        rating = record.rating,
        url = record.url,
    )
}

/// An authenticated posting session.
pub struct Publisher {
    client: TwitterClient,
    archive_dir: PathBuf,
}

impl Publisher {
    /// Verify the credentials once. Fails if the service rejects them.
    pub async fn connect(client: TwitterClient, archive_dir: PathBuf) -> Result<Self, BotError> {
        let account = match client.verify_credentials().await {
            Ok(account) => account,
            Err(e) => {
                error!(error = %e, "Error during authentication.");
                return Err(e);
            }
        };
        info!(account = %account.screen_name, "Authentication succeeded.");

        Ok(Self {
            client,
            archive_dir,
        })
    }

    /// Upload the bitmap, post it with its caption, then archive it.
    pub async fn publish(
        &self,
        bitmap: &Path,
        record: &PuzzleRecord,
    ) -> Result<PublishedPost, BotError> {
        let media_id = self.client.upload_media(bitmap).await?;
        info!(media_id = %media_id, "Media uploaded");

        let caption = compose_caption(record);
        let post_id = self
            .client
            .create_post(&caption, std::slice::from_ref(&media_id))
            .await?;
        info!(post_id = %post_id, puzzle_id = %record.id, "Post created");

        let archived = archive(bitmap, &self.archive_dir)?;
        info!(path = %archived.display(), "Puzzle successfully posted.");

        Ok(PublishedPost {
            post_id,
            media_id,
            archived,
        })
    }
}

/// Move `bitmap` into `archive_dir`, keeping its file name.
pub fn archive(bitmap: &Path, archive_dir: &Path) -> Result<PathBuf, BotError> {
    let file_name = bitmap.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", bitmap.display()),
        )
    })?;

    fs::create_dir_all(archive_dir)?;
    let dest = archive_dir.join(file_name);

    if let Err(e) = fs::rename(bitmap, &dest) {
        // Different filesystems: fall back to copy + delete
        warn!(error = %e, "Rename into archive failed, copying instead");
        fs::copy(bitmap, &dest)?;
        fs::remove_file(bitmap)?;
    }
    Ok(dest)
}
