//! Image pipeline: SVG board on disk -> PNG bitmap on disk.
//!
//! Only one representation of a puzzle image exists at a time. Each step
//! deletes its input once its output is written; the PNG stays until the
//! publisher archives it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use resvg::{tiny_skia, usvg};
use tracing::{debug, info, warn};

use crate::error::BotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    Svg,
    Png,
}

impl AssetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            AssetFormat::Svg => "svg",
            AssetFormat::Png => "png",
        }
    }
}

/// A puzzle image staged under `{work_dir}/{base_name}.{ext}`.
#[derive(Debug, Clone)]
pub struct RenderedAsset {
    work_dir: PathBuf,
    base_name: String,
}

impl RenderedAsset {
    pub fn new(work_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            base_name: base_name.into(),
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn path(&self, format: AssetFormat) -> PathBuf {
        self.work_dir
            .join(format!("{}.{}", self.base_name, format.extension()))
    }

    /// Write the SVG document to the staging directory.
    pub fn write_vector(&self, svg: &str) -> Result<PathBuf, BotError> {
        fs::create_dir_all(&self.work_dir)?;
        let path = self.path(AssetFormat::Svg);
        fs::write(&path, svg)?;
        debug!(path = %path.display(), bytes = svg.len(), "SVG written");
        Ok(path)
    }

    /// Rasterize the staged SVG at `scale` times its size, then delete it.
    pub fn rasterize(&self, scale: f32) -> Result<PathBuf, BotError> {
        let svg_path = self.path(AssetFormat::Svg);
        let png_path = self.path(AssetFormat::Png);

        let rendered = rasterize_file(&svg_path, scale).and_then(|pixmap| {
            pixmap
                .save_png(&png_path)
                .map_err(|e| BotError::Render(format!("Failed to write {}: {e}", png_path.display())))?;
            Ok(pixmap)
        });
        let pixmap = match rendered {
            Ok(pixmap) => pixmap,
            Err(e) => {
                discard(&svg_path);
                discard(&png_path);
                return Err(e);
            }
        };
        fs::remove_file(&svg_path)?;

        info!(
            path = %png_path.display(),
            width = pixmap.width(),
            height = pixmap.height(),
            "Bitmap rendered"
        );
        Ok(png_path)
    }

    /// Run both steps: stage the SVG and turn it into the final PNG.
    pub fn render(&self, svg: &str, scale: f32) -> Result<PathBuf, BotError> {
        self.write_vector(svg)?;
        self.rasterize(scale)
    }
}

/// Best-effort removal of a leftover file after a failed conversion.
fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed intermediate file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove intermediate file"),
    }
}

fn rasterize_file(svg_path: &Path, scale: f32) -> Result<tiny_skia::Pixmap, BotError> {
    let data = fs::read(svg_path)?;
    let tree = usvg::Tree::from_data(&data, &usvg::Options::default())
        .map_err(|e| BotError::Render(format!("Failed to parse {}: {e}", svg_path.display())))?;

    let size = tree
        .size()
        .to_int_size()
        .scale_by(scale)
        .ok_or_else(|| BotError::Render(format!("Invalid render scale {scale}")))?;

    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        BotError::Render(format!(
            "Cannot allocate {}x{} pixmap",
            size.width(),
            size.height()
        ))
    })?;

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}
