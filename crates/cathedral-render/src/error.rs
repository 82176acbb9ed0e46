use std::path::PathBuf;

use cathedral_core::TileCategory;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("tileset manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("no sprite for {category} (looked for {})", path.display())]
    MissingSprite {
        category: TileCategory,
        path: PathBuf,
    },
    #[error("unknown tile category in manifest: {0}")]
    UnknownCategory(String),
    #[error("tile size must be at least 1 pixel")]
    ZeroTileSize,
    #[error("a {width}x{height} map with {tile_px}px tiles is too large for one image")]
    ImageTooLarge {
        width: usize,
        height: usize,
        tile_px: u32,
    },
}
