//! Tile sprites keyed by category, and map composition.
//!
//! A tileset directory holds one square sprite per category, named after the
//! category (`wall_N.png`, `corner_outer_SE.png`, ...). A JSON manifest can
//! map categories to other file names instead, e.g. for tilesets whose files
//! are numbered by neighborhood pattern.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use cathedral_core::{DungeonResult, TileCategory};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::RenderError;
use crate::view::{CellView, cell_views};

/// Category name -> sprite file, relative to the tileset directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetManifest {
    pub tiles: HashMap<String, String>,
}

impl TilesetManifest {
    /// Load a manifest from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path)?;
        let manifest: TilesetManifest = serde_json::from_str(&content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Every key must name a category.
    fn validate(&self) -> Result<(), RenderError> {
        for key in self.tiles.keys() {
            TileCategory::from_str(key).map_err(|_| RenderError::UnknownCategory(key.clone()))?;
        }
        Ok(())
    }

    /// File name for a category, defaulting to `<category>.png`.
    pub fn file_for(&self, category: TileCategory) -> String {
        self.tiles
            .get(category.name())
            .cloned()
            .unwrap_or_else(|| format!("{}.png", category.name()))
    }
}

/// Square sprites for every drawable category.
///
/// Saddle cells may have no sprite; they render as a blank tile.
#[derive(Debug, Clone)]
pub struct Tileset {
    tile_px: u32,
    sprites: HashMap<TileCategory, RgbaImage>,
}

impl Tileset {
    /// Build from in-memory sprites, resizing each to `tile_px` square.
    pub fn from_sprites(
        tile_px: u32,
        sprites: HashMap<TileCategory, DynamicImage>,
    ) -> Result<Self, RenderError> {
        if tile_px == 0 {
            return Err(RenderError::ZeroTileSize);
        }
        let sprites: HashMap<_, _> = sprites
            .into_iter()
            .map(|(category, sprite)| (category, fit(&sprite, tile_px)))
            .collect();
        for category in TileCategory::iter().filter(|c| !c.is_ambiguous()) {
            if !sprites.contains_key(&category) {
                return Err(RenderError::MissingSprite {
                    category,
                    path: PathBuf::from(format!("{}.png", category.name())),
                });
            }
        }
        Ok(Self { tile_px, sprites })
    }

    /// Load sprites from `dir`, named by `manifest`.
    pub fn load<P: AsRef<Path>>(
        dir: P,
        manifest: &TilesetManifest,
        tile_px: u32,
    ) -> Result<Self, RenderError> {
        let dir = dir.as_ref();
        let mut sprites = HashMap::new();
        for category in TileCategory::iter() {
            let path = dir.join(manifest.file_for(category));
            if !path.is_file() {
                if category.is_ambiguous() {
                    continue;
                }
                return Err(RenderError::MissingSprite { category, path });
            }
            sprites.insert(category, image::open(&path)?);
        }
        debug!("loaded {} sprites from {}", sprites.len(), dir.display());
        Self::from_sprites(tile_px, sprites)
    }

    pub fn tile_px(&self) -> u32 {
        self.tile_px
    }

    /// Sprite for a category, `None` for a blank tile
    pub fn sprite(&self, category: TileCategory) -> Option<&RgbaImage> {
        self.sprites.get(&category)
    }
}

fn fit(sprite: &DynamicImage, tile_px: u32) -> RgbaImage {
    if sprite.width() == tile_px && sprite.height() == tile_px {
        sprite.to_rgba8()
    } else {
        sprite
            .resize_exact(tile_px, tile_px, FilterType::Nearest)
            .to_rgba8()
    }
}

/// Pixel size of a `width` x `height` map drawn with `tile_px` tiles.
///
/// Fails when a side overflows `u32` or the RGBA buffer overflows `usize`.
pub fn canvas_size(width: usize, height: usize, tile_px: u32) -> Result<(u32, u32), RenderError> {
    let too_large = || RenderError::ImageTooLarge {
        width,
        height,
        tile_px,
    };
    let side = |cells: usize| u32::try_from(cells).ok()?.checked_mul(tile_px);
    let (w, h) = side(width).zip(side(height)).ok_or_else(too_large)?;
    u64::from(w)
        .checked_mul(u64::from(h))
        .and_then(|n| n.checked_mul(4))
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(too_large)?;
    Ok((w, h))
}

/// Compose the full map as one RGBA image.
///
/// Floor uses the `open` sprite, walls the sprite of their shape, and saddle
/// tiles stay transparent.
pub fn render_image(result: &DungeonResult, tileset: &Tileset) -> Result<RgbaImage, RenderError> {
    let px = tileset.tile_px();
    let (w, h) = canvas_size(result.width, result.height, px)?;
    let mut canvas = RgbaImage::new(w, h);

    for (i, view) in cell_views(result).into_iter().enumerate() {
        let category = match view {
            CellView::Floor { .. } => TileCategory::Open,
            CellView::Wall { shape, .. } => shape,
            CellView::Ambiguous => continue,
        };
        let x = (i % result.width) as i64 * i64::from(px);
        let y = (i / result.width) as i64 * i64::from(px);
        if let Some(sprite) = tileset.sprite(category) {
            imageops::replace(&mut canvas, sprite, x, y);
        }
    }

    Ok(canvas)
}
