//! cathedral-render: turn a generated layout into text or an image
//!
//! Both renderers take a finished [`DungeonResult`]. Floor cells draw as
//! floor, and wall cells take the shape of the room edge they lie on (see
//! [`view`]). Saddle tiles, which the generator leaves unresolved, become the
//! `?` sentinel in text and a transparent tile in images.

pub mod ascii;
pub mod error;
pub mod tileset;
pub mod view;

pub use ascii::{AsciiOptions, GlyphSet, SADDLE_GLYPH, render_ascii};
pub use error::RenderError;
pub use tileset::{Tileset, TilesetManifest, canvas_size, render_image};
pub use view::{CellView, cell_views};

use cathedral_core::DungeonResult;
use image::RgbaImage;

/// A configured renderer
#[derive(Debug, Clone)]
pub enum Renderer {
    Ascii(AsciiOptions),
    Tileset(Tileset),
}

/// What a renderer produced
#[derive(Debug, Clone)]
pub enum Rendered {
    Text(String),
    Image(RgbaImage),
}

impl Renderer {
    pub fn render(&self, result: &DungeonResult) -> Result<Rendered, RenderError> {
        match self {
            Renderer::Ascii(options) => Ok(Rendered::Text(render_ascii(result, options))),
            Renderer::Tileset(tileset) => render_image(result, tileset).map(Rendered::Image),
        }
    }
}
