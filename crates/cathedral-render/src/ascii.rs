//! Text rendering of a dungeon layout

use cathedral_core::{DungeonResult, TileCategory};

use crate::view::{CellView, cell_views};

const YELLOW: &str = "\x1b[93m";
const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const BLUE: &str = "\x1b[94m";
const RESET: &str = "\x1b[0m";

/// Glyph drawn for saddle cells in every glyph set
pub const SADDLE_GLYPH: char = '?';

/// Character set used for walls and corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphSet {
    /// Box-drawing characters
    #[default]
    Box,
    /// 7-bit ASCII only
    Plain,
}

impl GlyphSet {
    /// Glyph for a tile category
    pub const fn glyph(self, category: TileCategory) -> char {
        use TileCategory::*;
        match (self, category) {
            (_, Open) => '.',
            (_, Solid) => '#',
            (_, AmbiguousSaddle) => SADDLE_GLYPH,
            (GlyphSet::Box, WallN | WallS) => '─',
            (GlyphSet::Plain, WallN | WallS) => '-',
            (_, WallE | WallW) => '|',
            (GlyphSet::Box, CornerOuterNW | CornerInnerSE) => '┌',
            (GlyphSet::Box, CornerOuterNE | CornerInnerSW) => '┐',
            (GlyphSet::Box, CornerOuterSW | CornerInnerNE) => '└',
            (GlyphSet::Box, CornerOuterSE | CornerInnerNW) => '┘',
            (GlyphSet::Plain, _) => '+',
        }
    }

    /// Glyph for a cell view; floor is always `.`
    pub const fn view_glyph(self, view: CellView) -> char {
        match view {
            CellView::Floor { .. } => '.',
            CellView::Wall { shape, .. } => self.glyph(shape),
            CellView::Ambiguous => SADDLE_GLYPH,
        }
    }
}

/// Options for [`render_ascii`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AsciiOptions {
    pub glyphs: GlyphSet,
    /// Wrap glyphs in ANSI colour codes
    pub color: bool,
    /// Spaces between columns
    pub gap: usize,
}

fn color_for(view: CellView) -> Option<&'static str> {
    match view {
        CellView::Ambiguous => Some(RED),
        CellView::Floor { carved: true } => Some(GREEN),
        CellView::Floor { carved: false } => None,
        CellView::Wall { divider: true, .. } => Some(BLUE),
        CellView::Wall {
            shape: TileCategory::Solid,
            ..
        } => None,
        CellView::Wall { .. } => Some(YELLOW),
    }
}

/// Render one line per grid row.
pub fn render_ascii(result: &DungeonResult, options: &AsciiOptions) -> String {
    let separator = " ".repeat(options.gap);
    let views = cell_views(result);

    views
        .chunks(result.width.max(1))
        .map(|row| {
            row.iter()
                .map(|&view| {
                    let glyph = options.glyphs.view_glyph(view);
                    match color_for(view).filter(|_| options.color) {
                        Some(code) => format!("{code}{glyph}{RESET}"),
                        None => glyph.to_string(),
                    }
                })
                .collect::<Vec<_>>()
                .join(&separator)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
