//! Cathedral dungeon generator
//!
//! Generates one level and writes it as text, JSON or a tileset image.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};

use cathedral_core::{Axis, DungeonConfig, DungeonRng, SplitStrategy, generate_with_rng};
use cathedral_render::{AsciiOptions, GlyphSet, Rendered, Renderer, Tileset, TilesetManifest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Glyph grid
    Ascii,
    /// PNG composed from a tileset
    Image,
    /// The full result as JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Glyphs {
    Box,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Split {
    Quadrants,
    BisectX,
    BisectY,
}

impl From<Split> for SplitStrategy {
    fn from(split: Split) -> Self {
        match split {
            Split::Quadrants => SplitStrategy::Quadrants,
            Split::BisectX => SplitStrategy::Bisect { first: Axis::X },
            Split::BisectY => SplitStrategy::Bisect { first: Axis::Y },
        }
    }
}

/// Cathedral dungeon generator
#[derive(Parser, Debug)]
#[command(name = "cathedral")]
#[command(author, version, about = "Generate a Cathedral-style dungeon level", long_about = None)]
struct Args {
    /// Output format
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = Mode::Ascii)]
    mode: Mode,

    /// Output file; text modes print to stdout without it
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// RNG seed; drawn from the OS when absent
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// JSON configuration file, used instead of the built-in preset
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Blueprint width in coarse cells
    #[arg(long = "width")]
    width: Option<usize>,

    /// Blueprint height in coarse cells
    #[arg(long = "height")]
    height: Option<usize>,

    /// Leaf block size
    #[arg(long = "min-block")]
    min_block: Option<usize>,

    /// Expansion factor per blueprint cell
    #[arg(short = 'k', long = "expansion")]
    expansion: Option<usize>,

    /// Probability that a leaf is floor
    #[arg(long = "floor-probability")]
    floor_probability: Option<f64>,

    /// Probability that a region is split further
    #[arg(long = "subdivide-probability")]
    subdivide_probability: Option<f64>,

    /// Subdivision scheme
    #[arg(long = "split", value_enum)]
    split: Option<Split>,

    /// Minimum floor cells before an attempt is accepted
    #[arg(long = "min-floor")]
    min_floor: Option<usize>,

    /// Attempts before giving up
    #[arg(long = "max-attempts")]
    max_attempts: Option<u32>,

    /// Fraction of inner room corners that grow a dividing wall
    #[arg(long = "dividers")]
    dividers: Option<f64>,

    /// Glyph set for ascii mode
    #[arg(long = "glyphs", value_enum, default_value_t = Glyphs::Box)]
    glyphs: Glyphs,

    /// ANSI colours in ascii mode
    #[arg(long = "color")]
    color: bool,

    /// Spaces between columns in ascii mode
    #[arg(long = "gap", default_value_t = 0)]
    gap: usize,

    /// Tileset directory for image mode
    #[arg(short = 't', long = "tileset")]
    tileset: Option<PathBuf>,

    /// JSON manifest mapping categories to sprite files
    #[arg(long = "manifest")]
    manifest: Option<PathBuf>,

    /// Tile size in pixels
    #[arg(long = "tile-size", default_value_t = 16)]
    tile_size: u32,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    /// Preset or config file, then individual flags on top.
    fn dungeon_config(&self) -> Result<DungeonConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => DungeonConfig::cathedral(),
        };

        if let Some(v) = self.width {
            config.blueprint_width = v;
        }
        if let Some(v) = self.height {
            config.blueprint_height = v;
        }
        if let Some(v) = self.min_block {
            config.min_block_size = v;
        }
        if let Some(v) = self.expansion {
            config.expansion = v;
        }
        if let Some(v) = self.floor_probability {
            config.floor_probability = v;
        }
        if let Some(v) = self.subdivide_probability {
            config.subdivide_probability = v;
        }
        if let Some(v) = self.split {
            config.split = v.into();
        }
        if let Some(v) = self.min_floor {
            config.min_floor_cells = v;
        }
        if let Some(v) = self.max_attempts {
            config.max_attempts = v;
        }
        if let Some(v) = self.dividers {
            config.divider_ratio = v;
        }
        Ok(config)
    }

    fn renderer(&self) -> Result<Option<Renderer>> {
        match self.mode {
            Mode::Json => Ok(None),
            Mode::Ascii => Ok(Some(Renderer::Ascii(AsciiOptions {
                glyphs: match self.glyphs {
                    Glyphs::Box => GlyphSet::Box,
                    Glyphs::Plain => GlyphSet::Plain,
                },
                color: self.color,
                gap: self.gap,
            }))),
            Mode::Image => {
                let Some(dir) = &self.tileset else {
                    bail!("image mode needs --tileset");
                };
                if self.output.is_none() {
                    bail!("image mode needs --output");
                }
                let manifest = match &self.manifest {
                    Some(path) => TilesetManifest::load_from_file(path)
                        .with_context(|| format!("loading manifest {}", path.display()))?,
                    None => TilesetManifest::default(),
                };
                let tileset = Tileset::load(dir, &manifest, self.tile_size)
                    .with_context(|| format!("loading tileset {}", dir.display()))?;
                Ok(Some(Renderer::Tileset(tileset)))
            }
        }
    }
}

fn write_text(output: Option<&PathBuf>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let config = args.dungeon_config()?;
    // Tileset errors surface before generation
    let renderer = args.renderer()?;

    let mut rng = match args.seed {
        Some(seed) => DungeonRng::new(seed),
        None => DungeonRng::from_entropy(),
    };
    info!("seed {}", rng.seed());

    let result = generate_with_rng(&config, &mut rng).context("generating dungeon")?;
    info!(
        "{} rooms before carving, {} after, {} corridor cells",
        result.connectivity.rooms_before,
        result.connectivity.rooms_after,
        result.connectivity.carved_cells
    );

    if result.dividers.walls > 0 {
        info!(
            "{} divider cells, {} doorways",
            result.dividers.walls, result.dividers.doors
        );
    }

    let rendered = renderer
        .map(|r| r.render(&result))
        .transpose()
        .context("rendering dungeon")?;
    match rendered {
        None => {
            let json = serde_json::to_string_pretty(&result).context("serializing result")?;
            write_text(args.output.as_ref(), &json)?;
        }
        Some(Rendered::Text(text)) => write_text(args.output.as_ref(), &text)?,
        Some(Rendered::Image(image)) => {
            let Some(path) = &args.output else {
                bail!("image mode needs --output");
            };
            image
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}", path.display());
        }
    }

    Ok(())
}
