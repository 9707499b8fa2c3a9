use crate::render;
use anyhow::{Context, Result};
use clap::Parser;
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, RgbImage,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tiny_skia::Pixmap;

/// Play Store upload set: the required 512 px icon plus the high-res 1024 px variant.
const PLAY_STORE_SIZES: [u32; 2] = [512, 1024];

const PROBE_CANVAS_SIZE: u32 = 8;

#[derive(Debug, Parser)]
#[clap(
    name = "chorequest-icon-gen",
    about = "Render the ChoreQuest launcher icon as Play Store PNG assets"
)]
pub struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = "play_store_icons")]
    pub output: PathBuf,

    /// Custom PNG icon sizes to generate. When set, only these sizes are generated.
    #[clap(short, long, value_delimiter = ',', value_name = "SIZES")]
    pub png: Option<Vec<u32>>,
}

pub fn generate_icons(args: Args) -> Result<()> {
    // Probe the backend before any filesystem work so a broken build
    // produces no partial output.
    ensure_raster_backend()?;

    create_dir_all(&args.output).context("Can't create output directory")?;

    if let Some(sizes) = &args.png {
        generate_custom_sizes(sizes, &args.output)
    } else {
        generate_play_store_set(&args.output)
    }
}

/// Verify that the raster backend can hand out a canvas at all.
fn ensure_raster_backend() -> Result<()> {
    Pixmap::new(PROBE_CANVAS_SIZE, PROBE_CANVAS_SIZE).context(
        "The tiny-skia raster backend is unavailable (a probe canvas could not be \
         allocated). Reinstall chorequest-icon-gen, or rebuild it with default \
         features so the bundled rasterizer is linked in.",
    )?;

    Ok(())
}

fn generate_play_store_set(out_dir: &Path) -> Result<()> {
    println!("Generating ChoreQuest Play Store icons...");

    for size in PLAY_STORE_SIZES {
        render_to_file(size, out_dir)?;
    }

    println!();
    println!("✓ Icon generation complete, saved in {}", out_dir.display());
    println!("For Play Store submission, use: {}", icon_filename(512));

    Ok(())
}

fn generate_custom_sizes(sizes: &[u32], out_dir: &Path) -> Result<()> {
    println!("Generating custom ChoreQuest icon sizes...");

    for &size in sizes {
        render_to_file(size, out_dir)?;
    }

    println!();
    println!("✓ Icon generation complete, saved in {}", out_dir.display());

    Ok(())
}

fn render_to_file(size: u32, out_dir: &Path) -> Result<()> {
    println!("Generating {size}x{size} icon...");

    let icon = render::render_icon(size)?;
    let output_path = out_dir.join(icon_filename(size));
    save_png(&icon, &output_path)?;

    println!("  ✓ Saved {}", output_path.display());
    Ok(())
}

fn icon_filename(size: u32) -> String {
    format!("chorequest_icon_{size}x{size}.png")
}

// Encode as RGB PNG with the best compression the codec offers.
fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    let encoder =
        PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilterType::Adaptive);
    encoder
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    out.flush()?;

    Ok(())
}
