//! Procedural renderer for the ChoreQuest launcher icon.
//!
//! The icon is authored on the 108-unit adaptive-icon grid and painted in
//! layers: a vertical sky-blue-to-purple gradient, a translucent yellow
//! accent wedge, a translucent purple tint, and an emblem layer (shield,
//! inset highlight, checkmark, star) composited on top. The finished canvas
//! is flattened to opaque RGB.

use anyhow::{ensure, Context, Result};
use image::{Rgb, RgbImage};
use std::f32::consts::PI;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect, Transform};

/// Side of the design grid the glyphs are authored on.
const GRID_UNITS: f32 = 108.0;
/// Fraction of the grid the foreground occupies.
const FOREGROUND_FACTOR: f32 = 0.7;
/// Centering inset for the scaled-down foreground, in grid units.
const FOREGROUND_INSET: f32 = 16.2;

/// Shield anchor, in grid units.
const ANCHOR_UNITS: f32 = 54.0;
/// Shield half-width, in grid units.
const SHIELD_UNITS: f32 = 26.0;
/// Checkmark half-width, in grid units.
const CHECK_UNITS: f32 = 12.0;
/// Star outer radius, in grid units.
const STAR_RADIUS_UNITS: f32 = 6.0;
/// The star sits 34 grid units above the shield anchor.
const STAR_CENTER_UNITS: f32 = ANCHOR_UNITS - 34.0;
/// Inner star vertices at 40% of the outer radius.
const STAR_INNER_RATIO: f32 = 0.4;
/// Highlight vertices are pulled toward the anchor by this factor, leaving a
/// visible border ring.
const HIGHLIGHT_INSET: f32 = 0.85;

const GRADIENT_TOP: [u8; 3] = [0x4A, 0x90, 0xE2]; // sky blue
const GRADIENT_BOTTOM: [u8; 3] = [0x9B, 0x59, 0xB6]; // purple
const ACCENT_WEDGE: [u8; 4] = [0xFF, 0xD9, 0x3D, 76]; // yellow, ~30% opacity
const TINT_OVERLAY: [u8; 4] = [0x9B, 0x59, 0xB6, 153]; // purple, ~60% opacity
const SHIELD_FILL: [u8; 3] = [0xFF, 0xFF, 0xFF];
const SHIELD_HIGHLIGHT: [u8; 3] = [0xE8, 0xF4, 0xFD];
const CHECK_FILL: [u8; 3] = [0x27, 0xAE, 0x60];
const STAR_FILL: [u8; 3] = [0xFF, 0xD9, 0x3D];

/// Render the launcher icon at `size`x`size` pixels.
///
/// The result is fully opaque; rendering the same size twice produces
/// bit-identical buffers.
pub fn render_icon(size: u32) -> Result<RgbImage> {
    ensure!(size > 0, "icon size must be a positive number of pixels");

    let mut canvas = new_canvas(size)?;
    paint_gradient(&mut canvas)?;
    paint_accent_wedge(&mut canvas, size)?;
    paint_tint(&mut canvas, size)?;

    let emblem = render_emblem(size)?;
    canvas.draw_pixmap(
        0,
        0,
        emblem.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );

    Ok(flatten(&canvas))
}

fn new_canvas(size: u32) -> Result<Pixmap> {
    Pixmap::new(size, size).with_context(|| format!("Can't allocate a {size}x{size} canvas"))
}

/// Fill every row with the gradient color for that row, top to bottom.
fn paint_gradient(canvas: &mut Pixmap) -> Result<()> {
    let (width, height) = (canvas.width(), canvas.height());
    let mut paint = Paint::default();
    // Rows are pixel-aligned; skipping anti-aliasing keeps each row at the
    // exact interpolated color.
    paint.anti_alias = false;

    for y in 0..height {
        let [r, g, b] = gradient_row_color(y, height);
        paint.set_color_rgba8(r, g, b, u8::MAX);
        let row = Rect::from_xywh(0.0, y as f32, width as f32, 1.0)
            .context("invalid gradient row")?;
        canvas.fill_rect(row, &paint, Transform::identity(), None);
    }

    Ok(())
}

fn gradient_row_color(y: u32, size: u32) -> [u8; 3] {
    let ratio = y as f32 / size as f32;
    let lerp = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * ratio) as u8;

    [
        lerp(GRADIENT_TOP[0], GRADIENT_BOTTOM[0]),
        lerp(GRADIENT_TOP[1], GRADIENT_BOTTOM[1]),
        lerp(GRADIENT_TOP[2], GRADIENT_BOTTOM[2]),
    ]
}

/// Triangular highlight spanning the left edge and reaching the right
/// mid-edge.
fn paint_accent_wedge(canvas: &mut Pixmap, size: u32) -> Result<()> {
    let side = size as f32;
    let mid = (size / 2) as f32;
    let wedge = polygon(&[(0.0, 0.0), (side, mid), (0.0, side)])?;
    canvas.fill_path(
        &wedge,
        &layer_paint(ACCENT_WEDGE),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    Ok(())
}

/// Flat tint across the whole canvas.
fn paint_tint(canvas: &mut Pixmap, size: u32) -> Result<()> {
    let side = size as f32;
    let full = Rect::from_xywh(0.0, 0.0, side, side).context("invalid tint rect")?;
    canvas.fill_rect(full, &layer_paint(TINT_OVERLAY), Transform::identity(), None);
    Ok(())
}

/// Paint the shield, its inset highlight, the checkmark, and the star onto a
/// transparent layer of their own.
fn render_emblem(size: u32) -> Result<Pixmap> {
    let frame = GlyphFrame::new(size);
    let mut layer = new_canvas(size)?;

    let (base_x, base_y) = frame.point(ANCHOR_UNITS, ANCHOR_UNITS);
    let shield = shield_outline(base_x, base_y, frame.length(SHIELD_UNITS));
    fill_polygon(&mut layer, &shield, SHIELD_FILL)?;

    let highlight = shield.map(|(x, y)| {
        (
            x * HIGHLIGHT_INSET + base_x * (1.0 - HIGHLIGHT_INSET),
            y * HIGHLIGHT_INSET + base_y * (1.0 - HIGHLIGHT_INSET),
        )
    });
    fill_polygon(&mut layer, &highlight, SHIELD_HIGHLIGHT)?;

    let check = checkmark_outline(base_x, base_y, frame.length(CHECK_UNITS));
    fill_polygon(&mut layer, &check, CHECK_FILL)?;

    let (_, star_y) = frame.point(ANCHOR_UNITS, STAR_CENTER_UNITS);
    let star = star_outline(base_x, star_y, frame.length(STAR_RADIUS_UNITS));
    fill_polygon(&mut layer, &star, STAR_FILL)?;

    Ok(layer)
}

/// Maps grid coordinates to pixels for a given output size.
struct GlyphFrame {
    fg_scale: f32,
    translate: f32,
}

impl GlyphFrame {
    fn new(size: u32) -> Self {
        let scale = size as f32 / GRID_UNITS;
        GlyphFrame {
            fg_scale: FOREGROUND_FACTOR * scale,
            translate: FOREGROUND_INSET * scale,
        }
    }

    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.fg_scale + self.translate,
            y * self.fg_scale + self.translate,
        )
    }

    fn length(&self, units: f32) -> f32 {
        units * self.fg_scale
    }
}

/// Shield silhouette: pointed top, angled shoulders, v-shaped base.
fn shield_outline(base_x: f32, base_y: f32, shield: f32) -> [(f32, f32); 8] {
    [
        (base_x - shield, base_y - shield * 0.6),
        (base_x - shield * 0.7, base_y - shield * 0.9),
        (base_x, base_y - shield * 1.1),
        (base_x + shield * 0.7, base_y - shield * 0.9),
        (base_x + shield, base_y - shield * 0.6),
        (base_x + shield, base_y + shield * 0.3),
        (base_x, base_y + shield * 0.8),
        (base_x - shield, base_y + shield * 0.3),
    ]
}

/// Checkmark glyph: outer down-stroke, long up-stroke, inner notch.
fn checkmark_outline(base_x: f32, base_y: f32, check: f32) -> [(f32, f32); 6] {
    [
        (base_x - check, base_y),
        (base_x - check * 0.3, base_y + check * 0.5),
        (base_x + check * 0.8, base_y - check * 0.8),
        (base_x + check * 0.6, base_y - check),
        (base_x - check * 0.3, base_y + check * 0.2),
        (base_x - check * 0.6, base_y - check * 0.2),
    ]
}

/// Five-pointed star: outer and inner vertices alternate at 36° steps,
/// starting straight up.
fn star_outline(center_x: f32, center_y: f32, outer_radius: f32) -> [(f32, f32); 10] {
    let mut points = [(0.0, 0.0); 10];
    for (i, point) in points.iter_mut().enumerate() {
        let angle = i as f32 * PI / 5.0 - PI / 2.0;
        let radius = if i % 2 == 0 {
            outer_radius
        } else {
            outer_radius * STAR_INNER_RATIO
        };
        *point = (center_x + radius * angle.cos(), center_y + radius * angle.sin());
    }
    points
}

fn fill_polygon(canvas: &mut Pixmap, points: &[(f32, f32)], rgb: [u8; 3]) -> Result<()> {
    let path = polygon(points)?;
    canvas.fill_path(
        &path,
        &solid_paint(rgb),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    Ok(())
}

fn polygon(points: &[(f32, f32)]) -> Result<Path> {
    let mut pb = PathBuilder::new();
    let (x, y) = points[0];
    pb.move_to(x, y);
    for &(x, y) in &points[1..] {
        pb.line_to(x, y);
    }
    pb.close();
    pb.finish().context("degenerate polygon outline")
}

fn solid_paint(rgb: [u8; 3]) -> Paint<'static> {
    layer_paint([rgb[0], rgb[1], rgb[2], u8::MAX])
}

fn layer_paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

/// Drop the (fully saturated) alpha channel.
fn flatten(canvas: &Pixmap) -> RgbImage {
    let width = canvas.width();
    let mut rgb = RgbImage::new(width, canvas.height());

    for (i, pixel) in canvas.pixels().iter().enumerate() {
        let color = pixel.demultiply();
        let x = i as u32 % width;
        let y = i as u32 / width;
        rgb.put_pixel(x, y, Rgb([color.red(), color.green(), color.blue()]));
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_requested_dimensions() {
        for size in [1, 64, 108, 200] {
            let icon = render_icon(size).unwrap();
            assert_eq!(icon.dimensions(), (size, size));
        }
    }

    #[test]
    fn rejects_zero_size() {
        assert!(render_icon(0).is_err());
    }

    #[test]
    fn renders_are_bit_identical() {
        let first = render_icon(96).unwrap();
        let second = render_icon(96).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn background_gradient_spans_declared_endpoints() {
        let size = 64;
        let mut canvas = new_canvas(size).unwrap();
        paint_gradient(&mut canvas).unwrap();

        // Top row is exactly the start color across its full width.
        for x in 0..size {
            let top = canvas.pixel(x, 0).unwrap().demultiply();
            assert_eq!([top.red(), top.green(), top.blue()], GRADIENT_TOP);
        }

        // Bottom row reaches the end color within integer rounding.
        let bottom = canvas.pixel(size / 2, size - 1).unwrap().demultiply();
        let got = [bottom.red(), bottom.green(), bottom.blue()];
        for (channel, want) in got.iter().zip(GRADIENT_BOTTOM) {
            assert!(
                (*channel as i32 - want as i32).abs() <= 3,
                "bottom row {got:?} should approximate {GRADIENT_BOTTOM:?}"
            );
        }
    }

    #[test]
    fn background_gradient_is_monotonic_per_channel() {
        let size = 96;
        let mut canvas = new_canvas(size).unwrap();
        paint_gradient(&mut canvas).unwrap();

        // Sky blue fades toward purple: red rises, green and blue fall.
        let mut prev = canvas.pixel(size / 2, 0).unwrap().demultiply();
        for y in 1..size {
            let cur = canvas.pixel(size / 2, y).unwrap().demultiply();
            assert!(cur.red() >= prev.red(), "red regressed at row {y}");
            assert!(cur.green() <= prev.green(), "green regressed at row {y}");
            assert!(cur.blue() <= prev.blue(), "blue regressed at row {y}");
            prev = cur;
        }
    }

    #[test]
    fn glyph_anchor_scales_proportionally() {
        let small = GlyphFrame::new(512);
        let large = GlyphFrame::new(1024);

        let (sx, sy) = small.point(ANCHOR_UNITS, ANCHOR_UNITS);
        let (lx, ly) = large.point(ANCHOR_UNITS, ANCHOR_UNITS);
        assert!((sx / 512.0 - lx / 1024.0).abs() < 1e-4);
        assert!((sy / 512.0 - ly / 1024.0).abs() < 1e-4);
    }

    #[test]
    fn overlays_follow_source_over_blending() {
        let size = 128;
        let mut canvas = new_canvas(size).unwrap();
        paint_gradient(&mut canvas).unwrap();
        paint_accent_wedge(&mut canvas, size).unwrap();
        paint_tint(&mut canvas, size).unwrap();

        // Probe a pixel deep inside the wedge, away from anti-aliased edges.
        let (x, y) = (2, 64);
        let got = canvas.pixel(x, y).unwrap().demultiply();

        let mut want = gradient_row_color(y, size).map(f32::from);
        for layer in [ACCENT_WEDGE, TINT_OVERLAY] {
            let alpha = f32::from(layer[3]) / 255.0;
            for channel in 0..3 {
                want[channel] =
                    want[channel] * (1.0 - alpha) + f32::from(layer[channel]) * alpha;
            }
        }

        for (got, want) in [got.red(), got.green(), got.blue()].into_iter().zip(want) {
            assert!(
                (f32::from(got) - want).abs() <= 3.0,
                "blended channel {got} should be near {want}"
            );
        }
    }

    #[test]
    fn emblem_fills_hit_exact_palette_colors() {
        let size = 512;
        let icon = render_icon(size).unwrap();
        let frame = GlyphFrame::new(size);

        let (base_x, base_y) = frame.point(ANCHOR_UNITS, ANCHOR_UNITS);
        let (_, star_y) = frame.point(ANCHOR_UNITS, STAR_CENTER_UNITS);

        // Star center is an opaque fill, untouched by the overlays beneath.
        let star = icon.get_pixel(base_x as u32, star_y as u32);
        assert_eq!(star.0, STAR_FILL);

        // The lower bowl of the shield shows the pale highlight, below the
        // checkmark and inside the inset polygon.
        let bowl_y = base_y + frame.length(SHIELD_UNITS) * 0.6;
        let bowl = icon.get_pixel(base_x as u32, bowl_y as u32);
        assert_eq!(bowl.0, SHIELD_HIGHLIGHT);
    }
}
