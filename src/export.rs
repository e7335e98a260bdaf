use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::RenderError;
use crate::render::{CameraConfig, Line2};

const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Draw lines in black on a white canvas and save as PNG.
pub fn write_png(lines: &[Line2], path: &Path, width: u32, height: u32) -> Result<(), RenderError> {
    let mut img: RgbImage = ImageBuffer::from_pixel(width, height, PAPER);

    for line in lines {
        draw_line(
            &mut img,
            line.x0.round() as i32,
            line.y0.round() as i32,
            line.x1.round() as i32,
            line.y1.round() as i32,
            INK,
        );
    }

    img.save(path)?;
    Ok(())
}

/// Bresenham line, pixels outside the image are skipped
fn draw_line(img: &mut RgbImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;
    let mut x = x0;
    let mut y = y0;

    loop {
        if x >= 0 && x < img.width() as i32 && y >= 0 && y < img.height() as i32 {
            img.put_pixel(x as u32, y as u32, color);
        }

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Write lines as an SVG document, one polyline per line.
pub fn write_svg(lines: &[Line2], path: &Path, width: u32, height: u32) -> Result<(), RenderError> {
    std::fs::write(path, svg_document(lines, width, height))?;
    Ok(())
}

fn svg_document(lines: &[Line2], width: u32, height: u32) -> String {
    let mut svg = String::with_capacity(64 * lines.len() + 256);
    // Writing into a String cannot fail
    let _ = writeln!(
        svg,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<rect width="100%" height="100%" fill="white" />
<g stroke="black" stroke-width="1" fill="none">"#,
        w = width,
        h = height
    );
    for l in lines {
        let _ = writeln!(
            svg,
            r#"<polyline points="{:.3},{:.3} {:.3},{:.3}" />"#,
            l.x0, l.y0, l.x1, l.y1
        );
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

/// File name (without extension) for one view of one seed.
///
/// `city<seed>_<eye>_<center>_<width>_<height>_<label>`, numbers rounded to
/// whole units.
pub fn view_file_stem(seed: i64, camera: &CameraConfig, label: &str) -> String {
    let parts = [
        camera.eye.x,
        camera.eye.y,
        camera.eye.z,
        camera.center.x,
        camera.center.y,
        camera.center.z,
        camera.width,
        camera.height,
    ];
    let mut stem = format!("city{}", seed);
    for v in parts {
        let _ = write!(stem, "_{:.0}", v);
    }
    let _ = write!(stem, "_{}", label);
    stem
}

/// PNG and SVG paths for a view inside `out_dir`
pub fn view_paths(out_dir: &Path, stem: &str) -> (PathBuf, PathBuf) {
    (
        out_dir.join(format!("{}.png", stem)),
        out_dir.join(format!("{}.svg", stem)),
    )
}
