//! Raster export of the 3D scatter
//!
//! Renders the prism points, the bounding box grid and a depth colour bar into
//! an RGBA image. Labels are left to the on-screen view.

use super::{box_edges, normalize, plasma, OrbitCamera, PrismMesh};
use image::{Rgba, RgbaImage};
use std::path::Path;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const GRID: Rgba<u8> = Rgba([200, 200, 200, 255]);
const OUTLINE: Rgba<u8> = Rgba([40, 40, 40, 255]);

/// Export image settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    pub width: u32,
    pub height: u32,
    /// Scatter marker radius in pixels
    pub point_radius: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        // 6.4 x 4.8 inch figure at 300 dpi
        Self {
            width: 1920,
            height: 1440,
            point_radius: 14.0,
        }
    }
}

/// Render the scatter with a camera fitted to the mesh
pub fn render_scatter(mesh: &PrismMesh, options: &RasterOptions) -> RgbaImage {
    let mut camera = OrbitCamera::new();
    let (min, max) = mesh.bounds();
    camera.fit_to(min, max);
    render_scatter_with_camera(mesh, &camera, options)
}

/// Render the scatter as seen from `camera`
pub fn render_scatter_with_camera(
    mesh: &PrismMesh,
    camera: &OrbitCamera,
    options: &RasterOptions,
) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(options.width.max(1), options.height.max(1), BACKGROUND);

    // Plot area leaves room for the colour bar on the right
    let bar_width = (options.width as f32 * 0.04).max(4.0);
    let plot_width = (options.width as f32 - bar_width * 3.0).max(1.0);
    let plot_height = options.height as f32;

    let mut camera = camera.clone();
    camera.set_aspect(plot_width / plot_height);

    let (min, max) = mesh.bounds();
    for (a, b) in box_edges(min, max) {
        if let (Some(pa), Some(pb)) = (
            camera.project(a, plot_width, plot_height),
            camera.project(b, plot_width, plot_height),
        ) {
            draw_line(&mut img, (pa.x, pa.y), (pb.x, pb.y), GRID);
        }
    }

    // Far points first so near markers cover them
    let mut projected: Vec<_> = mesh
        .vertices
        .iter()
        .enumerate()
        .filter_map(|(i, v)| camera.project(*v, plot_width, plot_height).map(|p| (i, p)))
        .collect();
    projected.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

    for (index, point) in projected {
        let [r, g, b] = mesh.vertex_color(index);
        fill_circle(&mut img, (point.x, point.y), options.point_radius + 1.5, OUTLINE);
        fill_circle(&mut img, (point.x, point.y), options.point_radius, Rgba([r, g, b, 255]));
    }

    draw_color_bar(&mut img, plot_width + bar_width, bar_width);
    img
}

/// Render and save the scatter as an image file (format from the extension)
pub fn export_png(mesh: &PrismMesh, path: &Path, options: &RasterOptions) -> anyhow::Result<()> {
    let img = render_scatter(mesh, options);
    img.save(path)?;
    log::info!("Exported visualization {}x{} to {:?}", img.width(), img.height(), path);
    Ok(())
}

fn draw_color_bar(img: &mut RgbaImage, left: f32, width: f32) {
    let height = img.height() as f32;
    let top = height * 0.1;
    let bottom = height * 0.9;

    let x0 = left.max(0.0) as u32;
    let x1 = ((left + width) as u32).min(img.width());
    let y0 = top as u32;
    let y1 = (bottom as u32).min(img.height());

    for y in y0..y1 {
        // Deepest (largest Z) at the top
        let t = normalize(y as f32, bottom, top);
        let [r, g, b] = plasma(t);
        for x in x0..x1 {
            img.put_pixel(x, y, Rgba([r, g, b, 255]));
        }
    }
}

fn put_pixel_checked(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_line(img: &mut RgbaImage, from: (f32, f32), to: (f32, f32), color: Rgba<u8>) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().min(100_000.0) as usize;
    if steps == 0 {
        put_pixel_checked(img, from.0.round() as i64, from.1.round() as i64, color);
        return;
    }
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = (from.0 + dx * t).round() as i64;
        let y = (from.1 + dy * t).round() as i64;
        put_pixel_checked(img, x, y, color);
    }
}

fn fill_circle(img: &mut RgbaImage, centre: (f32, f32), radius: f32, color: Rgba<u8>) {
    let r = radius.ceil() as i64;
    let (cx, cy) = (centre.0.round() as i64, centre.1.round() as i64);
    let r2 = radius * radius;
    for y in -r..=r {
        for x in -r..=r {
            if (x * x + y * y) as f32 <= r2 {
                put_pixel_checked(img, cx + x, cy + y, color);
            }
        }
    }
}
