use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use imageproc::{drawing::draw_antialiased_line_segment_mut, pixelops::interpolate};
use tracing::debug;

use crate::{
    config::OverlayStyle,
    error::{RectError, Result},
    traits::OverlaySink,
    types::Quad,
};

/// Widest outline stroke, in pixels
pub const MAX_STROKE_WIDTH: u32 = 64;

/// Draws detected rectangles over the source image
#[derive(Debug, Clone, Default)]
pub struct OverlayRenderer {
    pub style: OverlayStyle,
}

impl OverlayRenderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    /// Copy of `image` with every candidate outlined
    pub fn render(&self, image: &RgbImage, candidates: &[Quad]) -> RgbImage {
        self.render_with_paper(image, candidates, None)
    }

    /// As [`render`](Self::render), with the paper outline drawn last in its own color
    pub fn render_with_paper(&self, image: &RgbImage, candidates: &[Quad], paper: Option<&Quad>) -> RgbImage {
        let mut canvas = image.clone();
        for quad in candidates {
            draw_closed_outline(&mut canvas, quad, Rgb(self.style.color), self.style.stroke_width);
        }
        if let Some(paper) = paper {
            draw_closed_outline(&mut canvas, paper, Rgb(self.style.paper_color), self.style.stroke_width);
        }
        canvas
    }
}

/// Anti-aliased closed outline, thickened by drawing offset copies
fn draw_closed_outline(canvas: &mut RgbImage, quad: &Quad, color: Rgb<u8>, stroke_width: u32) {
    let width = stroke_width.clamp(1, MAX_STROKE_WIDTH) as i32;
    let low = -(width - 1) / 2;
    let high = low + width - 1;

    for i in 0..4 {
        let a = quad.vertices[i];
        let b = quad.vertices[(i + 1) % 4];
        for dx in low..=high {
            for dy in low..=high {
                draw_antialiased_line_segment_mut(
                    canvas,
                    (a.x + dx, a.y + dy),
                    (b.x + dx, b.y + dy),
                    color,
                    interpolate,
                );
            }
        }
    }
}

/// Writes each overlay as a PNG into a directory
#[derive(Debug)]
pub struct FileOverlaySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FileOverlaySink {
    /// Create the output directory up front
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: Vec::new() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl OverlaySink for FileOverlaySink {
    fn present(&mut self, name: &str, overlay: &RgbImage) -> Result<()> {
        let stem = Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        let path = self.dir.join(format!("{:02}_{}.png", self.written.len(), stem));

        overlay
            .save(&path)
            .map_err(|e| RectError::Overlay(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "wrote overlay");
        self.written.push(path);
        Ok(())
    }
}
