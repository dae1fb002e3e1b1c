use image::GrayImage;
use crate::{traits::ContourExtractor, types::{Contour, Point}};

/// Imageproc-based contour extractor.
///
/// Returns every border (outer and hole) as a flat list; the hierarchy is dropped.
#[derive(Debug, Clone, Default)]
pub struct ImageprocContourExtractor;

impl ContourExtractor for ImageprocContourExtractor {
    fn extract_contours(&self, mask: &GrayImage) -> Vec<Contour> {
        imageproc::contours::find_contours::<i32>(mask)
            .into_iter()
            .filter(|contour| contour.points.len() >= 3)
            .map(|contour| contour.points.into_iter().map(Point::from).collect())
            .collect()
    }
}
