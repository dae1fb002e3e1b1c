use image::GrayImage;
use imageproc::distance_transform::Norm;
use crate::{traits::EdgeDetector, types::ThresholdLevel};

/// Canny edges grown by a square dilation to close small gaps
#[derive(Debug, Clone)]
pub struct CannyEdgeDetector {
    pub low_threshold: f32,
    pub high_threshold: f32,
    /// Chebyshev radius of the dilation; 1 gives a 3x3 square
    pub dilation_radius: u8,
}

impl Default for CannyEdgeDetector {
    fn default() -> Self {
        Self {
            low_threshold: 10.0,
            high_threshold: 20.0,
            dilation_radius: 1,
        }
    }
}

impl EdgeDetector for CannyEdgeDetector {
    fn detect_edges(&self, plane: &GrayImage) -> GrayImage {
        let edges = imageproc::edges::canny(plane, self.low_threshold, self.high_threshold);
        if self.dilation_radius == 0 {
            return edges;
        }
        imageproc::morphology::dilate(&edges, Norm::LInf, self.dilation_radius)
    }
}

/// Binary mask for one threshold level of a channel plane
pub fn generate_mask(plane: &GrayImage, level: ThresholdLevel, edges: &dyn EdgeDetector) -> GrayImage {
    match level {
        ThresholdLevel::Edge => edges.detect_edges(plane),
        ThresholdLevel::Intensity { cut } => intensity_mask(plane, cut),
    }
}

/// Foreground (255) where intensity >= `cut`
pub fn intensity_mask(plane: &GrayImage, cut: u8) -> GrayImage {
    match cut.checked_sub(1) {
        Some(threshold) => imageproc::contrast::threshold(plane, threshold),
        None => GrayImage::from_pixel(plane.width(), plane.height(), image::Luma([255])),
    }
}
