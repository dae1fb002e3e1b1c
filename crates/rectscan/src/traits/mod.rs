use image::{GrayImage, RgbImage};
use crate::{error::Result, types::{Contour, Point}};

/// Trait for noise suppression on the decoded color image
pub trait Denoiser: Send + Sync {
    /// Return a smoothed image with the same dimensions
    fn denoise(&self, image: &RgbImage) -> RgbImage;
}

/// Trait for edge extraction on a single channel plane
pub trait EdgeDetector: Send + Sync {
    /// Produce a binary edge mask (255 = edge)
    fn detect_edges(&self, plane: &GrayImage) -> GrayImage;
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Extract closed boundaries of the foreground regions of a binary mask
    fn extract_contours(&self, mask: &GrayImage) -> Vec<Contour>;
}

/// Trait for polygon simplification
pub trait PolygonApproximator: Send + Sync {
    /// Reduce a closed contour to a polygon whose deviation from the
    /// contour stays within `epsilon_ratio` times the contour perimeter
    fn approximate(&self, contour: &[Point], epsilon_ratio: f64) -> Vec<Point>;
}

/// Trait for polygon convexity predicates
pub trait ConvexityTest: Send + Sync {
    fn is_convex(&self, polygon: &[Point]) -> bool;
}

/// Trait for overlay destinations
pub trait OverlaySink {
    /// Present a rendered overlay for the image identified by `name`
    fn present(&mut self, name: &str, overlay: &RgbImage) -> Result<()>;
}
