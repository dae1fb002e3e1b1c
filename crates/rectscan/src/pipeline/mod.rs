pub mod builder;

use image::{GrayImage, RgbImage};
use strum::IntoEnumIterator;
use tracing::debug;

use crate::{
    accumulator::RectangleAccumulator,
    algorithms::{extract_channel_plane, generate_mask, GeometricFilter},
    config::DetectorConfig,
    traits::{ContourExtractor, ConvexityTest, Denoiser, EdgeDetector, PolygonApproximator},
    types::{Channel, Quad, ThresholdLevel},
};

/// Multi-pass rectangle search over every channel and threshold level
pub struct Detector {
    config: DetectorConfig,
    levels: Vec<ThresholdLevel>,
    denoiser: Box<dyn Denoiser>,
    edge_detector: Box<dyn EdgeDetector>,
    contour_extractor: Box<dyn ContourExtractor>,
    approximator: Box<dyn PolygonApproximator>,
    convexity: Box<dyn ConvexityTest>,
    filter: GeometricFilter,
}

impl Detector {
    /// Create a new detector builder
    pub fn builder() -> builder::DetectorBuilder {
        builder::DetectorBuilder::new()
    }

    pub(crate) fn new(
        config: DetectorConfig,
        denoiser: Box<dyn Denoiser>,
        edge_detector: Box<dyn EdgeDetector>,
        contour_extractor: Box<dyn ContourExtractor>,
        approximator: Box<dyn PolygonApproximator>,
        convexity: Box<dyn ConvexityTest>,
    ) -> Self {
        let filter = GeometricFilter {
            min_area: config.min_area,
            max_cosine: config.max_cosine,
        };
        Self {
            levels: ThresholdLevel::sequence(config.threshold_levels),
            config,
            denoiser,
            edge_detector,
            contour_extractor,
            approximator,
            convexity,
            filter,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Threshold levels in scan order
    pub fn levels(&self) -> &[ThresholdLevel] {
        &self.levels
    }

    /// Rectangles found in a single image
    pub fn detect(&self, image: &RgbImage) -> Vec<Quad> {
        let mut accumulator = RectangleAccumulator::new();
        self.detect_into(image, &mut accumulator);
        accumulator.candidates().to_vec()
    }

    /// Append every rectangle found in `image` to `accumulator`.
    /// Returns how many were added.
    pub fn detect_into(&self, image: &RgbImage, accumulator: &mut RectangleAccumulator) -> usize {
        if image.width() == 0 || image.height() == 0 {
            return 0;
        }

        let denoised = self.denoiser.denoise(image);
        let mut accepted = 0;

        for channel in Channel::iter() {
            let plane = extract_channel_plane(&denoised, channel);
            for &level in &self.levels {
                let found = self.scan_level(&plane, level, accumulator);
                debug!(%channel, %level, found, "scanned threshold level");
                accepted += found;
            }
        }

        accepted
    }

    fn scan_level(&self, plane: &GrayImage, level: ThresholdLevel, accumulator: &mut RectangleAccumulator) -> usize {
        let mask = generate_mask(plane, level, self.edge_detector.as_ref());
        let contours = self.contour_extractor.extract_contours(&mask);

        let mut found = 0;
        for contour in &contours {
            let polygon = self.approximator.approximate(contour, self.config.approx_epsilon_ratio);
            if let Some(quad) = self.filter.accept(&polygon, self.convexity.as_ref()) {
                accumulator.accept(quad);
                found += 1;
            }
        }
        found
    }

    /// Get information about the detector configuration
    pub fn info(&self) -> String {
        let levels: Vec<String> = self.levels.iter().map(ToString::to_string).collect();
        format!(
            "Detector: median {}px, levels [{}], area > {}, corner cosine < {}",
            self.config.median_window,
            levels.join(", "),
            self.config.min_area,
            self.config.max_cosine
        )
    }
}
