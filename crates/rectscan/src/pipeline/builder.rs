use crate::{
    algorithms::{
        CannyEdgeDetector, DouglasPeuckerApproximator, GeoConvexity, ImageprocContourExtractor,
        MedianDenoiser,
    },
    config::DetectorConfig,
    error::Result,
    pipeline::Detector,
    traits::{ContourExtractor, ConvexityTest, Denoiser, EdgeDetector, PolygonApproximator},
};

/// Builder for creating detectors with a fluent API
#[derive(Default)]
pub struct DetectorBuilder {
    config: DetectorConfig,
    denoiser: Option<Box<dyn Denoiser>>,
    edge_detector: Option<Box<dyn EdgeDetector>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    approximator: Option<Box<dyn PolygonApproximator>>,
    convexity: Option<Box<dyn ConvexityTest>>,
}

impl DetectorBuilder {
    /// Create a new detector builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given configuration (replaces any existing one)
    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the number of threshold levels
    pub fn with_threshold_levels(mut self, levels: u32) -> Self {
        self.config.threshold_levels = levels;
        self
    }

    /// Set the denoiser (replaces the median filter)
    pub fn set_denoiser<D>(mut self, denoiser: D) -> Self
    where
        D: Denoiser + 'static,
    {
        self.denoiser = Some(Box::new(denoiser));
        self
    }

    /// Set the edge detector used for the edge level
    pub fn set_edge_detector<E>(mut self, detector: E) -> Self
    where
        E: EdgeDetector + 'static,
    {
        self.edge_detector = Some(Box::new(detector));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<C>(mut self, extractor: C) -> Self
    where
        C: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Set the polygon approximator (replaces any existing one)
    pub fn set_approximator<A>(mut self, approximator: A) -> Self
    where
        A: PolygonApproximator + 'static,
    {
        self.approximator = Some(Box::new(approximator));
        self
    }

    /// Set the convexity predicate (replaces any existing one)
    pub fn set_convexity_test<T>(mut self, test: T) -> Self
    where
        T: ConvexityTest + 'static,
    {
        self.convexity = Some(Box::new(test));
        self
    }

    /// Validate the configuration and build, filling unset components
    /// from the configuration
    pub fn build(self) -> Result<Detector> {
        self.config.validate()?;
        let config = self.config;

        let denoiser = self.denoiser.unwrap_or_else(|| {
            Box::new(MedianDenoiser { window: config.median_window })
        });
        let edge_detector = self.edge_detector.unwrap_or_else(|| {
            Box::new(CannyEdgeDetector {
                low_threshold: config.canny_low,
                high_threshold: config.canny_high,
                dilation_radius: config.dilation_radius,
            })
        });
        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ImageprocContourExtractor));
        let approximator = self.approximator
            .unwrap_or_else(|| Box::new(DouglasPeuckerApproximator));
        let convexity = self.convexity
            .unwrap_or_else(|| Box::new(GeoConvexity));

        Ok(Detector::new(
            config,
            denoiser,
            edge_detector,
            contour_extractor,
            approximator,
            convexity,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::RectError, types::ThresholdLevel};

    #[test]
    fn test_default_build() {
        let detector = DetectorBuilder::new().build().expect("Should build");
        assert_eq!(detector.levels().len(), 2);
        assert_eq!(detector.config(), &DetectorConfig::default());
    }

    #[test]
    fn test_level_override() {
        let detector = DetectorBuilder::new()
            .with_threshold_levels(3)
            .build()
            .expect("Should build");
        assert_eq!(
            detector.levels(),
            &[
                ThresholdLevel::Edge,
                ThresholdLevel::Intensity { cut: 170 },
                ThresholdLevel::Intensity { cut: 255 },
            ]
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = DetectorBuilder::new()
            .with_config(DetectorConfig { median_window: 4, ..Default::default() })
            .build();
        assert!(matches!(result, Err(RectError::InvalidConfig(_))));
    }
}
