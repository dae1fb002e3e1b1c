use std::{io::Write, path::Path};

use image::RgbImage;
use tracing::{info, warn};

use crate::{
    accumulator::{AccumulatorScope, RectangleAccumulator},
    error::Result,
    overlay::OverlayRenderer,
    paper::{identify_paper_corners, rectify_paper},
    pipeline::Detector,
    traits::OverlaySink,
    types::Quad,
};

/// Counts for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub unreadable: usize,
    pub candidates: usize,
}

/// Runs the detector over an ordered list of image files and writes
/// one report per input
pub struct BatchScanner {
    detector: Detector,
    accumulator: RectangleAccumulator,
    renderer: OverlayRenderer,
    sink: Option<Box<dyn OverlaySink>>,
    rectified_sink: Option<Box<dyn OverlaySink>>,
    find_paper: bool,
    last_paper: Option<Quad>,
}

impl BatchScanner {
    pub fn new(detector: Detector) -> Self {
        let renderer = OverlayRenderer::new(detector.config().overlay.clone());
        Self {
            detector,
            accumulator: RectangleAccumulator::new(),
            renderer,
            sink: None,
            rectified_sink: None,
            find_paper: false,
            last_paper: None,
        }
    }

    /// Render an overlay for every decoded image into `sink`
    pub fn with_overlay_sink<S>(mut self, sink: S) -> Self
    where
        S: OverlaySink + 'static,
    {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Flatten the identified sheet of paper into `sink`. Turns on paper detection.
    pub fn with_rectified_sink<S>(mut self, sink: S) -> Self
    where
        S: OverlaySink + 'static,
    {
        self.rectified_sink = Some(Box::new(sink));
        self.find_paper = true;
        self
    }

    /// Look for the sheet of paper among each image's candidates
    pub fn with_paper_detection(mut self, enabled: bool) -> Self {
        self.find_paper = enabled;
        self
    }

    pub fn accumulator(&self) -> &RectangleAccumulator {
        &self.accumulator
    }

    /// Paper found in the most recently scanned image
    pub fn last_paper(&self) -> Option<&Quad> {
        self.last_paper.as_ref()
    }

    fn scope(&self) -> AccumulatorScope {
        self.detector.config().accumulator_scope
    }

    /// Run the pipeline on one decoded image. Returns how many candidates it added.
    pub fn scan_image(&mut self, name: &str, image: &RgbImage) -> usize {
        self.accumulator.begin_image(self.scope());
        let found = self.detector.detect_into(image, &mut self.accumulator);
        info!(image = name, found, total = self.accumulator.len(), "scanned image");

        self.last_paper = None;
        if self.find_paper {
            let candidates = self.accumulator.candidates();
            let own = &candidates[candidates.len() - found..];
            self.last_paper = identify_paper_corners(image, own, &self.detector.config().white);
            match &self.last_paper {
                Some(paper) => info!(image = name, corners = ?paper.vertices, "identified paper"),
                None => info!(image = name, "no paper identified"),
            }
        }

        if let (Some(paper), Some(sink)) = (self.last_paper.as_ref(), self.rectified_sink.as_mut()) {
            let size = self.detector.config().rectified;
            let presented = rectify_paper(image, paper, size.width, size.height)
                .and_then(|flat| sink.present(name, &flat));
            if let Err(e) = presented {
                warn!(image = name, error = %e, "failed to rectify paper");
            }
        }

        if let Some(sink) = self.sink.as_mut() {
            let overlay = self.renderer.render_with_paper(
                image,
                self.accumulator.candidates(),
                self.last_paper.as_ref(),
            );
            if let Err(e) = sink.present(name, &overlay) {
                warn!(image = name, error = %e, "failed to present overlay");
            }
        }

        found
    }

    /// Process `paths` in order. Unreadable files produce a diagnostic line and
    /// do not stop the batch.
    pub fn run<P, W>(&mut self, paths: &[P], out: &mut W) -> Result<BatchSummary>
    where
        P: AsRef<Path>,
        W: Write,
    {
        let mut summary = BatchSummary::default();

        for path in paths {
            let path = path.as_ref();
            let name = path.display().to_string();
            writeln!(out)?;

            match image::open(path) {
                Ok(decoded) => {
                    let image = decoded.to_rgb8();
                    self.scan_image(&name, &image);
                    summary.processed += 1;
                }
                Err(e) => {
                    warn!(image = %name, error = %e, "could not load image");
                    writeln!(out, "Couldn't load {}", name)?;
                    if self.scope() == AccumulatorScope::Image {
                        self.accumulator.clear();
                    }
                    summary.unreadable += 1;
                }
            }

            write!(out, "{}", self.accumulator.report()?)?;
        }

        writeln!(out)?;
        out.flush()?;

        summary.candidates = self.accumulator.len();
        Ok(summary)
    }
}
