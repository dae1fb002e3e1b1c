//! # Rectangle Detection Library
//!
//! Finds roughly rectangular, convex quadrilaterals in raster images such as
//! photographs of paper sheets, cards or screens.
//!
//! ## Core Features
//!
//! - **Multi-pass Search**: Every color channel is scanned at several threshold
//!   levels, starting with a Canny edge pass
//! - **Trait-based Stages**: Denoising, edge detection, contour extraction,
//!   polygon approximation and convexity testing can each be swapped out
//! - **Batch Reports**: Accepted rectangles accumulate across a batch and are
//!   reported as compact JSON
//! - **Paper Identification**: Picks the largest white-cornered candidate and
//!   flattens it with a perspective warp
//! - **GeoJSON Export**: Save candidates as polygon features
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rectscan::{Detector, RectangleAccumulator};
//!
//! let detector = Detector::builder().build()?;
//!
//! let image = image::open("photo.jpg")?.to_rgb8();
//! let mut accumulator = RectangleAccumulator::new();
//! detector.detect_into(&image, &mut accumulator);
//!
//! println!("{}", accumulator.report()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Detector
//!
//! ```rust,no_run
//! use rectscan::{Detector, DetectorConfig, algorithms::*};
//!
//! let detector = Detector::builder()
//!     .with_config(DetectorConfig { min_area: 400.0, ..Default::default() })
//!     .with_threshold_levels(4)
//!     .set_denoiser(MedianDenoiser { window: 5 })
//!     .build()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod accumulator;
pub mod config;
pub mod overlay;
pub mod paper;
pub mod batch;
pub mod io;

// Re-exports for convenience
pub use error::{RectError, Result};
pub use types::{Channel, Contour, Point, Quad, ThresholdLevel};
pub use traits::*;
pub use pipeline::{Detector, builder::DetectorBuilder};
pub use accumulator::{AccumulatorScope, RectangleAccumulator};
pub use config::{DetectorConfig, OverlayStyle, RectifiedSize, WhiteDefinition};
pub use overlay::{FileOverlaySink, OverlayRenderer};
pub use paper::{identify_paper_corners, rectify_paper};
pub use batch::{BatchScanner, BatchSummary};
