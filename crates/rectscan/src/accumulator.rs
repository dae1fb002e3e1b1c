use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{error::Result, types::Quad};

/// Lifetime of the candidate list across a batch
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccumulatorScope {
    /// One list for the whole run; every report includes earlier images
    #[default]
    Run,
    /// Cleared before each image
    Image,
}

/// Append-only list of accepted rectangles, in detection order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectangleAccumulator {
    candidates: Vec<Quad>,
    images: usize,
}

impl RectangleAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, candidate: Quad) {
        self.candidates.push(candidate);
    }

    /// Called once per image that reached the pipeline
    pub fn begin_image(&mut self, scope: AccumulatorScope) {
        if scope == AccumulatorScope::Image {
            self.clear();
        }
        self.images += 1;
    }

    /// Drop all candidates. Only the per-image scope uses this.
    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    pub fn candidates(&self) -> &[Quad] {
        &self.candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quad> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of images processed into this accumulator
    pub fn image_count(&self) -> usize {
        self.images
    }

    /// Compact JSON report: `[[{"x":..,"y":..},...],...]` with no whitespace
    pub fn report(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.candidates)?)
    }
}
