//! Base-pair to pixel projection of the visible window

use crate::error::FerroError;
use serde::{Deserialize, Serialize};

/// The visible genomic window `start..=end` drawn across `width` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawViewport")]
pub struct Viewport {
    pub start_index: u64,
    pub end_index: u64,
    pub width: f64,
}

/// Unchecked wire form; deserialized viewports go through [`Viewport::new`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawViewport {
    start_index: u64,
    end_index: u64,
    width: f64,
}

impl TryFrom<RawViewport> for Viewport {
    type Error = FerroError;

    fn try_from(raw: RawViewport) -> Result<Self, Self::Error> {
        Viewport::new(raw.start_index, raw.end_index, raw.width)
    }
}

impl Viewport {
    pub fn new(start_index: u64, end_index: u64, width: f64) -> Result<Self, FerroError> {
        if end_index < start_index {
            return Err(FerroError::InvalidViewport {
                msg: format!("end {} is before start {}", end_index, start_index),
            });
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(FerroError::InvalidViewport {
                msg: format!("width must be a positive number of pixels, got {}", width),
            });
        }
        Ok(Self {
            start_index,
            end_index,
            width,
        })
    }

    /// Visible base pairs
    pub fn length(&self) -> u64 {
        self.end_index - self.start_index + 1
    }

    /// Pixels per base pair
    pub fn factor(&self) -> f64 {
        self.width / self.length() as f64
    }

    pub fn bp_to_px(&self, bp: f64) -> f64 {
        bp * self.factor()
    }

    pub fn px_to_bp(&self, px: f64) -> f64 {
        px / self.factor()
    }

    /// Pixel offset of a genomic position from the left edge
    pub fn project(&self, position: u64) -> f64 {
        self.bp_to_px(position as f64 - self.start_index as f64)
    }
}
