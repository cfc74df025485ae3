//! Zoom level and windowing of a payoff view

use crate::merge::PayoffView;

const MIN_ZOOM: f64 = 1.0;
const MAX_ZOOM: f64 = 4.0;
const ZOOM_STEP: f64 = 0.5;

/// Zoom factor, kept within 1.0–4.0 in 0.5 steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLevel(f64);

impl ZoomLevel {
    /// Clamp and snap `level` to the nearest step
    pub fn new(level: f64) -> Self {
        if !level.is_finite() {
            return Self(MIN_ZOOM);
        }
        let snapped = (level / ZOOM_STEP).round() * ZOOM_STEP;
        Self(snapped.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn zoom_in(&self) -> Self {
        Self::new(self.0 + ZOOM_STEP)
    }

    pub fn zoom_out(&self) -> Self {
        Self::new(self.0 - ZOOM_STEP)
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(MIN_ZOOM)
    }
}

impl std::fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}x", self.0)
    }
}

impl PayoffView {
    /// Centered window of `ceil(len / level)` rows
    pub fn zoomed(&self, level: ZoomLevel) -> PayoffView {
        let len = self.rows.len();
        if len == 0 || level.value() <= MIN_ZOOM {
            return self.clone();
        }

        let keep = ((len as f64 / level.value()).ceil() as usize).clamp(1, len);
        let start = (len - keep) / 2;

        PayoffView {
            columns: self.columns.clone(),
            rows: self.rows[start..start + keep].to_vec(),
            construction_price: self.construction_price,
            asset: self.asset.clone(),
        }
    }
}
