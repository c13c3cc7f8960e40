//! Scalar to color mapping

use serde::{Deserialize, Serialize};

/// Color used for NaN scalars
const NAN_COLOR: [f32; 3] = [0.5, 0.0, 0.0];

/// A table of colors built by linear interpolation in HSV space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupTable {
    colors: Vec<[f32; 3]>,
    range: (f64, f64),
}

impl LookupTable {
    /// Build a table of `size` entries sweeping `hue_range` at constant
    /// saturation and value
    pub fn from_hue_range(hue_range: (f32, f32), saturation: f32, value: f32, size: usize) -> Self {
        let size = size.max(1);
        let colors = (0..size)
            .map(|i| {
                let t = if size == 1 { 0.0 } else { i as f32 / (size - 1) as f32 };
                let hue = hue_range.0 + (hue_range.1 - hue_range.0) * t;
                hsv_to_rgb(hue, saturation, value)
            })
            .collect();
        Self { colors, range: (0.0, 1.0) }
    }

    /// The blue to red rainbow used for scalar coloring
    pub fn rainbow() -> Self {
        Self::from_hue_range((0.6667, 0.0), 1.0, 1.0, 256)
    }

    /// Set the scalar range mapped onto the first and last entries
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Map a scalar to RGB; values outside the range clamp to the ends
    pub fn map(&self, value: f64) -> [f32; 3] {
        if value.is_nan() {
            return NAN_COLOR;
        }
        let (lo, hi) = self.range;
        let n = self.colors.len();
        let index = if hi > lo {
            let t = (value - lo) / (hi - lo);
            ((t * n as f64).floor().max(0.0) as usize).min(n - 1)
        } else {
            0
        };
        self.colors[index]
    }
}

impl Default for LookupTable {
    fn default() -> Self {
        Self::rainbow()
    }
}

/// Convert HSV with all components in `[0, 1]` to RGB
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [f32; 3] {
    let h = (hue.rem_euclid(1.0)) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));
    match sector as u32 {
        0 => [value, t, p],
        1 => [q, value, p],
        2 => [p, value, t],
        3 => [p, q, value],
        4 => [t, p, value],
        _ => [value, p, q],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rainbow_ends() {
        let lut = LookupTable::rainbow().with_range((0.0, 10.0));
        assert_eq!(lut.len(), 256);

        let low = lut.map(0.0);
        assert_relative_eq!(low[0], 0.0, epsilon = 1e-3);
        assert_relative_eq!(low[2], 1.0, epsilon = 1e-3);

        let high = lut.map(10.0);
        assert_eq!(high, [1.0, 0.0, 0.0]);
        assert_eq!(lut.map(-5.0), low);
        assert_eq!(lut.map(50.0), high);
    }

    #[test]
    fn test_degenerate_range_and_nan() {
        let lut = LookupTable::rainbow().with_range((3.0, 3.0));
        assert_eq!(lut.map(3.0), lut.map(100.0));
        assert_eq!(lut.map(f64::NAN), NAN_COLOR);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [1.0, 0.0, 0.0]);
        let green = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert_relative_eq!(green[1], 1.0, epsilon = 1e-5);
        assert_relative_eq!(green[0], 0.0, epsilon = 1e-5);
        assert_eq!(hsv_to_rgb(0.5, 0.0, 0.25), [0.25, 0.25, 0.25]);
    }
}
