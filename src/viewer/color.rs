//! B-factor (pLDDT) spectrum coloring.
//!
//! A [`ColorRamp`] maps a normalized value to a color by linear interpolation
//! between evenly spaced stops. Values outside the configured range clamp to
//! the end stops.

use super::style::ColorScheme;

/// Neutral gray used when a ramp has no stops.
const FALLBACK: [f32; 3] = [0.6, 0.6, 0.6];

/// A color ramp defined by N evenly-spaced color stops.
/// `t = 0` maps to the first color, `t = 1` maps to the last.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<[f32; 3]>,
}

impl ColorRamp {
    /// Ramp through `stops` in order.
    #[must_use]
    pub fn new(stops: Vec<[f32; 3]>) -> Self {
        Self { stops }
    }

    /// Interpolate the ramp at position `t` in [0, 1].
    #[must_use]
    pub fn sample(&self, t: f32) -> [f32; 3] {
        match self.stops.as_slice() {
            [] => FALLBACK,
            [only] => *only,
            stops => {
                let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
                let n = stops.len() - 1;
                let scaled = t * n as f32;
                let idx = (scaled as usize).min(n - 1);
                let frac = scaled - idx as f32;

                let a = &stops[idx];
                let b = &stops[idx + 1];
                [
                    a[0] + (b[0] - a[0]) * frac,
                    a[1] + (b[1] - a[1]) * frac,
                    a[2] + (b[2] - a[2]) * frac,
                ]
            }
        }
    }

    /// Map `value` from `[min, max]` onto the ramp. A degenerate range
    /// samples the midpoint.
    #[must_use]
    pub fn sample_range(&self, value: f32, min: f32, max: f32) -> [f32; 3] {
        let range = max - min;
        let t = if range.abs() < 1e-6 {
            0.5
        } else {
            (value - min) / range
        };
        self.sample(t)
    }
}

impl Default for ColorRamp {
    /// Red → Orange → Yellow → Green → Blue, low to high confidence.
    fn default() -> Self {
        Self {
            stops: vec![
                [1.0, 0.0, 0.0],
                [1.0, 0.5, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 0.8, 0.0],
                [0.0, 0.0, 1.0],
            ],
        }
    }
}

/// Color for an atom with B-factor `b_factor` under `scheme`.
#[must_use]
pub fn scheme_color(scheme: &ColorScheme, b_factor: f32) -> [f32; 3] {
    match scheme {
        ColorScheme::Uniform(rgb) => *rgb,
        ColorScheme::BFactorSpectrum { min, max, gradient } => {
            ColorRamp::new(gradient.clone()).sample_range(b_factor, *min, *max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_and_midpoints() {
        let ramp = ColorRamp::default();
        assert_eq!(ramp.sample(0.0), [1.0, 0.0, 0.0]);
        assert_eq!(ramp.sample(1.0), [0.0, 0.0, 1.0]);
        assert_eq!(ramp.sample(0.5), [1.0, 1.0, 0.0]);
        let between = ramp.sample(0.125);
        assert!((between[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn range_clamps_outside_values() {
        let ramp = ColorRamp::default();
        assert_eq!(ramp.sample_range(20.0, 50.0, 90.0), [1.0, 0.0, 0.0]);
        assert_eq!(ramp.sample_range(95.0, 50.0, 90.0), [0.0, 0.0, 1.0]);
        assert_eq!(ramp.sample_range(70.0, 50.0, 90.0), [1.0, 1.0, 0.0]);
    }

    #[test]
    fn short_ramps_do_not_panic() {
        assert_eq!(ColorRamp::new(Vec::new()).sample(0.3), FALLBACK);
        assert_eq!(ColorRamp::new(vec![[0.2, 0.3, 0.4]]).sample(0.9), [0.2, 0.3, 0.4]);
        assert_eq!(ColorRamp::default().sample(f32::NAN), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn scheme_colors() {
        let spectrum = ColorScheme::BFactorSpectrum {
            min: 50.0,
            max: 90.0,
            gradient: vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
        };
        assert_eq!(scheme_color(&spectrum, 70.0), [0.5, 0.5, 0.5]);
        assert_eq!(scheme_color(&ColorScheme::Uniform([0.1, 0.2, 0.3]), 5.0), [0.1, 0.2, 0.3]);
    }
}
