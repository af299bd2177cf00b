//! Terminal visualization using braille graphics
//!
//! Renders histogram bars on a Unicode braille canvas for inline display in
//! a terminal session.

use drawille::Canvas;

use crate::core::histogram::Histogram;

/// Render a histogram as a braille canvas.
///
/// Each bin becomes a vertical bar scaled against the tallest bin; the
/// bottom row is the axis baseline.
pub fn render_histogram(hist: &Histogram, width: u32, height: u32) -> String {
    let mut canvas = Canvas::new(width, height);
    let bins = hist.normalized.len() as u32;
    let bar_width = (width / bins.max(1)).max(1);

    for (i, &level) in hist.normalized.iter().enumerate() {
        let x0 = i as u32 * bar_width;
        let bar_height = (level * f64::from(height - 1)).round() as u32;
        for x in x0..(x0 + bar_width).min(width) {
            for y in 0..=bar_height {
                canvas.set(x, height - 1 - y);
            }
        }
    }

    // Axis baseline across the full drawn extent
    for x in 0..(bins * bar_width).min(width) {
        canvas.set(x, height - 1);
    }

    canvas.frame()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::histogram;

    #[test]
    fn test_render_produces_braille_output() {
        let samples: Vec<f64> = (0..200).map(|i| ((i % 40) as f64).sin()).collect();
        let hist = histogram::build(&samples, 20, None, None).unwrap();
        let output = render_histogram(&hist, 80, 24);

        assert!(!output.is_empty());
        assert!(output
            .chars()
            .any(|c| (0x2800..=0x28FF).contains(&(c as u32))));
    }

    #[test]
    fn test_render_handles_single_bar() {
        let hist = histogram::build(&[1.0, 2.0], 1, None, None).unwrap();
        let output = render_histogram(&hist, 10, 8);
        assert!(!output.is_empty());
    }
}
