use std::f64::consts::PI;

/// Drawing area inside an SVG viewBox, with room for axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Frame {
    pub fn inner_width(&self) -> f64 {
        (self.width - self.left - self.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.top - self.bottom).max(0.0)
    }

    pub fn baseline(&self) -> f64 {
        self.height - self.bottom
    }

    /// x of the i-th of n evenly spaced points; a single point is centered
    pub fn x_at(&self, i: usize, n: usize) -> f64 {
        if n <= 1 {
            return self.left + self.inner_width() / 2.0;
        }
        self.left + self.inner_width() * i as f64 / (n - 1) as f64
    }

    /// y of a value on a 0..=max axis
    pub fn y_for(&self, value: f64, max: f64) -> f64 {
        if max <= 0.0 || !value.is_finite() {
            return self.baseline();
        }
        self.baseline() - self.inner_height() * (value.max(0.0) / max).min(1.0)
    }
}

/// Rounds an axis maximum up to 1, 2, 2.5 or 5 times a power of ten
pub fn nice_max(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(max.log10().floor());
    let normalized = max / magnitude;
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|s| normalized <= *s)
        .unwrap_or(10.0);
    step * magnitude
}

/// `count + 1` evenly spaced tick values from 0 to `max`
pub fn ticks(max: f64, count: usize) -> Vec<f64> {
    let count = count.max(1);
    (0..=count).map(|i| max * i as f64 / count as f64).collect()
}

pub fn line_path(points: &[(f64, f64)]) -> String {
    let mut path = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        path.push_str(&format!("{}{:.2},{:.2} ", cmd, x, y));
    }
    path.trim_end().to_string()
}

/// The line closed down to the baseline
pub fn area_path(points: &[(f64, f64)], baseline: f64) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    format!(
        "{} L{:.2},{:.2} L{:.2},{:.2} Z",
        line_path(points),
        last.0,
        baseline,
        first.0,
        baseline
    )
}

/// One donut slice
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub path: String,
    /// Share of the total, 0..=1
    pub fraction: f64,
}

fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    (cx + r * angle.cos(), cy + r * angle.sin())
}

/// Slices starting at 12 o'clock, clockwise. Non-positive values get an
/// empty path so indices keep matching the input.
pub fn donut_segments(values: &[f64], cx: f64, cy: f64, inner: f64, outer: f64) -> Vec<ArcSegment> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let mut angle = -PI / 2.0;

    values
        .iter()
        .map(|value| {
            if total <= 0.0 || *value <= 0.0 {
                return ArcSegment {
                    path: String::new(),
                    fraction: 0.0,
                };
            }
            let fraction = value / total;
            // a full circle cannot be drawn as one arc
            let sweep = (fraction * 2.0 * PI).min(2.0 * PI - 1e-4);
            let start = angle;
            let end = angle + sweep;
            angle += fraction * 2.0 * PI;

            let large = if sweep > PI { 1 } else { 0 };
            let (ox1, oy1) = polar(cx, cy, outer, start);
            let (ox2, oy2) = polar(cx, cy, outer, end);
            let (ix2, iy2) = polar(cx, cy, inner, end);
            let (ix1, iy1) = polar(cx, cy, inner, start);
            let path = format!(
                "M{:.2},{:.2} A{:.2},{:.2} 0 {} 1 {:.2},{:.2} L{:.2},{:.2} A{:.2},{:.2} 0 {} 0 {:.2},{:.2} Z",
                ox1, oy1, outer, outer, large, ox2, oy2, ix2, iy2, inner, inner, large, ix1, iy1
            );
            ArcSegment { path, fraction }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame {
            width: 400.0,
            height: 200.0,
            left: 40.0,
            right: 10.0,
            top: 10.0,
            bottom: 30.0,
        }
    }

    #[test]
    fn test_nice_max() {
        assert_eq!(nice_max(0.0), 1.0);
        assert_eq!(nice_max(7.0), 10.0);
        assert_eq!(nice_max(180.0), 200.0);
        assert_eq!(nice_max(2100.0), 2500.0);
        assert_eq!(nice_max(45000.0), 50000.0);
        assert_eq!(nice_max(100.0), 100.0);
    }

    #[test]
    fn test_ticks() {
        assert_eq!(ticks(100.0, 4), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn test_frame_positions() {
        let f = frame();
        assert_eq!(f.inner_width(), 350.0);
        assert_eq!(f.x_at(0, 3), 40.0);
        assert_eq!(f.x_at(2, 3), 390.0);
        assert_eq!(f.x_at(0, 1), 215.0);
        assert_eq!(f.y_for(0.0, 100.0), 170.0);
        assert_eq!(f.y_for(100.0, 100.0), 10.0);
        assert_eq!(f.y_for(50.0, 0.0), 170.0);
    }

    #[test]
    fn test_paths() {
        let points = [(0.0, 10.0), (5.0, 20.0)];
        assert_eq!(line_path(&points), "M0.00,10.00 L5.00,20.00");
        assert_eq!(
            area_path(&points, 30.0),
            "M0.00,10.00 L5.00,20.00 L5.00,30.00 L0.00,30.00 Z"
        );
        assert_eq!(area_path(&[], 30.0), "");
    }

    #[test]
    fn test_donut_fractions() {
        let segments = donut_segments(&[1.0, 3.0, 0.0], 50.0, 50.0, 20.0, 40.0);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].fraction, 0.25);
        assert_eq!(segments[1].fraction, 0.75);
        assert!(segments[2].path.is_empty());
        // first slice starts at 12 o'clock
        assert!(segments[0].path.starts_with("M50.00,10.00"));
    }

    #[test]
    fn test_single_slice_is_drawable() {
        let segments = donut_segments(&[5.0], 50.0, 50.0, 20.0, 40.0);
        assert_eq!(segments[0].fraction, 1.0);
        assert!(segments[0].path.contains(" 0 1 1 "));
    }
}
