//! # Pure pursuit geometry helpers

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Squared segment lengths below this are treated as degenerate.
const MIN_SEGMENT_LENGTH_SQ: f64 = 1e-6;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Intersect the lookahead circle with a path segment.
///
/// Solves the quadratic in the segment parameter `t` and returns the root in
/// `[0, 1]` furthest along the segment, or `None` when the circle misses the
/// segment or the segment is degenerate.
pub fn circle_segment_intersection(
    seg_start: Vector2<f64>,
    seg_end: Vector2<f64>,
    center: Vector2<f64>,
    radius: f64,
) -> Option<f64> {
    let d = seg_end - seg_start;
    let f = seg_start - center;

    // Quadratic coefficients of |f + t*d|² = r²
    let a = d.dot(&d);
    let b = 2.0 * f.dot(&d);
    let c = f.dot(&f) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 || a < MIN_SEGMENT_LENGTH_SQ {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    // Prefer the root furthest along the path
    if (0.0..=1.0).contains(&t2) {
        Some(t2)
    } else if (0.0..=1.0).contains(&t1) {
        Some(t1)
    } else {
        None
    }
}

/// Point on a segment at parameter `t`.
pub fn point_on_segment(seg_start: Vector2<f64>, seg_end: Vector2<f64>, t: f64) -> Vector2<f64> {
    seg_start + (seg_end - seg_start) * t
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_crossing_segment_prefers_far_root() {
        // Circle of radius 50 centred at the origin, segment crossing it
        // fully along the x axis
        let t = circle_segment_intersection(
            Vector2::new(-100.0, 0.0),
            Vector2::new(100.0, 0.0),
            Vector2::new(0.0, 0.0),
            50.0,
        )
        .unwrap();

        // Roots are at x = -50 (t = 0.25) and x = +50 (t = 0.75)
        assert!((t - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_entering_segment_single_root() {
        // Segment starting inside the circle, only the exit point lies on it
        let t = circle_segment_intersection(
            Vector2::new(0.0, 0.0),
            Vector2::new(100.0, 0.0),
            Vector2::new(0.0, 0.0),
            50.0,
        )
        .unwrap();

        assert!((t - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_miss_returns_none() {
        let t = circle_segment_intersection(
            Vector2::new(-100.0, 200.0),
            Vector2::new(100.0, 200.0),
            Vector2::new(0.0, 0.0),
            50.0,
        );

        assert!(t.is_none());
    }

    #[test]
    fn test_segment_beyond_circle_returns_none() {
        // Both roots lie behind the segment start
        let t = circle_segment_intersection(
            Vector2::new(200.0, 0.0),
            Vector2::new(400.0, 0.0),
            Vector2::new(0.0, 0.0),
            50.0,
        );

        assert!(t.is_none());
    }

    #[test]
    fn test_degenerate_segment_returns_none() {
        let t = circle_segment_intersection(
            Vector2::new(10.0, 10.0),
            Vector2::new(10.0, 10.0),
            Vector2::new(0.0, 0.0),
            50.0,
        );

        assert!(t.is_none());
    }

    #[test]
    fn test_point_on_segment() {
        let p = point_on_segment(Vector2::new(0.0, 0.0), Vector2::new(100.0, 50.0), 0.5);

        assert!((p[0] - 50.0).abs() < 1e-9);
        assert!((p[1] - 25.0).abs() < 1e-9);
    }
}
