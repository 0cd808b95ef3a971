//! Angle-based polyline reduction for refined paths.
//!
//! The refinement search still emits cell-level points along mixed
//! terrain. This pass drops interior points whose removal does not
//! change the path's shape: short segments with shallow or repeated
//! same-direction turns vanish, while long segments and alternating
//! turns are preserved.

use crate::geometry::{euclidean, GridPoint};

/// Simplification thresholds.
#[derive(Clone, Debug)]
pub struct SimplifyConfig {
    /// Turn angle below which a point is considered collinear, degrees.
    pub angle_threshold_deg: f64,
    /// Segment length above which a point is always retained.
    pub distance_threshold: f64,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            angle_threshold_deg: 10.0,
            distance_threshold: 5.0,
        }
    }
}

/// Signed turning angle between two direction vectors, in degrees,
/// wrapped to [-180, 180].
fn signed_angle_deg(v1: (f64, f64), v2: (f64, f64)) -> f64 {
    let angle = (v2.1.atan2(v2.0) - v1.1.atan2(v1.0)).to_degrees();
    if angle > 180.0 {
        angle - 360.0
    } else if angle < -180.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Total Euclidean length of a polyline.
pub fn path_length(path: &[GridPoint]) -> f64 {
    path.windows(2).map(|w| euclidean(w[0], w[1])).sum()
}

/// Reduce a refined path by turn angle and segment length.
///
/// Endpoints are always retained. An interior point survives when
/// either adjacent segment exceeds `distance_threshold`, or its turn
/// angle reaches `angle_threshold_deg` with a rotation sign different
/// from the last retained turn. Same-direction micro-turns are dropped.
/// Zero-length segments are skipped without touching the sign tracking.
pub fn simplify_by_angle(
    path: &[GridPoint],
    angle_threshold_deg: f64,
    distance_threshold: f64,
) -> Vec<GridPoint> {
    if path.len() < 3 {
        return path.to_vec();
    }

    let mut simplified = vec![path[0]];
    let mut last_turn_sign: Option<i8> = None;

    for i in 1..path.len() - 1 {
        let v1 = (
            (path[i].x - path[i - 1].x) as f64,
            (path[i].y - path[i - 1].y) as f64,
        );
        let v2 = (
            (path[i + 1].x - path[i].x) as f64,
            (path[i + 1].y - path[i].y) as f64,
        );

        let mag1 = v1.0.hypot(v1.1);
        let mag2 = v2.0.hypot(v2.1);
        if mag1 == 0.0 || mag2 == 0.0 {
            continue;
        }

        let angle = signed_angle_deg(v1, v2);
        let sharp = angle.abs() >= angle_threshold_deg;
        let sign = if angle >= 0.0 { 1i8 } else { -1i8 };

        if mag1 > distance_threshold || mag2 > distance_threshold {
            simplified.push(path[i]);
            if sharp {
                last_turn_sign = Some(sign);
            }
        } else if sharp && last_turn_sign != Some(sign) {
            simplified.push(path[i]);
            last_turn_sign = Some(sign);
        }
    }

    simplified.push(*path.last().unwrap());
    simplified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_path_unchanged() {
        let path = vec![GridPoint::new(0, 0), GridPoint::new(3, 3)];
        assert_eq!(simplify_by_angle(&path, 10.0, 5.0), path);
    }

    #[test]
    fn test_collinear_interior_dropped() {
        let path: Vec<GridPoint> = (0..5).map(|i| GridPoint::new(i, 0)).collect();
        let simplified = simplify_by_angle(&path, 10.0, 5.0);
        assert_eq!(simplified, vec![GridPoint::new(0, 0), GridPoint::new(4, 0)]);
    }

    #[test]
    fn test_long_segment_retains_point() {
        let path = vec![
            GridPoint::new(0, 0),
            GridPoint::new(20, 0),
            GridPoint::new(40, 1),
        ];
        let simplified = simplify_by_angle(&path, 10.0, 5.0);
        assert!(simplified.contains(&GridPoint::new(20, 0)));
    }

    #[test]
    fn test_alternating_micro_turns_retained() {
        // Short zig-zag segments: above the angle threshold, below the
        // distance threshold, alternating sign.
        let path = vec![
            GridPoint::new(0, 0),
            GridPoint::new(2, 1),
            GridPoint::new(4, 0),
            GridPoint::new(6, 1),
            GridPoint::new(8, 0),
        ];
        let simplified = simplify_by_angle(&path, 10.0, 5.0);
        assert!(simplified.len() > 2);
    }

    #[test]
    fn test_same_direction_micro_turns_dropped() {
        // Gentle same-direction arc with short segments
        let path = vec![
            GridPoint::new(0, 0),
            GridPoint::new(3, 1),
            GridPoint::new(5, 3),
            GridPoint::new(6, 6),
        ];
        let simplified = simplify_by_angle(&path, 10.0, 5.0);
        // First arc point sets the sign; later same-sign turns drop
        assert!(simplified.len() < path.len());
        assert_eq!(*simplified.first().unwrap(), GridPoint::new(0, 0));
        assert_eq!(*simplified.last().unwrap(), GridPoint::new(6, 6));
    }

    #[test]
    fn test_duplicate_points_skipped() {
        let path = vec![
            GridPoint::new(0, 0),
            GridPoint::new(1, 0),
            GridPoint::new(1, 0),
            GridPoint::new(2, 0),
            GridPoint::new(3, 0),
        ];
        let simplified = simplify_by_angle(&path, 10.0, 5.0);
        assert_eq!(*simplified.first().unwrap(), GridPoint::new(0, 0));
        assert_eq!(*simplified.last().unwrap(), GridPoint::new(3, 0));
    }

    #[test]
    fn test_signed_angle_wraps() {
        assert!((signed_angle_deg((1.0, 0.0), (0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((signed_angle_deg((1.0, 0.0), (0.0, -1.0)) + 90.0).abs() < 1e-9);
        assert!(signed_angle_deg((1.0, 0.0), (-1.0, 0.0)).abs() - 180.0 < 1e-9);
    }
}
