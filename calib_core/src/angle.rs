//! Angle helpers. Stored and reported angles are degrees; radians only
//! appear inside trigonometric calls.

/// Normalize an angle in degrees into (−180, 180].
///
/// Uses the `atan2(sin, cos)` form so the result is continuous across the
/// ±180° seam. `atan2` can return exactly −π, which is folded onto +180.
pub fn wrap_deg(deg: f64) -> f64 {
    let rad = deg.to_radians();
    let wrapped = rad.sin().atan2(rad.cos()).to_degrees();
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Signed shortest difference `a − b` in degrees, in (−180, 180].
pub fn diff_deg(a: f64, b: f64) -> f64 {
    wrap_deg(a - b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wrap_stays_in_half_open_range() {
        let mut x = -1000.0;
        while x <= 1000.0 {
            let w = wrap_deg(x);
            assert!(w > -180.0 && w <= 180.0, "wrap({x}) = {w}");
            x += 7.3;
        }
        for x in [-540.0, -180.0, 180.0, 540.0] {
            let w = wrap_deg(x);
            assert!(w > -180.0 && w <= 180.0, "wrap({x}) = {w}");
            assert_abs_diff_eq!(w.abs(), 180.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn wrap_is_periodic() {
        for x in [-179.0, -91.5, -12.25, 0.0, 33.3, 90.0, 179.0] {
            for k in -5..=5 {
                let shifted = x + 360.0 * k as f64;
                assert_abs_diff_eq!(wrap_deg(shifted), wrap_deg(x), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn wrap_known_values() {
        assert_abs_diff_eq!(wrap_deg(270.0), -90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(wrap_deg(-270.0), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(wrap_deg(360.0), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(diff_deg(-170.0, 170.0), 20.0, epsilon = 1e-9);
    }
}
