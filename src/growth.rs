//! Bounded power-law growth curve shared by the private and public tracks

/// Value of a bounded power-law curve at time `t`.
///
/// `t <= 0` is always zero, otherwise `min(cap, base * t^exponent)` floored at
/// zero. With a non-negative exponent the curve is non-decreasing in `t` and
/// never exceeds `cap`.
pub fn bounded_growth(base: f64, exponent: f64, cap: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    (base * t.powf(exponent)).min(cap).max(0.0)
}

/// Curve base that makes `bounded_growth` reach `target` exactly at `target_year`
pub fn base_for_target(target: f64, exponent: f64, target_year: f64) -> f64 {
    if target_year <= 0.0 {
        return target;
    }
    target / target_year.powf(exponent)
}

/// Bounded growth rounded to a whole count
pub fn bounded_count(base: f64, exponent: f64, cap: f64, t: f64) -> u64 {
    bounded_growth(base, exponent, cap, t).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_year_zero_is_zero() {
        assert_eq!(bounded_growth(100.0, 1.8, 1_000.0, 0.0), 0.0);
        // 0^0 would be 1 without the explicit guard
        assert_eq!(bounded_growth(100.0, 0.0, 1_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_capped_at_target() {
        assert_eq!(bounded_growth(80_000.0, 1.8, 5_000_000.0, 10.0), 5_000_000.0);
        assert_eq!(bounded_growth(80_000.0, 1.8, 5_000_000.0, 40.0), 5_000_000.0);
    }

    #[test]
    fn test_power_law_below_cap() {
        let v = bounded_growth(10.0, 1.5, 1_000.0, 4.0);
        assert_relative_eq!(v, 80.0, epsilon = 1e-9);
    }

    #[test]
    fn test_base_for_target_hits_target() {
        let base = base_for_target(60.0, 1.5, 10.0);
        assert_relative_eq!(bounded_growth(base, 1.5, 60.0, 10.0), 60.0, epsilon = 1e-9);
        assert!(bounded_growth(base, 1.5, 60.0, 9.0) < 60.0);
    }

    #[test]
    fn test_monotonic() {
        let base = base_for_target(20_000.0, 2.0, 10.0);
        let mut last = 0.0;
        for t in 0..=15 {
            let v = bounded_growth(base, 2.0, 20_000.0, t as f64);
            assert!(v >= last);
            last = v;
        }
    }
}
