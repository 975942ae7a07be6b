//! Experience curve
//!
//! Pure mapping from level to the XP required for the next one.
//! Coefficients come from configuration; callers never pass a negative
//! level.

use crate::data::XpCurveDef;

/// XP required to advance from `level` to `level + 1`.
///
/// `base + level * multiplier + exponent * level²`. Monotonically
/// non-decreasing for any non-negative coefficients, which config
/// validation guarantees.
pub fn xp_for_level(curve: &XpCurveDef, level: u32) -> f64 {
    let l = level as f64;
    curve.base + l * curve.multiplier + curve.exponent * l * l
}

/// Total XP from level 0 up to (not including) `level`.
pub fn total_xp_for_level(curve: &XpCurveDef, level: u32) -> f64 {
    (0..level).map(|l| xp_for_level(curve, l)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_curve() -> XpCurveDef {
        XpCurveDef::default()
    }

    #[test]
    fn test_xp_for_level() {
        let curve = default_curve();
        assert_eq!(xp_for_level(&curve, 0), 60.0);
        assert_eq!(xp_for_level(&curve, 1), 77.0); // 60 + 15 + 2
        assert_eq!(xp_for_level(&curve, 10), 410.0); // 60 + 150 + 200
    }

    #[test]
    fn test_curve_is_strictly_increasing() {
        let curve = default_curve();
        for level in 0..200 {
            assert!(
                xp_for_level(&curve, level + 1) > xp_for_level(&curve, level),
                "curve not increasing at level {}",
                level
            );
        }
    }

    #[test]
    fn test_total_xp_accumulates() {
        let curve = default_curve();
        assert_eq!(total_xp_for_level(&curve, 0), 0.0);
        assert_eq!(total_xp_for_level(&curve, 1), 60.0);
        assert_eq!(total_xp_for_level(&curve, 2), 137.0);
    }
}
