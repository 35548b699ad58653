// Completion percentages arrive either as a fraction of one (0.45) or already
// scaled (45). Values in (0, 1.5] are read as fractions; the threshold is kept
// as-is because the source format does not say which one a value in (1, 1.5] is.

pub const FRACTION_UPPER_BOUND: f64 = 1.5;

pub fn normalize_percentage_scale(value: f64) -> f64 {
    if value > 0.0 && value <= FRACTION_UPPER_BOUND {
        value * 100.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_is_scaled() {
        assert!((normalize_percentage_scale(0.45) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_already_scaled_is_unchanged() {
        assert_eq!(normalize_percentage_scale(45.0), 45.0);
        assert_eq!(normalize_percentage_scale(100.0), 100.0);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        assert_eq!(normalize_percentage_scale(1.5), 150.0);
        assert_eq!(normalize_percentage_scale(1.51), 1.51);
    }

    #[test]
    fn test_zero_and_negative_are_unchanged() {
        assert_eq!(normalize_percentage_scale(0.0), 0.0);
        assert_eq!(normalize_percentage_scale(-0.5), -0.5);
    }
}
