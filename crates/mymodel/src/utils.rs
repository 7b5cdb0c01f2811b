//! Value comparison helpers shared by the generated data types.

/// Compares two doubles the way encodeable field equality expects:
/// NaN equals NaN, and `-0.0` equals `0.0`.
pub fn is_equal_f64(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Null-safe comparison of optional values.
pub fn is_equal_opt<T: PartialEq + ?Sized>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_equality() {
        assert!(is_equal_f64(1.5, 1.5));
        assert!(is_equal_f64(f64::NAN, f64::NAN));
        assert!(is_equal_f64(-0.0, 0.0));
        assert!(is_equal_f64(f64::INFINITY, f64::INFINITY));
        assert!(!is_equal_f64(f64::INFINITY, f64::NEG_INFINITY));
        assert!(!is_equal_f64(f64::NAN, 0.0));
    }

    #[test]
    fn test_optional_equality() {
        assert!(is_equal_opt::<str>(None, None));
        assert!(is_equal_opt(Some("C"), Some("C")));
        assert!(!is_equal_opt(Some("C"), None));
        assert!(!is_equal_opt(Some("C"), Some("F")));
    }
}
