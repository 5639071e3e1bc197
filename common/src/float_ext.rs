pub trait FloatExt {
    /// Absolute comparison against [`crate::EPSILON`].
    fn approximately_eq(self, other: Self) -> bool;

    /// `|self - other| <= rel_tol * max(|self|, |other|)`.
    fn relatively_eq(self, other: Self, rel_tol: Self) -> bool;

    /// True when `self` is negligible compared to `reference`.
    fn is_negligible_against(self, reference: Self, rel_tol: Self) -> bool;
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON
    }

    fn relatively_eq(self, other: Self, rel_tol: Self) -> bool {
        let magnitude = self.abs().max(other.abs());
        (self - other).abs() <= rel_tol * magnitude
    }

    fn is_negligible_against(self, reference: Self, rel_tol: Self) -> bool {
        self.abs() <= rel_tol * reference.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_approximately_eq() {
        assert!(1.0_f64.approximately_eq(1.0));
        assert!(0.0_f64.approximately_eq(0.0));
        assert!((0.1_f64 + 0.2_f64).approximately_eq(0.3));
        assert!(!1.0_f64.approximately_eq(1.0001));
    }

    #[test]
    fn nan_is_never_equal() {
        assert!(!f64::NAN.approximately_eq(f64::NAN));
        assert!(!f64::NAN.relatively_eq(1.0, 1e-9));
        assert!(!f64::NAN.is_negligible_against(1.0, 1e-9));
    }

    #[test]
    fn relative_comparison_scales_with_magnitude() {
        assert!(1e12_f64.relatively_eq(1e12 + 1.0, 1e-9));
        assert!(!1e-3_f64.relatively_eq(1e-3 + 1e-9, 1e-9));
        // zero only equals zero
        assert!(0.0_f64.relatively_eq(0.0, 1e-9));
        assert!(!0.0_f64.relatively_eq(1e-300, 1e-9));
    }

    #[test]
    fn negligible_against_reference() {
        assert!(1e-12_f64.is_negligible_against(10.0, 1e-10));
        assert!(!1e-8_f64.is_negligible_against(10.0, 1e-10));
        assert!(0.0_f64.is_negligible_against(0.0, 1e-10));
        assert!((-1e-12_f64).is_negligible_against(-10.0, 1e-10));
    }
}
