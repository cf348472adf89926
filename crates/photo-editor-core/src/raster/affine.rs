//! 2D affine transform in canvas convention.
//!
//! The matrix `[a b c d e f]` maps a point as
//! ```text
//! x' = a*x + c*y + e
//! y' = b*x + d*y + f
//! ```
//! Each operation post-multiplies, so operations apply to drawn content in
//! reverse call order, exactly like a canvas context.

/// Affine transform matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// `self` followed by `other` applied first: `self * other`.
    pub fn then(self, other: Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn translate(self, x: f64, y: f64) -> Affine {
        self.then(Affine {
            e: x,
            f: y,
            ..Affine::IDENTITY
        })
    }

    /// Clockwise on screen (y axis points down).
    pub fn rotate(self, radians: f64) -> Affine {
        let (sin, cos) = radians.sin_cos();
        self.then(Affine {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        })
    }

    pub fn scale(self, x: f64, y: f64) -> Affine {
        self.then(Affine {
            a: x,
            d: y,
            ..Affine::IDENTITY
        })
    }

    /// Map a point.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Inverse transform, or `None` if the matrix is singular.
    pub fn invert(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON || !det.is_finite() {
            return None;
        }
        Some(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_point(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_identity() {
        assert_point(Affine::IDENTITY.apply(3.0, -4.0), (3.0, -4.0));
    }

    #[test]
    fn test_rotate_quarter_turn_clockwise() {
        // +x goes to +y (down) on a y-down screen
        let m = Affine::IDENTITY.rotate(FRAC_PI_2);
        assert_point(m.apply(1.0, 0.0), (0.0, 1.0));
        assert_point(m.apply(0.0, 1.0), (-1.0, 0.0));
    }

    #[test]
    fn test_operations_apply_in_reverse_call_order() {
        // translate then scale: content is scaled first, then moved
        let m = Affine::IDENTITY.translate(10.0, 20.0).scale(2.0, -1.0);
        assert_point(m.apply(1.0, 1.0), (12.0, 19.0));
    }

    #[test]
    fn test_invert_round_trip() {
        let m = Affine::IDENTITY
            .translate(50.0, 40.0)
            .rotate(FRAC_PI_2)
            .scale(-1.5, 1.5);
        let inv = m.invert().unwrap();
        let (x, y) = m.apply(7.0, -3.0);
        assert_point(inv.apply(x, y), (7.0, -3.0));
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Affine::IDENTITY.scale(0.0, 1.0).invert().is_none());
    }
}
