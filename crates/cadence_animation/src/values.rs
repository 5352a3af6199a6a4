//! Animatable value types
//!
//! Every algorithm in this crate (easing, playback, follow trackers) is written
//! against [`Animatable`] only, so a new value type needs a single small impl.

use cadence_core::{Color, Vec2, Vec3};
use std::fmt::Debug;

/// Arithmetic capabilities the engine needs from an animated value
pub trait Animatable: Copy + PartialEq + Debug + 'static {
    /// The additive identity
    fn zero() -> Self;

    /// Component-wise sum
    fn add(self, other: Self) -> Self;

    /// Component-wise difference (`self - other`)
    fn sub(self, other: Self) -> Self;

    /// Multiply every component by `factor`
    fn scale(self, factor: f32) -> Self;

    /// Euclidean length, used for settling and convergence checks
    fn magnitude(self) -> f32;

    /// Linear interpolation: `self + (other - self) * t`
    fn lerp(self, other: Self, t: f32) -> Self {
        self.add(other.sub(self).scale(t))
    }

    /// Distance between two values
    fn distance(self, other: Self) -> f32 {
        other.sub(self).magnitude()
    }
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Animatable for f32 {
    fn zero() -> Self {
        0.0
    }

    fn add(self, other: Self) -> Self {
        self + other
    }

    fn sub(self, other: Self) -> Self {
        self - other
    }

    fn scale(self, factor: f32) -> Self {
        self * factor
    }

    fn magnitude(self) -> f32 {
        self.abs()
    }
}

// ============================================================================
// Component-wise types
// ============================================================================

/// Vectors and colors are plain component tuples; they share one impl
macro_rules! componentwise {
    ($ty:ty, $zero:expr, $magnitude:expr) => {
        impl Animatable for $ty {
            fn zero() -> Self {
                $zero
            }

            fn add(self, other: Self) -> Self {
                self.zip(other, |a, b| a + b)
            }

            fn sub(self, other: Self) -> Self {
                self.zip(other, |a, b| a - b)
            }

            fn scale(self, factor: f32) -> Self {
                self.map(|c| c * factor)
            }

            fn magnitude(self) -> f32 {
                $magnitude(self)
            }
        }
    };
}

componentwise!(Vec2, Vec2::ZERO, |v: Vec2| v.length());
componentwise!(Vec3, Vec3::ZERO, |v: Vec3| v.length());
// RGBA treated as a 4-vector
componentwise!(Color, Color::TRANSPARENT, |c: Color| {
    c.to_array().iter().map(|ch| ch * ch).sum::<f32>().sqrt()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_interpolation() {
        assert!((0.0_f32.lerp(1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((10.0_f32.lerp(20.0, 0.25) - 12.5).abs() < 1e-6);
        assert_eq!(3.0_f32.distance(-1.0), 4.0);
    }

    #[test]
    fn test_vec3_interpolation() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 20.0, 30.0);
        let mid = a.lerp(b, 0.5);

        assert!((mid.x - 5.0).abs() < 1e-6);
        assert!((mid.y - 10.0).abs() < 1e-6);
        assert!((mid.z - 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_vec2_magnitude_and_scale() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
        assert_eq!(v.scale(2.0), Vec2::new(6.0, 8.0));
        assert_eq!(v.sub(v), Vec2::zero());
    }

    #[test]
    fn test_color_is_a_four_vector() {
        let c = Color::rgba(1.0, 1.0, 1.0, 1.0);
        assert_eq!(c.magnitude(), 2.0);
        assert_eq!(c.sub(c), Color::zero());
        assert_eq!(Color::BLACK.add(Color::RED), Color::rgba(1.0, 0.0, 0.0, 2.0));
    }
}
