//! Easing functions for animations
//!
//! An easing maps normalized time `t ∈ [0, 1]` onto an interpolation factor.
//! [`Easing::interpolate`] lifts that factor onto any [`Animatable`] value,
//! which is the `(a, b, t) -> value` form the playback nodes consume.

use crate::values::Animatable;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
    EaseInBack,
    EaseOutBack,
    EaseInOutBack,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
    CubicBezier(f32, f32, f32, f32),
}

const BACK_C1: f32 = 1.70158;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    ///
    /// Input is clamped to `[0, 1]` and both endpoints map exactly onto
    /// `0.0` and `1.0` for every family.
    pub fn apply(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => t,
            Easing::EaseIn | Easing::EaseInCubic => t * t * t,
            Easing::EaseOut | Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut | Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => ease_in_out_quad(t),
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::EaseInQuint => t.powi(5),
            Easing::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::EaseInExpo => 2f32.powf(10.0 * t - 10.0),
            Easing::EaseOutExpo => 1.0 - 2f32.powf(-10.0 * t),
            Easing::EaseInOutExpo => {
                if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Easing::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            Easing::EaseOutCirc => (1.0 - (t - 1.0) * (t - 1.0)).sqrt(),
            Easing::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            Easing::EaseInElastic => {
                -(2f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
            }
            Easing::EaseOutElastic => {
                2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
            }
            Easing::EaseInOutElastic => {
                if t < 0.5 {
                    -(2f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0
                } else {
                    (2f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0
                        + 1.0
                }
            }
            Easing::EaseInBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Easing::EaseOutBack => {
                1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2)
            }
            Easing::EaseInOutBack => {
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2)
                        + 2.0)
                        / 2.0
                }
            }
            Easing::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            Easing::EaseOutBounce => bounce_out(t),
            Easing::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => UnitBezier::new(*x1, *y1, *x2, *y2).ease(t),
        }
    }

    /// Interpolate between `a` and `b` at normalized time `t`
    ///
    /// Returns `a` and `b` themselves (not a recomputed lerp) when the eased
    /// factor is exactly 0 or 1, so endpoints carry no floating residue.
    pub fn interpolate<T: Animatable>(&self, a: T, b: T, t: f32) -> T {
        let factor = self.apply(t);
        if factor == 0.0 {
            a
        } else if factor == 1.0 {
            b
        } else {
            a.lerp(b, factor)
        }
    }

    /// Whether the curve leaves `[0, 1]` somewhere inside the unit interval
    pub fn overshoots(&self) -> bool {
        matches!(
            self,
            Easing::EaseInElastic
                | Easing::EaseOutElastic
                | Easing::EaseInOutElastic
                | Easing::EaseInBack
                | Easing::EaseOutBack
                | Easing::EaseInOutBack
        )
    }
}

/// Shared by [`Easing::EaseInOutQuad`] and the pulse easing's bump
pub(crate) fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// Unit cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1)
///
/// Polynomial coefficients are expanded once; solving for the curve
/// parameter runs in f64 so high frame rates do not show stepping.
struct UnitBezier {
    x: [f64; 3],
    y: [f64; 3],
}

impl UnitBezier {
    fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: coefficients(x1 as f64, x2 as f64),
            y: coefficients(y1 as f64, y2 as f64),
        }
    }

    fn ease(&self, t: f32) -> f32 {
        let s = self.solve(t as f64);
        horner(&self.y, s) as f32
    }

    /// Curve parameter whose x equals `x`
    fn solve(&self, x: f64) -> f64 {
        const TOLERANCE: f64 = 1e-7;

        let mut s = x;
        for _ in 0..8 {
            let dx = horner(&self.x, s) - x;
            if dx.abs() < TOLERANCE {
                return s;
            }
            let dxds = (3.0 * self.x[0] * s + 2.0 * self.x[1]) * s + self.x[2];
            if dxds.abs() < TOLERANCE {
                break;
            }
            s -= dx / dxds;
        }

        // x(s) is monotonic on [0, 1] for valid control points
        let (mut low, mut high) = (0.0_f64, 1.0_f64);
        s = x.clamp(low, high);
        for _ in 0..24 {
            let at = horner(&self.x, s);
            if (at - x).abs() < TOLERANCE {
                break;
            }
            if at < x {
                low = s;
            } else {
                high = s;
            }
            s = low + (high - low) / 2.0;
        }
        s
    }
}

/// `[a, b, c]` of `a·s³ + b·s² + c·s` for control values `p1`, `p2`
fn coefficients(p1: f64, p2: f64) -> [f64; 3] {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    [1.0 - c - b, b, c]
}

#[inline]
fn horner(k: &[f64; 3], s: f64) -> f64 {
    ((k[0] * s + k[1]) * s + k[2]) * s
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::Vec2;

    const ALL: &[Easing] = &[
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInQuint,
        Easing::EaseOutQuint,
        Easing::EaseInOutQuint,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
        Easing::EaseInExpo,
        Easing::EaseOutExpo,
        Easing::EaseInOutExpo,
        Easing::EaseInCirc,
        Easing::EaseOutCirc,
        Easing::EaseInOutCirc,
        Easing::EaseInElastic,
        Easing::EaseOutElastic,
        Easing::EaseInOutElastic,
        Easing::EaseInBack,
        Easing::EaseOutBack,
        Easing::EaseInOutBack,
        Easing::EaseInBounce,
        Easing::EaseOutBounce,
        Easing::EaseInOutBounce,
        Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at 1");
            assert_eq!(easing.apply(-0.5), 0.0, "{easing:?} below range");
            assert_eq!(easing.apply(1.5), 1.0, "{easing:?} above range");
        }
    }

    #[test]
    fn test_in_out_midpoints() {
        for easing in [
            Easing::EaseInOutQuad,
            Easing::EaseInOutCubic,
            Easing::EaseInOutQuart,
            Easing::EaseInOutQuint,
            Easing::EaseInOutSine,
            Easing::EaseInOutExpo,
            Easing::EaseInOutCirc,
        ] {
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-4, "{easing:?}");
        }
    }

    #[test]
    fn test_non_overshooting_families_stay_in_range() {
        for easing in ALL.iter().filter(|e| !e.overshoots()) {
            for i in 0..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!((-1e-5..=1.0 + 1e-5).contains(&v), "{easing:?} produced {v}");
            }
        }
    }

    #[test]
    fn test_back_overshoots() {
        assert!(Easing::EaseInBack.apply(0.2) < 0.0);
        assert!(Easing::EaseOutBack.apply(0.8) > 1.0);
    }

    #[test]
    fn test_interpolate_returns_exact_endpoints() {
        let a = Vec2::new(0.1, 0.7);
        let b = Vec2::new(0.3, 0.9);
        assert_eq!(Easing::EaseOutBounce.interpolate(a, b, 1.0), b);
        assert_eq!(Easing::EaseInQuad.interpolate(a, b, 0.0), a);

        let mid = Easing::Linear.interpolate(0.0_f32, 10.0, 0.25);
        assert!((mid - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_cubic_bezier_linear_control_points() {
        let linear = Easing::CubicBezier(0.0, 0.0, 1.0, 1.0);
        for i in 1..10 {
            let t = i as f32 / 10.0;
            assert!((linear.apply(t) - t).abs() < 1e-4);
        }
    }
}
