//! Sampled curves
//!
//! A [`Curve`] is a user-authored mapping `t -> value` built from keys. It
//! drives the `Curve` easing (as the interpolation factor) and the optional
//! damper of the `Shake` easing.

use crate::easing::Easing;
use serde::{Deserialize, Serialize};

/// A single key in a sampled curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    /// Position along the curve (usually 0.0 to 1.0)
    pub time: f32,
    /// Curve value at this key
    pub value: f32,
    /// Easing used when transitioning TO this key
    #[serde(default)]
    pub easing: Easing,
}

impl CurveKey {
    pub fn new(time: f32, value: f32, easing: Easing) -> Self {
        Self {
            time,
            value,
            easing,
        }
    }
}

/// An ordered set of keys evaluated by piecewise easing
///
/// Cloning copies the keys, so a cloned curve never aliases its source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    keys: Vec<CurveKey>,
}

impl Curve {
    /// An empty curve; evaluates to the identity `t -> t`
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// `(0, 0) -> (1, 1)` with linear segments
    pub fn linear() -> Self {
        Self::new().key(0.0, 0.0).key(1.0, 1.0)
    }

    /// `(0, 1) -> (1, 0)` easing out, the usual shape for a shake damper
    pub fn ease_out() -> Self {
        Self::new()
            .key(0.0, 1.0)
            .key_with(1.0, 0.0, Easing::EaseOutQuad)
    }

    /// Build a curve from arbitrary keys (sorted by time)
    pub fn from_keys(keys: impl IntoIterator<Item = CurveKey>) -> Self {
        let mut curve = Self {
            keys: keys.into_iter().collect(),
        };
        curve.sort();
        curve
    }

    /// Add a key with linear easing (builder pattern)
    pub fn key(self, time: f32, value: f32) -> Self {
        self.key_with(time, value, Easing::Linear)
    }

    /// Add a key with an explicit easing (builder pattern)
    pub fn key_with(mut self, time: f32, value: f32, easing: Easing) -> Self {
        self.add_key(CurveKey::new(time, value, easing));
        self
    }

    pub fn add_key(&mut self, key: CurveKey) {
        self.keys.push(key);
        self.sort();
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sample the curve at `t`
    ///
    /// Values outside the key range hold the first/last key.
    pub fn evaluate(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return t;
        };

        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // Find surrounding keys
        let mut prev = first;
        let mut next = last;
        for key in &self.keys {
            if key.time <= t {
                prev = key;
            }
            if key.time >= t {
                next = key;
                break;
            }
        }

        if (next.time - prev.time).abs() < f32::EPSILON {
            return prev.value;
        }

        let local = (t - prev.time) / (next.time - prev.time);
        let eased = next.easing.apply(local);

        prev.value + (next.value - prev.value) * eased
    }

    fn sort(&mut self) {
        self.keys.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_curve_is_identity() {
        let curve = Curve::new();
        assert_eq!(curve.evaluate(0.3), 0.3);
    }

    #[test]
    fn test_single_key_is_constant() {
        let curve = Curve::new().key(0.5, 2.0);
        assert_eq!(curve.evaluate(0.0), 2.0);
        assert_eq!(curve.evaluate(1.0), 2.0);
    }

    #[test]
    fn test_piecewise_evaluation() {
        let curve = Curve::new().key(1.0, 0.0).key(0.0, 0.0).key(0.5, 1.0);

        // Keys were sorted on insertion
        assert_eq!(curve.keys()[1].time, 0.5);
        assert!((curve.evaluate(0.25) - 0.5).abs() < 1e-6);
        assert_eq!(curve.evaluate(0.5), 1.0);
        assert!((curve.evaluate(0.75) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_holds_outside_range() {
        let curve = Curve::new().key(0.2, 3.0).key(0.8, 5.0);
        assert_eq!(curve.evaluate(-1.0), 3.0);
        assert_eq!(curve.evaluate(2.0), 5.0);
    }

    #[test]
    fn test_segment_easing_applies() {
        let curve = Curve::new().key(0.0, 0.0).key_with(1.0, 1.0, Easing::EaseInQuad);
        assert!((curve.evaluate(0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Curve::linear();
        let mut copy = original.clone();
        copy.add_key(CurveKey::new(0.5, 0.9, Easing::Linear));
        assert_eq!(original.keys().len(), 2);
        assert_eq!(copy.keys().len(), 3);
    }
}
