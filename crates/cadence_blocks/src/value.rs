//! Block values, targets and interpolation settings
//!
//! Blocks are plain data, so their endpoints and interpolation laws are
//! stored in serializable mirrors of the engine types and converted when the
//! tree is built.

use cadence_animation::{Animatable, Blink, Curve, Easing, Interpolation, Pulse, Shake, SharedValue};
use cadence_core::error::{AnimationError, Result};
use cadence_core::{Color, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Which value type a block animates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Float,
    Vec2,
    Vec3,
    Color,
}

/// An endpoint or parameter value stored in a block
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Color(Color),
}

impl BlockValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            BlockValue::Float(_) => ValueKind::Float,
            BlockValue::Vec2(_) => ValueKind::Vec2,
            BlockValue::Vec3(_) => ValueKind::Vec3,
            BlockValue::Color(_) => ValueKind::Color,
        }
    }
}

/// The host property a motion block writes to
///
/// Runtime only; never serialized. Clones share the underlying cell.
#[derive(Clone, Debug)]
pub enum BlockTarget {
    Float(SharedValue<f32>),
    Vec2(SharedValue<Vec2>),
    Vec3(SharedValue<Vec3>),
    Color(SharedValue<Color>),
}

impl BlockTarget {
    pub fn kind(&self) -> ValueKind {
        match self {
            BlockTarget::Float(_) => ValueKind::Float,
            BlockTarget::Vec2(_) => ValueKind::Vec2,
            BlockTarget::Vec3(_) => ValueKind::Vec3,
            BlockTarget::Color(_) => ValueKind::Color,
        }
    }
}

/// Value types a block can carry
pub trait BlockValueType: Animatable {
    const KIND: ValueKind;

    fn from_block(value: BlockValue) -> Option<Self>;

    fn into_block(self) -> BlockValue;

    fn target(target: &BlockTarget) -> Option<&SharedValue<Self>>;

    fn wrap_target(value: SharedValue<Self>) -> BlockTarget;
}

macro_rules! block_value_type {
    ($ty:ty, $variant:ident) => {
        impl BlockValueType for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn from_block(value: BlockValue) -> Option<Self> {
                match value {
                    BlockValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_block(self) -> BlockValue {
                BlockValue::$variant(self)
            }

            fn target(target: &BlockTarget) -> Option<&SharedValue<Self>> {
                match target {
                    BlockTarget::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn wrap_target(value: SharedValue<Self>) -> BlockTarget {
                BlockTarget::$variant(value)
            }
        }

        impl From<$ty> for BlockValue {
            fn from(value: $ty) -> Self {
                BlockValue::$variant(value)
            }
        }

        impl From<SharedValue<$ty>> for BlockTarget {
            fn from(value: SharedValue<$ty>) -> Self {
                BlockTarget::$variant(value)
            }
        }
    };
}

block_value_type!(f32, Float);
block_value_type!(Vec2, Vec2);
block_value_type!(Vec3, Vec3);
block_value_type!(Color, Color);

/// Convert a stored value, failing on a kind mismatch
pub(crate) fn expect_value<T: BlockValueType>(value: BlockValue, what: &str) -> Result<T> {
    T::from_block(value).ok_or_else(|| {
        AnimationError::invalid(format!(
            "{what} is {:?} but the target animates {:?}",
            value.kind(),
            T::KIND
        ))
    })
}

/// Serializable interpolation settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockInterpolation {
    Eased {
        easing: Easing,
    },
    Blink {
        count: u32,
    },
    Pulse {
        offset: BlockValue,
    },
    Shake {
        magnitude: BlockValue,
        frequency: f32,
        #[serde(default)]
        damper: Option<Curve>,
    },
    Curve {
        curve: Curve,
    },
}

impl BlockInterpolation {
    /// Build the engine interpolation for value type `T`
    ///
    /// Shake draws a fresh noise seed and phase on every call.
    pub fn to_interpolation<T: BlockValueType>(&self) -> Result<Interpolation<T>> {
        Ok(match self {
            BlockInterpolation::Eased { easing } => Interpolation::Eased(*easing),
            BlockInterpolation::Blink { count } => Interpolation::Blink(Blink::new(*count)?),
            BlockInterpolation::Pulse { offset } => {
                Interpolation::Pulse(Pulse::new(expect_value(*offset, "pulse offset")?))
            }
            BlockInterpolation::Shake {
                magnitude,
                frequency,
                damper,
            } => {
                let magnitude = expect_value(*magnitude, "shake magnitude")?;
                let mut shake = Shake::new(magnitude, *frequency)?;
                if let Some(damper) = damper {
                    shake = shake.with_damper(damper.clone());
                }
                Interpolation::Shake(shake)
            }
            BlockInterpolation::Curve { curve } => Interpolation::Curve(curve.clone()),
        })
    }
}

impl Default for BlockInterpolation {
    fn default() -> Self {
        BlockInterpolation::Eased {
            easing: Easing::Linear,
        }
    }
}

impl From<Easing> for BlockInterpolation {
    fn from(easing: Easing) -> Self {
        BlockInterpolation::Eased { easing }
    }
}
