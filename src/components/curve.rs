//! Keyframed animation curve.
//!
//! An [`AnimationCurve`] maps a normalized time to a value through a list of
//! [`Keyframe`]s. Segments between keys are cubic Hermite splines driven by the
//! keys' tangents. Outside the keyed range the curve is clamped to the first or
//! last key's value.
//!
//! The default curve is the classic squash shape: it rises from 0 to a peak of
//! 1 a quarter of the way in and settles back to 0 at the end.
//!
//! ```ignore
//! let curve = AnimationCurve::default();
//! assert_eq!(curve.evaluate(0.25), 1.0);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A single curve key.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Position of the key on the time axis.
    pub time: f32,
    /// Value of the curve at `time`.
    pub value: f32,
    /// Slope arriving at this key from the left.
    #[serde(default)]
    pub in_tangent: f32,
    /// Slope leaving this key to the right.
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    /// Key with flat tangents.
    pub fn new(time: f32, value: f32) -> Self {
        Keyframe {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }

    pub fn with_tangents(mut self, in_tangent: f32, out_tangent: f32) -> Self {
        self.in_tangent = in_tangent;
        self.out_tangent = out_tangent;
        self
    }
}

/// Time to value mapping evaluated with Hermite interpolation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "CurveKeys", into = "CurveKeys")]
pub struct AnimationCurve {
    keys: SmallVec<[Keyframe; 4]>,
}

/// Serialized form; keys are re-sorted when loaded.
#[derive(Serialize, Deserialize)]
struct CurveKeys {
    keys: SmallVec<[Keyframe; 4]>,
}

impl From<CurveKeys> for AnimationCurve {
    fn from(raw: CurveKeys) -> Self {
        AnimationCurve::new(raw.keys)
    }
}

impl From<AnimationCurve> for CurveKeys {
    fn from(curve: AnimationCurve) -> Self {
        CurveKeys { keys: curve.keys }
    }
}

impl Default for AnimationCurve {
    fn default() -> Self {
        AnimationCurve::new([
            Keyframe::new(0.0, 0.0),
            Keyframe::new(0.25, 1.0),
            Keyframe::new(1.0, 0.0),
        ])
    }
}

impl AnimationCurve {
    /// Build a curve from keys in any order.
    pub fn new(keys: impl IntoIterator<Item = Keyframe>) -> Self {
        let mut keys: SmallVec<[Keyframe; 4]> = keys.into_iter().collect();
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        AnimationCurve { keys }
    }

    /// Flat curve returning `value` everywhere.
    pub fn constant(value: f32) -> Self {
        AnimationCurve::new([Keyframe::new(0.0, value), Keyframe::new(1.0, value)])
    }

    /// Straight line between two keys.
    pub fn linear(time_start: f32, value_start: f32, time_end: f32, value_end: f32) -> Self {
        let span = time_end - time_start;
        let slope = if span.abs() > f32::EPSILON {
            (value_end - value_start) / span
        } else {
            0.0
        };
        AnimationCurve::new([
            Keyframe::new(time_start, value_start).with_tangents(slope, slope),
            Keyframe::new(time_end, value_end).with_tangents(slope, slope),
        ])
    }

    /// Insert a key, keeping the keys ordered by time.
    pub fn add_key(&mut self, key: Keyframe) {
        let idx = self.keys.partition_point(|k| k.time <= key.time);
        self.keys.insert(idx, key);
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sample the curve at `time`.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if self.keys.len() == 1 || time.is_nan() || time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First key strictly after `time`; the segment starts one before it.
        let next_idx = self.keys.partition_point(|k| k.time <= time);
        let k0 = &self.keys[next_idx - 1];
        let k1 = &self.keys[next_idx];

        let dt = k1.time - k0.time;
        if dt <= 1e-6 {
            return k1.value;
        }
        let s = ((time - k0.time) / dt).clamp(0.0, 1.0);
        hermite(k0.value, k0.out_tangent * dt, k1.value, k1.in_tangent * dt, s)
    }
}

/// Cubic Hermite basis with tangents already scaled to the segment length.
fn hermite(p0: f32, m0: f32, p1: f32, m1: f32, s: f32) -> f32 {
    let s2 = s * s;
    let s3 = s2 * s;
    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;
    h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
}
