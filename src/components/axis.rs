//! Axis selection for squash and stretch.
//!
//! [`SquashStretchAxis`] is a small bitmask over the three local axes. Axes in
//! the mask are multiplied by the animated factor; the remaining axes receive
//! the inverse factor (see [`crate::systems::squashstretch::apply_axes`]).

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Bitmask of the axes affected by a squash and stretch animation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SquashStretchAxis: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const Z = 1 << 2;
    }
}

impl SquashStretchAxis {
    pub const NONE: Self = Self::empty();
    pub const ALL: Self = Self::all();

    pub fn affects_x(self) -> bool {
        self.contains(Self::X)
    }

    pub fn affects_y(self) -> bool {
        self.contains(Self::Y)
    }

    pub fn affects_z(self) -> bool {
        self.contains(Self::Z)
    }
}

impl Default for SquashStretchAxis {
    fn default() -> Self {
        Self::Y
    }
}

// Presets store the mask as its raw bit value.
impl Serialize for SquashStretchAxis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for SquashStretchAxis {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}
