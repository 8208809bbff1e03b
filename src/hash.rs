//! Content hashing for configuration vectors.
//!
//! The hash is a 64-bit FNV-1a over a canonical encoding of the vector:
//! entries in path order, each contributing its path, a type tag and the
//! value bytes. It is stable across processes and platforms, which the
//! external harness relies on to deduplicate evaluation requests.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::value::ParamValue;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Content hash of a [`ConfigurationVector`](crate::ConfigurationVector).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConfigHash(u64);

impl ConfigHash {
    /// Wraps a raw hash value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw hash value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ConfigHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Incremental FNV-1a hasher.
pub(crate) struct Fnv1a(u64);

impl Fnv1a {
    pub(crate) fn new() -> Self {
        Self(FNV_OFFSET_BASIS)
    }

    fn bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    /// Folds a string followed by a separator byte, so adjacent strings
    /// cannot run into each other.
    pub(crate) fn str(&mut self, s: &str) {
        self.bytes(s.as_bytes());
        self.bytes(&[0xff]);
    }

    pub(crate) fn value(&mut self, value: &ParamValue) {
        match value {
            ParamValue::Float(v) => {
                // -0.0 and 0.0 describe the same configuration.
                let v = if *v == 0.0 { 0.0 } else { *v };
                self.bytes(&[0x01]);
                self.bytes(&v.to_bits().to_le_bytes());
            }
            ParamValue::Int(v) => {
                self.bytes(&[0x02]);
                self.bytes(&v.to_le_bytes());
            }
            ParamValue::Bool(v) => {
                self.bytes(&[0x03, u8::from(*v)]);
            }
            ParamValue::Categorical(v) => {
                self.bytes(&[0x04]);
                self.str(v);
            }
        }
    }

    pub(crate) fn finish(&self) -> ConfigHash {
        ConfigHash(self.0)
    }
}
