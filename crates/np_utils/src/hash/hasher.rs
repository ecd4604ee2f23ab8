//! Provide `FixedHasher` and `NoOpHasher`.
//!
//! `FixedHasher` is based on `foldhash` with a fixed seed, so a value always
//! hashes to the same result across runs.
//!
//! `NoOpHasher` passes a `u64` straight through, which is all a [`TypeId`]
//! key needs.
//!
//! [`TypeId`]: core::any::TypeId

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6A09E667F3BCC908);

/// A hasher whose result only depends on the input.
///
/// A type alias for [`foldhash::fast::FoldHasher`], created through
/// [`FixedHashState::build_hasher`].
pub type FixedHasher = FoldHasher<'static>;

/// Hash state seeded with a constant.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use np_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one(7_u32), FixedHashState.hash_one(7_u32));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// A hasher that keeps the last written `u64` as the hash.
///
/// Byte writes are read as native-endian integers of up to eight bytes, so
/// writing a `u32` once yields the same hash as writing the equal `u64` once.
/// Longer writes fold their chunks together.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut padded = [0_u8; 8];
            if cfg!(target_endian = "big") {
                padded[8 - chunk.len()..].copy_from_slice(chunk);
            } else {
                padded[..chunk.len()].copy_from_slice(chunk);
            }
            self.hash = self.hash.rotate_left(8) ^ u64::from_ne_bytes(padded);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Builds [`NoOpHasher`]s.
///
/// # Examples
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use np_utils::hash::NoOpHashState;
///
/// let mut hasher = NoOpHashState.build_hasher();
/// 3_u64.hash(&mut hasher);
/// assert_eq!(hasher.finish(), 3);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

#[cfg(test)]
mod tests {
    use core::hash::{BuildHasher, Hash, Hasher};

    use super::{FixedHashState, NoOpHashState};

    #[test]
    fn noop_narrow_write_matches_u64() {
        let mut a = NoOpHashState.build_hasher();
        a.write_u32(1234);
        let mut b = NoOpHashState.build_hasher();
        b.write_u64(1234);
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn noop_narrow_writes_keep_their_value() {
        let mut hasher = NoOpHashState.build_hasher();
        hasher.write_u8(0xab);
        assert_eq!(hasher.finish(), 0xab);

        let mut hasher = NoOpHashState.build_hasher();
        hasher.write_u16(0x1234);
        assert_eq!(hasher.finish(), 0x1234);

        let mut hasher = NoOpHashState.build_hasher();
        hasher.write_u128(1);
        assert_ne!(hasher.finish(), 0);
    }

    #[test]
    fn fixed_state_is_stable() {
        let mut a = FixedHashState.build_hasher();
        "items".hash(&mut a);
        let mut b = FixedHashState.build_hasher();
        "items".hash(&mut b);
        assert_eq!(a.finish(), b.finish());
    }
}
