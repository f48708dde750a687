//! 64-bit FNV-1a hashing.
//!
//! The table's default hasher. It is unseeded and deterministic, so it
//! offers no protection against key sets crafted to collide; the table
//! is meant for trusted input.

use core::hash::{BuildHasher, Hasher};

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a over a byte slice.
#[inline]
pub fn fnv1a(bytes: &[u8]) -> u64 {
    let mut h = FnvHasher::new();
    h.write(bytes);
    h.finish()
}

/// Streaming FNV-1a state.
#[derive(Copy, Clone, Debug)]
pub struct FnvHasher {
    hash: u64,
}

impl FnvHasher {
    pub const fn new() -> Self {
        Self {
            hash: FNV_OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash ^= u64::from(b);
            self.hash = self.hash.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Builds a fresh [`FnvHasher`] per key.
#[derive(Copy, Clone, Debug, Default)]
pub struct FnvBuildHasher;

impl BuildHasher for FnvBuildHasher {
    type Hasher = FnvHasher;

    fn build_hasher(&self) -> FnvHasher {
        FnvHasher::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Published FNV-1a 64-bit test vectors.
    #[test]
    fn known_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(fnv1a(b"foobar"), 0x85944171f73967e8);
    }

    /// Feeding bytes in pieces gives the same hash as one write.
    #[test]
    fn streaming_matches_one_shot() {
        let mut h = FnvBuildHasher.build_hasher();
        h.write(b"foo");
        h.write(b"bar");
        assert_eq!(h.finish(), fnv1a(b"foobar"));
    }

    /// No seed: independently built hashers agree.
    #[test]
    fn deterministic_across_builders() {
        let mut a = FnvBuildHasher.build_hasher();
        let mut b = FnvBuildHasher::default().build_hasher();
        a.write(b"quick");
        b.write(b"quick");
        assert_eq!(a.finish(), b.finish());
        assert_ne!(a.finish(), fnv1a(b"quack"));
    }
}
