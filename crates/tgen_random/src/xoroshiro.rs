use md5::{Digest, Md5};
use rand_xoshiro::Xoroshiro128PlusPlus;
use rand_xoshiro::rand_core::{RngCore, SeedableRng};

use crate::Random;

/// xoroshiro128++ seeded through SplitMix64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XoroshiroRandom(Xoroshiro128PlusPlus);

impl XoroshiroRandom {
    pub fn new(seed: u64) -> Self {
        Self(Xoroshiro128PlusPlus::seed_from_u64(seed))
    }
}

impl Random for XoroshiroRandom {
    fn fork_hash(&mut self, name: impl AsRef<[u8]>) -> Self {
        let mut seed = [0u8; 16];
        self.0.fill_bytes(&mut seed);
        for (byte, hashed) in seed.iter_mut().zip(Md5::digest(name.as_ref())) {
            *byte ^= hashed;
        }
        Self(Xoroshiro128PlusPlus::from_seed(seed))
    }
}

impl RngCore for XoroshiroRandom {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }
}
