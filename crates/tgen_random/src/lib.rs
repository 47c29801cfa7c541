pub mod xoroshiro;

pub use crate::xoroshiro::XoroshiroRandom;

use bevy_math::DVec2;
use rand_xoshiro::rand_core::RngCore;

const F64_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

/// Seeded random source for measurement runs and tests.
///
/// Terrain classification itself never draws from a `Random`; world layout is a
/// pure function of configuration. This exists so that surveys over the world
/// are reproducible without being tied to the world seeds.
pub trait Random: RngCore + Clone {
    /// Uniform value in `[0, 1)` from the top 53 bits of the next output.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * F64_UNIT
    }

    /// Uniform value in `[min, max)`.
    fn next_f64_between(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform point in the annulus `inner <= |p| <= outer` around the origin.
    ///
    /// Drawn by rejection from the bounding square, so only `+ - *` and
    /// comparisons are involved and the sequence is identical on every platform.
    fn next_point_in_annulus(&mut self, inner: f64, outer: f64) -> DVec2 {
        assert!(
            inner >= 0.0 && inner < outer && outer.is_finite(),
            "invalid annulus [{inner}, {outer}]"
        );
        let inner_sq = inner * inner;
        let outer_sq = outer * outer;
        loop {
            let x = self.next_f64_between(-outer, outer);
            let y = self.next_f64_between(-outer, outer);
            let dist_sq = x * x + y * y;
            if dist_sq <= outer_sq && dist_sq >= inner_sq {
                return DVec2::new(x, y);
            }
        }
    }

    /// Derives an independent stream keyed by `name`, so that two named
    /// measurements started from the same source never share samples.
    fn fork_hash(&mut self, name: impl AsRef<[u8]>) -> Self;
}
