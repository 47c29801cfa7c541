/// Seeded lattice value noise over the plane.
///
/// Every integer lattice point gets a pseudo-random value from an integer
/// hash of its coordinates and the seed; samples in between are blended with
/// smoothstep weights. Only integer wrapping arithmetic, `floor` and basic
/// float operations are involved, so a sample is bit-identical on every
/// platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueNoise {
    seed: i32,
}

impl ValueNoise {
    pub const fn new(seed: i32) -> Self {
        Self { seed }
    }

    pub const fn seed(&self) -> i32 {
        self.seed
    }

    /// Value at lattice point `(xi, yi)`, in `(-1, 1]`.
    #[inline]
    pub fn lattice(&self, xi: i32, yi: i32) -> f64 {
        let mut n = xi.wrapping_add(yi.wrapping_mul(57)).wrapping_add(self.seed);
        n = (n << 13) ^ n;
        let mixed = n
            .wrapping_mul(n.wrapping_mul(n).wrapping_mul(15731).wrapping_add(789221))
            .wrapping_add(1376312589)
            & 0x7fff_ffff;
        1.0 - mixed as f64 / 1_073_741_824.0
    }

    /// Smoothly interpolated value at `(x, y)`, in `[-1, 1]`.
    #[inline]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let floor_x = x.floor();
        let floor_y = y.floor();
        // `as` saturates, so far-away or non-finite input still lands on a lattice cell.
        let xi = floor_x as i32;
        let yi = floor_y as i32;
        let tx = smoothstep(x - floor_x);
        let ty = smoothstep(y - floor_y);

        let v00 = self.lattice(xi, yi);
        let v10 = self.lattice(xi.wrapping_add(1), yi);
        let v01 = self.lattice(xi, yi.wrapping_add(1));
        let v11 = self.lattice(xi.wrapping_add(1), yi.wrapping_add(1));

        let bottom = lerp(tx, v00, v10);
        let top = lerp(tx, v01, v11);
        lerp(ty, bottom, top).clamp(-1.0, 1.0)
    }
}

#[inline(always)]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline(always)]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + (b - a) * t
}
