use crate::biome::{BaseBiomeClassifier, TerrainCategory};
use crate::config::BufferSettings;
use crate::memo::SpatialMemo;
use crate::zone::distance_from_origin;
use std::f64::consts::FRAC_1_SQRT_2 as H;

// Probe directions are literal tables rather than `sin`/`cos` calls so every
// platform probes bit-identical positions.
const C15: f64 = 0.9659258262890683;
const S15: f64 = 0.25881904510252074;
const C22: f64 = 0.9238795325112867;
const S22: f64 = 0.3826834323650898;

const CARDINALS: [(f64, f64); 4] = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];

const RING_8: [(f64, f64); 8] = [
    (1.0, 0.0),
    (H, H),
    (0.0, 1.0),
    (-H, H),
    (-1.0, 0.0),
    (-H, -H),
    (0.0, -1.0),
    (H, -H),
];

/// `RING_8` rotated by 22.5°.
const RING_8_STAGGERED: [(f64, f64); 8] = [
    (C22, S22),
    (S22, C22),
    (-S22, C22),
    (-C22, S22),
    (-C22, -S22),
    (-S22, -C22),
    (S22, -C22),
    (C22, -S22),
];

/// Every 30°, starting at 15°.
const RING_12: [(f64, f64); 12] = [
    (C15, S15),
    (H, H),
    (S15, C15),
    (-S15, C15),
    (-H, H),
    (-C15, S15),
    (-C15, -S15),
    (-H, -H),
    (-S15, -C15),
    (S15, -C15),
    (H, -H),
    (C15, -S15),
];

const RING_16: [(f64, f64); 16] = [
    (1.0, 0.0),
    (C22, S22),
    (H, H),
    (S22, C22),
    (0.0, 1.0),
    (-S22, C22),
    (-H, H),
    (-C22, S22),
    (-1.0, 0.0),
    (-C22, -S22),
    (-H, -H),
    (-S22, -C22),
    (0.0, -1.0),
    (S22, -C22),
    (H, -H),
    (C22, -S22),
];

/// `1 / cos(π / n)`: pushes an `n`-probe ring out until the polygon through
/// the probes encloses the circle of the nominal radius.
const COVER_8: f64 = 1.082392200292394;
const COVER_16: f64 = 1.0195911582083184;

/// Decides whether a sand coordinate lies at least `radius` away from any
/// grass.
///
/// A dense disk scan is quadratic in the radius, so the check escalates
/// through cheap sparse probes instead, most of which exit on the first grass
/// hit. All probes go through the base cache of the [`SpatialMemo`], and the
/// verdict itself is cached per coarse cell.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferValidator {
    radius: f64,
    reach: f64,
    safe_radius: f64,
    far_distance: f64,
    origin_scan_margin: f64,
    scan_steps: u32,
}

impl BufferValidator {
    /// `quantization_slack` widens the probe reach so snapping the candidate
    /// and the probes to cache cells never shrinks the checked disk.
    pub fn new(settings: &BufferSettings, safe_radius: f64, quantization_slack: f64) -> Self {
        Self {
            radius: settings.radius,
            reach: settings.radius + quantization_slack,
            safe_radius,
            far_distance: settings.far_distance,
            origin_scan_margin: settings.origin_scan_margin,
            scan_steps: settings.scan_steps,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn reach(&self) -> f64 {
        self.reach
    }

    pub fn is_far_enough_from_grass(
        &self,
        base: &BaseBiomeClassifier,
        memo: &SpatialMemo,
        x: f64,
        y: f64,
    ) -> bool {
        memo.buffer
            .get_or_compute(x, y, |ax, ay| self.probe(base, memo, ax, ay))
    }

    /// The uncached check for a candidate at `(x, y)`.
    pub fn probe(&self, base: &BaseBiomeClassifier, memo: &SpatialMemo, x: f64, y: f64) -> bool {
        let distance = distance_from_origin(x, y);
        if distance < self.safe_radius + self.radius * 0.5 {
            return false;
        }

        let grass_at = |dx: f64, dy: f64, r: f64| {
            memo.base
                .get_or_compute(x + dx * r, y + dy * r, |px, py| base.classify_base(px, py))
                == TerrainCategory::Grass
        };
        let ring_hits = |ring: &[(f64, f64)], r: f64| ring.iter().any(|&(dx, dy)| grass_at(dx, dy, r));

        if distance > self.far_distance {
            return !(ring_hits(&RING_8, self.reach * COVER_8)
                || ring_hits(&RING_12, self.reach * 0.5));
        }

        if ring_hits(&CARDINALS, self.reach)
            || ring_hits(&RING_16, self.reach * COVER_16)
            || ring_hits(&RING_8_STAGGERED, self.reach * 0.5)
        {
            return false;
        }

        if distance < self.safe_radius + self.origin_scan_margin {
            // Grass is most likely straight back toward spawn.
            let (ux, uy) = (-x / distance, -y / distance);
            let steps = self.scan_steps.max(1);
            for step in 1..=steps {
                let r = self.reach * step as f64 / steps as f64;
                if grass_at(ux, uy, r) {
                    return false;
                }
            }
        }
        true
    }

    /// Upper bound on base lookups for one uncached verdict.
    pub fn max_probes(&self) -> usize {
        CARDINALS.len() + RING_16.len() + RING_8_STAGGERED.len() + self.scan_steps.max(1) as usize
    }
}
