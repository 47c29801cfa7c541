use crate::biome::TerrainCategory;
use crate::config::MemoSettings;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// A coordinate snapped to a square grid cell.
///
/// Cell indices are `i64`, so distinct cells are kept apart for
/// `|coord| < 2^63 * cell_size`. Past that, and for infinities, the saturating
/// cast collapses coordinates onto the edge cells. NaN lands in cell 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    gx: i64,
    gy: i64,
}

impl CacheKey {
    #[inline]
    pub fn quantize(x: f64, y: f64, cell_size: f64) -> Self {
        let gx = (x / cell_size).floor() as i64;
        let gy = (y / cell_size).floor() as i64;
        Self::from_cell(gx, gy)
    }

    #[inline]
    pub const fn from_cell(gx: i64, gy: i64) -> Self {
        Self { gx, gy }
    }

    #[inline]
    pub const fn cell(self) -> (i64, i64) {
        (self.gx, self.gy)
    }

    /// Centre of the cell in world coordinates.
    #[inline]
    pub fn anchor(self, cell_size: f64) -> (f64, f64) {
        (
            (self.gx as f64 + 0.5) * cell_size,
            (self.gy as f64 + 0.5) * cell_size,
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub clears: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub buffer: CacheStats,
    pub base: CacheStats,
}

/// Bounded memo of a pure function of grid cells.
///
/// Values are always computed at the cell anchor, never at the coordinate that
/// happened to miss first, so a lookup returns the same value whether the
/// cache is cold, warm, or was just cleared. When the entry count reaches the
/// bound the whole table is dropped instead of tracking recency per entry.
pub struct GridCache<V> {
    name: &'static str,
    cell_size: f64,
    max_entries: usize,
    entries: DashMap<CacheKey, V, FxBuildHasher>,
    hits: AtomicU64,
    misses: AtomicU64,
    clears: AtomicU64,
}

impl<V: Copy> GridCache<V> {
    pub fn new(name: &'static str, cell_size: f64, max_entries: usize) -> Self {
        Self {
            name,
            cell_size,
            max_entries,
            entries: DashMap::with_hasher(FxBuildHasher),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            clears: AtomicU64::new(0),
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    pub fn key(&self, x: f64, y: f64) -> CacheKey {
        CacheKey::quantize(x, y, self.cell_size)
    }

    /// Cached value for the cell holding `(x, y)`; on a miss `compute` runs at
    /// the cell anchor.
    pub fn get_or_compute(&self, x: f64, y: f64, compute: impl FnOnce(f64, f64) -> V) -> V {
        let key = self.key(x, y);
        let cached = self.entries.get(&key).map(|entry| *entry.value());
        if let Some(value) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return value;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let (ax, ay) = key.anchor(self.cell_size);
        let value = compute(ax, ay);
        self.insert(key, value);
        value
    }

    fn insert(&self, key: CacheKey, value: V) {
        if self.entries.len() >= self.max_entries {
            self.entries.clear();
            let clears = self.clears.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(
                cache = self.name,
                bound = self.max_entries,
                clears,
                "Spatial cache reached its bound, cleared"
            );
        }
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
        }
    }
}

/// The two caches behind buffer validation: coarse cells for the verdicts,
/// fine cells for the base-biome probes those verdicts are built from.
pub struct SpatialMemo {
    pub(crate) buffer: GridCache<bool>,
    pub(crate) base: GridCache<TerrainCategory>,
}

impl SpatialMemo {
    pub fn new(settings: &MemoSettings) -> Self {
        Self {
            buffer: GridCache::new("buffer", settings.buffer_cell_size, settings.max_entries),
            base: GridCache::new("base", settings.base_cell_size, settings.max_entries),
        }
    }

    pub fn buffer(&self) -> &GridCache<bool> {
        &self.buffer
    }

    pub fn base(&self) -> &GridCache<TerrainCategory> {
        &self.base
    }

    /// Worst-case distance between a query point and the anchor that stands in
    /// for it, summed over both caches.
    pub fn quantization_slack(&self) -> f64 {
        (self.buffer.cell_size + self.base.cell_size) * std::f64::consts::FRAC_1_SQRT_2
    }

    pub fn clear(&self) {
        self.buffer.clear();
        self.base.clear();
    }

    pub fn stats(&self) -> MemoStats {
        MemoStats {
            buffer: self.buffer.stats(),
            base: self.base.stats(),
        }
    }
}
