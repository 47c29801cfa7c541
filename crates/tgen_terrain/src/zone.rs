use crate::biome::TerrainCategory;
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Euclidean distance of `(x, y)` from the world origin.
#[inline]
pub fn distance_from_origin(x: f64, y: f64) -> f64 {
    (x * x + y * y).sqrt()
}

/// A ring `[inner_radius, outer_radius)` around the origin with a forced
/// category.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneEntry {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub category: TerrainCategory,
}

impl ZoneEntry {
    pub const fn new(inner_radius: f64, outer_radius: f64, category: TerrainCategory) -> Self {
        Self {
            inner_radius,
            outer_radius,
            category,
        }
    }

    #[inline]
    pub fn contains(&self, distance: f64) -> bool {
        distance >= self.inner_radius && distance < self.outer_radius
    }
}

/// Fixed zones near the origin, innermost first. Past the last entry the table
/// has no opinion and procedural classification decides.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneTable {
    entries: Vec<ZoneEntry>,
}

impl ZoneTable {
    pub fn new(entries: Vec<ZoneEntry>) -> Result<Self, ConfigError> {
        let mut expected_inner = 0.0;
        for (index, entry) in entries.iter().enumerate() {
            if !entry.inner_radius.is_finite() || !entry.outer_radius.is_finite() {
                return Err(ConfigError::ZoneNotFinite { index });
            }
            if entry.inner_radius > expected_inner {
                return Err(ConfigError::ZoneGap {
                    index,
                    expected: expected_inner,
                    found: entry.inner_radius,
                });
            }
            if entry.inner_radius < expected_inner {
                return Err(ConfigError::ZoneOverlap {
                    index,
                    expected: expected_inner,
                    found: entry.inner_radius,
                });
            }
            if entry.outer_radius <= entry.inner_radius {
                return Err(ConfigError::ZoneEmpty { index });
            }
            if entry.category == TerrainCategory::Water {
                return Err(ConfigError::ZoneForcesWater { index });
            }
            expected_inner = entry.outer_radius;
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ZoneEntry] {
        &self.entries
    }

    /// Forced category at `distance` from the origin, or `None` to defer to
    /// procedural classification.
    #[inline]
    pub fn zone_for(&self, distance: f64) -> Option<TerrainCategory> {
        self.entries
            .iter()
            .find(|entry| entry.contains(distance))
            .map(|entry| entry.category)
    }

    #[inline]
    pub fn zone_for_point(&self, x: f64, y: f64) -> Option<TerrainCategory> {
        self.zone_for(distance_from_origin(x, y))
    }

    /// Outer radius of the innermost (spawn) zone.
    pub fn safe_radius(&self) -> f64 {
        self.entries.first().map_or(0.0, |entry| entry.outer_radius)
    }

    /// Radius beyond which no zone applies.
    pub fn procedural_radius(&self) -> f64 {
        self.entries.last().map_or(0.0, |entry| entry.outer_radius)
    }
}

#[cfg(test)]
mod test {
    use crate::biome::TerrainCategory::{Grass, Sand, Water};
    use crate::config::ConfigError;
    use crate::zone::{ZoneEntry, ZoneTable, distance_from_origin};

    fn spawn_table() -> ZoneTable {
        ZoneTable::new(vec![
            ZoneEntry::new(0.0, 500.0, Grass),
            ZoneEntry::new(500.0, 1000.0, Sand),
        ])
        .unwrap()
    }

    #[test]
    fn forced_zones() {
        let table = spawn_table();
        assert_eq!(table.zone_for(0.0), Some(Grass));
        assert_eq!(table.zone_for(499.999), Some(Grass));
        assert_eq!(table.zone_for(500.0), Some(Sand));
        assert_eq!(table.zone_for(999.0), Some(Sand));
        assert_eq!(table.zone_for(1000.0), None);
        assert_eq!(table.zone_for(1.0e9), None);
        assert_eq!(table.safe_radius(), 500.0);
        assert_eq!(table.procedural_radius(), 1000.0);
    }

    #[test]
    fn point_lookup_uses_euclidean_distance() {
        let table = spawn_table();
        assert_eq!(distance_from_origin(300.0, 400.0), 500.0);
        assert_eq!(table.zone_for_point(300.0, 400.0), Some(Sand));
        assert_eq!(table.zone_for_point(-299.0, 399.0), Some(Grass));
        assert_eq!(table.zone_for_point(600.0, -800.0), None);
    }

    #[test]
    fn empty_table_defers_everywhere() {
        let table = ZoneTable::new(vec![]).unwrap();
        assert_eq!(table.zone_for(0.0), None);
        assert_eq!(table.safe_radius(), 0.0);
    }

    #[test]
    fn gaps_and_overlaps_are_rejected() {
        let gap = ZoneTable::new(vec![
            ZoneEntry::new(0.0, 500.0, Grass),
            ZoneEntry::new(600.0, 1000.0, Sand),
        ]);
        assert!(matches!(gap, Err(ConfigError::ZoneGap { index: 1, .. })));

        let overlap = ZoneTable::new(vec![
            ZoneEntry::new(0.0, 500.0, Grass),
            ZoneEntry::new(400.0, 1000.0, Sand),
        ]);
        assert!(matches!(overlap, Err(ConfigError::ZoneOverlap { index: 1, .. })));

        let detached = ZoneTable::new(vec![ZoneEntry::new(10.0, 500.0, Grass)]);
        assert!(matches!(detached, Err(ConfigError::ZoneGap { index: 0, .. })));
    }

    #[test]
    fn degenerate_zones_are_rejected() {
        let empty = ZoneTable::new(vec![ZoneEntry::new(0.0, 0.0, Grass)]);
        assert!(matches!(empty, Err(ConfigError::ZoneEmpty { index: 0 })));

        let water = ZoneTable::new(vec![ZoneEntry::new(0.0, 10.0, Water)]);
        assert!(matches!(water, Err(ConfigError::ZoneForcesWater { index: 0 })));

        let infinite = ZoneTable::new(vec![ZoneEntry::new(0.0, f64::INFINITY, Grass)]);
        assert!(matches!(infinite, Err(ConfigError::ZoneNotFinite { index: 0 })));
    }
}
