use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Filter presets – fixed catalog of strictness levels
// ---------------------------------------------------------------------------

/// Level selected when nothing else is configured ("Strict").
pub const DEFAULT_LEVEL: i64 = 2;

/// Raised when a level outside the catalog is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid filter level {0} (expected 1-4)")]
pub struct InvalidLevel(pub i64);

/// One strictness tier: a named bundle of filtering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterPreset {
    pub level: u8,
    pub name: &'static str,
    pub description: &'static str,
    /// Rows discarded from the start of the series.
    pub head_drop: u32,
    pub mad_multiplier_rtof: f64,
    pub cps_threshold_rtof: f64,
    pub mad_multiplier_dfms: f64,
    pub cps_threshold_dfms: f64,
}

/// The catalog, ordered by level. Lower level filters more aggressively.
pub static PRESETS: [FilterPreset; 4] = [
    FilterPreset {
        level: 1,
        name: "Very Strict",
        description: "Very aggressive filtering: removes most outliers and artefacts. \
                      Best for very clean signals.",
        head_drop: 15,
        mad_multiplier_rtof: 5.0,
        cps_threshold_rtof: 3.0,
        mad_multiplier_dfms: 5.0,
        cps_threshold_dfms: 5_000.0,
    },
    FilterPreset {
        level: 2,
        name: "Strict",
        description: "Standard filtering: balances cleanliness and data retention. \
                      Recommended for general use.",
        head_drop: 10,
        mad_multiplier_rtof: 10.0,
        cps_threshold_rtof: 5.0,
        mad_multiplier_dfms: 8.0,
        cps_threshold_dfms: 10_000.0,
    },
    FilterPreset {
        level: 3,
        name: "Moderate",
        description: "Moderate filtering: keeps more weak but real signals. \
                      Useful when more data is needed.",
        head_drop: 8,
        mad_multiplier_rtof: 15.0,
        cps_threshold_rtof: 8.0,
        mad_multiplier_dfms: 12.0,
        cps_threshold_dfms: 20_000.0,
    },
    FilterPreset {
        level: 4,
        name: "Permissive",
        description: "Permissive filtering: keeps most of the data. \
                      Useful for detailed analysis of weak signals.",
        head_drop: 5,
        mad_multiplier_rtof: 20.0,
        cps_threshold_rtof: 12.0,
        mad_multiplier_dfms: 15.0,
        cps_threshold_dfms: 50_000.0,
    },
];

/// Look up the preset for `level`.
pub fn get(level: i64) -> Result<&'static FilterPreset, InvalidLevel> {
    PRESETS
        .iter()
        .find(|p| i64::from(p.level) == level)
        .ok_or(InvalidLevel(level))
}

/// All presets in level order.
pub fn all() -> impl Iterator<Item = &'static FilterPreset> {
    PRESETS.iter()
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (level {})", self.name, self.level)
    }
}

// ---------------------------------------------------------------------------
// Numeric formatting
// ---------------------------------------------------------------------------

/// Canonical wire encoding for a parameter value.
///
/// Uses the shortest decimal that round-trips, never exponential notation,
/// and drops the fractional part of integral values: `10000`, `8`, `2.5`.
pub fn wire_number(value: f64) -> String {
    format!("{value}")
}

/// Display-only rendering of a cps threshold: exponential with one fractional
/// digit from 1000 upwards (`1.0e4`), plain below that.
pub fn display_threshold(value: f64) -> String {
    if value >= 1_000.0 {
        format!("{value:.1e}")
    } else {
        wire_number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_rows_match_table() {
        let rows: Vec<(u8, &str, u32, f64, f64, f64, f64)> = all()
            .map(|p| {
                (
                    p.level,
                    p.name,
                    p.head_drop,
                    p.mad_multiplier_rtof,
                    p.cps_threshold_rtof,
                    p.mad_multiplier_dfms,
                    p.cps_threshold_dfms,
                )
            })
            .collect();

        assert_eq!(
            rows,
            vec![
                (1, "Very Strict", 15, 5.0, 3.0, 5.0, 5000.0),
                (2, "Strict", 10, 10.0, 5.0, 8.0, 10000.0),
                (3, "Moderate", 8, 15.0, 8.0, 12.0, 20000.0),
                (4, "Permissive", 5, 20.0, 12.0, 15.0, 50000.0),
            ]
        );
    }

    #[test]
    fn get_resolves_every_level() {
        for level in 1..=4 {
            let preset = get(level).unwrap();
            assert_eq!(i64::from(preset.level), level);
        }
    }

    #[test]
    fn get_rejects_levels_outside_catalog() {
        for level in [0, 5, -1, 42, i64::MAX, i64::MIN] {
            assert_eq!(get(level), Err(InvalidLevel(level)));
        }
    }

    #[test]
    fn default_level_is_strict() {
        assert_eq!(get(DEFAULT_LEVEL).unwrap().name, "Strict");
    }

    #[test]
    fn parameters_loosen_with_level() {
        let presets: Vec<_> = all().collect();
        for pair in presets.windows(2) {
            assert!(pair[0].head_drop > pair[1].head_drop);
            assert!(pair[0].cps_threshold_dfms < pair[1].cps_threshold_dfms);
        }
    }

    #[test]
    fn wire_number_is_plain_decimal() {
        assert_eq!(wire_number(10_000.0), "10000");
        assert_eq!(wire_number(50_000.0), "50000");
        assert_eq!(wire_number(8.0), "8");
        assert_eq!(wire_number(2.5), "2.5");
        assert_eq!(wire_number(1e21), "1000000000000000000000");
    }

    #[test]
    fn display_threshold_switches_to_exponential() {
        assert_eq!(display_threshold(10_000.0), "1.0e4");
        assert_eq!(display_threshold(5_000.0), "5.0e3");
        assert_eq!(display_threshold(999.0), "999");
    }
}
