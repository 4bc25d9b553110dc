//! Table-driven decompression rules.
//!
//! No tissue simulation happens here: the no-decompression limit, the
//! pressure group and the stop schedule all come from a bundled recreational
//! air table. The table is plain data (`DecoTable`) and can be replaced with
//! another agency's numbers, in code or from TOML, without touching the
//! algorithm shape.

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::gas::GasMix;
use crate::models::{DecoStop, DecompressionInfo, GasInfo};

/// Depth at or below which a no-deco dive still earns the recommended
/// 3-minute safety stop (metres).
const SAFETY_STOP_THRESHOLD_M: f64 = 10.0;

// ============================================================================
// Deco Table
// ============================================================================

/// One no-decompression-limit breakpoint: dives at or shallower than
/// `depth_m` (and deeper than the previous breakpoint) get `limit_min`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NdlEntry {
    pub depth_m: f64,
    pub limit_min: u32,
}

/// One rule of the stop schedule for dives past the limit: a stop at
/// `depth_m` for `fraction` of the excess minutes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopRule {
    pub depth_m: f64,
    pub fraction: f64,
}

/// The replaceable policy artifact behind [`DecoModel`].
///
/// Breakpoints must be sorted by depth with non-increasing limits; depths
/// past the last breakpoint have no remaining no-deco time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecoTable {
    #[serde(default = "default_ndl")]
    pub ndl: Vec<NdlEntry>,
    #[serde(default = "default_pressure_groups")]
    pub pressure_groups: Vec<String>,
    #[serde(default = "default_stop_rules")]
    pub stops: Vec<StopRule>,
    /// Floor for any scheduled stop, in minutes.
    #[serde(default = "default_min_stop_min")]
    pub min_stop_min: u32,
}

fn default_ndl() -> Vec<NdlEntry> {
    [
        (10.0, 219),
        (12.0, 147),
        (14.0, 98),
        (16.0, 72),
        (18.0, 56),
        (20.0, 45),
        (22.0, 37),
        (25.0, 29),
        (30.0, 25),
        (35.0, 14),
        (40.0, 9),
        (42.0, 8),
    ]
    .into_iter()
    .map(|(depth_m, limit_min)| NdlEntry { depth_m, limit_min })
    .collect()
}

fn default_pressure_groups() -> Vec<String> {
    ('A'..='M').map(String::from).collect()
}

fn default_stop_rules() -> Vec<StopRule> {
    vec![
        StopRule {
            depth_m: 5.0,
            fraction: 0.6,
        },
        StopRule {
            depth_m: 3.0,
            fraction: 0.4,
        },
    ]
}

fn default_min_stop_min() -> u32 {
    3
}

impl Default for DecoTable {
    fn default() -> Self {
        DecoTable {
            ndl: default_ndl(),
            pressure_groups: default_pressure_groups(),
            stops: default_stop_rules(),
            min_stop_min: default_min_stop_min(),
        }
    }
}

impl DecoTable {
    /// Parse a table from TOML and check its internal consistency.
    /// Omitted sections fall back to the bundled defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, TableError> {
        let table: DecoTable = toml::from_str(text)?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.ndl.is_empty() {
            return Err(TableError::EmptyNdl);
        }
        let sorted = self.ndl.windows(2).all(|pair| {
            pair[0].depth_m < pair[1].depth_m && pair[0].limit_min >= pair[1].limit_min
        });
        if !sorted {
            return Err(TableError::UnsortedNdl);
        }
        if self.pressure_groups.is_empty() {
            return Err(TableError::EmptyPressureGroups);
        }
        if self.stops.is_empty() || self.stops.iter().any(|rule| rule.fraction <= 0.0) {
            return Err(TableError::EmptyStopSchedule);
        }
        Ok(())
    }

    /// No-decompression limit for a depth, in minutes. 0 past the table.
    pub fn ndl_for_depth(&self, depth_m: f64) -> u32 {
        self.ndl
            .iter()
            .find(|entry| depth_m <= entry.depth_m)
            .map(|entry| entry.limit_min)
            .unwrap_or(0)
    }

    /// Pressure group after the dive, scaled by the fraction of the limit
    /// consumed. A dive with no remaining limit lands in the last group.
    pub fn pressure_group(&self, depth_m: f64, duration_min: f64) -> String {
        let last = self.pressure_groups.len() - 1;
        let ndl = self.ndl_for_depth(depth_m);
        let index = if ndl == 0 {
            last
        } else {
            let consumed = (duration_min / f64::from(ndl)).min(1.0);
            ((consumed * last as f64).floor() as usize).min(last)
        };
        self.pressure_groups[index].clone()
    }

    /// Stops for a dive `excess_min` minutes past its limit, deepest first.
    fn schedule_stops(&self, excess_min: f64) -> Vec<DecoStop> {
        self.stops
            .iter()
            .map(|rule| DecoStop {
                depth: rule.depth_m,
                duration: ((excess_min * rule.fraction).ceil() as u32).max(self.min_stop_min),
            })
            .collect()
    }
}

// ============================================================================
// Deco Model
// ============================================================================

/// Classifies a dive against the table and derives its obligations.
#[derive(Clone, Debug, Default)]
pub struct DecoModel {
    table: DecoTable,
}

impl DecoModel {
    pub fn new(table: DecoTable) -> Self {
        DecoModel { table }
    }

    pub fn table(&self) -> &DecoTable {
        &self.table
    }

    /// Derive the decompression obligations for a dive summary.
    ///
    /// The limit is looked up at the mix's equivalent air depth, which is the
    /// depth itself on air, so enriched mixes earn their longer limits from
    /// the same table. Total over validated input.
    pub fn compute(
        &self,
        depth_m: f64,
        duration_min: f64,
        mix: &GasMix,
        gas_info: GasInfo,
    ) -> DecompressionInfo {
        let ead = mix.equivalent_air_depth(depth_m);
        let no_deco_limit = self.table.ndl_for_depth(ead);
        let pressure_group = self.table.pressure_group(ead, duration_min);

        let is_deco_dive = duration_min > 0.0 && duration_min > f64::from(no_deco_limit);

        let (stops, total_deco_time, requires_safety_stop) = if is_deco_dive {
            let stops = self
                .table
                .schedule_stops(duration_min - f64::from(no_deco_limit));
            let total = stops.iter().map(|stop| stop.duration).sum();
            // A deco dive always carries the final stop.
            (stops, total, true)
        } else {
            let safety = duration_min > 0.0 && depth_m >= SAFETY_STOP_THRESHOLD_M;
            (Vec::new(), 0, safety)
        };

        tracing::debug!(
            depth_m,
            duration_min,
            ead,
            no_deco_limit,
            is_deco_dive,
            "classified dive against deco table"
        );

        DecompressionInfo {
            no_deco_limit,
            pressure_group,
            total_deco_time,
            stops,
            requires_safety_stop,
            is_deco_dive,
            gas_info,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
