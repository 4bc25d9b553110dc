use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::gas::GasMix;

/// Permitted drift when checking that the three gas fractions sum to 100%.
const GAS_SUM_TOLERANCE: f64 = 0.01;

/// Permitted drift when checking a declared-air mix against 21/79.
const AIR_MIX_TOLERANCE: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiveId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterType {
    Fresh,
    Salt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GasType {
    Air,
    Nitrox,
}

/// User-supplied dive summary, as entered in the logging form.
///
/// This is the staging-area shape: everything the engine needs to derive gas
/// metrics, a decompression schedule, and a plottable profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiveInput {
    pub location: String,
    pub date: DateTime<Utc>,
    /// Maximum depth in metres.
    pub max_depth: f64,
    /// Total dive time in minutes.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_type: Option<WaterType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Starting tank pressure in bar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_pressure: Option<f64>,
    /// Ending tank pressure in bar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_pressure: Option<f64>,
    /// Tank volume in litres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_volume: Option<f64>,
    pub oxygen_percentage: f64,
    pub nitrogen_percentage: f64,
    pub helium_percentage: f64,
    pub gas_type: GasType,
}

impl DiveInput {
    /// Build an input with the air defaults (21/79/0) and no tank data.
    pub fn new(
        location: impl Into<String>,
        date: DateTime<Utc>,
        max_depth: f64,
        duration: f64,
    ) -> Self {
        DiveInput {
            location: location.into(),
            date,
            max_depth,
            duration,
            water_temp: None,
            water_type: None,
            notes: None,
            start_pressure: None,
            end_pressure: None,
            tank_volume: None,
            oxygen_percentage: 21.0,
            nitrogen_percentage: 79.0,
            helium_percentage: 0.0,
            gas_type: GasType::Air,
        }
    }

    pub fn gas_mix(&self) -> GasMix {
        GasMix {
            o2_pct: self.oxygen_percentage,
            n2_pct: self.nitrogen_percentage,
            he_pct: self.helium_percentage,
        }
    }

    /// Check the summary before it is allowed into the pending queue.
    ///
    /// The physics components are total functions over validated input, so
    /// every rejection happens here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.location.trim().is_empty() {
            return Err(ValidationError::EmptyLocation);
        }
        if !self.max_depth.is_finite() || self.max_depth < 0.0 {
            return Err(ValidationError::InvalidMaxDepth(self.max_depth));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ValidationError::InvalidDuration(self.duration));
        }

        let percentages = [
            ("oxygen", self.oxygen_percentage),
            ("nitrogen", self.nitrogen_percentage),
            ("helium", self.helium_percentage),
        ];
        for (gas, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                return Err(ValidationError::PercentageOutOfRange { gas, value });
            }
        }
        let sum = self.oxygen_percentage + self.nitrogen_percentage + self.helium_percentage;
        if (sum - 100.0).abs() > GAS_SUM_TOLERANCE {
            return Err(ValidationError::GasSumMismatch(sum));
        }

        match self.gas_type {
            GasType::Air => {
                if (self.oxygen_percentage - 21.0).abs() > AIR_MIX_TOLERANCE
                    || (self.nitrogen_percentage - 79.0).abs() > AIR_MIX_TOLERANCE
                {
                    return Err(ValidationError::NotAir);
                }
            }
            GasType::Nitrox => {
                if !(21.0..=40.0).contains(&self.oxygen_percentage) {
                    return Err(ValidationError::NitroxOxygenRange(self.oxygen_percentage));
                }
            }
        }

        if let Some(value) = self.start_pressure {
            if !(0.0..=300.0).contains(&value) {
                return Err(ValidationError::PressureOutOfRange {
                    field: "start",
                    value,
                });
            }
        }
        if let Some(value) = self.end_pressure {
            if !(0.0..=300.0).contains(&value) {
                return Err(ValidationError::PressureOutOfRange {
                    field: "end",
                    value,
                });
            }
            if let Some(start) = self.start_pressure {
                if value > start {
                    return Err(ValidationError::EndPressureExceedsStart { start, end: value });
                }
            }
        }
        if let Some(volume) = self.tank_volume {
            if !(0.0..=20.0).contains(&volume) {
                return Err(ValidationError::TankVolumeOutOfRange(volume));
            }
        }

        Ok(())
    }
}

/// Gas metrics derived for the dive's maximum depth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GasInfo {
    /// Partial pressure of oxygen at depth, in bar.
    pub ppo2_at_depth: f64,
    /// Equivalent narcotic depth in metres.
    pub end: f64,
    pub warnings: Vec<String>,
}

/// A single decompression stop on the way to the surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecoStop {
    /// Stop depth in metres.
    pub depth: f64,
    /// Stop duration in minutes.
    pub duration: u32,
}

/// Decompression obligations derived from depth, duration and gas mix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecompressionInfo {
    /// No-decompression limit in minutes.
    pub no_deco_limit: u32,
    pub pressure_group: String,
    /// Sum of stop durations in minutes; 0 when not a deco dive.
    pub total_deco_time: u32,
    /// Stops in shallow-to-surface order (deepest first).
    pub stops: Vec<DecoStop>,
    pub requires_safety_stop: bool,
    pub is_deco_dive: bool,
    pub gas_info: GasInfo,
}

/// Discretized depth/time trace for plotting.
///
/// `depth_data` and `time_data` pair positionally; both endpoints sit at the
/// surface and the final label encodes the dive duration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiveProfile {
    pub depth_data: Vec<f64>,
    /// Time labels as `mm:ss`, non-decreasing.
    pub time_data: Vec<String>,
}

/// The persisted, displayable dive record.
///
/// Field names are the wire contract shared with the display and export
/// collaborators; the persistence collaborator assigns `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiveSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DiveId>,
    pub location: String,
    pub date: DateTime<Utc>,
    pub max_depth: f64,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_type: Option<WaterType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub depth_data: Vec<f64>,
    pub time_data: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_pressure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_pressure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_volume: Option<f64>,
    /// Average surface-equivalent gas consumption in litres per minute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_consumption: Option<f64>,
    pub oxygen_percentage: f64,
    pub nitrogen_percentage: f64,
    pub helium_percentage: f64,
    pub gas_type: GasType,
    pub decompression_info: DecompressionInfo,
}
