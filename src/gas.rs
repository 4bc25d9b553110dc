//! Gas-mix physics for a dive summary.
//!
//! Pure functions over the breathing-gas fractions and the maximum depth:
//! partial pressure of oxygen, equivalent narcotic depth, the warnings the
//! form surfaces to the diver, and the tank-based consumption estimate.

use crate::models::{DiveInput, GasInfo};

// ============================================================================
// Physical Constants
// ============================================================================

/// Fraction of N2 in air, used as the reference for equivalent air depth.
const AIR_FN2: f64 = 0.79;

/// Recommended working limit for the partial pressure of oxygen (bar).
pub const MAX_RECOMMENDED_PPO2: f64 = 1.4;

/// Hard limit for the partial pressure of oxygen (bar).
pub const MAX_PPO2: f64 = 1.6;

/// Maximum equivalent narcotic depth before a narcosis warning (metres).
pub const MAX_END_M: f64 = 30.0;

/// Absolute pressure in bar at a depth in metres of seawater: one atmosphere
/// at the surface plus one bar per 10 m.
pub fn absolute_pressure(depth_m: f64) -> f64 {
    depth_m / 10.0 + 1.0
}

// ============================================================================
// Gas Mix
// ============================================================================

/// A breathing-gas mixture as O2/N2/He percentages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GasMix {
    pub o2_pct: f64,
    pub n2_pct: f64,
    pub he_pct: f64,
}

impl GasMix {
    pub const AIR: GasMix = GasMix {
        o2_pct: 21.0,
        n2_pct: 79.0,
        he_pct: 0.0,
    };

    fn o2_fraction(&self) -> f64 {
        self.o2_pct / 100.0
    }

    fn n2_fraction(&self) -> f64 {
        self.n2_pct / 100.0
    }

    /// Narcotic fraction of the mix: everything except helium.
    fn narcotic_fraction(&self) -> f64 {
        (self.o2_pct + self.n2_pct) / 100.0
    }

    /// Derive the gas metrics for this mix at the given depth.
    ///
    /// Total over any validated mix; warnings append in rule order.
    pub fn compute(&self, depth_m: f64) -> GasInfo {
        let pressure = absolute_pressure(depth_m);
        let ppo2_at_depth = pressure * self.o2_fraction();

        // Equivalent narcotic depth: the depth at which air would exert the
        // same narcotic pressure as this mix at `depth_m`. Floored at the
        // surface; on air it equals the depth itself.
        let end = (pressure * self.narcotic_fraction() * 10.0 - 10.0).max(0.0);

        let mut warnings = Vec::new();
        if ppo2_at_depth > MAX_RECOMMENDED_PPO2 {
            warnings.push("PPO2 exceeds recommended maximum (1.4 bar)".to_string());
        }
        if ppo2_at_depth > MAX_PPO2 {
            warnings.push("PPO2 exceeds hard limit (1.6 bar)".to_string());
        }
        if end > MAX_END_M {
            warnings.push("END exceeds maximum narcotic depth (30 m)".to_string());
        }

        GasInfo {
            ppo2_at_depth,
            end,
            warnings,
        }
    }

    /// Equivalent air depth: the depth at which air would carry the same
    /// nitrogen loading as this mix at `depth_m`. Used to adjust the
    /// no-decompression limit for enriched mixes; identity on air.
    pub fn equivalent_air_depth(&self, depth_m: f64) -> f64 {
        // The ratio is computed first so an air mix maps a table breakpoint
        // onto itself exactly.
        let n2_ratio = self.n2_fraction() / AIR_FN2;
        ((depth_m + 10.0) * n2_ratio - 10.0).max(0.0)
    }
}

// ============================================================================
// Air Consumption
// ============================================================================

/// Average surface-equivalent consumption rate in litres per minute, from the
/// tank pressure drop over the dive.
///
/// Uses the pressure at half the maximum depth as the working pressure and
/// corrects the tank volume for water temperature against a 20 °C reference.
/// Returns `None` unless every tank field is present and the dive has a
/// non-zero duration.
pub fn air_consumption(input: &DiveInput) -> Option<f64> {
    let start_pressure = input.start_pressure?;
    let end_pressure = input.end_pressure?;
    let tank_volume = input.tank_volume?;
    let water_temp = input.water_temp?;
    if input.duration <= 0.0 {
        return None;
    }

    let avg_depth = input.max_depth / 2.0;
    let pressure_at_depth = absolute_pressure(avg_depth);

    let gas_used = (start_pressure - end_pressure) * tank_volume;

    let temp_kelvin = water_temp + 273.15;
    let standard_temp_kelvin = 293.15;
    let temp_correction = temp_kelvin / standard_temp_kelvin;

    let actual_volume = gas_used * pressure_at_depth * temp_correction;
    Some(actual_volume / input.duration)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    const EPS: f64 = 1e-6;

    fn ean(o2: f64) -> GasMix {
        GasMix {
            o2_pct: o2,
            n2_pct: 100.0 - o2,
            he_pct: 0.0,
        }
    }

    #[test]
    fn test_ppo2_air_at_30m() {
        let info = GasMix::AIR.compute(30.0);
        assert!((info.ppo2_at_depth - 0.84).abs() < EPS);
    }

    #[test]
    fn test_end_on_air_equals_depth() {
        for depth in [0.0, 5.0, 10.0, 18.0, 30.0, 42.5] {
            let info = GasMix::AIR.compute(depth);
            assert!(
                (info.end - depth).abs() < EPS,
                "END on air at {depth}m should be {depth}, got {}",
                info.end
            );
        }
    }

    #[test]
    fn test_end_floors_at_surface() {
        // Helium dilutes the narcotic fraction; near the surface the raw
        // formula would go negative.
        let trimix = GasMix {
            o2_pct: 21.0,
            n2_pct: 44.0,
            he_pct: 35.0,
        };
        let info = trimix.compute(0.0);
        assert_eq!(info.end, 0.0);
    }

    #[test]
    fn test_trimix_reduces_end() {
        let trimix = GasMix {
            o2_pct: 21.0,
            n2_pct: 44.0,
            he_pct: 35.0,
        };
        let info = trimix.compute(60.0);
        // P = 7 bar, narcotic fraction 0.65: END = 7 * 0.65 * 10 - 10
        assert!((info.end - 35.5).abs() < EPS);
    }

    #[test]
    fn test_no_warnings_within_limits() {
        let info = GasMix::AIR.compute(30.0);
        assert!(info.warnings.is_empty());

        let info = ean(32.0).compute(30.0);
        assert!(info.warnings.is_empty());
    }

    #[test]
    fn test_ppo2_warning_order() {
        // Air at 57 m: PPO2 = 6.7 * 0.21 = 1.407, END = 57.
        let info = GasMix::AIR.compute(57.0);
        assert_eq!(
            info.warnings,
            vec![
                "PPO2 exceeds recommended maximum (1.4 bar)".to_string(),
                "END exceeds maximum narcotic depth (30 m)".to_string(),
            ]
        );

        // Air at 70 m trips the hard limit as well: PPO2 = 8 * 0.21 = 1.68.
        let info = GasMix::AIR.compute(70.0);
        assert_eq!(info.warnings.len(), 3);
        assert_eq!(
            info.warnings[0],
            "PPO2 exceeds recommended maximum (1.4 bar)"
        );
        assert_eq!(info.warnings[1], "PPO2 exceeds hard limit (1.6 bar)");
    }

    #[test]
    fn test_ean50_ppo2_warning_shallow() {
        // EAN50 at 24 m: PPO2 = 3.4 * 0.5 = 1.7, but END = 24 stays legal.
        let info = ean(50.0).compute(24.0);
        assert_eq!(info.warnings.len(), 2);
        assert!(info.warnings.iter().all(|w| w.starts_with("PPO2")));
    }

    #[test]
    fn test_equivalent_air_depth() {
        // Identity on air.
        for depth in [0.0, 18.0, 30.0] {
            assert!((GasMix::AIR.equivalent_air_depth(depth) - depth).abs() < EPS);
        }

        // EAN36 at 30 m: (40 * 0.64 / 0.79) - 10.
        let ead = ean(36.0).equivalent_air_depth(30.0);
        assert!((ead - 22.405_063_291_139_24).abs() < 1e-9);

        // Floored at the surface for very lean nitrogen near 0 m.
        let ead = ean(40.0).equivalent_air_depth(0.0);
        assert_eq!(ead, 0.0);
    }

    #[test]
    fn test_air_consumption() {
        let mut input = DiveInput::new(
            "Quarry",
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            20.0,
            40.0,
        );
        assert_eq!(air_consumption(&input), None);

        input.start_pressure = Some(200.0);
        input.end_pressure = Some(100.0);
        input.tank_volume = Some(10.0);
        input.water_temp = Some(20.0);

        // 100 bar * 10 L = 1000 L, at 2 bar working pressure, over 40 min.
        let rate = air_consumption(&input).unwrap();
        assert!((rate - 50.0).abs() < EPS);
    }

    #[test]
    fn test_air_consumption_zero_duration() {
        let mut input = DiveInput::new(
            "Quarry",
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            20.0,
            0.0,
        );
        input.start_pressure = Some(200.0);
        input.end_pressure = Some(100.0);
        input.tank_volume = Some(10.0);
        input.water_temp = Some(20.0);
        assert_eq!(air_consumption(&input), None);
    }
}
