use thiserror::Error;

/// Error type for dive input validation.
///
/// Raised at staging time; an input that fails validation never reaches the
/// physics components or the pending queue.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("location must not be empty")]
    EmptyLocation,

    #[error("max depth must be a finite number of metres >= 0, got {0}")]
    InvalidMaxDepth(f64),

    #[error("duration must be a finite number of minutes >= 0, got {0}")]
    InvalidDuration(f64),

    #[error("{gas} percentage must be between 0 and 100, got {value}")]
    PercentageOutOfRange { gas: &'static str, value: f64 },

    #[error("gas percentages must sum to 100, got {0}")]
    GasSumMismatch(f64),

    #[error("air must be 21% oxygen and 79% nitrogen")]
    NotAir,

    #[error("nitrox must contain between 21% and 40% oxygen, got {0}")]
    NitroxOxygenRange(f64),

    #[error("{field} pressure must be between 0 and 300 bar, got {value}")]
    PressureOutOfRange { field: &'static str, value: f64 },

    #[error("end pressure ({end}) cannot be greater than start pressure ({start})")]
    EndPressureExceedsStart { start: f64, end: f64 },

    #[error("tank volume must be between 0 and 20 litres, got {0}")]
    TankVolumeOutOfRange(f64),
}

/// Error type for the persistence collaborator.
///
/// Always scoped to a single dive entry; the failed entry stays staged and a
/// later commit may retry it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("store rejected the record: {0}")]
    Rejected(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Error type for loading a decompression table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("failed to parse deco table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("NDL breakpoints must be sorted by depth with non-increasing limits")]
    UnsortedNdl,

    #[error("deco table must define at least one NDL breakpoint")]
    EmptyNdl,

    #[error("deco table must define at least one pressure group")]
    EmptyPressureGroups,

    #[error("deco table must define at least one stop rule with a positive fraction")]
    EmptyStopSchedule,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::GasSumMismatch(97.5);
        assert_eq!(err.to_string(), "gas percentages must sum to 100, got 97.5");

        let err = ValidationError::PercentageOutOfRange {
            gas: "oxygen",
            value: 120.0,
        };
        assert_eq!(
            err.to_string(),
            "oxygen percentage must be between 0 and 100, got 120"
        );

        let err = ValidationError::EndPressureExceedsStart {
            start: 100.0,
            end: 150.0,
        };
        assert_eq!(
            err.to_string(),
            "end pressure (150) cannot be greater than start pressure (100)"
        );
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "store unavailable: connection refused");
    }
}
