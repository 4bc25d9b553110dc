#![forbid(unsafe_code)]

//! Dive profile and decompression analysis engine for the dive log
//! application.
//!
//! Given a dive summary (depth, duration, gas mixture) this crate derives
//! gas-physiology metrics and decompression obligations, synthesizes a
//! plottable depth/time trace, and drives the batch-save workflow against a
//! pluggable persistence collaborator.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use divelog_engine::{DiveInput, DiveRecordAssembler, MemoryStore};
//!
//! let mut assembler = DiveRecordAssembler::new(MemoryStore::new());
//! let date = Utc.with_ymd_and_hms(2024, 7, 14, 9, 30, 0).unwrap();
//! assembler
//!     .stage(DiveInput::new("Blue Hole", date, 30.0, 25.0))
//!     .expect("summary should validate");
//!
//! let report = assembler.commit_all();
//! assert!(report.fully_drained());
//!
//! let session = &assembler.confirmed()[0];
//! assert_eq!(session.depth_data.len(), 6);
//! assert!(!session.decompression_info.is_deco_dive);
//! ```

pub mod assembler;
pub mod deco;
pub mod error;
pub mod gas;
pub mod logging;
pub mod models;
pub mod profile;
pub mod storage;

pub use assembler::{CommitFailure, CommitPolicy, CommitReport, DiveRecordAssembler};
pub use deco::{DecoModel, DecoTable, NdlEntry, StopRule};
pub use error::{StoreError, TableError, ValidationError};
pub use gas::GasMix;
pub use models::{
    DecoStop, DecompressionInfo, DiveId, DiveInput, DiveProfile, DiveSession, GasInfo, GasType,
    WaterType,
};
pub use storage::{DiveStore, MemoryStore};
