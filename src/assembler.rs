//! Staging and batch persistence of dive records.
//!
//! The assembler owns two collections: a pending queue of validated inputs
//! that have not been persisted, and the confirmed sessions available for
//! display. `commit_all` drains the queue strictly in order, one persistence
//! call at a time, and reports partial progress as a value rather than an
//! unwound error: successes move to the confirmed list, failures stay
//! staged for a later retry.

use crate::deco::DecoModel;
use crate::error::{StoreError, ValidationError};
use crate::gas;
use crate::models::{DiveInput, DiveSession};
use crate::profile;
use crate::storage::DiveStore;

/// What the commit loop does after a persistence failure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Keep attempting the remaining entries, collecting every success.
    #[default]
    ContinuePastFailure,
    /// Leave everything after the first failure untouched in the queue.
    StopOnFirstFailure,
}

/// One entry that failed to persist. The input also remains in the pending
/// queue; the copy here carries the error for reporting.
#[derive(Clone, Debug)]
pub struct CommitFailure {
    pub input: DiveInput,
    pub error: StoreError,
}

/// Outcome of a batch commit: partial progress as an inspectable value.
#[derive(Debug, Default)]
pub struct CommitReport {
    /// Newly confirmed sessions, in queue order.
    pub committed: Vec<DiveSession>,
    /// Entries whose persistence call failed.
    pub failures: Vec<CommitFailure>,
    /// Entries never attempted because the policy stopped the loop.
    pub unattempted: usize,
}

impl CommitReport {
    pub fn fully_drained(&self) -> bool {
        self.failures.is_empty() && self.unattempted == 0
    }
}

/// Owns the construction sequence from validated input to persisted session.
pub struct DiveRecordAssembler<S> {
    store: S,
    deco: DecoModel,
    policy: CommitPolicy,
    pending: Vec<DiveInput>,
    confirmed: Vec<DiveSession>,
}

impl<S: DiveStore> DiveRecordAssembler<S> {
    pub fn new(store: S) -> Self {
        DiveRecordAssembler {
            store,
            deco: DecoModel::default(),
            policy: CommitPolicy::default(),
            pending: Vec::new(),
            confirmed: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: CommitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_deco_model(mut self, deco: DecoModel) -> Self {
        self.deco = deco;
        self
    }

    pub fn pending(&self) -> &[DiveInput] {
        &self.pending
    }

    pub fn confirmed(&self) -> &[DiveSession] {
        &self.confirmed
    }

    /// Validate an input and append it to the pending queue. No network
    /// effect; a rejected input never enters the queue.
    pub fn stage(&mut self, input: DiveInput) -> Result<(), ValidationError> {
        input.validate()?;
        tracing::debug!(location = %input.location, "staged dive");
        self.pending.push(input);
        Ok(())
    }

    /// Remove one pending entry by position.
    pub fn unstage(&mut self, index: usize) -> Option<DiveInput> {
        if index < self.pending.len() {
            Some(self.pending.remove(index))
        } else {
            None
        }
    }

    /// Run the full construction sequence for one validated input:
    /// gas metrics, then the deco classification, then the synthesized
    /// trace, merged into an unpersisted session.
    pub fn assemble(&self, input: &DiveInput) -> DiveSession {
        let mix = input.gas_mix();
        let gas_info = mix.compute(input.max_depth);
        let decompression_info = self
            .deco
            .compute(input.max_depth, input.duration, &mix, gas_info);
        let trace = profile::synthesize(input.max_depth, input.duration);

        DiveSession {
            id: None,
            location: input.location.clone(),
            date: input.date,
            max_depth: input.max_depth,
            duration: input.duration,
            water_temp: input.water_temp,
            water_type: input.water_type,
            notes: input.notes.clone(),
            depth_data: trace.depth_data,
            time_data: trace.time_data,
            start_pressure: input.start_pressure,
            end_pressure: input.end_pressure,
            tank_volume: input.tank_volume,
            air_consumption: gas::air_consumption(input),
            oxygen_percentage: input.oxygen_percentage,
            nitrogen_percentage: input.nitrogen_percentage,
            helium_percentage: input.helium_percentage,
            gas_type: input.gas_type,
            decompression_info,
        }
    }

    /// Persist every pending entry, strictly in queue order, one at a time.
    ///
    /// Entry `i + 1` is not attempted until entry `i` has resolved. Failed
    /// entries (and, under [`CommitPolicy::StopOnFirstFailure`], everything
    /// after the first failure) remain in the pending queue in their
    /// original relative order. Exclusive access on `&mut self` means no
    /// staging or unstaging can interleave with an in-flight commit.
    pub fn commit_all(&mut self) -> CommitReport {
        let queue = std::mem::take(&mut self.pending);
        tracing::info!(entries = queue.len(), "committing staged dives");

        let mut report = CommitReport::default();
        let mut still_pending = Vec::new();

        let mut entries = queue.into_iter();
        for input in entries.by_ref() {
            let session = self.assemble(&input);
            match self.store.create(session) {
                Ok(stored) => {
                    tracing::debug!(location = %input.location, id = ?stored.id, "dive confirmed");
                    self.confirmed.push(stored.clone());
                    report.committed.push(stored);
                }
                Err(error) => {
                    tracing::warn!(
                        location = %input.location,
                        %error,
                        "dive failed to persist, keeping it staged"
                    );
                    report.failures.push(CommitFailure {
                        input: input.clone(),
                        error,
                    });
                    still_pending.push(input);
                    if self.policy == CommitPolicy::StopOnFirstFailure {
                        break;
                    }
                }
            }
        }

        let untouched: Vec<DiveInput> = entries.collect();
        report.unattempted = untouched.len();
        still_pending.extend(untouched);
        self.pending = still_pending;

        tracing::info!(
            committed = report.committed.len(),
            failed = report.failures.len(),
            unattempted = report.unattempted,
            "batch commit finished"
        );
        report
    }
}
