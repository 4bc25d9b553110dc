use crate::error::StoreError;
use crate::models::{DiveId, DiveSession};

/// The persistence collaborator.
///
/// The engine needs exactly two operations: persist a new session (identity
/// assigned by the store) and read back the stored collection. Transport is
/// the caller's concern.
pub trait DiveStore {
    fn create(&mut self, session: DiveSession) -> Result<DiveSession, StoreError>;
    fn list(&self) -> Result<Vec<DiveSession>, StoreError>;
}

/// In-memory store with sequential identities.
///
/// Backs tests and offline use; create calls can be told to fail so batch
/// partial-failure paths are exercisable without a real backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<DiveSession>,
    next_id: i64,
    create_calls: usize,
    fail_calls: Vec<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails the given create calls (0-based, counted across
    /// the store's lifetime) and succeeds otherwise.
    pub fn failing_on(calls: &[usize]) -> Self {
        MemoryStore {
            fail_calls: calls.to_vec(),
            ..Self::default()
        }
    }
}

impl DiveStore for MemoryStore {
    fn create(&mut self, mut session: DiveSession) -> Result<DiveSession, StoreError> {
        let call = self.create_calls;
        self.create_calls += 1;
        if self.fail_calls.contains(&call) {
            return Err(StoreError::Unavailable("injected fault".to_string()));
        }

        self.next_id += 1;
        session.id = Some(DiveId(self.next_id));
        self.records.push(session.clone());
        Ok(session)
    }

    fn list(&self) -> Result<Vec<DiveSession>, StoreError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::DiveRecordAssembler;
    use crate::models::DiveInput;
    use chrono::DateTime;

    fn session(location: &str) -> DiveSession {
        let input = DiveInput::new(
            location,
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            18.0,
            35.0,
        );
        DiveRecordAssembler::new(MemoryStore::new()).assemble(&input)
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut store = MemoryStore::new();
        let first = store.create(session("Reef")).unwrap();
        let second = store.create(session("Wall")).unwrap();
        assert_eq!(first.id, Some(DiveId(1)));
        assert_eq!(second.id, Some(DiveId(2)));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut store = MemoryStore::new();
        store.create(session("Reef")).unwrap();
        store.create(session("Wall")).unwrap();
        store.create(session("Wreck")).unwrap();

        let stored = store.list().unwrap();
        let locations: Vec<&str> = stored.iter().map(|s| s.location.as_str()).collect();
        assert_eq!(locations, vec!["Reef", "Wall", "Wreck"]);
    }

    #[test]
    fn test_injected_failures() {
        let mut store = MemoryStore::failing_on(&[1]);
        assert!(store.create(session("Reef")).is_ok());
        assert!(store.create(session("Wall")).is_err());
        // The failed call consumes its slot; a retry succeeds.
        assert!(store.create(session("Wall")).is_ok());
        assert_eq!(store.list().unwrap().len(), 2);
    }
}
