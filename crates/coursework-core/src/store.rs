use tracing::{debug, info};

use crate::feed::RawTaskRecord;
use crate::task::{Task, normalize_for_user};

// View-scoped state cell for the row list. `load` and
// `toggle_publishing_rights` are the only mutation paths; both replace
// the list wholesale so consumers can rely on value snapshots.
#[derive(Debug, Default)]
pub struct TaskListStore {
    rows: Vec<Task>,
}

impl TaskListStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(skip(self, records))]
    pub fn load(&mut self, records: &[RawTaskRecord], user_id: u64) {
        self.rows = normalize_for_user(records, user_id);
        info!(rows = self.rows.len(), user_id, "loaded task list");
    }

    #[must_use]
    pub fn rows(&self) -> &[Task] {
        &self.rows
    }

    // Flips exactly the matching row's flag; an unknown id is a no-op.
    // Returns whether a row matched.
    #[tracing::instrument(skip(self))]
    pub fn toggle_publishing_rights(&mut self, id: u64) -> bool {
        let mut found = false;
        self.rows = self
            .rows
            .iter()
            .map(|task| {
                if task.id == id {
                    found = true;
                    let mut flipped = task.clone();
                    flipped.publishing_rights = !flipped.publishing_rights;
                    flipped
                } else {
                    task.clone()
                }
            })
            .collect();

        if found {
            debug!(id, "toggled publishing rights");
        } else {
            debug!(id, "toggle ignored, no such row");
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::TaskListStore;
    use crate::feed::RawTaskRecord;

    fn record(id: u64, rights: Option<bool>) -> RawTaskRecord {
        RawTaskRecord {
            participant_id: 3,
            id,
            assignment: "essay".to_string(),
            course: "writing".to_string(),
            topic: None,
            current_stage: None,
            review_grade: None,
            badges: None,
            stage_deadline: None,
            publishing_rights: rights,
        }
    }

    fn loaded_store() -> TaskListStore {
        let mut store = TaskListStore::new();
        store.load(&[record(1, Some(true)), record(2, None)], 3);
        store
    }

    #[test]
    fn toggle_flips_exactly_one_row() {
        let mut store = loaded_store();
        assert!(store.toggle_publishing_rights(2));
        assert!(store.rows()[1].publishing_rights);
        assert!(store.rows()[0].publishing_rights, "other row untouched");
    }

    #[test]
    fn toggle_is_self_inverse() {
        let mut store = loaded_store();
        let before = store.rows().to_vec();
        store.toggle_publishing_rights(1);
        store.toggle_publishing_rights(1);
        assert_eq!(store.rows(), before.as_slice());
    }

    #[test]
    fn unknown_id_is_a_noop() {
        let mut store = loaded_store();
        let before = store.rows().to_vec();
        assert!(!store.toggle_publishing_rights(999));
        assert_eq!(store.rows(), before.as_slice());
    }

    #[test]
    fn load_replaces_state_wholesale() {
        let mut store = loaded_store();
        store.toggle_publishing_rights(2);
        store.load(&[record(5, None)], 3);
        assert_eq!(store.rows().len(), 1);
        assert_eq!(store.rows()[0].id, 5);
        assert!(!store.rows()[0].publishing_rights);
    }
}
