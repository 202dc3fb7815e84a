use serde_json::Value;

use crate::columns::{ColumnDescriptor, build_columns};
use crate::feed::TaskFeed;
use crate::store::TaskListStore;
use crate::task::Task;
use crate::textcase::sentence_case;

// Orchestrates the normalized rows, the derived column schema, and the
// pass-through sidebar collections for one screen.
#[derive(Debug)]
pub struct TaskListView {
    store: TaskListStore,
    due_tasks: Vec<Value>,
    revisions: Vec<Value>,
    teammates: Vec<Value>,
}

impl TaskListView {
    #[tracing::instrument(skip(feed))]
    pub fn from_feed(feed: TaskFeed, user_id: u64) -> Self {
        let mut store = TaskListStore::new();
        store.load(&feed.participant_tasks, user_id);

        Self {
            store,
            due_tasks: feed.due_tasks,
            revisions: feed.revisions,
            teammates: feed.students_teamed_with,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Task] {
        self.store.rows()
    }

    // Projection handed to the table collaborator: sentence case on the
    // free-text fields only, everything else as normalized.
    #[must_use]
    pub fn display_rows(&self) -> Vec<Task> {
        self.store
            .rows()
            .iter()
            .map(|task| {
                let mut row = task.clone();
                row.assignment = sentence_case(&task.assignment);
                row.course = sentence_case(&task.course);
                row.topic = sentence_case(&task.topic);
                row
            })
            .collect()
    }

    // Recomputed per call; the Badges column decision depends on the
    // current rows.
    #[must_use]
    pub fn columns(&self) -> Vec<ColumnDescriptor> {
        build_columns(self.store.rows())
    }

    pub fn toggle(&mut self, id: u64) -> bool {
        self.store.toggle_publishing_rights(id)
    }

    // Navigation boundary: this core only supplies the row id.
    #[must_use]
    pub fn detail_route(&self, id: u64) -> String {
        format!("/student_task_detail/{id}")
    }

    #[must_use]
    pub fn due_tasks(&self) -> &[Value] {
        &self.due_tasks
    }

    #[must_use]
    pub fn revisions(&self) -> &[Value] {
        &self.revisions
    }

    #[must_use]
    pub fn teammates(&self) -> &[Value] {
        &self.teammates
    }
}
