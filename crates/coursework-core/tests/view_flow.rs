use std::fs;

use coursework_core::columns::ColumnKey;
use coursework_core::feed::{RawTaskRecord, TaskFeed};
use coursework_core::task::normalize_for_user;
use coursework_core::view::TaskListView;
use tempfile::tempdir;

const FEED: &str = r#"{
  "current_user_id": 42,
  "participantTasks": [
    {
      "participant_id": 42,
      "id": 1,
      "assignment": "program 2",
      "course": "object oriented design",
      "topic": "dynamic tables",
      "current_stage": "submission",
      "review_grade": { "comment": "late but complete" },
      "badges": "gold",
      "stage_deadline": "2023-05-01T14:30:00Z",
      "publishing_rights": true
    },
    {
      "participant_id": 42,
      "id": 2,
      "assignment": "final project",
      "course": "object oriented design"
    },
    {
      "participant_id": 99,
      "id": 3,
      "assignment": "someone else's work",
      "course": "other course"
    }
  ],
  "dueTasks": [{ "name": "program 3", "due": "soon" }],
  "revisions": [],
  "studentsTeamedWith": ["priya", "sam"]
}"#;

fn load_view() -> TaskListView {
    let temp = tempdir().expect("tempdir");
    let feed_path = temp.path().join("feed.json");
    fs::write(&feed_path, FEED).expect("write fixture feed");

    let feed = TaskFeed::load(&feed_path).expect("load feed");
    let user_id = feed.current_user_id;
    TaskListView::from_feed(feed, user_id)
}

#[test]
fn feed_to_view_shows_only_the_current_user() {
    let view = load_view();

    assert_eq!(view.rows().len(), 2);
    let ids: Vec<u64> = view.rows().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(
        view.rows().iter().all(|t| t.assignment != "someone else's work"),
        "foreign participant's record leaked into the view"
    );
}

#[test]
fn badged_feed_gets_a_badges_column() {
    let view = load_view();

    let keys: Vec<ColumnKey> = view.columns().iter().map(|c| c.key).collect();
    let badges_at = keys
        .iter()
        .position(|k| *k == ColumnKey::Badges)
        .expect("badges column present");
    assert_eq!(keys[badges_at + 1], ColumnKey::StageDeadline);
}

#[test]
fn display_projection_sentence_cases_text_fields_only() {
    let view = load_view();
    let rows = view.display_rows();

    assert_eq!(rows[0].assignment, "Program 2");
    assert_eq!(rows[0].course, "Object oriented design");
    assert_eq!(rows[0].topic, "Dynamic tables");
    // Normalized-as-is fields pass through untouched.
    assert_eq!(rows[0].current_stage, "submission");
    assert_eq!(rows[0].stage_deadline, "May 1, 2023, 10:30 AM");
    assert_eq!(rows[1].topic, "-");
    assert_eq!(rows[1].current_stage, "Pending");
    assert_eq!(rows[1].stage_deadline, "No deadline");
}

#[test]
fn toggle_feeds_back_into_the_rendered_rows() {
    let mut view = load_view();

    assert!(view.rows()[0].publishing_rights);
    assert!(view.toggle(1));
    assert!(!view.rows()[0].publishing_rights);
    assert!(!view.rows()[1].publishing_rights, "other row untouched");

    assert!(!view.toggle(777), "unknown id must be a no-op");
    assert_eq!(view.rows().len(), 2);
}

#[test]
fn sidebar_collections_pass_through_unmodified() {
    let view = load_view();

    assert_eq!(view.due_tasks().len(), 1);
    assert_eq!(view.due_tasks()[0]["name"], "program 3");
    assert!(view.revisions().is_empty());
    assert_eq!(view.teammates().len(), 2);
}

#[test]
fn detail_route_is_keyed_by_row_id() {
    let view = load_view();
    assert_eq!(view.detail_route(1), "/student_task_detail/1");
}

#[test]
fn renormalizing_normalized_values_is_stable() {
    let view = load_view();

    // Feed the normalized display values back through the normalizer;
    // identity-default fields must come out unchanged.
    let reraw: Vec<RawTaskRecord> = view
        .rows()
        .iter()
        .map(|task| RawTaskRecord {
            participant_id: 42,
            id: task.id,
            assignment: task.assignment.clone(),
            course: task.course.clone(),
            topic: Some(task.topic.clone()),
            current_stage: Some(task.current_stage.clone()),
            review_grade: None,
            badges: None,
            stage_deadline: None,
            publishing_rights: Some(task.publishing_rights),
        })
        .collect();

    let renormalized = normalize_for_user(&reraw, 42);
    for (before, after) in view.rows().iter().zip(&renormalized) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.topic, after.topic);
        assert_eq!(before.current_stage, after.current_stage);
        assert_eq!(before.publishing_rights, after.publishing_rights);
    }
}
