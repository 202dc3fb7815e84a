use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info};

// Raw record shape is owned by the upstream feed; every optional field
// here gets a sentinel during normalization (see task.rs).
#[derive(Debug, Clone, Deserialize)]
pub struct RawTaskRecord {
    pub participant_id: u64,
    pub id: u64,
    pub assignment: String,
    pub course: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub current_stage: Option<String>,
    #[serde(default)]
    pub review_grade: Option<RawReviewGrade>,
    #[serde(default)]
    pub badges: Option<RawBadges>,
    #[serde(default)]
    pub stage_deadline: Option<String>,
    #[serde(default)]
    pub publishing_rights: Option<bool>,
}

// The feed sends either a bare grade string or an object carrying a
// reviewer comment.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawReviewGrade {
    Text(String),
    Detailed { comment: Option<String> },
}

// Badges arrive as a label string or a plain boolean flag.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawBadges {
    Text(String),
    Flag(bool),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskFeed {
    #[serde(rename = "participantTasks")]
    pub participant_tasks: Vec<RawTaskRecord>,
    pub current_user_id: u64,

    // Sidebar collections are opaque to this core and pass through to
    // the summary panel untouched.
    #[serde(default, rename = "dueTasks")]
    pub due_tasks: Vec<serde_json::Value>,
    #[serde(default)]
    pub revisions: Vec<serde_json::Value>,
    #[serde(default, rename = "studentsTeamedWith")]
    pub students_teamed_with: Vec<serde_json::Value>,
}

impl TaskFeed {
    #[tracing::instrument(skip(path))]
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        debug!(file = %path.display(), "loading task feed");
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read feed {}", path.display()))?;

        let feed: TaskFeed = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse feed {}", path.display()))?;

        info!(
            file = %path.display(),
            records = feed.participant_tasks.len(),
            current_user = feed.current_user_id,
            "loaded task feed"
        );
        Ok(feed)
    }
}
