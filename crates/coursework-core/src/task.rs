use tracing::{debug, warn};

use crate::datetime;
use crate::feed::{RawBadges, RawReviewGrade, RawTaskRecord};

pub const TOPIC_SENTINEL: &str = "-";
pub const STAGE_SENTINEL: &str = "Pending";
pub const NO_DEADLINE_SENTINEL: &str = "No deadline";
pub const INVALID_DEADLINE_MARKER: &str = "Invalid date";
pub const GRADE_SENTINEL: &str = "NA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewGrade {
    NotAvailable,
    Graded { comment: Option<String> },
}

impl ReviewGrade {
    fn from_raw(raw: Option<RawReviewGrade>) -> Self {
        match raw {
            None => Self::NotAvailable,
            Some(RawReviewGrade::Text(text)) => {
                if text.trim().is_empty() || text == "N/A" {
                    Self::NotAvailable
                } else {
                    Self::Graded { comment: None }
                }
            }
            Some(RawReviewGrade::Detailed { comment }) => Self::Graded { comment },
        }
    }

    #[must_use]
    pub fn tooltip(&self) -> &str {
        match self {
            Self::NotAvailable => "",
            Self::Graded { comment } => comment.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badges {
    Text(String),
    Flag(bool),
}

impl Badges {
    fn from_raw(raw: Option<RawBadges>) -> Self {
        match raw {
            None => Self::none(),
            Some(RawBadges::Text(text)) => Self::Text(text),
            Some(RawBadges::Flag(flag)) => Self::Flag(flag),
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self::Text(String::new())
    }

    // Mirrors the feed's truthiness rule: any non-empty label or an
    // explicit true counts as an awarded badge.
    #[must_use]
    pub fn is_awarded(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Flag(flag) => *flag,
        }
    }

    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Flag(flag) => flag.to_string(),
        }
    }
}

// One normalized row. Every field is resolved to a display-ready value
// at construction; publishing_rights is the only field that changes
// afterwards, and only through the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub assignment: String,
    pub course: String,
    pub topic: String,
    pub current_stage: String,
    pub review_grade: ReviewGrade,
    pub badges: Badges,
    pub stage_deadline: String,
    pub publishing_rights: bool,
}

impl Task {
    fn from_raw(raw: RawTaskRecord) -> Self {
        Self {
            id: raw.id,
            assignment: raw.assignment,
            course: raw.course,
            topic: non_blank_or(raw.topic, TOPIC_SENTINEL),
            current_stage: non_blank_or(raw.current_stage, STAGE_SENTINEL),
            review_grade: ReviewGrade::from_raw(raw.review_grade),
            badges: Badges::from_raw(raw.badges),
            stage_deadline: resolve_deadline(raw.stage_deadline.as_deref()),
            publishing_rights: raw.publishing_rights.unwrap_or(false),
        }
    }
}

// Pure filter + shape pass: keeps exactly the current user's records,
// in feed order, with all sentinels resolved.
#[tracing::instrument(skip(records))]
pub fn normalize_for_user(records: &[RawTaskRecord], user_id: u64) -> Vec<Task> {
    let tasks: Vec<Task> = records
        .iter()
        .filter(|record| record.participant_id == user_id)
        .cloned()
        .map(Task::from_raw)
        .collect();

    debug!(
        total = records.len(),
        kept = tasks.len(),
        user_id,
        "normalized participant tasks"
    );
    tasks
}

fn non_blank_or(value: Option<String>, sentinel: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => sentinel.to_string(),
    }
}

fn resolve_deadline(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return NO_DEADLINE_SENTINEL.to_string();
    };
    if raw.trim().is_empty() {
        return NO_DEADLINE_SENTINEL.to_string();
    }

    match datetime::parse_timestamp(raw) {
        Ok(dt) => datetime::format_deadline(dt),
        Err(err) => {
            warn!(deadline = raw, error = %err, "unparseable stage deadline");
            INVALID_DEADLINE_MARKER.to_string()
        }
    }
}
