use crate::task::Task;
use crate::textcase::sentence_case;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    Assignment,
    Course,
    Topic,
    CurrentStage,
    ReviewGrade,
    Badges,
    StageDeadline,
    PublishingRights,
}

impl ColumnKey {
    fn default_label(&self) -> &'static str {
        match self {
            Self::Assignment => "Assignment",
            Self::Course => "Course",
            Self::Topic => "Topic",
            Self::CurrentStage => "Current Stage",
            Self::ReviewGrade => "Review Grade",
            Self::Badges => "Badges",
            Self::StageDeadline => "Stage Deadline",
            Self::PublishingRights => "Publishing Rights",
        }
    }
}

// How a cell is presented by the table collaborator. The strategies
// mirror the upstream page: a detail link on the assignment, an
// icon-with-tooltip for grades, a checkbox for publishing rights, and
// plain text for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRender {
    Text,
    DetailLink,
    GradeIcon,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub key: ColumnKey,
    pub header: String,
    pub render: CellRender,
}

impl ColumnDescriptor {
    fn new(key: ColumnKey, render: CellRender) -> Self {
        Self {
            header: sentence_case(key.default_label()),
            key,
            render,
        }
    }
}

// Derives the column schema from the current rows. The Badges column
// is data-dependent, so this must be recomputed whenever the row list
// changes.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn build_columns(rows: &[Task]) -> Vec<ColumnDescriptor> {
    let show_badges = rows.iter().any(|task| task.badges.is_awarded());

    let mut columns = vec![
        ColumnDescriptor::new(ColumnKey::Assignment, CellRender::DetailLink),
        ColumnDescriptor::new(ColumnKey::Course, CellRender::Text),
        ColumnDescriptor::new(ColumnKey::Topic, CellRender::Text),
        ColumnDescriptor::new(ColumnKey::CurrentStage, CellRender::Text),
        ColumnDescriptor::new(ColumnKey::ReviewGrade, CellRender::GradeIcon),
    ];

    if show_badges {
        columns.push(ColumnDescriptor::new(ColumnKey::Badges, CellRender::Text));
    }

    columns.push(ColumnDescriptor::new(
        ColumnKey::StageDeadline,
        CellRender::Text,
    ));
    columns.push(ColumnDescriptor::new(
        ColumnKey::PublishingRights,
        CellRender::Checkbox,
    ));

    columns
}
