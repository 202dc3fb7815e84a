use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use crate::columns::{CellRender, ColumnDescriptor, ColumnKey};
use crate::config::Config;
use crate::task::{GRADE_SENTINEL, ReviewGrade, Task};
use crate::view::TaskListView;

// Terminal stand-in for the generic table collaborator: it receives
// the projected rows and the derived column descriptors and owns the
// layout, nothing else.
#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, view))]
    pub fn print_task_table(&mut self, view: &TaskListView) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let columns = view.columns();
        let rows = view.display_rows();

        let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|task| {
                columns
                    .iter()
                    .map(|column| self.render_cell(view, task, column))
                    .collect()
            })
            .collect();

        write_table(&mut out, headers, cells)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, view))]
    pub fn print_sidebar_summary(&mut self, view: &TaskListView) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(
            out,
            "due tasks: {}  revisions: {}  teamed with: {}",
            view.due_tasks().len(),
            view.revisions().len(),
            summarize_names(view.teammates())
        )?;
        writeln!(out)?;
        Ok(())
    }

    fn render_cell(&self, view: &TaskListView, task: &Task, column: &ColumnDescriptor) -> String {
        match column.render {
            CellRender::Text => plain_value(task, column.key),
            CellRender::DetailLink => {
                let label = self.paint(&task.assignment, "34");
                format!("{label} ({})", view.detail_route(task.id))
            }
            CellRender::GradeIcon => match &task.review_grade {
                ReviewGrade::NotAvailable => GRADE_SENTINEL.to_string(),
                grade => {
                    let tooltip = grade.tooltip();
                    if tooltip.is_empty() {
                        "(i)".to_string()
                    } else {
                        format!("(i) {tooltip}")
                    }
                }
            },
            CellRender::Checkbox => {
                if task.publishing_rights {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn plain_value(task: &Task, key: ColumnKey) -> String {
    match key {
        ColumnKey::Assignment => task.assignment.clone(),
        ColumnKey::Course => task.course.clone(),
        ColumnKey::Topic => task.topic.clone(),
        ColumnKey::CurrentStage => task.current_stage.clone(),
        ColumnKey::ReviewGrade => task.review_grade.tooltip().to_string(),
        ColumnKey::Badges => task.badges.display(),
        ColumnKey::StageDeadline => task.stage_deadline.clone(),
        ColumnKey::PublishingRights => task.publishing_rights.to_string(),
    }
}

fn summarize_names(entries: &[Value]) -> String {
    let names: Vec<String> = entries
        .iter()
        .map(|entry| match entry {
            Value::String(name) => name.clone(),
            Value::Object(map) => map
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("?")
                .to_string(),
            other => other.to_string(),
        })
        .collect();

    if names.is_empty() {
        "nobody".to_string()
    } else {
        names.join(", ")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
