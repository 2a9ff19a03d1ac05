use chrono::NaiveDate;
use serde::Serialize;

use crate::model::config::ViewConfig;
use crate::model::forest::Forest;
use crate::model::group::Group;
use crate::model::task::{Completion, Task};
use crate::ops::search::SearchHit;
use crate::util::dates::format_date;
use crate::util::ids::short_id;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct GroupJson {
    pub id: String,
    pub name: String,
    pub is_open: bool,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub name: String,
    pub completion: Completion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_until: Option<NaiveDate>,
    pub is_open: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub group_id: String,
    pub task_id: String,
    pub path: Vec<String>,
    pub name: String,
}

// ---------------------------------------------------------------------------
// View filtering
// ---------------------------------------------------------------------------

/// Drop tasks that were checked off on an earlier day, with their subtrees,
/// unless the view config keeps them.
pub fn apply_view(forest: &Forest, view: &ViewConfig, today: NaiveDate) -> Forest {
    if view.show_done_earlier {
        return forest.clone();
    }
    let mut out = forest.clone();
    for group in &mut out.groups {
        drop_done_earlier(&mut group.tasks, today);
    }
    out
}

fn drop_done_earlier(tasks: &mut Vec<Task>, today: NaiveDate) {
    tasks.retain(|t| t.completion_on(today) != Completion::DoneEarlier);
    for task in tasks {
        drop_done_earlier(&mut task.tasks, today);
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn group_to_json(group: &Group, today: NaiveDate) -> GroupJson {
    GroupJson {
        id: group.id.clone(),
        name: group.name.clone(),
        is_open: group.is_open,
        tasks: group.tasks.iter().map(|t| task_to_json(t, today)).collect(),
    }
}

pub fn task_to_json(task: &Task, today: NaiveDate) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        name: task.name.clone(),
        completion: task.completion_on(today),
        completed_date: task.completed_date,
        hidden_until: task.hidden_until,
        is_open: task.is_open,
        tasks: task.tasks.iter().map(|t| task_to_json(t, today)).collect(),
    }
}

pub fn hit_to_json(hit: &SearchHit) -> SearchHitJson {
    SearchHitJson {
        group_id: hit.group_id.clone(),
        task_id: hit.task_id.clone(),
        path: hit.path.clone(),
        name: hit.name.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Render the forest as an indented checklist. Collapsed nodes show a `+`
/// marker and hide their children.
pub fn format_forest(forest: &Forest, today: NaiveDate, full_ids: bool) -> String {
    let mut out = String::new();
    for group in &forest.groups {
        let marker = if group.is_open { "" } else { " +" };
        out.push_str(&format!(
            "{} {}{}\n",
            display_id(&group.id, full_ids),
            group.name,
            marker
        ));
        if group.is_open {
            format_tasks(&group.tasks, 1, today, full_ids, &mut out);
        }
    }
    out
}

fn format_tasks(tasks: &[Task], depth: usize, today: NaiveDate, full_ids: bool, out: &mut String) {
    for task in tasks {
        let indent = "  ".repeat(depth);
        let collapsed = !task.is_open && !task.tasks.is_empty();
        let mut line = format!(
            "{}- [{}] {} {}",
            indent,
            task.completion_on(today).checkbox_char(),
            display_id(&task.id, full_ids),
            task.name
        );
        if collapsed {
            line.push_str(" +");
        }
        if let Some(until) = task.hidden_until
            && until > today
        {
            line.push_str(&format!(" (hidden until {})", format_date(until)));
        }
        out.push_str(&line);
        out.push('\n');
        if !collapsed {
            format_tasks(&task.tasks, depth + 1, today, full_ids, out);
        }
    }
}

fn display_id(id: &str, full: bool) -> &str {
    if full { id } else { short_id(id) }
}

pub fn format_hit(hit: &SearchHit) -> String {
    format!(
        "{} {} > {}",
        short_id(&hit.task_id),
        hit.path.join(" > "),
        hit.name
    )
}
