use chrono::NaiveDate;

use crate::model::node::{Node, renumber};
use crate::model::task::Task;

/// Where a new child goes, or whose children get reordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent<'a> {
    /// The top-level sibling collection (a group's root tasks, or the group list)
    Root,
    /// The children of the node with this id
    Node(&'a str),
}

impl<'a> Parent<'a> {
    /// `None` means root
    pub fn from_option(id: Option<&'a str>) -> Self {
        match id {
            Some(id) => Parent::Node(id),
            None => Parent::Root,
        }
    }
}

// ---------------------------------------------------------------------------
// Locate
// ---------------------------------------------------------------------------

/// Depth-first search for `target_id` (node before children, siblings in
/// order). The first match is replaced by `transform(node)`; every other node
/// is copied unchanged. A miss returns an equal copy of the input.
pub fn locate_and_transform<F>(tasks: &[Task], target_id: &str, transform: F) -> Vec<Task>
where
    F: FnOnce(Task) -> Task,
{
    let mut transform = Some(transform);
    transform_in(tasks, target_id, &mut transform)
}

fn transform_in<F>(tasks: &[Task], target_id: &str, transform: &mut Option<F>) -> Vec<Task>
where
    F: FnOnce(Task) -> Task,
{
    tasks
        .iter()
        .map(|task| {
            if task.id == target_id
                && let Some(f) = transform.take()
            {
                return f(task.clone());
            }
            if transform.is_none() {
                return task.clone();
            }
            with_children(task, transform_in(&task.tasks, target_id, transform))
        })
        .collect()
}

/// Copy of `task`'s own fields over a new child list.
fn with_children(task: &Task, tasks: Vec<Task>) -> Task {
    Task {
        id: task.id.clone(),
        name: task.name.clone(),
        order: task.order,
        hidden_until: task.hidden_until,
        completed_date: task.completed_date,
        is_open: task.is_open,
        tasks,
    }
}

// ---------------------------------------------------------------------------
// Structural mutations
// ---------------------------------------------------------------------------

/// Append a new task named `name` under `parent`, with `order` equal to the
/// current child count. Blank names and unknown parents leave the tree as is.
pub fn insert_child(tasks: &[Task], parent: Parent<'_>, name: &str, id: String) -> Vec<Task> {
    let name = name.trim();
    if name.is_empty() {
        return tasks.to_vec();
    }
    match parent {
        Parent::Root => {
            let mut out = tasks.to_vec();
            let order = out.len();
            out.push(Task::new(id, name.to_string(), order));
            out
        }
        Parent::Node(parent_id) => locate_and_transform(tasks, parent_id, |mut node| {
            let order = node.tasks.len();
            node.tasks.push(Task::new(id, name.to_string(), order));
            node
        }),
    }
}

/// Drop the task with `target_id` and its whole subtree, wherever it is.
/// The sibling collection it was removed from is renumbered.
pub fn remove_by_id(tasks: &[Task], target_id: &str) -> Vec<Task> {
    let mut out: Vec<Task> = tasks
        .iter()
        .filter(|t| t.id != target_id)
        .map(|t| with_children(t, remove_by_id(&t.tasks, target_id)))
        .collect();
    if out.len() != tasks.len() {
        renumber(&mut out);
    }
    out
}

/// Move `active_id` to `over_id`'s position within one sibling list and
/// renumber. Missing ids or `active_id == over_id` return an equal copy.
pub fn reorder_siblings<T: Node>(siblings: &[T], active_id: &str, over_id: &str) -> Vec<T> {
    let mut out = siblings.to_vec();
    if active_id == over_id {
        return out;
    }
    let from = out.iter().position(|n| n.id() == active_id);
    let to = out.iter().position(|n| n.id() == over_id);
    let (Some(from), Some(to)) = (from, to) else {
        return out;
    };
    let item = out.remove(from);
    out.insert(to, item);
    renumber(&mut out);
    out
}

/// `reorder_siblings` applied to the children of `parent`.
pub fn reorder_children(
    tasks: &[Task],
    parent: Parent<'_>,
    active_id: &str,
    over_id: &str,
) -> Vec<Task> {
    match parent {
        Parent::Root => reorder_siblings(tasks, active_id, over_id),
        Parent::Node(parent_id) => locate_and_transform(tasks, parent_id, |mut node| {
            node.tasks = reorder_siblings(&node.tasks, active_id, over_id);
            node
        }),
    }
}

// ---------------------------------------------------------------------------
// Field updates
// ---------------------------------------------------------------------------

/// Flip completion on the target (`None` ↔ `today`) and force the same value
/// onto every descendant.
pub fn toggle_completion(tasks: &[Task], target_id: &str, today: NaiveDate) -> Vec<Task> {
    locate_and_transform(tasks, target_id, |mut node| {
        let value = match node.completed_date {
            Some(_) => None,
            None => Some(today),
        };
        set_completed_recursive(&mut node, value);
        node
    })
}

fn set_completed_recursive(task: &mut Task, value: Option<NaiveDate>) {
    task.completed_date = value;
    for child in &mut task.tasks {
        set_completed_recursive(child, value);
    }
}

/// "Done for today": hide the target until `tomorrow`.
pub fn set_hidden(tasks: &[Task], target_id: &str, tomorrow: NaiveDate) -> Vec<Task> {
    locate_and_transform(tasks, target_id, |mut node| {
        node.hidden_until = Some(tomorrow);
        node
    })
}

/// Expand or collapse the target; descendants keep their own state.
pub fn set_open(tasks: &[Task], target_id: &str, is_open: bool) -> Vec<Task> {
    locate_and_transform(tasks, target_id, |mut node| {
        node.set_open(is_open);
        node
    })
}

/// Replace the target's name. Blank names are ignored.
pub fn rename(tasks: &[Task], target_id: &str, name: &str) -> Vec<Task> {
    let name = name.trim();
    if name.is_empty() {
        return tasks.to_vec();
    }
    locate_and_transform(tasks, target_id, |mut node| {
        node.rename(name.to_string());
        node
    })
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Keep tasks visible on `today`. A hidden task is dropped with its whole
/// subtree; children are only considered under a visible parent.
pub fn filter_visible(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.is_visible_on(today))
        .map(|t| with_children(t, filter_visible(&t.tasks, today)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
