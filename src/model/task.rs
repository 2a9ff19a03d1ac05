use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::node::Node;

/// A node in a group's task tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque id, unique across the whole forest
    pub id: String,
    /// Display name (never blank)
    pub name: String,
    /// Zero-based rank among siblings
    pub order: usize,
    /// Suppressed from the visible view while this date is in the future
    pub hidden_until: Option<NaiveDate>,
    /// Day the task was last checked off
    pub completed_date: Option<NaiveDate>,
    /// Expand/collapse state of the subtree
    pub is_open: bool,
    /// Subtasks, sorted by `order`
    pub tasks: Vec<Task>,
}

impl Task {
    /// Create a fresh, visible, open, not-completed leaf task
    pub fn new(id: String, name: String, order: usize) -> Self {
        Task {
            id,
            name,
            order,
            hidden_until: None,
            completed_date: None,
            is_open: true,
            tasks: Vec::new(),
        }
    }

    /// Whether the task should show up in the view on `today`.
    ///
    /// Only looks at this node; ancestors are handled by the filter walking
    /// top-down.
    pub fn is_visible_on(&self, today: NaiveDate) -> bool {
        match self.hidden_until {
            None => true,
            Some(until) => until <= today,
        }
    }

    /// Completion status relative to `today`
    pub fn completion_on(&self, today: NaiveDate) -> Completion {
        match self.completed_date {
            None => Completion::Open,
            Some(date) if date == today => Completion::DoneToday,
            Some(_) => Completion::DoneEarlier,
        }
    }

    /// Number of tasks in this subtree, including `self`
    pub fn subtree_len(&self) -> usize {
        1 + self.tasks.iter().map(Task::subtree_len).sum::<usize>()
    }
}

impl Node for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }

    fn set_open(&mut self, is_open: bool) {
        self.is_open = is_open;
    }

    fn rename(&mut self, name: String) {
        self.name = name;
    }
}

/// How a task's completion date reads against the current day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    Open,
    /// Checked off today; rendered as done
    DoneToday,
    /// Checked off on an earlier day; rendered as open again
    DoneEarlier,
}

impl Completion {
    /// The character used inside the checkbox `[ ]`
    pub fn checkbox_char(self) -> char {
        match self {
            Completion::DoneToday => 'x',
            Completion::Open | Completion::DoneEarlier => ' ',
        }
    }
}
