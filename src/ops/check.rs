use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::forest::Forest;
use crate::model::node::{Node, is_dense};
use crate::model::task::Task;

/// Days ahead past which a `hiddenUntil` looks wrong; the hide command only
/// ever sets tomorrow.
const HIDDEN_HORIZON_DAYS: i64 = 1;

/// Structured result from `dl check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckError {
    /// The same id is used by more than one node
    DuplicateId { id: String, count: usize },
    /// A sibling collection's `order` values are not exactly `0..n`
    OrderGap {
        /// Owning group or task id
        parent_id: String,
        orders: Vec<usize>,
    },
    /// Group or task with an empty (or whitespace) name
    BlankName { id: String },
}

/// Something odd that does not break the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckWarning {
    /// Checked off on a day that has not happened yet
    FutureCompletion { id: String, date: NaiveDate },
    /// Hidden for longer than "done for today" allows
    LongHide { id: String, until: NaiveDate },
}

/// Validate a forest and return structured results.
///
/// This is a read-only operation.
///
/// Checks performed:
/// 1. Ids are unique across groups and tasks
/// 2. Every sibling collection (the group list included) has orders `0..n`
/// 3. No blank names
/// 4. Warnings for completion dates after `today` and hides past tomorrow
pub fn check_forest(forest: &Forest, today: NaiveDate) -> CheckResult {
    let mut result = CheckResult::default();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for id in forest.all_ids() {
        *counts.entry(id).or_default() += 1;
    }
    let mut duplicates: Vec<(&str, usize)> =
        counts.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort();
    for (id, count) in duplicates {
        result.errors.push(CheckError::DuplicateId {
            id: id.to_string(),
            count,
        });
    }

    check_orders("root", &forest.groups, &mut result);
    for group in &forest.groups {
        if group.name.trim().is_empty() {
            result.errors.push(CheckError::BlankName {
                id: group.id.clone(),
            });
        }
        check_orders(&group.id, &group.tasks, &mut result);
    }
    forest.for_each_task(&mut |_, task, _| check_task(task, today, &mut result));

    result.valid = result.errors.is_empty();
    result
}

fn check_orders<T: Node>(parent_id: &str, siblings: &[T], result: &mut CheckResult) {
    if !is_dense(siblings) {
        result.errors.push(CheckError::OrderGap {
            parent_id: parent_id.to_string(),
            orders: siblings.iter().map(|n| n.order()).collect(),
        });
    }
}

fn check_task(task: &Task, today: NaiveDate, result: &mut CheckResult) {
    if task.name.trim().is_empty() {
        result.errors.push(CheckError::BlankName {
            id: task.id.clone(),
        });
    }
    if let Some(date) = task.completed_date
        && date > today
    {
        result.warnings.push(CheckWarning::FutureCompletion {
            id: task.id.clone(),
            date,
        });
    }
    if let Some(until) = task.hidden_until
        && (until - today).num_days() > HIDDEN_HORIZON_DAYS
    {
        result.warnings.push(CheckWarning::LongHide {
            id: task.id.clone(),
            until,
        });
    }

    check_orders(&task.id, &task.tasks, result);
}
