//! Tree algorithms lifted from one sibling list to the whole forest.
//!
//! Task-targeted commands search every group, so callers only need the task
//! id. Group-targeted commands work on the group list itself.

use chrono::NaiveDate;

use crate::model::forest::Forest;
use crate::model::group::Group;
use crate::model::node::{Node, renumber};
use crate::model::task::Task;
use crate::ops::tree_ops::{self, Parent};

/// Apply `f` to every group's root task list.
fn map_task_trees<F>(forest: &Forest, mut f: F) -> Forest
where
    F: FnMut(&[Task]) -> Vec<Task>,
{
    Forest::new(
        forest
            .groups
            .iter()
            .map(|g| Group {
                id: g.id.clone(),
                name: g.name.clone(),
                order: g.order,
                is_open: g.is_open,
                tasks: f(&g.tasks),
            })
            .collect(),
    )
}

/// Replace the group with `group_id` by `transform(group)`.
fn transform_group<F>(forest: &Forest, group_id: &str, transform: F) -> Forest
where
    F: FnOnce(Group) -> Group,
{
    let mut transform = Some(transform);
    Forest::new(
        forest
            .groups
            .iter()
            .map(|g| match transform.take_if(|_| g.id == group_id) {
                Some(f) => f(g.clone()),
                None => g.clone(),
            })
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// Append a group. Blank names are ignored.
pub fn add_group(forest: &Forest, name: &str, id: String) -> Forest {
    let name = name.trim();
    let mut groups = forest.groups.clone();
    if !name.is_empty() {
        let order = groups.len();
        groups.push(Group::new(id, name.to_string(), order));
    }
    Forest::new(groups)
}

pub fn rename_group(forest: &Forest, group_id: &str, name: &str) -> Forest {
    let name = name.trim();
    if name.is_empty() {
        return forest.clone();
    }
    transform_group(forest, group_id, |mut g| {
        g.rename(name.to_string());
        g
    })
}

/// Remove a group with all of its tasks; the remaining groups are renumbered.
pub fn delete_group(forest: &Forest, group_id: &str) -> Forest {
    let mut groups: Vec<Group> = forest
        .groups
        .iter()
        .filter(|g| g.id != group_id)
        .cloned()
        .collect();
    if groups.len() != forest.groups.len() {
        renumber(&mut groups);
    }
    Forest::new(groups)
}

pub fn reorder_groups(forest: &Forest, active_id: &str, over_id: &str) -> Forest {
    Forest::new(tree_ops::reorder_siblings(&forest.groups, active_id, over_id))
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Insert a task into `group_id`, either at its root or under a task of that
/// group. Unknown group or parent leaves the forest unchanged.
pub fn add_task(
    forest: &Forest,
    group_id: &str,
    parent: Parent<'_>,
    name: &str,
    id: String,
) -> Forest {
    transform_group(forest, group_id, |mut g| {
        g.tasks = tree_ops::insert_child(&g.tasks, parent, name, id);
        g
    })
}

pub fn delete_task(forest: &Forest, task_id: &str) -> Forest {
    map_task_trees(forest, |tasks| tree_ops::remove_by_id(tasks, task_id))
}

/// Reorder the children of `parent` inside one group.
pub fn reorder_tasks(
    forest: &Forest,
    group_id: &str,
    parent: Parent<'_>,
    active_id: &str,
    over_id: &str,
) -> Forest {
    transform_group(forest, group_id, |mut g| {
        g.tasks = tree_ops::reorder_children(&g.tasks, parent, active_id, over_id);
        g
    })
}

pub fn toggle_completion(forest: &Forest, task_id: &str, today: NaiveDate) -> Forest {
    map_task_trees(forest, |tasks| tree_ops::toggle_completion(tasks, task_id, today))
}

pub fn set_hidden(forest: &Forest, task_id: &str, tomorrow: NaiveDate) -> Forest {
    map_task_trees(forest, |tasks| tree_ops::set_hidden(tasks, task_id, tomorrow))
}

/// Expand/collapse a group or a task.
pub fn set_open(forest: &Forest, id: &str, is_open: bool) -> Forest {
    if forest.group(id).is_some() {
        return transform_group(forest, id, |mut g| {
            g.set_open(is_open);
            g
        });
    }
    map_task_trees(forest, |tasks| tree_ops::set_open(tasks, id, is_open))
}

pub fn rename_task(forest: &Forest, task_id: &str, name: &str) -> Forest {
    map_task_trees(forest, |tasks| tree_ops::rename(tasks, task_id, name))
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Every group, with only the tasks visible on `today`.
pub fn visible_forest(forest: &Forest, today: NaiveDate) -> Forest {
    map_task_trees(forest, |tasks| tree_ops::filter_visible(tasks, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn sample() -> Forest {
        let forest = add_group(&Forest::default(), "Home", "g1".into());
        let forest = add_group(&forest, "Work", "g2".into());
        let forest = add_task(&forest, "g1", Parent::Root, "Dishes", "t1".into());
        let forest = add_task(&forest, "g1", Parent::Node("t1"), "Pans", "t1a".into());
        add_task(&forest, "g2", Parent::Root, "Email", "t2".into())
    }

    #[test]
    fn add_group_appends_with_order() {
        let forest = sample();
        assert_eq!(forest.groups[1].order, 1);
        assert!(forest.groups[1].is_open);
        assert_eq!(add_group(&forest, "  ", "g3".into()), forest);
    }

    #[test]
    fn add_task_targets_group_and_parent() {
        let forest = sample();
        assert_eq!(forest.groups[0].tasks[0].tasks[0].id, "t1a");
        assert_eq!(forest.groups[1].tasks[0].id, "t2");

        // parent belongs to another group
        let same = add_task(&forest, "g2", Parent::Node("t1"), "x", "n".into());
        assert_eq!(same, forest);
        // unknown group
        assert_eq!(add_task(&forest, "gx", Parent::Root, "x", "n".into()), forest);
    }

    #[test]
    fn task_commands_find_tasks_in_any_group() {
        let today = date("2024-03-15");
        let forest = toggle_completion(&sample(), "t2", today);
        assert_eq!(forest.groups[1].tasks[0].completed_date, Some(today));

        let forest = delete_task(&forest, "t1");
        assert!(forest.groups[0].tasks.is_empty());
        assert_eq!(forest.groups[1].tasks.len(), 1);
    }

    #[test]
    fn delete_group_renumbers() {
        let forest = add_group(&sample(), "Errands", "g3".into());
        let forest = delete_group(&forest, "g1");
        let orders: Vec<usize> = forest.groups.iter().map(|g| g.order).collect();
        assert_eq!(orders, vec![0, 1]);
        assert!(forest.find_task("t1a").is_none());
        assert_eq!(delete_group(&forest, "missing"), forest);
    }

    #[test]
    fn reorder_groups_moves_and_renumbers() {
        let forest = reorder_groups(&sample(), "g2", "g1");
        let ids: Vec<&str> = forest.groups.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["g2", "g1"]);
        assert_eq!(forest.groups[0].order, 0);
    }

    #[test]
    fn reorder_tasks_stays_inside_group() {
        let forest = add_task(&sample(), "g1", Parent::Root, "Laundry", "t3".into());
        let moved = reorder_tasks(&forest, "g1", Parent::Root, "t3", "t1");
        let ids: Vec<&str> = moved.groups[0].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t1"]);
        // over id lives in another group
        assert_eq!(reorder_tasks(&forest, "g1", Parent::Root, "t3", "t2"), forest);
    }

    #[test]
    fn set_open_handles_groups_and_tasks() {
        let forest = set_open(&sample(), "g1", false);
        assert!(!forest.groups[0].is_open);
        assert!(forest.groups[0].tasks[0].is_open);

        let forest = set_open(&forest, "t1", false);
        assert!(!forest.groups[0].tasks[0].is_open);
    }

    #[test]
    fn rename_group_and_task() {
        let forest = rename_group(&sample(), "g1", "House");
        assert_eq!(forest.groups[0].name, "House");
        let forest = rename_task(&forest, "t1a", "Pots");
        assert_eq!(forest.groups[0].tasks[0].tasks[0].name, "Pots");
        assert_eq!(rename_group(&forest, "g1", ""), forest);
    }

    #[test]
    fn visible_forest_keeps_groups() {
        let forest = set_hidden(&sample(), "t2", date("2024-03-16"));
        let view = visible_forest(&forest, date("2024-03-15"));
        assert_eq!(view.groups.len(), 2);
        assert!(view.groups[1].tasks.is_empty());
        assert_eq!(visible_forest(&forest, date("2024-03-16")), forest);
    }
}
