use serde::{Deserialize, Serialize};

use super::group::Group;
use super::task::Task;

/// One immutable value of every group and task.
///
/// Serializes as the bare array of groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    pub groups: Vec<Group>,
}

impl Forest {
    pub fn new(groups: Vec<Group>) -> Self {
        Forest { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Find a task anywhere in the forest, returning it with its group id.
    pub fn find_task(&self, task_id: &str) -> Option<(&str, &Task)> {
        self.groups.iter().find_map(|g| {
            find_task_in_list(&g.tasks, task_id).map(|t| (g.id.as_str(), t))
        })
    }

    /// Whether any group or task carries this id.
    pub fn contains_id(&self, id: &str) -> bool {
        self.group(id).is_some() || self.find_task(id).is_some()
    }

    /// Visit every task depth-first, parent before children, with its depth
    /// (0 = group root).
    pub fn for_each_task(&self, f: &mut dyn FnMut(&Group, &Task, usize)) {
        for group in &self.groups {
            for_each_task(group, &group.tasks, 0, f);
        }
    }

    /// Every group and task id, in depth-first order.
    pub fn all_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        for group in &self.groups {
            ids.push(group.id.as_str());
            collect_ids(&group.tasks, &mut ids);
        }
        ids
    }

    pub fn task_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.tasks.iter())
            .map(Task::subtree_len)
            .sum()
    }
}

/// Depth-first search of a sibling collection (node before its children).
pub fn find_task_in_list<'a>(tasks: &'a [Task], task_id: &str) -> Option<&'a Task> {
    for task in tasks {
        if task.id == task_id {
            return Some(task);
        }
        if let Some(t) = find_task_in_list(&task.tasks, task_id) {
            return Some(t);
        }
    }
    None
}

fn for_each_task(
    group: &Group,
    tasks: &[Task],
    depth: usize,
    f: &mut dyn FnMut(&Group, &Task, usize),
) {
    for task in tasks {
        f(group, task, depth);
        for_each_task(group, &task.tasks, depth + 1, f);
    }
}

fn collect_ids<'a>(tasks: &'a [Task], ids: &mut Vec<&'a str>) {
    for task in tasks {
        ids.push(task.id.as_str());
        collect_ids(&task.tasks, ids);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Forest {
        let mut parent = Task::new("t1".into(), "Parent".into(), 0);
        parent.tasks.push(Task::new("t1a".into(), "Child".into(), 0));
        let mut g1 = Group::new("g1".into(), "Home".into(), 0);
        g1.tasks.push(parent);
        g1.tasks.push(Task::new("t2".into(), "Other".into(), 1));
        let g2 = Group::new("g2".into(), "Work".into(), 1);
        Forest::new(vec![g1, g2])
    }

    #[test]
    fn finds_nested_task_with_group() {
        let forest = sample();
        let (group_id, task) = forest.find_task("t1a").unwrap();
        assert_eq!(group_id, "g1");
        assert_eq!(task.name, "Child");
        assert!(forest.find_task("nope").is_none());
    }

    #[test]
    fn all_ids_depth_first() {
        let forest = sample();
        assert_eq!(forest.all_ids(), vec!["g1", "t1", "t1a", "t2", "g2"]);
        assert_eq!(forest.task_count(), 3);
    }

    #[test]
    fn serializes_as_bare_array() {
        let json = serde_json::to_value(Forest::default()).unwrap();
        assert_eq!(json, serde_json::json!([]));
    }

    #[test]
    fn for_each_task_reports_depth() {
        let forest = sample();
        let mut seen = Vec::new();
        forest.for_each_task(&mut |g, t, depth| seen.push((g.id.clone(), t.id.clone(), depth)));
        assert_eq!(seen[1], ("g1".to_string(), "t1a".to_string(), 1));
        assert_eq!(seen.len(), 3);
    }
}
